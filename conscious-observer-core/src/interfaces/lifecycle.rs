//! The lifecycle sink: an observable side-effect channel for events that are
//! not part of the collaborator envelope contract, chiefly the EMERGENCY-mode
//! lifecycle-panic signal emitted by the Emergency mode dispatcher (§4.6).

use async_trait::async_trait;

use crate::core::TraceId;

/// One lifecycle event emitted by the orchestrator as a side effect.
///
/// These are observable (logged, forwarded to a broker sink) but never part
/// of a [`crate::core::ConsciousObserverResult`] — a caller that never wires
/// a sink still gets a fully-formed result.
#[derive(Debug, Clone)]
pub enum LifecycleEvent {
    /// EMERGENCY mode completed its monitored loop; raised unconditionally
    /// as the mode's side effect, independent of how the loop terminated.
    EmergencyPanic {
        /// The invocation's trace id.
        trace_id: TraceId,
        /// Free-text detail describing why EMERGENCY mode was entered.
        detail: String,
    },
}

/// Delivers [`LifecycleEvent`]s to whatever sink the host has wired
/// (log / callback / channel). Never fallible: a sink that cannot deliver an
/// event drops it rather than failing the invocation.
#[async_trait]
pub trait LifecycleSink: Send + Sync {
    /// Emits one lifecycle event.
    async fn emit(&self, event: LifecycleEvent);
}

/// A sink that discards every event; the default when no broker is wired.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLifecycleSink;

#[async_trait]
impl LifecycleSink for NullLifecycleSink {
    async fn emit(&self, _event: LifecycleEvent) {}
}
