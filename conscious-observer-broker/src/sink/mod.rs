// conscious-observer-broker/src/sink/mod.rs
// ============================================================================
// Module: Lifecycle Sinks
// Description: Three LifecycleSink shapes: log, callback, channel.
// Purpose: Let a deployment choose how EMERGENCY lifecycle events surface.
// Dependencies: conscious-observer-core
// ============================================================================

//! ## Overview
//! [`conscious_observer_core::LifecycleSink::emit`] never fails, so none of
//! these sinks can propagate a delivery error back to the orchestrator; a
//! sink that cannot deliver (a poisoned writer mutex, a full channel) logs a
//! warning and drops the event instead, exactly as the trait's contract
//! requires.

mod callback;
mod channel;
mod log;

pub use callback::CallbackLifecycleSink;
pub use channel::ChannelLifecycleSink;
pub use log::LogLifecycleSink;
