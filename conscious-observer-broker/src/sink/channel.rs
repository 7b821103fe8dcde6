// conscious-observer-broker/src/sink/channel.rs
// ============================================================================
// Module: Channel Lifecycle Sink
// Description: Forwards lifecycle events into a Tokio mpsc channel.
// Purpose: Let a host drain lifecycle events on its own task.
// Dependencies: conscious-observer-core, tokio
// ============================================================================

//! ## Overview
//! Grounded on the teacher's `ChannelSink`. A full channel drops the event
//! and logs a warning rather than blocking the orchestrator, since
//! [`LifecycleSink::emit`] must never fail or stall its caller.

use async_trait::async_trait;
use conscious_observer_core::LifecycleEvent;
use conscious_observer_core::LifecycleSink;
use tokio::sync::mpsc::Sender;
use tracing::warn;

/// Forwards lifecycle events into a bounded `tokio::sync::mpsc` channel.
#[derive(Debug)]
pub struct ChannelLifecycleSink {
    sender: Sender<LifecycleEvent>,
}

impl ChannelLifecycleSink {
    /// Creates a channel sink delivering into `sender`.
    #[must_use]
    pub fn new(sender: Sender<LifecycleEvent>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl LifecycleSink for ChannelLifecycleSink {
    async fn emit(&self, event: LifecycleEvent) {
        if let Err(err) = self.sender.try_send(event) {
            warn!(error = %err, "lifecycle channel sink dropped an event");
        }
    }
}

#[cfg(test)]
mod tests {
    use conscious_observer_core::TraceId;
    use tokio::sync::mpsc;

    use super::*;

    #[tokio::test]
    async fn forwards_the_event_into_the_channel() {
        let (tx, mut rx) = mpsc::channel(4);
        let sink = ChannelLifecycleSink::new(tx);
        let trace_id = TraceId::new("trace-1").expect("non-empty");
        sink.emit(LifecycleEvent::EmergencyPanic { trace_id, detail: "abort".to_owned() }).await;
        let received = rx.recv().await.expect("receives the forwarded event");
        let LifecycleEvent::EmergencyPanic { detail, .. } = received;
        assert_eq!(detail, "abort");
    }

    #[tokio::test]
    async fn a_full_channel_drops_the_event_without_panicking() {
        let (tx, _rx) = mpsc::channel(1);
        let sink = ChannelLifecycleSink::new(tx.clone());
        let trace_id = TraceId::new("trace-1").expect("non-empty");
        sink.emit(LifecycleEvent::EmergencyPanic { trace_id: trace_id.clone(), detail: "first".to_owned() }).await;
        sink.emit(LifecycleEvent::EmergencyPanic { trace_id, detail: "second".to_owned() }).await;
    }
}
