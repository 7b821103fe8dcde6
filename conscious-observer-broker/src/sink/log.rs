// conscious-observer-broker/src/sink/log.rs
// ============================================================================
// Module: Log Lifecycle Sink
// Description: Writes one JSON line per lifecycle event to a shared writer.
// Purpose: Persist EMERGENCY-mode lifecycle events for audit/debugging.
// Dependencies: conscious-observer-core, serde_json, std
// ============================================================================

//! ## Overview
//! Grounded on the teacher's `LogSink<W>`: a `Mutex`-guarded writer receives
//! one newline-delimited JSON record per event. A poisoned mutex or a
//! failed write is logged via `tracing::warn` and the event is dropped,
//! since [`LifecycleSink::emit`] cannot report failure to its caller.

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use conscious_observer_core::LifecycleEvent;
use conscious_observer_core::LifecycleSink;
use serde_json::json;
use tracing::warn;

/// Writes one JSON line per lifecycle event to a `Mutex`-guarded writer.
pub struct LogLifecycleSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> std::fmt::Debug for LogLifecycleSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogLifecycleSink").finish_non_exhaustive()
    }
}

impl<W: Write + Send> LogLifecycleSink<W> {
    /// Creates a log sink writing through `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer: Mutex::new(writer) }
    }

    fn write_record(&self, record: &serde_json::Value) -> std::io::Result<()> {
        let mut guard = self.writer.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        serde_json::to_writer(&mut *guard, record)?;
        guard.write_all(b"\n")
    }
}

#[async_trait]
impl<W: Write + Send> LifecycleSink for LogLifecycleSink<W> {
    async fn emit(&self, event: LifecycleEvent) {
        let record = match &event {
            LifecycleEvent::EmergencyPanic { trace_id, detail } => json!({
                "event": "emergency_panic",
                "trace_id": trace_id.as_str(),
                "detail": detail,
            }),
        };
        if let Err(err) = self.write_record(&record) {
            warn!(error = %err, "lifecycle log sink failed to write record");
        }
    }
}

#[cfg(test)]
mod tests {
    use conscious_observer_core::TraceId;

    use super::*;

    #[tokio::test]
    async fn writes_one_json_line_per_event() {
        let buffer: Vec<u8> = Vec::new();
        let sink = LogLifecycleSink::new(buffer);
        let trace_id = TraceId::new("trace-1").expect("non-empty");
        sink.emit(LifecycleEvent::EmergencyPanic { trace_id, detail: "load escalated to abort".to_owned() }).await;
        let guard = sink.writer.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let text = String::from_utf8_lossy(&guard);
        assert!(text.contains("emergency_panic"));
        assert!(text.ends_with('\n'));
    }
}
