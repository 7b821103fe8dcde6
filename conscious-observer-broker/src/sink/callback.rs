// conscious-observer-broker/src/sink/callback.rs
// ============================================================================
// Module: Callback Lifecycle Sink
// Description: Invokes a user-supplied handler for every lifecycle event.
// Purpose: Let a host wire lifecycle events into its own notification path.
// Dependencies: conscious-observer-core, std::sync::Arc
// ============================================================================

//! ## Overview
//! Grounded on the teacher's `CallbackSink`. The handler runs synchronously
//! on the calling task; a handler that needs to do async work should hand
//! off to a channel itself rather than block here.

use std::sync::Arc;

use async_trait::async_trait;
use conscious_observer_core::LifecycleEvent;
use conscious_observer_core::LifecycleSink;

/// Handler signature invoked by [`CallbackLifecycleSink`].
type Handler = dyn Fn(&LifecycleEvent) + Send + Sync;

/// Invokes a user-supplied handler with each lifecycle event.
#[derive(Clone)]
pub struct CallbackLifecycleSink {
    handler: Arc<Handler>,
}

impl std::fmt::Debug for CallbackLifecycleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackLifecycleSink").finish_non_exhaustive()
    }
}

impl CallbackLifecycleSink {
    /// Creates a callback sink from `handler`.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&LifecycleEvent) + Send + Sync + 'static,
    {
        Self { handler: Arc::new(handler) }
    }
}

#[async_trait]
impl LifecycleSink for CallbackLifecycleSink {
    async fn emit(&self, event: LifecycleEvent) {
        (self.handler)(&event);
    }
}
