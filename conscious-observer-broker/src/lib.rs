// conscious-observer-broker/src/lib.rs
// ============================================================================
// Module: Conscious Observer Broker Library
// Description: LifecycleSink implementations delivering EMERGENCY-mode
//              lifecycle-panic events to a log, a callback, or a channel.
// Purpose: Give the orchestrator a real observable side channel (§4.6, §9).
// Dependencies: conscious-observer-core, tokio
// ============================================================================

//! ## Overview
//! `conscious-observer-broker` mirrors the teacher's sink/source split, minus
//! the source half: this spec has no inbound trigger surface (everything
//! starts from a direct `Observer::process` call), so only the three sink
//! shapes survive — log, callback, channel.

pub mod sink;

pub use sink::CallbackLifecycleSink;
pub use sink::ChannelLifecycleSink;
pub use sink::LogLifecycleSink;
