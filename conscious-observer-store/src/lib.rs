// conscious-observer-store/src/lib.rs
// ============================================================================
// Module: Conscious Observer Store
// Description: In-memory, TTL-bounded `RetryBudgetStore` and
//              `CalibrationHistoryStore` backends.
// Purpose: Give Gate-Out (C7) real cross-invocation state without a
//          persistence layer, since durable calibration learning is a
//          non-goal for this deployment.
// Dependencies: conscious-observer-core
// ============================================================================

//! ## Overview
//! The teacher's `decision-gate-store-sqlite` persists run state to disk
//! under `SQLite` WAL. This workspace's two stores are shorter-lived —
//! a retry count clears itself once Gate-Out reaches a terminal outcome, and
//! calibration history is process-local curve data, not an audit record — so
//! both backends here hold their state in a `Mutex`-guarded map with a TTL
//! sweep instead of a database file.

pub mod calibration_history;
pub mod retry_budget;

pub use calibration_history::InMemoryCalibrationHistoryStore;
pub use retry_budget::InMemoryRetryBudgetStore;
