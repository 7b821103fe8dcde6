//! Shared, process-wide store interfaces consulted by Gate-Out (§4.7, §5,
//! §9): the retry-budget cache and the calibration-history store. Both are
//! shared across invocations and must support atomic check-and-increment;
//! `conscious-observer-store` supplies the concrete backends.

use async_trait::async_trait;

use crate::core::DomainTag;
use crate::core::OutputId;
use crate::interfaces::CalibrationHistoryEntry;

/// Bounds how many times a single output id may retry Gate-Out.
///
/// Shared across invocations; implementations must make `try_consume`
/// atomic so two concurrent retries for the same `output_id` cannot both
/// observe budget remaining.
#[async_trait]
pub trait RetryBudgetStore: Send + Sync {
    /// Attempts to consume one retry for `output_id` against `max_retries`.
    ///
    /// Returns `Some(used)` — the number of retries consumed so far,
    /// including this one — if the budget was not yet exhausted, or `None`
    /// if `output_id` had already consumed `max_retries` retries.
    async fn try_consume(&self, output_id: &OutputId, max_retries: u32) -> Option<u32>;

    /// Clears the retry budget for `output_id`. Called after every terminal
    /// Gate-Out outcome (pass or escalate), per §4.7.
    async fn clear(&self, output_id: &OutputId);
}

/// Supplies the calibrator with a domain's historical correction factors.
#[async_trait]
pub trait CalibrationHistoryStore: Send + Sync {
    /// Returns the calibration history entries recorded for `domain`.
    async fn history_for(&self, domain: &DomainTag) -> Vec<CalibrationHistoryEntry>;
}
