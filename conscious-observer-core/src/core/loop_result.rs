//! Synthesized summary of a completed monitored execution loop.

use serde::Deserialize;
use serde::Serialize;

/// Why a monitored execution loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The inner loop reported `ActionTag::Complete`.
    Completed,
    /// The loop ran to completion after at least one SIMPLIFY downgrade.
    SimplifiedComplete,
    /// The inner loop reported `ActionTag::Park`: suspended awaiting external input.
    Parked,
    /// The inner loop reported `ActionTag::Sleep`: suspended on a timer.
    Slept,
    /// The load monitor (or a promoted SIMPLIFY) recommended ESCALATE.
    Escalated,
    /// The load monitor recommended ABORT, or cancellation was promoted to one.
    Aborted,
    /// `maxCycles` was reached without any other termination.
    BudgetExhausted,
}

/// A snapshot of the inner loop's state at termination, opaque to the
/// orchestrator beyond its serialized form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentStateSnapshot(pub serde_json::Value);

/// Summary of a full monitored execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopResult {
    /// Total cycles executed.
    pub total_cycles: u32,
    /// Why the loop stopped.
    pub termination_reason: TerminationReason,
    /// The inner loop's final state, for diagnostics.
    pub final_state: AgentStateSnapshot,
    /// Total token cost accumulated across all cycles.
    pub total_tokens: u64,
    /// Artifacts emitted across all cycles, concatenated in cycle order.
    pub artifacts: Vec<String>,
}
