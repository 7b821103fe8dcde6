//! The orchestrator's outward artifact and its terminal-phase tag.

use serde::Deserialize;
use serde::Serialize;

use super::calibration::CalibratedConfidence;
use super::complexity::ProcessingMode;
use super::filter::FilteredOutput;
use super::grounding::GroundingReport;
use super::identifiers::AgentId;
use super::identifiers::TraceId;

/// Names the outcome a [`ConsciousObserverResult`] terminated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObserverPhase {
    /// Gate-In failed on a collaborator error in perception (steps 2–6).
    GateInFailed,
    /// Gate-In was cancelled before completing.
    GateInCancelled,
    /// Capability assessment (Gate-In step 7) found the agent cannot handle the input.
    Escalated,
    /// Gate-Out completed and the filter passed the output.
    GateOut,
    /// Gate-Out was cancelled before completing.
    GateOutCancelled,
}

/// Guidance attached to an escalated result, describing what would need to
/// change for the invocation to succeed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EscalationGuidance {
    /// Free-text description of the blocking condition.
    pub description: String,
    /// Skills/tools missing, when escalation originated from a capability gap.
    pub missing_capabilities: Vec<String>,
}

/// Per-phase wall-clock durations, in milliseconds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PhaseDurations {
    /// Gate-In duration.
    pub gate_in_ms: u64,
    /// Mode-dispatcher + monitored-loop duration.
    pub execute_ms: u64,
    /// Gate-Out duration, summed across retries.
    pub gate_out_ms: u64,
}

impl PhaseDurations {
    /// Total duration across all three phases.
    #[must_use]
    pub const fn total_ms(&self) -> u64 {
        self.gate_in_ms + self.execute_ms + self.gate_out_ms
    }
}

/// The outward artifact of one `process()` invocation.
///
/// # Invariants
/// - `trace_id` is never empty.
/// - `grounding_report`/`calibrated_confidence` are populated on every
///   terminal outcome except `ObserverPhase::Escalated` from a capability gap
///   (Gate-Out did not run).
/// - `durations.total_ms() == durations.gate_in_ms + durations.execute_ms +
///   durations.gate_out_ms` by construction.
/// - If `was_aborted`, `filtered_output` is `None` and `partial_output` is `Some`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsciousObserverResult {
    /// Trace id propagated from Gate-In.
    pub trace_id: TraceId,
    /// Agent id assigned (or supplied) during agent genesis.
    pub agent_id: AgentId,
    /// The processing mode Gate-In selected.
    pub mode: ProcessingMode,
    /// Names the terminal outcome.
    pub final_phase: ObserverPhase,
    /// Present when the filter passed the output.
    pub filtered_output: Option<FilteredOutput>,
    /// Present when the invocation terminated without a passing filtered output.
    pub partial_output: Option<String>,
    /// Present alongside `partial_output`.
    pub escalation_guidance: Option<EscalationGuidance>,
    /// Populated on every terminal outcome except capability-gap escalation.
    pub grounding_report: Option<GroundingReport>,
    /// Populated on every terminal outcome except capability-gap escalation.
    pub calibrated_confidence: Option<CalibratedConfidence>,
    /// Per-phase timing breakdown.
    pub durations: PhaseDurations,
    /// Total tokens consumed across the monitored execution loop.
    pub total_tokens: u64,
    /// Total cycles executed across the monitored execution loop.
    pub total_cycles: u32,
    /// Set if any SIMPLIFY downgrade occurred.
    pub was_simplified: bool,
    /// Set if the loop or Gate-Out escalated.
    pub was_escalated: bool,
    /// Set if the loop aborted.
    pub was_aborted: bool,
}
