//! Per-cycle telemetry and the cognitive-load assessment derived from it.

use serde::Deserialize;
use serde::Serialize;

/// Measurement reported by `runCycle` for a single cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CycleTelemetry {
    /// 1-based cycle number within the current monitored loop.
    pub cycle_number: u32,
    /// Tokens consumed during this cycle.
    pub tokens_consumed: u64,
    /// Wall-clock duration of this cycle, in milliseconds.
    pub duration_ms: u64,
    /// Number of active modules during this cycle.
    pub active_module_count: u32,
    /// Total cycle budget for the current loop.
    pub total_cycles_budget: u32,
    /// Total token budget for the current loop.
    pub total_tokens_budget: u64,
}

/// Three weighted sub-scores feeding the aggregate cognitive load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CognitiveLoad {
    /// Compute pressure sub-score, in `[0, 1]`.
    pub compute: f64,
    /// Time pressure sub-score, in `[0, 1]`.
    pub time: f64,
    /// Breadth (active-module) pressure sub-score, in `[0, 1]`.
    pub breadth: f64,
    /// Weighted aggregate of the three sub-scores, in `[0, 1]`.
    pub aggregate: f64,
}

/// Configurable weights for the three [`CognitiveLoad`] sub-scores.
///
/// Defaults match §6 of the specification: 0.40 / 0.35 / 0.25.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoadWeights {
    /// Weight applied to the compute sub-score.
    pub compute: f64,
    /// Weight applied to the time sub-score.
    pub time: f64,
    /// Weight applied to the breadth sub-score.
    pub breadth: f64,
}

impl Default for LoadWeights {
    fn default() -> Self {
        Self {
            compute: 0.40,
            time: 0.35,
            breadth: 0.25,
        }
    }
}

impl LoadWeights {
    /// Computes the weighted aggregate of three sub-scores using these weights.
    #[must_use]
    pub fn aggregate(&self, compute: f64, time: f64, breadth: f64) -> f64 {
        (self.compute * compute + self.time * time + self.breadth * breadth).clamp(0.0, 1.0)
    }
}

/// Action recommended by the cognitive-load monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadAction {
    /// Proceed to the next cycle unchanged.
    Continue,
    /// Downgrade the activation map one level via C3.
    Simplify,
    /// Terminate the loop with reason `ESCALATED`.
    Escalate,
    /// Terminate the loop with reason `ABORTED`.
    Abort,
}

/// Diagnostic flags the monitor used to justify its recommendation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LoadFlags {
    /// A recent decision hash repeats within the detection window.
    pub loop_detected: bool,
    /// The most recent cycle's duration exceeded the stall multiple.
    pub stall_detected: bool,
    /// Recent decisions alternate period-2 (or -3).
    pub oscillation_detected: bool,
    /// Recent outputs have diverged from the stated objective.
    pub drift_detected: bool,
}

/// The cognitive-load monitor's recommendation for the current cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadRecommendation {
    /// What the orchestrator should do next.
    pub action: LoadAction,
    /// Free-text justification for `action`.
    pub reasoning: String,
    /// Which detectors fired to produce this recommendation.
    pub flags: LoadFlags,
}
