//! Engine-level configuration: the runtime-facing knobs named in §6, used
//! directly by the phase engines.
//!
//! `conscious-observer-config` loads the same surface from TOML and
//! converts it into this type; this crate itself never reads a file or an
//! environment variable.

use serde::Deserialize;
use serde::Serialize;

use crate::core::LoadWeights;

/// Simplify/escalate/abort thresholds applied to the aggregate cognitive
/// load score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoadThresholds {
    /// Aggregate load at or above which SIMPLIFY is recommended.
    pub simplify: f64,
    /// Aggregate load at or above which ESCALATE is recommended.
    pub escalate: f64,
    /// Aggregate load at or above which ABORT is recommended.
    pub abort: f64,
}

impl Default for LoadThresholds {
    fn default() -> Self {
        Self {
            simplify: 0.6,
            escalate: 0.8,
            abort: 0.95,
        }
    }
}

/// Per-phase timeout configuration, in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhaseTimeouts {
    /// Gate-In timeout.
    pub gate_in_timeout_ms: u64,
    /// Per-cycle timeout inside the monitored execution loop.
    pub loop_cycle_timeout_ms: u64,
    /// Gate-Out timeout.
    pub gate_out_timeout_ms: u64,
}

impl Default for PhaseTimeouts {
    fn default() -> Self {
        Self {
            gate_in_timeout_ms: 5_000,
            loop_cycle_timeout_ms: 30_000,
            gate_out_timeout_ms: 10_000,
        }
    }
}

/// The full runtime configuration surface named in §6, consumed directly by
/// Gate-In, the monitored loop, the mode dispatchers, and Gate-Out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserverEngineConfig {
    /// Hard cap on EMERGENCY-mode cycles.
    pub emergency_max_cycles: u32,
    /// Baseline cycle duration used for stall detection, in milliseconds.
    pub expected_cycle_ms: f64,
    /// Max consecutive SIMPLIFY actions before the next one is promoted to ESCALATE.
    pub simplify_max_steps: u32,
    /// Max Gate-Out retry loops for a single invocation.
    pub gate_out_max_retries: u32,
    /// Weights for the three cognitive-load sub-scores.
    pub load_weights: LoadWeights,
    /// Thresholds mapping aggregate load to a load recommendation.
    pub load_thresholds: LoadThresholds,
    /// Size of the `recentDecisions`/`recentOutputs` sliding windows.
    pub recent_decisions_window: usize,
    /// Whether entity recognition runs during Gate-In.
    pub entity_recognition_enabled: bool,
    /// Per-phase timeouts.
    pub timeouts: PhaseTimeouts,
}

impl Default for ObserverEngineConfig {
    fn default() -> Self {
        Self {
            emergency_max_cycles: 3,
            expected_cycle_ms: 2_000.0,
            simplify_max_steps: 2,
            gate_out_max_retries: 2,
            load_weights: LoadWeights::default(),
            load_thresholds: LoadThresholds::default(),
            recent_decisions_window: 10,
            entity_recognition_enabled: true,
            timeouts: PhaseTimeouts::default(),
        }
    }
}
