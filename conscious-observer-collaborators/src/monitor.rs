// conscious-observer-collaborators/src/monitor.rs
// ============================================================================
// Module: Reference Cognitive Load Monitor
// Description: Deterministic compute/time/breadth load scoring plus
//              loop/stall/oscillation/drift detection.
// Purpose: Give the monitored execution loop (C5) a real load recommendation
//          to act on between cycles.
// Dependencies: conscious-observer-core
// ============================================================================

//! ## Overview
//! Load is scored directly from [`CycleTelemetry`] against the configured
//! weights and thresholds (§3, §6). Loop detection hashes recent decisions
//! with [`Decision::loop_detection_hash`]; oscillation checks for a
//! period-2 alternation in the same window; drift compares recent output
//! text against the objective's own vocabulary.

use std::collections::HashSet;

use async_trait::async_trait;
use conscious_observer_core::ActivationMap;
use conscious_observer_core::CognitiveLoadMonitor;
use conscious_observer_core::CycleTelemetry;
use conscious_observer_core::Decision;
use conscious_observer_core::LoadAction;
use conscious_observer_core::LoadFlags;
use conscious_observer_core::LoadRecommendation;
use conscious_observer_core::LoadThresholds;
use conscious_observer_core::LoadWeights;
use conscious_observer_core::MonitorError;

/// A cycle's wall-clock duration exceeding this multiple of
/// `expected_cycle_ms` counts as a stall.
const STALL_MULTIPLE: f64 = 3.0;
/// Drift fires when fewer than this fraction of the objective's significant
/// words appear across the recent-outputs window.
const DRIFT_OVERLAP_FLOOR: f64 = 0.15;
/// Drift is only assessed once the window holds at least this many outputs,
/// to avoid flagging drift from a single early cycle.
const DRIFT_MIN_OUTPUTS: usize = 3;

/// Scores cognitive load from telemetry and flags loop/stall/oscillation/
/// drift from the recent-decisions and recent-outputs windows.
#[derive(Debug, Clone)]
pub struct HeuristicCognitiveLoadMonitor {
    /// Sub-score weights forming the aggregate load.
    pub weights: LoadWeights,
    /// Aggregate-load thresholds mapped to a recommendation.
    pub thresholds: LoadThresholds,
    /// Baseline cycle duration used for stall detection.
    pub expected_cycle_ms: f64,
}

impl Default for HeuristicCognitiveLoadMonitor {
    fn default() -> Self {
        Self {
            weights: LoadWeights::default(),
            thresholds: LoadThresholds::default(),
            expected_cycle_ms: 2_000.0,
        }
    }
}

impl HeuristicCognitiveLoadMonitor {
    /// Builds a monitor from the engine's own weights/thresholds/baseline,
    /// so a deployment need not duplicate configuration values.
    #[must_use]
    pub fn from_config(weights: LoadWeights, thresholds: LoadThresholds, expected_cycle_ms: f64) -> Self {
        Self { weights, thresholds, expected_cycle_ms }
    }

    fn compute_score(telemetry: &CycleTelemetry) -> f64 {
        if telemetry.total_tokens_budget == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss, reason = "telemetry counters are far below f64's exact-integer range")]
        let ratio = telemetry.tokens_consumed as f64 * telemetry.cycle_number as f64 / telemetry.total_tokens_budget as f64;
        ratio.clamp(0.0, 1.0)
    }

    fn time_score(&self, telemetry: &CycleTelemetry) -> f64 {
        if self.expected_cycle_ms <= 0.0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss, reason = "cycle durations are far below f64's exact-integer range")]
        let duration = telemetry.duration_ms as f64;
        (duration / self.expected_cycle_ms / STALL_MULTIPLE).clamp(0.0, 1.0)
    }

    fn breadth_score(telemetry: &CycleTelemetry, activation_map: &ActivationMap) -> f64 {
        let active_cap = activation_map.template.active_modules.len().max(1);
        #[allow(clippy::cast_precision_loss, reason = "module counts are small, far below f64's exact-integer range")]
        let ratio = telemetry.active_module_count as f64 / active_cap as f64;
        ratio.clamp(0.0, 1.0)
    }

    fn stall_detected(&self, telemetry: &CycleTelemetry) -> bool {
        self.expected_cycle_ms > 0.0 && (telemetry.duration_ms as f64) > self.expected_cycle_ms * STALL_MULTIPLE
    }
}

/// A hash repeating anywhere in the window, beyond the most recent entry
/// itself, indicates the loop is revisiting a prior decision.
fn loop_detected(recent_decisions: &[Decision]) -> bool {
    let Some((last, rest)) = recent_decisions.split_last() else {
        return false;
    };
    let last_hash = last.loop_detection_hash();
    rest.iter().any(|decision| decision.loop_detection_hash() == last_hash)
}

/// Period-2 oscillation: the last four hashes alternate `A B A B`.
fn oscillation_detected(recent_decisions: &[Decision]) -> bool {
    if recent_decisions.len() < 4 {
        return false;
    }
    let hashes: Vec<u64> = recent_decisions.iter().map(Decision::loop_detection_hash).collect();
    let window = &hashes[hashes.len() - 4..];
    window[0] == window[2] && window[1] == window[3] && window[0] != window[1]
}

/// Splits text into lowercase alphabetic words of at least four characters,
/// a crude proxy for "significant" vocabulary.
fn significant_words(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|word| word.chars().count() >= 4)
        .collect()
}

/// Drift: recent outputs share fewer than [`DRIFT_OVERLAP_FLOOR`] of the
/// objective's significant words, once the window is wide enough to judge.
fn drift_detected(recent_outputs: &[String], objective: &str) -> bool {
    if recent_outputs.len() < DRIFT_MIN_OUTPUTS {
        return false;
    }
    let objective_words = significant_words(objective);
    if objective_words.is_empty() {
        return false;
    }
    let output_words: HashSet<String> = recent_outputs.iter().flat_map(|output| significant_words(output)).collect();
    let overlap = objective_words.intersection(&output_words).count();
    #[allow(clippy::cast_precision_loss, reason = "vocabulary sizes are small, far below f64's exact-integer range")]
    let overlap_ratio = overlap as f64 / objective_words.len() as f64;
    overlap_ratio < DRIFT_OVERLAP_FLOOR
}

#[async_trait]
impl CognitiveLoadMonitor for HeuristicCognitiveLoadMonitor {
    async fn monitor(
        &self,
        activation_map: &ActivationMap,
        telemetry: &CycleTelemetry,
        recent_decisions: &[Decision],
        recent_outputs: &[String],
        objective: &str,
    ) -> Result<LoadRecommendation, MonitorError> {
        let compute = Self::compute_score(telemetry);
        let time = self.time_score(telemetry);
        let breadth = Self::breadth_score(telemetry, activation_map);
        let aggregate = self.weights.aggregate(compute, time, breadth);

        let flags = LoadFlags {
            loop_detected: loop_detected(recent_decisions),
            stall_detected: self.stall_detected(telemetry),
            oscillation_detected: oscillation_detected(recent_decisions),
            drift_detected: drift_detected(recent_outputs, objective),
        };

        let any_flag = flags.loop_detected || flags.stall_detected || flags.oscillation_detected || flags.drift_detected;

        let (action, reasoning) = if aggregate >= self.thresholds.abort || (flags.oscillation_detected && aggregate >= self.thresholds.escalate) {
            (LoadAction::Abort, format!("aggregate load {aggregate:.2} at or above abort threshold, or unbreakable oscillation"))
        } else if aggregate >= self.thresholds.escalate {
            (LoadAction::Escalate, format!("aggregate load {aggregate:.2} at or above escalate threshold"))
        } else if aggregate >= self.thresholds.simplify || any_flag {
            (LoadAction::Simplify, format!("aggregate load {aggregate:.2} at or above simplify threshold, or a diagnostic flag fired"))
        } else {
            (LoadAction::Continue, format!("aggregate load {aggregate:.2} within nominal range"))
        };

        Ok(LoadRecommendation { action, reasoning, flags })
    }
}

#[cfg(test)]
mod tests {
    use conscious_observer_core::ComplexityLevel;
    use conscious_observer_core::runtime::downgrade::pipeline_template_for;

    use super::*;

    fn map_at(level: ComplexityLevel) -> ActivationMap {
        ActivationMap {
            name: "test".to_owned(),
            complexity: level,
            template: pipeline_template_for(level),
            pressure_downgraded: false,
        }
    }

    fn telemetry(tokens_consumed: u64, duration_ms: u64, active_module_count: u32) -> CycleTelemetry {
        CycleTelemetry {
            cycle_number: 1,
            tokens_consumed,
            duration_ms,
            active_module_count,
            total_cycles_budget: 10,
            total_tokens_budget: 1_000,
        }
    }

    fn decision(hash_seed: &str) -> Decision {
        Decision {
            action: conscious_observer_core::ActionTag::Continue,
            reasoning: String::new(),
            target_node_ids: vec![hash_seed.to_owned()],
            replan: None,
        }
    }

    #[tokio::test]
    async fn low_load_recommends_continue() {
        let monitor = HeuristicCognitiveLoadMonitor::default();
        let map = map_at(ComplexityLevel::Moderate);
        let rec = monitor.monitor(&map, &telemetry(10, 200, 1), &[], &[], "do the thing").await.expect("monitors");
        assert_eq!(rec.action, LoadAction::Continue);
    }

    #[tokio::test]
    async fn heavy_tokens_and_duration_recommend_escalate_or_worse() {
        let monitor = HeuristicCognitiveLoadMonitor::default();
        let map = map_at(ComplexityLevel::Complex);
        let rec = monitor.monitor(&map, &telemetry(900, 8_000, 6), &[], &[], "do the thing").await.expect("monitors");
        assert!(matches!(rec.action, LoadAction::Escalate | LoadAction::Abort | LoadAction::Simplify));
    }

    #[tokio::test]
    async fn repeating_decision_hash_sets_loop_flag() {
        let monitor = HeuristicCognitiveLoadMonitor::default();
        let map = map_at(ComplexityLevel::Moderate);
        let decisions = vec![decision("n1"), decision("n2"), decision("n1")];
        let rec = monitor.monitor(&map, &telemetry(10, 200, 1), &decisions, &[], "do the thing").await.expect("monitors");
        assert!(rec.flags.loop_detected);
    }

    #[tokio::test]
    async fn period_two_alternation_sets_oscillation_flag() {
        let monitor = HeuristicCognitiveLoadMonitor::default();
        let map = map_at(ComplexityLevel::Moderate);
        let decisions = vec![decision("a"), decision("b"), decision("a"), decision("b")];
        let rec = monitor.monitor(&map, &telemetry(10, 200, 1), &decisions, &[], "do the thing").await.expect("monitors");
        assert!(rec.flags.oscillation_detected);
    }

    #[tokio::test]
    async fn unrelated_outputs_set_drift_flag() {
        let monitor = HeuristicCognitiveLoadMonitor::default();
        let map = map_at(ComplexityLevel::Moderate);
        let outputs = vec!["weather forecast".to_owned(), "pizza recipe".to_owned(), "cat video".to_owned()];
        let rec = monitor
            .monitor(&map, &telemetry(10, 200, 1), &[], &outputs, "reconcile the quarterly invoice ledger")
            .await
            .expect("monitors");
        assert!(rec.flags.drift_detected);
    }
}
