// system-tests/tests/oscillation_abort.rs
// ============================================================================
// Module: Oscillation Abort Scenario
// Description: The cognitive-load monitor detects an unbreakable period-2
//              oscillation at near-abort aggregate load and recommends
//              ABORT; the loop stops short, but Gate-Out still runs on the
//              artifacts accumulated so far.
// Purpose: End-to-end coverage for the spec's fifth concrete scenario.
// Dependencies: support
// ============================================================================

mod support;

use async_trait::async_trait;
use conscious_observer_core::ActionTag;
use conscious_observer_core::ActivationMap;
use conscious_observer_core::AgentState;
use conscious_observer_core::ArtifactsDelta;
use conscious_observer_core::CalibratedConfidence;
use conscious_observer_core::CognitiveLoadMonitor;
use conscious_observer_core::CycleTelemetry;
use conscious_observer_core::Decision;
use conscious_observer_core::ExecutableDag;
use conscious_observer_core::ExecutionError;
use conscious_observer_core::FilterOutcome;
use conscious_observer_core::FilteredOutput;
use conscious_observer_core::GroundingReport;
use conscious_observer_core::LoadAction;
use conscious_observer_core::LoadFlags;
use conscious_observer_core::LoadRecommendation;
use conscious_observer_core::MemoryHandle;
use conscious_observer_core::MonitorError;
use conscious_observer_core::NoiseGateFilter;
use conscious_observer_core::ObserverEngineConfig;
use conscious_observer_core::ObserverPhase;
use conscious_observer_core::OodaLoop;
use conscious_observer_core::QualityError;
use conscious_observer_core::QualityMetadata;
use conscious_observer_core::ToolOutput;

/// Never completes on its own; alternates between two target nodes forever,
/// the shape an oscillating planner would produce.
struct NeverCompletingOoda;

#[async_trait]
impl OodaLoop for NeverCompletingOoda {
    async fn run_cycle(
        &self,
        state: AgentState,
        _memory: &MemoryHandle,
        _active_dag: &ExecutableDag,
        _objective: &str,
    ) -> Result<(AgentState, Decision, CycleTelemetry, ArtifactsDelta), ExecutionError> {
        let cursor = state.0.get("cursor").and_then(serde_json::Value::as_u64).unwrap_or(0);
        let cycle_number = u32::try_from(cursor + 1).unwrap_or(u32::MAX);
        let node = if cursor % 2 == 0 { "node-a" } else { "node-b" };
        let decision = Decision {
            action: ActionTag::Continue,
            reasoning: format!("oscillating cycle {cycle_number}"),
            target_node_ids: vec![node.to_owned()],
            replan: None,
        };
        let telemetry = CycleTelemetry {
            cycle_number,
            tokens_consumed: 50,
            duration_ms: 300,
            active_module_count: 2,
            total_cycles_budget: 25,
            total_tokens_budget: 1250,
        };
        let artifact = ArtifactsDelta { emitted: vec![format!("revisited {node}")] };
        let next_state = AgentState(serde_json::json!({ "cursor": cursor + 1 }));
        Ok((next_state, decision, telemetry, artifact))
    }
}

/// Reports a near-abort aggregate load with the oscillation flag set on
/// every call, matching what the reference monitor would report once a
/// period-2 alternation fills its detection window.
struct OscillatingAbortMonitor;

#[async_trait]
impl CognitiveLoadMonitor for OscillatingAbortMonitor {
    async fn monitor(
        &self,
        _activation_map: &ActivationMap,
        _telemetry: &CycleTelemetry,
        _recent_decisions: &[Decision],
        _recent_outputs: &[String],
        _objective: &str,
    ) -> Result<LoadRecommendation, MonitorError> {
        Ok(LoadRecommendation {
            action: LoadAction::Abort,
            reasoning: "aggregate load 0.97 with unbreakable period-2 oscillation".to_owned(),
            flags: LoadFlags { oscillation_detected: true, ..LoadFlags::default() },
        })
    }
}

/// Always passes; isolates this scenario's assertions to the monitored
/// loop's ABORT path rather than the independent question of whether the
/// default quality bar would accept a two-line partial artifact.
struct AlwaysPassFilter;

#[async_trait]
impl NoiseGateFilter for AlwaysPassFilter {
    async fn filter(
        &self,
        output: &ToolOutput,
        _grounding: &GroundingReport,
        calibrated: &CalibratedConfidence,
        _quality_bar_override: Option<f64>,
    ) -> Result<FilterOutcome, QualityError> {
        Ok(FilterOutcome::Passed(FilteredOutput {
            content: output.content.clone(),
            quality: QualityMetadata {
                grounding_score: 1.0,
                calibrated_confidence: calibrated.calibrated,
                quality_bar: 0.5,
            },
        }))
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn unbreakable_oscillation_aborts_loop_but_still_runs_gate_out() {
    let objective = "Conduct a comprehensive, multi-phase investigation into the root cause, \
        impact radius, and remediation plan for the systemic failure, coordinating across \
        infrastructure, data, and application teams while producing a detailed incident report \
        with timelines, mitigations, and follow-up action items for leadership review.";

    let ooda = NeverCompletingOoda;
    let monitor = OscillatingAbortMonitor;
    let filter = AlwaysPassFilter;
    let (result, _lifecycle) =
        support::run_invocation_with_overrides(objective, &ooda, &monitor, &filter, ObserverEngineConfig::default()).await;

    assert!(result.was_aborted);
    assert!(!result.was_escalated);
    assert!(!result.was_simplified);
    assert_eq!(result.total_cycles, 1, "the monitor aborts right after the first cycle's load check");

    assert_eq!(result.final_phase, ObserverPhase::GateOut);
    assert!(result.filtered_output.is_some(), "Gate-Out still runs on the accumulated partial artifact");
    assert!(result.grounding_report.is_some());
    assert!(result.calibrated_confidence.is_some());
}
