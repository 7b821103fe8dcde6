// system-tests/tests/load_simplify_then_complete.rs
// ============================================================================
// Module: Load-Triggered Simplify Then Complete Scenario
// Description: A COMPLEX objective enters FULL mode; the load monitor
//              recommends SIMPLIFY once, then CONTINUE, before the inner
//              loop completes on cycle five.
// Purpose: End-to-end coverage for the spec's third concrete scenario,
//          scripting only the cycle-by-cycle control flow so Gate-In and
//          FULL-mode planning still run against the reference bundle.
// Dependencies: support
// ============================================================================

mod support;

use std::sync::Mutex;

use async_trait::async_trait;
use conscious_observer_core::ActionTag;
use conscious_observer_core::ActivationMap;
use conscious_observer_core::AgentState;
use conscious_observer_core::ArtifactsDelta;
use conscious_observer_core::CognitiveLoadMonitor;
use conscious_observer_core::CycleTelemetry;
use conscious_observer_core::Decision;
use conscious_observer_core::ExecutableDag;
use conscious_observer_core::ExecutionError;
use conscious_observer_core::LoadAction;
use conscious_observer_core::LoadFlags;
use conscious_observer_core::LoadRecommendation;
use conscious_observer_core::MemoryHandle;
use conscious_observer_core::MonitorError;
use conscious_observer_core::ObserverEngineConfig;
use conscious_observer_core::ObserverPhase;
use conscious_observer_core::OodaLoop;
use conscious_observer_core::ProcessingMode;

/// Emits `Continue` for four cycles, then `Complete` on the fifth.
struct FiveCycleOoda;

#[async_trait]
impl OodaLoop for FiveCycleOoda {
    async fn run_cycle(
        &self,
        state: AgentState,
        _memory: &MemoryHandle,
        _active_dag: &ExecutableDag,
        _objective: &str,
    ) -> Result<(AgentState, Decision, CycleTelemetry, ArtifactsDelta), ExecutionError> {
        let cycle_number = cursor_from(&state) + 1;
        let action = if cycle_number >= 5 { ActionTag::Complete } else { ActionTag::Continue };
        let decision = Decision {
            action,
            reasoning: format!("scripted cycle {cycle_number}"),
            target_node_ids: vec![format!("node-{cycle_number}")],
            replan: None,
        };
        let telemetry = CycleTelemetry {
            cycle_number,
            tokens_consumed: 50,
            duration_ms: 300,
            active_module_count: 2,
            total_cycles_budget: 5,
            total_tokens_budget: 250,
        };
        let artifact = ArtifactsDelta { emitted: vec![format!("step {cycle_number} done")] };
        let next_state = AgentState(serde_json::json!({ "cursor": cycle_number }));
        Ok((next_state, decision, telemetry, artifact))
    }
}

fn cursor_from(state: &AgentState) -> u32 {
    state.0.get("cursor").and_then(serde_json::Value::as_u64).unwrap_or(0).try_into().unwrap_or(0)
}

/// Recommends SIMPLIFY on the first call (after cycle 1), then CONTINUE on
/// every later call.
struct SimplifyOnceThenContinueMonitor {
    calls: Mutex<u32>,
}

#[async_trait]
impl CognitiveLoadMonitor for SimplifyOnceThenContinueMonitor {
    async fn monitor(
        &self,
        _activation_map: &ActivationMap,
        _telemetry: &CycleTelemetry,
        _recent_decisions: &[Decision],
        _recent_outputs: &[String],
        _objective: &str,
    ) -> Result<LoadRecommendation, MonitorError> {
        let mut calls = self.calls.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *calls += 1;
        let action = if *calls == 1 { LoadAction::Simplify } else { LoadAction::Continue };
        Ok(LoadRecommendation { action, reasoning: "scripted".to_owned(), flags: LoadFlags::default() })
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn complex_objective_simplifies_once_then_completes_on_cycle_five() {
    let objective = "Conduct a comprehensive, multi-phase investigation into the root cause, \
        impact radius, and remediation plan for the systemic failure, coordinating across \
        infrastructure, data, and application teams while producing a detailed incident report \
        with timelines, mitigations, and follow-up action items for leadership review.";

    let ooda = FiveCycleOoda;
    let monitor = SimplifyOnceThenContinueMonitor { calls: Mutex::new(0) };
    let (result, _lifecycle) =
        support::run_invocation_with_loop_overrides(objective, &ooda, &monitor, ObserverEngineConfig::default()).await;

    assert_eq!(result.mode, ProcessingMode::Full);
    assert!(result.was_simplified);
    assert!(!result.was_escalated);
    assert!(!result.was_aborted);
    assert_eq!(result.total_cycles, 5);
    assert_eq!(result.final_phase, ObserverPhase::GateOut);
    assert!(result.filtered_output.is_some());
}
