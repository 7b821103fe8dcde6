// system-tests/tests/emergency_path.rs
// ============================================================================
// Module: Emergency Path Scenario
// Description: A CRITICAL-urgency objective bypasses planning entirely,
//              runs the monitored loop under the three-cycle EMERGENCY cap,
//              and emits the lifecycle panic signal on completion.
// Purpose: End-to-end coverage for the spec's sixth concrete scenario.
// Dependencies: support
// ============================================================================

mod support;

use conscious_observer_core::ObserverEngineConfig;
use conscious_observer_core::ObserverPhase;
use conscious_observer_core::ProcessingMode;

#[tokio::test(flavor = "multi_thread")]
async fn critical_outage_runs_emergency_and_panics_lifecycle() {
    let objective = "Production is down. This is critical. Please help immediately.";
    let (result, lifecycle) = support::run_invocation(objective, Vec::new(), Vec::new(), 0.0, ObserverEngineConfig::default()).await;

    assert_eq!(result.mode, ProcessingMode::Emergency);
    assert!(result.total_cycles <= 3);
    assert!(!result.was_simplified);
    assert!(!result.was_escalated);
    assert!(!result.was_aborted);
    assert_eq!(result.final_phase, ObserverPhase::GateOut);

    assert!(result.filtered_output.is_some(), "a clean EMERGENCY completion still passes through Gate-Out");
    assert!(result.grounding_report.is_some());
    assert!(result.calibrated_confidence.is_some());

    assert_eq!(lifecycle.event_count(), 1, "EMERGENCY dispatch always emits exactly one panic signal");
}
