// system-tests/tests/capability_gap.rs
// ============================================================================
// Module: Capability Gap Scenario
// Description: An objective that requires a tool the inferred role profile
//              forbids should short-circuit Gate-In at step 7 with no
//              Gate-Out fields populated.
// Purpose: End-to-end coverage for the spec's second concrete scenario.
// Dependencies: support
// ============================================================================

mod support;

use conscious_observer_core::ObserverEngineConfig;
use conscious_observer_core::ObserverPhase;

#[tokio::test(flavor = "multi_thread")]
async fn forbidden_sql_tool_escalates_without_gate_out() {
    let objective = "please run select * from users against the production tables";
    let (result, lifecycle) = support::run_invocation(objective, Vec::new(), Vec::new(), 0.0, ObserverEngineConfig::default()).await;

    assert_eq!(result.final_phase, ObserverPhase::Escalated);
    assert!(result.was_escalated);
    assert!(!result.was_simplified);
    assert!(!result.was_aborted);

    assert!(result.filtered_output.is_none());
    assert!(result.partial_output.is_none());
    assert!(result.grounding_report.is_none());
    assert!(result.calibrated_confidence.is_none());

    let guidance = result.escalation_guidance.expect("capability gap carries escalation guidance");
    assert!(guidance.missing_capabilities.iter().any(|cap| cap.contains("sql_execution")));

    assert_eq!(lifecycle.event_count(), 0, "capability gap never reaches EMERGENCY dispatch");
}
