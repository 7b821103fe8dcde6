// system-tests/tests/trivial_greeting.rs
// ============================================================================
// Module: Trivial Greeting Scenario
// Description: A one-word greeting should clear Gate-In as FAST/TRIVIAL and
//              pass Gate-Out auto-grounded as opinion, in a single cycle.
// Purpose: End-to-end coverage for the spec's first concrete scenario.
// Dependencies: support
// ============================================================================

mod support;

use conscious_observer_core::ObserverEngineConfig;
use conscious_observer_core::ObserverPhase;
use conscious_observer_core::ProcessingMode;

#[tokio::test(flavor = "multi_thread")]
async fn hi_resolves_in_one_fast_cycle_with_full_grounding() {
    let (result, _lifecycle) = support::run_invocation("hi", Vec::new(), Vec::new(), 0.0, ObserverEngineConfig::default()).await;

    assert_eq!(result.mode, ProcessingMode::Fast);
    assert_eq!(result.final_phase, ObserverPhase::GateOut);
    assert_eq!(result.total_cycles, 1);
    assert!(!result.was_simplified);
    assert!(!result.was_escalated);
    assert!(!result.was_aborted);

    let filtered = result.filtered_output.expect("Gate-Out passed");
    assert!((filtered.quality.grounding_score - 1.0).abs() < f64::EPSILON);
}
