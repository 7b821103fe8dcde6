// system-tests/tests/support.rs
// ============================================================================
// Module: System Test Support
// Description: Shared harness for assembling an `Observer` from the
//              reference collaborator bundle and in-memory stores.
// Purpose: Keep the per-scenario test files focused on inputs and assertions.
// Dependencies: conscious-observer-broker, conscious-observer-collaborators,
//               conscious-observer-core, conscious-observer-store
// ============================================================================

#![allow(dead_code, reason = "not every scenario file uses every helper")]

use std::sync::Arc;
use std::sync::Mutex;

use conscious_observer_broker::CallbackLifecycleSink;
use conscious_observer_collaborators::DefaultCollaboratorBundle;
use conscious_observer_core::ActivationRouter;
use conscious_observer_core::AdvancedPlanning;
use conscious_observer_core::AgentGenesis;
use conscious_observer_core::CancellationToken;
use conscious_observer_core::Calibrator;
use conscious_observer_core::Classifier;
use conscious_observer_core::CognitiveLoadMonitor;
use conscious_observer_core::CognitiveScorer;
use conscious_observer_core::EntityExtractor;
use conscious_observer_core::EvidenceRef;
use conscious_observer_core::GraphSynthesizer;
use conscious_observer_core::GroundingVerifier;
use conscious_observer_core::LifecycleEvent;
use conscious_observer_core::ModalityIngest;
use conscious_observer_core::MonotonicMillis;
use conscious_observer_core::NoiseGateFilter;
use conscious_observer_core::Observer;
use conscious_observer_core::ObserverCollaborators;
use conscious_observer_core::ObserverEngineConfig;
use conscious_observer_core::OodaLoop;
use conscious_observer_core::PressureSource;
use conscious_observer_core::RawInput;
use conscious_observer_core::ReflectionGuardrails;
use conscious_observer_core::SelfModel;
use conscious_observer_core::SpawnRequest;
use conscious_observer_core::TaskDecomposition;
use conscious_observer_store::InMemoryCalibrationHistoryStore;
use conscious_observer_store::InMemoryRetryBudgetStore;

/// A `now` closure that advances by a fixed step on every call, giving each
/// phase boundary a distinct, strictly increasing monotonic reading without
/// reading a real clock.
pub fn stepping_clock(step_ms: u64) -> impl Fn() -> MonotonicMillis {
    let ticks = std::sync::atomic::AtomicU64::new(0);
    move || {
        let tick = ticks.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        MonotonicMillis::new(tick * step_ms)
    }
}

/// Records every lifecycle event delivered to it, for assertions on the
/// emergency-path lifecycle-panic signal.
#[derive(Clone, Default)]
pub struct RecordingLifecycle {
    events: Arc<Mutex<Vec<LifecycleEvent>>>,
}

impl RecordingLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sink(&self) -> CallbackLifecycleSink {
        let events = Arc::clone(&self.events);
        CallbackLifecycleSink::new(move |event| {
            events.lock().unwrap_or_else(std::sync::PoisonError::into_inner).push(event.clone());
        })
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap_or_else(std::sync::PoisonError::into_inner).len()
    }
}

/// Runs one invocation through `Observer::process` with the reference
/// collaborator bundle, fresh in-memory stores, and a recording lifecycle
/// sink, returning both the result and the lifecycle recorder.
pub async fn run_invocation(
    objective: &str,
    constraints: Vec<String>,
    evidence: Vec<EvidenceRef>,
    pressure: f64,
    config: ObserverEngineConfig,
) -> (conscious_observer_core::ConsciousObserverResult, RecordingLifecycle) {
    let bundle = DefaultCollaboratorBundle::default();
    bundle.pressure.set(pressure);

    let lifecycle_recorder = RecordingLifecycle::new();
    let lifecycle_sink = lifecycle_recorder.sink();
    let retry_budget = InMemoryRetryBudgetStore::default();
    let calibration_history = InMemoryCalibrationHistoryStore::default();
    let collaborators = bundle.observer_collaborators(&lifecycle_sink, &retry_budget, &calibration_history);

    let observer = Observer { collaborators, config };
    let raw_input = RawInput::text(objective);
    let spawn_request = SpawnRequest { objective: objective.to_owned(), constraints, trace_id: None };
    let cancellation = CancellationToken::new();
    let now = stepping_clock(10);

    let result = observer
        .process(&raw_input, &spawn_request, &evidence, &cancellation, &now)
        .await
        .expect("process does not return a construction-time error for these scenarios");
    (result, lifecycle_recorder)
}

/// Runs one invocation like [`run_invocation`], but with the inner
/// execution loop (`ooda`) and cognitive-load monitor replaced by
/// scripted test doubles. Every other collaborator still comes from the
/// reference bundle, so Gate-In and FULL-mode planning behave exactly as
/// they would against the default pipeline; only cycle-by-cycle control
/// flow is scripted.
pub async fn run_invocation_with_loop_overrides(
    objective: &str,
    ooda: &dyn OodaLoop,
    monitor: &dyn CognitiveLoadMonitor,
    config: ObserverEngineConfig,
) -> (conscious_observer_core::ConsciousObserverResult, RecordingLifecycle) {
    let bundle = DefaultCollaboratorBundle::default();

    let lifecycle_recorder = RecordingLifecycle::new();
    let lifecycle_sink = lifecycle_recorder.sink();
    let retry_budget = InMemoryRetryBudgetStore::default();
    let calibration_history = InMemoryCalibrationHistoryStore::default();

    let collaborators = ObserverCollaborators {
        genesis: &bundle.genesis as &dyn AgentGenesis,
        modality: &bundle.modality as &dyn ModalityIngest,
        classifier: &bundle.classifier as &dyn Classifier,
        scorer: &bundle.scorer as &dyn CognitiveScorer,
        entities: &bundle.entities as &dyn EntityExtractor,
        self_model: &bundle.self_model as &dyn SelfModel,
        pressure: &bundle.pressure as &dyn PressureSource,
        activation_router: &bundle.activation_router as &dyn ActivationRouter,
        decomposition: &bundle.decomposition as &dyn TaskDecomposition,
        graph_synthesizer: &bundle.graph_synthesizer as &dyn GraphSynthesizer,
        advanced_planning: &bundle.advanced_planning as &dyn AdvancedPlanning,
        reflection: &bundle.reflection as &dyn ReflectionGuardrails,
        ooda,
        monitor,
        lifecycle: &lifecycle_sink,
        grounding: &bundle.grounding as &dyn GroundingVerifier,
        calibrator: &bundle.calibrator as &dyn Calibrator,
        filter: &bundle.filter as &dyn NoiseGateFilter,
        retry_budget: &retry_budget,
        calibration_history: &calibration_history,
    };

    let observer = Observer { collaborators, config };
    let raw_input = RawInput::text(objective);
    let spawn_request = SpawnRequest { objective: objective.to_owned(), constraints: Vec::new(), trace_id: None };
    let cancellation = CancellationToken::new();
    let now = stepping_clock(10);

    let result = observer
        .process(&raw_input, &spawn_request, &[], &cancellation, &now)
        .await
        .expect("process does not return a construction-time error for these scenarios");
    (result, lifecycle_recorder)
}

/// Runs one invocation with the inner execution loop, cognitive-load
/// monitor, and noise-gate filter all replaced by scripted test doubles,
/// for scenarios that need full control over both loop termination and the
/// Gate-Out verdict in the same run.
pub async fn run_invocation_with_overrides(
    objective: &str,
    ooda: &dyn OodaLoop,
    monitor: &dyn CognitiveLoadMonitor,
    filter: &dyn NoiseGateFilter,
    config: ObserverEngineConfig,
) -> (conscious_observer_core::ConsciousObserverResult, RecordingLifecycle) {
    let bundle = DefaultCollaboratorBundle::default();

    let lifecycle_recorder = RecordingLifecycle::new();
    let lifecycle_sink = lifecycle_recorder.sink();
    let retry_budget = InMemoryRetryBudgetStore::default();
    let calibration_history = InMemoryCalibrationHistoryStore::default();

    let collaborators = ObserverCollaborators {
        genesis: &bundle.genesis as &dyn AgentGenesis,
        modality: &bundle.modality as &dyn ModalityIngest,
        classifier: &bundle.classifier as &dyn Classifier,
        scorer: &bundle.scorer as &dyn CognitiveScorer,
        entities: &bundle.entities as &dyn EntityExtractor,
        self_model: &bundle.self_model as &dyn SelfModel,
        pressure: &bundle.pressure as &dyn PressureSource,
        activation_router: &bundle.activation_router as &dyn ActivationRouter,
        decomposition: &bundle.decomposition as &dyn TaskDecomposition,
        graph_synthesizer: &bundle.graph_synthesizer as &dyn GraphSynthesizer,
        advanced_planning: &bundle.advanced_planning as &dyn AdvancedPlanning,
        reflection: &bundle.reflection as &dyn ReflectionGuardrails,
        ooda,
        monitor,
        lifecycle: &lifecycle_sink,
        grounding: &bundle.grounding as &dyn GroundingVerifier,
        calibrator: &bundle.calibrator as &dyn Calibrator,
        filter,
        retry_budget: &retry_budget,
        calibration_history: &calibration_history,
    };

    let observer = Observer { collaborators, config };
    let raw_input = RawInput::text(objective);
    let spawn_request = SpawnRequest { objective: objective.to_owned(), constraints: Vec::new(), trace_id: None };
    let cancellation = CancellationToken::new();
    let now = stepping_clock(10);

    let result = observer
        .process(&raw_input, &spawn_request, &[], &cancellation, &now)
        .await
        .expect("process does not return a construction-time error for these scenarios");
    (result, lifecycle_recorder)
}

/// Runs one invocation like [`run_invocation`], but with the Gate-Out noise
/// gate filter replaced by a scripted test double. Every other collaborator
/// still comes from the reference bundle, so Gate-In, planning, and the
/// inner execution loop behave exactly as they would against the default
/// pipeline; only the pass/reject verdict at the very end of Gate-Out is
/// scripted.
pub async fn run_invocation_with_filter_override(
    objective: &str,
    filter: &dyn NoiseGateFilter,
    config: ObserverEngineConfig,
) -> (conscious_observer_core::ConsciousObserverResult, RecordingLifecycle) {
    let bundle = DefaultCollaboratorBundle::default();

    let lifecycle_recorder = RecordingLifecycle::new();
    let lifecycle_sink = lifecycle_recorder.sink();
    let retry_budget = InMemoryRetryBudgetStore::default();
    let calibration_history = InMemoryCalibrationHistoryStore::default();

    let collaborators = ObserverCollaborators {
        genesis: &bundle.genesis as &dyn AgentGenesis,
        modality: &bundle.modality as &dyn ModalityIngest,
        classifier: &bundle.classifier as &dyn Classifier,
        scorer: &bundle.scorer as &dyn CognitiveScorer,
        entities: &bundle.entities as &dyn EntityExtractor,
        self_model: &bundle.self_model as &dyn SelfModel,
        pressure: &bundle.pressure as &dyn PressureSource,
        activation_router: &bundle.activation_router as &dyn ActivationRouter,
        decomposition: &bundle.decomposition as &dyn TaskDecomposition,
        graph_synthesizer: &bundle.graph_synthesizer as &dyn GraphSynthesizer,
        advanced_planning: &bundle.advanced_planning as &dyn AdvancedPlanning,
        reflection: &bundle.reflection as &dyn ReflectionGuardrails,
        ooda: &bundle.ooda as &dyn OodaLoop,
        monitor: &bundle.monitor as &dyn CognitiveLoadMonitor,
        lifecycle: &lifecycle_sink,
        grounding: &bundle.grounding as &dyn GroundingVerifier,
        calibrator: &bundle.calibrator as &dyn Calibrator,
        filter,
        retry_budget: &retry_budget,
        calibration_history: &calibration_history,
    };

    let observer = Observer { collaborators, config };
    let raw_input = RawInput::text(objective);
    let spawn_request = SpawnRequest { objective: objective.to_owned(), constraints: Vec::new(), trace_id: None };
    let cancellation = CancellationToken::new();
    let now = stepping_clock(10);

    let result = observer
        .process(&raw_input, &spawn_request, &[], &cancellation, &now)
        .await
        .expect("process does not return a construction-time error for these scenarios");
    (result, lifecycle_recorder)
}
