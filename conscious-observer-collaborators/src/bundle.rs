// conscious-observer-collaborators/src/bundle.rs
// ============================================================================
// Module: Default Collaborator Bundle
// Description: Owns one instance of every reference collaborator this crate
//              provides and assembles them into an `ObserverCollaborators`.
// Purpose: Let a CLI or test wire one `Observer::process` call without
//          naming each of the thirteen collaborator types individually.
// Dependencies: conscious-observer-core
// ============================================================================

//! ## Overview
//! This crate supplies every collaborator except the three whose state must
//! outlive a single call — the lifecycle sink and the two Gate-Out stores —
//! which come from `conscious-observer-broker` and `conscious-observer-store`
//! respectively. [`DefaultCollaboratorBundle::observer_collaborators`] takes
//! those three by reference and borrows the rest from `self`.

use conscious_observer_core::ActivationRouter;
use conscious_observer_core::AdvancedPlanning;
use conscious_observer_core::AgentGenesis;
use conscious_observer_core::CalibrationHistoryStore;
use conscious_observer_core::Calibrator;
use conscious_observer_core::Classifier;
use conscious_observer_core::CognitiveLoadMonitor;
use conscious_observer_core::CognitiveScorer;
use conscious_observer_core::EntityExtractor;
use conscious_observer_core::GraphSynthesizer;
use conscious_observer_core::GroundingVerifier;
use conscious_observer_core::LifecycleSink;
use conscious_observer_core::ModalityIngest;
use conscious_observer_core::NoiseGateFilter;
use conscious_observer_core::ObserverCollaborators;
use conscious_observer_core::OodaLoop;
use conscious_observer_core::PressureSource;
use conscious_observer_core::ReflectionGuardrails;
use conscious_observer_core::RetryBudgetStore;
use conscious_observer_core::SelfModel;
use conscious_observer_core::TaskDecomposition;

use crate::activation::ThresholdActivationRouter;
use crate::capability::SetDifferenceSelfModel;
use crate::execution::WalkingOodaLoop;
use crate::genesis::TableAgentGenesis;
use crate::monitor::HeuristicCognitiveLoadMonitor;
use crate::perception::HeuristicClassifier;
use crate::perception::HeuristicCognitiveScorer;
use crate::perception::HeuristicEntityExtractor;
use crate::perception::TextOnlyModalityIngest;
use crate::planning::FirstToolAdvancedPlanning;
use crate::planning::LinearGraphSynthesizer;
use crate::planning::SentenceSplitDecomposition;
use crate::planning::ToolPermissionGuardrails;
use crate::pressure::FixedPressureSource;
use crate::quality::HistoryBlendedCalibrator;
use crate::quality::OverlapGroundingVerifier;
use crate::quality::ThresholdNoiseGateFilter;

/// Owns one instance of every deterministic reference collaborator this
/// crate provides. The lifecycle sink and the two Gate-Out stores are not
/// part of this bundle — they carry state across calls and belong to the
/// caller (typically `conscious-observer-broker` / `conscious-observer-store`
/// instances wired by the CLI).
#[derive(Debug, Default)]
pub struct DefaultCollaboratorBundle {
    /// Agent genesis / identity loading.
    pub genesis: TableAgentGenesis,
    /// Modality ingest.
    pub modality: TextOnlyModalityIngest,
    /// Classification.
    pub classifier: HeuristicClassifier,
    /// Intent/sentiment/urgency scoring.
    pub scorer: HeuristicCognitiveScorer,
    /// Entity extraction.
    pub entities: HeuristicEntityExtractor,
    /// Capability self-assessment.
    pub self_model: SetDifferenceSelfModel,
    /// Host pressure source, caller-settable via [`FixedPressureSource::set`].
    pub pressure: FixedPressureSource,
    /// Activation map computation.
    pub activation_router: ThresholdActivationRouter,
    /// Task decomposition.
    pub decomposition: SentenceSplitDecomposition,
    /// Graph synthesis.
    pub graph_synthesizer: LinearGraphSynthesizer,
    /// Advanced planning.
    pub advanced_planning: FirstToolAdvancedPlanning,
    /// Pre-execution reflection guard.
    pub reflection: ToolPermissionGuardrails,
    /// The inner execution loop's single-cycle primitive.
    pub ooda: WalkingOodaLoop,
    /// The cognitive-load monitor.
    pub monitor: HeuristicCognitiveLoadMonitor,
    /// Grounding verification.
    pub grounding: OverlapGroundingVerifier,
    /// Confidence calibration.
    pub calibrator: HistoryBlendedCalibrator,
    /// The output filter.
    pub filter: ThresholdNoiseGateFilter,
}

impl DefaultCollaboratorBundle {
    /// Borrows `self`'s collaborators plus the three caller-supplied,
    /// cross-call stateful ones into one [`ObserverCollaborators`] for a
    /// single `Observer::process` call.
    #[must_use]
    pub fn observer_collaborators<'a>(
        &'a self,
        lifecycle: &'a dyn LifecycleSink,
        retry_budget: &'a dyn RetryBudgetStore,
        calibration_history: &'a dyn CalibrationHistoryStore,
    ) -> ObserverCollaborators<'a> {
        ObserverCollaborators {
            genesis: &self.genesis as &dyn AgentGenesis,
            modality: &self.modality as &dyn ModalityIngest,
            classifier: &self.classifier as &dyn Classifier,
            scorer: &self.scorer as &dyn CognitiveScorer,
            entities: &self.entities as &dyn EntityExtractor,
            self_model: &self.self_model as &dyn SelfModel,
            pressure: &self.pressure as &dyn PressureSource,
            activation_router: &self.activation_router as &dyn ActivationRouter,
            decomposition: &self.decomposition as &dyn TaskDecomposition,
            graph_synthesizer: &self.graph_synthesizer as &dyn GraphSynthesizer,
            advanced_planning: &self.advanced_planning as &dyn AdvancedPlanning,
            reflection: &self.reflection as &dyn ReflectionGuardrails,
            ooda: &self.ooda as &dyn OodaLoop,
            monitor: &self.monitor as &dyn CognitiveLoadMonitor,
            lifecycle,
            grounding: &self.grounding as &dyn GroundingVerifier,
            calibrator: &self.calibrator as &dyn Calibrator,
            filter: &self.filter as &dyn NoiseGateFilter,
            retry_budget,
            calibration_history,
        }
    }
}
