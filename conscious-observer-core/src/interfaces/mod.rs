//! Collaborator trait interfaces: one trait and one error enum per external
//! concern, per §6. The orchestrator holds one handle per collaborator and
//! never reaches into their internals.

pub mod activation;
pub mod capability;
pub mod execution;
pub mod genesis;
pub mod lifecycle;
pub mod monitor;
pub mod perception;
pub mod planning;
pub mod pressure;
pub mod quality;
pub mod store;

pub use activation::ActivationError;
pub use activation::ActivationRouter;
pub use capability::SelfModel;
pub use capability::SelfModelError;
pub use genesis::AgentGenesis;
pub use genesis::GenesisError;
pub use execution::AgentState;
pub use execution::ArtifactsDelta;
pub use execution::ExecutionError;
pub use execution::MemoryHandle;
pub use execution::OodaLoop;
pub use lifecycle::LifecycleEvent;
pub use lifecycle::LifecycleSink;
pub use monitor::CognitiveLoadMonitor;
pub use monitor::MonitorError;
pub use perception::ClassificationResult;
pub use perception::Classifier;
pub use perception::CognitiveLabels;
pub use perception::CognitiveScorer;
pub use perception::EntityExtractor;
pub use perception::ExtractedEntities;
pub use perception::ModalityIngest;
pub use perception::ModalityOutput;
pub use perception::PerceptionError;
pub use planning::AdvancedPlanning;
pub use planning::DagNode;
pub use planning::ExecutableDag;
pub use planning::GraphSynthesizer;
pub use planning::PlannedTasks;
pub use planning::PlanningError;
pub use planning::ReflectionGuardrails;
pub use planning::ReflectionVerdict;
pub use planning::SubTask;
pub use planning::TaskDecomposition;
pub use pressure::PressureError;
pub use pressure::PressureSource;
pub use quality::Calibrator;
pub use quality::CalibrationHistoryEntry;
pub use quality::EvidenceRef;
pub use quality::GroundingVerifier;
pub use quality::NoiseGateFilter;
pub use quality::QualityError;
pub use store::CalibrationHistoryStore;
pub use store::RetryBudgetStore;
