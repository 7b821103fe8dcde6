// conscious-observer-core/src/lib.rs
// ============================================================================
// Module: Conscious Observer Core Library
// Description: Public API surface for the Conscious Observer control plane.
// Purpose: Expose core value types, collaborator interfaces, and the runtime
//          engine that composes Gate-In, the monitored execution loop, the
//          mode dispatchers, and Gate-Out into one orchestrator entry point.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Conscious Observer core provides the three-phase metacognitive control
//! plane described in the system specification: a scheduling gate that picks
//! a processing mode, a monitored execution loop that watches cognitive load
//! cycle-by-cycle, and a quality gate that grounds, calibrates, and filters
//! every output before release. It is backend-agnostic: every perception,
//! planning, execution, and quality concern is an external collaborator
//! reached only through the trait interfaces in [`interfaces`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::ActivationError;
pub use interfaces::ActivationRouter;
pub use interfaces::AdvancedPlanning;
pub use interfaces::AgentGenesis;
pub use interfaces::AgentState;
pub use interfaces::ArtifactsDelta;
pub use interfaces::CalibrationHistoryEntry;
pub use interfaces::Calibrator;
pub use interfaces::ClassificationResult;
pub use interfaces::Classifier;
pub use interfaces::CognitiveLabels;
pub use interfaces::CognitiveLoadMonitor;
pub use interfaces::CognitiveScorer;
pub use interfaces::DagNode;
pub use interfaces::EntityExtractor;
pub use interfaces::EvidenceRef;
pub use interfaces::ExecutableDag;
pub use interfaces::ExecutionError;
pub use interfaces::ExtractedEntities;
pub use interfaces::GenesisError;
pub use interfaces::GraphSynthesizer;
pub use interfaces::GroundingVerifier;
pub use interfaces::LifecycleEvent;
pub use interfaces::LifecycleSink;
pub use interfaces::MemoryHandle;
pub use interfaces::ModalityIngest;
pub use interfaces::ModalityOutput;
pub use interfaces::MonitorError;
pub use interfaces::NoiseGateFilter;
pub use interfaces::OodaLoop;
pub use interfaces::PerceptionError;
pub use interfaces::PlannedTasks;
pub use interfaces::PlanningError;
pub use interfaces::PressureError;
pub use interfaces::PressureSource;
pub use interfaces::QualityError;
pub use interfaces::ReflectionGuardrails;
pub use interfaces::ReflectionVerdict;
pub use interfaces::RetryBudgetStore;
pub use interfaces::CalibrationHistoryStore;
pub use interfaces::SelfModel;
pub use interfaces::SelfModelError;
pub use interfaces::SubTask;
pub use interfaces::TaskDecomposition;

pub use runtime::CancellationToken;
pub use runtime::DispatchOutcome;
pub use runtime::DowngradeError;
pub use runtime::ExecuteCollaborators;
pub use runtime::ExecuteResult;
pub use runtime::GateInCollaborators;
pub use runtime::GateInError;
pub use runtime::GateInOutcome;
pub use runtime::GateInResult;
pub use runtime::GateOutCollaborators;
pub use runtime::GateOutPass;
pub use runtime::LoadThresholds;
pub use runtime::LoopCollaborators;
pub use runtime::LoopInputs;
pub use runtime::LoopOutcome;
pub use runtime::Observer;
pub use runtime::ObserverCollaborators;
pub use runtime::ObserverEngineConfig;
pub use runtime::ObserverError;
pub use runtime::PhaseTimeouts;
