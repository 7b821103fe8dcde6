//! Value types shared across every phase of the orchestrator.
//!
//! Pure data only; control-plane logic (the signal tag builder, the
//! pipeline downgrader, the phase engines) lives under [`crate::runtime`].

pub mod calibration;
pub mod capability;
pub mod complexity;
pub mod decision;
pub mod envelope;
pub mod filter;
pub mod grounding;
pub mod identifiers;
pub mod identity;
pub mod loop_result;
pub mod raw_input;
pub mod result;
pub mod signals;
pub mod telemetry;
pub mod time;
pub mod tool_output;

pub use calibration::CalibratedConfidence;
pub use capability::CapabilityAssessment;
pub use capability::CapabilityGap;
pub use complexity::ActivationMap;
pub use complexity::ComplexityLevel;
pub use complexity::PipelineTemplate;
pub use complexity::ProcessingMode;
pub use decision::ActionTag;
pub use decision::Decision;
pub use decision::ReplanMetadata;
pub use envelope::CollaboratorEnvelope;
pub use envelope::CollaboratorError;
pub use envelope::CollaboratorMetrics;
pub use envelope::SchemaTag;
pub use envelope::Signal;
pub use envelope::UnwrapError;
pub use envelope::unwrap_signal;
pub use filter::FilterOutcome;
pub use filter::FilteredOutput;
pub use filter::QualityMetadata;
pub use filter::RejectedOutput;
pub use grounding::ClaimGrade;
pub use grounding::GradedClaim;
pub use grounding::GroundingReport;
pub use identifiers::AgentId;
pub use identifiers::DomainTag;
pub use identifiers::IdentifierError;
pub use identifiers::OutputId;
pub use identifiers::TraceId;
pub use identity::IdentityContext;
pub use loop_result::AgentStateSnapshot;
pub use loop_result::LoopResult;
pub use loop_result::TerminationReason;
pub use raw_input::Modality;
pub use raw_input::RawInput;
pub use raw_input::SpawnRequest;
pub use result::ConsciousObserverResult;
pub use result::EscalationGuidance;
pub use result::ObserverPhase;
pub use result::PhaseDurations;
pub use signals::IntentClass;
pub use signals::SignalTags;
pub use signals::UrgencyLevel;
pub use telemetry::CognitiveLoad;
pub use telemetry::CycleTelemetry;
pub use telemetry::LoadAction;
pub use telemetry::LoadFlags;
pub use telemetry::LoadRecommendation;
pub use telemetry::LoadWeights;
pub use time::MonotonicMillis;
pub use tool_output::ToolOutput;
