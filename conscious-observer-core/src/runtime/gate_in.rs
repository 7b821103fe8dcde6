//! Gate-In Phase (C4): perception chain, capability assessment, activation
//! map, and processing-mode selection.

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::core::ActivationMap;
use crate::core::CapabilityAssessment;
use crate::core::ComplexityLevel;
use crate::core::EscalationGuidance;
use crate::core::IdentityContext;
use crate::core::ObserverPhase;
use crate::core::PhaseDurations;
use crate::core::ProcessingMode;
use crate::core::RawInput;
use crate::core::SignalTags;
use crate::core::SpawnRequest;
use crate::core::TraceId;
use crate::core::UrgencyLevel;
use crate::core::identifiers::AgentId;
use crate::core::result::ConsciousObserverResult;
use crate::interfaces::ActivationError;
use crate::interfaces::ActivationRouter;
use crate::interfaces::AgentGenesis;
use crate::interfaces::Classifier;
use crate::interfaces::CognitiveScorer;
use crate::interfaces::EntityExtractor;
use crate::interfaces::ExtractedEntities;
use crate::interfaces::GenesisError;
use crate::interfaces::ModalityIngest;
use crate::interfaces::ModalityOutput;
use crate::interfaces::PerceptionError;
use crate::interfaces::PressureSource;
use crate::interfaces::SelfModel;
use crate::interfaces::SelfModelError;
use crate::runtime::cancellation::CancellationToken;
use crate::runtime::config::ObserverEngineConfig;
use crate::runtime::signal_tags::build_signal_tags;

/// Error taxonomy for Gate-In collaborator failures (steps 1–6, 9).
///
/// Step 7 (capability assessment returning `can_handle = false`) is not an
/// error — it is a normal terminal outcome constructed directly as a
/// [`ConsciousObserverResult`]. Step 8 (pressure read) is also not an error:
/// a failed read defaults to `0.0` pressure per the specification.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GateInError {
    /// Agent genesis (step 1) failed.
    #[error(transparent)]
    Genesis(#[from] GenesisError),
    /// A perception collaborator (steps 2–5) failed.
    #[error(transparent)]
    Perception(#[from] PerceptionError),
    /// The self-model collaborator (step 7) failed outright (distinct from
    /// a normal `can_handle = false` verdict).
    #[error(transparent)]
    SelfModel(#[from] SelfModelError),
    /// The activation-router collaborator (step 9) failed.
    #[error(transparent)]
    Activation(#[from] ActivationError),
}

/// Everything Gate-In produces for a non-escalated invocation.
#[derive(Debug, Clone)]
pub struct GateInResult {
    /// Trace id for this invocation (caller-supplied or derived from `agent_id`).
    pub trace_id: TraceId,
    /// The agent id assigned during genesis.
    pub agent_id: AgentId,
    /// Immutable identity constraints for this invocation.
    pub identity: IdentityContext,
    /// The fused scheduling-input record.
    pub tags: SignalTags,
    /// Raw capability assessment (always `can_handle == true` here).
    pub capability: CapabilityAssessment,
    /// The selected activation map.
    pub activation_map: ActivationMap,
    /// The selected processing mode.
    pub mode: ProcessingMode,
    /// Gate-In's own wall-clock duration.
    pub duration_ms: u64,
}

/// Gate-In's outcome: either a normal handoff to the mode dispatcher, or a
/// terminal result constructed directly by this phase.
#[derive(Debug, Clone)]
pub enum GateInOutcome {
    /// Proceed to the mode dispatcher with this bundle.
    Proceed(GateInResult),
    /// Step 7 found `can_handle == false`; terminal, no Gate-Out.
    CapabilityEscalated(ConsciousObserverResult),
    /// A collaborator in steps 1–6 or 9 failed; terminal `GATE_IN_FAILED`.
    Failed(ConsciousObserverResult),
    /// Cancellation was observed before Gate-In completed.
    Cancelled(ConsciousObserverResult),
}

/// Uses the caller-supplied trace id verbatim if non-empty, otherwise
/// derives one from `agent_id`.
fn derive_trace_id(spawn_request: &SpawnRequest, agent_id: &AgentId) -> TraceId {
    match spawn_request.trace_id.as_deref().filter(|s| !s.is_empty()) {
        Some(supplied) => TraceId::from_checked_nonempty(supplied),
        None => TraceId::derived_from(agent_id),
    }
}

/// Builds the terminal result for a Gate-In collaborator failure.
fn failed_result(trace_id: TraceId, agent_id: AgentId, mode: ProcessingMode, duration_ms: u64, message: String) -> ConsciousObserverResult {
    ConsciousObserverResult {
        trace_id,
        agent_id,
        mode,
        final_phase: ObserverPhase::GateInFailed,
        filtered_output: None,
        partial_output: None,
        escalation_guidance: Some(EscalationGuidance {
            description: message,
            missing_capabilities: Vec::new(),
        }),
        grounding_report: None,
        calibrated_confidence: None,
        durations: PhaseDurations {
            gate_in_ms: duration_ms,
            execute_ms: 0,
            gate_out_ms: 0,
        },
        total_tokens: 0,
        total_cycles: 0,
        was_simplified: false,
        was_escalated: false,
        was_aborted: false,
    }
}

/// Builds the terminal result for cancellation observed during Gate-In.
fn cancelled_result(trace_id: TraceId, agent_id: AgentId, mode: ProcessingMode, duration_ms: u64) -> ConsciousObserverResult {
    ConsciousObserverResult {
        trace_id,
        agent_id,
        mode,
        final_phase: ObserverPhase::GateInCancelled,
        filtered_output: None,
        partial_output: None,
        escalation_guidance: None,
        grounding_report: None,
        calibrated_confidence: None,
        durations: PhaseDurations {
            gate_in_ms: duration_ms,
            execute_ms: 0,
            gate_out_ms: 0,
        },
        total_tokens: 0,
        total_cycles: 0,
        was_simplified: false,
        was_escalated: false,
        was_aborted: false,
    }
}

/// Collaborator handles Gate-In needs. Bundled so `run_gate_in`'s signature
/// stays readable as the number of collaborators grows.
pub struct GateInCollaborators<'a> {
    /// Agent genesis / identity loading.
    pub genesis: &'a dyn AgentGenesis,
    /// Modality ingest.
    pub modality: &'a dyn ModalityIngest,
    /// Classification.
    pub classifier: &'a dyn Classifier,
    /// Intent/sentiment/urgency scoring.
    pub scorer: &'a dyn CognitiveScorer,
    /// Entity extraction.
    pub entities: &'a dyn EntityExtractor,
    /// Capability self-assessment.
    pub self_model: &'a dyn SelfModel,
    /// Host pressure source.
    pub pressure: &'a dyn PressureSource,
    /// Activation map computation.
    pub activation_router: &'a dyn ActivationRouter,
}

/// Runs Gate-In to completion (steps 1–10 of §4.4).
///
/// `elapsed_ms` is a host-supplied function returning milliseconds elapsed
/// since `start`; Gate-In never reads a wall clock itself.
#[allow(clippy::too_many_arguments, reason = "mirrors the engine's single Gate-In entry point; splitting would scatter the phase across helper signatures that all need the same context")]
pub async fn run_gate_in(
    raw_input: &RawInput,
    spawn_request: &SpawnRequest,
    config: &ObserverEngineConfig,
    cancellation: &CancellationToken,
    collaborators: &GateInCollaborators<'_>,
    elapsed_ms: impl FnOnce() -> u64,
) -> GateInOutcome {
    match run_gate_in_inner(raw_input, spawn_request, config, cancellation, collaborators).await {
        Ok(GateInStep::Proceed(result)) => GateInOutcome::Proceed(GateInResult {
            duration_ms: elapsed_ms(),
            ..result
        }),
        Ok(GateInStep::CapabilityEscalated {
            trace_id,
            agent_id,
            mode,
            gap_description,
            missing,
        }) => {
            let duration_ms = elapsed_ms();
            warn!(%trace_id, "capability gap detected, escalating without Gate-Out");
            GateInOutcome::CapabilityEscalated(ConsciousObserverResult {
                trace_id,
                agent_id,
                mode,
                final_phase: ObserverPhase::Escalated,
                filtered_output: None,
                partial_output: None,
                escalation_guidance: Some(EscalationGuidance {
                    description: gap_description,
                    missing_capabilities: missing,
                }),
                grounding_report: None,
                calibrated_confidence: None,
                durations: PhaseDurations {
                    gate_in_ms: duration_ms,
                    execute_ms: 0,
                    gate_out_ms: 0,
                },
                total_tokens: 0,
                total_cycles: 0,
                was_simplified: false,
                was_escalated: true,
                was_aborted: false,
            })
        }
        Ok(GateInStep::Cancelled { trace_id, agent_id, mode }) => {
            GateInOutcome::Cancelled(cancelled_result(trace_id, agent_id, mode, elapsed_ms()))
        }
        Err((trace_id, agent_id, mode, error)) => {
            warn!(%trace_id, %error, "Gate-In failed");
            GateInOutcome::Failed(failed_result(trace_id, agent_id, mode, elapsed_ms(), error.to_string()))
        }
    }
}

/// Internal result of [`run_gate_in_inner`], before `elapsed_ms` is applied.
enum GateInStep {
    /// Steps 1–10 completed normally.
    Proceed(GateInResult),
    /// Step 7 found `can_handle == false`.
    CapabilityEscalated {
        /// Trace id for this invocation.
        trace_id: TraceId,
        /// Agent id assigned during genesis.
        agent_id: AgentId,
        /// Mode to record on the escalated result.
        mode: ProcessingMode,
        /// Free-text description of the capability gap.
        gap_description: String,
        /// Missing skills and tools, combined.
        missing: Vec<String>,
    },
    /// Cancellation was observed before Gate-In completed.
    Cancelled {
        /// Trace id for this invocation.
        trace_id: TraceId,
        /// Agent id assigned during genesis.
        agent_id: AgentId,
        /// Mode to record on the cancelled result.
        mode: ProcessingMode,
    },
}

/// Context carried alongside a Gate-In collaborator failure so a terminal
/// result can still be constructed.
type GateInFailure = (TraceId, AgentId, ProcessingMode, GateInError);

/// Runs steps 1–10 without applying the host-supplied elapsed-time callback.
async fn run_gate_in_inner(
    raw_input: &RawInput,
    spawn_request: &SpawnRequest,
    config: &ObserverEngineConfig,
    cancellation: &CancellationToken,
    collaborators: &GateInCollaborators<'_>,
) -> Result<GateInStep, GateInFailure> {
    // Step 1: agent genesis.
    let (agent_id, identity) = collaborators
        .genesis
        .initialize(spawn_request)
        .await
        .map_err(|e| (TraceId::derived_from("genesis-failure"), AgentId::new("unknown"), ProcessingMode::Fast, GateInError::from(e)))?;
    let trace_id = derive_trace_id(spawn_request, &agent_id);
    info!(%trace_id, %agent_id, role = %identity.role, "agent genesis complete");

    if cancellation.is_cancelled() {
        return Ok(GateInStep::Cancelled {
            trace_id,
            agent_id,
            mode: ProcessingMode::Fast,
        });
    }

    // Step 2: modality ingest.
    let modality_output: ModalityOutput = collaborators
        .modality
        .ingest(raw_input)
        .await
        .map_err(|e| (trace_id.clone(), agent_id.clone(), ProcessingMode::Fast, GateInError::from(e)))?;

    // Step 3: classify.
    let classification = collaborators
        .classifier
        .classify(&modality_output)
        .await
        .map_err(|e| (trace_id.clone(), agent_id.clone(), ProcessingMode::Fast, GateInError::from(e)))?;

    // Step 4: primitive scorers.
    let labels = collaborators
        .scorer
        .score(modality_output.normalized_text.as_deref().unwrap_or_default(), &classification)
        .await
        .map_err(|e| (trace_id.clone(), agent_id.clone(), ProcessingMode::Fast, GateInError::from(e)))?;

    // Step 5: entity extraction, gated by configuration.
    let extracted = if config.entity_recognition_enabled {
        collaborators
            .entities
            .extract(modality_output.normalized_text.as_deref().unwrap_or_default())
            .await
            .map_err(|e| (trace_id.clone(), agent_id.clone(), ProcessingMode::Fast, GateInError::from(e)))?
    } else {
        debug!(%trace_id, "entity recognition disabled by configuration");
        ExtractedEntities::default()
    };

    // Step 6: build SignalTags via C2.
    let tags = build_signal_tags(&modality_output, &classification, &labels, &extracted);

    // Step 7: capability assessment.
    let capability = collaborators
        .self_model
        .assess(&tags, &identity)
        .await
        .map_err(|e| (trace_id.clone(), agent_id.clone(), ProcessingMode::Fast, GateInError::from(e)))?;

    if !capability.can_handle {
        let gap = capability.gap.clone().unwrap_or_default();
        let mut missing = gap.missing_skills.clone();
        missing.extend(gap.missing_tools.clone());
        return Ok(GateInStep::CapabilityEscalated {
            trace_id,
            agent_id,
            mode: ProcessingMode::Fast,
            gap_description: "capability assessment returned can_handle = false".to_owned(),
            missing,
        });
    }

    // Step 8: host pressure, defaulting to 0.0 on any read failure.
    let pressure = collaborators.pressure.read().await.unwrap_or_else(|error| {
        debug!(%trace_id, %error, "pressure source unavailable, defaulting to 0.0");
        0.0
    });

    // Step 9: activation map.
    let activation_map = collaborators
        .activation_router
        .compute(&tags, &capability, pressure)
        .await
        .map_err(|e| (trace_id.clone(), agent_id.clone(), ProcessingMode::Fast, GateInError::from(e)))?;

    // Step 10: translate complexity to ProcessingMode. CRITICAL urgency
    // forces EMERGENCY regardless of the derived complexity level.
    let mode = if tags.urgency == UrgencyLevel::Critical {
        ProcessingMode::Emergency
    } else {
        ProcessingMode::from(activation_map.complexity)
    };
    if mode == ProcessingMode::Emergency && activation_map.complexity != ComplexityLevel::Critical {
        warn!(%trace_id, "CRITICAL urgency forced EMERGENCY mode despite lower derived complexity");
    }

    info!(%trace_id, ?mode, complexity = ?activation_map.complexity, "Gate-In selected processing mode");

    Ok(GateInStep::Proceed(GateInResult {
        trace_id,
        agent_id,
        identity,
        tags,
        capability,
        activation_map,
        mode,
        duration_ms: 0,
    }))
}
