//! Orchestrator Entry (C8): composes Gate-In → Mode Dispatcher → Gate-Out,
//! tracks per-phase timings, and assembles the final result. See §4.8.

use tracing::info;
use tracing::warn;

use crate::core::ActivationMap;
use crate::core::CalibratedConfidence;
use crate::core::ConsciousObserverResult;
use crate::core::EscalationGuidance;
use crate::core::GroundingReport;
use crate::core::IdentityContext;
use crate::core::MonotonicMillis;
use crate::core::ObserverPhase;
use crate::core::PhaseDurations;
use crate::core::ProcessingMode;
use crate::core::RawInput;
use crate::core::SpawnRequest;
use crate::core::identifiers::OutputId;
use crate::core::tool_output::ToolOutput;
use crate::interfaces::ActivationRouter;
use crate::interfaces::AdvancedPlanning;
use crate::interfaces::AgentGenesis;
use crate::interfaces::CalibrationHistoryStore;
use crate::interfaces::Calibrator;
use crate::interfaces::Classifier;
use crate::interfaces::CognitiveLoadMonitor;
use crate::interfaces::CognitiveScorer;
use crate::interfaces::EntityExtractor;
use crate::interfaces::EvidenceRef;
use crate::interfaces::GraphSynthesizer;
use crate::interfaces::GroundingVerifier;
use crate::interfaces::LifecycleSink;
use crate::interfaces::ModalityIngest;
use crate::interfaces::NoiseGateFilter;
use crate::interfaces::OodaLoop;
use crate::interfaces::PressureSource;
use crate::interfaces::ReflectionGuardrails;
use crate::interfaces::RetryBudgetStore;
use crate::interfaces::SelfModel;
use crate::interfaces::TaskDecomposition;
use crate::runtime::cancellation::CancellationToken;
use crate::runtime::config::ObserverEngineConfig;
use crate::runtime::gate_in::GateInCollaborators;
use crate::runtime::gate_in::GateInOutcome;
use crate::runtime::gate_in::GateInResult;
use crate::runtime::gate_in::run_gate_in;
use crate::runtime::gate_out::GateOutCollaborators;
use crate::runtime::gate_out::GateOutPass;
use crate::runtime::gate_out::run_gate_out_once;
use crate::runtime::mode_dispatch::DispatchOutcome;
use crate::runtime::mode_dispatch::ExecuteCollaborators;
use crate::runtime::mode_dispatch::ExecuteResult;
use crate::runtime::mode_dispatch::dispatch_emergency;
use crate::runtime::mode_dispatch::dispatch_fast;
use crate::runtime::mode_dispatch::dispatch_full;
use crate::runtime::mode_dispatch::dispatch_standard;

/// A stated confidence assumed for the synthesized artifact.
///
/// `runCycle`'s contract (§6) does not itself emit a stated confidence
/// alongside its artifacts, so the orchestrator supplies a neutral value
/// here; a deployment wiring a real producing collaborator would thread its
/// own stated confidence through `ArtifactsDelta` instead.
const DEFAULT_STATED_CONFIDENCE: f64 = 0.75;

/// Reserved for construction-time failures this crate cannot express as a
/// terminal [`ConsciousObserverResult`] (§4.10). Every other outcome —
/// including every collaborator failure, cancellation, and policy decision
/// — resolves to `Ok` with a fully-formed, terminal result.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ObserverError {
    /// Gate-In produced an `IdentityContext` that violates a construction
    /// invariant (e.g. an empty role) before any terminal result could be
    /// built from it.
    #[error("corrupted identity context: {0}")]
    CorruptedIdentity(String),
}

/// Every collaborator handle the orchestrator holds for one `process()` call.
pub struct ObserverCollaborators<'a> {
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
    /// Task decomposition (STANDARD seed, FULL planning stack).
    pub decomposition: &'a dyn TaskDecomposition,
    /// Graph synthesis (FULL only).
    pub graph_synthesizer: &'a dyn GraphSynthesizer,
    /// Advanced planning (FULL only).
    pub advanced_planning: &'a dyn AdvancedPlanning,
    /// Pre-execution reflection guard (FULL only).
    pub reflection: &'a dyn ReflectionGuardrails,
    /// The inner execution loop's single-cycle primitive.
    pub ooda: &'a dyn OodaLoop,
    /// The cognitive-load monitor.
    pub monitor: &'a dyn CognitiveLoadMonitor,
    /// Observable side-effect sink for EMERGENCY's lifecycle-panic signal.
    pub lifecycle: &'a dyn LifecycleSink,
    /// Grounding verification.
    pub grounding: &'a dyn GroundingVerifier,
    /// Confidence calibration.
    pub calibrator: &'a dyn Calibrator,
    /// The output filter.
    pub filter: &'a dyn NoiseGateFilter,
    /// The Gate-Out retry-budget store.
    pub retry_budget: &'a dyn RetryBudgetStore,
    /// The calibration-history store.
    pub calibration_history: &'a dyn CalibrationHistoryStore,
}

impl<'a> ObserverCollaborators<'a> {
    /// Narrows to the handles [`crate::runtime::gate_in::run_gate_in`] needs.
    fn as_gate_in(&self) -> GateInCollaborators<'a> {
        GateInCollaborators {
            genesis: self.genesis,
            modality: self.modality,
            classifier: self.classifier,
            scorer: self.scorer,
            entities: self.entities,
            self_model: self.self_model,
            pressure: self.pressure,
            activation_router: self.activation_router,
        }
    }

    /// Narrows to the handles the mode dispatchers need.
    fn as_execute(&self) -> ExecuteCollaborators<'a> {
        ExecuteCollaborators {
            decomposition: self.decomposition,
            graph_synthesizer: self.graph_synthesizer,
            advanced_planning: self.advanced_planning,
            reflection: self.reflection,
            ooda: self.ooda,
            monitor: self.monitor,
            lifecycle: self.lifecycle,
        }
    }

    /// Narrows to the handles Gate-Out needs.
    fn as_gate_out(&self) -> GateOutCollaborators<'a> {
        GateOutCollaborators {
            grounding: self.grounding,
            calibrator: self.calibrator,
            filter: self.filter,
        }
    }
}

/// The orchestrator: holds collaborator handles and configuration for one
/// `process()` invocation.
pub struct Observer<'a> {
    /// Collaborator handles.
    pub collaborators: ObserverCollaborators<'a>,
    /// Runtime configuration.
    pub config: ObserverEngineConfig,
}

/// Builds a terminal result carrying no Gate-Out fields (used for outcomes
/// that never reach Gate-Out: capability-gap and planning-veto escalation).
#[allow(clippy::too_many_arguments, reason = "mirrors the single terminal-result constructor used by every non-Gate-Out exit path")]
fn escalated_without_gate_out(
    gate_in: &GateInResult,
    description: String,
    missing_capabilities: Vec<String>,
    gate_in_ms: u64,
    execute_ms: u64,
) -> ConsciousObserverResult {
    ConsciousObserverResult {
        trace_id: gate_in.trace_id.clone(),
        agent_id: gate_in.agent_id.clone(),
        mode: gate_in.mode,
        final_phase: ObserverPhase::Escalated,
        filtered_output: None,
        partial_output: None,
        escalation_guidance: Some(EscalationGuidance { description, missing_capabilities }),
        grounding_report: None,
        calibrated_confidence: None,
        durations: PhaseDurations { gate_in_ms, execute_ms, gate_out_ms: 0 },
        total_tokens: 0,
        total_cycles: 0,
        was_simplified: false,
        was_escalated: true,
        was_aborted: false,
    }
}

/// Appends a retry hint derived from rejection guidance to an objective.
fn hinted_objective(objective: &str, hint: &str) -> String {
    format!("{objective}\n\nRetry guidance: {hint}")
}

impl Observer<'_> {
    /// Re-runs the mode dispatcher for `mode` with `objective`, reusing the
    /// activation map Gate-In originally selected (a retry starts execution
    /// fresh for the same mode; it does not resume a prior SIMPLIFY
    /// downgrade, which applied only to the execution attempt it occurred
    /// in).
    async fn dispatch_for_mode(
        &self,
        mode: ProcessingMode,
        objective: &str,
        constraints: &[String],
        identity: &IdentityContext,
        activation_map: ActivationMap,
        trace_id: &crate::core::TraceId,
        cancellation: &CancellationToken,
    ) -> DispatchOutcome {
        let execute_collaborators = self.collaborators.as_execute();
        match mode {
            ProcessingMode::Fast => dispatch_fast(objective, activation_map, &self.config, cancellation, &execute_collaborators).await,
            ProcessingMode::Standard => dispatch_standard(objective, activation_map, &self.config, cancellation, &execute_collaborators).await,
            ProcessingMode::Full => {
                dispatch_full(objective, constraints, identity, activation_map, &self.config, cancellation, &execute_collaborators).await
            }
            ProcessingMode::Emergency => {
                dispatch_emergency(objective, trace_id, activation_map, &self.config, cancellation, &execute_collaborators).await
            }
        }
    }

    /// Runs one invocation end to end: Gate-In → Mode Dispatcher → Gate-Out.
    ///
    /// `now` supplies the current monotonic time at each phase boundary; the
    /// engine itself never reads a wall clock (§9, `core::time`).
    ///
    /// # Errors
    ///
    /// Returns [`ObserverError`] only for the narrow set of construction-time
    /// failures that cannot be expressed as a terminal result (§4.10); every
    /// other outcome is `Ok` with a fully-formed, terminal result.
    pub async fn process(
        &self,
        raw_input: &RawInput,
        spawn_request: &SpawnRequest,
        evidence: &[EvidenceRef],
        cancellation: &CancellationToken,
        now: &(dyn Fn() -> MonotonicMillis + Sync),
    ) -> Result<ConsciousObserverResult, ObserverError> {
        let invocation_start = now();
        let gate_in_collaborators = self.collaborators.as_gate_in();
        let gate_in_outcome = run_gate_in(raw_input, spawn_request, &self.config, cancellation, &gate_in_collaborators, || {
            now().saturating_since(invocation_start)
        })
        .await;

        let gate_in = match gate_in_outcome {
            GateInOutcome::Proceed(result) => result,
            GateInOutcome::CapabilityEscalated(result) | GateInOutcome::Failed(result) | GateInOutcome::Cancelled(result) => {
                return Ok(result);
            }
        };

        if gate_in.identity.role.is_empty() {
            return Err(ObserverError::CorruptedIdentity("identity role must not be empty".to_owned()));
        }

        let execute_start = now();
        let dispatch_outcome = self
            .dispatch_for_mode(
                gate_in.mode,
                &spawn_request.objective,
                &spawn_request.constraints,
                &gate_in.identity,
                gate_in.activation_map.clone(),
                &gate_in.trace_id,
                cancellation,
            )
            .await;
        let execute_ms = now().saturating_since(execute_start);

        let execute_result = match dispatch_outcome {
            DispatchOutcome::Completed(result) => result,
            DispatchOutcome::PlanningVetoed { reason } => {
                warn!(trace_id = %gate_in.trace_id, %reason, "planning veto, escalating without Gate-Out");
                return Ok(escalated_without_gate_out(&gate_in, reason, Vec::new(), gate_in.duration_ms, execute_ms));
            }
        };

        self.run_gate_out_with_retries(&gate_in, spawn_request, evidence, execute_result, execute_ms, cancellation, now)
            .await
    }

    /// Runs Gate-Out, retrying the mode dispatcher on quality rejection up
    /// to `gate_out_max_retries` times, per §4.7.
    #[allow(clippy::too_many_arguments, reason = "threads the full retry-loop context; splitting would require a bespoke struct with no reuse elsewhere")]
    async fn run_gate_out_with_retries(
        &self,
        gate_in: &GateInResult,
        spawn_request: &SpawnRequest,
        evidence: &[EvidenceRef],
        mut execute_result: ExecuteResult,
        execute_ms: u64,
        cancellation: &CancellationToken,
        now: &(dyn Fn() -> MonotonicMillis + Sync),
    ) -> Result<ConsciousObserverResult, ObserverError> {
        let output_id = OutputId::new(format!("{}-output", gate_in.trace_id));
        let gate_out_collaborators = self.collaborators.as_gate_out();

        let mut total_tokens = execute_result.loop_result.total_tokens;
        let mut total_cycles = execute_result.loop_result.total_cycles;
        let mut was_simplified = execute_result.was_simplified;
        let mut was_escalated = execute_result.was_escalated;
        let mut was_aborted = execute_result.was_aborted;
        let mut gate_out_ms_total: u64 = 0;
        let mut execute_ms_total = execute_ms;

        loop {
            let history = self.collaborators.calibration_history.history_for(&gate_in.tags.domain).await;
            let tool_output = ToolOutput {
                output_id: output_id.clone(),
                content: execute_result.synthesized_artifact.clone(),
                metadata: serde_json::Value::Null,
                stated_confidence: DEFAULT_STATED_CONFIDENCE,
                source_node_id: None,
                source_loop_id: gate_in.trace_id.to_string(),
            };

            let gate_out_start = now();
            let pass = run_gate_out_once(&tool_output, evidence, &gate_in.identity, &gate_in.tags.domain, &history, &gate_out_collaborators).await;
            gate_out_ms_total += now().saturating_since(gate_out_start);

            let (rejected, grounding, calibrated) = match pass {
                Ok(GateOutPass::Passed { filtered, grounding, calibrated }) => {
                    self.collaborators.retry_budget.clear(&output_id).await;
                    info!(trace_id = %gate_in.trace_id, "Gate-Out passed");
                    return Ok(success_result(
                        gate_in,
                        filtered,
                        grounding,
                        calibrated,
                        execute_ms_total,
                        gate_out_ms_total,
                        total_tokens,
                        total_cycles,
                        was_simplified,
                        was_escalated,
                        was_aborted,
                    ));
                }
                Ok(GateOutPass::Rejected { rejected, grounding, calibrated }) => (rejected, grounding, calibrated),
                Err(error) => {
                    self.collaborators.retry_budget.clear(&output_id).await;
                    warn!(trace_id = %gate_in.trace_id, %error, "Gate-Out collaborator failed, escalating");
                    return Ok(quality_error_result(
                        gate_in,
                        &execute_result,
                        error.to_string(),
                        execute_ms_total,
                        gate_out_ms_total,
                        total_tokens,
                        total_cycles,
                        was_simplified,
                        was_aborted,
                    ));
                }
            };

            if cancellation.is_cancelled() {
                self.collaborators.retry_budget.clear(&output_id).await;
                return Ok(gate_out_cancelled_result(
                    gate_in,
                    &execute_result,
                    execute_ms_total,
                    gate_out_ms_total,
                    total_tokens,
                    total_cycles,
                    was_simplified,
                    was_aborted,
                ));
            }

            match self.collaborators.retry_budget.try_consume(&output_id, self.config.gate_out_max_retries).await {
                Some(used) => {
                    warn!(trace_id = %gate_in.trace_id, used, "Gate-Out rejected, retrying mode dispatcher");
                    let hinted = hinted_objective(&execute_result.objective, &rejected.retry_guidance);
                    let retry_start = now();
                    let retry_outcome = self
                        .dispatch_for_mode(
                            gate_in.mode,
                            &hinted,
                            &spawn_request.constraints,
                            &gate_in.identity,
                            gate_in.activation_map.clone(),
                            &gate_in.trace_id,
                            cancellation,
                        )
                        .await;
                    execute_ms_total += now().saturating_since(retry_start);
                    match retry_outcome {
                        DispatchOutcome::Completed(retried) => {
                            total_tokens += retried.loop_result.total_tokens;
                            total_cycles += retried.loop_result.total_cycles;
                            was_simplified |= retried.was_simplified;
                            was_escalated |= retried.was_escalated;
                            was_aborted |= retried.was_aborted;
                            execute_result = retried;
                        }
                        DispatchOutcome::PlanningVetoed { reason } => {
                            self.collaborators.retry_budget.clear(&output_id).await;
                            warn!(trace_id = %gate_in.trace_id, %reason, "retry's planning veto, escalating");
                            return Ok(escalated_with_partial(
                                gate_in,
                                reason,
                                rejected.failed_dimensions,
                                Some(grounding),
                                Some(calibrated),
                                execute_result.synthesized_artifact.clone(),
                                execute_ms_total,
                                gate_out_ms_total,
                                total_tokens,
                                total_cycles,
                                was_simplified,
                                was_aborted,
                            ));
                        }
                    }
                }
                None => {
                    self.collaborators.retry_budget.clear(&output_id).await;
                    warn!(trace_id = %gate_in.trace_id, "Gate-Out retry budget exhausted, escalating");
                    return Ok(escalated_with_partial(
                        gate_in,
                        rejected.retry_guidance,
                        rejected.failed_dimensions,
                        Some(grounding),
                        Some(calibrated),
                        execute_result.synthesized_artifact.clone(),
                        execute_ms_total,
                        gate_out_ms_total,
                        total_tokens,
                        total_cycles,
                        was_simplified,
                        was_aborted,
                    ));
                }
            }
        }
    }
}

/// Builds the terminal result for a Gate-Out pass.
#[allow(clippy::too_many_arguments, reason = "assembles every field of the single success result constructor")]
fn success_result(
    gate_in: &GateInResult,
    filtered: crate::core::FilteredOutput,
    grounding: GroundingReport,
    calibrated: CalibratedConfidence,
    execute_ms: u64,
    gate_out_ms: u64,
    total_tokens: u64,
    total_cycles: u32,
    was_simplified: bool,
    was_escalated: bool,
    was_aborted: bool,
) -> ConsciousObserverResult {
    ConsciousObserverResult {
        trace_id: gate_in.trace_id.clone(),
        agent_id: gate_in.agent_id.clone(),
        mode: gate_in.mode,
        final_phase: ObserverPhase::GateOut,
        filtered_output: Some(filtered),
        partial_output: None,
        escalation_guidance: None,
        grounding_report: Some(grounding),
        calibrated_confidence: Some(calibrated),
        durations: PhaseDurations { gate_in_ms: gate_in.duration_ms, execute_ms, gate_out_ms },
        total_tokens,
        total_cycles,
        was_simplified,
        was_escalated,
        was_aborted,
    }
}

/// Builds the terminal result for exhausted Gate-Out retries or a
/// retry-mode planning veto, carrying the partial artifact and whatever
/// grounding/calibration was last observed.
#[allow(clippy::too_many_arguments, reason = "assembles every field of the single escalation-with-partial-output constructor")]
fn escalated_with_partial(
    gate_in: &GateInResult,
    description: String,
    failed_dimensions: Vec<String>,
    grounding: Option<GroundingReport>,
    calibrated: Option<CalibratedConfidence>,
    artifact: String,
    execute_ms: u64,
    gate_out_ms: u64,
    total_tokens: u64,
    total_cycles: u32,
    was_simplified: bool,
    was_aborted: bool,
) -> ConsciousObserverResult {
    ConsciousObserverResult {
        trace_id: gate_in.trace_id.clone(),
        agent_id: gate_in.agent_id.clone(),
        mode: gate_in.mode,
        final_phase: ObserverPhase::Escalated,
        filtered_output: None,
        partial_output: Some(artifact),
        escalation_guidance: Some(EscalationGuidance { description, missing_capabilities: failed_dimensions }),
        grounding_report: grounding,
        calibrated_confidence: calibrated,
        durations: PhaseDurations { gate_in_ms: gate_in.duration_ms, execute_ms, gate_out_ms },
        total_tokens,
        total_cycles,
        was_simplified,
        was_escalated: true,
        was_aborted,
    }
}

/// Builds the terminal result for a Gate-Out collaborator failure.
#[allow(clippy::too_many_arguments, reason = "assembles every field of the single quality-error result constructor")]
fn quality_error_result(
    gate_in: &GateInResult,
    execute_result: &ExecuteResult,
    message: String,
    execute_ms: u64,
    gate_out_ms: u64,
    total_tokens: u64,
    total_cycles: u32,
    was_simplified: bool,
    was_aborted: bool,
) -> ConsciousObserverResult {
    ConsciousObserverResult {
        trace_id: gate_in.trace_id.clone(),
        agent_id: gate_in.agent_id.clone(),
        mode: gate_in.mode,
        final_phase: ObserverPhase::Escalated,
        filtered_output: None,
        partial_output: Some(execute_result.synthesized_artifact.clone()),
        escalation_guidance: Some(EscalationGuidance { description: message, missing_capabilities: Vec::new() }),
        grounding_report: None,
        calibrated_confidence: None,
        durations: PhaseDurations { gate_in_ms: gate_in.duration_ms, execute_ms, gate_out_ms },
        total_tokens,
        total_cycles,
        was_simplified,
        was_escalated: true,
        was_aborted,
    }
}

/// Builds the terminal result for cancellation observed during Gate-Out.
#[allow(clippy::too_many_arguments, reason = "assembles every field of the single cancellation result constructor")]
fn gate_out_cancelled_result(
    gate_in: &GateInResult,
    execute_result: &ExecuteResult,
    execute_ms: u64,
    gate_out_ms: u64,
    total_tokens: u64,
    total_cycles: u32,
    was_simplified: bool,
    was_aborted: bool,
) -> ConsciousObserverResult {
    ConsciousObserverResult {
        trace_id: gate_in.trace_id.clone(),
        agent_id: gate_in.agent_id.clone(),
        mode: gate_in.mode,
        final_phase: ObserverPhase::GateOutCancelled,
        filtered_output: None,
        partial_output: Some(execute_result.synthesized_artifact.clone()),
        escalation_guidance: None,
        grounding_report: None,
        calibrated_confidence: None,
        durations: PhaseDurations { gate_in_ms: gate_in.duration_ms, execute_ms, gate_out_ms },
        total_tokens,
        total_cycles,
        was_simplified,
        was_escalated: false,
        was_aborted,
    }
}
