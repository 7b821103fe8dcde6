//! Mode Dispatchers (C6): the four pipeline variants (FAST / STANDARD / FULL
//! / EMERGENCY) that assemble preparatory work around the monitored
//! execution loop (C5). See §4.6.

use std::collections::VecDeque;

use tracing::info;
use tracing::warn;

use crate::core::ActivationMap;
use crate::core::Decision;
use crate::core::IdentityContext;
use crate::core::LoopResult;
use crate::core::ProcessingMode;
use crate::core::TraceId;
use crate::interfaces::AdvancedPlanning;
use crate::interfaces::AgentState;
use crate::interfaces::CognitiveLoadMonitor;
use crate::interfaces::ExecutableDag;
use crate::interfaces::GraphSynthesizer;
use crate::interfaces::LifecycleEvent;
use crate::interfaces::LifecycleSink;
use crate::interfaces::MemoryHandle;
use crate::interfaces::OodaLoop;
use crate::interfaces::PlanningError;
use crate::interfaces::ReflectionGuardrails;
use crate::interfaces::ReflectionVerdict;
use crate::interfaces::TaskDecomposition;
use crate::runtime::cancellation::CancellationToken;
use crate::runtime::config::ObserverEngineConfig;
use crate::runtime::monitored_loop::LoopCollaborators;
use crate::runtime::monitored_loop::LoopInputs;
use crate::runtime::monitored_loop::run_monitored_loop;

/// Synthesized artifacts are deduplicated and bounded to this many
/// characters before being handed to Gate-Out.
const MAX_SYNTHESIZED_ARTIFACT_CHARS: usize = 16_384;

/// Collaborator handles a mode dispatcher needs. FAST/STANDARD/EMERGENCY use
/// only the loop-level handles; FULL additionally uses the planning stack.
pub struct ExecuteCollaborators<'a> {
    /// Task decomposition (STANDARD seed, FULL planning stack).
    pub decomposition: &'a dyn TaskDecomposition,
    /// Graph synthesis (FULL only).
    pub graph_synthesizer: &'a dyn GraphSynthesizer,
    /// Advanced planning: tool binding and hypothesis generation (FULL only).
    pub advanced_planning: &'a dyn AdvancedPlanning,
    /// Pre-execution reflection guard (FULL only).
    pub reflection: &'a dyn ReflectionGuardrails,
    /// The inner execution loop's single-cycle primitive.
    pub ooda: &'a dyn OodaLoop,
    /// The cognitive-load monitor consulted after every cycle.
    pub monitor: &'a dyn CognitiveLoadMonitor,
    /// Observable side-effect sink for the EMERGENCY lifecycle-panic signal.
    pub lifecycle: &'a dyn LifecycleSink,
}

/// Everything a mode dispatcher produces for Gate-Out to consume.
pub struct ExecuteResult {
    /// The monitored loop's synthesized summary.
    pub loop_result: LoopResult,
    /// Concatenated, deduplicated, length-bounded artifact text.
    pub synthesized_artifact: String,
    /// The loop's final recent-decisions buffer, for diagnostics.
    pub recent_decisions: VecDeque<Decision>,
    /// The loop's final recent-outputs buffer, for diagnostics.
    pub recent_outputs: VecDeque<String>,
    /// The objective actually pursued (may be seeded/augmented by planning).
    pub objective: String,
    /// The activation map in effect at loop termination.
    pub final_activation_map: ActivationMap,
    /// Set if the loop performed at least one SIMPLIFY downgrade.
    pub was_simplified: bool,
    /// Set if the loop (or FULL-mode planning) escalated.
    pub was_escalated: bool,
    /// Set if the loop aborted.
    pub was_aborted: bool,
}

/// A mode dispatcher's outcome: either a completed monitored execution, or a
/// FULL-mode short-circuit before the loop ever ran.
pub enum DispatchOutcome {
    /// The monitored loop ran to termination.
    Completed(ExecuteResult),
    /// FULL-mode preparation short-circuited: either the reflection guard
    /// issued a hard no-go, or a planning collaborator itself failed.
    /// Execution never started; the caller escalates directly.
    PlanningVetoed {
        /// Free-text reason the plan could not proceed.
        reason: String,
    },
}

/// Deduplicates `emitted` (preserving first-occurrence order), joins with a
/// blank line, and truncates to [`MAX_SYNTHESIZED_ARTIFACT_CHARS`].
fn synthesize_artifact(emitted: &[String]) -> String {
    let mut seen = std::collections::HashSet::new();
    let mut deduped = Vec::new();
    for line in emitted {
        if seen.insert(line.clone()) {
            deduped.push(line.clone());
        }
    }
    let mut joined = deduped.join("\n\n");
    if joined.len() > MAX_SYNTHESIZED_ARTIFACT_CHARS {
        let mut boundary = MAX_SYNTHESIZED_ARTIFACT_CHARS;
        while boundary > 0 && !joined.is_char_boundary(boundary) {
            boundary -= 1;
        }
        joined.truncate(boundary);
    }
    joined
}

/// Wraps a completed [`crate::runtime::monitored_loop::LoopOutcome`] into an
/// [`ExecuteResult`].
fn finish(outcome: crate::runtime::monitored_loop::LoopOutcome, objective: String) -> ExecuteResult {
    let synthesized_artifact = synthesize_artifact(&outcome.loop_result.artifacts);
    ExecuteResult {
        loop_result: outcome.loop_result,
        synthesized_artifact,
        recent_decisions: outcome.recent_decisions,
        recent_outputs: outcome.recent_outputs,
        objective,
        final_activation_map: outcome.final_activation_map,
        was_simplified: outcome.was_simplified,
        was_escalated: outcome.was_escalated,
        was_aborted: outcome.was_aborted,
    }
}

/// FAST dispatch (TRIVIAL / SIMPLE): bypass planning entirely.
pub async fn dispatch_fast(
    objective: &str,
    activation_map: ActivationMap,
    config: &ObserverEngineConfig,
    cancellation: &CancellationToken,
    collaborators: &ExecuteCollaborators<'_>,
) -> DispatchOutcome {
    info!("FAST dispatch: bypassing planning");
    let dag = ExecutableDag::empty();
    let loop_collaborators = LoopCollaborators {
        ooda: collaborators.ooda,
        monitor: collaborators.monitor,
    };
    let outcome = run_monitored_loop(
        LoopInputs {
            objective: objective.to_owned(),
            initial_state: AgentState::default(),
            memory: MemoryHandle::default(),
            activation_map,
            mode: ProcessingMode::Fast,
        },
        &dag,
        config,
        cancellation,
        &loop_collaborators,
    )
    .await;
    DispatchOutcome::Completed(finish(outcome, objective.to_owned()))
}

/// STANDARD dispatch (MODERATE): decompose, then run with the decomposition
/// result seeded into the objective. No DAG synthesis.
pub async fn dispatch_standard(
    objective: &str,
    activation_map: ActivationMap,
    config: &ObserverEngineConfig,
    cancellation: &CancellationToken,
    collaborators: &ExecuteCollaborators<'_>,
) -> DispatchOutcome {
    let sub_tasks = match collaborators.decomposition.decompose(objective).await {
        Ok(tasks) => tasks,
        Err(error) => {
            warn!(%error, "STANDARD dispatch: decomposition failed, escalating");
            return DispatchOutcome::PlanningVetoed { reason: error.to_string() };
        }
    };
    let seeded_objective = seed_objective(objective, &sub_tasks);
    info!(sub_task_count = sub_tasks.len(), "STANDARD dispatch: decomposition complete");

    let dag = ExecutableDag::empty();
    let loop_collaborators = LoopCollaborators {
        ooda: collaborators.ooda,
        monitor: collaborators.monitor,
    };
    let outcome = run_monitored_loop(
        LoopInputs {
            objective: seeded_objective.clone(),
            initial_state: AgentState::default(),
            memory: MemoryHandle::default(),
            activation_map,
            mode: ProcessingMode::Standard,
        },
        &dag,
        config,
        cancellation,
        &loop_collaborators,
    )
    .await;
    DispatchOutcome::Completed(finish(outcome, seeded_objective))
}

/// Appends sub-task descriptions to the objective as a seed for the
/// monitored loop, without replacing the caller's original intent.
fn seed_objective(objective: &str, sub_tasks: &[crate::interfaces::SubTask]) -> String {
    if sub_tasks.is_empty() {
        return objective.to_owned();
    }
    let mut seeded = String::from(objective);
    seeded.push_str("\n\nSub-tasks:\n");
    for task in sub_tasks {
        seeded.push_str("- ");
        seeded.push_str(&task.description);
        seeded.push('\n');
    }
    seeded
}

/// FULL dispatch (COMPLEX): the full planning stack, in order —
/// decomposition → graph synthesis → advanced planning (tool binding and
/// hypothesis generation, which also covers the "what-if simulation" step;
/// §6 of the specification defines no separate collaborator interface for
/// it) → reflection pre-execution check. A hard no-go from the reflection
/// guard, or any planning collaborator failure, short-circuits before the
/// loop ever runs.
pub async fn dispatch_full(
    objective: &str,
    constraints: &[String],
    identity: &IdentityContext,
    activation_map: ActivationMap,
    config: &ObserverEngineConfig,
    cancellation: &CancellationToken,
    collaborators: &ExecuteCollaborators<'_>,
) -> DispatchOutcome {
    let sub_tasks = match collaborators.decomposition.decompose(objective).await {
        Ok(tasks) => tasks,
        Err(error) => return planning_failed("decomposition", &error),
    };

    let dag = match collaborators.graph_synthesizer.synthesize(&sub_tasks).await {
        Ok(dag) => dag,
        Err(error) => return planning_failed("graph synthesis", &error),
    };

    let planned = match collaborators.advanced_planning.plan(&sub_tasks, constraints).await {
        Ok(planned) => planned,
        Err(error) => return planning_failed("advanced planning", &error),
    };

    let verdict = match collaborators.reflection.pre(&planned, identity).await {
        Ok(verdict) => verdict,
        Err(error) => return planning_failed("reflection guard", &error),
    };
    if let ReflectionVerdict::Deny { reason } = verdict {
        warn!(%reason, "FULL dispatch: reflection guard denied the plan");
        return DispatchOutcome::PlanningVetoed { reason };
    }

    let seeded_objective = seed_objective_with_hypotheses(objective, &planned.hypotheses);
    info!(node_count = dag.nodes.len(), "FULL dispatch: planning complete, entering monitored loop");

    let loop_collaborators = LoopCollaborators {
        ooda: collaborators.ooda,
        monitor: collaborators.monitor,
    };
    let outcome = run_monitored_loop(
        LoopInputs {
            objective: seeded_objective.clone(),
            initial_state: AgentState::default(),
            memory: MemoryHandle::default(),
            activation_map,
            mode: ProcessingMode::Full,
        },
        &dag,
        config,
        cancellation,
        &loop_collaborators,
    )
    .await;
    DispatchOutcome::Completed(finish(outcome, seeded_objective))
}

/// Appends generated hypotheses to the objective, if any were produced.
fn seed_objective_with_hypotheses(objective: &str, hypotheses: &[String]) -> String {
    if hypotheses.is_empty() {
        return objective.to_owned();
    }
    let mut seeded = String::from(objective);
    seeded.push_str("\n\nHypotheses:\n");
    for hypothesis in hypotheses {
        seeded.push_str("- ");
        seeded.push_str(hypothesis);
        seeded.push('\n');
    }
    seeded
}

/// Builds a `PlanningVetoed` outcome for a planning-collaborator failure.
fn planning_failed(stage: &str, error: &PlanningError) -> DispatchOutcome {
    warn!(stage, %error, "FULL dispatch: planning collaborator failed, escalating");
    DispatchOutcome::PlanningVetoed {
        reason: format!("{stage} failed: {error}"),
    }
}

/// EMERGENCY dispatch (CRITICAL): bypass planning; run the loop under the
/// EMERGENCY constraints (§4.5's override, applied inside the monitored
/// loop itself); then unconditionally emit the lifecycle-panic signal as a
/// side effect, independent of how the loop terminated.
pub async fn dispatch_emergency(
    objective: &str,
    trace_id: &TraceId,
    activation_map: ActivationMap,
    config: &ObserverEngineConfig,
    cancellation: &CancellationToken,
    collaborators: &ExecuteCollaborators<'_>,
) -> DispatchOutcome {
    warn!(%trace_id, "EMERGENCY dispatch: bypassing planning");
    let dag = ExecutableDag::empty();
    let loop_collaborators = LoopCollaborators {
        ooda: collaborators.ooda,
        monitor: collaborators.monitor,
    };
    let outcome = run_monitored_loop(
        LoopInputs {
            objective: objective.to_owned(),
            initial_state: AgentState::default(),
            memory: MemoryHandle::default(),
            activation_map,
            mode: ProcessingMode::Emergency,
        },
        &dag,
        config,
        cancellation,
        &loop_collaborators,
    )
    .await;

    collaborators
        .lifecycle
        .emit(LifecycleEvent::EmergencyPanic {
            trace_id: trace_id.clone(),
            detail: format!("EMERGENCY loop terminated: {:?}", outcome.loop_result.termination_reason),
        })
        .await;

    DispatchOutcome::Completed(finish(outcome, objective.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::synthesize_artifact;

    #[test]
    fn synthesize_artifact_deduplicates_preserving_order() {
        let emitted = vec!["a".to_owned(), "b".to_owned(), "a".to_owned()];
        let joined = synthesize_artifact(&emitted);
        assert_eq!(joined, "a\n\nb");
    }

    #[test]
    fn synthesize_artifact_bounds_length() {
        let emitted = vec!["x".repeat(super::MAX_SYNTHESIZED_ARTIFACT_CHARS + 500)];
        let joined = synthesize_artifact(&emitted);
        assert_eq!(joined.len(), super::MAX_SYNTHESIZED_ARTIFACT_CHARS);
    }

    #[test]
    fn synthesize_artifact_truncates_on_a_char_boundary() {
        // A multi-byte codepoint ('â', 2 bytes) straddles the cap, so the
        // naive byte-index truncation would split it mid-codepoint and panic.
        let filler = "a".repeat(super::MAX_SYNTHESIZED_ARTIFACT_CHARS - 1);
        let emitted = vec![format!("{filler}\u{e2}\u{e2}\u{e2}")];
        let joined = synthesize_artifact(&emitted);
        assert!(joined.len() <= super::MAX_SYNTHESIZED_ARTIFACT_CHARS);
        assert!(joined.is_char_boundary(joined.len()));
    }
}
