// conscious-observer-collaborators/src/execution.rs
// ============================================================================
// Module: Reference OODA Loop
// Description: Deterministic single-cycle executor walking a DAG (or a
//              sentence-split objective when none was synthesized).
// Purpose: Give the monitored execution loop (C5) a real `runCycle` to drive.
// Dependencies: conscious-observer-core, serde_json
// ============================================================================

//! ## Overview
//! This collaborator has no model behind it: it treats the objective (or,
//! in FULL mode, the synthesized DAG) as a fixed script and walks it one
//! node per cycle, emitting a deterministic artifact line and reporting
//! `COMPLETE` once every node (or sentence) has been visited. Agent state
//! carries nothing but the walk cursor, round-tripped through the opaque
//! `AgentState` JSON envelope the contract requires.

use async_trait::async_trait;
use conscious_observer_core::ActionTag;
use conscious_observer_core::AgentState;
use conscious_observer_core::ArtifactsDelta;
use conscious_observer_core::CycleTelemetry;
use conscious_observer_core::Decision;
use conscious_observer_core::ExecutableDag;
use conscious_observer_core::ExecutionError;
use conscious_observer_core::MemoryHandle;
use conscious_observer_core::OodaLoop;

/// Cursor persisted in [`AgentState`] between cycles.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, Default)]
struct WalkCursor {
    /// Index of the next node/sentence to execute.
    next_index: usize,
}

/// Tokens charged per cycle; keeps `total_tokens_budget` bookkeeping
/// realistic without modeling an actual token counter.
const TOKENS_PER_CYCLE: u64 = 120;
/// Wall-clock duration reported per cycle, in milliseconds.
const CYCLE_DURATION_MS: u64 = 450;

/// Splits `objective` into steps: one per DAG node if the DAG is non-empty,
/// otherwise one per sentence-like segment of the objective text.
fn steps_for<'a>(objective: &'a str, dag: &'a ExecutableDag) -> Vec<String> {
    if !dag.is_empty() {
        return dag.nodes.iter().map(|node| format!("node {}", node.sub_task_id)).collect();
    }
    let segments: Vec<String> = objective
        .split(['.', ';', '\n'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect();
    if segments.is_empty() { vec![objective.trim().to_owned()] } else { segments }
}

/// Walks a DAG (or a sentence-split objective) one step per cycle.
///
/// # Invariants
/// - Reports `COMPLETE` on the cycle that visits the final step, never a
///   cycle later (no trailing no-op cycle).
#[derive(Debug, Default)]
pub struct WalkingOodaLoop;

#[async_trait]
impl OodaLoop for WalkingOodaLoop {
    async fn run_cycle(
        &self,
        agent_state: AgentState,
        _memory: &MemoryHandle,
        active_dag: &ExecutableDag,
        objective: &str,
    ) -> Result<(AgentState, Decision, CycleTelemetry, ArtifactsDelta), ExecutionError> {
        let cursor: WalkCursor = serde_json::from_value(agent_state.0.clone()).unwrap_or_default();
        let steps = steps_for(objective, active_dag);
        let total_steps = steps.len().max(1);

        let Some(step) = steps.get(cursor.next_index) else {
            return Err(ExecutionError::CycleFailed(format!(
                "cursor {} past end of {total_steps} steps",
                cursor.next_index
            )));
        };

        let cycle_number = u32::try_from(cursor.next_index + 1).unwrap_or(u32::MAX);
        let is_final = cursor.next_index + 1 >= steps.len();
        let next_cursor = WalkCursor { next_index: cursor.next_index + 1 };

        let decision = Decision {
            action: if is_final { ActionTag::Complete } else { ActionTag::Continue },
            reasoning: format!("executed step {cycle_number} of {total_steps}: {step}"),
            target_node_ids: vec![step.clone()],
            replan: None,
        };

        let total_steps_u32 = u32::try_from(total_steps).unwrap_or(u32::MAX);
        let active_module_count = u32::try_from(active_dag.nodes.len().max(1)).unwrap_or(u32::MAX);
        let telemetry = CycleTelemetry {
            cycle_number,
            tokens_consumed: TOKENS_PER_CYCLE,
            duration_ms: CYCLE_DURATION_MS,
            active_module_count,
            total_cycles_budget: total_steps_u32,
            total_tokens_budget: u64::from(total_steps_u32) * TOKENS_PER_CYCLE,
        };

        let artifact = ArtifactsDelta { emitted: vec![format!("{step} -> done")] };
        let state = AgentState(serde_json::to_value(next_cursor).unwrap_or_default());

        Ok((state, decision, telemetry, artifact))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn single_sentence_objective_completes_on_cycle_one() {
        let ooda = WalkingOodaLoop;
        let dag = ExecutableDag::empty();
        let (_, decision, telemetry, artifact) = ooda
            .run_cycle(AgentState::default(), &MemoryHandle::default(), &dag, "respond to the greeting")
            .await
            .expect("runs");
        assert_eq!(decision.action, ActionTag::Complete);
        assert_eq!(telemetry.cycle_number, 1);
        assert_eq!(artifact.emitted.len(), 1);
    }

    #[tokio::test]
    async fn multi_sentence_objective_continues_then_completes() {
        let ooda = WalkingOodaLoop;
        let dag = ExecutableDag::empty();
        let (state, first, ..) = ooda
            .run_cycle(AgentState::default(), &MemoryHandle::default(), &dag, "Research the topic. Write a summary.")
            .await
            .expect("runs");
        assert_eq!(first.action, ActionTag::Continue);
        let (_, second, ..) = ooda.run_cycle(state, &MemoryHandle::default(), &dag, "Research the topic. Write a summary.").await.expect("runs");
        assert_eq!(second.action, ActionTag::Complete);
    }
}
