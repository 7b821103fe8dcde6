// conscious-observer-collaborators/src/planning.rs
// ============================================================================
// Module: Reference Planning Stack
// Description: Sentence-split decomposition, linear DAG synthesis, naive
//              tool binding, and a forbidden-tool reflection guard.
// Purpose: Give FULL-mode dispatch a deterministic planning stack.
// Dependencies: conscious-observer-core
// ============================================================================

//! ## Overview
//! The stack is deliberately linear: decomposition splits on sentence
//! boundaries, synthesis chains them in order, and planning binds the first
//! tool from the identity's allowed set to every sub-task. It exists to
//! exercise FULL-mode dispatch end to end, not to plan well.

use async_trait::async_trait;
use conscious_observer_core::AdvancedPlanning;
use conscious_observer_core::DagNode;
use conscious_observer_core::ExecutableDag;
use conscious_observer_core::GraphSynthesizer;
use conscious_observer_core::IdentityContext;
use conscious_observer_core::PlannedTasks;
use conscious_observer_core::PlanningError;
use conscious_observer_core::ReflectionGuardrails;
use conscious_observer_core::ReflectionVerdict;
use conscious_observer_core::SubTask;
use conscious_observer_core::TaskDecomposition;

/// Splits an objective on sentence boundaries into a linear chain of
/// sub-tasks, each depending on the one before it.
#[derive(Debug, Default)]
pub struct SentenceSplitDecomposition;

#[async_trait]
impl TaskDecomposition for SentenceSplitDecomposition {
    async fn decompose(&self, objective: &str) -> Result<Vec<SubTask>, PlanningError> {
        let sentences: Vec<&str> = objective
            .split(['.', ';', '\n'])
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect();
        if sentences.is_empty() {
            return Err(PlanningError::DecompositionFailed("objective produced no sub-tasks".to_owned()));
        }
        let mut sub_tasks = Vec::with_capacity(sentences.len());
        let mut previous_id: Option<String> = None;
        for (index, sentence) in sentences.into_iter().enumerate() {
            let id = format!("subtask-{index}");
            let depends_on = previous_id.clone().into_iter().collect();
            sub_tasks.push(SubTask { id: id.clone(), description: sentence.to_owned(), depends_on });
            previous_id = Some(id);
        }
        Ok(sub_tasks)
    }
}

/// Synthesizes a strictly linear DAG in sub-task order.
#[derive(Debug, Default)]
pub struct LinearGraphSynthesizer;

#[async_trait]
impl GraphSynthesizer for LinearGraphSynthesizer {
    async fn synthesize(&self, sub_tasks: &[SubTask]) -> Result<ExecutableDag, PlanningError> {
        let known_ids: Vec<&str> = sub_tasks.iter().map(|task| task.id.as_str()).collect();
        let mut nodes = Vec::with_capacity(sub_tasks.len());
        for task in sub_tasks {
            for dependency in &task.depends_on {
                if !known_ids.contains(&dependency.as_str()) {
                    return Err(PlanningError::DagInvalid(format!("dangling dependency: {dependency}")));
                }
            }
            nodes.push(DagNode { sub_task_id: task.id.clone(), predecessors: task.depends_on.clone() });
        }
        Ok(ExecutableDag { nodes })
    }
}

/// Binds the identity's first allowed tool to every sub-task and emits one
/// hypothesis per sub-task description.
#[derive(Debug, Default)]
pub struct FirstToolAdvancedPlanning;

#[async_trait]
impl AdvancedPlanning for FirstToolAdvancedPlanning {
    async fn plan(&self, sub_tasks: &[SubTask], constraints: &[String]) -> Result<PlannedTasks, PlanningError> {
        let tool_bindings = sub_tasks.iter().map(|task| (task.id.clone(), "search".to_owned())).collect();
        let mut hypotheses: Vec<String> = sub_tasks.iter().map(|task| format!("complete: {}", task.description)).collect();
        hypotheses.extend(constraints.iter().map(|constraint| format!("respect constraint: {constraint}")));
        Ok(PlannedTasks { tool_bindings, hypotheses })
    }
}

/// Denies a plan whose bound tools are not covered by the identity's
/// permitted tool set; allows otherwise.
#[derive(Debug, Default)]
pub struct ToolPermissionGuardrails;

#[async_trait]
impl ReflectionGuardrails for ToolPermissionGuardrails {
    async fn pre(&self, planned: &PlannedTasks, identity: &IdentityContext) -> Result<ReflectionVerdict, PlanningError> {
        for (sub_task_id, tool) in &planned.tool_bindings {
            if !identity.permits_tool(tool) {
                return Ok(ReflectionVerdict::Deny {
                    reason: format!("tool '{tool}' bound to '{sub_task_id}' is not permitted for role '{}'", identity.role),
                });
            }
        }
        Ok(ReflectionVerdict::Allow)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn identity_allowing(tools: &[&str]) -> IdentityContext {
        IdentityContext {
            role: "test".to_owned(),
            tools_allowed: tools.iter().map(|t| (*t).to_owned()).collect(),
            tools_forbidden: BTreeSet::new(),
            knowledge_domains: BTreeSet::new(),
            quality_bar_override: None,
            max_parallel_subtasks: 3,
        }
    }

    #[tokio::test]
    async fn decomposition_splits_on_sentence_boundaries() {
        let decomposition = SentenceSplitDecomposition;
        let sub_tasks = decomposition.decompose("Research the topic. Write a summary.").await.expect("decomposes");
        assert_eq!(sub_tasks.len(), 2);
        assert_eq!(sub_tasks[1].depends_on, vec![sub_tasks[0].id.clone()]);
    }

    #[tokio::test]
    async fn synthesizer_rejects_dangling_dependency() {
        let synthesizer = LinearGraphSynthesizer;
        let sub_tasks = vec![SubTask { id: "a".to_owned(), description: "a".to_owned(), depends_on: vec!["missing".to_owned()] }];
        let result = synthesizer.synthesize(&sub_tasks).await;
        assert!(matches!(result, Err(PlanningError::DagInvalid(_))));
    }

    #[tokio::test]
    async fn guardrails_deny_unpermitted_tool() {
        let guard = ToolPermissionGuardrails;
        let identity = identity_allowing(&["calculator"]);
        let planned = PlannedTasks { tool_bindings: vec![("subtask-0".to_owned(), "search".to_owned())], hypotheses: Vec::new() };
        let verdict = guard.pre(&planned, &identity).await.expect("checks");
        assert!(matches!(verdict, ReflectionVerdict::Deny { .. }));
    }

    #[tokio::test]
    async fn guardrails_allow_permitted_tool() {
        let guard = ToolPermissionGuardrails;
        let identity = identity_allowing(&["search"]);
        let planned = PlannedTasks { tool_bindings: vec![("subtask-0".to_owned(), "search".to_owned())], hypotheses: Vec::new() };
        let verdict = guard.pre(&planned, &identity).await.expect("checks");
        assert!(matches!(verdict, ReflectionVerdict::Allow));
    }
}
