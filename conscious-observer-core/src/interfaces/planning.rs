//! The FULL-mode planning stack: decomposition, graph synthesis, advanced
//! planning, and the pre-execution reflection guard.

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::core::IdentityContext;

/// One unit of work produced by task decomposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubTask {
    /// Stable identifier for this sub-task, referenced by DAG edges.
    pub id: String,
    /// Free-text description of the work.
    pub description: String,
    /// Sub-task ids this one depends on.
    pub depends_on: Vec<String>,
}

/// A DAG node ready for execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DagNode {
    /// The sub-task this node executes.
    pub sub_task_id: String,
    /// Node ids that must complete before this one runs.
    pub predecessors: Vec<String>,
}

/// The executable DAG produced by graph synthesis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutableDag {
    /// Nodes in the DAG, in a valid topological order.
    pub nodes: Vec<DagNode>,
}

impl ExecutableDag {
    /// An empty DAG, used by FAST and STANDARD dispatch.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns whether the DAG has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Tool bindings and generated hypotheses produced by advanced planning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannedTasks {
    /// Tool name bound to each sub-task id.
    pub tool_bindings: Vec<(String, String)>,
    /// Hypotheses generated to seed the monitored loop's objective.
    pub hypotheses: Vec<String>,
}

/// The pre-execution reflection guard's verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReflectionVerdict {
    /// The plan may proceed.
    Allow,
    /// The plan is denied; execution must not start.
    Deny {
        /// Free-text reason for the denial.
        reason: String,
    },
}

/// Error kinds the planning collaborators may report.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanningError {
    /// `task-decomposition.decompose` failed.
    #[error("task decomposition failed: {0}")]
    DecompositionFailed(String),
    /// `graph-synthesizer.synthesize` produced an invalid DAG.
    #[error("synthesized DAG is invalid: {0}")]
    DagInvalid(String),
    /// Wraps a failure decoding a collaborator's envelope.
    #[error(transparent)]
    Unwrap(#[from] crate::core::UnwrapError),
}

/// Decomposes an objective into an ordered list of sub-tasks.
#[async_trait]
pub trait TaskDecomposition: Send + Sync {
    /// Runs decomposition.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::DecompositionFailed`] on collaborator failure.
    async fn decompose(&self, objective: &str) -> Result<Vec<SubTask>, PlanningError>;
}

/// Synthesizes an executable DAG from a sub-task list.
#[async_trait]
pub trait GraphSynthesizer: Send + Sync {
    /// Runs synthesis.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::DagInvalid`] if the synthesized graph is
    /// malformed (cycles, dangling dependencies).
    async fn synthesize(&self, sub_tasks: &[SubTask]) -> Result<ExecutableDag, PlanningError>;
}

/// Binds tools and generates hypotheses for a sub-task list.
#[async_trait]
pub trait AdvancedPlanning: Send + Sync {
    /// Runs advanced planning.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError`] on collaborator-reported failure.
    async fn plan(&self, sub_tasks: &[SubTask], constraints: &[String]) -> Result<PlannedTasks, PlanningError>;
}

/// Checks a plan against identity constraints before execution starts.
#[async_trait]
pub trait ReflectionGuardrails: Send + Sync {
    /// Runs the pre-execution check.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError`] on collaborator-reported failure; a denial
    /// is reported as `Ok(ReflectionVerdict::Deny { .. })`, not an error.
    async fn pre(&self, planned: &PlannedTasks, identity: &IdentityContext) -> Result<ReflectionVerdict, PlanningError>;
}
