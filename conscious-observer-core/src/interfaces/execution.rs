//! The inner execution loop's single-cycle primitive (`ooda-loop.runCycle`).
//!
//! The loop's own Observe/Orient/Decide/Act logic is an external
//! collaborator concern; this crate only specifies the `runCycle` contract
//! the monitored execution loop (C5) drives one cycle at a time.

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::core::CycleTelemetry;
use crate::core::Decision;
use crate::interfaces::planning::ExecutableDag;

/// Opaque agent state threaded through successive `runCycle` calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentState(pub serde_json::Value);

/// Opaque short-term memory handle passed to `runCycle`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryHandle(pub serde_json::Value);

/// New artifact text emitted during one cycle, if any.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactsDelta {
    /// Output snippets emitted this cycle, in emission order.
    pub emitted: Vec<String>,
}

/// Error kinds the inner execution loop may report.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExecutionError {
    /// `runCycle` crashed mid-cycle; treated as a local ABORT by C5.
    #[error("cycle failed: {0}")]
    CycleFailed(String),
    /// Wraps a failure decoding the collaborator's envelope.
    #[error(transparent)]
    Unwrap(#[from] crate::core::UnwrapError),
}

/// The inner execution loop's single-cycle primitive.
#[async_trait]
pub trait OodaLoop: Send + Sync {
    /// Advances the loop by exactly one cycle.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::CycleFailed`] if the cycle could not
    /// complete; the caller (C5) treats this as an ABORT-equivalent
    /// termination rather than retrying inline.
    async fn run_cycle(
        &self,
        agent_state: AgentState,
        memory: &MemoryHandle,
        active_dag: &ExecutableDag,
        objective: &str,
    ) -> Result<(AgentState, Decision, CycleTelemetry, ArtifactsDelta), ExecutionError>;
}
