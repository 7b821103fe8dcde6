//! Agent genesis and identity/profile loading (Gate-In step 1).
//!
//! Listed among the out-of-scope external collaborators in the purpose
//! statement; not part of the abbreviated table in §6 because it runs
//! before any signal exists to hand it, but it is still a collaborator with
//! a fixed contract, not internal logic.

use async_trait::async_trait;

use crate::core::IdentityContext;
use crate::core::SpawnRequest;

/// Error kinds agent genesis may report.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenesisError {
    /// The requested role has no known cognitive profile.
    #[error("unknown role: {0}")]
    UnknownRole(String),
    /// Wraps a failure decoding the collaborator's envelope.
    #[error(transparent)]
    Unwrap(#[from] crate::core::UnwrapError),
}

/// Initializes an agent for one invocation: assigns an id (unless the
/// caller supplied a trace id to derive one from), loads the cognitive
/// profile for the requested role, and sets identity constraints.
#[async_trait]
pub trait AgentGenesis: Send + Sync {
    /// Runs agent genesis.
    ///
    /// # Errors
    ///
    /// Returns [`GenesisError::UnknownRole`] if no profile exists for the
    /// role implied by `spawn_request`.
    async fn initialize(&self, spawn_request: &SpawnRequest) -> Result<(crate::core::AgentId, IdentityContext), GenesisError>;
}
