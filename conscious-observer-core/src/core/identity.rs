//! Identity and role context, fixed for the duration of one invocation.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

/// Immutable constraints and profile for the agent handling one invocation.
///
/// # Invariants
/// - Immutable for the duration of the call: constructed once during agent
///   genesis (Gate-In step 1) and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityContext {
    /// The agent's assigned role, used to load its cognitive profile.
    pub role: String,
    /// Tools the agent is permitted to request.
    pub tools_allowed: BTreeSet<String>,
    /// Tools the agent is explicitly forbidden from requesting, even if
    /// also present in `tools_allowed` by misconfiguration.
    pub tools_forbidden: BTreeSet<String>,
    /// Knowledge domains the agent's profile covers.
    pub knowledge_domains: BTreeSet<String>,
    /// Optional override of the default quality bar for Gate-Out's filter.
    pub quality_bar_override: Option<f64>,
    /// Maximum number of sub-tasks FULL-mode planning may emit in parallel.
    pub max_parallel_subtasks: u32,
}

impl IdentityContext {
    /// Returns whether `tool` may be used under this identity: allowed and
    /// not forbidden.
    #[must_use]
    pub fn permits_tool(&self, tool: &str) -> bool {
        self.tools_allowed.contains(tool) && !self.tools_forbidden.contains(tool)
    }

    /// Returns whether `skill` is covered by this identity's knowledge domains.
    #[must_use]
    pub fn permits_skill(&self, skill: &str) -> bool {
        self.knowledge_domains.contains(skill)
    }
}
