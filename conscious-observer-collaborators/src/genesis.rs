// conscious-observer-collaborators/src/genesis.rs
// ============================================================================
// Module: Reference Agent Genesis
// Description: Fixed role-profile table driving agent identity assignment.
// Purpose: Give Gate-In step 1 a deterministic profile source.
// Dependencies: conscious-observer-core
// ============================================================================

//! ## Overview
//! Profiles are a fixed table rather than a pluggable source; operators who
//! need a different set fork this crate or wrap it behind the same trait.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use conscious_observer_core::AgentGenesis;
use conscious_observer_core::AgentId;
use conscious_observer_core::GenesisError;
use conscious_observer_core::IdentityContext;
use conscious_observer_core::SpawnRequest;

/// One role's fixed cognitive profile.
#[derive(Debug, Clone)]
struct RoleProfile {
    tools_allowed: BTreeSet<String>,
    tools_forbidden: BTreeSet<String>,
    knowledge_domains: BTreeSet<String>,
    quality_bar_override: Option<f64>,
    max_parallel_subtasks: u32,
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// Loads agent identity from a fixed table of role profiles, falling back to
/// a generalist profile when the role is absent from the objective text.
#[derive(Debug)]
pub struct TableAgentGenesis {
    profiles: BTreeMap<String, RoleProfile>,
    sequence: AtomicU64,
}

impl Default for TableAgentGenesis {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            "general".to_owned(),
            RoleProfile {
                tools_allowed: set(&["search", "calculator"]),
                tools_forbidden: BTreeSet::new(),
                knowledge_domains: set(&["general"]),
                quality_bar_override: None,
                max_parallel_subtasks: 3,
            },
        );
        profiles.insert(
            "software-engineering".to_owned(),
            RoleProfile {
                tools_allowed: set(&["search", "calculator", "code_execution", "repository_read"]),
                tools_forbidden: BTreeSet::new(),
                knowledge_domains: set(&["software-engineering", "general"]),
                quality_bar_override: None,
                max_parallel_subtasks: 5,
            },
        );
        profiles.insert(
            "data-systems".to_owned(),
            RoleProfile {
                tools_allowed: set(&["search", "calculator", "sql_execution"]),
                tools_forbidden: set(&["code_execution"]),
                knowledge_domains: set(&["data-systems", "general"]),
                quality_bar_override: Some(0.85),
                max_parallel_subtasks: 3,
            },
        );
        profiles.insert(
            "communications".to_owned(),
            RoleProfile {
                tools_allowed: set(&["search", "email_send"]),
                tools_forbidden: BTreeSet::new(),
                knowledge_domains: set(&["communications", "general"]),
                quality_bar_override: Some(0.9),
                max_parallel_subtasks: 2,
            },
        );
        Self { profiles, sequence: AtomicU64::new(0) }
    }
}

impl TableAgentGenesis {
    /// Picks a role for the objective by matching it against profile keys,
    /// falling back to `general` when nothing matches.
    fn infer_role(&self, objective: &str) -> &str {
        let lower = objective.to_lowercase();
        self.profiles
            .keys()
            .filter(|role| *role != "general")
            .find(|role| lower.contains(role.as_str()))
            .map_or("general", String::as_str)
    }
}

#[async_trait]
impl AgentGenesis for TableAgentGenesis {
    async fn initialize(&self, spawn_request: &SpawnRequest) -> Result<(AgentId, IdentityContext), GenesisError> {
        let role = self.infer_role(&spawn_request.objective).to_owned();
        let profile = self.profiles.get(&role).ok_or_else(|| GenesisError::UnknownRole(role.clone()))?;

        let agent_id = spawn_request.trace_id.clone().unwrap_or_else(|| {
            let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
            format!("agent-{sequence:08x}")
        });

        let identity = IdentityContext {
            role,
            tools_allowed: profile.tools_allowed.clone(),
            tools_forbidden: profile.tools_forbidden.clone(),
            knowledge_domains: profile.knowledge_domains.clone(),
            quality_bar_override: profile.quality_bar_override,
            max_parallel_subtasks: profile.max_parallel_subtasks,
        };
        Ok((AgentId::new(agent_id), identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn infers_software_engineering_role_from_objective() {
        let genesis = TableAgentGenesis::default();
        let request = SpawnRequest::new("fix a software-engineering bug in the parser");
        let (_, identity) = genesis.initialize(&request).await.expect("initializes");
        assert_eq!(identity.role, "software-engineering");
        assert!(identity.permits_tool("code_execution"));
    }

    #[tokio::test]
    async fn falls_back_to_general_role() {
        let genesis = TableAgentGenesis::default();
        let request = SpawnRequest::new("say hello");
        let (_, identity) = genesis.initialize(&request).await.expect("initializes");
        assert_eq!(identity.role, "general");
    }

    #[tokio::test]
    async fn honors_caller_supplied_trace_id() {
        let genesis = TableAgentGenesis::default();
        let mut request = SpawnRequest::new("hello");
        request.trace_id = Some("caller-trace-1".to_owned());
        let (agent_id, _) = genesis.initialize(&request).await.expect("initializes");
        assert_eq!(agent_id.as_str(), "caller-trace-1");
    }
}
