//! Capability assessment: whether the agent can handle the classified input.

use serde::Deserialize;
use serde::Serialize;

/// Describes why an agent cannot fully handle an input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapabilityGap {
    /// Skills the input requires that the identity does not cover.
    pub missing_skills: Vec<String>,
    /// Tools the input requires that the identity does not permit.
    pub missing_tools: Vec<String>,
}

impl CapabilityGap {
    /// Returns whether no skills or tools are missing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missing_skills.is_empty() && self.missing_tools.is_empty()
    }
}

/// The self-model collaborator's verdict on whether the agent can proceed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityAssessment {
    /// Whether the agent can handle the input at all.
    pub can_handle: bool,
    /// Confidence in `can_handle`, in `[0, 1]`.
    pub confidence: f64,
    /// Populated when `can_handle` is false.
    pub gap: Option<CapabilityGap>,
    /// Skills/tools the agent has only partial coverage for.
    pub partial_capabilities: Vec<String>,
}
