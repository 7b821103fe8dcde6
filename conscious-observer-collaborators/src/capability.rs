// conscious-observer-collaborators/src/capability.rs
// ============================================================================
// Module: Reference Self-Model
// Description: Capability assessment by set comparison against identity.
// Purpose: Gate-In step 3 collaborator.
// Dependencies: conscious-observer-core
// ============================================================================

//! ## Overview
//! Assessment is a pure set-difference between `tags.required_skills` /
//! `tags.required_tools` and what the identity's profile permits.

use async_trait::async_trait;
use conscious_observer_core::CapabilityAssessment;
use conscious_observer_core::CapabilityGap;
use conscious_observer_core::IdentityContext;
use conscious_observer_core::SelfModel;
use conscious_observer_core::SelfModelError;
use conscious_observer_core::SignalTags;

/// Assesses capability as the set difference between required skills/tools
/// and what the identity's role profile covers.
#[derive(Debug, Default)]
pub struct SetDifferenceSelfModel;

#[async_trait]
impl SelfModel for SetDifferenceSelfModel {
    async fn assess(&self, tags: &SignalTags, identity: &IdentityContext) -> Result<CapabilityAssessment, SelfModelError> {
        let missing_skills: Vec<String> = tags
            .required_skills
            .iter()
            .filter(|skill| !identity.permits_skill(skill))
            .cloned()
            .collect();
        let missing_tools: Vec<String> = tags
            .required_tools
            .iter()
            .filter(|tool| !identity.permits_tool(tool))
            .cloned()
            .collect();

        let gap = CapabilityGap { missing_skills, missing_tools };
        let can_handle = gap.is_empty();

        let total_required = tags.required_skills.len() + tags.required_tools.len();
        let missing_count = gap.missing_skills.len() + gap.missing_tools.len();
        let confidence = if total_required == 0 {
            1.0
        } else {
            1.0 - (missing_count as f64 / total_required as f64)
        };

        let partial_capabilities = tags
            .required_skills
            .iter()
            .chain(tags.required_tools.iter())
            .filter(|req| !gap.missing_skills.contains(req) && !gap.missing_tools.contains(req))
            .cloned()
            .collect();

        Ok(CapabilityAssessment {
            can_handle,
            confidence,
            gap: if can_handle { None } else { Some(gap) },
            partial_capabilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use conscious_observer_core::DomainTag;
    use conscious_observer_core::IntentClass;
    use conscious_observer_core::UrgencyLevel;

    use super::*;

    fn identity_with_skills(skills: &[&str]) -> IdentityContext {
        IdentityContext {
            role: "test".to_owned(),
            tools_allowed: BTreeSet::new(),
            tools_forbidden: BTreeSet::new(),
            knowledge_domains: skills.iter().map(|s| (*s).to_owned()).collect(),
            quality_bar_override: None,
            max_parallel_subtasks: 1,
        }
    }

    fn tags_requiring(skills: &[&str]) -> SignalTags {
        SignalTags {
            urgency: UrgencyLevel::Normal,
            domain: DomainTag::new("general"),
            structural_complexity: 0.2,
            entity_count: 0,
            required_skills: skills.iter().map(|s| (*s).to_owned()).collect(),
            required_tools: BTreeSet::new(),
            intent_class: IntentClass::Informational,
        }
    }

    #[tokio::test]
    async fn reports_no_gap_when_all_skills_covered() {
        let model = SetDifferenceSelfModel;
        let identity = identity_with_skills(&["data-systems"]);
        let tags = tags_requiring(&["data-systems"]);
        let assessment = model.assess(&tags, &identity).await.expect("assesses");
        assert!(assessment.can_handle);
        assert!(assessment.gap.is_none());
    }

    #[tokio::test]
    async fn reports_gap_for_missing_skill() {
        let model = SetDifferenceSelfModel;
        let identity = identity_with_skills(&["general"]);
        let tags = tags_requiring(&["data-systems"]);
        let assessment = model.assess(&tags, &identity).await.expect("assesses");
        assert!(!assessment.can_handle);
        let gap = assessment.gap.expect("gap present");
        assert_eq!(gap.missing_skills, vec!["data-systems".to_owned()]);
    }
}
