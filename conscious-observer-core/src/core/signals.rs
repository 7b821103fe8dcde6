//! The scheduling-input record fused by the Signal Tag Builder (C2).

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use super::identifiers::DomainTag;

/// Urgency as reported by the intent/sentiment/urgency scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    /// No time pressure.
    Low,
    /// Default urgency.
    Normal,
    /// Elevated urgency; does not by itself force EMERGENCY.
    High,
    /// Forces `ProcessingMode::Emergency` regardless of derived complexity.
    Critical,
}

/// Coarse intent classification from the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentClass {
    /// A conversational exchange with no task to execute.
    Conversational,
    /// A request for information.
    Informational,
    /// A request to perform a task with side effects.
    Actionable,
    /// A request whose intent could not be confidently classified.
    Ambiguous,
}

/// The fused scheduling-input record produced by C2.
///
/// # Invariants
/// - Never carries raw input text: only derived signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalTags {
    /// Urgency taken directly from the scorer.
    pub urgency: UrgencyLevel,
    /// Primary domain class from the classifier.
    pub domain: DomainTag,
    /// Structural complexity score, clamped to `[0, 1]`.
    pub structural_complexity: f64,
    /// Number of entities recognized in the input.
    pub entity_count: u32,
    /// Skills the input appears to require, deduplicated.
    pub required_skills: BTreeSet<String>,
    /// Tools the input appears to require, deduplicated.
    pub required_tools: BTreeSet<String>,
    /// Coarse intent classification.
    pub intent_class: IntentClass,
}

impl SignalTags {
    /// Clamps `score` into the `[0, 1]` range expected of structural complexity.
    #[must_use]
    pub fn clamp_complexity(score: f64) -> f64 {
        score.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::SignalTags;

    #[test]
    fn clamp_complexity_bounds_to_unit_interval() {
        assert_eq!(SignalTags::clamp_complexity(-1.0), 0.0);
        assert_eq!(SignalTags::clamp_complexity(2.0), 1.0);
        assert_eq!(SignalTags::clamp_complexity(0.5), 0.5);
    }
}
