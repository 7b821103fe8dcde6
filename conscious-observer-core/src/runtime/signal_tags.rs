//! Signal Tag Builder (C2): fuses the four perception outputs into one
//! `SignalTags` record. Pure function; no side effects.

use std::collections::BTreeSet;

use crate::core::DomainTag;
use crate::core::SignalTags;
use crate::interfaces::ClassificationResult;
use crate::interfaces::CognitiveLabels;
use crate::interfaces::ExtractedEntities;
use crate::interfaces::ModalityOutput;

/// Fuses perception outputs into one [`SignalTags`] record.
///
/// - Urgency is taken directly from `labels`; if it is `Critical`, the
///   downstream pipeline must route through EMERGENCY even when
///   `classification`'s complexity score is low — C4 enforces this, not C2.
/// - Domain is `classification.primary_class`; ties are conceptually broken
///   by `classification.confidence` (the classifier itself resolves ties
///   before returning, so C2 simply trusts `primary_class`).
/// - Structural complexity is `classification.complexity_score`, clamped to
///   `[0, 1]`.
/// - Required skills/tools are the union of `extracted.required_skills` /
///   `extracted.required_tools` and `classification.tags`, deduplicated.
#[must_use]
pub fn build_signal_tags(
    _modality_output: &ModalityOutput,
    classification: &ClassificationResult,
    labels: &CognitiveLabels,
    extracted: &ExtractedEntities,
) -> SignalTags {
    let mut required_skills: BTreeSet<String> = extracted.required_skills.iter().cloned().collect();
    let mut required_tools: BTreeSet<String> = extracted.required_tools.iter().cloned().collect();
    for tag in &classification.tags {
        if let Some(skill) = tag.strip_prefix("skill:") {
            required_skills.insert(skill.to_owned());
        } else if let Some(tool) = tag.strip_prefix("tool:") {
            required_tools.insert(tool.to_owned());
        }
    }

    SignalTags {
        urgency: labels.urgency,
        domain: DomainTag::new(classification.primary_class.clone()),
        structural_complexity: SignalTags::clamp_complexity(classification.complexity_score),
        entity_count: u32::try_from(extracted.entities.len()).unwrap_or(u32::MAX),
        required_skills,
        required_tools,
        intent_class: labels.intent,
    }
}

#[cfg(test)]
mod tests {
    use super::build_signal_tags;
    use crate::core::IntentClass;
    use crate::core::Modality;
    use crate::core::UrgencyLevel;
    use crate::interfaces::ClassificationResult;
    use crate::interfaces::CognitiveLabels;
    use crate::interfaces::ExtractedEntities;
    use crate::interfaces::ModalityOutput;

    #[test]
    fn fuses_tags_and_clamps_complexity() {
        let modality_output = ModalityOutput {
            modality: Modality::Text,
            normalized_text: Some("hi".to_owned()),
        };
        let classification = ClassificationResult {
            primary_class: "greeting".to_owned(),
            confidence: 0.9,
            complexity_score: 1.5,
            tags: vec!["tool:sql".to_owned(), "skill:writing".to_owned()],
        };
        let labels = CognitiveLabels {
            intent: IntentClass::Conversational,
            sentiment: 0.1,
            urgency: UrgencyLevel::Low,
        };
        let extracted = ExtractedEntities::default();

        let tags = build_signal_tags(&modality_output, &classification, &labels, &extracted);

        assert_eq!(tags.structural_complexity, 1.0);
        assert!(tags.required_tools.contains("sql"));
        assert!(tags.required_skills.contains("writing"));
        assert_eq!(tags.domain.as_str(), "greeting");
    }

    #[test]
    fn critical_urgency_passes_through_unchanged() {
        let modality_output = ModalityOutput {
            modality: Modality::Text,
            normalized_text: None,
        };
        let classification = ClassificationResult {
            primary_class: "incident".to_owned(),
            confidence: 0.5,
            complexity_score: 0.1,
            tags: vec![],
        };
        let labels = CognitiveLabels {
            intent: IntentClass::Actionable,
            sentiment: -0.5,
            urgency: UrgencyLevel::Critical,
        };
        let extracted = ExtractedEntities::default();

        let tags = build_signal_tags(&modality_output, &classification, &labels, &extracted);
        assert_eq!(tags.urgency, UrgencyLevel::Critical);
    }
}
