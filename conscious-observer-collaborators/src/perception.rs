// conscious-observer-collaborators/src/perception.rs
// ============================================================================
// Module: Reference Perception Collaborators
// Description: Deterministic modality ingest, classification, scoring, and
//              entity extraction over text payloads.
// Purpose: Give Gate-In something real to call without an ML stack.
// Dependencies: conscious-observer-core, regex
// ============================================================================

//! ## Overview
//! These collaborators score text input with keyword and structural
//! heuristics rather than a model. They are deterministic by construction,
//! which is the contract Gate-In relies on for retry semantics (§4.4).

use std::sync::LazyLock;

use async_trait::async_trait;
use conscious_observer_core::ClassificationResult;
use conscious_observer_core::Classifier;
use conscious_observer_core::CognitiveLabels;
use conscious_observer_core::CognitiveScorer;
use conscious_observer_core::EntityExtractor;
use conscious_observer_core::ExtractedEntities;
use conscious_observer_core::IntentClass;
use conscious_observer_core::Modality;
use conscious_observer_core::ModalityIngest;
use conscious_observer_core::ModalityOutput;
use conscious_observer_core::PerceptionError;
use conscious_observer_core::RawInput;
use conscious_observer_core::UrgencyLevel;
use regex::Regex;

static CAPITALIZED_WORD: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used, reason = "pattern is a fixed literal checked at compile time")]
    Regex::new(r"\b[A-Z][a-zA-Z0-9]{2,}\b").unwrap()
});
static QUOTED_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used, reason = "pattern is a fixed literal checked at compile time")]
    Regex::new(r#"["']([^"']{2,60})["']"#).unwrap()
});

const URGENT_WORDS: &[&str] = &["urgent", "asap", "immediately", "right now", "emergency"];
const CRITICAL_WORDS: &[&str] = &["critical", "outage", "down", "breach", "data loss"];
const HIGH_WORDS: &[&str] = &["important", "soon", "priority"];
const POSITIVE_WORDS: &[&str] = &["thanks", "great", "good", "love", "appreciate", "happy"];
const NEGATIVE_WORDS: &[&str] = &["bad", "hate", "angry", "frustrated", "broken", "fail"];
const GREETING_WORDS: &[&str] = &["hi", "hello", "hey", "good morning", "good afternoon"];
const IMPERATIVE_STARTS: &[&str] = &[
    "run", "execute", "delete", "create", "send", "build", "deploy", "update", "fix", "write", "generate",
];

const SQL_KEYWORDS: &[&str] = &["sql", "database query", "select * from", "drop table"];
const EMAIL_KEYWORDS: &[&str] = &["send an email", "send email", "email to"];
const CODE_KEYWORDS: &[&str] = &["function", "bug", "compile", "stack trace", "repository"];

fn lower_contains_any(haystack: &str, needles: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    needles.iter().any(|needle| lower.contains(needle))
}

/// Ingests [`Modality::Text`] payloads; rejects every other modality as
/// unsupported, since this reference implementation has no audio/image/video
/// decoding stack behind it.
#[derive(Debug, Default)]
pub struct TextOnlyModalityIngest;

#[async_trait]
impl ModalityIngest for TextOnlyModalityIngest {
    async fn ingest(&self, input: &RawInput) -> Result<ModalityOutput, PerceptionError> {
        if input.modality != Modality::Text {
            return Err(PerceptionError::UnsupportedModality);
        }
        let text = input
            .as_text()
            .ok_or_else(|| PerceptionError::DecodeFailed("payload is not valid utf-8".to_owned()))?;
        Ok(ModalityOutput {
            modality: Modality::Text,
            normalized_text: Some(text.trim().to_owned()),
        })
    }
}

/// Classifies normalized text into a domain and a structural complexity
/// score using keyword density and sentence-length heuristics.
#[derive(Debug, Default)]
pub struct HeuristicClassifier;

#[async_trait]
impl Classifier for HeuristicClassifier {
    async fn classify(&self, modality_output: &ModalityOutput) -> Result<ClassificationResult, PerceptionError> {
        let text = modality_output.normalized_text.clone().unwrap_or_default();
        let (domain, confidence, mut tags) = classify_domain(&text);
        let complexity_score = structural_complexity(&text);
        if lower_contains_any(&text, SQL_KEYWORDS) {
            tags.push("sql_execution".to_owned());
        }
        if complexity_score < 0.05 && confidence < 0.4 {
            return Err(PerceptionError::LowConfidence);
        }
        Ok(ClassificationResult {
            primary_class: domain,
            confidence,
            complexity_score,
            tags,
        })
    }
}

fn classify_domain(text: &str) -> (String, f64, Vec<String>) {
    if lower_contains_any(text, SQL_KEYWORDS) {
        return ("data-systems".to_owned(), 0.85, vec!["sql".to_owned()]);
    }
    if lower_contains_any(text, CODE_KEYWORDS) {
        return ("software-engineering".to_owned(), 0.8, vec!["code".to_owned()]);
    }
    if lower_contains_any(text, EMAIL_KEYWORDS) {
        return ("communications".to_owned(), 0.75, vec!["email".to_owned()]);
    }
    if lower_contains_any(text, GREETING_WORDS) {
        return ("conversational".to_owned(), 0.9, Vec::new());
    }
    ("general".to_owned(), 0.5, Vec::new())
}

/// Estimates structural complexity from sentence count, average sentence
/// length, and the presence of nested clauses (commas/semicolons).
fn structural_complexity(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }
    let sentence_count = text.matches(['.', '!', '?']).count().max(1);
    let avg_sentence_len = (words.len() as f64) / (sentence_count as f64);
    let clause_markers = text.matches([',', ';']).count();
    let length_score = (words.len() as f64 / 120.0).min(1.0);
    let density_score = (avg_sentence_len / 25.0).min(1.0);
    let clause_score = (clause_markers as f64 / 10.0).min(1.0);
    ((length_score * 0.5) + (density_score * 0.3) + (clause_score * 0.2)).clamp(0.0, 1.0)
}

/// Scores intent, sentiment, and urgency from the same keyword heuristics.
#[derive(Debug, Default)]
pub struct HeuristicCognitiveScorer;

#[async_trait]
impl CognitiveScorer for HeuristicCognitiveScorer {
    async fn score(&self, text: &str, context: &ClassificationResult) -> Result<CognitiveLabels, PerceptionError> {
        let urgency = score_urgency(text);
        let sentiment = score_sentiment(text);
        let intent = score_intent(text, context);
        Ok(CognitiveLabels { intent, sentiment, urgency })
    }
}

fn score_urgency(text: &str) -> UrgencyLevel {
    if lower_contains_any(text, CRITICAL_WORDS) {
        UrgencyLevel::Critical
    } else if lower_contains_any(text, URGENT_WORDS) {
        UrgencyLevel::High
    } else if lower_contains_any(text, HIGH_WORDS) {
        UrgencyLevel::High
    } else {
        UrgencyLevel::Normal
    }
}

fn score_sentiment(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let positive = POSITIVE_WORDS.iter().filter(|w| lower.contains(*w)).count() as f64;
    let negative = NEGATIVE_WORDS.iter().filter(|w| lower.contains(*w)).count() as f64;
    let total = positive + negative;
    if total == 0.0 {
        return 0.0;
    }
    ((positive - negative) / total).clamp(-1.0, 1.0)
}

fn score_intent(text: &str, context: &ClassificationResult) -> IntentClass {
    let trimmed = text.trim();
    if lower_contains_any(trimmed, GREETING_WORDS) && trimmed.split_whitespace().count() < 6 {
        return IntentClass::Conversational;
    }
    let lower = trimmed.to_lowercase();
    let first_word = lower.split_whitespace().next().unwrap_or_default();
    if IMPERATIVE_STARTS.contains(&first_word) {
        return IntentClass::Actionable;
    }
    if trimmed.ends_with('?') {
        return IntentClass::Informational;
    }
    if context.confidence < 0.5 {
        return IntentClass::Ambiguous;
    }
    IntentClass::Informational
}

/// Extracts capitalized-word and quoted-span entities, and infers tool and
/// skill requirements from the same keyword tables the classifier uses.
#[derive(Debug, Default)]
pub struct HeuristicEntityExtractor;

#[async_trait]
impl EntityExtractor for HeuristicEntityExtractor {
    async fn extract(&self, text: &str) -> Result<ExtractedEntities, PerceptionError> {
        let mut entities: Vec<String> = CAPITALIZED_WORD
            .find_iter(text)
            .map(|m| m.as_str().to_owned())
            .collect();
        entities.extend(QUOTED_SPAN.captures_iter(text).map(|c| c[1].to_owned()));
        entities.sort();
        entities.dedup();

        let mut required_tools = Vec::new();
        if lower_contains_any(text, SQL_KEYWORDS) {
            required_tools.push("sql_execution".to_owned());
        }
        if lower_contains_any(text, EMAIL_KEYWORDS) {
            required_tools.push("email_send".to_owned());
        }

        let mut required_skills = Vec::new();
        if lower_contains_any(text, CODE_KEYWORDS) {
            required_skills.push("software-engineering".to_owned());
        }
        if lower_contains_any(text, SQL_KEYWORDS) {
            required_skills.push("data-systems".to_owned());
        }

        Ok(ExtractedEntities { entities, required_tools, required_skills })
    }
}
