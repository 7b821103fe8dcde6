//! Perception collaborators: modality ingest, classification, cognitive
//! scoring, and entity extraction. Internals are out of scope for this
//! crate — only the contract is specified here.

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::core::IntentClass;
use crate::core::Modality;
use crate::core::RawInput;
use crate::core::UrgencyLevel;

/// Typed output of the modality-ingest collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalityOutput {
    /// The modality that was ingested.
    pub modality: Modality,
    /// Normalized text extracted from the payload, when applicable.
    pub normalized_text: Option<String>,
}

/// Typed output of the classification collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// The primary domain class assigned to the input.
    pub primary_class: String,
    /// Confidence in `primary_class`, in `[0, 1]`; breaks ties between domains.
    pub confidence: f64,
    /// Structural complexity score, in `[0, 1]` (clamped by C2, not here).
    pub complexity_score: f64,
    /// Classifier-derived skill/tool tags, prior to C2 deduplication.
    pub tags: Vec<String>,
}

/// Typed output of the intent/sentiment/urgency scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CognitiveLabels {
    /// Coarse intent classification.
    pub intent: IntentClass,
    /// Sentiment polarity, in `[-1, 1]`.
    pub sentiment: f64,
    /// Urgency level as scored by the collaborator.
    pub urgency: UrgencyLevel,
}

/// Typed output of entity extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedEntities {
    /// Entity strings recognized in the input.
    pub entities: Vec<String>,
    /// Tools the extractor inferred are required.
    pub required_tools: Vec<String>,
    /// Skills the extractor inferred are required.
    pub required_skills: Vec<String>,
}

/// Error kinds a perception collaborator may report.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PerceptionError {
    /// `modality.ingest` does not support the declared modality.
    #[error("unsupported modality")]
    UnsupportedModality,
    /// `modality.ingest` could not decode the payload.
    #[error("payload decode failed: {0}")]
    DecodeFailed(String),
    /// `classification.classify` could not reach its confidence floor.
    ///
    /// Recoverable: callers may proceed with the low-confidence result.
    #[error("classification confidence below floor")]
    LowConfidence,
    /// Wraps a failure decoding the collaborator's envelope.
    #[error(transparent)]
    Unwrap(#[from] crate::core::UnwrapError),
}

/// Ingests a [`RawInput`] into a typed, modality-specific [`ModalityOutput`].
#[async_trait]
pub trait ModalityIngest: Send + Sync {
    /// Runs modality ingest.
    ///
    /// # Errors
    ///
    /// Returns [`PerceptionError::UnsupportedModality`] or
    /// [`PerceptionError::DecodeFailed`] per the collaborator's own logic.
    async fn ingest(&self, input: &RawInput) -> Result<ModalityOutput, PerceptionError>;
}

/// Classifies a [`ModalityOutput`] into a domain and complexity estimate.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Runs classification.
    ///
    /// # Errors
    ///
    /// Returns [`PerceptionError::LowConfidence`] if the classifier's own
    /// confidence floor was not met; the result is still usable.
    async fn classify(&self, modality_output: &ModalityOutput) -> Result<ClassificationResult, PerceptionError>;
}

/// Scores intent, sentiment, and urgency for the ingested text.
#[async_trait]
pub trait CognitiveScorer: Send + Sync {
    /// Runs the scorer.
    ///
    /// # Errors
    ///
    /// Returns [`PerceptionError`] on collaborator-reported failure.
    async fn score(&self, text: &str, context: &ClassificationResult) -> Result<CognitiveLabels, PerceptionError>;
}

/// Extracts entities and tool/skill requirements from the ingested text.
#[async_trait]
pub trait EntityExtractor: Send + Sync {
    /// Runs entity extraction.
    ///
    /// # Errors
    ///
    /// Returns [`PerceptionError`] on collaborator-reported failure.
    async fn extract(&self, text: &str) -> Result<ExtractedEntities, PerceptionError>;
}
