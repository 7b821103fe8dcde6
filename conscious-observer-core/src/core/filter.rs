//! The output filter's pass/fail verdict.

use serde::Deserialize;
use serde::Serialize;

/// Quality metadata attached to an output that passed the filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityMetadata {
    /// Grounding score the filter observed.
    pub grounding_score: f64,
    /// Calibrated confidence the filter observed.
    pub calibrated_confidence: f64,
    /// Quality bar the output was measured against.
    pub quality_bar: f64,
}

/// An output that passed the filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilteredOutput {
    /// The annotated content released to the caller.
    pub content: String,
    /// Quality metadata describing why it passed.
    pub quality: QualityMetadata,
}

/// An output that failed the filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedOutput {
    /// Which quality dimensions failed (e.g. `"grounding_below_threshold"`).
    pub failed_dimensions: Vec<String>,
    /// Guidance for how a retry might address the failure.
    pub retry_guidance: String,
}

/// The filter's sum-type verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FilterOutcome {
    /// The output passed.
    Passed(FilteredOutput),
    /// The output failed.
    Rejected(RejectedOutput),
}
