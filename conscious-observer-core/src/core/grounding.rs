//! Grounding verification output: per-claim grades and an aggregate score.

use serde::Deserialize;
use serde::Serialize;

/// A single claim's support level, as judged by the grounding collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimGrade {
    /// The claim is directly supported by evidence.
    Grounded,
    /// The claim is a reasonable inference from evidence, not a direct match.
    Inferred,
    /// The claim has no supporting evidence.
    Fabricated,
}

/// One graded claim extracted from the synthesized artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedClaim {
    /// The claim text as extracted from the artifact.
    pub claim: String,
    /// The grade assigned to this claim.
    pub grade: ClaimGrade,
}

/// The grounding collaborator's verdict on an artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundingReport {
    /// Per-claim grades.
    pub claims: Vec<GradedClaim>,
    /// Aggregate grounding score, in `[0, 1]`.
    pub aggregate_score: f64,
    /// Free-text verdict summarizing the report.
    pub verdict: String,
}
