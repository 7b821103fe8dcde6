//! Gate-Out's three collaborators: grounding verification, calibration, and
//! the output filter.

use async_trait::async_trait;

use crate::core::CalibratedConfidence;
use crate::core::DomainTag;
use crate::core::FilterOutcome;
use crate::core::GroundingReport;
use crate::core::IdentityContext;
use crate::core::ToolOutput;

/// A caller- or execution-provided origin reference backing a claim.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EvidenceRef {
    /// Where the evidence came from (URL, document id, tool-call id, ...).
    pub source: String,
    /// The evidence content itself.
    pub content: String,
}

/// One domain's calibration history entry, consulted by the calibrator.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CalibrationHistoryEntry {
    /// The domain this entry applies to.
    pub domain: DomainTag,
    /// Mean correction factor observed historically for this domain.
    pub mean_correction_factor: f64,
    /// Number of samples backing `mean_correction_factor`.
    pub sample_count: u32,
}

/// Error kinds the Gate-Out collaborators may report.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QualityError {
    /// Wraps a failure decoding a collaborator's envelope.
    #[error(transparent)]
    Unwrap(#[from] crate::core::UnwrapError),
}

/// Verifies that an artifact's claims are supported by evidence.
#[async_trait]
pub trait GroundingVerifier: Send + Sync {
    /// Runs grounding verification.
    ///
    /// # Errors
    ///
    /// Returns [`QualityError`] on collaborator-reported failure.
    async fn verify(
        &self,
        artifact: &str,
        evidence: &[EvidenceRef],
        identity: &IdentityContext,
    ) -> Result<GroundingReport, QualityError>;
}

/// Adjusts a stated confidence using grounding and historical calibration.
#[async_trait]
pub trait Calibrator: Send + Sync {
    /// Runs calibration.
    ///
    /// # Errors
    ///
    /// Returns [`QualityError`] on collaborator-reported failure.
    async fn calibrate(
        &self,
        stated_confidence: f64,
        grounding: &GroundingReport,
        history: &[CalibrationHistoryEntry],
        domain: &DomainTag,
    ) -> Result<CalibratedConfidence, QualityError>;
}

/// Passes or rejects an output against a quality bar.
#[async_trait]
pub trait NoiseGateFilter: Send + Sync {
    /// Runs the filter.
    ///
    /// # Errors
    ///
    /// Returns [`QualityError`] on collaborator-reported failure; a quality
    /// rejection is reported as `Ok(FilterOutcome::Rejected(..))`, not an error.
    async fn filter(
        &self,
        output: &ToolOutput,
        grounding: &GroundingReport,
        calibrated: &CalibratedConfidence,
        quality_bar_override: Option<f64>,
    ) -> Result<FilterOutcome, QualityError>;
}
