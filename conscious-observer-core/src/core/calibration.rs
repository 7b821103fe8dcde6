//! Confidence calibration output.

use serde::Deserialize;
use serde::Serialize;

use super::identifiers::DomainTag;

/// The calibrator collaborator's adjustment of a stated confidence value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibratedConfidence {
    /// The confidence the producing collaborator originally stated.
    pub stated: f64,
    /// The confidence after calibration against history and grounding.
    pub calibrated: f64,
    /// `calibrated / stated`, or 1.0 if `stated` is zero.
    pub correction_factor: f64,
    /// Set when `stated` was materially higher than `calibrated`.
    pub overconfident: bool,
    /// Set when `stated` was materially lower than `calibrated`.
    pub underconfident: bool,
    /// The domain this calibration was performed against.
    pub domain: DomainTag,
}
