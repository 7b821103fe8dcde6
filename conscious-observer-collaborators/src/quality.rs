// conscious-observer-collaborators/src/quality.rs
// ============================================================================
// Module: Reference Gate-Out Collaborators
// Description: Evidence-overlap grounding verification, history-blended
//              calibration, and a threshold-based noise-gate filter.
// Purpose: Give Gate-Out (C7) real grounding/calibration/filter behavior.
// Dependencies: conscious-observer-core
// ============================================================================

//! ## Overview
//! Grounding grades each sentence of the artifact against the evidence
//! list's vocabulary; short, factually-bare sentences with no evidence are
//! treated as opinion/greeting and auto-grounded, per §8's boundary case.
//! Calibration blends the stated confidence with the grounding score and
//! any historical correction factor. The filter compares the calibrated
//! confidence and grounding score against a quality bar.

use std::collections::HashSet;

use async_trait::async_trait;
use conscious_observer_core::CalibratedConfidence;
use conscious_observer_core::Calibrator;
use conscious_observer_core::CalibrationHistoryEntry;
use conscious_observer_core::ClaimGrade;
use conscious_observer_core::DomainTag;
use conscious_observer_core::EvidenceRef;
use conscious_observer_core::FilterOutcome;
use conscious_observer_core::FilteredOutput;
use conscious_observer_core::GradedClaim;
use conscious_observer_core::GroundingReport;
use conscious_observer_core::GroundingVerifier;
use conscious_observer_core::IdentityContext;
use conscious_observer_core::NoiseGateFilter;
use conscious_observer_core::QualityError;
use conscious_observer_core::QualityMetadata;
use conscious_observer_core::RejectedOutput;
use conscious_observer_core::ToolOutput;

/// A claim with this many significant words or fewer, backed by no
/// evidence, is treated as opinion/greeting rather than an unsupported
/// factual assertion.
const OPINION_WORD_CEILING: usize = 6;
/// Fraction of a claim's significant words that must appear in the
/// evidence vocabulary for the claim to be graded `Grounded` outright.
const GROUNDED_OVERLAP_FLOOR: f64 = 0.5;
/// Default quality bar applied when identity carries no override.
const DEFAULT_QUALITY_BAR: f64 = 0.5;
/// `|stated - calibrated|` at or above this margin sets the
/// overconfident/underconfident flag.
const MISCALIBRATION_MARGIN: f64 = 0.15;

fn significant_words(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|word| word.len() >= 3)
        .collect()
}

fn split_claims(artifact: &str) -> Vec<String> {
    let claims: Vec<String> = artifact
        .split(['.', '\n'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect();
    if claims.is_empty() { vec![artifact.trim().to_owned()] } else { claims }
}

fn grade_claim(claim: &str, evidence_vocabulary: &HashSet<String>) -> ClaimGrade {
    let claim_words = significant_words(claim);
    if claim_words.is_empty() {
        return ClaimGrade::Grounded;
    }
    if evidence_vocabulary.is_empty() {
        return if claim_words.len() <= OPINION_WORD_CEILING { ClaimGrade::Grounded } else { ClaimGrade::Fabricated };
    }
    let overlap = claim_words.intersection(evidence_vocabulary).count();
    #[allow(clippy::cast_precision_loss, reason = "claim vocabularies are small, far below f64's exact-integer range")]
    let ratio = overlap as f64 / claim_words.len() as f64;
    if ratio >= GROUNDED_OVERLAP_FLOOR {
        ClaimGrade::Grounded
    } else if overlap > 0 {
        ClaimGrade::Inferred
    } else {
        ClaimGrade::Fabricated
    }
}

fn grade_score(grade: ClaimGrade) -> f64 {
    match grade {
        ClaimGrade::Grounded => 1.0,
        ClaimGrade::Inferred => 0.5,
        ClaimGrade::Fabricated => 0.0,
    }
}

/// Grades each sentence of the artifact against the evidence vocabulary.
///
/// # Invariants
/// - Always returns a well-formed report, even with empty evidence (§8):
///   short, evidence-free claims are graded `Grounded` (opinion/greeting);
///   longer ones are graded `Fabricated`, which can drive the aggregate to 0.
#[derive(Debug, Default)]
pub struct OverlapGroundingVerifier;

#[async_trait]
impl GroundingVerifier for OverlapGroundingVerifier {
    async fn verify(&self, artifact: &str, evidence: &[EvidenceRef], _identity: &IdentityContext) -> Result<GroundingReport, QualityError> {
        let evidence_vocabulary: HashSet<String> = evidence.iter().flat_map(|reference| significant_words(&reference.content)).collect();
        let claims: Vec<GradedClaim> = split_claims(artifact)
            .into_iter()
            .map(|claim| {
                let grade = grade_claim(&claim, &evidence_vocabulary);
                GradedClaim { claim, grade }
            })
            .collect();

        #[allow(clippy::cast_precision_loss, reason = "claim counts are small, far below f64's exact-integer range")]
        let aggregate_score = if claims.is_empty() {
            1.0
        } else {
            claims.iter().map(|claim| grade_score(claim.grade)).sum::<f64>() / claims.len() as f64
        };

        let fabricated = claims.iter().filter(|claim| claim.grade == ClaimGrade::Fabricated).count();
        let verdict = if fabricated == 0 {
            "all claims grounded or treated as opinion".to_owned()
        } else {
            format!("{fabricated} of {} claims unsupported by evidence", claims.len())
        };

        Ok(GroundingReport { claims, aggregate_score, verdict })
    }
}

/// Blends stated confidence with the grounding score and any historical
/// correction factor for the domain.
#[derive(Debug, Default)]
pub struct HistoryBlendedCalibrator;

#[async_trait]
impl Calibrator for HistoryBlendedCalibrator {
    async fn calibrate(
        &self,
        stated_confidence: f64,
        grounding: &GroundingReport,
        history: &[CalibrationHistoryEntry],
        domain: &DomainTag,
    ) -> Result<CalibratedConfidence, QualityError> {
        let total_samples: u32 = history.iter().map(|entry| entry.sample_count).sum();
        let history_factor = if total_samples == 0 {
            1.0
        } else {
            #[allow(clippy::cast_precision_loss, reason = "sample counts are small, far below f64's exact-integer range")]
            let weighted: f64 = history
                .iter()
                .map(|entry| entry.mean_correction_factor * f64::from(entry.sample_count))
                .sum::<f64>()
                / f64::from(total_samples);
            weighted
        };

        let calibrated = (stated_confidence * grounding.aggregate_score * history_factor).clamp(0.0, 1.0);
        let correction_factor = if stated_confidence.abs() < f64::EPSILON { 1.0 } else { calibrated / stated_confidence };
        let delta = stated_confidence - calibrated;

        Ok(CalibratedConfidence {
            stated: stated_confidence,
            calibrated,
            correction_factor,
            overconfident: delta >= MISCALIBRATION_MARGIN,
            underconfident: delta <= -MISCALIBRATION_MARGIN,
            domain: domain.clone(),
        })
    }
}

/// Passes an output when both the calibrated confidence and the grounding
/// score clear the quality bar (identity override, else the default).
#[derive(Debug, Default)]
pub struct ThresholdNoiseGateFilter;

#[async_trait]
impl NoiseGateFilter for ThresholdNoiseGateFilter {
    async fn filter(
        &self,
        output: &ToolOutput,
        grounding: &GroundingReport,
        calibrated: &CalibratedConfidence,
        quality_bar_override: Option<f64>,
    ) -> Result<FilterOutcome, QualityError> {
        let quality_bar = quality_bar_override.unwrap_or(DEFAULT_QUALITY_BAR);
        let mut failed_dimensions = Vec::new();
        if grounding.aggregate_score < quality_bar {
            failed_dimensions.push("grounding_below_threshold".to_owned());
        }
        if calibrated.calibrated < quality_bar {
            failed_dimensions.push("confidence_below_threshold".to_owned());
        }

        if failed_dimensions.is_empty() {
            return Ok(FilterOutcome::Passed(FilteredOutput {
                content: output.content.clone(),
                quality: QualityMetadata {
                    grounding_score: grounding.aggregate_score,
                    calibrated_confidence: calibrated.calibrated,
                    quality_bar,
                },
            }));
        }

        let retry_guidance = format!(
            "raise grounding (currently {:.2}) and calibrated confidence (currently {:.2}) to at least {quality_bar:.2}; cite more evidence or narrow the claim",
            grounding.aggregate_score, calibrated.calibrated
        );
        Ok(FilterOutcome::Rejected(RejectedOutput { failed_dimensions, retry_guidance }))
    }
}
