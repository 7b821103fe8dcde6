//! Gate-Out Phase (C7): the sequential grounding → calibration → filter
//! chain. See §4.7. Retry orchestration (re-running the mode dispatcher on a
//! quality rejection) lives in the orchestrator entry (C8), since it needs
//! to call back into C6; this module runs exactly one pass of the chain.

use tracing::info;
use tracing::warn;

use crate::core::CalibratedConfidence;
use crate::core::DomainTag;
use crate::core::FilterOutcome;
use crate::core::GroundingReport;
use crate::core::IdentityContext;
use crate::core::ToolOutput;
use crate::interfaces::Calibrator;
use crate::interfaces::EvidenceRef;
use crate::interfaces::GroundingVerifier;
use crate::interfaces::NoiseGateFilter;
use crate::interfaces::QualityError;

/// Collaborator handles Gate-Out needs.
pub struct GateOutCollaborators<'a> {
    /// Grounding verification.
    pub grounding: &'a dyn GroundingVerifier,
    /// Confidence calibration.
    pub calibrator: &'a dyn Calibrator,
    /// The output filter.
    pub filter: &'a dyn NoiseGateFilter,
}

/// One pass of Gate-Out's three-step chain succeeded in producing a verdict.
pub enum GateOutPass {
    /// The filter passed the output.
    Passed {
        /// The annotated content and quality metadata.
        filtered: crate::core::FilteredOutput,
        /// The grounding report produced in step 1.
        grounding: GroundingReport,
        /// The calibrated confidence produced in step 2.
        calibrated: CalibratedConfidence,
    },
    /// The filter rejected the output.
    Rejected {
        /// Failed dimensions and retry guidance.
        rejected: crate::core::RejectedOutput,
        /// The grounding report produced in step 1.
        grounding: GroundingReport,
        /// The calibrated confidence produced in step 2.
        calibrated: CalibratedConfidence,
    },
}

/// Runs one pass of Gate-Out's three-step chain: grounding verification,
/// confidence calibration, and the output filter, strictly sequentially.
///
/// # Errors
///
/// Returns [`QualityError`] if any of the three collaborators fails
/// outright; a quality rejection is not an error and is reported as
/// `Ok(GateOutPass::Rejected { .. })`.
pub async fn run_gate_out_once(
    output: &ToolOutput,
    evidence: &[EvidenceRef],
    identity: &IdentityContext,
    domain: &DomainTag,
    history: &[crate::interfaces::CalibrationHistoryEntry],
    collaborators: &GateOutCollaborators<'_>,
) -> Result<GateOutPass, QualityError> {
    // Step 1: grounding verification.
    let grounding = collaborators.grounding.verify(&output.content, evidence, identity).await?;
    info!(aggregate_score = grounding.aggregate_score, "Gate-Out: grounding verification complete");

    // Step 2: confidence calibration.
    let calibrated = collaborators
        .calibrator
        .calibrate(output.stated_confidence, &grounding, history, domain)
        .await?;
    info!(calibrated = calibrated.calibrated, "Gate-Out: calibration complete");

    // Step 3: filter.
    let outcome = collaborators
        .filter
        .filter(output, &grounding, &calibrated, identity.quality_bar_override)
        .await?;

    Ok(match outcome {
        FilterOutcome::Passed(filtered) => {
            info!("Gate-Out: filter passed");
            GateOutPass::Passed { filtered, grounding, calibrated }
        }
        FilterOutcome::Rejected(rejected) => {
            warn!(failed_dimensions = ?rejected.failed_dimensions, "Gate-Out: filter rejected output");
            GateOutPass::Rejected { rejected, grounding, calibrated }
        }
    })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::GateOutCollaborators;
    use super::GateOutPass;
    use super::run_gate_out_once;
    use crate::core::CalibratedConfidence;
    use crate::core::ClaimGrade;
    use crate::core::DomainTag;
    use crate::core::FilterOutcome;
    use crate::core::FilteredOutput;
    use crate::core::GradedClaim;
    use crate::core::GroundingReport;
    use crate::core::IdentityContext;
    use crate::core::QualityMetadata;
    use crate::core::ToolOutput;
    use crate::core::identifiers::OutputId;
    use crate::interfaces::CalibrationHistoryEntry;
    use crate::interfaces::Calibrator;
    use crate::interfaces::EvidenceRef;
    use crate::interfaces::GroundingVerifier;
    use crate::interfaces::NoiseGateFilter;
    use crate::interfaces::QualityError;

    struct FixedGrounding;
    #[async_trait]
    impl GroundingVerifier for FixedGrounding {
        async fn verify(&self, _artifact: &str, _evidence: &[EvidenceRef], _identity: &IdentityContext) -> Result<GroundingReport, QualityError> {
            Ok(GroundingReport {
                claims: vec![GradedClaim { claim: "hi".to_owned(), grade: ClaimGrade::Grounded }],
                aggregate_score: 1.0,
                verdict: "opinion/greeting auto-grounded".to_owned(),
            })
        }
    }

    struct PassthroughCalibrator;
    #[async_trait]
    impl Calibrator for PassthroughCalibrator {
        async fn calibrate(
            &self,
            stated: f64,
            _grounding: &GroundingReport,
            _history: &[CalibrationHistoryEntry],
            domain: &DomainTag,
        ) -> Result<CalibratedConfidence, QualityError> {
            Ok(CalibratedConfidence {
                stated,
                calibrated: stated,
                correction_factor: 1.0,
                overconfident: false,
                underconfident: false,
                domain: domain.clone(),
            })
        }
    }

    struct AlwaysPassFilter;
    #[async_trait]
    impl NoiseGateFilter for AlwaysPassFilter {
        async fn filter(
            &self,
            output: &ToolOutput,
            _grounding: &GroundingReport,
            _calibrated: &CalibratedConfidence,
            _quality_bar_override: Option<f64>,
        ) -> Result<FilterOutcome, QualityError> {
            Ok(FilterOutcome::Passed(FilteredOutput {
                content: output.content.clone(),
                quality: QualityMetadata { grounding_score: 1.0, calibrated_confidence: 1.0, quality_bar: 0.5 },
            }))
        }
    }

    #[tokio::test]
    async fn chain_runs_sequentially_and_passes() {
        let collaborators = GateOutCollaborators {
            grounding: &FixedGrounding,
            calibrator: &PassthroughCalibrator,
            filter: &AlwaysPassFilter,
        };
        let output = ToolOutput {
            output_id: OutputId::new("out-1"),
            content: "hi".to_owned(),
            metadata: serde_json::Value::Null,
            stated_confidence: 0.9,
            source_node_id: None,
            source_loop_id: "loop-1".to_owned(),
        };
        let identity = IdentityContext {
            role: "assistant".to_owned(),
            tools_allowed: Default::default(),
            tools_forbidden: Default::default(),
            knowledge_domains: Default::default(),
            quality_bar_override: None,
            max_parallel_subtasks: 1,
        };
        let domain = DomainTag::new("greeting");

        let result = run_gate_out_once(&output, &[], &identity, &domain, &[], &collaborators).await.expect("chain succeeds");
        assert!(matches!(result, GateOutPass::Passed { .. }));
    }
}
