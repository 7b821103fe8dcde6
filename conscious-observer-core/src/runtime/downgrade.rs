//! Pipeline Downgrader (C3): deterministically maps a pipeline mode to the
//! next-simpler one.

use crate::core::ActivationMap;
use crate::core::ComplexityLevel;
use crate::core::PipelineTemplate;
use crate::core::ProcessingMode;

/// Error returned when the downgrader is asked to downgrade a map it must
/// refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DowngradeError {
    /// CRITICAL maps are never downgraded.
    #[error("CRITICAL activation maps cannot be downgraded")]
    CriticalRejected,
}

/// Returns the pipeline-template table entry for `level`.
///
/// This is the same table the activation-router collaborator consults when
/// first building a map; C3 rebuilds from it directly so a downgraded map's
/// module bookkeeping always matches the level it now claims.
#[must_use]
pub fn pipeline_template_for(level: ComplexityLevel) -> PipelineTemplate {
    match level {
        ComplexityLevel::Trivial => PipelineTemplate {
            active_tiers: vec!["reflexive".to_owned()],
            active_modules: vec![],
            required_tools: vec![],
            max_cycles: 1,
        },
        ComplexityLevel::Simple => PipelineTemplate {
            active_tiers: vec!["reflexive".to_owned(), "reactive".to_owned()],
            active_modules: vec!["modality".to_owned(), "classification".to_owned()],
            required_tools: vec![],
            max_cycles: 3,
        },
        ComplexityLevel::Moderate => PipelineTemplate {
            active_tiers: vec!["reactive".to_owned(), "deliberative".to_owned()],
            active_modules: vec!["task-decomposition".to_owned()],
            required_tools: vec![],
            max_cycles: 8,
        },
        ComplexityLevel::Complex => PipelineTemplate {
            active_tiers: vec!["deliberative".to_owned(), "reflective".to_owned()],
            active_modules: vec![
                "task-decomposition".to_owned(),
                "graph-synthesizer".to_owned(),
                "advanced-planning".to_owned(),
                "reflection-guardrails".to_owned(),
            ],
            required_tools: vec![],
            max_cycles: 25,
        },
        ComplexityLevel::Critical => PipelineTemplate {
            active_tiers: vec!["reflexive".to_owned(), "reflective".to_owned()],
            active_modules: vec![],
            required_tools: vec![],
            max_cycles: 3,
        },
    }
}

/// Returns the pipeline-descriptor name matching `level`'s processing mode.
fn pipeline_name_for(level: ComplexityLevel) -> &'static str {
    match ProcessingMode::from(level) {
        ProcessingMode::Fast => "fast",
        ProcessingMode::Standard => "standard",
        ProcessingMode::Full => "full",
        ProcessingMode::Emergency => "emergency",
    }
}

/// Returns a new [`ActivationMap`] whose complexity is exactly one level
/// lower than `map`'s, with the pipeline-template table rebuilt for that
/// level and `pressure_downgraded` set.
///
/// Idempotent at TRIVIAL: downgrading a TRIVIAL map returns it unchanged, so
/// repeated SIMPLIFY recommendations against an already-minimal pipeline
/// cannot loop.
///
/// # Errors
///
/// Returns [`DowngradeError::CriticalRejected`] if `map.complexity` is
/// `ComplexityLevel::Critical`.
pub fn downgrade(map: &ActivationMap) -> Result<ActivationMap, DowngradeError> {
    if map.complexity == ComplexityLevel::Critical {
        return Err(DowngradeError::CriticalRejected);
    }
    let Some(lower) = map.complexity.step_down() else {
        return Ok(map.clone());
    };
    Ok(ActivationMap {
        name: pipeline_name_for(lower).to_owned(),
        complexity: lower,
        template: pipeline_template_for(lower),
        pressure_downgraded: true,
    })
}
