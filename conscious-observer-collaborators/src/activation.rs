// conscious-observer-collaborators/src/activation.rs
// ============================================================================
// Module: Reference Activation Router
// Description: Complexity assessment and pressure-based activation mapping.
// Purpose: Gate-In step 4 collaborator.
// Dependencies: conscious-observer-core
// ============================================================================

//! ## Overview
//! Complexity is assessed from signal tags (urgency, structural complexity,
//! entity count, intent) and capability; pressure then forces a downgrade
//! exactly as the pipeline downgrader (C3) would perform it later in the loop.

use async_trait::async_trait;
use conscious_observer_core::ActivationError;
use conscious_observer_core::ActivationMap;
use conscious_observer_core::ActivationRouter;
use conscious_observer_core::CapabilityAssessment;
use conscious_observer_core::ComplexityLevel;
use conscious_observer_core::IntentClass;
use conscious_observer_core::ProcessingMode;
use conscious_observer_core::SignalTags;
use conscious_observer_core::UrgencyLevel;
use conscious_observer_core::runtime::downgrade::pipeline_template_for;

fn pipeline_name_for(level: ComplexityLevel) -> &'static str {
    match ProcessingMode::from(level) {
        ProcessingMode::Fast => "fast",
        ProcessingMode::Standard => "standard",
        ProcessingMode::Full => "full",
        ProcessingMode::Emergency => "emergency",
    }
}

fn build_map(level: ComplexityLevel, pressure_downgraded: bool) -> ActivationMap {
    ActivationMap {
        name: pipeline_name_for(level).to_owned(),
        complexity: level,
        template: pipeline_template_for(level),
        pressure_downgraded,
    }
}

/// Assesses complexity from signal tags and capability, then steps the
/// level down under sustained host pressure.
///
/// # Invariants
/// - [`UrgencyLevel::Critical`] always produces [`ComplexityLevel::Critical`],
///   which pressure never downgrades further.
#[derive(Debug, Default)]
pub struct ThresholdActivationRouter;

impl ThresholdActivationRouter {
    fn assess_level(tags: &SignalTags, capability: &CapabilityAssessment) -> ComplexityLevel {
        if tags.urgency == UrgencyLevel::Critical {
            return ComplexityLevel::Critical;
        }
        if !capability.can_handle {
            return ComplexityLevel::Complex;
        }
        if tags.intent_class == IntentClass::Conversational && tags.structural_complexity < 0.1 && tags.entity_count == 0 {
            return ComplexityLevel::Trivial;
        }
        if tags.structural_complexity < 0.25 && tags.required_skills.is_empty() && tags.required_tools.is_empty() {
            return ComplexityLevel::Simple;
        }
        if tags.structural_complexity < 0.6 {
            return ComplexityLevel::Moderate;
        }
        ComplexityLevel::Complex
    }

    /// Pressure at or above this threshold downgrades a map exactly one
    /// level; below it, pressure has no effect.
    const PRESSURE_DOWNGRADE_THRESHOLD: f64 = 0.5;

    /// Steps `level` down exactly one level once pressure reaches
    /// [`Self::PRESSURE_DOWNGRADE_THRESHOLD`], never crossing below `Trivial`
    /// and never touching `Critical`. Pressure is a single scalar consulted
    /// once per call, so the decision stays deterministic in
    /// `(complexity, pressure)`.
    fn apply_pressure(level: ComplexityLevel, pressure: f64) -> (ComplexityLevel, bool) {
        if level == ComplexityLevel::Critical || pressure < Self::PRESSURE_DOWNGRADE_THRESHOLD {
            return (level, false);
        }
        match level.step_down() {
            Some(next) => (next, true),
            None => (level, false),
        }
    }
}

#[async_trait]
impl ActivationRouter for ThresholdActivationRouter {
    async fn compute(
        &self,
        tags: &SignalTags,
        capability: &CapabilityAssessment,
        pressure: f64,
    ) -> Result<ActivationMap, ActivationError> {
        let assessed = Self::assess_level(tags, capability);
        let (final_level, pressure_downgraded) = Self::apply_pressure(assessed, pressure);
        Ok(build_map(final_level, pressure_downgraded))
    }
}
