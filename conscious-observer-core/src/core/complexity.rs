//! Complexity levels, processing modes, and the activation map they drive.

use serde::Deserialize;
use serde::Serialize;

/// Ordered classification of a signal's processing demand.
///
/// # Invariants
/// - Total order: `TRIVIAL < SIMPLE < MODERATE < COMPLEX < CRITICAL`. The
///   pipeline downgrader relies on this order to step exactly one level down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    /// Lowest tier; maps to `ProcessingMode::Fast`.
    Trivial,
    /// Maps to `ProcessingMode::Fast`.
    Simple,
    /// Maps to `ProcessingMode::Standard`.
    Moderate,
    /// Maps to `ProcessingMode::Full`.
    Complex,
    /// Highest tier; maps to `ProcessingMode::Emergency` and is never downgraded.
    Critical,
}

impl ComplexityLevel {
    /// Returns the next lower complexity level, or `None` at `Trivial`.
    #[must_use]
    pub const fn step_down(self) -> Option<Self> {
        match self {
            Self::Trivial => None,
            Self::Simple => Some(Self::Trivial),
            Self::Moderate => Some(Self::Simple),
            Self::Complex => Some(Self::Moderate),
            Self::Critical => Some(Self::Complex),
        }
    }
}

/// One of the four pipeline variants; governs what preparation runs before
/// the monitored execution loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    /// TRIVIAL / SIMPLE: bypass planning entirely.
    Fast,
    /// MODERATE: task decomposition only, no DAG synthesis.
    Standard,
    /// COMPLEX: the full planning stack runs before the loop.
    Full,
    /// CRITICAL: bypass planning; clamp cycles; never downgraded.
    Emergency,
}

impl From<ComplexityLevel> for ProcessingMode {
    fn from(level: ComplexityLevel) -> Self {
        match level {
            ComplexityLevel::Trivial | ComplexityLevel::Simple => Self::Fast,
            ComplexityLevel::Moderate => Self::Standard,
            ComplexityLevel::Complex => Self::Full,
            ComplexityLevel::Critical => Self::Emergency,
        }
    }
}

/// The pipeline-template table entry for one complexity level: which tiers
/// and modules are active, and which tools are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineTemplate {
    /// Cognitive tiers active at this complexity level.
    pub active_tiers: Vec<String>,
    /// Sub-modules active at this complexity level.
    pub active_modules: Vec<String>,
    /// Tools required to run this template.
    pub required_tools: Vec<String>,
    /// Maximum monitored-loop cycles allowed under this template.
    pub max_cycles: u32,
}

/// Selection of which cognitive sub-modules and tiers are active for a given
/// input, plus whether pressure forced a downgrade from the originally
/// assessed complexity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationMap {
    /// Descriptive name of the pipeline variant in effect.
    pub name: String,
    /// The complexity level this map is built for.
    pub complexity: ComplexityLevel,
    /// The template (tiers/modules/tools/cycle cap) for `complexity`.
    pub template: PipelineTemplate,
    /// Set when host pressure forced this map's complexity lower than the
    /// originally assessed level.
    pub pressure_downgraded: bool,
}
