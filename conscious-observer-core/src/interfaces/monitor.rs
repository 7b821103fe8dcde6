//! The cognitive-load monitor collaborator, consulted after every cycle.

use async_trait::async_trait;

use crate::core::ActivationMap;
use crate::core::CycleTelemetry;
use crate::core::Decision;
use crate::core::LoadRecommendation;

/// Error kinds the cognitive-load monitor may report.
///
/// A monitor failure is fail-open: C5 logs it and treats it as `CONTINUE`
/// rather than aborting, to avoid spurious aborts from a flaky monitor.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MonitorError {
    /// Wraps a failure decoding the collaborator's envelope.
    #[error(transparent)]
    Unwrap(#[from] crate::core::UnwrapError),
}

/// Assesses cognitive load after a cycle and recommends continue / simplify /
/// escalate / abort.
#[async_trait]
pub trait CognitiveLoadMonitor: Send + Sync {
    /// Computes a load recommendation.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError`] on collaborator-reported failure; callers
    /// must treat this as `CONTINUE`, per the fail-open monitoring policy.
    async fn monitor(
        &self,
        activation_map: &ActivationMap,
        telemetry: &CycleTelemetry,
        recent_decisions: &[Decision],
        recent_outputs: &[String],
        objective: &str,
    ) -> Result<LoadRecommendation, MonitorError>;
}
