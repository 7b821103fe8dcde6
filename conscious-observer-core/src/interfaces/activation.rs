//! The activation-router collaborator: computes the activation map.

use async_trait::async_trait;

use crate::core::ActivationMap;
use crate::core::CapabilityAssessment;
use crate::core::SignalTags;

/// Error kinds the activation-router collaborator may report.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ActivationError {
    /// Wraps a failure decoding the collaborator's envelope.
    #[error(transparent)]
    Unwrap(#[from] crate::core::UnwrapError),
}

/// Computes an [`ActivationMap`] from signal tags, capability, and host
/// pressure. The collaborator owns complexity assessment and the
/// pressure-based downgrade decision; the orchestrator only translates the
/// resulting complexity into a [`crate::core::ProcessingMode`].
#[async_trait]
pub trait ActivationRouter: Send + Sync {
    /// Computes the activation map.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError`] on collaborator-reported failure.
    async fn compute(
        &self,
        tags: &SignalTags,
        capability: &CapabilityAssessment,
        pressure: f64,
    ) -> Result<ActivationMap, ActivationError>;
}
