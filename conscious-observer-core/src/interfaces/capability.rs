//! The self-model collaborator: capability assessment against signal tags
//! and identity.

use async_trait::async_trait;

use crate::core::CapabilityAssessment;
use crate::core::IdentityContext;
use crate::core::SignalTags;

/// Error kinds the self-model collaborator may report.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SelfModelError {
    /// Wraps a failure decoding the collaborator's envelope.
    #[error(transparent)]
    Unwrap(#[from] crate::core::UnwrapError),
}

/// Assesses whether the current identity can handle a classified input.
#[async_trait]
pub trait SelfModel: Send + Sync {
    /// Runs the assessment.
    ///
    /// # Errors
    ///
    /// Returns [`SelfModelError`] on collaborator-reported failure.
    async fn assess(&self, tags: &SignalTags, identity: &IdentityContext) -> Result<CapabilityAssessment, SelfModelError>;
}
