//! Host pressure source consulted during Gate-In (step 8).
//!
//! Advisory only: the orchestrator does not measure CPU/RAM itself and
//! trusts whatever value this collaborator reports.

use async_trait::async_trait;

/// Error kinds the pressure source may report.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PressureError {
    /// The pressure source could not be reached.
    #[error("pressure source unavailable: {0}")]
    Unavailable(String),
}

/// Reports a scalar summary of host resource scarcity, in `[0, 1]`.
#[async_trait]
pub trait PressureSource: Send + Sync {
    /// Reads current host pressure.
    ///
    /// # Errors
    ///
    /// Returns [`PressureError::Unavailable`] if the source cannot be
    /// reached; callers default to `0.0` rather than propagating this.
    async fn read(&self) -> Result<f64, PressureError>;
}
