// conscious-observer-collaborators/src/pressure.rs
// ============================================================================
// Module: Reference Pressure Source
// Description: Caller-settable host-pressure scalar for Gate-In step 8.
// Purpose: Give Gate-In a pressure reading without measuring the host.
// Dependencies: conscious-observer-core, std::sync::atomic
// ============================================================================

//! ## Overview
//! Per §5, the orchestrator treats host pressure as advisory and never
//! measures CPU/RAM itself. This reference source holds a fixed scalar an
//! operator (or a test) sets directly; it never fails.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use conscious_observer_core::PressureError;
use conscious_observer_core::PressureSource;

/// Bit pattern used to store an `f64` pressure value in an `AtomicU64`.
fn to_bits(value: f64) -> u64 {
    value.clamp(0.0, 1.0).to_bits()
}

/// Reports a caller-settable pressure scalar; defaults to `0.0`.
#[derive(Debug)]
pub struct FixedPressureSource {
    bits: AtomicU64,
}

impl Default for FixedPressureSource {
    fn default() -> Self {
        Self { bits: AtomicU64::new(to_bits(0.0)) }
    }
}

impl FixedPressureSource {
    /// Creates a pressure source fixed at `pressure`, clamped to `[0, 1]`.
    #[must_use]
    pub fn at(pressure: f64) -> Self {
        Self { bits: AtomicU64::new(to_bits(pressure)) }
    }

    /// Updates the reported pressure, clamped to `[0, 1]`.
    pub fn set(&self, pressure: f64) {
        self.bits.store(to_bits(pressure), Ordering::Relaxed);
    }
}

#[async_trait]
impl PressureSource for FixedPressureSource {
    async fn read(&self) -> Result<f64, PressureError> {
        Ok(f64::from_bits(self.bits.load(Ordering::Relaxed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_back_the_fixed_value() {
        let source = FixedPressureSource::at(0.42);
        assert!((source.read().await.expect("reads") - 0.42).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn clamps_out_of_range_values() {
        let source = FixedPressureSource::at(5.0);
        assert!((source.read().await.expect("reads") - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn set_updates_the_reading() {
        let source = FixedPressureSource::default();
        source.set(0.9);
        assert!((source.read().await.expect("reads") - 0.9).abs() < f64::EPSILON);
    }
}
