// conscious-observer-config/src/config.rs
// ============================================================================
// Module: Conscious Observer Configuration
// Description: Configuration loading and validation for Conscious Observer.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: conscious-observer-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path
//! limits. Missing or invalid configuration fails closed rather than
//! silently falling back to defaults for fields the file did touch.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use conscious_observer_core::LoadThresholds;
use conscious_observer_core::LoadWeights;
use conscious_observer_core::ObserverEngineConfig;
use conscious_observer_core::PhaseTimeouts;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "conscious-observer.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CONSCIOUS_OBSERVER_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// On-disk configuration model for the Conscious Observer orchestrator.
///
/// Every field mirrors the §6 configuration surface exactly; there is no
/// field here without a corresponding knob consumed by the runtime engine.
#[derive(Debug, Clone, Deserialize)]
pub struct ObserverConfig {
    /// Hard cap on EMERGENCY-mode cycles.
    #[serde(default = "default_emergency_max_cycles")]
    pub emergency_max_cycles: u32,
    /// Baseline cycle duration used for stall detection, in milliseconds.
    #[serde(default = "default_expected_cycle_ms")]
    pub expected_cycle_ms: f64,
    /// Max consecutive SIMPLIFY actions before the next is promoted to ESCALATE.
    #[serde(default = "default_simplify_max_steps")]
    pub simplify_max_steps: u32,
    /// Max Gate-Out retry loops for a single invocation.
    #[serde(default = "default_gate_out_max_retries")]
    pub gate_out_max_retries: u32,
    /// Weights for the three cognitive-load sub-scores.
    #[serde(default)]
    pub load_weights: LoadWeightsConfig,
    /// Thresholds mapping aggregate load to a load recommendation.
    #[serde(default)]
    pub load_thresholds: LoadThresholdsConfig,
    /// Size of the `recentDecisions`/`recentOutputs` sliding windows.
    #[serde(default = "default_recent_decisions_window")]
    pub recent_decisions_window: usize,
    /// Whether entity recognition runs during Gate-In.
    #[serde(default = "default_entity_recognition_enabled")]
    pub entity_recognition_enabled: bool,
    /// Per-phase timeouts, in milliseconds.
    #[serde(default)]
    pub timeouts: PhaseTimeoutsConfig,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            emergency_max_cycles: default_emergency_max_cycles(),
            expected_cycle_ms: default_expected_cycle_ms(),
            simplify_max_steps: default_simplify_max_steps(),
            gate_out_max_retries: default_gate_out_max_retries(),
            load_weights: LoadWeightsConfig::default(),
            load_thresholds: LoadThresholdsConfig::default(),
            recent_decisions_window: default_recent_decisions_window(),
            entity_recognition_enabled: default_entity_recognition_enabled(),
            timeouts: PhaseTimeoutsConfig::default(),
        }
    }
}

impl ObserverConfig {
    /// Loads configuration from disk using the default resolution rules:
    /// an explicit path, else `CONSCIOUS_OBSERVER_CONFIG`, else
    /// `conscious-observer.toml` in the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the path is invalid, the file cannot be
    /// read, it exceeds the size limit, or it fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.emergency_max_cycles == 0 {
            return Err(ConfigError::Invalid("emergency_max_cycles must be >= 1".to_string()));
        }
        if self.expected_cycle_ms <= 0.0 {
            return Err(ConfigError::Invalid("expected_cycle_ms must be > 0".to_string()));
        }
        if self.recent_decisions_window == 0 {
            return Err(ConfigError::Invalid("recent_decisions_window must be >= 1".to_string()));
        }
        self.load_weights.validate()?;
        self.load_thresholds.validate()?;
        self.timeouts.validate()?;
        Ok(())
    }

    /// Converts this on-disk model into the runtime-facing
    /// [`ObserverEngineConfig`] consumed directly by the phase engines.
    #[must_use]
    pub fn to_engine_config(&self) -> ObserverEngineConfig {
        ObserverEngineConfig {
            emergency_max_cycles: self.emergency_max_cycles,
            expected_cycle_ms: self.expected_cycle_ms,
            simplify_max_steps: self.simplify_max_steps,
            gate_out_max_retries: self.gate_out_max_retries,
            load_weights: self.load_weights.to_core(),
            load_thresholds: self.load_thresholds.to_core(),
            recent_decisions_window: self.recent_decisions_window,
            entity_recognition_enabled: self.entity_recognition_enabled,
            timeouts: self.timeouts.to_core(),
        }
    }
}

/// Weights applied to the compute/time/breadth cognitive-load sub-scores.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LoadWeightsConfig {
    /// Weight of the compute sub-score.
    #[serde(default = "default_compute_weight")]
    pub compute: f64,
    /// Weight of the time sub-score.
    #[serde(default = "default_time_weight")]
    pub time: f64,
    /// Weight of the breadth sub-score.
    #[serde(default = "default_breadth_weight")]
    pub breadth: f64,
}

impl Default for LoadWeightsConfig {
    fn default() -> Self {
        Self {
            compute: default_compute_weight(),
            time: default_time_weight(),
            breadth: default_breadth_weight(),
        }
    }
}

impl LoadWeightsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("load_weights.compute", self.compute),
            ("load_weights.time", self.time),
            ("load_weights.breadth", self.breadth),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!("{field} must be in [0, 1]")));
            }
        }
        let sum = self.compute + self.time + self.breadth;
        if (sum - 1.0).abs() > 0.01 {
            return Err(ConfigError::Invalid(format!(
                "load_weights must sum to 1.0 (got {sum})"
            )));
        }
        Ok(())
    }

    fn to_core(self) -> LoadWeights {
        LoadWeights {
            compute: self.compute,
            time: self.time,
            breadth: self.breadth,
        }
    }
}

/// Load-recommendation thresholds applied to the aggregate cognitive load.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LoadThresholdsConfig {
    /// Aggregate load at or above which SIMPLIFY is recommended.
    #[serde(default = "default_simplify_threshold")]
    pub simplify: f64,
    /// Aggregate load at or above which ESCALATE is recommended.
    #[serde(default = "default_escalate_threshold")]
    pub escalate: f64,
    /// Aggregate load at or above which ABORT is recommended.
    #[serde(default = "default_abort_threshold")]
    pub abort: f64,
}

impl Default for LoadThresholdsConfig {
    fn default() -> Self {
        Self {
            simplify: default_simplify_threshold(),
            escalate: default_escalate_threshold(),
            abort: default_abort_threshold(),
        }
    }
}

impl LoadThresholdsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("load_thresholds.simplify", self.simplify),
            ("load_thresholds.escalate", self.escalate),
            ("load_thresholds.abort", self.abort),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!("{field} must be in [0, 1]")));
            }
        }
        if !(self.simplify <= self.escalate && self.escalate <= self.abort) {
            return Err(ConfigError::Invalid(
                "load_thresholds must be ordered simplify <= escalate <= abort".to_string(),
            ));
        }
        Ok(())
    }

    fn to_core(self) -> LoadThresholds {
        LoadThresholds {
            simplify: self.simplify,
            escalate: self.escalate,
            abort: self.abort,
        }
    }
}

/// Per-phase timeout configuration, in milliseconds.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PhaseTimeoutsConfig {
    /// Gate-In timeout.
    #[serde(default = "default_gate_in_timeout_ms")]
    pub gate_in_timeout_ms: u64,
    /// Per-cycle timeout inside the monitored execution loop.
    #[serde(default = "default_loop_cycle_timeout_ms")]
    pub loop_cycle_timeout_ms: u64,
    /// Gate-Out timeout.
    #[serde(default = "default_gate_out_timeout_ms")]
    pub gate_out_timeout_ms: u64,
}

impl Default for PhaseTimeoutsConfig {
    fn default() -> Self {
        Self {
            gate_in_timeout_ms: default_gate_in_timeout_ms(),
            loop_cycle_timeout_ms: default_loop_cycle_timeout_ms(),
            gate_out_timeout_ms: default_gate_out_timeout_ms(),
        }
    }
}

impl PhaseTimeoutsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.gate_in_timeout_ms == 0 || self.loop_cycle_timeout_ms == 0 || self.gate_out_timeout_ms == 0 {
            return Err(ConfigError::Invalid("phase timeouts must be > 0".to_string()));
        }
        Ok(())
    }

    fn to_core(self) -> PhaseTimeouts {
        PhaseTimeouts {
            gate_in_timeout_ms: self.gate_in_timeout_ms,
            loop_cycle_timeout_ms: self.loop_cycle_timeout_ms,
            gate_out_timeout_ms: self.gate_out_timeout_ms,
        }
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

const fn default_emergency_max_cycles() -> u32 {
    3
}
const fn default_expected_cycle_ms() -> f64 {
    2_000.0
}
const fn default_simplify_max_steps() -> u32 {
    2
}
const fn default_gate_out_max_retries() -> u32 {
    2
}
const fn default_recent_decisions_window() -> usize {
    10
}
const fn default_entity_recognition_enabled() -> bool {
    true
}
const fn default_compute_weight() -> f64 {
    0.40
}
const fn default_time_weight() -> f64 {
    0.35
}
const fn default_breadth_weight() -> f64 {
    0.25
}
const fn default_simplify_threshold() -> f64 {
    0.6
}
const fn default_escalate_threshold() -> f64 {
    0.8
}
const fn default_abort_threshold() -> f64 {
    0.95
}
const fn default_gate_in_timeout_ms() -> u64 {
    5_000
}
const fn default_loop_cycle_timeout_ms() -> u64 {
    30_000
}
const fn default_gate_out_timeout_ms() -> u64 {
    10_000
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from an explicit argument, the environment
/// variable, or the default filename, in that order.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_spec_section_six() {
        let config = ObserverConfig::default();
        assert_eq!(config.emergency_max_cycles, 3);
        assert!((config.expected_cycle_ms - 2_000.0).abs() < f64::EPSILON);
        assert_eq!(config.simplify_max_steps, 2);
        assert_eq!(config.gate_out_max_retries, 2);
        assert_eq!(config.recent_decisions_window, 10);
        assert!(config.entity_recognition_enabled);
        assert!((config.load_weights.compute - 0.40).abs() < f64::EPSILON);
        assert!((config.load_weights.time - 0.35).abs() < f64::EPSILON);
        assert!((config.load_weights.breadth - 0.25).abs() < f64::EPSILON);
        config.validate().expect("defaults must validate");
    }

    #[test]
    fn rejects_weights_that_do_not_sum_to_one() {
        let mut config = ObserverConfig::default();
        config.load_weights.compute = 0.9;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_out_of_order_thresholds() {
        let mut config = ObserverConfig::default();
        config.load_thresholds.simplify = 0.9;
        config.load_thresholds.escalate = 0.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_zero_timeouts() {
        let mut config = ObserverConfig::default();
        config.timeouts.gate_in_timeout_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_from_partial_toml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "emergency_max_cycles = 5").expect("write");
        let config = ObserverConfig::load(Some(file.path())).expect("load");
        assert_eq!(config.emergency_max_cycles, 5);
        assert_eq!(config.gate_out_max_retries, 2);
    }

    #[test]
    fn load_rejects_oversized_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        let filler = "# ".repeat(MAX_CONFIG_FILE_SIZE);
        file.write_all(filler.as_bytes()).expect("write");
        let err = ObserverConfig::load(Some(file.path())).expect_err("should fail");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn to_engine_config_round_trips_values() {
        let config = ObserverConfig::default();
        let engine = config.to_engine_config();
        assert_eq!(engine.emergency_max_cycles, config.emergency_max_cycles);
        assert_eq!(engine.recent_decisions_window, config.recent_decisions_window);
    }
}
