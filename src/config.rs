//! Engine configuration.
//!
//! Every section has defaults, so `{}` is a complete configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::osrm::OsrmConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub thresholds: Thresholds,
    pub routing: RoutingOptions,
    pub viewport: ViewportOptions,
    pub osrm: OsrmConfig,
}

/// Availability thresholds for shortage detection and supplier eligibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Ratios strictly below this are critical.
    pub critical_ratio: f64,
    /// Ratios strictly below this (and not critical) are a warning.
    pub warning_ratio: f64,
    /// Suppliers need a ratio strictly above this.
    pub supplier_ratio: f64,
    /// Distances closer than this are ties, broken by hospital id.
    pub tie_epsilon_km: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            critical_ratio: 0.30,
            warning_ratio: 0.50,
            supplier_ratio: 0.50,
            tie_epsilon_km: 1e-6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingOptions {
    /// Speed used for straight-line duration estimates.
    pub assumed_speed_kmh: f64,
    /// Upper bound on one routing service call.
    pub timeout_ms: u64,
}

impl Default for RoutingOptions {
    fn default() -> Self {
        Self {
            assumed_speed_kmh: 50.0,
            timeout_ms: 5_000,
        }
    }
}

impl RoutingOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportOptions {
    /// Fraction of the bounds' span added on every side.
    pub padding_fraction: f64,
    pub max_zoom: u8,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            padding_fraction: 0.1,
            max_zoom: 13,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        for (name, value) in [
            ("critical_ratio", t.critical_ratio),
            ("warning_ratio", t.warning_ratio),
            ("supplier_ratio", t.supplier_ratio),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }
        if t.critical_ratio > t.warning_ratio {
            return Err(ConfigError::Invalid(format!(
                "critical_ratio ({}) exceeds warning_ratio ({})",
                t.critical_ratio, t.warning_ratio
            )));
        }
        if !(t.tie_epsilon_km >= 0.0) {
            return Err(ConfigError::Invalid("tie_epsilon_km must be >= 0".to_string()));
        }
        if !(self.routing.assumed_speed_kmh > 0.0) {
            return Err(ConfigError::Invalid(
                "assumed_speed_kmh must be positive".to_string(),
            ));
        }
        if self.routing.timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeout_ms must be non-zero".to_string()));
        }
        if !(self.viewport.padding_fraction >= 0.0) {
            return Err(ConfigError::Invalid(
                "padding_fraction must be >= 0".to_string(),
            ));
        }
        Ok(())
    }
}
