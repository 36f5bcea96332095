//! Monitoring configuration
//!
//! Severity thresholds and health weights are configuration, not code:
//! the defaults documented here are starting points, and deployments
//! tune them per model. The config round-trips through serde so it can
//! live in a JSON/YAML file next to the monitored model.

use crate::drift::SeverityThresholds;
use crate::error::Result;
use crate::health::HealthWeights;
use serde::{Deserialize, Serialize};

/// Default number of retained history entries
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Complete configuration for one model monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Severity bands for KS-statistic magnitudes (features and
    /// predictions). Defaults: low 0.2, medium 0.35, high 0.5.
    pub ks_thresholds: SeverityThresholds,
    /// Severity bands for the entropy rise. Defaults: low 0.1,
    /// medium 0.2, high 0.3.
    pub entropy_thresholds: SeverityThresholds,
    /// Penalty weights for the health score. Defaults: feature 40,
    /// prediction 40, entropy 20 (budget 100).
    pub health_weights: HealthWeights,
    /// Maximum retained runs; oldest evicted first past this
    pub history_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            ks_thresholds: SeverityThresholds::ks(),
            entropy_thresholds: SeverityThresholds::entropy(),
            health_weights: HealthWeights::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl MonitorConfig {
    /// Validate thresholds, weights, and capacity
    pub fn validate(&self) -> Result<()> {
        self.ks_thresholds.validate()?;
        self.entropy_thresholds.validate()?;
        self.health_weights.validate()?;
        if self.history_capacity == 0 {
            return Err(crate::error::ModelShiftError::InvalidConfig(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
