//! Drift detection
//!
//! Compares the baseline window against the live window: per-feature
//! distributional drift via the two-sample KS test, prediction-output
//! drift via the same test plus predictive-entropy shift, and ordinal
//! severity classification of the resulting magnitudes.

mod feature_drift;
mod prediction_drift;

pub use feature_drift::{FeatureDriftAnalyzer, FeatureDriftResult};
pub(crate) use feature_drift::most_drifted;
pub use prediction_drift::{PredictionDriftAnalyzer, PredictionDriftResult};

use crate::error::{ModelShiftError, Result};
use serde::{Deserialize, Serialize};

/// Ordinal drift severity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Magnitude below the low threshold; considered noise
    Low,
    /// Magnitude inside the medium band; worth watching
    Medium,
    /// Magnitude at or above the high threshold; actionable drift
    High,
}

/// Ordered threshold table mapping a drift magnitude to a [`Severity`].
///
/// `medium` names the lower edge of the MEDIUM band for config
/// readability; classification uses `low` and `high` as the band cut
/// points. Thresholds must be strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    /// Magnitudes below this are LOW
    pub low: f64,
    /// Lower edge of the MEDIUM band
    pub medium: f64,
    /// Magnitudes at or above this are HIGH
    pub high: f64,
}

impl SeverityThresholds {
    /// Default table for KS-statistic magnitudes
    pub fn ks() -> Self {
        Self {
            low: 0.2,
            medium: 0.35,
            high: 0.5,
        }
    }

    /// Default table for entropy-delta magnitudes
    pub fn entropy() -> Self {
        Self {
            low: 0.1,
            medium: 0.2,
            high: 0.3,
        }
    }

    /// Check the table is finite and strictly increasing
    pub fn validate(&self) -> Result<()> {
        let finite = self.low.is_finite() && self.medium.is_finite() && self.high.is_finite();
        if !finite || self.low < 0.0 || !(self.low < self.medium && self.medium < self.high) {
            return Err(ModelShiftError::InvalidConfig(format!(
                "severity thresholds must satisfy 0 <= low < medium < high, got ({}, {}, {})",
                self.low, self.medium, self.high
            )));
        }
        Ok(())
    }

    /// Classify a non-negative drift magnitude
    pub fn classify(&self, magnitude: f64) -> Severity {
        if magnitude < self.low {
            Severity::Low
        } else if magnitude < self.high {
            Severity::Medium
        } else {
            Severity::High
        }
    }
}
