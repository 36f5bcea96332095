//! Health score aggregation
//!
//! Collapses the run's drift signals into a single 0-100 reliability
//! indicator. Pure and deterministic: the same signals always produce
//! the same score, and worsening any one signal can only lower it.

use crate::error::{ModelShiftError, Result};
use serde::{Deserialize, Serialize};

/// Penalty weights for the health score.
///
/// Each weight is the maximum number of points its (clamped) signal can
/// subtract from 100; the sum is the total penalty budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthWeights {
    /// Weight of the worst single feature's KS statistic
    pub feature: f64,
    /// Weight of the prediction-distribution KS statistic
    pub prediction: f64,
    /// Weight of the entropy rise (negative deltas never penalize)
    pub entropy: f64,
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            feature: 40.0,
            prediction: 40.0,
            entropy: 20.0,
        }
    }
}

impl HealthWeights {
    /// Total penalty budget (sum of weights)
    pub fn budget(&self) -> f64 {
        self.feature + self.prediction + self.entropy
    }

    /// Check all weights are finite and non-negative
    pub fn validate(&self) -> Result<()> {
        let ok = [self.feature, self.prediction, self.entropy]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0);
        if !ok {
            return Err(ModelShiftError::InvalidConfig(format!(
                "health weights must be finite and non-negative, got ({}, {}, {})",
                self.feature, self.prediction, self.entropy
            )));
        }
        Ok(())
    }
}

/// Normalized drift signal magnitudes feeding the scorer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriftSignals {
    /// KS statistic of the most-drifted feature
    pub max_feature_ks: f64,
    /// KS statistic over the prediction probabilities
    pub prediction_ks: f64,
    /// Mean entropy delta (live - baseline)
    pub delta_entropy: f64,
}

/// Deterministic health scorer
#[derive(Debug, Clone)]
pub struct HealthScorer {
    weights: HealthWeights,
}

impl HealthScorer {
    /// Create a scorer with the given weights
    pub fn new(weights: HealthWeights) -> Self {
        Self { weights }
    }

    /// Score a set of drift signals.
    ///
    /// `score = clamp(100 - sum(w_i * clamp(s_i, 0, 1)), 0, 100)`. All
    /// signals at zero give exactly 100.
    pub fn score(&self, signals: &DriftSignals) -> f64 {
        let penalty = self.weights.feature * signals.max_feature_ks.clamp(0.0, 1.0)
            + self.weights.prediction * signals.prediction_ks.clamp(0.0, 1.0)
            + self.weights.entropy * signals.delta_entropy.clamp(0.0, 1.0);

        (100.0 - penalty).clamp(0.0, 100.0)
    }

    /// Baseline-vs-baseline reference score: every signal at zero
    pub fn clean_reference(&self) -> f64 {
        self.score(&DriftSignals::default())
    }
}

impl Default for HealthScorer {
    fn default() -> Self {
        Self::new(HealthWeights::default())
    }
}
