//! Prediction-output drift and uncertainty analysis

use crate::drift::{Severity, SeverityThresholds};
use crate::error::{ModelShiftError, Result};
use crate::stats;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Drift and uncertainty shift over model output probabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionDriftResult {
    /// Two-sample KS statistic between the probability distributions
    pub ks_statistic: f64,
    /// Asymptotic two-sample KS p-value
    pub p_value: f64,
    /// Mean binary predictive entropy of the baseline window
    pub baseline_mean_entropy: f64,
    /// Mean binary predictive entropy of the live window
    pub live_mean_entropy: f64,
    /// `live_mean_entropy - baseline_mean_entropy`; positive values
    /// signal rising uncertainty
    pub delta_entropy: f64,
    /// Worst of the KS severity and the entropy-rise severity
    pub severity: Severity,
}

/// Analyzes the model's output probabilities across the window pair.
///
/// Scores are treated as opaque black-box outputs; they are never
/// recomputed or corrected. Two signals are produced: distribution-shape
/// drift (KS) and uncertainty shift (mean entropy delta). A negative
/// entropy delta is recorded but never classified as degradation.
#[derive(Debug, Clone)]
pub struct PredictionDriftAnalyzer {
    ks_thresholds: SeverityThresholds,
    entropy_thresholds: SeverityThresholds,
}

impl PredictionDriftAnalyzer {
    /// Create an analyzer with the given KS and entropy-delta tables
    pub fn new(ks_thresholds: SeverityThresholds, entropy_thresholds: SeverityThresholds) -> Self {
        Self {
            ks_thresholds,
            entropy_thresholds,
        }
    }

    /// Analyze baseline vs live prediction probabilities.
    ///
    /// Fails with `EmptyPredictionSet` when either sequence has no
    /// usable samples.
    pub fn analyze(
        &self,
        baseline: &Array1<f64>,
        live: &Array1<f64>,
    ) -> Result<PredictionDriftResult> {
        if baseline.is_empty() {
            return Err(ModelShiftError::EmptyPredictionSet(
                "baseline prediction set is empty".to_string(),
            ));
        }
        if live.is_empty() {
            return Err(ModelShiftError::EmptyPredictionSet(
                "live prediction set is empty".to_string(),
            ));
        }

        let ks = stats::ks_statistic(baseline, live);
        let p = stats::ks_p_value(ks, baseline.len(), live.len());

        let baseline_mean_entropy = stats::mean_entropy(baseline);
        let live_mean_entropy = stats::mean_entropy(live);
        let delta_entropy = live_mean_entropy - baseline_mean_entropy;

        let severity = self
            .ks_thresholds
            .classify(ks)
            .max(self.entropy_thresholds.classify(delta_entropy.max(0.0)));

        Ok(PredictionDriftResult {
            ks_statistic: ks,
            p_value: p,
            baseline_mean_entropy,
            live_mean_entropy,
            delta_entropy,
            severity,
        })
    }
}

impl Default for PredictionDriftAnalyzer {
    fn default() -> Self {
        Self::new(SeverityThresholds::ks(), SeverityThresholds::entropy())
    }
}
