//! Feature-level drift analysis

use crate::drift::{Severity, SeverityThresholds};
use crate::error::{ModelShiftError, Result};
use crate::stats;
use crate::window::WindowPair;
use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Drift result for a single shared feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDriftResult {
    /// Feature name
    #[serde(rename = "feature")]
    pub feature_name: String,
    /// Two-sample KS statistic in [0, 1]
    #[serde(rename = "ks")]
    pub ks_statistic: f64,
    /// Asymptotic two-sample KS p-value in [0, 1]
    pub p_value: f64,
    /// Severity of the KS magnitude
    pub severity: Severity,
    /// Both windows were constant at the same value; ks fixed at 0
    #[serde(default)]
    pub degenerate: bool,
}

/// Computes per-feature distributional drift between the baseline and
/// live windows of a [`WindowPair`].
///
/// Categorical features are expected to arrive frequency-encoded, so the
/// same numeric KS procedure applies to every column.
#[derive(Debug, Clone)]
pub struct FeatureDriftAnalyzer {
    thresholds: SeverityThresholds,
}

impl FeatureDriftAnalyzer {
    /// Create an analyzer with the given KS severity thresholds
    pub fn new(thresholds: SeverityThresholds) -> Self {
        Self { thresholds }
    }

    /// Analyze every shared feature of the pair.
    ///
    /// Features are processed in parallel; the output is sorted by
    /// `ks_statistic` descending with ties broken by ascending feature
    /// name, so the first entry is the most-drifted feature. Fails with
    /// `EmptyFeatureSet` when nothing was evaluated.
    pub fn analyze(&self, pair: &WindowPair) -> Result<Vec<FeatureDriftResult>> {
        let columns: Vec<(&str, &Array1<f64>, &Array1<f64>)> = pair.shared_features().collect();

        let mut results: Vec<FeatureDriftResult> = columns
            .par_iter()
            .filter_map(|&(name, baseline, live)| self.analyze_feature(name, baseline, live))
            .collect();

        if results.is_empty() {
            return Err(ModelShiftError::EmptyFeatureSet(
                "no shared feature had usable samples in both windows".to_string(),
            ));
        }

        results.sort_by(|a, b| {
            b.ks_statistic
                .partial_cmp(&a.ks_statistic)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.feature_name.cmp(&b.feature_name))
        });

        Ok(results)
    }

    fn analyze_feature(
        &self,
        name: &str,
        baseline: &Array1<f64>,
        live: &Array1<f64>,
    ) -> Option<FeatureDriftResult> {
        if baseline.is_empty() || live.is_empty() {
            tracing::warn!(feature = %name, "feature has no usable samples in one window; excluded");
            return None;
        }

        // Zero variance in both windows at the same constant: a defined
        // no-drift result, not an error.
        if let Some(c) = constant_value(baseline) {
            if constant_value(live) == Some(c) {
                tracing::debug!(feature = %name, value = c, "degenerate distribution in both windows");
                return Some(FeatureDriftResult {
                    feature_name: name.to_string(),
                    ks_statistic: 0.0,
                    p_value: 1.0,
                    severity: self.thresholds.classify(0.0),
                    degenerate: true,
                });
            }
        }

        let ks = stats::ks_statistic(baseline, live);
        let p = stats::ks_p_value(ks, baseline.len(), live.len());

        Some(FeatureDriftResult {
            feature_name: name.to_string(),
            ks_statistic: ks,
            p_value: p,
            severity: self.thresholds.classify(ks),
            degenerate: false,
        })
    }
}

/// Select the most-drifted feature: maximal `ks_statistic`, ties broken
/// by lexicographically smallest name.
pub(crate) fn most_drifted(results: &[FeatureDriftResult]) -> Option<&FeatureDriftResult> {
    results.iter().min_by(|a, b| {
        b.ks_statistic
            .partial_cmp(&a.ks_statistic)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.feature_name.cmp(&b.feature_name))
    })
}

/// The single value a zero-variance column is stuck at, if any
fn constant_value(values: &Array1<f64>) -> Option<f64> {
    let first = values[0];
    values.iter().all(|&v| v == first).then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{WindowSnapshot, WindowStore};

    fn pair_of(
        baseline: Vec<(&str, Vec<f64>)>,
        live: Vec<(&str, Vec<f64>)>,
    ) -> WindowPair {
        let mut store = WindowStore::new();
        store.set_baseline(
            WindowSnapshot::from_samples(
                baseline
                    .into_iter()
                    .map(|(n, v)| (n.to_string(), v))
                    .collect(),
                vec![],
            )
            .unwrap(),
        );
        store.set_live(
            WindowSnapshot::from_samples(
                live.into_iter().map(|(n, v)| (n.to_string(), v)).collect(),
                vec![],
            )
            .unwrap(),
        );
        store.current_pair().unwrap()
    }

    fn grid(start: i64, end: i64) -> Vec<f64> {
        (start..end).map(|i| i as f64).collect()
    }

    #[test]
    fn test_identical_windows_score_zero() {
        let pair = pair_of(
            vec![("f1", grid(0, 100))],
            vec![("f1", grid(0, 100))],
        );
        let results = FeatureDriftAnalyzer::new(SeverityThresholds::ks())
            .analyze(&pair)
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].ks_statistic, 0.0);
        assert_eq!(results[0].severity, Severity::Low);
        assert!(results[0].p_value > 0.99);
    }

    #[test]
    fn test_disjoint_windows_score_one() {
        let pair = pair_of(
            vec![("f1", grid(0, 100))],
            vec![("f1", grid(1000, 1100))],
        );
        let results = FeatureDriftAnalyzer::new(SeverityThresholds::ks())
            .analyze(&pair)
            .unwrap();

        assert!((results[0].ks_statistic - 1.0).abs() < 1e-12);
        assert_eq!(results[0].severity, Severity::High);
        assert!(results[0].p_value < 1e-6);
    }

    #[test]
    fn test_results_sorted_by_ks_desc() {
        let pair = pair_of(
            vec![("stable", grid(0, 100)), ("shifted", grid(0, 100))],
            vec![("stable", grid(0, 100)), ("shifted", grid(60, 160))],
        );
        let results = FeatureDriftAnalyzer::new(SeverityThresholds::ks())
            .analyze(&pair)
            .unwrap();

        assert_eq!(results[0].feature_name, "shifted");
        assert!(results[0].ks_statistic > results[1].ks_statistic);
    }

    #[test]
    fn test_degenerate_same_constant() {
        let pair = pair_of(
            vec![("flat", vec![5.0; 50])],
            vec![("flat", vec![5.0; 50])],
        );
        let results = FeatureDriftAnalyzer::new(SeverityThresholds::ks())
            .analyze(&pair)
            .unwrap();

        assert!(results[0].degenerate);
        assert_eq!(results[0].ks_statistic, 0.0);
        assert_eq!(results[0].p_value, 1.0);
    }

    #[test]
    fn test_distinct_constants_are_full_drift() {
        let pair = pair_of(
            vec![("flat", vec![5.0; 50])],
            vec![("flat", vec![7.0; 50])],
        );
        let results = FeatureDriftAnalyzer::new(SeverityThresholds::ks())
            .analyze(&pair)
            .unwrap();

        assert!(!results[0].degenerate);
        assert!((results[0].ks_statistic - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_most_drifted_tie_break_by_name() {
        let results = vec![
            FeatureDriftResult {
                feature_name: "zeta".to_string(),
                ks_statistic: 0.4,
                p_value: 0.01,
                severity: Severity::Medium,
                degenerate: false,
            },
            FeatureDriftResult {
                feature_name: "alpha".to_string(),
                ks_statistic: 0.4,
                p_value: 0.01,
                severity: Severity::Medium,
                degenerate: false,
            },
            FeatureDriftResult {
                feature_name: "beta".to_string(),
                ks_statistic: 0.1,
                p_value: 0.5,
                severity: Severity::Low,
                degenerate: false,
            },
        ];

        assert_eq!(most_drifted(&results).unwrap().feature_name, "alpha");
    }
}
