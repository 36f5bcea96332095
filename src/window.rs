//! Baseline and live window management
//!
//! A [`WindowSnapshot`] is an immutable, validated capture of feature
//! columns and prediction probabilities for one period. The
//! [`WindowStore`] owns the current baseline/live pair and produces the
//! shared-feature-aligned view consumed by the drift analyzers. Windows
//! are replaced wholesale, never mutated in place.

use crate::error::{ModelShiftError, Result};
use ndarray::Array1;
use std::sync::Arc;

/// A single named feature column
#[derive(Debug, Clone)]
pub struct FeatureColumn {
    /// Feature name
    pub name: String,
    /// Usable (finite) sample values
    pub values: Array1<f64>,
}

/// Immutable snapshot of aligned feature columns and prediction
/// probabilities for one monitoring period
#[derive(Debug, Clone)]
pub struct WindowSnapshot {
    features: Vec<FeatureColumn>,
    predictions: Array1<f64>,
}

impl WindowSnapshot {
    /// Build a validated snapshot from raw samples.
    ///
    /// Non-finite values are filtered per column (and from the prediction
    /// vector). Fails with `SchemaError` when no features are supplied,
    /// a feature name is duplicated, or filtering collapses a feature to
    /// zero usable points. An empty prediction vector is allowed here;
    /// the prediction drift analyzer rejects it if a run needs it.
    pub fn from_samples(
        features: Vec<(String, Vec<f64>)>,
        predictions: Vec<f64>,
    ) -> Result<Self> {
        Self::build(features, predictions, false)
    }

    /// Like [`Self::from_samples`], but drops features that collapse to
    /// zero usable points instead of failing.
    ///
    /// Live windows use this path: an all-missing live feature is
    /// excluded from the comparison rather than aborting the run.
    pub fn from_samples_lossy(
        features: Vec<(String, Vec<f64>)>,
        predictions: Vec<f64>,
    ) -> Result<Self> {
        Self::build(features, predictions, true)
    }

    fn build(
        features: Vec<(String, Vec<f64>)>,
        predictions: Vec<f64>,
        drop_collapsed: bool,
    ) -> Result<Self> {
        if features.is_empty() {
            return Err(ModelShiftError::SchemaError(
                "snapshot has no feature columns".to_string(),
            ));
        }

        let mut columns: Vec<FeatureColumn> = Vec::with_capacity(features.len());
        for (name, values) in features {
            if columns.iter().any(|c| c.name == name) {
                return Err(ModelShiftError::SchemaError(format!(
                    "duplicate feature column '{name}'"
                )));
            }

            let usable: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
            if usable.is_empty() {
                if drop_collapsed {
                    tracing::warn!(feature = %name, "feature is all-missing after filtering; dropped from snapshot");
                    continue;
                }
                return Err(ModelShiftError::SchemaError(format!(
                    "feature '{name}' has no usable points after filtering non-finite values"
                )));
            }
            columns.push(FeatureColumn {
                name,
                values: Array1::from_vec(usable),
            });
        }

        if columns.is_empty() {
            return Err(ModelShiftError::SchemaError(
                "all feature columns collapsed to zero usable points".to_string(),
            ));
        }

        let preds: Vec<f64> = predictions.into_iter().filter(|v| v.is_finite()).collect();

        Ok(Self {
            features: columns,
            predictions: Array1::from_vec(preds),
        })
    }

    /// Feature columns in insertion order
    pub fn features(&self) -> &[FeatureColumn] {
        &self.features
    }

    /// Look up a feature column by name
    pub fn feature(&self, name: &str) -> Option<&FeatureColumn> {
        self.features.iter().find(|c| c.name == name)
    }

    /// Prediction-probability vector for this window
    pub fn predictions(&self) -> &Array1<f64> {
        &self.predictions
    }

    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        self.features.len()
    }
}

/// Shared-feature-aligned view over one baseline/live snapshot pair.
///
/// Holds the snapshots by `Arc`, so a pair stays valid even if the store
/// replaces its windows while a run is in flight.
#[derive(Debug, Clone)]
pub struct WindowPair {
    baseline: Arc<WindowSnapshot>,
    live: Arc<WindowSnapshot>,
    /// Index pairs (baseline, live) of the shared features, baseline order
    shared: Vec<(usize, usize)>,
}

impl WindowPair {
    /// Iterate shared features as `(name, baseline_values, live_values)`
    pub fn shared_features(
        &self,
    ) -> impl Iterator<Item = (&str, &Array1<f64>, &Array1<f64>)> + '_ {
        self.shared.iter().map(|&(bi, li)| {
            let b = &self.baseline.features()[bi];
            let l = &self.live.features()[li];
            (b.name.as_str(), &b.values, &l.values)
        })
    }

    /// Number of shared features
    pub fn n_shared(&self) -> usize {
        self.shared.len()
    }

    /// Baseline prediction probabilities
    pub fn baseline_predictions(&self) -> &Array1<f64> {
        self.baseline.predictions()
    }

    /// Live prediction probabilities
    pub fn live_predictions(&self) -> &Array1<f64> {
        self.live.predictions()
    }
}

/// Owns the current baseline and live snapshots for one monitor
#[derive(Debug, Default)]
pub struct WindowStore {
    baseline: Option<Arc<WindowSnapshot>>,
    live: Option<Arc<WindowSnapshot>>,
}

impl WindowStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the baseline reference snapshot.
    ///
    /// Re-setting changes the comparison reference for subsequent runs;
    /// previously committed history is unaffected.
    pub fn set_baseline(&mut self, snapshot: WindowSnapshot) {
        tracing::info!(
            n_features = snapshot.n_features(),
            n_predictions = snapshot.predictions().len(),
            "baseline window set"
        );
        self.baseline = Some(Arc::new(snapshot));
    }

    /// Replace the live snapshot wholesale.
    ///
    /// The snapshot was validated at construction, so the previous live
    /// window is only ever discarded for a fully valid replacement.
    pub fn set_live(&mut self, snapshot: WindowSnapshot) {
        tracing::debug!(
            n_features = snapshot.n_features(),
            n_predictions = snapshot.predictions().len(),
            "live window replaced"
        );
        self.live = Some(Arc::new(snapshot));
    }

    /// Current baseline snapshot, if set
    pub fn baseline(&self) -> Option<&Arc<WindowSnapshot>> {
        self.baseline.as_ref()
    }

    /// Current live snapshot, if set
    pub fn live(&self) -> Option<&Arc<WindowSnapshot>> {
        self.live.as_ref()
    }

    /// Build the shared-feature-aligned (baseline, live) view.
    ///
    /// Fails with `EmptyWindow` when either window is missing and with
    /// `SchemaMismatch` when the windows share no features. Baseline
    /// features absent from the live window are logged and excluded.
    pub fn current_pair(&self) -> Result<WindowPair> {
        let baseline = self.baseline.as_ref().ok_or_else(|| {
            ModelShiftError::EmptyWindow("no baseline window has been set".to_string())
        })?;
        let live = self.live.as_ref().ok_or_else(|| {
            ModelShiftError::EmptyWindow("no live window has been set".to_string())
        })?;

        let mut shared = Vec::with_capacity(baseline.n_features());
        for (bi, col) in baseline.features().iter().enumerate() {
            match live.features().iter().position(|c| c.name == col.name) {
                Some(li) => shared.push((bi, li)),
                None => {
                    tracing::warn!(feature = %col.name, "baseline feature missing from live window; excluded");
                }
            }
        }

        if shared.is_empty() {
            return Err(ModelShiftError::SchemaMismatch(
                "baseline and live windows share no features".to_string(),
            ));
        }

        Ok(WindowPair {
            baseline: Arc::clone(baseline),
            live: Arc::clone(live),
            shared,
        })
    }
}
