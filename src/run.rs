//! Immutable monitoring run records
//!
//! One [`MonitoringRun`] is the committed outcome of a single cycle.
//! Its serde shape is the canonical wire/storage contract a dashboard or
//! scheduler consumes; presentation layers should deserialize this shape
//! instead of scanning untyped payloads for likely field names.

use crate::drift::{FeatureDriftResult, PredictionDriftResult, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall run status derived from the combined severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    /// No actionable drift
    Ok,
    /// Medium drift somewhere; worth attention
    Warning,
    /// High drift; the model's behavior has shifted materially
    Critical,
}

impl From<Severity> for RunStatus {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Low => RunStatus::Ok,
            Severity::Medium => RunStatus::Warning,
            Severity::High => RunStatus::Critical,
        }
    }
}

/// Headline numbers of a run, in the shape the dashboard consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Baseline-vs-baseline reference score (100 under any weights)
    pub clean_health: f64,
    /// This run's health score
    pub drifted_health: f64,
    /// Prediction-distribution KS statistic
    pub drifted_pred_ks: f64,
    /// Mean entropy delta (live - baseline)
    pub drifted_entropy_change: f64,
    /// Name of the most-drifted feature
    pub drifted_last_window_feature: String,
    /// KS statistic of the most-drifted feature
    pub drifted_last_window_ks: f64,
}

/// Optional label-based evaluation side channel.
///
/// Attached by the caller when labeled data exists for a window; never
/// computed or consumed by the drift/health pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationBundle {
    /// Metrics on the baseline window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<serde_json::Value>,
    /// Metrics on an undrifted control window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean: Option<serde_json::Value>,
    /// Metrics on the drifted live window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drifted: Option<serde_json::Value>,
}

/// One immutable, committed monitoring cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringRun {
    /// Unique, monotonically assigned identifier (`run-NNNNNN`)
    pub run_id: String,
    /// Commit timestamp
    pub generated_at: DateTime<Utc>,
    /// Status derived from the combined severity
    pub status: RunStatus,
    /// Headline summary
    pub summary: RunSummary,
    /// Per-feature drift, ordered by KS statistic descending
    pub feature_drift: Vec<FeatureDriftResult>,
    /// Prediction-output drift and uncertainty shift
    pub prediction_drift: PredictionDriftResult,
    /// Optional label-based side channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationBundle>,
}

impl MonitoringRun {
    /// This run's health score
    pub fn health_score(&self) -> f64 {
        self.summary.drifted_health
    }

    /// The most-drifted feature (maximal KS, name tie-break).
    ///
    /// `feature_drift` is committed in canonical order, so this is the
    /// first entry. `None` only for deserialized records carrying an
    /// empty `feature_drift` array; the recorder never commits one.
    pub fn most_drifted_feature(&self) -> Option<&FeatureDriftResult> {
        self.feature_drift.first()
    }
}
