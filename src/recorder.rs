//! Run execution and bounded history
//!
//! The [`RunRecorder`] drives one monitoring cycle end to end: feature
//! drift, prediction drift, severity aggregation, health scoring, and
//! the atomic commit of the resulting [`MonitoringRun`] into a bounded,
//! time-ordered history. At most one run may be in flight; concurrent
//! attempts are rejected rather than queued. A failed run never touches
//! history.

use crate::config::MonitorConfig;
use crate::drift::{FeatureDriftAnalyzer, PredictionDriftAnalyzer, Severity};
use crate::error::{ModelShiftError, Result};
use crate::health::{DriftSignals, HealthScorer};
use crate::run::{EvaluationBundle, MonitoringRun, RunStatus, RunSummary};
use crate::window::WindowPair;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Executes monitoring cycles and owns the retained run history
pub struct RunRecorder {
    feature_analyzer: FeatureDriftAnalyzer,
    prediction_analyzer: PredictionDriftAnalyzer,
    scorer: HealthScorer,
    capacity: usize,
    /// Retained runs, oldest at the front
    history: RwLock<VecDeque<MonitoringRun>>,
    /// Single-writer discipline: true while a run is in flight
    running: AtomicBool,
    next_seq: AtomicU64,
}

/// Clears the in-flight flag on every exit path
struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl RunRecorder {
    /// Create a recorder from a validated configuration
    pub fn new(config: MonitorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            feature_analyzer: FeatureDriftAnalyzer::new(config.ks_thresholds),
            prediction_analyzer: PredictionDriftAnalyzer::new(
                config.ks_thresholds,
                config.entropy_thresholds,
            ),
            scorer: HealthScorer::new(config.health_weights),
            capacity: config.history_capacity,
            history: RwLock::new(VecDeque::with_capacity(config.history_capacity)),
            running: AtomicBool::new(false),
            next_seq: AtomicU64::new(0),
        })
    }

    /// Execute one monitoring cycle over a window pair.
    ///
    /// Fails with `ConcurrentRunRejected` when another run is in flight.
    /// Any analyzer failure aborts the run before history is touched and
    /// surfaces verbatim. On success the committed run is appended
    /// (evicting the oldest entry past capacity) and returned.
    pub fn run(&self, pair: &WindowPair) -> Result<MonitoringRun> {
        self.run_with_evaluation(pair, None)
    }

    /// Like [`Self::run`], attaching a label-based evaluation bundle to
    /// the committed record. The bundle is carried verbatim; no drift or
    /// health computation reads it.
    pub fn run_with_evaluation(
        &self,
        pair: &WindowPair,
        evaluation: Option<EvaluationBundle>,
    ) -> Result<MonitoringRun> {
        let _guard = self.acquire()?;
        tracing::debug!(n_shared = pair.n_shared(), "monitoring run started");

        let run = match self.execute(pair, evaluation) {
            Ok(run) => run,
            Err(e) => {
                tracing::warn!(error = %e, "monitoring run failed; history unchanged");
                return Err(e);
            }
        };

        // Sole mutation point: the run becomes reader-visible here.
        {
            let mut history = self.history.write();
            history.push_back(run.clone());
            while history.len() > self.capacity {
                history.pop_front();
            }
        }

        tracing::info!(
            run_id = %run.run_id,
            status = ?run.status,
            health = run.summary.drifted_health,
            "monitoring run committed"
        );
        Ok(run)
    }

    fn acquire(&self) -> Result<RunGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| ModelShiftError::ConcurrentRunRejected)?;
        Ok(RunGuard {
            flag: &self.running,
        })
    }

    fn execute(
        &self,
        pair: &WindowPair,
        evaluation: Option<EvaluationBundle>,
    ) -> Result<MonitoringRun> {
        let feature_drift = self.feature_analyzer.analyze(pair)?;
        let prediction_drift = self
            .prediction_analyzer
            .analyze(pair.baseline_predictions(), pair.live_predictions())?;

        let top = crate::drift::most_drifted(&feature_drift).ok_or_else(|| {
            ModelShiftError::EmptyFeatureSet("feature drift produced no results".to_string())
        })?;
        let worst_feature_severity = feature_drift
            .iter()
            .map(|f| f.severity)
            .max()
            .unwrap_or(Severity::Low);
        let combined = worst_feature_severity.max(prediction_drift.severity);

        let drifted_health = self.scorer.score(&DriftSignals {
            max_feature_ks: top.ks_statistic,
            prediction_ks: prediction_drift.ks_statistic,
            delta_entropy: prediction_drift.delta_entropy,
        });

        let summary = RunSummary {
            clean_health: self.scorer.clean_reference(),
            drifted_health,
            drifted_pred_ks: prediction_drift.ks_statistic,
            drifted_entropy_change: prediction_drift.delta_entropy,
            drifted_last_window_feature: top.feature_name.clone(),
            drifted_last_window_ks: top.ks_statistic,
        };

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;

        Ok(MonitoringRun {
            run_id: format!("run-{seq:06}"),
            generated_at: Utc::now(),
            status: RunStatus::from(combined),
            summary,
            feature_drift,
            prediction_drift,
            evaluation,
        })
    }

    /// The two most recent committed runs; the previous is absent on the
    /// first run, both are absent before any run commits.
    pub fn latest_and_previous(&self) -> Option<(MonitoringRun, Option<MonitoringRun>)> {
        let history = self.history.read();
        let mut recent = history.iter().rev();
        let latest = recent.next()?.clone();
        let previous = recent.next().cloned();
        Some((latest, previous))
    }

    /// Up to `n` most recent runs, most-recent-first. Callers receive
    /// clones; history exclusively owns the retained records.
    pub fn query(&self, n: usize) -> Vec<MonitoringRun> {
        self.history.read().iter().rev().take(n).cloned().collect()
    }

    /// Number of retained runs
    pub fn len(&self) -> usize {
        self.history.read().len()
    }

    /// True when no run has committed yet
    pub fn is_empty(&self) -> bool {
        self.history.read().is_empty()
    }
}
