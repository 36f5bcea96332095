//! Top-level monitor facade
//!
//! [`ModelMonitor`] wires one [`WindowStore`] to one [`RunRecorder`]
//! (and optionally a [`RunArchive`]) behind a small API: set a baseline
//! once, then feed each production batch to `run`. Monitors are plain
//! values; monitoring several models means holding several monitors.

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::recorder::RunRecorder;
use crate::run::{EvaluationBundle, MonitoringRun};
use crate::storage::RunArchive;
use crate::window::{WindowSnapshot, WindowStore};

/// Drift-and-health monitor for one deployed model
pub struct ModelMonitor {
    store: WindowStore,
    recorder: RunRecorder,
    archive: Option<RunArchive>,
}

impl ModelMonitor {
    /// Create a monitor from a validated configuration
    pub fn new(config: MonitorConfig) -> Result<Self> {
        Ok(Self {
            store: WindowStore::new(),
            recorder: RunRecorder::new(config)?,
            archive: None,
        })
    }

    /// Attach a JSON archive; every committed run is persisted to it.
    ///
    /// The archive is a mirror of the in-memory history, not the source
    /// of truth: a failed archive write is logged and the committed run
    /// is still returned.
    pub fn with_archive(mut self, archive: RunArchive) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Capture the baseline reference window.
    ///
    /// Validation is strict: a feature that collapses to zero usable
    /// points fails with `SchemaError`. Re-setting the baseline changes
    /// the comparison reference for subsequent runs only.
    pub fn set_baseline(
        &mut self,
        features: Vec<(String, Vec<f64>)>,
        predictions: Vec<f64>,
    ) -> Result<()> {
        let snapshot = WindowSnapshot::from_samples(features, predictions)?;
        self.store.set_baseline(snapshot);
        Ok(())
    }

    /// Execute one monitoring cycle over a fresh live batch.
    ///
    /// The live window is validated leniently (all-missing features are
    /// excluded, not fatal) and replaces the previous one wholesale. Any
    /// fatal analyzer failure leaves history and the previous committed
    /// run untouched; an `Err` from this method always means no run was
    /// committed.
    pub fn run(
        &mut self,
        features: Vec<(String, Vec<f64>)>,
        predictions: Vec<f64>,
    ) -> Result<MonitoringRun> {
        self.run_with_evaluation(features, predictions, None)
    }

    /// Like [`Self::run`], attaching a label-based evaluation bundle to
    /// the committed record
    pub fn run_with_evaluation(
        &mut self,
        features: Vec<(String, Vec<f64>)>,
        predictions: Vec<f64>,
        evaluation: Option<EvaluationBundle>,
    ) -> Result<MonitoringRun> {
        let snapshot = WindowSnapshot::from_samples_lossy(features, predictions)?;
        self.store.set_live(snapshot);

        let pair = self.store.current_pair()?;
        let run = self.recorder.run_with_evaluation(&pair, evaluation)?;

        // The run is committed at this point; an archive failure must
        // not turn it into an error the caller reads as "no run".
        if let Some(archive) = &self.archive {
            if let Err(e) = archive.save(&run) {
                tracing::error!(run_id = %run.run_id, error = %e, "failed to archive committed run");
            }
        }
        Ok(run)
    }

    /// The two most recent committed runs
    pub fn latest_and_previous(&self) -> Option<(MonitoringRun, Option<MonitoringRun>)> {
        self.recorder.latest_and_previous()
    }

    /// Up to `n` most recent runs, most-recent-first
    pub fn history(&self, n: usize) -> Vec<MonitoringRun> {
        self.recorder.query(n)
    }

    /// The recorder, for callers that trigger runs from several threads
    pub fn recorder(&self) -> &RunRecorder {
        &self.recorder
    }

    /// The window store owned by this monitor
    pub fn store(&self) -> &WindowStore {
        &self.store
    }
}
