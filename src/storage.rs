//! JSON archive for committed runs
//!
//! Reference persistence layer mirroring the layout a dashboard polls:
//! one full record per run under `runs/`, rotating `latest.json` /
//! `previous.json` pointers, and a capped `history_index.json` of slim
//! entries for the history view. Every archived record is tagged with a
//! `saved_at` timestamp and a SHA-256 `payload_hash` of the canonical
//! record JSON.
//!
//! Archive failures are surfaced to the caller and never affect the
//! in-memory history owned by the recorder.

use crate::error::{ModelShiftError, Result};
use crate::run::{MonitoringRun, RunStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

/// A run record as persisted: the canonical run plus archive metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedRun {
    /// The canonical run record
    #[serde(flatten)]
    pub run: MonitoringRun,
    /// When the record was persisted
    pub saved_at: DateTime<Utc>,
    /// SHA-256 hex digest of the canonical run JSON
    pub payload_hash: String,
}

/// Slim entry kept in `history_index.json` for list views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryIndexEntry {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub status: RunStatus,
    pub clean_health: f64,
    pub drifted_health: f64,
    pub drifted_pred_ks: f64,
    pub drifted_entropy_change: f64,
    pub drifted_last_window_feature: String,
    pub drifted_last_window_ks: f64,
    pub payload_hash: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryIndex {
    items: Vec<HistoryIndexEntry>,
}

/// Append-only JSON archive of committed runs
pub struct RunArchive {
    base_dir: PathBuf,
    retain: usize,
}

impl RunArchive {
    /// Open (creating if needed) an archive rooted at `base_dir`,
    /// retaining at most `retain` entries in the history index.
    pub fn new(base_dir: impl Into<PathBuf>, retain: usize) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(base_dir.join("runs"))?;
        Ok(Self { base_dir, retain })
    }

    fn runs_dir(&self) -> PathBuf {
        self.base_dir.join("runs")
    }

    fn latest_path(&self) -> PathBuf {
        self.base_dir.join("latest.json")
    }

    fn previous_path(&self) -> PathBuf {
        self.base_dir.join("previous.json")
    }

    fn index_path(&self) -> PathBuf {
        self.base_dir.join("history_index.json")
    }

    fn run_path(&self, run_id: &str) -> Result<PathBuf> {
        validate_run_id(run_id)?;
        Ok(self.runs_dir().join(format!("{run_id}.json")))
    }

    /// Persist a committed run: write the per-run file, rotate the
    /// latest/previous pointers, and update the capped index.
    pub fn save(&self, run: &MonitoringRun) -> Result<ArchivedRun> {
        let canonical = serde_json::to_vec(run)?;
        let payload_hash = hex::encode(Sha256::digest(&canonical));

        let archived = ArchivedRun {
            run: run.clone(),
            saved_at: Utc::now(),
            payload_hash: payload_hash.clone(),
        };
        let body = serde_json::to_vec_pretty(&archived)?;

        let run_path = self.run_path(&run.run_id)?;
        fs::write(&run_path, &body)?;

        // Rotate latest -> previous before overwriting
        if self.latest_path().exists() {
            fs::copy(self.latest_path(), self.previous_path())?;
        }
        fs::write(self.latest_path(), &body)?;

        self.push_index_entry(HistoryIndexEntry {
            run_id: run.run_id.clone(),
            generated_at: run.generated_at,
            status: run.status,
            clean_health: run.summary.clean_health,
            drifted_health: run.summary.drifted_health,
            drifted_pred_ks: run.summary.drifted_pred_ks,
            drifted_entropy_change: run.summary.drifted_entropy_change,
            drifted_last_window_feature: run.summary.drifted_last_window_feature.clone(),
            drifted_last_window_ks: run.summary.drifted_last_window_ks,
            payload_hash,
        })?;

        tracing::debug!(run_id = %run.run_id, path = %run_path.display(), "run archived");
        Ok(archived)
    }

    fn push_index_entry(&self, entry: HistoryIndexEntry) -> Result<()> {
        let mut index = self.read_index()?;
        index.items.insert(0, entry);
        index.items.truncate(self.retain);
        fs::write(self.index_path(), serde_json::to_vec_pretty(&index)?)?;
        Ok(())
    }

    fn read_index(&self) -> Result<HistoryIndex> {
        if !self.index_path().exists() {
            return Ok(HistoryIndex::default());
        }
        let body = fs::read(self.index_path())?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Load a single archived run by id
    pub fn load(&self, run_id: &str) -> Result<ArchivedRun> {
        let body = fs::read(self.run_path(run_id)?)?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// The most recently archived run, if any
    pub fn latest(&self) -> Result<Option<ArchivedRun>> {
        if !self.latest_path().exists() {
            return Ok(None);
        }
        let body = fs::read(self.latest_path())?;
        Ok(Some(serde_json::from_slice(&body)?))
    }

    /// The run archived before the latest, if any
    pub fn previous(&self) -> Result<Option<ArchivedRun>> {
        if !self.previous_path().exists() {
            return Ok(None);
        }
        let body = fs::read(self.previous_path())?;
        Ok(Some(serde_json::from_slice(&body)?))
    }

    /// Up to `n` slim index entries, newest first
    pub fn index(&self, n: usize) -> Result<Vec<HistoryIndexEntry>> {
        let mut index = self.read_index()?;
        index.items.truncate(n);
        Ok(index.items)
    }
}

/// Reject run ids that could escape the runs directory
fn validate_run_id(run_id: &str) -> Result<()> {
    let ok = (6..=80).contains(&run_id.len())
        && run_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !ok {
        return Err(ModelShiftError::SchemaError(format!(
            "invalid run_id '{run_id}'"
        )));
    }
    Ok(())
}
