//! ModelShift - label-free drift and health monitoring engine
//!
//! Detects silent behavioral degradation of a deployed black-box
//! prediction model by comparing an immutable baseline window against
//! the current production window, without ground-truth labels.
//!
//! # Modules
//!
//! ## Core pipeline
//! - [`window`] - Baseline/live snapshots and shared-feature alignment
//! - [`stats`] - Two-sample KS statistic, p-value, predictive entropy
//! - [`drift`] - Feature and prediction drift analyzers, severity bands
//! - [`health`] - 0-100 health score aggregation
//! - [`recorder`] - Single-writer run execution and bounded history
//!
//! ## Records and persistence
//! - [`run`] - Immutable run records and the canonical wire shape
//! - [`storage`] - Reference JSON archive (runs, latest/previous, index)
//!
//! ## Entry points
//! - [`monitor`] - [`ModelMonitor`] facade tying the pieces together
//! - [`config`] - Thresholds, weights, retention; serde round-trippable
//!
//! # Example
//!
//! ```no_run
//! use modelshift::{ModelMonitor, MonitorConfig};
//!
//! # fn main() -> modelshift::Result<()> {
//! let mut monitor = ModelMonitor::new(MonitorConfig::default())?;
//! monitor.set_baseline(
//!     vec![("src_bytes".to_string(), vec![100.0, 140.0, 120.0])],
//!     vec![0.05, 0.92, 0.11],
//! )?;
//!
//! let run = monitor.run(
//!     vec![("src_bytes".to_string(), vec![150.0, 210.0, 180.0])],
//!     vec![0.4, 0.55, 0.48],
//! )?;
//! println!("{} health={}", run.run_id, run.health_score());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod drift;
pub mod error;
pub mod health;
pub mod monitor;
pub mod recorder;
pub mod run;
pub mod stats;
pub mod storage;
pub mod window;

pub use config::MonitorConfig;
pub use drift::{
    FeatureDriftAnalyzer, FeatureDriftResult, PredictionDriftAnalyzer, PredictionDriftResult,
    Severity, SeverityThresholds,
};
pub use error::{ModelShiftError, Result};
pub use health::{DriftSignals, HealthScorer, HealthWeights};
pub use monitor::ModelMonitor;
pub use recorder::RunRecorder;
pub use run::{EvaluationBundle, MonitoringRun, RunStatus, RunSummary};
pub use storage::{ArchivedRun, RunArchive};
pub use window::{WindowPair, WindowSnapshot, WindowStore};
