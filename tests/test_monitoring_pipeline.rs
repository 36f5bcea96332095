//! End-to-end tests for the monitoring pipeline: window capture, drift
//! analysis, health scoring, run commitment, and history discipline.

use modelshift::{
    ModelMonitor, ModelShiftError, MonitorConfig, MonitoringRun, RunRecorder, RunStatus,
    Severity, WindowSnapshot, WindowStore,
};
use std::sync::{Arc, Barrier};
use std::thread;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// 1000-sample baseline for `src_bytes`, well separated from zero
fn src_bytes_baseline() -> Vec<f64> {
    (0..1000).map(|i| 100.0 + (i % 500) as f64 * 0.2).collect()
}

/// Confident binary scores: clustered near 0 and 1
fn confident_predictions(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| if i % 2 == 0 { 0.05 } else { 0.95 })
        .collect()
}

/// Uncertain scores: clustered around 0.5
fn uncertain_predictions(n: usize) -> Vec<f64> {
    (0..n).map(|i| 0.45 + 0.1 * (i % 2) as f64).collect()
}

fn monitor_with_baseline() -> ModelMonitor {
    let mut monitor = ModelMonitor::new(MonitorConfig::default()).unwrap();
    monitor
        .set_baseline(
            vec![("src_bytes".to_string(), src_bytes_baseline())],
            confident_predictions(1000),
        )
        .unwrap();
    monitor
}

#[test]
fn test_scenario_no_drift() {
    init_tracing();
    let mut monitor = monitor_with_baseline();
    let run = monitor
        .run(
            vec![("src_bytes".to_string(), src_bytes_baseline())],
            confident_predictions(1000),
        )
        .unwrap();

    let top = run.most_drifted_feature().unwrap();
    assert_eq!(top.feature_name, "src_bytes");
    assert!(top.ks_statistic < 1e-12);
    assert_eq!(top.severity, Severity::Low);
    assert_eq!(run.summary.drifted_health, 100.0);
    assert_eq!(run.summary.clean_health, 100.0);
    assert_eq!(run.status, RunStatus::Ok);
}

#[test]
fn test_scenario_scale_drift() {
    let mut monitor = monitor_with_baseline();
    let scaled: Vec<f64> = src_bytes_baseline().iter().map(|v| v * 1.5).collect();
    let run = monitor
        .run(
            vec![("src_bytes".to_string(), scaled)],
            confident_predictions(1000),
        )
        .unwrap();

    let top = run.most_drifted_feature().unwrap();
    // Supports [100,200] vs [150,300]: most of the mass separates
    assert!(top.ks_statistic > 0.3);
    assert_eq!(top.severity, Severity::High);
    assert_eq!(run.status, RunStatus::Critical);
    assert!(run.summary.drifted_health < 100.0);
}

#[test]
fn test_scenario_uncertainty_rise() {
    let mut no_drift = monitor_with_baseline();
    let clean_run = no_drift
        .run(
            vec![("src_bytes".to_string(), src_bytes_baseline())],
            confident_predictions(1000),
        )
        .unwrap();

    let mut monitor = monitor_with_baseline();
    let run = monitor
        .run(
            vec![("src_bytes".to_string(), src_bytes_baseline())],
            uncertain_predictions(1000),
        )
        .unwrap();

    assert!(run.prediction_drift.delta_entropy > 0.0);
    assert!(run.prediction_drift.severity > Severity::Low);
    assert!(run.summary.drifted_health < clean_run.summary.drifted_health);
    assert_eq!(run.summary.drifted_entropy_change, run.prediction_drift.delta_entropy);
}

#[test]
fn test_scenario_schema_break() {
    let mut monitor = monitor_with_baseline();
    let err = monitor
        .run(
            vec![("dst_bytes".to_string(), src_bytes_baseline())],
            confident_predictions(1000),
        )
        .unwrap_err();

    assert!(matches!(err, ModelShiftError::SchemaMismatch(_)));
    assert!(monitor.history(10).is_empty());
    assert!(monitor.latest_and_previous().is_none());

    // The monitor recovers on the next valid batch
    let run = monitor
        .run(
            vec![("src_bytes".to_string(), src_bytes_baseline())],
            confident_predictions(1000),
        )
        .unwrap();
    assert_eq!(run.status, RunStatus::Ok);
}

#[test]
fn test_health_degrades_with_drift_strength() {
    // Increasing location shift must never increase the score
    let mut previous_health = 100.0f64;
    for shift in [0.0, 10.0, 25.0, 60.0, 150.0] {
        let mut monitor = monitor_with_baseline();
        let shifted: Vec<f64> = src_bytes_baseline().iter().map(|v| v + shift).collect();
        let run = monitor
            .run(
                vec![("src_bytes".to_string(), shifted)],
                confident_predictions(1000),
            )
            .unwrap();
        assert!(run.summary.drifted_health <= previous_health);
        previous_health = run.summary.drifted_health;
    }
}

#[test]
fn test_history_bounded_fifo() {
    let mut monitor = ModelMonitor::new(MonitorConfig {
        history_capacity: 4,
        ..Default::default()
    })
    .unwrap();
    monitor
        .set_baseline(
            vec![("f1".to_string(), src_bytes_baseline())],
            confident_predictions(1000),
        )
        .unwrap();

    for _ in 0..7 {
        monitor
            .run(
                vec![("f1".to_string(), src_bytes_baseline())],
                confident_predictions(1000),
            )
            .unwrap();
    }

    let history = monitor.history(100);
    assert_eq!(history.len(), 4);
    // Most-recent-first and strictly ordered by generated_at
    for pair in history.windows(2) {
        assert!(pair[0].generated_at >= pair[1].generated_at);
    }
    assert_eq!(history[0].run_id, "run-000007");
    assert_eq!(history[3].run_id, "run-000004");
}

#[test]
fn test_concurrent_run_attempts() {
    init_tracing();
    let config = MonitorConfig::default();
    let recorder = Arc::new(RunRecorder::new(config).unwrap());

    let mut store = WindowStore::new();
    let features: Vec<(String, Vec<f64>)> = (0..8)
        .map(|k| (format!("f{k}"), (0..20_000).map(|i| (i + k) as f64).collect()))
        .collect();
    store.set_baseline(
        WindowSnapshot::from_samples(features.clone(), confident_predictions(20_000)).unwrap(),
    );
    store.set_live(
        WindowSnapshot::from_samples(features, confident_predictions(20_000)).unwrap(),
    );
    let pair = Arc::new(store.current_pair().unwrap());

    let n_threads = 8;
    let barrier = Arc::new(Barrier::new(n_threads));
    let handles: Vec<_> = (0..n_threads)
        .map(|_| {
            let recorder = Arc::clone(&recorder);
            let pair = Arc::clone(&pair);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                recorder.run(&pair)
            })
        })
        .collect();

    let mut committed = 0usize;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(_) => committed += 1,
            Err(e) => assert!(matches!(e, ModelShiftError::ConcurrentRunRejected)),
        }
    }

    // Rejected attempts leave no trace: history holds exactly the
    // committed runs, nothing partial.
    assert!(committed >= 1);
    assert_eq!(recorder.len(), committed);
}

#[test]
fn test_canonical_record_round_trip() {
    let mut monitor = monitor_with_baseline();
    let scaled: Vec<f64> = src_bytes_baseline().iter().map(|v| v * 1.2).collect();
    let run = monitor
        .run(
            vec![("src_bytes".to_string(), scaled)],
            uncertain_predictions(1000),
        )
        .unwrap();

    let json = serde_json::to_string(&run).unwrap();
    let back: MonitoringRun = serde_json::from_str(&json).unwrap();
    assert_eq!(back, run);

    // Canonical field names on the wire
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["drifted_last_window_feature"], "src_bytes");
    assert_eq!(value["feature_drift"][0]["feature"], "src_bytes");
    assert!(value["status"].is_string());
}

#[test]
fn test_most_drifted_tie_break() {
    let mut monitor = ModelMonitor::new(MonitorConfig::default()).unwrap();
    // Two identically-shifted features: identical ks, name decides
    monitor
        .set_baseline(
            vec![
                ("zeta".to_string(), src_bytes_baseline()),
                ("alpha".to_string(), src_bytes_baseline()),
            ],
            confident_predictions(1000),
        )
        .unwrap();

    let shifted: Vec<f64> = src_bytes_baseline().iter().map(|v| v + 500.0).collect();
    let run = monitor
        .run(
            vec![
                ("zeta".to_string(), shifted.clone()),
                ("alpha".to_string(), shifted),
            ],
            confident_predictions(1000),
        )
        .unwrap();

    assert_eq!(
        run.feature_drift[0].ks_statistic,
        run.feature_drift[1].ks_statistic
    );
    assert_eq!(run.most_drifted_feature().unwrap().feature_name, "alpha");
    assert_eq!(run.summary.drifted_last_window_feature, "alpha");
}
