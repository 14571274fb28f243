//! Evaluation statistics and the success log.
//!
//! Counters are lock-free so evaluator threads can record without
//! coordinating. Snapshots serialize to JSON for whoever drives the search.

use crate::pipeline::Outcome;
use circuit_core::TopologyId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Running totals, designed for lock-free updates.
#[derive(Debug)]
pub struct EvaluationStats {
    evaluations: AtomicU64,
    adapted: AtomicU64,
    not_adapted: AtomicU64,
    sustained: AtomicU64,
    damped: AtomicU64,
    no_signal_path: AtomicU64,
    numerical_failures: AtomicU64,
    /// Cumulative solve time (microseconds).
    solve_us: AtomicU64,
    start_time: Instant,
}

/// Serializable stats for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationStatsSnapshot {
    pub evaluations: u64,
    pub adapted: u64,
    pub not_adapted: u64,
    pub sustained_oscillations: u64,
    pub damped_oscillations: u64,
    pub no_signal_path: u64,
    pub numerical_failures: u64,
    pub success_rate: f64,
    pub avg_solve_ms: f64,
    pub evaluations_per_second: f64,
    pub runtime_seconds: f64,
}

impl Default for EvaluationStats {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationStats {
    pub fn new() -> Self {
        Self {
            evaluations: AtomicU64::new(0),
            adapted: AtomicU64::new(0),
            not_adapted: AtomicU64::new(0),
            sustained: AtomicU64::new(0),
            damped: AtomicU64::new(0),
            no_signal_path: AtomicU64::new(0),
            numerical_failures: AtomicU64::new(0),
            solve_us: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record one finished evaluation and the time spent simulating it.
    pub fn record(&self, outcome: &Outcome, elapsed: Duration) {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        self.solve_us
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
        let counter = match outcome {
            Outcome::Adapted(_) => &self.adapted,
            Outcome::NotAdapted(_) => &self.not_adapted,
            Outcome::SustainedOscillation { .. } => &self.sustained,
            Outcome::DampedOscillation { .. } => &self.damped,
            Outcome::NoSignalPath => &self.no_signal_path,
            Outcome::NumericalFailure(_) => &self.numerical_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> EvaluationStatsSnapshot {
        let evaluations = self.evaluations.load(Ordering::Relaxed);
        let adapted = self.adapted.load(Ordering::Relaxed);
        let solve_us = self.solve_us.load(Ordering::Relaxed);
        let runtime = self.start_time.elapsed().as_secs_f64();

        let (success_rate, avg_solve_ms) = if evaluations > 0 {
            (
                adapted as f64 / evaluations as f64,
                solve_us as f64 / 1000.0 / evaluations as f64,
            )
        } else {
            (0.0, 0.0)
        };
        let evaluations_per_second = if runtime > 0.0 {
            evaluations as f64 / runtime
        } else {
            0.0
        };

        EvaluationStatsSnapshot {
            evaluations,
            adapted,
            not_adapted: self.not_adapted.load(Ordering::Relaxed),
            sustained_oscillations: self.sustained.load(Ordering::Relaxed),
            damped_oscillations: self.damped.load(Ordering::Relaxed),
            no_signal_path: self.no_signal_path.load(Ordering::Relaxed),
            numerical_failures: self.numerical_failures.load(Ordering::Relaxed),
            success_rate,
            avg_solve_ms,
            evaluations_per_second,
            runtime_seconds: runtime,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.snapshot())
    }

    /// Write a snapshot to `path` (write-then-rename).
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json()?;
        let temp_path = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(json.as_bytes())?;
        }
        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        debug!(path = %path.display(), "Wrote evaluation stats");
        Ok(())
    }
}

/// Pool slots that produced a successful adaptation, per topology.
#[derive(Debug, Default)]
pub struct SuccessLog {
    entries: Mutex<BTreeMap<TopologyId, Vec<usize>>>,
}

impl SuccessLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember that `slot` worked for `id`. Repeats are ignored.
    pub fn record(&self, id: TopologyId, slot: usize) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let slots = entries.entry(id).or_default();
        if let Err(pos) = slots.binary_search(&slot) {
            slots.insert(pos, slot);
        }
    }

    /// Successful slots of one topology, ascending.
    pub fn slots(&self, id: TopologyId) -> Vec<usize> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(&id).cloned().unwrap_or_default()
    }

    /// Number of topologies with at least one success.
    pub fn topologies(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn snapshot(&self) -> BTreeMap<TopologyId, Vec<usize>> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Score;
    use tempfile::tempdir;

    fn adapted() -> Outcome {
        Outcome::Adapted(Score {
            precision: 100.0,
            sensitivity: 2.0,
        })
    }

    #[test]
    fn test_record_outcomes() {
        let stats = EvaluationStats::new();
        stats.record(&adapted(), Duration::from_millis(4));
        stats.record(&Outcome::NoSignalPath, Duration::ZERO);
        stats.record(
            &Outcome::SustainedOscillation {
                min_autocorrelation: -0.9,
            },
            Duration::from_millis(2),
        );

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.evaluations, 3);
        assert_eq!(snapshot.adapted, 1);
        assert_eq!(snapshot.no_signal_path, 1);
        assert_eq!(snapshot.sustained_oscillations, 1);
        assert!((snapshot.success_rate - 1.0 / 3.0).abs() < 1e-12);
        assert!((snapshot.avg_solve_ms - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_snapshot_has_no_nan() {
        let snapshot = EvaluationStats::new().snapshot();
        assert_eq!(snapshot.evaluations, 0);
        assert_eq!(snapshot.success_rate, 0.0);
        assert!(!snapshot.avg_solve_ms.is_nan());
    }

    #[test]
    fn test_write_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("evaluation_stats.json");
        let stats = EvaluationStats::new();
        stats.record(&adapted(), Duration::from_millis(1));
        stats.write_json(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: EvaluationStatsSnapshot = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.adapted, 1);
        assert!(!dir.path().join("evaluation_stats.json.tmp").exists());
    }

    #[test]
    fn test_success_log() {
        let log = SuccessLog::new();
        log.record(TopologyId(7), 12);
        log.record(TopologyId(7), 3);
        log.record(TopologyId(7), 12);
        log.record(TopologyId(2), 0);

        assert_eq!(log.slots(TopologyId(7)), vec![3, 12]);
        assert!(log.slots(TopologyId(9)).is_empty());
        assert_eq!(log.topologies(), 2);
        assert_eq!(log.snapshot().keys().copied().collect::<Vec<_>>(), vec![
            TopologyId(2),
            TopologyId(7)
        ]);
    }
}
