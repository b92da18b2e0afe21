//! Serializable summaries of completed runs.
//!
//! A report is built once, when a run finishes, and handed to the host; runs
//! themselves are not persisted anywhere.

use crate::ids::RunId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One stage of a staged (sequential) run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageTiming {
    /// Stage label as announced in the log.
    pub label: String,
    /// Elapsed time for this stage alone, in milliseconds.
    pub elapsed_ms: f64,
}

/// Summary of a completed staged run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StagedReport {
    /// Unique run identifier.
    pub run_id: RunId,
    /// Run label as announced in the log.
    pub label: String,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Per-stage timings in execution order.
    pub stages: Vec<StageTiming>,
    /// Total wall-clock time for the whole run, in milliseconds.
    pub total_ms: f64,
}

/// One worker of a parallel run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerTiming {
    /// Worker index in dispatch order.
    pub index: usize,
    /// The worker's own measured duration, in milliseconds.
    pub elapsed_ms: f64,
}

/// Summary of a completed worker-pool run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParallelReport {
    /// Unique run identifier.
    pub run_id: RunId,
    /// Run label as announced in the log.
    pub label: String,
    /// When the run was dispatched.
    pub started_at: DateTime<Utc>,
    /// Per-worker timings, always in index order regardless of completion
    /// order.
    pub workers: Vec<WorkerTiming>,
    /// Wall-clock time from dispatch to the completing poll, in
    /// milliseconds.
    pub total_ms: f64,
}

impl ParallelReport {
    /// Number of workers in the run.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// The slowest individual worker duration, if any workers ran.
    pub fn max_worker_ms(&self) -> Option<f64> {
        self.workers
            .iter()
            .map(|w| w.elapsed_ms)
            .fold(None, |acc, ms| Some(acc.map_or(ms, |a: f64| a.max(ms))))
    }
}

/// Summary of a completed GPU pass run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpuReport {
    /// Unique run identifier.
    pub run_id: RunId,
    /// Run label as announced in the log.
    pub label: String,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Number of dispatched passes.
    pub passes: u32,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Total wall-clock time across all passes, in milliseconds.
    pub total_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_parallel() -> ParallelReport {
        ParallelReport {
            run_id: RunId::new("run-1"),
            label: "cpu multithread".to_string(),
            started_at: Utc::now(),
            workers: vec![
                WorkerTiming { index: 0, elapsed_ms: 5.0 },
                WorkerTiming { index: 1, elapsed_ms: 1.0 },
                WorkerTiming { index: 2, elapsed_ms: 9.0 },
            ],
            total_ms: 12.5,
        }
    }

    #[test]
    fn test_max_worker_ms() {
        let report = sample_parallel();
        assert_eq!(report.worker_count(), 3);
        assert_eq!(report.max_worker_ms(), Some(9.0));
    }

    #[test]
    fn test_max_worker_ms_empty() {
        let mut report = sample_parallel();
        report.workers.clear();
        assert_eq!(report.max_worker_ms(), None);
    }

    #[test]
    fn test_report_serializes() {
        let report = sample_parallel();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"elapsed_ms\":9.0"));
        assert!(json.contains("\"total_ms\":12.5"));
    }
}
