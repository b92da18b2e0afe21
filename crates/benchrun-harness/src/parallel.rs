//! Worker-pool runner with poll-based completion aggregation.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use benchrun_core::{
    Emphasis, LogSink, ParallelReport, ResultSlots, RunId, Stopwatch, WorkerTiming,
};

use crate::pool::WorkerPool;

/// Guarded state of the currently active worker-pool run.
///
/// At most one run is active at a time; `epoch` increments on every dispatch
/// so that a stale worker surviving from an aborted run can never touch a
/// later run's slots.
struct PoolRunState {
    active: bool,
    epoch: u64,
    run_id: RunId,
    label: String,
    started_at: DateTime<Utc>,
    stopwatch: Stopwatch,
    slots: ResultSlots,
}

impl PoolRunState {
    fn new() -> Self {
        Self {
            active: false,
            epoch: 0,
            run_id: RunId::new(""),
            label: String::new(),
            started_at: Utc::now(),
            stopwatch: Stopwatch::new(),
            slots: ResultSlots::new(0),
        }
    }
}

/// Dispatches a fixed number of independently timed workloads onto a worker
/// pool and aggregates their durations.
///
/// Completion detection is polling-based by contract: the host invokes
/// [`ParallelRunner::poll_completion`] once per tick, and on the first poll
/// that observes every result slot written, the report is emitted exactly
/// once and the runner resets for the next run.
pub struct ParallelRunner {
    state: Arc<Mutex<PoolRunState>>,
    pool: Arc<dyn WorkerPool>,
    sink: Arc<dyn LogSink>,
}

impl ParallelRunner {
    /// Create a runner submitting to `pool` and reporting to `sink`.
    pub fn new(pool: Arc<dyn WorkerPool>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            state: Arc::new(Mutex::new(PoolRunState::new())),
            pool,
            sink,
        }
    }

    /// Returns true while a dispatched run has not yet been reported or
    /// aborted.
    pub fn is_active(&self) -> bool {
        self.state.lock().unwrap().active
    }

    /// Dispatch `worker_count` workloads onto the pool.
    ///
    /// No-op if a run is already active (re-entry guard). `worker_fn`
    /// receives the worker index so per-worker timings stay addressable; it
    /// returns the duration to record for that worker. Workers run with no
    /// ordering guarantee and the runner never joins them; completion is
    /// observed solely through [`ParallelRunner::poll_completion`].
    pub fn dispatch<F>(&self, label: &str, worker_count: usize, workload_desc: &str, worker_fn: F)
    where
        F: Fn(usize) -> Duration + Send + Sync + 'static,
    {
        let epoch = {
            let mut state = self.state.lock().unwrap();
            if state.active {
                warn!(label, "Parallel run already active - ignoring dispatch");
                return;
            }
            state.active = true;
            state.epoch += 1;
            state.run_id = RunId::generate();
            state.label = label.to_string();
            state.started_at = Utc::now();
            state.slots = ResultSlots::new(worker_count);
            state.stopwatch.start();
            state.epoch
        };

        self.sink
            .append(&format!("Starting {label}..."), Emphasis::Highlight);
        self.sink
            .append(&format!("Starting {worker_count} workers."), Emphasis::Info);
        self.sink
            .append(&format!("Running {workload_desc} per worker."), Emphasis::Info);
        info!(label, worker_count, "Dispatching parallel run");

        let worker_fn = Arc::new(worker_fn);
        for index in 0..worker_count {
            let worker_fn = Arc::clone(&worker_fn);
            let mut guard = SlotGuard {
                state: Arc::clone(&self.state),
                sink: Arc::clone(&self.sink),
                epoch,
                index,
                recorded: false,
            };
            self.pool.submit(Box::new(move || {
                let elapsed = worker_fn(index);
                guard.record(elapsed);
            }));
        }
    }

    /// Per-tick completion check. Never blocks on workload progress.
    ///
    /// Returns `None` when no run is active (spurious polls are no-ops) or
    /// when any slot is still at the sentinel. On the poll that first
    /// observes every slot written, emits the per-worker lines in index
    /// order plus the highlighted total, clears the active flag, resets the
    /// run stopwatch, and returns the report. Detection and clearing share
    /// one critical section, so a later poll can never re-report the same
    /// run.
    pub fn poll_completion(&self) -> Option<ParallelReport> {
        let mut state = self.state.lock().unwrap();
        if !state.active || !state.slots.all_complete() {
            return None;
        }

        for (index, ms) in state.slots.iter() {
            self.sink
                .append(&format!("Ran worker {index} in {ms:.2} ms"), Emphasis::Detail);
        }
        let total_ms = state.stopwatch.elapsed_ms();
        self.sink
            .append(&format!("Total time: {total_ms:.2} ms"), Emphasis::Highlight);

        let report = ParallelReport {
            run_id: state.run_id.clone(),
            label: state.label.clone(),
            started_at: state.started_at,
            workers: state
                .slots
                .iter()
                .map(|(index, elapsed_ms)| WorkerTiming { index, elapsed_ms })
                .collect(),
            total_ms,
        };
        state.active = false;
        state.stopwatch.reset();

        info!(
            run_id = %report.run_id,
            worker_count = report.worker_count(),
            total_ms,
            "Parallel run complete"
        );
        Some(report)
    }
}

/// Arms each submitted job so a worker that unwinds before recording its
/// duration terminates the run instead of leaving it active forever.
struct SlotGuard {
    state: Arc<Mutex<PoolRunState>>,
    sink: Arc<dyn LogSink>,
    epoch: u64,
    index: usize,
    recorded: bool,
}

impl SlotGuard {
    fn record(&mut self, elapsed: Duration) {
        self.recorded = true;
        let ms = elapsed.as_secs_f64() * 1000.0;
        let mut state = self.state.lock().unwrap();
        if state.epoch != self.epoch {
            // The run this worker belonged to is gone; its slot no longer
            // exists.
            return;
        }
        if let Err(err) = state.slots.record(self.index, ms) {
            error!(index = self.index, error = %err, "Failed to record worker result");
        }
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        if self.recorded {
            return;
        }
        // Runs during unwind; a second panic here would abort the process.
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.epoch != self.epoch || !state.active {
            return;
        }
        state.active = false;
        state.stopwatch.reset();
        self.sink.append(
            &format!("Worker {} aborted - run terminated", self.index),
            Emphasis::Highlight,
        );
        error!(
            index = self.index,
            "Worker aborted before recording a result; parallel run terminated"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchrun_core::ConsoleBuffer;
    use std::panic::AssertUnwindSafe;
    use std::time::Instant;

    use crate::pool::testing::ManualPool;
    use crate::pool::BlockingPool;

    fn runner_with_manual_pool() -> (ParallelRunner, Arc<ManualPool>, Arc<ConsoleBuffer>) {
        let pool = Arc::new(ManualPool::new());
        let sink = Arc::new(ConsoleBuffer::new());
        let runner = ParallelRunner::new(pool.clone(), sink.clone());
        (runner, pool, sink)
    }

    /// Durations (ms) returned per worker index.
    const SCENARIO_MS: [u64; 4] = [5, 1, 9, 3];

    fn scenario_worker(index: usize) -> Duration {
        let d = Duration::from_millis(SCENARIO_MS[index]);
        // Sleep for real so the run-level stopwatch covers the workload.
        std::thread::sleep(d);
        d
    }

    #[test]
    fn test_report_emitted_exactly_once() {
        let (runner, pool, sink) = runner_with_manual_pool();
        runner.dispatch("exactly once", 4, "fake workload", scenario_worker);

        assert!(runner.poll_completion().is_none(), "nothing ran yet");
        pool.run_all();

        assert!(runner.poll_completion().is_some());
        for _ in 0..50 {
            assert!(runner.poll_completion().is_none());
        }

        let totals = sink
            .snapshot()
            .iter()
            .filter(|line| line.text.starts_with("Total time:"))
            .count();
        assert_eq!(totals, 1);
    }

    #[test]
    fn test_index_order_preserved_under_reversed_completion() {
        let (runner, pool, sink) = runner_with_manual_pool();
        runner.dispatch("reversed completion", 4, "fake workload", scenario_worker);

        // Workers complete in reverse dispatch order.
        pool.run_all_reversed();
        let report = runner.poll_completion().expect("run should be complete");

        let indices: Vec<usize> = report.workers.iter().map(|w| w.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        for (worker, &nominal) in report.workers.iter().zip(SCENARIO_MS.iter()) {
            assert!((worker.elapsed_ms - nominal as f64).abs() < 1e-9);
        }
        // Total covers at least the slowest worker.
        assert!(report.total_ms >= 9.0);

        let detail: Vec<String> = sink
            .snapshot()
            .iter()
            .filter(|line| line.emphasis == Emphasis::Detail)
            .map(|line| line.text.clone())
            .collect();
        assert_eq!(detail[0], "Ran worker 0 in 5.00 ms");
        assert_eq!(detail[1], "Ran worker 1 in 1.00 ms");
        assert_eq!(detail[2], "Ran worker 2 in 9.00 ms");
        assert_eq!(detail[3], "Ran worker 3 in 3.00 ms");
    }

    #[test]
    fn test_reentrant_dispatch_is_noop() {
        let (runner, pool, sink) = runner_with_manual_pool();
        runner.dispatch("first", 4, "fake workload", scenario_worker);
        assert_eq!(pool.pending(), 4);

        runner.dispatch("second", 8, "fake workload", scenario_worker);
        assert_eq!(pool.pending(), 4, "re-entrant dispatch must not submit");

        let starts = sink
            .snapshot()
            .iter()
            .filter(|line| line.text.starts_with("Starting") && line.text.ends_with("..."))
            .count();
        assert_eq!(starts, 1);

        pool.run_all();
        let report = runner.poll_completion().unwrap();
        assert_eq!(report.worker_count(), 4);
        assert_eq!(report.label, "first");
    }

    #[test]
    fn test_spurious_poll_without_active_run() {
        let (runner, _pool, sink) = runner_with_manual_pool();
        for _ in 0..10 {
            assert!(runner.poll_completion().is_none());
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn test_active_flag_resets_for_second_run() {
        let (runner, pool, _sink) = runner_with_manual_pool();

        runner.dispatch("run one", 3, "fake workload", |_| Duration::from_millis(2));
        pool.run_all();
        let first = runner.poll_completion().unwrap();
        assert!(!runner.is_active());

        runner.dispatch("run two", 3, "fake workload", |_| Duration::from_millis(4));
        assert!(runner.is_active());
        pool.run_all();
        let second = runner.poll_completion().unwrap();

        assert_ne!(first.run_id, second.run_id);
        assert_eq!(second.worker_count(), 3);
        assert!(second
            .workers
            .iter()
            .all(|w| (w.elapsed_ms - 4.0).abs() < 1e-9));
    }

    #[test]
    fn test_incomplete_run_keeps_polling_quietly() {
        let (runner, pool, _sink) = runner_with_manual_pool();
        runner.dispatch("partial", 3, "fake workload", |_| Duration::from_millis(1));

        // Two of three workers complete; the poll must stay a no-op without
        // blocking or reporting.
        pool.run_one();
        pool.run_one();
        for _ in 0..20 {
            assert!(runner.poll_completion().is_none());
        }
        assert!(runner.is_active());

        pool.run_one();
        assert!(runner.poll_completion().is_some());
    }

    #[test]
    fn test_panicking_worker_terminates_run() {
        let (runner, pool, sink) = runner_with_manual_pool();
        runner.dispatch("crashing", 2, "fake workload", |index| {
            if index == 0 {
                panic!("worker exploded");
            }
            Duration::from_millis(1)
        });

        let result = std::panic::catch_unwind(AssertUnwindSafe(|| pool.run_all()));
        assert!(result.is_err(), "the panic propagates to the pool thread");

        // The guard cleared the run instead of leaving it active forever.
        assert!(!runner.is_active());
        assert!(runner.poll_completion().is_none());
        assert!(sink
            .snapshot()
            .iter()
            .any(|line| line.text.contains("aborted")));

        // And a fresh run still works.
        runner.dispatch("after crash", 2, "fake workload", |_| Duration::from_millis(1));
        assert!(runner.is_active());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_blocking_pool_end_to_end() {
        let sink = Arc::new(ConsoleBuffer::new());
        let runner = ParallelRunner::new(Arc::new(BlockingPool::new()), sink);
        runner.dispatch("real pool", 8, "1 ms sleep", |_| {
            let start = Instant::now();
            std::thread::sleep(Duration::from_millis(1));
            start.elapsed()
        });

        let deadline = Instant::now() + Duration::from_secs(5);
        let report = loop {
            if let Some(report) = runner.poll_completion() {
                break report;
            }
            assert!(Instant::now() < deadline, "run never completed");
            tokio::time::sleep(Duration::from_millis(2)).await;
        };

        assert_eq!(report.worker_count(), 8);
        assert!(report.workers.iter().all(|w| w.elapsed_ms >= 1.0));
        assert!(report.total_ms >= report.max_worker_ms().unwrap());
    }
}
