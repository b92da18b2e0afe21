//! Sequential staged runner.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use benchrun_core::{Emphasis, LogSink, RunId, StageTiming, StagedReport, Stopwatch};

use crate::error::RunnerError;
use crate::tick::TickWaiter;

/// Result type for stage workloads.
pub type StageResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// One labelled stage of a sequential run.
pub struct Stage {
    /// Label emitted to the log before the stage executes.
    pub label: String,
    work: Box<dyn FnMut() -> StageResult + Send>,
}

impl Stage {
    /// Create a stage from a fallible workload.
    pub fn new(label: impl Into<String>, work: impl FnMut() -> StageResult + Send + 'static) -> Self {
        Self {
            label: label.into(),
            work: Box::new(work),
        }
    }

    /// Create a stage from a workload that cannot fail.
    pub fn infallible(label: impl Into<String>, mut work: impl FnMut() + Send + 'static) -> Self {
        Self::new(label, move || {
            work();
            Ok(())
        })
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage").field("label", &self.label).finish()
    }
}

/// Executes an ordered list of timed stages cooperatively.
///
/// Each stage runs synchronously on the calling task; the runner suspends on
/// the tick waiter before and after every stage so the host can render the
/// log between blocking chunks of work.
pub struct StagedRunner {
    sink: Arc<dyn LogSink>,
}

impl StagedRunner {
    /// Create a runner reporting to the given log channel.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Run all stages in order and report per-stage deltas plus the grand
    /// total.
    ///
    /// A failing stage aborts the remainder of the sequence: the error
    /// propagates and no total line is emitted. The harness treats that as
    /// an unrecoverable failure, not a condition to mask.
    pub async fn run(
        &self,
        ticks: &mut TickWaiter,
        label: &str,
        mut stages: Vec<Stage>,
    ) -> Result<StagedReport, RunnerError> {
        let run_id = RunId::generate();
        let started_at = Utc::now();

        self.sink
            .append(&format!("Starting {label}..."), Emphasis::Highlight);
        let mut stopwatch = Stopwatch::new();
        stopwatch.start();
        let mut last_boundary_ms = 0.0;
        let mut timings = Vec::with_capacity(stages.len());
        ticks.next_tick().await?;

        for stage in &mut stages {
            self.sink.append(&stage.label, Emphasis::Info);
            ticks.next_tick().await?;

            (stage.work)().map_err(|source| RunnerError::StageFailed {
                label: stage.label.clone(),
                source,
            })?;

            let now_ms = stopwatch.elapsed_ms();
            let elapsed_ms = now_ms - last_boundary_ms;
            last_boundary_ms = now_ms;
            self.sink
                .append(&format!("Elapsed: {elapsed_ms:.2} ms"), Emphasis::Info);
            timings.push(StageTiming {
                label: stage.label.clone(),
                elapsed_ms,
            });
            ticks.next_tick().await?;
        }

        let total_ms = stopwatch.elapsed_ms();
        self.sink
            .append(&format!("Total time: {total_ms:.2} ms"), Emphasis::Highlight);
        info!(run_id = %run_id, label, stages = timings.len(), total_ms, "Staged run complete");

        Ok(StagedReport {
            run_id,
            label: label.to_string(),
            started_at,
            stages: timings,
            total_ms,
        })
    }
}
