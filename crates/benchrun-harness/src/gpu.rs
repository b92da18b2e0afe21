//! GPU pass runner.
//!
//! Drives a fixed number of repeated compute dispatches, one per host tick.
//! The dispatch callable is fire-and-forget: the runner never waits for the
//! device, the tick boundary is the synchronization point. Any intermediate
//! output resource belongs to the caller; the runner only passes parameters.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::info;

use benchrun_core::{Emphasis, GpuReport, LogSink, RunId, Stopwatch};

use crate::error::RunnerError;
use crate::tick::TickWaiter;

/// Per-pass parameters handed to the dispatch callable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchParams {
    /// Elapsed time since the run started.
    pub elapsed: Duration,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

impl DispatchParams {
    /// Elapsed time as fractional seconds, the shape shader uniforms want.
    pub fn elapsed_secs_f32(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

/// Times a fixed sequence of tick-paced compute dispatches as one block.
pub struct GpuRunner {
    sink: Arc<dyn LogSink>,
}

impl GpuRunner {
    /// Create a runner reporting to the given log channel.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Dispatch `pass_count` passes, suspending on the tick waiter after
    /// each, and report the total elapsed time.
    pub async fn run<F>(
        &self,
        ticks: &mut TickWaiter,
        label: &str,
        pass_count: u32,
        width: u32,
        height: u32,
        mut dispatch: F,
    ) -> Result<GpuReport, RunnerError>
    where
        F: FnMut(DispatchParams),
    {
        let run_id = RunId::generate();
        let started_at = Utc::now();

        self.sink
            .append(&format!("Starting {label}..."), Emphasis::Highlight);
        let mut stopwatch = Stopwatch::new();
        stopwatch.start();
        self.sink.append(
            &format!("Rendering {width}x{height} image x{pass_count}"),
            Emphasis::Info,
        );

        for _ in 0..pass_count {
            dispatch(DispatchParams {
                elapsed: stopwatch.elapsed(),
                width,
                height,
            });
            ticks.next_tick().await?;
        }

        let total_ms = stopwatch.elapsed_ms();
        self.sink
            .append(&format!("Total time: {total_ms:.2} ms"), Emphasis::Highlight);
        info!(run_id = %run_id, label, passes = pass_count, total_ms, "GPU pass run complete");

        Ok(GpuReport {
            run_id,
            label: label.to_string(),
            started_at,
            passes: pass_count,
            width,
            height,
            total_ms,
        })
    }
}
