//! Host tick loop.
//!
//! Owns the tick source for each run, renders newly appended log lines to
//! the terminal between ticks, and invokes the completion poll for parallel
//! runs. This is the "frame loop" collaborator the harness yields to.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use benchrun_core::{ConsoleBuffer, Emphasis, GpuReport, LogLine, ParallelReport, StagedReport};
use benchrun_harness::{
    DispatchParams, GpuRunner, ParallelRunner, RunnerError, Stage, StagedRunner, TickSource,
};

const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_MAGENTA: &str = "\x1b[35m";
const ANSI_RESET: &str = "\x1b[0m";

/// Drives one log channel's runs from a timed tick loop.
pub struct Host {
    channel: &'static str,
    log: Arc<ConsoleBuffer>,
    cursor: usize,
    tick_interval: Duration,
    json: bool,
}

impl Host {
    /// Create a host for one channel (e.g. "cpu" or "gpu").
    pub fn new(
        channel: &'static str,
        log: Arc<ConsoleBuffer>,
        tick_interval: Duration,
        json: bool,
    ) -> Self {
        Self {
            channel,
            log,
            cursor: 0,
            tick_interval,
            json,
        }
    }

    /// Run a staged benchmark to completion, ticking and rendering as it
    /// yields.
    pub async fn run_staged(
        &mut self,
        runner: &StagedRunner,
        label: &str,
        stages: Vec<Stage>,
    ) -> Result<StagedReport, RunnerError> {
        let source = TickSource::new();
        let mut waiter = source.subscribe();
        let fut = runner.run(&mut waiter, label, stages);
        tokio::pin!(fut);

        let report = loop {
            tokio::select! {
                res = &mut fut => break res?,
                _ = tokio::time::sleep(self.tick_interval) => {
                    source.tick();
                    self.render_new_lines();
                }
            }
        };
        self.render_new_lines();
        Ok(report)
    }

    /// Dispatch a parallel benchmark and poll for completion once per tick.
    pub async fn run_parallel<F>(
        &mut self,
        runner: &ParallelRunner,
        label: &str,
        worker_count: usize,
        workload_desc: &str,
        worker_fn: F,
    ) -> Result<ParallelReport, RunnerError>
    where
        F: Fn(usize) -> Duration + Send + Sync + 'static,
    {
        runner.dispatch(label, worker_count, workload_desc, worker_fn);
        loop {
            tokio::time::sleep(self.tick_interval).await;
            let report = runner.poll_completion();
            self.render_new_lines();
            match report {
                Some(report) => return Ok(report),
                None if !runner.is_active() => return Err(RunnerError::RunAborted),
                None => {}
            }
        }
    }

    /// Run a GPU pass benchmark to completion, ticking and rendering as it
    /// yields.
    pub async fn run_gpu<F>(
        &mut self,
        runner: &GpuRunner,
        label: &str,
        pass_count: u32,
        width: u32,
        height: u32,
        dispatch: F,
    ) -> Result<GpuReport, RunnerError>
    where
        F: FnMut(DispatchParams),
    {
        let source = TickSource::new();
        let mut waiter = source.subscribe();
        let fut = runner.run(&mut waiter, label, pass_count, width, height, dispatch);
        tokio::pin!(fut);

        let report = loop {
            tokio::select! {
                res = &mut fut => break res?,
                _ = tokio::time::sleep(self.tick_interval) => {
                    source.tick();
                    self.render_new_lines();
                }
            }
        };
        self.render_new_lines();
        Ok(report)
    }

    /// Write a completed run's report as one JSON line, if enabled.
    pub fn emit_report<T: Serialize>(&self, report: &T) {
        if !self.json {
            return;
        }
        if let Ok(json) = serde_json::to_string(report) {
            let mut stdout = io::stdout().lock();
            let _ = writeln!(stdout, "{json}");
            let _ = stdout.flush();
        }
    }

    fn render_new_lines(&mut self) {
        let new_lines = self.log.lines_from(self.cursor);
        self.cursor += new_lines.len();
        for line in &new_lines {
            self.print_line(line);
        }
    }

    fn print_line(&self, line: &LogLine) {
        let (prefix, suffix) = match line.emphasis {
            Emphasis::Highlight => (ANSI_YELLOW, ANSI_RESET),
            Emphasis::Detail => (ANSI_MAGENTA, ANSI_RESET),
            Emphasis::Info => ("", ""),
        };
        println!("[{}] {}{}{}", self.channel, prefix, line.text, suffix);
    }
}
