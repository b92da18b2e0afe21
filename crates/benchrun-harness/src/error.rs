//! Runner errors.

use thiserror::Error;

/// Errors surfaced by the timed runners.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The tick source was dropped while a runner was suspended on it.
    #[error("Tick source closed while a run was in progress")]
    TickSourceClosed,

    /// A stage workload failed; the remaining stages were not executed.
    #[error("Stage '{label}' failed: {source}")]
    StageFailed {
        label: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A worker died before recording its result; the run was terminated
    /// without a completion report.
    #[error("Parallel run terminated before completion")]
    RunAborted,
}
