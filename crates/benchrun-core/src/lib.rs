//! Benchrun Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - The async runtime
//! - Worker pools or schedulers
//! - Any rendering surface
//!
//! All types here represent the measurement domain of benchrun: log lines,
//! result slots, stopwatches, and run reports.

pub mod error;
pub mod ids;
pub mod log;
pub mod report;
pub mod slots;
pub mod stopwatch;

// Re-export commonly used types
pub use error::CoreError;
pub use ids::RunId;
pub use log::{ConsoleBuffer, Emphasis, LogLine, LogSink};
pub use report::{GpuReport, ParallelReport, StageTiming, StagedReport, WorkerTiming};
pub use slots::{ResultSlots, SLOT_INCOMPLETE};
pub use stopwatch::Stopwatch;
