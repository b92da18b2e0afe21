//! Benchrun Harness
//!
//! The three timed runners plus the collaborator seams they depend on:
//!
//! - [`StagedRunner`] executes an ordered list of stages cooperatively,
//!   yielding to the host between stages.
//! - [`ParallelRunner`] dispatches independently timed workloads onto a
//!   [`WorkerPool`] and detects completion with a non-blocking per-tick poll.
//! - [`GpuRunner`] paces repeated fire-and-forget compute dispatches against
//!   the host tick.
//!
//! The host owns a [`TickSource`] and drives everything: it ticks at
//! whatever cadence it likes, and calls [`ParallelRunner::poll_completion`]
//! once per tick while a parallel run may be active.

pub mod error;
pub mod gpu;
pub mod parallel;
pub mod pool;
pub mod staged;
pub mod tick;

// Re-export commonly used types
pub use error::RunnerError;
pub use gpu::{DispatchParams, GpuRunner};
pub use parallel::ParallelRunner;
pub use pool::{BlockingPool, Job, WorkerPool};
pub use staged::{Stage, StagedRunner};
pub use tick::{TickSource, TickWaiter};
