//! Fire-and-forget worker pool seam.

/// A unit of work submitted to a pool.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fire-and-forget task submission.
///
/// Deliberately provides no join handle: each submitted job eventually runs
/// exactly once on some thread, with no ordering relative to other
/// submissions, and completion is observed only through whatever state the
/// job itself mutates. Polling the result slots is the completion contract,
/// not joining the pool.
pub trait WorkerPool: Send + Sync {
    /// Submit one job for eventual execution.
    fn submit(&self, job: Job);
}

/// Pool backed by the tokio blocking thread pool.
#[derive(Debug, Default)]
pub struct BlockingPool;

impl BlockingPool {
    /// Create a new pool handle.
    pub fn new() -> Self {
        Self
    }
}

impl WorkerPool for BlockingPool {
    fn submit(&self, job: Job) {
        // The join handle is dropped on purpose: completion is observed via
        // the result slots, never by joining.
        drop(tokio::task::spawn_blocking(job));
    }
}
