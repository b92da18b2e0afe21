//! Run-level stopwatch.

use std::time::{Duration, Instant};

/// A resettable wall-clock stopwatch.
///
/// Reads on a stopped watch return [`Duration::ZERO`] rather than erroring;
/// the active/inactive distinction for a run lives in the run state, not
/// here.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stopwatch {
    started_at: Option<Instant>,
}

impl Stopwatch {
    /// Create a stopped stopwatch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) measuring from now.
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stop measuring and forget the start point.
    pub fn reset(&mut self) {
        self.started_at = None;
    }

    /// Returns true if the stopwatch has been started and not reset.
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Elapsed time since start, or zero if stopped.
    pub fn elapsed(&self) -> Duration {
        self.started_at.map(|t| t.elapsed()).unwrap_or(Duration::ZERO)
    }

    /// Elapsed time in fractional milliseconds, or zero if stopped.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopped_watch_reads_zero() {
        let sw = Stopwatch::new();
        assert!(!sw.is_running());
        assert_eq!(sw.elapsed(), Duration::ZERO);
        assert_eq!(sw.elapsed_ms(), 0.0);
    }

    #[test]
    fn test_elapsed_is_monotonic() {
        let mut sw = Stopwatch::new();
        sw.start();
        assert!(sw.is_running());

        let first = sw.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        let second = sw.elapsed();
        assert!(second >= first);
        assert!(second >= Duration::from_millis(5));
    }

    #[test]
    fn test_reset_stops_the_watch() {
        let mut sw = Stopwatch::new();
        sw.start();
        sw.reset();
        assert!(!sw.is_running());
        assert_eq!(sw.elapsed(), Duration::ZERO);
    }
}
