//! Core domain errors.

use thiserror::Error;

/// Core domain errors for benchrun.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Result slot index outside the run's worker count.
    #[error("Result slot {index} out of bounds (worker count {len})")]
    SlotOutOfBounds { index: usize, len: usize },

    /// A measured duration must never be negative.
    #[error("Negative duration {ms} ms for result slot {index}")]
    NegativeDuration { index: usize, ms: f64 },
}
