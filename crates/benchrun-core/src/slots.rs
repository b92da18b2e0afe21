//! Per-worker result slots with an incomplete sentinel.

use crate::error::CoreError;

/// Sentinel marking a result slot as not yet written. Any measured duration,
/// including a legitimate 0.0 ms, is strictly greater than this.
pub const SLOT_INCOMPLETE: f64 = -1.0;

/// Fixed-size container of per-worker durations in milliseconds.
///
/// Allocated once at dispatch with every slot at [`SLOT_INCOMPLETE`]; each
/// worker writes its own slot exactly once. Callers provide the external
/// synchronization (the harness holds these behind the run-state mutex);
/// this type only encodes the sentinel scheme and the completion predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSlots(Vec<f64>);

impl ResultSlots {
    /// Allocate `worker_count` slots, all incomplete.
    pub fn new(worker_count: usize) -> Self {
        Self(vec![SLOT_INCOMPLETE; worker_count])
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the container holds no slots.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Record a worker's duration into its slot.
    pub fn record(&mut self, index: usize, ms: f64) -> Result<(), CoreError> {
        if ms < 0.0 {
            return Err(CoreError::NegativeDuration { index, ms });
        }
        let len = self.0.len();
        let slot = self
            .0
            .get_mut(index)
            .ok_or(CoreError::SlotOutOfBounds { index, len })?;
        *slot = ms;
        Ok(())
    }

    /// Duration recorded at `index`, or the sentinel if still incomplete.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// The run is complete iff every slot is strictly greater than the
    /// sentinel.
    pub fn all_complete(&self) -> bool {
        self.0.iter().all(|&ms| ms > SLOT_INCOMPLETE)
    }

    /// Iterate `(index, duration_ms)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().copied().enumerate()
    }
}
