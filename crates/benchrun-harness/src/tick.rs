//! The "suspend until next tick" primitive.
//!
//! The host owns a [`TickSource`] and calls [`TickSource::tick`] once per
//! iteration of its own loop; runners hold a [`TickWaiter`] and suspend on
//! [`TickWaiter::next_tick`] at their yield points. No tick rate is assumed
//! anywhere: the source may tick as fast or as slowly as the host likes.

use tokio::sync::watch;

use crate::error::RunnerError;

/// Host-owned driver for cooperative suspension.
#[derive(Debug)]
pub struct TickSource {
    tx: watch::Sender<u64>,
}

impl TickSource {
    /// Create a source with no ticks delivered yet.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    /// Deliver one tick, waking every suspended waiter.
    pub fn tick(&self) {
        self.tx.send_modify(|n| *n += 1);
    }

    /// Create a waiter that suspends until ticks delivered after this call.
    pub fn subscribe(&self) -> TickWaiter {
        TickWaiter {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for TickSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Runner-side handle that suspends until the next host tick.
#[derive(Debug)]
pub struct TickWaiter {
    rx: watch::Receiver<u64>,
}

impl TickWaiter {
    /// Suspend until the source delivers a tick not yet observed by this
    /// waiter. Ticks delivered while the waiter was busy coalesce into one.
    pub async fn next_tick(&mut self) -> Result<(), RunnerError> {
        self.rx
            .changed()
            .await
            .map_err(|_| RunnerError::TickSourceClosed)
    }
}
