//! Cancellation token for the tick thread.
//!
//! The token is a crossbeam channel on which nothing is ever sent.  Dropping
//! the sender (via [`CancelHandle::cancel`]) disconnects it, which wakes a
//! receiver blocked in `recv_timeout` immediately.  The engine's pause
//! between ticks is that `recv_timeout`, so a stop request never waits out
//! the rest of a tick period.

use std::sync::Mutex;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};

use crate::lock;

/// Create a connected handle (controller side) and token (engine side).
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = crossbeam_channel::bounded(0);
    (CancelHandle { tx: Mutex::new(Some(tx)) }, CancelToken { rx })
}

/// Controller-side half: fires the cancellation.
pub struct CancelHandle {
    tx: Mutex<Option<Sender<()>>>,
}

impl CancelHandle {
    /// Signal cancellation.  Returns `false` if it had already been signalled.
    pub fn cancel(&self) -> bool {
        lock(&self.tx).take().is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        lock(&self.tx).is_none()
    }
}

/// Engine-side half: observes the cancellation.
pub struct CancelToken {
    rx: Receiver<()>,
}

impl CancelToken {
    /// Non-blocking check.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Sleep for up to `period`.  Returns `true` as soon as cancellation is
    /// signalled, `false` if the full period elapsed.
    pub fn wait(&self, period: Duration) -> bool {
        match self.rx.recv_timeout(period) {
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) | Ok(()) => true,
        }
    }
}
