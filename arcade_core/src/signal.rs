use std::sync::mpsc::{self, Receiver, SyncSender};

use thiserror::Error;

/// The completing side went away without ever completing, e.g. a game
/// thread that panicked.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[error("completion was abandoned before a value was sent")]
pub struct Abandoned;

/// Sending half of a one-shot completion. Completing consumes it, so a
/// value can only ever be sent once.
#[derive(Debug)]
pub struct Completer<T> {
    send: SyncSender<T>,
}

/// Receiving half of a one-shot completion.
#[derive(Debug)]
pub struct CompletionWaiter<T> {
    recv: Receiver<T>,
}

/// Creates a single use completion signal, for a controller to block on
/// until a game running elsewhere reports that it has finished.
pub fn completion_channel<T>() -> (Completer<T>, CompletionWaiter<T>) {
    let (send, recv) = mpsc::sync_channel(1);
    (Completer { send }, CompletionWaiter { recv })
}

impl<T> Completer<T> {
    pub fn complete(self, value: T) {
        // Capacity is 1 and this is the only send, so this never blocks.
        if self.send.send(value).is_err() {
            log::debug!("Completion sent after the waiter was dropped");
        }
    }
}

impl<T> CompletionWaiter<T> {
    /// Blocks until the completer sends its value.
    pub fn wait(self) -> Result<T, Abandoned> {
        self.recv.recv().map_err(|_| Abandoned)
    }

    /// Returns the value if it has already been sent, without blocking.
    pub fn try_take(&self) -> Option<T> {
        self.recv.try_recv().ok()
    }
}
