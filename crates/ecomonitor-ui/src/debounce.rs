//! Trailing-edge debounce for typed input.
//!
//! Timers run on the tokio runtime, but the action itself is handed back to
//! the event loop through a channel and only runs there.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// A submission whose quiet interval elapsed
#[derive(Debug)]
pub struct Debounced<T> {
    generation: u64,
    action: T,
}

pub struct Debouncer<T> {
    interval: Duration,
    runtime: Handle,
    tx: UnboundedSender<Debounced<T>>,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(interval: Duration, runtime: Handle, tx: UnboundedSender<Debounced<T>>) -> Self {
        Self {
            interval,
            runtime,
            tx,
            generation: 0,
            pending: None,
        }
    }

    /// Schedule `action` after the quiet interval, replacing anything still pending.
    pub fn submit(&mut self, action: T) {
        self.generation += 1;
        if let Some(previous) = self.pending.take() {
            previous.abort();
        }

        let tx = self.tx.clone();
        let generation = self.generation;
        let interval = self.interval;
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(interval).await;
            let _ = tx.send(Debounced { generation, action });
        }));
    }

    /// Unwrap a delivered submission if nothing newer was submitted since.
    ///
    /// A superseded submission can already be in the channel when its timer
    /// task is aborted; this is where it gets dropped.
    pub fn accept(&mut self, fired: Debounced<T>) -> Option<T> {
        if fired.generation != self.generation {
            tracing::trace!("Dropping superseded debounced action");
            return None;
        }
        self.pending = None;
        Some(fired.action)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
