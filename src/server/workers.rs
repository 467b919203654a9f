//! Worker handle bookkeeping.

use tokio::task::JoinHandle;
use tracing::warn;

/// Fixed-capacity, append-only collection of spawned worker sessions.
///
/// A slot is never reused: once `capacity` workers have been admitted the
/// collection stays full for the rest of the run, even after those workers
/// finish. Handles are only joined at shutdown.
#[derive(Debug)]
pub struct WorkerSlots {
    handles: Vec<JoinHandle<()>>,
    capacity: usize,
}

impl WorkerSlots {
    pub fn new(capacity: usize) -> Self {
        Self {
            handles: Vec::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.handles.len() >= self.capacity
    }

    /// Spawns `worker` on its own task if a slot is free.
    ///
    /// Returns `false`, without spawning, once every slot has been used.
    pub fn spawn<F>(&mut self, worker: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_full() {
            return false;
        }
        self.handles.push(tokio::spawn(worker));
        true
    }

    /// Waits for every admitted worker, with no deadline.
    pub async fn drain(self) -> usize {
        let total = self.handles.len();
        for handle in self.handles {
            if let Err(e) = handle.await {
                warn!("worker ended abnormally: {}", e);
            }
        }
        total
    }
}
