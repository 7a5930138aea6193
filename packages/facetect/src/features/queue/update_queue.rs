//! Keyed, coalescing task queue with a background worker thread.

use super::config;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

type Task = Box<dyn FnOnce() + Send>;

enum Command {
    Queue { key: String, task: Task },
    Dispose,
}

/// How queued tasks are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Debounced on a background thread (production).
    Deferred,

    /// Run inline at enqueue time. Keeps single-threaded test assertions
    /// deterministic.
    Immediate,
}

/// Debounced update queue.
///
/// Enqueuing under a key that already has a pending task replaces it
/// (last-write-wins); the surviving task runs exactly once after a quiet
/// period with no further enqueue for that key.
pub struct UpdateQueue {
    mode: ExecutionMode,
    quiet_period: Duration,
    tx: Mutex<Option<Sender<Command>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    disposed: AtomicBool,
}

impl UpdateQueue {
    pub fn new(quiet_period: Duration, mode: ExecutionMode) -> Self {
        let (tx, worker) = match mode {
            ExecutionMode::Immediate => (None, None),
            ExecutionMode::Deferred => {
                let (tx, rx) = channel();
                let worker = thread::Builder::new()
                    .name("facet-update-queue".into())
                    .spawn(move || Self::run_worker(rx, quiet_period))
                    .expect("failed to spawn update queue worker");
                (Some(tx), Some(worker))
            }
        };

        Self {
            mode,
            quiet_period,
            tx: Mutex::new(tx),
            worker: Mutex::new(worker),
            disposed: AtomicBool::new(false),
        }
    }

    /// Queue with the default 500 ms quiet period.
    pub fn with_default_period(mode: ExecutionMode) -> Self {
        Self::new(config::QUIET_PERIOD, mode)
    }

    /// Enqueue a task under a logical key.
    ///
    /// After [`UpdateQueue::dispose`] this is a silent no-op.
    pub fn queue(&self, key: impl Into<String>, task: impl FnOnce() + Send + 'static) {
        if self.disposed.load(Ordering::Acquire) {
            return;
        }

        match self.mode {
            ExecutionMode::Immediate => task(),
            ExecutionMode::Deferred => {
                let guard = self.tx.lock();
                if let Some(tx) = guard.as_ref() {
                    let _ = tx.send(Command::Queue {
                        key: key.into(),
                        task: Box::new(task),
                    });
                }
            }
        }
    }

    /// Stop the worker and discard pending tasks.
    ///
    /// A task already past its quiet period may still complete; nothing
    /// new starts.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }

        if let Some(tx) = self.tx.lock().take() {
            let _ = tx.send(Command::Dispose);
        }
        if let Some(worker) = self.worker.lock().take() {
            let _ = worker.join();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    fn run_worker(rx: Receiver<Command>, quiet_period: Duration) {
        let mut pending: HashMap<String, (Task, Instant)> = HashMap::new();

        loop {
            match rx.recv_timeout(config::TICK) {
                Ok(Command::Queue { key, task }) => {
                    // Last-write-wins: restart the quiet period for the key
                    let deadline = Instant::now() + quiet_period;
                    if pending.insert(key.clone(), (task, deadline)).is_some() {
                        tracing::trace!(key = %key, "pending update superseded");
                    }
                }
                Ok(Command::Dispose) => break,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            let now = Instant::now();
            let due: Vec<String> = pending
                .iter()
                .filter(|(_, (_, deadline))| *deadline <= now)
                .map(|(key, _)| key.clone())
                .collect();
            for key in due {
                if let Some((task, _)) = pending.remove(&key) {
                    tracing::trace!(key = %key, "running debounced update");
                    task();
                }
            }
        }
        // Remaining pending tasks are dropped unexecuted
    }
}

impl Drop for UpdateQueue {
    fn drop(&mut self) {
        self.dispose();
    }
}
