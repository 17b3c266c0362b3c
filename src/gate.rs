use std::sync::mpsc;
use std::thread::{self, ThreadId};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A single-worker serialized execution context.
///
/// Jobs submitted to the same gate never run concurrently and always run in
/// submission order, regardless of which thread submitted them. The worker
/// thread exits once every sender handle (the owning subject plus any
/// still-queued jobs) has been dropped.
pub(crate) struct Gate {
    sender: mpsc::Sender<Job>,
    worker: ThreadId,
}

impl Gate {
    pub(crate) fn new(label: &str) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let handle = thread::Builder::new()
            .name(label.to_owned())
            .spawn(move || {
                while let Ok(job) = receiver.recv() {
                    job();
                }
            })
            .expect("failed to spawn gate worker");
        Self { sender, worker: handle.thread().id() }
    }

    /// True when the calling thread is the gate worker itself.
    pub(crate) fn is_current(&self) -> bool { thread::current().id() == self.worker }

    /// Enqueue a job and return immediately.
    pub(crate) fn spawn(&self, job: impl FnOnce() + Send + 'static) { let _ = self.sender.send(Box::new(job)); }

    /// Enqueue a job and block the caller until it has run, returning its result.
    ///
    /// Must not be called from the gate worker; doing so would deadlock. The
    /// caller declares that context, so this is only checked in debug builds.
    pub(crate) fn join<R: Send + 'static>(&self, job: impl FnOnce() -> R + Send + 'static) -> R {
        debug_assert!(!self.is_current(), "synchronous join from the gate worker deadlocks");
        let (done, result) = mpsc::channel();
        let _ = self.sender.send(Box::new(move || {
            let _ = done.send(job());
        }));
        match result.recv() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("gate worker is gone; a joined operation cannot complete");
                panic!("gate worker terminated before completing a joined operation");
            }
        }
    }

    /// Run a job inline. The caller asserts it is already on the gate worker.
    pub(crate) fn run_inline(&self, job: impl FnOnce()) {
        debug_assert!(self.is_current(), "inline submission requires already executing on the gate");
        job();
    }
}
