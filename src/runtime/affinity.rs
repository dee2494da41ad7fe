//! A designated thread for affinity-bound callbacks.
//!
//! Some subscribers must always run on the same thread, the way a UI
//! toolkit insists that widgets are touched from its event loop. An
//! [`AffinityThread`] is that thread: it drains a queue of boxed jobs in
//! submission order.
//!
//! `invoke_and_wait` is request/response. When called from the affinity
//! thread itself the job runs inline; otherwise the caller blocks until the
//! job has finished on the affinity thread. Because the caller blocks on a
//! channel, it must not be a thread driving a tokio runtime.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle, ThreadId};

use log::{debug, error, warn};
use tokio::sync::{mpsc, oneshot};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Owner of the affinity thread. Dropping it closes the queue and joins
/// the thread, unless the drop happens on the affinity thread itself.
#[derive(Debug)]
pub struct AffinityThread {
    name: String,
    sender: Option<mpsc::UnboundedSender<Job>>,
    thread_id: ThreadId,
    join: Option<JoinHandle<()>>,
}

impl AffinityThread {
    /// Spawn a named affinity thread.
    ///
    /// # Errors
    ///
    /// If the OS refuses to create the thread.
    pub fn spawn(name: impl Into<String>) -> std::io::Result<Self> {
        let name = name.into();
        let (sender, mut inbox) = mpsc::unbounded_channel::<Job>();

        let thread_name = name.clone();
        let join = thread::Builder::new().name(name.clone()).spawn(move || {
            debug!("Affinity thread '{thread_name}' started");
            while let Some(job) = inbox.blocking_recv() {
                if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                    error!("Affinity job panicked on '{thread_name}'");
                }
            }
            debug!("Affinity thread '{thread_name}' stopped");
        })?;

        Ok(Self {
            name,
            sender: Some(sender),
            thread_id: join.thread().id(),
            join: Some(join),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the calling thread is the affinity thread.
    #[must_use]
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    /// Run `job` on the affinity thread and wait for its result.
    ///
    /// Returns `None` if the job could not complete: the thread has shut
    /// down, or the job panicked.
    pub fn invoke_and_wait<R, F>(&self, job: F) -> Option<R>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        if self.is_current() {
            return Some(job());
        }

        let (reply, done) = oneshot::channel();
        let boxed: Job = Box::new(move || {
            let _ = reply.send(job());
        });

        if !self.submit(boxed) {
            return None;
        }
        match done.blocking_recv() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Job on affinity thread '{}' never completed", self.name);
                None
            }
        }
    }

    /// Queue `job` on the affinity thread without waiting.
    ///
    /// Returns `false` if the thread has shut down.
    pub fn invoke_later<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(Box::new(job))
    }

    fn submit(&self, job: Job) -> bool {
        match &self.sender {
            Some(sender) if sender.send(job).is_ok() => true,
            _ => {
                warn!("Affinity thread '{}' is no longer accepting jobs", self.name);
                false
            }
        }
    }
}

impl Drop for AffinityThread {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(join) = self.join.take() {
            if !self.is_current() && join.join().is_err() {
                error!("Affinity thread '{}' terminated abnormally", self.name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use parking_lot::Mutex;

    #[test]
    fn test_invoke_and_wait_runs_on_affinity_thread() {
        let affinity = AffinityThread::spawn("ui").unwrap();
        let name = affinity
            .invoke_and_wait(|| thread::current().name().map(str::to_string))
            .unwrap();
        assert_eq!(name.as_deref(), Some("ui"));
        assert!(!affinity.is_current());
    }

    #[test]
    fn test_invoke_and_wait_inline_on_own_thread() {
        let affinity = Arc::new(AffinityThread::spawn("ui-inline").unwrap());
        let inner = Arc::clone(&affinity);
        // A nested call from the affinity thread must not deadlock.
        let nested = affinity
            .invoke_and_wait(move || {
                let same = inner.is_current();
                let value = inner.invoke_and_wait(|| 7);
                (same, value)
            })
            .unwrap();
        assert_eq!(nested, (true, Some(7)));
    }

    #[test]
    fn test_jobs_run_in_submission_order() {
        let affinity = AffinityThread::spawn("ui-order").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for i in 0..5 {
            let seen = Arc::clone(&seen);
            assert!(affinity.invoke_later(move || seen.lock().push(i)));
        }
        affinity.invoke_and_wait(|| ()).unwrap();
        assert_eq!(*seen.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_panicking_job_reports_none() {
        let affinity = AffinityThread::spawn("ui-panic").unwrap();
        let result: Option<()> = affinity.invoke_and_wait(|| panic!("boom"));
        assert!(result.is_none());
        // The thread survives the panic.
        assert_eq!(affinity.invoke_and_wait(|| 1), Some(1));
    }
}
