use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::error::ParzError;
use crate::types::Result;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Fixed-size thread pool executing spawned tasks.
///
/// The pool is shared: several pipelines can borrow one pool through an
/// `Arc`, and the pool must outlive every pipeline using it. Dropping the
/// pool stops intake, lets queued tasks drain, and joins the worker
/// threads.
pub struct WorkerPool {
    state: Arc<PoolState>,
    tasks: Option<Sender<Task>>,
    workers: Vec<JoinHandle<()>>,
}

struct PoolState {
    submitted: AtomicUsize,
    completed: AtomicUsize,
}

impl WorkerPool {
    /// Spawns `num_workers` threads (at least one).
    pub fn new(num_workers: usize) -> Self {
        let num_workers = num_workers.max(1);
        let (tasks_tx, tasks_rx) = unbounded::<Task>();
        let state = Arc::new(PoolState {
            submitted: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        });

        let mut workers = Vec::with_capacity(num_workers);
        for worker_id in 0..num_workers {
            let worker_rx = tasks_rx.clone();
            let worker_state = Arc::clone(&state);
            workers.push(thread::spawn(move || {
                run_worker_loop(worker_id, worker_rx, worker_state);
            }));
        }

        Self {
            state,
            tasks: Some(tasks_tx),
            workers,
        }
    }

    /// Number of worker threads in this pool.
    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Enqueues a task for execution on some worker thread.
    ///
    /// Fails with [`ParzError::PoolUnavailable`] once the pool has shut
    /// down.
    pub fn spawn(&self, task: impl FnOnce() + Send + 'static) -> Result<()> {
        let Some(tasks) = self.tasks.as_ref() else {
            return Err(ParzError::PoolUnavailable("worker pool is shut down"));
        };
        tasks
            .send(Box::new(task))
            .map_err(|_| ParzError::PoolUnavailable("worker pool threads exited"))?;
        self.state.submitted.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Total spawned task count.
    pub fn submitted_count(&self) -> usize {
        self.state.submitted.load(Ordering::Acquire)
    }

    /// Total finished task count.
    pub fn completed_count(&self) -> usize {
        self.state.completed.load(Ordering::Acquire)
    }

    /// Tasks spawned but not finished yet.
    pub fn pending_count(&self) -> usize {
        self.submitted_count()
            .saturating_sub(self.completed_count())
    }

    /// Stops intake, drains queued tasks, and joins every worker.
    pub fn shutdown(self) {
        // Drop runs the shutdown sequence.
    }

    fn shutdown_and_join(&mut self) {
        self.tasks.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::debug!("worker thread panicked during shutdown");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

fn run_worker_loop(worker_id: usize, tasks: Receiver<Task>, state: Arc<PoolState>) {
    tracing::trace!(worker_id, "worker thread started");
    while let Ok(task) = tasks.recv() {
        // A panicking task must not take the worker thread with it; the
        // task's completion channel is dropped and the driver observes the
        // failure there.
        if catch_unwind(AssertUnwindSafe(task)).is_err() {
            tracing::debug!(worker_id, "task panicked");
        }
        state.completed.fetch_add(1, Ordering::AcqRel);
    }
    tracing::trace!(worker_id, "worker thread stopped");
}
