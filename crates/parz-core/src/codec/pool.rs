use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::types::Result;

/// A free list of reusable codec contexts.
///
/// Contexts are created lazily on acquire and recycled on release. The
/// mutex guards only a `Vec` pop or push; it is never held across a codec
/// call or a context allocation. At most `max_pooled` contexts are kept
/// parked for reuse and the excess is dropped on release. Dropping the
/// pool destroys every parked context.
#[derive(Debug)]
pub struct ContextPool<T> {
    slots: Mutex<Vec<T>>,
    max_pooled: usize,
    metrics: PoolMetricsInner,
}

impl<T> ContextPool<T> {
    pub fn new(max_pooled: usize) -> Self {
        Self {
            slots: Mutex::new(Vec::new()),
            max_pooled: max_pooled.max(1),
            metrics: PoolMetricsInner::default(),
        }
    }

    /// Pops a parked context, or creates a fresh one with `create`.
    pub fn acquire_with(&self, create: impl FnOnce() -> Result<T>) -> Result<T> {
        let recycled = self
            .slots
            .lock()
            .expect("context pool mutex poisoned")
            .pop();

        match recycled {
            Some(ctx) => {
                self.metrics.recycled.fetch_add(1, Ordering::Relaxed);
                Ok(ctx)
            }
            None => {
                let ctx = create()?;
                let created = self.metrics.created.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::trace!(created, "codec context created");
                Ok(ctx)
            }
        }
    }

    /// Parks a context for reuse; drops it when the pool is already full.
    pub fn release(&self, ctx: T) {
        let mut slots = self.slots.lock().expect("context pool mutex poisoned");
        if slots.len() < self.max_pooled {
            slots.push(ctx);
        } else {
            drop(slots);
            self.metrics.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Destroys a context whose codec state may be inconsistent instead of
    /// recycling it.
    pub fn discard(&self, ctx: T) {
        drop(ctx);
        self.metrics.discarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of contexts currently parked in the free list.
    pub fn pooled(&self) -> usize {
        self.slots.lock().expect("context pool mutex poisoned").len()
    }

    /// Maximum number of contexts kept for reuse.
    pub fn max_pooled(&self) -> usize {
        self.max_pooled
    }

    /// Returns a snapshot of the current pool metrics.
    pub fn metrics(&self) -> PoolMetricsSnapshot {
        PoolMetricsSnapshot {
            created: self.metrics.created.load(Ordering::Relaxed),
            recycled: self.metrics.recycled.load(Ordering::Relaxed),
            dropped: self.metrics.dropped.load(Ordering::Relaxed),
            discarded: self.metrics.discarded.load(Ordering::Relaxed),
        }
    }
}

/// A snapshot of context pool metrics at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolMetricsSnapshot {
    /// Contexts created because the free list was empty on acquire.
    pub created: usize,
    /// Acquires satisfied from the free list.
    pub recycled: usize,
    /// Releases dropped because the free list was full.
    pub dropped: usize,
    /// Contexts destroyed after a failed codec call.
    pub discarded: usize,
}

impl PoolMetricsSnapshot {
    /// Contexts still alive: parked plus any currently lent out.
    pub fn live(&self) -> usize {
        self.created
            .saturating_sub(self.dropped)
            .saturating_sub(self.discarded)
    }
}

#[derive(Debug, Default)]
struct PoolMetricsInner {
    created: AtomicUsize,
    recycled: AtomicUsize,
    dropped: AtomicUsize,
    discarded: AtomicUsize,
}
