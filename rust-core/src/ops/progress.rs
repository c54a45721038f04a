//! Shared progress counter and cancellation flag
//!
//! The only state a running operation shares with the thread that started
//! it. Workers publish completed samples once per chunk and check the
//! cancel flag at the same boundary.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Default number of samples between progress reports and cancel checks
pub const PROGRESS_SIZE: usize = 4096;

#[derive(Debug)]
pub struct Progress {
    done: AtomicUsize,
    total: usize,
    chunk_size: usize,
    cancelled: AtomicBool,
}

impl Progress {
    /// Progress for an operation over `total` samples
    pub fn new(total: usize) -> Self {
        Self::with_chunk_size(total, PROGRESS_SIZE)
    }

    pub fn with_chunk_size(total: usize, chunk_size: usize) -> Self {
        Self {
            done: AtomicUsize::new(0),
            total,
            chunk_size: chunk_size.max(1),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Record `samples` more completed samples
    pub fn advance(&self, samples: usize) {
        self.done.fetch_add(samples, Ordering::Relaxed);
    }

    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Completed share in `[0,1]`
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.done() as f64 / self.total as f64).min(1.0)
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Ask the operation to stop at its next chunk boundary
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Per-loop helper that batches progress updates into chunks
#[derive(Debug)]
pub(crate) struct ChunkTicker<'a> {
    progress: Option<&'a Progress>,
    pending: usize,
    chunk_size: usize,
}

impl<'a> ChunkTicker<'a> {
    pub(crate) fn new(progress: Option<&'a Progress>) -> Self {
        Self {
            progress,
            pending: 0,
            chunk_size: progress.map_or(PROGRESS_SIZE, Progress::chunk_size),
        }
    }

    /// Count one sample; returns `false` once cancellation was seen
    #[inline]
    pub(crate) fn tick(&mut self) -> bool {
        self.pending += 1;
        if self.pending >= self.chunk_size {
            return self.flush();
        }
        true
    }

    /// Publish pending samples; returns `false` if cancelled
    pub(crate) fn flush(&mut self) -> bool {
        let pending = std::mem::take(&mut self.pending);
        match self.progress {
            Some(progress) => {
                progress.advance(pending);
                !progress.is_cancelled()
            }
            None => true,
        }
    }
}
