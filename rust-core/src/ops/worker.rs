//! Background worker for long-running operations
//!
//! The worker thread owns the sample buffer for the whole run. The only
//! state it shares with the caller is the [`Progress`] behind an `Arc`,
//! read by the caller and checked for cancellation by the worker once per
//! chunk.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::{debug, info};

use super::operation::{Operation, OperationError};
use super::progress::{Progress, PROGRESS_SIZE};

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Samples between progress publications and cancel checks
    pub progress_size: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            progress_size: PROGRESS_SIZE,
        }
    }
}

pub struct Worker;

impl Worker {
    /// Run `operation` over `samples` on a new thread
    pub fn spawn(operation: Operation, samples: Vec<f64>, config: WorkerConfig) -> WorkerHandle {
        let progress = Arc::new(Progress::with_chunk_size(samples.len(), config.progress_size));
        Self::spawn_with_progress(operation, samples, progress)
    }

    /// Run on a new thread, reporting through a caller-supplied `progress`
    ///
    /// A `progress` already cancelled stops the run at its first chunk
    /// boundary.
    pub fn spawn_with_progress(operation: Operation, samples: Vec<f64>, progress: Arc<Progress>) -> WorkerHandle {
        let shared = Arc::clone(&progress);

        debug!("Starting {} over {} samples", operation.name(), samples.len());

        let thread = thread::spawn(move || {
            let mut samples = samples;
            let started = Instant::now();

            match operation.run(&mut samples, Some(&shared)) {
                Ok(()) => {
                    info!(
                        "Finished {} over {} samples in {:.1?}",
                        operation.name(),
                        samples.len(),
                        started.elapsed()
                    );
                    Ok(samples)
                }
                Err(OperationError::Cancelled) => {
                    info!(
                        "Cancelled {} after {}/{} samples",
                        operation.name(),
                        shared.done(),
                        shared.total()
                    );
                    Err(OperationError::Cancelled)
                }
                Err(e) => Err(e),
            }
        });

        WorkerHandle {
            progress,
            thread: Some(thread),
        }
    }
}

/// Caller-side handle to a running operation
pub struct WorkerHandle {
    progress: Arc<Progress>,
    thread: Option<JoinHandle<Result<Vec<f64>, OperationError>>>,
}

impl WorkerHandle {
    /// Samples completed so far
    pub fn progress(&self) -> usize {
        self.progress.done()
    }

    pub fn total(&self) -> usize {
        self.progress.total()
    }

    pub fn fraction(&self) -> f64 {
        self.progress.fraction()
    }

    /// Request a stop at the next chunk boundary
    pub fn cancel(&self) {
        self.progress.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Wait for the worker and take back the processed buffer
    pub fn join(mut self) -> Result<Vec<f64>, OperationError> {
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| OperationError::Panicked)?,
            None => Err(OperationError::Panicked),
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        if self.thread.take().is_some() {
            debug!("Worker handle dropped before join, cancelling");
            self.progress.cancel();
        }
    }
}
