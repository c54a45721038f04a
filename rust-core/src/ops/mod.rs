//! Threaded batch operations with progress and cancellation

pub mod operation;
pub mod progress;
pub mod worker;

pub use operation::{Operation, OperationError};
pub use progress::{Progress, PROGRESS_SIZE};
pub use worker::{Worker, WorkerConfig, WorkerHandle};
