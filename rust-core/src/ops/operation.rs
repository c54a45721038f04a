//! Batch operations the worker can run over a sample buffer

use thiserror::Error;

use crate::curve::Curve;
use crate::filters::{self, Filter, FilterError};
use crate::ops::progress::Progress;

#[derive(Error, Debug)]
pub enum OperationError {
    #[error("Operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Filter(FilterError),

    #[error("Worker thread panicked")]
    Panicked,
}

impl From<FilterError> for OperationError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::Cancelled => OperationError::Cancelled,
            other => OperationError::Filter(other),
        }
    }
}

/// One batch edit over a selection
#[derive(Debug, Clone)]
pub enum Operation {
    /// Static filter
    Filter(Filter),

    /// Filter with one tap driven by a curve
    MovingFilter {
        filter: Filter,
        tap: usize,
        curve: Curve,
        low: i32,
        high: i32,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Filter(_) => "filter",
            Operation::MovingFilter { .. } => "moving filter",
        }
    }

    /// Run in place on the calling thread
    pub fn run(&self, samples: &mut [f64], progress: Option<&Progress>) -> Result<(), OperationError> {
        match self {
            Operation::Filter(filter) => filters::apply(filter, samples, progress)?,
            Operation::MovingFilter {
                filter,
                tap,
                curve,
                low,
                high,
            } => filters::apply_moving(filter, *tap, curve, *low, *high, samples, progress)?,
        }
        Ok(())
    }
}
