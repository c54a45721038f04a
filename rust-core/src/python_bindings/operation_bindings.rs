//! Python bindings for background operations
//!
//! The filter runs on a Rust thread; Python only polls progress.

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;

use super::curve_bindings::PyCurve;
use super::filter_bindings::PyFilter;
use super::operation_err;
use crate::ops::{Operation, Worker, WorkerConfig, WorkerHandle};

#[pyclass(name = "Worker")]
pub struct PyWorker {
    handle: Option<WorkerHandle>,
}

impl PyWorker {
    fn spawn(operation: Operation, samples: Vec<f64>) -> Self {
        Self {
            handle: Some(Worker::spawn(operation, samples, WorkerConfig::default())),
        }
    }

    fn handle(&self) -> PyResult<&WorkerHandle> {
        self.handle
            .as_ref()
            .ok_or_else(|| PyRuntimeError::new_err("Worker already joined"))
    }
}

#[pymethods]
impl PyWorker {
    /// Start filtering a copy of `samples` in the background
    #[staticmethod]
    fn filter(filter: PyRef<'_, PyFilter>, samples: PyReadonlyArray1<f64>) -> PyResult<Self> {
        let samples = samples.as_slice()?.to_vec();
        Ok(Self::spawn(Operation::Filter(filter.filter.clone()), samples))
    }

    /// Start a moving filter over a copy of `samples` in the background
    #[staticmethod]
    fn moving_filter(
        filter: PyRef<'_, PyFilter>,
        tap: usize,
        curve: PyRef<'_, PyCurve>,
        low: i32,
        high: i32,
        samples: PyReadonlyArray1<f64>,
    ) -> PyResult<Self> {
        let samples = samples.as_slice()?.to_vec();
        let operation = Operation::MovingFilter {
            filter: filter.filter.clone(),
            tap,
            curve: curve.curve.clone(),
            low,
            high,
        };
        Ok(Self::spawn(operation, samples))
    }

    /// Completed fraction in [0, 1]
    fn progress(&self) -> PyResult<f64> {
        Ok(self.handle()?.fraction())
    }

    fn cancel(&self) -> PyResult<()> {
        self.handle()?.cancel();
        Ok(())
    }

    fn is_finished(&self) -> PyResult<bool> {
        Ok(self.handle()?.is_finished())
    }

    /// Wait for the result (releases the GIL while waiting)
    fn join<'py>(&mut self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| PyRuntimeError::new_err("Worker already joined"))?;
        let samples = py.allow_threads(|| handle.join()).map_err(operation_err)?;
        Ok(PyArray1::from_vec(py, samples))
    }
}
