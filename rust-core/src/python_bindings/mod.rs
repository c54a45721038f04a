//! PyO3 bindings for Python integration

use pyo3::exceptions::{PyIOError, PyIndexError, PyMemoryError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::curve::CurveError;
use crate::filters::FilterError;
use crate::ops::OperationError;
use crate::spectrum::FftError;

mod curve_bindings;
mod filter_bindings;
mod operation_bindings;
mod spectrum_bindings;

/// Python module definition
#[pymodule]
fn spectral_edit(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<spectrum_bindings::PyWindowType>()?;
    m.add_class::<spectrum_bindings::PyFft>()?;
    m.add_class::<spectrum_bindings::PySpectrumAnalyzer>()?;
    m.add_class::<curve_bindings::PyCurve>()?;
    m.add_class::<filter_bindings::PyFilter>()?;
    m.add_class::<operation_bindings::PyWorker>()?;

    Ok(())
}

fn fft_err(e: FftError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn curve_err(e: CurveError) -> PyErr {
    match e {
        CurveError::IndexOutOfRange { .. } => PyIndexError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}

fn filter_err(e: FilterError) -> PyErr {
    match e {
        FilterError::Io(_) => PyIOError::new_err(e.to_string()),
        FilterError::TapOutOfRange { .. } => PyIndexError::new_err(e.to_string()),
        FilterError::Allocation { .. } => PyMemoryError::new_err(e.to_string()),
        FilterError::Cancelled => PyRuntimeError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}

fn operation_err(e: OperationError) -> PyErr {
    match e {
        OperationError::Filter(e) => filter_err(e),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}
