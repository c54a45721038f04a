//! Python bindings for tap filters

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;

use super::curve_bindings::PyCurve;
use super::filter_err;
use crate::filters::Filter;

/// Tap/delay filter exposed to Python
#[pyclass(name = "Filter")]
pub struct PyFilter {
    pub(crate) filter: Filter,
}

#[pymethods]
impl PyFilter {
    /// Create a pass-through FIR filter with `taps` taps
    #[new]
    #[pyo3(signature = (taps=1))]
    fn new(taps: usize) -> Self {
        Self {
            filter: Filter::new(taps),
        }
    }

    /// Build from decoded parameters: rate, fir flag, tap count, delay/coeff pairs
    #[staticmethod]
    fn from_params(params: Vec<f64>) -> PyResult<Self> {
        Ok(Self {
            filter: Filter::from_params(&params).map_err(filter_err)?,
        })
    }

    #[staticmethod]
    fn load(path: &str) -> PyResult<Self> {
        Ok(Self {
            filter: Filter::load(path).map_err(filter_err)?,
        })
    }

    fn save(&self, path: &str) -> PyResult<()> {
        self.filter.save(path).map_err(filter_err)
    }

    fn set_tap(&mut self, index: usize, delay: usize, coeff: f64) -> PyResult<()> {
        self.filter.set_tap(index, delay, coeff).map_err(filter_err)
    }

    fn resize(&mut self, taps: usize) {
        self.filter.resize(taps);
    }

    #[getter]
    fn fir(&self) -> bool {
        self.filter.is_fir()
    }

    #[setter]
    fn set_fir(&mut self, fir: bool) {
        self.filter.set_fir(fir);
    }

    fn taps(&self) -> Vec<(usize, f64)> {
        self.filter
            .delays()
            .iter()
            .copied()
            .zip(self.filter.coeffs().iter().copied())
            .collect()
    }

    /// Filter a copy of `samples`
    fn apply<'py>(&self, py: Python<'py>, samples: PyReadonlyArray1<f64>) -> PyResult<&'py PyArray1<f64>> {
        let mut buf = samples.as_slice()?.to_vec();
        self.filter.apply(&mut buf).map_err(filter_err)?;
        Ok(PyArray1::from_vec(py, buf))
    }

    /// Filter a copy of `samples` with tap `tap` driven by `curve`
    fn apply_moving<'py>(
        &self,
        py: Python<'py>,
        tap: usize,
        curve: PyRef<'_, PyCurve>,
        low: i32,
        high: i32,
        samples: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let mut buf = samples.as_slice()?.to_vec();
        self.filter
            .apply_moving(tap, &curve.curve, low, high, &mut buf)
            .map_err(filter_err)?;
        Ok(PyArray1::from_vec(py, buf))
    }

    fn __len__(&self) -> usize {
        self.filter.taps()
    }
}
