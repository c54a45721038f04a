//! Python bindings for curves

use numpy::PyArray1;
use pyo3::prelude::*;

use super::curve_err;
use crate::curve::{Curve, Interpolator};

#[pyclass(name = "Curve")]
pub struct PyCurve {
    pub(crate) curve: Curve,
}

#[pymethods]
impl PyCurve {
    /// Create a curve from an interpolation name and flat x,y values
    ///
    /// Args:
    ///     kind: LINEAR, SPLINE, POLY3, POLY5, POLY7, POLY_N or SAMPLE_AND_HOLD
    ///     params: x0, y0, x1, y1, ...
    #[new]
    #[pyo3(signature = (kind="LINEAR", params=Vec::new()))]
    fn new(kind: &str, params: Vec<f64>) -> PyResult<Self> {
        Ok(Self {
            curve: Curve::from_params(kind, &params).map_err(curve_err)?,
        })
    }

    /// Parse `"TYPE x0 y0 x1 y1 ..."`
    #[staticmethod]
    fn parse(text: &str) -> PyResult<Self> {
        Ok(Self {
            curve: text.parse().map_err(curve_err)?,
        })
    }

    fn insert_point(&mut self, x: f64, y: f64) -> usize {
        self.curve.insert_point(x, y)
    }

    fn remove_point(&mut self, index: usize) -> PyResult<(f64, f64)> {
        let p = self.curve.remove_point(index).map_err(curve_err)?;
        Ok((p.x, p.y))
    }

    fn move_point(&mut self, index: usize, x: f64, y: f64) -> PyResult<usize> {
        self.curve.move_point(index, x, y).map_err(curve_err)
    }

    fn nearest_point(&self, x: f64, y: f64) -> Option<usize> {
        self.curve.nearest_point(x, y)
    }

    fn points(&self) -> Vec<(f64, f64)> {
        self.curve.points().iter().map(|p| (p.x, p.y)).collect()
    }

    /// Dense curve of `length` samples
    fn interpolate<'py>(&self, py: Python<'py>, length: usize) -> &'py PyArray1<f64> {
        PyArray1::from_vec(py, self.curve.interpolate(length))
    }

    /// Dense curve clamped to [0, 1]
    fn interpolate_limited<'py>(&self, py: Python<'py>, length: usize) -> &'py PyArray1<f64> {
        PyArray1::from_vec(py, self.curve.interpolate_limited(length))
    }

    /// Value at one x in [0, 1]
    fn value_at(&self, x: f64) -> PyResult<f64> {
        Interpolator::for_curve(&self.curve)
            .single_interpolation(x)
            .map_err(curve_err)
    }

    fn __len__(&self) -> usize {
        self.curve.len()
    }

    fn __str__(&self) -> String {
        self.curve.to_string()
    }
}
