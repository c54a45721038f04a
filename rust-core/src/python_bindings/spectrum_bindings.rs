//! Python bindings for transforms and spectrum analysis

use num_complex::Complex64;
use numpy::{PyArray1, PyArray2, PyReadonlyArray1};
use pyo3::prelude::*;

use super::fft_err;
use crate::spectrum::{AnalyzerConfig, FftEngine, SpectrumAnalyzer, WindowType};

/// Window type enum exposed to Python
#[pyclass(name = "WindowType")]
#[derive(Clone)]
pub enum PyWindowType {
    Hann,
    Hamming,
    Blackman,
    Rectangular,
}

impl From<PyWindowType> for WindowType {
    fn from(py_win: PyWindowType) -> Self {
        match py_win {
            PyWindowType::Hann => WindowType::Hann,
            PyWindowType::Hamming => WindowType::Hamming,
            PyWindowType::Blackman => WindowType::Blackman,
            PyWindowType::Rectangular => WindowType::Rectangular,
        }
    }
}

/// Mixed-radix FFT of a fixed length
#[pyclass(name = "Fft")]
pub struct PyFft {
    engine: FftEngine,
}

#[pymethods]
impl PyFft {
    /// Create an FFT for `n` points (any length >= 1)
    #[new]
    fn new(n: usize) -> PyResult<Self> {
        Ok(Self {
            engine: FftEngine::new(n).map_err(fft_err)?,
        })
    }

    /// Forward transform of a complex array
    fn forward<'py>(
        &mut self,
        py: Python<'py>,
        data: PyReadonlyArray1<Complex64>,
    ) -> PyResult<&'py PyArray1<Complex64>> {
        let mut buf = data.as_slice()?.to_vec();
        self.engine.forward(&mut buf).map_err(fft_err)?;
        Ok(PyArray1::from_vec(py, buf))
    }

    /// Inverse transform, scaled by 1/N
    fn inverse<'py>(
        &mut self,
        py: Python<'py>,
        data: PyReadonlyArray1<Complex64>,
    ) -> PyResult<&'py PyArray1<Complex64>> {
        let mut buf = data.as_slice()?.to_vec();
        self.engine.inverse(&mut buf).map_err(fft_err)?;
        Ok(PyArray1::from_vec(py, buf))
    }

    /// Magnitude of the half spectrum of a real signal
    fn magnitude<'py>(&mut self, py: Python<'py>, signal: PyReadonlyArray1<f64>) -> PyResult<&'py PyArray1<f64>> {
        let mag = self.engine.compute_magnitude(signal.as_slice()?).map_err(fft_err)?;
        Ok(PyArray1::from_vec(py, mag))
    }

    /// Stage factors of the transform length
    fn factors(&self) -> Vec<usize> {
        self.engine.wavetable().factors().to_vec()
    }

    fn __len__(&self) -> usize {
        self.engine.fft_size()
    }
}

/// Spectrum analyzer exposed to Python
#[pyclass(name = "SpectrumAnalyzer")]
pub struct PySpectrumAnalyzer {
    analyzer: SpectrumAnalyzer,
}

#[pymethods]
impl PySpectrumAnalyzer {
    /// Create a new spectrum analyzer
    ///
    /// Args:
    ///     window_len: Requested window length (shortened to a cheap FFT size)
    ///     window_type: Window type for analysis
    ///     sample_rate: Sample rate in Hz
    ///     hop: Frame spacing in samples (0 = half window)
    ///     apply_correction: Whether to apply amplitude correction for windowing
    #[new]
    #[pyo3(signature = (window_len=2048, window_type=PyWindowType::Hann, sample_rate=44100.0, hop=0, apply_correction=true))]
    fn new(
        window_len: usize,
        window_type: PyWindowType,
        sample_rate: f64,
        hop: usize,
        apply_correction: bool,
    ) -> PyResult<Self> {
        let config = AnalyzerConfig {
            window_len,
            window_type: window_type.into(),
            sample_rate,
            hop,
            apply_correction,
            ..AnalyzerConfig::default()
        };

        Ok(Self {
            analyzer: SpectrumAnalyzer::new(config).map_err(fft_err)?,
        })
    }

    /// Magnitude spectrum of one block
    fn analyze<'py>(&mut self, py: Python<'py>, signal: PyReadonlyArray1<f64>) -> PyResult<&'py PyArray1<f64>> {
        let spectrum = self.analyzer.analyze(signal.as_slice()?).map_err(fft_err)?;
        Ok(PyArray1::from_vec(py, spectrum))
    }

    /// Magnitude spectrum of one block in dB
    #[pyo3(signature = (signal, reference=1.0))]
    fn analyze_db<'py>(
        &mut self,
        py: Python<'py>,
        signal: PyReadonlyArray1<f64>,
        reference: f64,
    ) -> PyResult<&'py PyArray1<f64>> {
        let spectrum = self
            .analyzer
            .analyze_db(signal.as_slice()?, reference)
            .map_err(fft_err)?;
        Ok(PyArray1::from_vec(py, spectrum))
    }

    /// Mean magnitude spectrum over a whole selection
    fn averaged_spectrum<'py>(
        &mut self,
        py: Python<'py>,
        signal: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let spectrum = self.analyzer.averaged_spectrum(signal.as_slice()?).map_err(fft_err)?;
        Ok(PyArray1::from_vec(py, spectrum))
    }

    /// Frames x bins magnitude matrix
    fn spectrogram<'py>(&mut self, py: Python<'py>, signal: PyReadonlyArray1<f64>) -> PyResult<&'py PyArray2<f64>> {
        let frames = self.analyzer.spectrogram(signal.as_slice()?).map_err(fft_err)?;
        Ok(PyArray2::from_owned_array(py, frames))
    }

    fn frequency_bins_hz<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_vec(py, self.analyzer.frequency_bins_hz())
    }

    fn num_bins(&self) -> usize {
        self.analyzer.num_bins()
    }

    /// Transform length actually in use
    fn window_len(&self) -> usize {
        self.analyzer.window_len()
    }
}
