//! Mixed-radix complex FFT
//!
//! Stockham-style transform: every stage reads one buffer and writes the
//! other, alternating between the caller's data and a scratch buffer, so no
//! bit-reversal pass is needed and any length is supported.

use super::butterflies::pass;
use super::wavetable::Wavetable;
use num_complex::Complex64;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FftError {
    #[error("Transform length must be at least 1 (got {0})")]
    InvalidLength(usize),

    #[error("Factorization of {n} multiplies back to {product}")]
    Factorization { n: usize, product: usize },

    #[error("Buffer length {actual} does not match transform length {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Radix-2 transform needs a power-of-two length (got {0})")]
    NotPowerOfTwo(usize),

    #[error("Failed to allocate {0} complex samples")]
    Allocation(usize),
}

/// Transform direction
///
/// `Forward` uses `exp(-iθ)`, `Backward` the conjugate `exp(+iθ)`. Neither
/// normalizes; see [`inverse`] for the scaled backward transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Sign of the exponent
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => -1.0,
            Direction::Backward => 1.0,
        }
    }
}

/// Allocate a zeroed complex buffer, reporting allocation failure
pub fn alloc_buffer(len: usize) -> Result<Vec<Complex64>, FftError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| FftError::Allocation(len))?;
    buffer.resize(len, Complex64::new(0.0, 0.0));
    Ok(buffer)
}

/// Transform `data` in place using `wavetable`
///
/// # Arguments
/// * `data` - Samples, exactly `wavetable.len()` long
/// * `wavetable` - Plan built for this length
/// * `scratch` - Ping-pong buffer of at least `wavetable.len()` samples
/// * `direction` - Forward or (unnormalized) backward
pub fn transform(
    data: &mut [Complex64],
    wavetable: &Wavetable,
    scratch: &mut [Complex64],
    direction: Direction,
) -> Result<(), FftError> {
    let n = wavetable.len();
    if data.len() != n {
        return Err(FftError::LengthMismatch {
            expected: n,
            actual: data.len(),
        });
    }
    if scratch.len() < n {
        return Err(FftError::LengthMismatch {
            expected: n,
            actual: scratch.len(),
        });
    }

    if n == 1 {
        return Ok(());
    }

    let scratch = &mut scratch[..n];
    let mut in_data = true;
    let mut product = 1;

    for (stage, &factor) in wavetable.factors().iter().enumerate() {
        product *= factor;
        let twiddle = wavetable.twiddle(stage);

        if in_data {
            pass(data, scratch, factor, product, twiddle, direction);
        } else {
            pass(scratch, data, factor, product, twiddle, direction);
        }
        in_data = !in_data;
    }

    if !in_data {
        data.copy_from_slice(scratch);
    }

    Ok(())
}

/// Forward transform
pub fn forward(data: &mut [Complex64], wavetable: &Wavetable, scratch: &mut [Complex64]) -> Result<(), FftError> {
    transform(data, wavetable, scratch, Direction::Forward)
}

/// Backward transform without normalization
pub fn backward(data: &mut [Complex64], wavetable: &Wavetable, scratch: &mut [Complex64]) -> Result<(), FftError> {
    transform(data, wavetable, scratch, Direction::Backward)
}

/// Backward transform scaled by `1/N`
pub fn inverse(data: &mut [Complex64], wavetable: &Wavetable, scratch: &mut [Complex64]) -> Result<(), FftError> {
    transform(data, wavetable, scratch, Direction::Backward)?;

    let scale = 1.0 / wavetable.len() as f64;
    for z in data.iter_mut() {
        *z *= scale;
    }
    Ok(())
}

/// FFT engine for one transform length
///
/// Pairs a shared [`Wavetable`] with its own scratch buffer, so several
/// engines (one per thread) can reuse a single table without locking.
#[derive(Debug, Clone)]
pub struct FftEngine {
    wavetable: Arc<Wavetable>,
    scratch: Vec<Complex64>,
    /// Reusable buffer for real-input helpers
    work: Vec<Complex64>,
}

impl FftEngine {
    /// Create a new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - Transform length (any length >= 1)
    pub fn new(fft_size: usize) -> Result<Self, FftError> {
        Self::with_wavetable(Arc::new(Wavetable::build(fft_size)?))
    }

    /// Create an engine around an existing (possibly shared) wavetable
    pub fn with_wavetable(wavetable: Arc<Wavetable>) -> Result<Self, FftError> {
        let n = wavetable.len();
        Ok(Self {
            scratch: alloc_buffer(n)?,
            work: alloc_buffer(n)?,
            wavetable,
        })
    }

    /// Shared wavetable, for building sibling engines
    pub fn wavetable(&self) -> &Arc<Wavetable> {
        &self.wavetable
    }

    pub fn forward(&mut self, data: &mut [Complex64]) -> Result<(), FftError> {
        transform(data, &self.wavetable, &mut self.scratch, Direction::Forward)
    }

    pub fn backward(&mut self, data: &mut [Complex64]) -> Result<(), FftError> {
        transform(data, &self.wavetable, &mut self.scratch, Direction::Backward)
    }

    pub fn inverse(&mut self, data: &mut [Complex64]) -> Result<(), FftError> {
        inverse(data, &self.wavetable, &mut self.scratch)
    }

    /// Forward transform of a real signal, positive frequencies only
    ///
    /// # Arguments
    /// * `signal` - Input signal (zero-padded or truncated to fft_size)
    ///
    /// # Returns
    /// Spectrum bins X[k] for k = 0..=fft_size/2
    pub fn forward_real(&mut self, signal: &[f64]) -> Result<Vec<Complex64>, FftError> {
        let n = self.fft_size();
        let copy_len = signal.len().min(n);
        for (slot, &s) in self.work.iter_mut().zip(&signal[..copy_len]) {
            *slot = Complex64::new(s, 0.0);
        }
        self.work[copy_len..].fill(Complex64::new(0.0, 0.0));

        transform(&mut self.work, &self.wavetable, &mut self.scratch, Direction::Forward)?;

        Ok(self.work[..self.num_bins()].to_vec())
    }

    /// Compute magnitude spectrum |X[k]| for positive frequencies
    pub fn compute_magnitude(&mut self, signal: &[f64]) -> Result<Vec<f64>, FftError> {
        Ok(self.forward_real(signal)?.iter().map(|c| c.norm()).collect())
    }

    /// Magnitude spectrum in dB: 20*log10(|X[k]|/reference)
    pub fn compute_magnitude_db(&mut self, signal: &[f64], reference: f64) -> Result<Vec<f64>, FftError> {
        Ok(self
            .compute_magnitude(signal)?
            .iter()
            .map(|&mag| magnitude_to_db(mag, reference))
            .collect())
    }

    /// Compute power spectrum (magnitude squared)
    pub fn compute_power(&mut self, signal: &[f64]) -> Result<Vec<f64>, FftError> {
        Ok(self.forward_real(signal)?.iter().map(|c| c.norm_sqr()).collect())
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.wavetable.len()
    }

    /// Number of positive-frequency bins (fft_size/2 + 1)
    pub fn num_bins(&self) -> usize {
        self.fft_size() / 2 + 1
    }

    /// Bin index to frequency in Hz
    pub fn bin_to_hz(&self, bin: usize, sample_rate: f64) -> f64 {
        bin as f64 * sample_rate / self.fft_size() as f64
    }
}

/// 20*log10(mag/reference), floored at -200 dB
pub fn magnitude_to_db(mag: f64, reference: f64) -> f64 {
    let mag_clamped = mag.max(1e-10); // Avoid log(0)
    20.0 * (mag_clamped / reference).log10()
}
