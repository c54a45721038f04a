//! In-place radix-2 transform for power-of-two lengths
//!
//! Bypasses the wavetable machinery: iterative butterflies plus one
//! bit-reversal permutation, before the butterflies for decimation in time
//! or after them for decimation in frequency.

use super::fft::{Direction, FftError};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Butterfly ordering of the radix-2 path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decimation {
    /// Bit-reverse first, then butterflies with growing span
    #[default]
    Time,
    /// Butterflies with shrinking span, then bit-reverse
    Frequency,
}

/// Transform `data` in place; `data.len()` must be a power of two
pub fn radix2_transform(
    data: &mut [Complex64],
    direction: Direction,
    decimation: Decimation,
) -> Result<(), FftError> {
    let n = data.len();
    if !n.is_power_of_two() {
        return Err(FftError::NotPowerOfTwo(n));
    }
    if n == 1 {
        return Ok(());
    }

    match decimation {
        Decimation::Time => {
            bit_reverse_permute(data);
            dit_butterflies(data, direction.sign());
        }
        Decimation::Frequency => {
            dif_butterflies(data, direction.sign());
            bit_reverse_permute(data);
        }
    }
    Ok(())
}

/// Radix-2 backward transform scaled by `1/N`
pub fn radix2_inverse(data: &mut [Complex64], decimation: Decimation) -> Result<(), FftError> {
    radix2_transform(data, Direction::Backward, decimation)?;

    let scale = 1.0 / data.len() as f64;
    for z in data.iter_mut() {
        *z *= scale;
    }
    Ok(())
}

/// Swap every element with the one at its bit-reversed index
pub fn bit_reverse_permute(data: &mut [Complex64]) {
    let n = data.len();
    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;

        if i < j {
            data.swap(i, j);
        }
    }
}

fn dit_butterflies(data: &mut [Complex64], sign: f64) {
    let n = data.len();
    let mut span = 2;
    while span <= n {
        let half = span / 2;
        let twiddles = half_twiddles(span, sign);

        for start in (0..n).step_by(span) {
            for (k, &w) in twiddles.iter().enumerate() {
                let u = data[start + k];
                let t = w * data[start + k + half];
                data[start + k] = u + t;
                data[start + k + half] = u - t;
            }
        }
        span <<= 1;
    }
}

fn dif_butterflies(data: &mut [Complex64], sign: f64) {
    let n = data.len();
    let mut span = n;
    while span >= 2 {
        let half = span / 2;
        let twiddles = half_twiddles(span, sign);

        for start in (0..n).step_by(span) {
            for (k, &w) in twiddles.iter().enumerate() {
                let u = data[start + k];
                let v = data[start + k + half];
                data[start + k] = u + v;
                data[start + k + half] = (u - v) * w;
            }
        }
        span >>= 1;
    }
}

fn half_twiddles(span: usize, sign: f64) -> Vec<Complex64> {
    (0..span / 2)
        .map(|k| Complex64::from_polar(1.0, sign * 2.0 * PI * k as f64 / span as f64))
        .collect()
}
