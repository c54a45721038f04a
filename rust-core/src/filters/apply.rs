//! In-place filter application
//!
//! Both filter kinds run in place over the selection. Loop direction decides
//! what a delayed tap reads:
//! - FIR walks indices downward, so `samples[i - d]` has not been
//!   overwritten yet and every tap sees the original input.
//! - IIR walks upward, so `samples[i - d]` already holds filtered output and
//!   the filter feeds back on itself.
//!
//! The first `max_offset` samples take a bounds-checked pass that skips taps
//! reaching before the selection (no zero padding). Every output is divided
//! by the sum of absolute coefficients.

use super::filter::{Filter, FilterError};
use crate::curve::{Curve, Interpolator};
use crate::ops::progress::{ChunkTicker, Progress};

/// Per-sample coefficient modulation of one tap
struct Modulation<'a> {
    tap: usize,
    values: &'a [f64],
}

/// Apply `filter` in place to `samples`
///
/// # Arguments
/// * `filter` - Taps and FIR/IIR mode
/// * `samples` - Selection to filter
/// * `progress` - Optional progress counter / cancel flag
///
/// A filter whose coefficients sum to zero in magnitude (including one with
/// no taps) leaves the samples untouched.
pub fn apply(filter: &Filter, samples: &mut [f64], progress: Option<&Progress>) -> Result<(), FilterError> {
    let mut coeffs = filter.coeffs().to_vec();
    run(filter, &mut coeffs, samples, None, progress)
}

/// Apply `filter` with tap `tap` modulated by `curve`
///
/// The tap's coefficient at selection index `i` is
/// `low/1000 + (high - low)/1000 * curve(i)`, with the curve resampled over
/// the selection and clamped to `[0,1]`. The normalization denominator is
/// taken once from the filter's initial coefficients and is not updated as
/// the tap moves. `filter` itself is not modified.
pub fn apply_moving(
    filter: &Filter,
    tap: usize,
    curve: &Curve,
    low: i32,
    high: i32,
    samples: &mut [f64],
    progress: Option<&Progress>,
) -> Result<(), FilterError> {
    if tap >= filter.taps() {
        return Err(FilterError::TapOutOfRange {
            tap,
            taps: filter.taps(),
        });
    }

    let values = modulation_values(curve, low, high, samples.len());
    let mut coeffs = filter.coeffs().to_vec();
    run(
        filter,
        &mut coeffs,
        samples,
        Some(Modulation {
            tap,
            values: &values,
        }),
        progress,
    )
}

/// Per-sample coefficients a moving filter applies to its tap
pub fn modulation_values(curve: &Curve, low: i32, high: i32, length: usize) -> Vec<f64> {
    let base = low as f64 / 1000.0;
    let range = (high as f64 - low as f64) / 1000.0;

    Interpolator::new(curve.kind())
        .limited_interpolation(curve, length)
        .into_iter()
        .map(|v| base + range * v)
        .collect()
}

fn run(
    filter: &Filter,
    coeffs: &mut [f64],
    samples: &mut [f64],
    modulation: Option<Modulation<'_>>,
    progress: Option<&Progress>,
) -> Result<(), FilterError> {
    let addup = filter.addup();
    if addup == 0.0 {
        if let Some(progress) = progress {
            progress.advance(samples.len());
        }
        return Ok(());
    }

    let delays = filter.delays();
    let len = samples.len();
    let split = filter.max_offset().min(len);
    let mut ticker = ChunkTicker::new(progress);

    let mut step = |i: usize, coeffs: &mut [f64], samples: &mut [f64], bounded: bool| -> bool {
        if let Some(m) = &modulation {
            coeffs[m.tap] = m.values[i];
        }
        let val = if bounded {
            tap_sum_bounded(delays, coeffs, samples, i)
        } else {
            tap_sum(delays, coeffs, samples, i)
        };
        samples[i] = val / addup;
        ticker.tick()
    };

    let completed = if filter.is_fir() {
        (split..len).rev().all(|i| step(i, coeffs, samples, false))
            && (0..split).rev().all(|i| step(i, coeffs, samples, true))
    } else {
        (0..split).all(|i| step(i, coeffs, samples, true))
            && (split..len).all(|i| step(i, coeffs, samples, false))
    };

    if !completed || !ticker.flush() {
        return Err(FilterError::Cancelled);
    }
    Ok(())
}

#[inline]
fn tap_sum(delays: &[usize], coeffs: &[f64], samples: &[f64], i: usize) -> f64 {
    delays
        .iter()
        .zip(coeffs)
        .map(|(&d, &c)| c * samples[i - d])
        .sum()
}

#[inline]
fn tap_sum_bounded(delays: &[usize], coeffs: &[f64], samples: &[f64], i: usize) -> f64 {
    delays
        .iter()
        .zip(coeffs)
        .filter(|(&d, _)| d <= i)
        .map(|(&d, &c)| c * samples[i - d])
        .sum()
}

impl Filter {
    /// Apply this filter in place, see [`apply`]
    pub fn apply(&self, samples: &mut [f64]) -> Result<(), FilterError> {
        apply(self, samples, None)
    }

    /// Apply with one tap modulated by `curve`, see [`apply_moving`]
    pub fn apply_moving(
        &self,
        tap: usize,
        curve: &Curve,
        low: i32,
        high: i32,
        samples: &mut [f64],
    ) -> Result<(), FilterError> {
        apply_moving(self, tap, curve, low, high, samples, None)
    }
}
