//! Precomputed factorization and twiddle tables for one transform length

use super::factor::factorize;
use super::fft::FftError;
use log::debug;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Immutable per-length transform plan
///
/// Holds the stage factors of `n` and, for each stage, the roots of unity
/// that stage multiplies its outputs by. Built once, then shared read-only
/// by any number of transforms (wrap it in an `Arc` to share across
/// threads). The ping-pong scratch buffer lives with the caller, see
/// [`super::fft::FftEngine`].
#[derive(Debug, Clone)]
pub struct Wavetable {
    n: usize,
    factors: Vec<usize>,
    twiddles: Vec<Vec<Complex64>>,
}

impl Wavetable {
    /// Build the wavetable for transforms of length `n`
    ///
    /// Stage `i` with factor `f` stores `(f - 1) * q` forward roots, where
    /// `q = n / (f_0 * ... * f_i)`. Entry `(j - 1) * q + (k - 1)` holds
    /// `exp(-2πi · j·k·p / n)` with `p` the product of the earlier factors.
    pub fn build(n: usize) -> Result<Self, FftError> {
        if n == 0 {
            return Err(FftError::InvalidLength(n));
        }

        let factors = factorize(n);
        let product: usize = factors.iter().product();
        if product != n {
            return Err(FftError::Factorization { n, product });
        }

        let mut twiddles = Vec::new();
        twiddles
            .try_reserve_exact(factors.len())
            .map_err(|_| FftError::Allocation(factors.len()))?;

        let d_theta = -2.0 * PI / n as f64;
        let mut product = 1;
        for &factor in &factors {
            let product_1 = product;
            product *= factor;
            let q = n / product;

            let size = (factor - 1) * q;
            let mut table = Vec::new();
            table
                .try_reserve_exact(size)
                .map_err(|_| FftError::Allocation(size))?;

            for j in 1..factor {
                let mut m = 0;
                for _ in 1..=q {
                    m = (m + j * product_1) % n;
                    table.push(Complex64::from_polar(1.0, d_theta * m as f64));
                }
            }
            twiddles.push(table);
        }

        debug!("built wavetable n={} factors={:?}", n, factors);

        Ok(Self {
            n,
            factors,
            twiddles,
        })
    }

    /// Transform length this table was built for
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Stage factors in the order the transform applies them
    pub fn factors(&self) -> &[usize] {
        &self.factors
    }

    /// Forward twiddle sub-table for `stage`
    pub fn twiddle(&self, stage: usize) -> &[Complex64] {
        &self.twiddles[stage]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_length_rejected() {
        assert!(matches!(Wavetable::build(0), Err(FftError::InvalidLength(0))));
    }

    #[test]
    fn test_twiddle_table_sizes() {
        let table = Wavetable::build(60).unwrap();
        assert_eq!(table.factors(), &[6, 5, 2]);

        // q = 10, 2, 1
        assert_eq!(table.twiddle(0).len(), 5 * 10);
        assert_eq!(table.twiddle(1).len(), 4 * 2);
        assert_eq!(table.twiddle(2).len(), 1);
    }

    #[test]
    fn test_twiddles_are_unit_roots() {
        let table = Wavetable::build(84).unwrap();
        for stage in 0..table.factors().len() {
            for w in table.twiddle(stage) {
                assert!((w.norm() - 1.0).abs() < 1e-12);
                // w^84 == 1
                let p = w.powu(84);
                assert!((p.re - 1.0).abs() < 1e-9 && p.im.abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_length_one() {
        let table = Wavetable::build(1).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.factors().is_empty());
    }
}
