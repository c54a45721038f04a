//! Tap/delay filter description
//!
//! A filter is a list of taps, each a (delay in samples, coefficient) pair,
//! plus a flag choosing non-recursive (FIR) or recursive (IIR) evaluation.

use thiserror::Error;

/// Sample rate recorded on filters that never had one set
pub const DEFAULT_RATE: u32 = 44100;

/// Largest tap count accepted from decoded parameters or filter files
pub const MAX_TAPS: usize = 1 << 24;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid filter parameters: {0}")]
    InvalidParams(String),

    #[error("Tap {tap} out of range for filter with {taps} taps")]
    TapOutOfRange { tap: usize, taps: usize },

    #[error("Malformed filter file at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Filter file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to allocate {taps} filter taps")]
    Allocation { taps: usize },

    #[error("Filter operation cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    delay: Vec<usize>,
    coeff: Vec<f64>,
    fir: bool,
    rate: u32,
}

impl Default for Filter {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Filter {
    /// Create a FIR filter with `taps` default taps
    ///
    /// Tap `i` gets delay `i` and coefficient 0, except tap 0 whose
    /// coefficient is 1, so the result passes the signal through unchanged.
    pub fn new(taps: usize) -> Self {
        let mut filter = Self {
            delay: Vec::new(),
            coeff: Vec::new(),
            fir: true,
            rate: DEFAULT_RATE,
        };
        filter.resize(taps);
        filter
    }

    /// [`Filter::new`] that reports allocation failure instead of aborting
    pub fn try_new(taps: usize) -> Result<Self, FilterError> {
        let mut filter = Self::new(0);
        filter.try_resize(taps)?;
        Ok(filter)
    }

    /// Build from explicit `(delay, coeff)` taps
    pub fn from_taps(fir: bool, taps: &[(usize, f64)]) -> Self {
        Self {
            delay: taps.iter().map(|&(d, _)| d).collect(),
            coeff: taps.iter().map(|&(_, c)| c).collect(),
            fir,
            rate: DEFAULT_RATE,
        }
    }

    /// Build from decoded command parameters
    ///
    /// Layout: `rate, fir_flag, tap_count, delay0, coeff0, delay1, coeff1, ...`
    /// where a non-zero `fir_flag` selects FIR.
    pub fn from_params(params: &[f64]) -> Result<Self, FilterError> {
        let [rate, fir, taps, pairs @ ..] = params else {
            return Err(FilterError::InvalidParams(format!(
                "expected rate, fir flag and tap count, got {} values",
                params.len()
            )));
        };

        let taps = non_negative_int(*taps, "tap count")?;
        if taps > MAX_TAPS {
            return Err(FilterError::InvalidParams(format!(
                "tap count {} exceeds the limit of {}",
                taps, MAX_TAPS
            )));
        }
        if pairs.len() / 2 < taps {
            return Err(FilterError::InvalidParams(format!(
                "{} taps need {} delay/coeff values, got {}",
                taps,
                taps * 2,
                pairs.len()
            )));
        }

        let mut filter = Self::try_new(taps)?;
        filter.fir = *fir != 0.0;
        filter.rate = non_negative_int(*rate, "rate")? as u32;
        for (i, pair) in pairs.chunks_exact(2).take(taps).enumerate() {
            let delay = non_negative_int(pair[0], "delay")?;
            filter.set_tap(i, delay, pair[1])?;
        }
        Ok(filter)
    }

    /// Grow or shrink to `taps` taps; new taps are default-initialized
    pub fn resize(&mut self, taps: usize) {
        let old = self.delay.len();
        self.delay.resize_with(taps, Default::default);
        self.coeff.resize(taps, 0.0);
        for i in old..taps {
            self.delay[i] = i;
        }
        if old == 0 && taps > 0 {
            self.coeff[0] = 1.0;
        }
    }

    /// [`Filter::resize`] with fallible allocation
    pub fn try_resize(&mut self, taps: usize) -> Result<(), FilterError> {
        let extra = taps.saturating_sub(self.delay.len());
        self.delay
            .try_reserve_exact(extra)
            .map_err(|_| FilterError::Allocation { taps })?;
        self.coeff
            .try_reserve_exact(extra)
            .map_err(|_| FilterError::Allocation { taps })?;
        self.resize(taps);
        Ok(())
    }

    pub fn set_tap(&mut self, index: usize, delay: usize, coeff: f64) -> Result<(), FilterError> {
        if index >= self.taps() {
            return Err(FilterError::TapOutOfRange {
                tap: index,
                taps: self.taps(),
            });
        }
        self.delay[index] = delay;
        self.coeff[index] = coeff;
        Ok(())
    }

    pub fn taps(&self) -> usize {
        self.delay.len()
    }

    pub fn delays(&self) -> &[usize] {
        &self.delay
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeff
    }

    pub fn is_fir(&self) -> bool {
        self.fir
    }

    pub fn set_fir(&mut self, fir: bool) {
        self.fir = fir;
    }

    pub fn rate(&self) -> u32 {
        self.rate
    }

    pub fn set_rate(&mut self, rate: u32) {
        self.rate = rate;
    }

    /// Normalization denominator: sum of absolute coefficients
    pub fn addup(&self) -> f64 {
        self.coeff.iter().map(|c| c.abs()).sum()
    }

    /// Largest tap delay (0 for an empty filter)
    pub fn max_offset(&self) -> usize {
        self.delay.iter().copied().max().unwrap_or(0)
    }
}

fn non_negative_int(value: f64, what: &str) -> Result<usize, FilterError> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(FilterError::InvalidParams(format!(
            "{} must be a non-negative integer, got {}",
            what, value
        )));
    }
    Ok(value as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_taps() {
        let filter = Filter::new(4);
        assert_eq!(filter.delays(), &[0, 1, 2, 3]);
        assert_eq!(filter.coeffs(), &[1.0, 0.0, 0.0, 0.0]);
        assert!(filter.is_fir());
        assert_eq!(filter.addup(), 1.0);
        assert_eq!(filter.max_offset(), 3);
    }

    #[test]
    fn test_resize_keeps_existing_taps() {
        let mut filter = Filter::new(2);
        filter.set_tap(1, 5, -0.5).unwrap();
        filter.resize(3);
        assert_eq!(filter.delays(), &[0, 5, 2]);
        assert_eq!(filter.coeffs(), &[1.0, -0.5, 0.0]);

        filter.resize(1);
        assert_eq!(filter.taps(), 1);

        let mut empty = Filter::new(0);
        assert_eq!(empty.max_offset(), 0);
        assert_eq!(empty.addup(), 0.0);
        empty.resize(2);
        assert_eq!(empty.coeffs(), &[1.0, 0.0]);
    }

    #[test]
    fn test_set_tap_out_of_range() {
        let mut filter = Filter::new(2);
        assert!(matches!(
            filter.set_tap(2, 0, 1.0),
            Err(FilterError::TapOutOfRange { tap: 2, taps: 2 })
        ));
    }

    #[test]
    fn test_from_params() {
        let filter = Filter::from_params(&[48000.0, 0.0, 2.0, 0.0, 0.5, 1.0, 0.5]).unwrap();
        assert!(!filter.is_fir());
        assert_eq!(filter.rate(), 48000);
        assert_eq!(filter.delays(), &[0, 1]);
        assert_eq!(filter.coeffs(), &[0.5, 0.5]);
    }

    #[test]
    fn test_from_params_rejects_bad_input() {
        assert!(Filter::from_params(&[44100.0, 1.0]).is_err());
        assert!(Filter::from_params(&[44100.0, 1.0, 2.0, 0.0, 1.0]).is_err());
        assert!(Filter::from_params(&[44100.0, 1.0, 1.5, 0.0, 1.0]).is_err());
        assert!(Filter::from_params(&[44100.0, 1.0, 1.0, -2.0, 1.0]).is_err());
    }

    #[test]
    fn test_from_params_huge_tap_count() {
        assert!(matches!(
            Filter::from_params(&[44100.0, 1.0, 1e19, 0.0, 1.0]),
            Err(FilterError::InvalidParams(_))
        ));
        let over = (MAX_TAPS + 1) as f64;
        assert!(matches!(
            Filter::from_params(&[44100.0, 1.0, over, 0.0, 1.0]),
            Err(FilterError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_try_new_reports_allocation_failure() {
        assert!(matches!(
            Filter::try_new(usize::MAX),
            Err(FilterError::Allocation { taps: usize::MAX })
        ));
        assert_eq!(Filter::try_new(3).unwrap(), Filter::new(3));
    }
}
