//! Window functions for spectral analysis
//!
//! Applied to time-domain blocks before the FFT to reduce spectral leakage

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    #[default]
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    Blackman,

    /// Rectangular window (no windowing)
    Rectangular,
}

impl WindowType {
    pub fn name(&self) -> &'static str {
        match self {
            WindowType::Hann => "hann",
            WindowType::Hamming => "hamming",
            WindowType::Blackman => "blackman",
            WindowType::Rectangular => "rectangular",
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hann" | "hanning" => Ok(WindowType::Hann),
            "hamming" => Ok(WindowType::Hamming),
            "blackman" => Ok(WindowType::Blackman),
            "rectangular" | "rect" | "none" => Ok(WindowType::Rectangular),
            other => Err(format!("unknown window type '{}'", other)),
        }
    }
}

/// Generate window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    if length <= 1 {
        return vec![1.0; length];
    }

    let m = length as f64;
    let phase = |n: usize, k: f64| (k * PI * n as f64 / (m - 1.0)).cos();

    match window_type {
        WindowType::Hann => (0..length).map(|n| 0.5 - 0.5 * phase(n, 2.0)).collect(),
        WindowType::Hamming => (0..length).map(|n| 0.54 - 0.46 * phase(n, 2.0)).collect(),
        WindowType::Blackman => (0..length)
            .map(|n| 0.42 - 0.5 * phase(n, 2.0) + 0.08 * phase(n, 4.0))
            .collect(),
        WindowType::Rectangular => vec![1.0; length],
    }
}

/// Apply window to signal
pub fn apply_window(signal: &[f64], window: &[f64]) -> Vec<f64> {
    signal.iter().zip(window).map(|(&s, &w)| s * w).collect()
}

/// Amplitude correction factor (multiply FFT magnitude by this)
///
/// Windowing reduces the measured amplitude by the window's mean value.
pub fn window_correction_factor(window: &[f64]) -> f64 {
    let sum: f64 = window.iter().sum();
    if sum.abs() < f64::EPSILON {
        1.0
    } else {
        window.len() as f64 / sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_generation() {
        let length = 161;

        for window_type in [WindowType::Hann, WindowType::Hamming, WindowType::Blackman] {
            let window = generate_window(window_type, length);
            assert_eq!(window.len(), length);

            // Symmetric, peaking at 1.0 in the centre
            assert!((window[0] - window[length - 1]).abs() < 1e-10);
            assert!((window[length / 2] - 1.0).abs() < 1e-10);
        }

        let hamming = generate_window(WindowType::Hamming, length);
        assert!(hamming[0] > 0.07 && hamming[0] < 0.09);
    }

    #[test]
    fn test_rectangular_window() {
        let window = generate_window(WindowType::Rectangular, 100);
        assert_eq!(window.len(), 100);
        assert!(window.iter().all(|&w| w == 1.0));
        assert!((window_correction_factor(&window) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(generate_window(WindowType::Hann, 0).is_empty());
        assert_eq!(generate_window(WindowType::Blackman, 1), vec![1.0]);
    }

    #[test]
    fn test_correction_factor() {
        let hann = generate_window(WindowType::Hann, 1000);
        let factor = window_correction_factor(&hann);
        // Hann has mean ~0.5
        assert!(factor > 1.9 && factor < 2.1);
    }

    #[test]
    fn test_window_names() {
        assert_eq!("Hamming".parse::<WindowType>(), Ok(WindowType::Hamming));
        assert_eq!("hanning".parse::<WindowType>(), Ok(WindowType::Hann));
        assert!("kaiser".parse::<WindowType>().is_err());
        assert_eq!(WindowType::Blackman.to_string(), "blackman");
    }
}
