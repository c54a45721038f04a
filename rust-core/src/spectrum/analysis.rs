//! High-level spectrum analyzer
//!
//! Windowed magnitude spectra, averaged spectra and spectrograms of a
//! sample selection, built on the mixed-radix engine.

use super::factor::{reduce_to_tolerable_length, DEFAULT_MAX_PRIME_FACTOR};
use super::fft::{magnitude_to_db, FftEngine, FftError};
use super::windowing::{apply_window, generate_window, window_correction_factor, WindowType};
use ndarray::Array2;

/// Spectrum analyzer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Requested window length in samples (any length)
    pub window_len: usize,

    /// Window type for spectral analysis
    pub window_type: WindowType,

    /// Distance between consecutive frames; 0 means half the window
    pub hop: usize,

    /// Largest prime factor tolerated in the transform length
    pub max_prime_factor: usize,

    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Apply amplitude correction for windowing
    pub apply_correction: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            window_len: 2048,
            window_type: WindowType::Hann,
            hop: 0,
            max_prime_factor: DEFAULT_MAX_PRIME_FACTOR,
            sample_rate: 44100.0,
            apply_correction: true,
        }
    }
}

/// Spectrum analyzer over finite sample buffers
#[derive(Debug, Clone)]
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    fft_engine: FftEngine,
    window: Vec<f64>,
    correction_factor: f64,
}

impl SpectrumAnalyzer {
    /// Create new spectrum analyzer
    ///
    /// The transform length is `config.window_len` shortened until its
    /// largest prime factor is within `config.max_prime_factor`.
    pub fn new(config: AnalyzerConfig) -> Result<Self, FftError> {
        let len = reduce_to_tolerable_length(config.window_len, config.max_prime_factor);
        let fft_engine = FftEngine::new(len)?;
        let window = generate_window(config.window_type, len);
        let correction_factor = if config.apply_correction {
            window_correction_factor(&window)
        } else {
            1.0
        };

        Ok(Self {
            config,
            fft_engine,
            window,
            correction_factor,
        })
    }

    /// Analyze one block and return its magnitude spectrum
    ///
    /// # Arguments
    /// * `signal` - Input block (truncated or zero-padded to the window length)
    ///
    /// # Returns
    /// Magnitude spectrum |X[k]| for positive frequencies
    pub fn analyze(&mut self, signal: &[f64]) -> Result<Vec<f64>, FftError> {
        let windowed = apply_window(signal, &self.window);
        let mut spectrum = self.fft_engine.compute_magnitude(&windowed)?;

        if self.config.apply_correction {
            for s in spectrum.iter_mut() {
                *s *= self.correction_factor;
            }
        }

        Ok(spectrum)
    }

    /// Analyze and return magnitude in dB
    pub fn analyze_db(&mut self, signal: &[f64], reference: f64) -> Result<Vec<f64>, FftError> {
        Ok(self
            .analyze(signal)?
            .iter()
            .map(|&mag| magnitude_to_db(mag, reference))
            .collect())
    }

    /// Mean magnitude spectrum over all frames of `signal`
    ///
    /// A signal shorter than one window is analyzed as a single
    /// zero-padded frame.
    pub fn averaged_spectrum(&mut self, signal: &[f64]) -> Result<Vec<f64>, FftError> {
        let mut sum = vec![0.0; self.num_bins()];
        let starts = self.frame_starts(signal.len());
        if starts.is_empty() {
            return Ok(sum);
        }

        for &start in &starts {
            let frame = self.analyze(&signal[start..])?;
            for (acc, mag) in sum.iter_mut().zip(frame) {
                *acc += mag;
            }
        }

        let count = starts.len() as f64;
        for acc in sum.iter_mut() {
            *acc /= count;
        }
        Ok(sum)
    }

    /// Magnitude spectrogram, one row per frame and one column per bin
    pub fn spectrogram(&mut self, signal: &[f64]) -> Result<Array2<f64>, FftError> {
        let starts = self.frame_starts(signal.len());
        let mut frames = Array2::zeros((starts.len(), self.num_bins()));

        for (row, &start) in starts.iter().enumerate() {
            let frame = self.analyze(&signal[start..])?;
            for (cell, mag) in frames.row_mut(row).iter_mut().zip(frame) {
                *cell = mag;
            }
        }
        Ok(frames)
    }

    fn frame_starts(&self, signal_len: usize) -> Vec<usize> {
        let len = self.window_len();
        if signal_len == 0 {
            return Vec::new();
        }
        if signal_len <= len {
            return vec![0];
        }
        (0..=signal_len - len).step_by(self.hop()).collect()
    }

    /// Get frequency bins in Hz
    pub fn frequency_bins_hz(&self) -> Vec<f64> {
        (0..self.num_bins())
            .map(|bin| self.fft_engine.bin_to_hz(bin, self.config.sample_rate))
            .collect()
    }

    /// Update configuration, rebuilding the transform when its length changes
    pub fn update_config(&mut self, config: AnalyzerConfig) -> Result<(), FftError> {
        *self = Self::new(config)?;
        Ok(())
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Actual transform length after cost-adaptive reduction
    pub fn window_len(&self) -> usize {
        self.fft_engine.fft_size()
    }

    /// Frame advance in samples
    pub fn hop(&self) -> usize {
        if self.config.hop == 0 {
            (self.window_len() / 2).max(1)
        } else {
            self.config.hop
        }
    }

    /// Get number of frequency bins
    pub fn num_bins(&self) -> usize {
        self.fft_engine.num_bins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq_hz: f64, sample_rate: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|n| (2.0 * PI * freq_hz * n as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_analyzer_basic() {
        let config = AnalyzerConfig {
            window_len: 1024,
            window_type: WindowType::Hamming,
            sample_rate: 48000.0,
            ..AnalyzerConfig::default()
        };
        let mut analyzer = SpectrumAnalyzer::new(config).unwrap();

        let freq_hz = 1000.0;
        let spectrum = analyzer.analyze(&sine(freq_hz, 48000.0, 1024)).unwrap();
        assert_eq!(spectrum.len(), 513);

        let freqs = analyzer.frequency_bins_hz();
        let (peak_idx, _) = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();
        assert!((freqs[peak_idx] - freq_hz).abs() < 100.0);
    }

    #[test]
    fn test_window_length_reduced() {
        // 1031 is prime; 1030 = 2 * 5 * 103
        let config = AnalyzerConfig {
            window_len: 1031,
            max_prime_factor: 512,
            ..AnalyzerConfig::default()
        };
        let analyzer = SpectrumAnalyzer::new(config).unwrap();
        assert_eq!(analyzer.window_len(), 1030);
        assert_eq!(analyzer.num_bins(), 516);
    }

    #[test]
    fn test_averaged_spectrum() {
        let config = AnalyzerConfig {
            window_len: 512,
            sample_rate: 8000.0,
            ..AnalyzerConfig::default()
        };
        let mut analyzer = SpectrumAnalyzer::new(config).unwrap();

        // 500 Hz at 8 kHz lands on bin 32 of a 512 window
        let signal = sine(500.0, 8000.0, 4096);
        let averaged = analyzer.averaged_spectrum(&signal).unwrap();
        let single = analyzer.analyze(&signal).unwrap();

        assert_eq!(averaged.len(), 257);
        assert!((averaged[32] - single[32]).abs() / single[32] < 0.05);
        assert!(averaged[100] < averaged[32] * 1e-3);
    }

    #[test]
    fn test_spectrogram_shape() {
        let config = AnalyzerConfig {
            window_len: 256,
            hop: 128,
            ..AnalyzerConfig::default()
        };
        let mut analyzer = SpectrumAnalyzer::new(config).unwrap();

        let frames = analyzer.spectrogram(&vec![0.5; 1024]).unwrap();
        // starts 0, 128, ..., 768
        assert_eq!(frames.dim(), (7, 129));
        // constant signal: energy concentrated in DC
        assert!(frames[[3, 0]] > 100.0);
        assert!(frames[[3, 10]] < frames[[3, 0]] * 1e-2);

        let empty = analyzer.spectrogram(&[]).unwrap();
        assert_eq!(empty.dim(), (0, 129));
    }

    #[test]
    fn test_analyzer_db() {
        let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let spectrum_db = analyzer.analyze_db(&vec![1.0; 2048], 1.0).unwrap();
        assert!(spectrum_db[0] > 50.0);
    }
}
