//! Spectral transforms and analysis

pub mod analysis;
mod butterflies;
pub mod factor;
pub mod fft;
pub mod radix2;
pub mod wavetable;
pub mod windowing;

pub use analysis::{AnalyzerConfig, SpectrumAnalyzer};
pub use factor::{factorize, max_prime_factor, reduce_to_tolerable_length};
pub use fft::{Direction, FftEngine, FftError};
pub use radix2::{radix2_transform, Decimation};
pub use wavetable::Wavetable;
pub use windowing::{generate_window, WindowType};
