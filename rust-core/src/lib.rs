//! Spectral Edit - numeric core of an audio editor
//!
//! Mixed-radix FFT and spectrum analysis, curve interpolation, and tap
//! filters (static and curve-modulated) run as cancellable batch operations.
//! Optional Python bindings behind the `python` feature.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod curve;
pub mod filters;
pub mod ops;
pub mod spectrum;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use curve::{Curve, InterpolationType, Interpolator};
pub use filters::Filter;
pub use ops::{Operation, Worker};
pub use spectrum::{FftEngine, SpectrumAnalyzer};
