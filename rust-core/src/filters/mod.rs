//! Tap/delay filters: description, application and file persistence

pub mod apply;
pub mod file;
pub mod filter;

pub use apply::{apply, apply_moving, modulation_values};
pub use filter::{Filter, FilterError, DEFAULT_RATE, MAX_TAPS};
