//! Control-point curves and their interpolation

pub mod interpolation;
mod newton;
pub mod points;

pub use interpolation::Interpolator;
pub use points::{Curve, CurveError, InterpolationType, Point};
