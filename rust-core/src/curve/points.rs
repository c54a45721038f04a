//! Control-point curves
//!
//! An ordered set of points in normalized `[0,1] × [0,1]` space plus the
//! interpolation mode used to turn them into a dense curve.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    #[error("Unknown interpolation type '{0}'")]
    UnknownType(String),

    #[error("Curve parameters must be x,y pairs (got {0} values)")]
    OddParameterCount(usize),

    #[error("Invalid curve value '{0}'")]
    InvalidValue(String),

    #[error("Point index {index} out of range for curve with {len} points")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Interpolator used before prepare()")]
    NotPrepared,
}

/// Interpolation strategy of a curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterpolationType {
    #[default]
    Linear,
    /// Natural cubic spline
    Spline,
    /// Local polynomial through 3 points
    Poly3,
    /// Local polynomial through 5 points
    Poly5,
    /// Local polynomial through 7 points
    Poly7,
    /// One global polynomial through every point
    PolyN,
    SampleAndHold,
}

impl InterpolationType {
    pub const ALL: [InterpolationType; 7] = [
        InterpolationType::Linear,
        InterpolationType::Spline,
        InterpolationType::Poly3,
        InterpolationType::Poly5,
        InterpolationType::Poly7,
        InterpolationType::PolyN,
        InterpolationType::SampleAndHold,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InterpolationType::Linear => "LINEAR",
            InterpolationType::Spline => "SPLINE",
            InterpolationType::Poly3 => "POLY3",
            InterpolationType::Poly5 => "POLY5",
            InterpolationType::Poly7 => "POLY7",
            InterpolationType::PolyN => "POLY_N",
            InterpolationType::SampleAndHold => "SAMPLE_AND_HOLD",
        }
    }

    /// Number of points a local polynomial mode spans
    pub fn local_points(&self) -> Option<usize> {
        match self {
            InterpolationType::Poly3 => Some(3),
            InterpolationType::Poly5 => Some(5),
            InterpolationType::Poly7 => Some(7),
            _ => None,
        }
    }
}

impl fmt::Display for InterpolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InterpolationType {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == upper)
            .ok_or_else(|| CurveError::UnknownType(s.to_string()))
    }
}

/// One control point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Sparse control points plus an interpolation mode
///
/// Points stay sorted by `x` (non-decreasing) under every operation except
/// [`Curve::append_point`], which skips the ordering for bulk loading.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Curve {
    points: Vec<Point>,
    kind: InterpolationType,
}

impl Curve {
    /// Create an empty curve
    pub fn new(kind: InterpolationType) -> Self {
        Self {
            points: Vec::new(),
            kind,
        }
    }

    /// Create a curve from points in any order
    pub fn with_points(kind: InterpolationType, points: impl IntoIterator<Item = Point>) -> Self {
        let mut points: Vec<Point> = points.into_iter().collect();
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self { points, kind }
    }

    /// Build a curve from decoded command parameters
    ///
    /// # Arguments
    /// * `type_name` - Interpolation type name, e.g. `"SPLINE"`
    /// * `params` - Flat `x0, y0, x1, y1, ...` list
    pub fn from_params(type_name: &str, params: &[f64]) -> Result<Self, CurveError> {
        let kind = type_name.parse()?;
        if params.len() % 2 != 0 {
            return Err(CurveError::OddParameterCount(params.len()));
        }

        let points = params.chunks_exact(2).map(|pair| Point::new(pair[0], pair[1]));
        Ok(Self::with_points(kind, points))
    }

    pub fn kind(&self) -> InterpolationType {
        self.kind
    }

    pub fn set_kind(&mut self, kind: InterpolationType) {
        self.kind = kind;
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the points are in non-decreasing `x` order
    pub fn is_sorted(&self) -> bool {
        self.points.windows(2).all(|w| w[0].x <= w[1].x)
    }

    /// Insert a point at its sorted position, after any points with equal `x`
    ///
    /// # Returns
    /// Index of the new point
    pub fn insert_point(&mut self, x: f64, y: f64) -> usize {
        let index = self.points.partition_point(|p| p.x <= x);
        self.points.insert(index, Point::new(x, y));
        index
    }

    /// Append without sorting
    ///
    /// Only for loaders that already produce ascending `x`; anything else
    /// breaks the ordering interpolation relies on.
    pub fn append_point(&mut self, x: f64, y: f64) {
        self.points.push(Point::new(x, y));
    }

    pub fn remove_point(&mut self, index: usize) -> Result<Point, CurveError> {
        self.check_index(index)?;
        Ok(self.points.remove(index))
    }

    /// Move a point, re-sorting it into place
    ///
    /// # Returns
    /// New index of the moved point
    pub fn move_point(&mut self, index: usize, x: f64, y: f64) -> Result<usize, CurveError> {
        self.remove_point(index)?;
        Ok(self.insert_point(x, y))
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Mirror in time: `x -> 1 - x`
    pub fn flip_horizontal(&mut self) {
        self.points.reverse();
        for p in self.points.iter_mut() {
            p.x = 1.0 - p.x;
        }
    }

    /// Mirror in value: `y -> 1 - y`
    pub fn flip_vertical(&mut self) {
        for p in self.points.iter_mut() {
            p.y = 1.0 - p.y;
        }
    }

    /// Map `x` from `[0,1]` onto `[low, high]`
    pub fn rescale_x(&mut self, low: f64, high: f64) {
        for p in self.points.iter_mut() {
            p.x = low + p.x * (high - low);
        }
        if high < low {
            self.points.reverse();
        }
    }

    /// Map `y` from `[0,1]` onto `[low, high]`
    pub fn rescale_y(&mut self, low: f64, high: f64) {
        for p in self.points.iter_mut() {
            p.y = low + p.y * (high - low);
        }
    }

    /// Index of the point closest to `(x, y)`
    pub fn nearest_point(&self, x: f64, y: f64) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, (p.x - x).powi(2) + (p.y - y).powi(2)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
    }

    fn check_index(&self, index: usize) -> Result<(), CurveError> {
        if index >= self.points.len() {
            return Err(CurveError::IndexOutOfRange {
                index,
                len: self.points.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Curve {
    /// `TYPE x0 y0 x1 y1 ...`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for p in &self.points {
            write!(f, " {} {}", p.x, p.y)?;
        }
        Ok(())
    }
}

impl FromStr for Curve {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let type_name = tokens
            .next()
            .ok_or_else(|| CurveError::UnknownType(String::new()))?;

        let params = tokens
            .map(|t| t.parse::<f64>().map_err(|_| CurveError::InvalidValue(t.to_string())))
            .collect::<Result<Vec<f64>, _>>()?;

        Self::from_params(type_name, &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xs(curve: &Curve) -> Vec<f64> {
        curve.points().iter().map(|p| p.x).collect()
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut curve = Curve::new(InterpolationType::Linear);
        assert_eq!(curve.insert_point(0.5, 0.2), 0);
        assert_eq!(curve.insert_point(0.1, 0.9), 0);
        assert_eq!(curve.insert_point(0.9, 0.4), 2);
        assert_eq!(curve.insert_point(0.5, 0.7), 2);

        assert_eq!(xs(&curve), vec![0.1, 0.5, 0.5, 0.9]);
        assert_eq!(curve.points()[2].y, 0.7);
        assert!(curve.is_sorted());
    }

    #[test]
    fn test_append_is_unsorted() {
        let mut curve = Curve::new(InterpolationType::Linear);
        curve.append_point(0.8, 0.0);
        curve.append_point(0.2, 1.0);
        assert!(!curve.is_sorted());
    }

    #[test]
    fn test_remove_and_move() {
        let mut curve = Curve::from_params("LINEAR", &[0.0, 0.0, 0.5, 0.5, 1.0, 1.0]).unwrap();

        assert_eq!(curve.move_point(0, 0.75, 0.3), Ok(1));
        assert_eq!(xs(&curve), vec![0.5, 0.75, 1.0]);

        assert_eq!(curve.remove_point(2), Ok(Point::new(1.0, 1.0)));
        assert_eq!(
            curve.remove_point(5),
            Err(CurveError::IndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn test_flips() {
        let mut curve = Curve::from_params("SPLINE", &[0.0, 0.1, 0.25, 0.6, 1.0, 1.0]).unwrap();

        curve.flip_horizontal();
        assert_eq!(xs(&curve), vec![0.0, 0.75, 1.0]);
        assert_eq!(curve.points()[0].y, 1.0);
        assert!(curve.is_sorted());

        curve.flip_vertical();
        assert!((curve.points()[1].y - 0.4).abs() < 1e-12);
        assert_eq!(curve.points()[0].y, 0.0);
    }

    #[test]
    fn test_rescale() {
        let mut curve = Curve::from_params("LINEAR", &[0.0, 0.0, 1.0, 1.0]).unwrap();
        curve.rescale_y(0.25, 0.75);
        assert_eq!(curve.points()[0].y, 0.25);
        assert_eq!(curve.points()[1].y, 0.75);

        curve.rescale_x(1.0, 0.0);
        assert!(curve.is_sorted());
        assert_eq!(curve.points()[0].y, 0.75);
    }

    #[test]
    fn test_nearest_point() {
        let curve = Curve::from_params("LINEAR", &[0.0, 0.0, 0.5, 1.0, 1.0, 0.0]).unwrap();
        assert_eq!(curve.nearest_point(0.45, 0.8), Some(1));
        assert_eq!(Curve::default().nearest_point(0.5, 0.5), None);
    }

    #[test]
    fn test_params_and_text() {
        let curve = Curve::from_params("poly_n", &[1.0, 0.0, 0.0, 1.0]).unwrap();
        assert_eq!(curve.kind(), InterpolationType::PolyN);
        assert_eq!(xs(&curve), vec![0.0, 1.0]);

        let text = curve.to_string();
        assert_eq!(text, "POLY_N 0 1 1 0");
        assert_eq!(text.parse::<Curve>(), Ok(curve));

        assert_eq!(
            Curve::from_params("LINEAR", &[0.0, 1.0, 0.5]),
            Err(CurveError::OddParameterCount(3))
        );
        assert!(matches!(
            "CUBIC 0 0".parse::<Curve>(),
            Err(CurveError::UnknownType(_))
        ));
        assert!(matches!(
            "LINEAR 0 zero".parse::<Curve>(),
            Err(CurveError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_type_names_round_trip() {
        for kind in InterpolationType::ALL {
            assert_eq!(kind.name().parse::<InterpolationType>(), Ok(kind));
        }
        assert_eq!(InterpolationType::Poly5.local_points(), Some(5));
        assert_eq!(InterpolationType::Spline.local_points(), None);
    }
}
