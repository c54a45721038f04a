//! Curve interpolation engine
//!
//! Turns a sparse [`Curve`] into dense values, either a whole resampled
//! array at once or single-point queries against a prepared curve.
//!
//! Every mode holds the first point's `y` before the first knot and the last
//! point's `y` after the last knot; between knots the mode decides.

use super::newton::{divided_differences, newton_eval, spline_segment, spline_second_derivatives};
use super::points::{Curve, CurveError, InterpolationType};

/// Spacing of the synthetic knots local polynomials use past either end
const SYNTHETIC_KNOT_STEP: f64 = 0.5;

/// Points plus mode-specific precomputation
#[derive(Debug, Clone, Default)]
struct Prepared {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Spline second derivatives, or global Newton coefficients for POLY_N
    aux: Vec<f64>,
}

impl Prepared {
    fn new(kind: InterpolationType, curve: &Curve) -> Self {
        let xs: Vec<f64> = curve.points().iter().map(|p| p.x).collect();
        let ys: Vec<f64> = curve.points().iter().map(|p| p.y).collect();

        let aux = match kind {
            InterpolationType::Spline => spline_second_derivatives(&xs, &ys),
            InterpolationType::PolyN => divided_differences(&xs, &ys),
            _ => Vec::new(),
        };

        Self { xs, ys, aux }
    }

    fn len(&self) -> usize {
        self.xs.len()
    }

    /// Segment starting at the last knot with `x_k <= x`, for `x` strictly
    /// inside the knot range
    fn segment_of(&self, x: f64) -> usize {
        let after = self.xs.partition_point(|&xk| xk <= x);
        after.saturating_sub(1).min(self.len() - 2)
    }

    /// Knot `index` of the local window, synthesizing knots past either end
    fn local_knot(&self, index: isize) -> (f64, f64) {
        let n = self.len() as isize;
        if index < 0 {
            (self.xs[0] + SYNTHETIC_KNOT_STEP * index as f64, self.ys[0])
        } else if index >= n {
            let beyond = (index - n + 1) as f64;
            (
                self.xs[self.len() - 1] + SYNTHETIC_KNOT_STEP * beyond,
                self.ys[self.len() - 1],
            )
        } else {
            (self.xs[index as usize], self.ys[index as usize])
        }
    }

    /// Local Newton polynomial of `points` knots around segment `seg`
    fn local_polynomial(&self, seg: usize, points: usize) -> (Vec<f64>, Vec<f64>) {
        let half = ((points - 1) / 2) as isize;
        let (xs, ys): (Vec<f64>, Vec<f64>) = (seg as isize - half..=seg as isize + half)
            .map(|i| self.local_knot(i))
            .unzip();
        let coefs = divided_differences(&xs, &ys);
        (xs, coefs)
    }

    /// Value inside segment `seg` under `kind`
    fn eval_segment(&self, kind: InterpolationType, seg: usize, x: f64) -> f64 {
        let (x0, y0) = (self.xs[seg], self.ys[seg]);
        let (x1, y1) = (self.xs[seg + 1], self.ys[seg + 1]);

        match kind {
            InterpolationType::Linear => {
                if x1 > x0 {
                    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
                } else {
                    y0
                }
            }
            InterpolationType::SampleAndHold => y0,
            InterpolationType::Spline => {
                spline_segment(x0, y0, self.aux[seg], x1, y1, self.aux[seg + 1], x)
            }
            InterpolationType::PolyN => newton_eval(&self.xs, &self.aux, x),
            InterpolationType::Poly3 | InterpolationType::Poly5 | InterpolationType::Poly7 => {
                let points = kind.local_points().unwrap_or(3);
                let (xs, coefs) = self.local_polynomial(seg, points);
                newton_eval(&xs, &coefs, x)
            }
        }
    }

    fn eval(&self, kind: InterpolationType, x: f64) -> f64 {
        let n = self.len();
        if n == 0 {
            return 0.0;
        }
        if n == 1 || x < self.xs[0] {
            return self.ys[0];
        }
        if x >= self.xs[n - 1] {
            return self.ys[n - 1];
        }
        self.eval_segment(kind, self.segment_of(x), x)
    }

    /// Dense fill: output index `i` stands for `x = i / length`
    fn fill(&self, kind: InterpolationType, length: usize) -> Vec<f64> {
        let mut output = vec![0.0; length];
        let n = self.len();
        if n == 0 || length == 0 {
            return output;
        }

        let scale = length as f64;
        let index_of = |x: f64| ((x * scale).ceil().max(0.0) as usize).min(length);

        let first = index_of(self.xs[0]);
        output[..first].fill(self.ys[0]);

        for seg in 0..n - 1 {
            let start = index_of(self.xs[seg]);
            let end = index_of(self.xs[seg + 1]);
            if start >= end {
                continue;
            }

            match kind {
                InterpolationType::Poly3 | InterpolationType::Poly5 | InterpolationType::Poly7 => {
                    // One local polynomial per segment
                    let points = kind.local_points().unwrap_or(3);
                    let (xs, coefs) = self.local_polynomial(seg, points);
                    for (i, out) in output[start..end].iter_mut().enumerate() {
                        *out = newton_eval(&xs, &coefs, (start + i) as f64 / scale);
                    }
                }
                _ => {
                    for (i, out) in output[start..end].iter_mut().enumerate() {
                        *out = self.eval_segment(kind, seg, (start + i) as f64 / scale);
                    }
                }
            }
        }

        let last = index_of(self.xs[n - 1]);
        output[last..].fill(self.ys[n - 1]);
        output
    }
}

/// Interpolation engine bound to one mode
///
/// Bulk calls ([`Interpolator::interpolation`]) are self-contained.
/// Single-point queries need [`Interpolator::prepare`] first; prepare takes
/// a snapshot, so edits to the curve afterwards are not seen until the next
/// prepare.
#[derive(Debug, Clone)]
pub struct Interpolator {
    kind: InterpolationType,
    prepared: Option<Prepared>,
}

impl Interpolator {
    pub fn new(kind: InterpolationType) -> Self {
        Self {
            kind,
            prepared: None,
        }
    }

    /// Interpolator using the curve's own mode, already prepared
    pub fn for_curve(curve: &Curve) -> Self {
        let mut interpolator = Self::new(curve.kind());
        interpolator.prepare(curve);
        interpolator
    }

    pub fn kind(&self) -> InterpolationType {
        self.kind
    }

    /// Precompute everything single-point queries need for `curve`
    pub fn prepare(&mut self, curve: &Curve) {
        self.prepared = Some(Prepared::new(self.kind, curve));
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    /// Value of the prepared curve at `x` (clamped to `[0,1]`)
    ///
    /// Empty curves evaluate to 0.0.
    pub fn single_interpolation(&self, x: f64) -> Result<f64, CurveError> {
        let prepared = self.prepared.as_ref().ok_or(CurveError::NotPrepared)?;
        Ok(prepared.eval(self.kind, x.clamp(0.0, 1.0)))
    }

    /// Resample `curve` into `length` values
    ///
    /// Index `i` holds the curve at `x = i / length`. Does not touch the
    /// prepared state.
    pub fn interpolation(&self, curve: &Curve, length: usize) -> Vec<f64> {
        Prepared::new(self.kind, curve).fill(self.kind, length)
    }

    /// [`Interpolator::interpolation`] clamped to `[0,1]`
    ///
    /// Spline and polynomial modes can overshoot between knots.
    pub fn limited_interpolation(&self, curve: &Curve, length: usize) -> Vec<f64> {
        let mut values = self.interpolation(curve, length);
        for v in values.iter_mut() {
            *v = v.clamp(0.0, 1.0);
        }
        values
    }
}

impl Curve {
    /// Resample with the curve's own interpolation mode
    pub fn interpolate(&self, length: usize) -> Vec<f64> {
        Interpolator::new(self.kind()).interpolation(self, length)
    }

    /// Resample with the curve's own mode, clamped to `[0,1]`
    pub fn interpolate_limited(&self, length: usize) -> Vec<f64> {
        Interpolator::new(self.kind()).limited_interpolation(self, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(kind: InterpolationType, params: &[f64]) -> Curve {
        Curve::from_params(kind.name(), params).unwrap()
    }

    const ZIGZAG: [f64; 10] = [0.0, 0.2, 0.2, 0.9, 0.45, 0.1, 0.7, 0.8, 1.0, 0.3];

    #[test]
    fn test_empty_curve() {
        for kind in InterpolationType::ALL {
            let empty = Curve::new(kind);
            let interpolator = Interpolator::for_curve(&empty);
            assert_eq!(interpolator.interpolation(&empty, 16), vec![0.0; 16]);
            assert_eq!(interpolator.single_interpolation(0.5), Ok(0.0));
        }
    }

    #[test]
    fn test_single_point_is_constant() {
        for kind in InterpolationType::ALL {
            let c = curve(kind, &[0.4, 0.6]);
            let values = c.interpolate(50);
            assert!(values.iter().all(|&v| v == 0.6), "{:?}", kind);

            let interpolator = Interpolator::for_curve(&c);
            assert_eq!(interpolator.single_interpolation(0.9), Ok(0.6));
        }
    }

    #[test]
    fn test_not_prepared() {
        let interpolator = Interpolator::new(InterpolationType::Spline);
        assert_eq!(interpolator.single_interpolation(0.2), Err(CurveError::NotPrepared));
    }

    #[test]
    fn test_linear_bulk() {
        let c = curve(InterpolationType::Linear, &[0.0, 0.0, 0.5, 1.0, 1.0, 0.0]);
        let values = c.interpolate(10);
        let expected = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0, 0.8, 0.6, 0.4, 0.2];
        for (v, e) in values.iter().zip(expected) {
            assert!((v - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sample_and_hold_bulk() {
        let c = curve(InterpolationType::SampleAndHold, &[0.2, 0.3, 0.5, 0.9, 0.8, 0.1]);
        let values = c.interpolate(10);
        assert_eq!(values, vec![0.3, 0.3, 0.3, 0.3, 0.3, 0.9, 0.9, 0.9, 0.1, 0.1]);
    }

    #[test]
    fn test_endpoints_linear_and_hold() {
        for kind in [InterpolationType::Linear, InterpolationType::SampleAndHold] {
            for params in [&ZIGZAG[..], &[0.1, 0.4, 0.6, 0.8][..]] {
                let c = curve(kind, params);
                let interpolator = Interpolator::for_curve(&c);
                let first = c.points()[0].y;
                let last = c.points()[c.len() - 1].y;
                assert_eq!(interpolator.single_interpolation(0.0), Ok(first));
                assert_eq!(interpolator.single_interpolation(1.0), Ok(last));
            }
        }
    }

    #[test]
    fn test_single_matches_bulk() {
        let length = 200;
        for kind in InterpolationType::ALL {
            let c = curve(kind, &ZIGZAG);
            let interpolator = Interpolator::for_curve(&c);
            let bulk = interpolator.interpolation(&c, length);

            for (i, &v) in bulk.iter().enumerate() {
                let single = interpolator.single_interpolation(i as f64 / length as f64).unwrap();
                assert!((single - v).abs() < 1e-9, "{:?} at {}: {} vs {}", kind, i, single, v);
            }
        }
    }

    #[test]
    fn test_interpolating_modes_hit_knots() {
        for kind in [
            InterpolationType::Linear,
            InterpolationType::Spline,
            InterpolationType::Poly3,
            InterpolationType::Poly5,
            InterpolationType::Poly7,
            InterpolationType::PolyN,
        ] {
            let c = curve(kind, &ZIGZAG);
            let interpolator = Interpolator::for_curve(&c);
            for p in c.points() {
                let v = interpolator.single_interpolation(p.x).unwrap();
                assert!((v - p.y).abs() < 1e-9, "{:?} at x={}", kind, p.x);
            }
        }
    }

    #[test]
    fn test_spline_continuity() {
        let c = curve(InterpolationType::Spline, &ZIGZAG);
        let values = c.interpolate(2000);
        for pair in values.windows(2) {
            assert!((pair[1] - pair[0]).abs() < 0.01);
        }
    }

    #[test]
    fn test_poly_n_exact_for_polynomial() {
        // Four knots on a cubic reproduce it exactly
        let f = |x: f64| 0.2 + 0.5 * x - 0.9 * x * x + 0.6 * x * x * x;
        let knots = [0.0, 0.3, 0.7, 1.0];
        let params: Vec<f64> = knots.iter().flat_map(|&x| [x, f(x)]).collect();
        let c = curve(InterpolationType::PolyN, &params);
        let interpolator = Interpolator::for_curve(&c);

        for &x in &[0.05, 0.5, 0.95] {
            assert!((interpolator.single_interpolation(x).unwrap() - f(x)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_poly3_uses_synthetic_knots() {
        // With two knots the window reaches a flat synthetic knot at x = -0.5
        let c = curve(InterpolationType::Poly3, &[0.0, 0.0, 1.0, 1.0]);
        let interpolator = Interpolator::for_curve(&c);

        // Quadratic through (-0.5, 0), (0, 0), (1, 1): y = (x^2 + 0.5x) / 1.5
        let x = 0.5;
        let expected = (x * x + 0.5 * x) / 1.5;
        assert!((interpolator.single_interpolation(x).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_limited_interpolation_clamps() {
        let c = curve(InterpolationType::PolyN, &[0.0, 0.0, 0.25, 1.0, 0.5, 0.0, 0.75, 1.0, 1.0, 0.0]);
        let raw = c.interpolate(400);
        assert!(raw.iter().any(|&v| !(0.0..=1.0).contains(&v)));

        let limited = c.interpolate_limited(400);
        assert!(limited.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_input_clamped() {
        let c = curve(InterpolationType::Linear, &[0.0, 0.25, 1.0, 0.75]);
        let interpolator = Interpolator::for_curve(&c);
        assert_eq!(interpolator.single_interpolation(-3.0), Ok(0.25));
        assert_eq!(interpolator.single_interpolation(7.0), Ok(0.75));
    }

    #[test]
    fn test_prepare_snapshots_curve() {
        let mut c = curve(InterpolationType::Linear, &[0.0, 0.0, 1.0, 1.0]);
        let mut interpolator = Interpolator::for_curve(&c);

        c.flip_vertical();
        assert!((interpolator.single_interpolation(0.25).unwrap() - 0.25).abs() < 1e-12);

        interpolator.prepare(&c);
        assert!((interpolator.single_interpolation(0.25).unwrap() - 0.75).abs() < 1e-12);
    }
}
