//! Newton divided differences and natural spline curvature

/// Newton divided-difference coefficients of the polynomial through `(xs, ys)`
///
/// Coincident `x` values contribute a zero difference instead of dividing by
/// zero.
pub(crate) fn divided_differences(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut coefs = ys.to_vec();

    for order in 1..n {
        for i in (order..n).rev() {
            let dx = xs[i] - xs[i - order];
            coefs[i] = if dx == 0.0 {
                0.0
            } else {
                (coefs[i] - coefs[i - 1]) / dx
            };
        }
    }
    coefs
}

/// Evaluate a Newton-form polynomial by nested multiplication
pub(crate) fn newton_eval(xs: &[f64], coefs: &[f64], x: f64) -> f64 {
    let Some((&last, rest)) = coefs.split_last() else {
        return 0.0;
    };

    rest.iter()
        .zip(xs)
        .rev()
        .fold(last, |acc, (&c, &xk)| acc * (x - xk) + c)
}

/// Second derivatives of the natural cubic spline through `(xs, ys)`
///
/// Tridiagonal solve by forward elimination and back substitution, with
/// both end curvatures pinned to zero. A zero-width interval is treated as
/// a curvature-free knot.
pub(crate) fn spline_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut y2 = vec![0.0; n + 1];
    if n < 3 {
        return y2;
    }

    let mut u = vec![0.0; n];
    for i in 1..n - 1 {
        let h_lo = xs[i] - xs[i - 1];
        let h_hi = xs[i + 1] - xs[i];
        let span = xs[i + 1] - xs[i - 1];
        if h_lo <= 0.0 || h_hi <= 0.0 {
            continue;
        }

        let sig = h_lo / span;
        let p = sig * y2[i - 1] + 2.0;
        y2[i] = (sig - 1.0) / p;

        let slope_change = (ys[i + 1] - ys[i]) / h_hi - (ys[i] - ys[i - 1]) / h_lo;
        u[i] = (6.0 * slope_change / span - sig * u[i - 1]) / p;
    }

    y2[n - 1] = 0.0;
    for k in (0..n - 1).rev() {
        y2[k] = y2[k] * y2[k + 1] + u[k];
    }
    y2
}

/// Cubic spline segment between knots 0 and 1
#[inline]
pub(crate) fn spline_segment(x0: f64, y0: f64, c0: f64, x1: f64, y1: f64, c1: f64, x: f64) -> f64 {
    let h = x1 - x0;
    if h <= 0.0 {
        return y0;
    }

    let a = (x1 - x) / h;
    let b = (x - x0) / h;
    a * y0 + b * y1 + ((a * a * a - a) * c0 + (b * b * b - b) * c1) * h * h / 6.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newton_reproduces_polynomial() {
        // y = 2x^3 - x + 0.5
        let f = |x: f64| 2.0 * x.powi(3) - x + 0.5;
        let xs = [0.0, 0.2, 0.5, 0.9];
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        let coefs = divided_differences(&xs, &ys);

        for &x in &[0.0, 0.1, 0.33, 0.7, 1.0] {
            assert!((newton_eval(&xs, &coefs, x) - f(x)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_newton_duplicate_knots() {
        let coefs = divided_differences(&[0.5, 0.5], &[0.2, 0.8]);
        assert!(coefs.iter().all(|c| c.is_finite()));
        assert_eq!(newton_eval(&[], &[], 0.3), 0.0);
    }

    #[test]
    fn test_natural_spline_of_line_is_flat() {
        let xs = [0.0, 0.3, 0.6, 1.0];
        let ys = [0.0, 0.3, 0.6, 1.0];
        let y2 = spline_second_derivatives(&xs, &ys);
        assert!(y2.iter().all(|c| c.abs() < 1e-12));
    }

    #[test]
    fn test_spline_segment_hits_knots() {
        let xs = [0.0, 0.4, 1.0];
        let ys = [0.0, 1.0, 0.2];
        let y2 = spline_second_derivatives(&xs, &ys);
        assert_eq!(y2[0], 0.0);
        assert_eq!(y2[2], 0.0);

        assert!((spline_segment(xs[0], ys[0], y2[0], xs[1], ys[1], y2[1], 0.4) - 1.0).abs() < 1e-12);
        assert!((spline_segment(xs[1], ys[1], y2[1], xs[2], ys[2], y2[2], 0.4) - 1.0).abs() < 1e-12);
    }
}
