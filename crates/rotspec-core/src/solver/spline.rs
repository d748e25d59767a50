//! Natural cubic spline interpolation with derivative evaluation and root
//! isolation, the primitive under the error-curve minimization.

use crate::domain::RotspecError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SplineError {
    #[error("spline knots and values must have equal length: {xs} vs {ys}")]
    LengthMismatch { xs: usize, ys: usize },
    #[error("a spline needs at least 2 knots, got {actual}")]
    InsufficientKnots { actual: usize },
    #[error("spline knots must be strictly increasing, index {index} has {current} after {previous}")]
    NonIncreasingKnot {
        index: usize,
        previous: f64,
        current: f64,
    },
}

impl From<SplineError> for RotspecError {
    fn from(error: SplineError) -> Self {
        RotspecError::input_validation("INPUT.SPLINE", error.to_string())
    }
}

/// Interpolating cubic with continuous first and second derivatives and
/// zero curvature at the boundary knots (zero-smoothing fit).
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    y2s: Vec<f64>,
}

impl CubicSpline {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, SplineError> {
        if xs.len() != ys.len() {
            return Err(SplineError::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        if xs.len() < 2 {
            return Err(SplineError::InsufficientKnots { actual: xs.len() });
        }
        for index in 1..xs.len() {
            if xs[index] <= xs[index - 1] {
                return Err(SplineError::NonIncreasingKnot {
                    index,
                    previous: xs[index - 1],
                    current: xs[index],
                });
            }
        }

        let n = xs.len();
        let mut y2s = vec![0.0; n];
        let mut u = vec![0.0; n.saturating_sub(1)];

        // Forward sweep of the tridiagonal system for the natural spline.
        for i in 1..n - 1 {
            let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
            let p = sig * y2s[i - 1] + 2.0;
            y2s[i] = (sig - 1.0) / p;
            u[i] = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
                - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
            u[i] = (6.0 * u[i] / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
        }

        // Back substitution.
        for k in (0..n.saturating_sub(2)).rev() {
            y2s[k + 1] = y2s[k + 1] * y2s[k + 2] + u[k + 1];
        }

        Ok(Self { xs, ys, y2s })
    }

    pub fn knots(&self) -> &[f64] {
        &self.xs
    }

    fn interval_for(&self, x: f64) -> usize {
        let n = self.xs.len();
        let mut lo = 0;
        let mut hi = n - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.xs[mid] > x {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        lo
    }

    /// Evaluate at x; queries beyond the knot range use the boundary
    /// polynomial.
    pub fn evaluate(&self, x: f64) -> f64 {
        let lo = self.interval_for(x);
        let hi = lo + 1;
        let h = self.xs[hi] - self.xs[lo];
        let a = (self.xs[hi] - x) / h;
        let b = (x - self.xs[lo]) / h;

        a * self.ys[lo]
            + b * self.ys[hi]
            + ((a * a * a - a) * self.y2s[lo] + (b * b * b - b) * self.y2s[hi]) * h * h / 6.0
    }

    /// Analytic first derivative at x.
    pub fn derivative(&self, x: f64) -> f64 {
        let lo = self.interval_for(x);
        let hi = lo + 1;
        let h = self.xs[hi] - self.xs[lo];
        let a = (self.xs[hi] - x) / h;
        let b = (x - self.xs[lo]) / h;

        (self.ys[hi] - self.ys[lo]) / h
            + h * (-(3.0 * a * a - 1.0) * self.y2s[lo] + (3.0 * b * b - 1.0) * self.y2s[hi]) / 6.0
    }

    /// Zero crossings inside the knot range, isolated per interval by
    /// endpoint sign change and refined by bisection. A tangential double
    /// zero without a sign change is not detected; the callers treat such
    /// curves as ambiguous anyway.
    pub fn roots(&self) -> Vec<f64> {
        let mut roots: Vec<f64> = Vec::new();
        let push = |candidate: f64, roots: &mut Vec<f64>| {
            let duplicate = roots
                .iter()
                .any(|root| (root - candidate).abs() <= root_spacing_tolerance(&self.xs));
            if !duplicate {
                roots.push(candidate);
            }
        };

        for interval in 0..self.xs.len() - 1 {
            let x_lo = self.xs[interval];
            let x_hi = self.xs[interval + 1];
            let f_lo = self.evaluate(x_lo);
            let f_hi = self.evaluate(x_hi);

            if f_lo == 0.0 {
                push(x_lo, &mut roots);
            }
            if f_lo * f_hi < 0.0 {
                push(self.bisect(x_lo, x_hi), &mut roots);
            }
            if interval == self.xs.len() - 2 && f_hi == 0.0 {
                push(x_hi, &mut roots);
            }
        }

        roots
    }

    fn bisect(&self, mut lo: f64, mut hi: f64) -> f64 {
        let mut f_lo = self.evaluate(lo);
        for _ in 0..100 {
            let mid = 0.5 * (lo + hi);
            let f_mid = self.evaluate(mid);
            if f_mid == 0.0 {
                return mid;
            }
            if f_lo * f_mid < 0.0 {
                hi = mid;
            } else {
                lo = mid;
                f_lo = f_mid;
            }
        }
        0.5 * (lo + hi)
    }
}

fn root_spacing_tolerance(xs: &[f64]) -> f64 {
    let span = xs[xs.len() - 1] - xs[0];
    span * 1.0e-9
}

#[cfg(test)]
mod tests {
    use super::{CubicSpline, SplineError};

    #[test]
    fn construction_rejects_degenerate_knot_sets() {
        assert!(matches!(
            CubicSpline::new(vec![1.0, 2.0], vec![1.0]),
            Err(SplineError::LengthMismatch { xs: 2, ys: 1 })
        ));
        assert!(matches!(
            CubicSpline::new(vec![1.0], vec![1.0]),
            Err(SplineError::InsufficientKnots { actual: 1 })
        ));
        assert!(matches!(
            CubicSpline::new(vec![1.0, 1.0], vec![0.0, 0.0]),
            Err(SplineError::NonIncreasingKnot { index: 1, .. })
        ));
    }

    #[test]
    fn spline_passes_through_its_knots() {
        let xs = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = vec![2.0, 3.0, 5.0, 4.0, 1.0];
        let spline = CubicSpline::new(xs.clone(), ys.clone()).expect("spline");

        for (x, y) in xs.iter().zip(&ys) {
            let value = spline.evaluate(*x);
            assert!(
                (value - y).abs() < 1.0e-10,
                "spline({}) = {} but expected {}",
                x,
                value,
                y
            );
        }
    }

    #[test]
    fn linear_data_yields_a_linear_spline_with_constant_derivative() {
        let xs: Vec<f64> = (0..6).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x - 4.0).collect();
        let spline = CubicSpline::new(xs, ys).expect("spline");

        for x in [0.25, 1.5, 3.75, 4.9] {
            assert!((spline.evaluate(x) - (2.0 * x - 4.0)).abs() < 1.0e-10);
            assert!((spline.derivative(x) - 2.0).abs() < 1.0e-10);
        }

        let roots = spline.roots();
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 2.0).abs() < 1.0e-9);
    }

    #[test]
    fn quadratic_data_locates_both_zero_crossings() {
        let xs: Vec<f64> = (0..=10).map(|i| i as f64 * 0.5).collect();
        let ys: Vec<f64> = xs.iter().map(|x| (x - 1.0) * (x - 4.0)).collect();
        let spline = CubicSpline::new(xs, ys).expect("spline");

        let roots = spline.roots();
        assert_eq!(roots.len(), 2, "roots: {:?}", roots);
        assert!((roots[0] - 1.0).abs() < 0.1);
        assert!((roots[1] - 4.0).abs() < 0.1);
    }

    #[test]
    fn knot_exact_zero_is_reported_once() {
        let xs: Vec<f64> = (0..5).map(f64::from).collect();
        let ys = vec![-2.0, -1.0, 0.0, 1.0, 2.0];
        let spline = CubicSpline::new(xs, ys).expect("spline");

        let roots = spline.roots();
        assert_eq!(roots.len(), 1, "roots: {:?}", roots);
        assert!((roots[0] - 2.0).abs() < 1.0e-9);
    }
}
