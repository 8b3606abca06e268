//! Tangent angles of coordinate curves by adaptive finite differences.
//!
//! For a mapping `f(x, y) -> (u, v)` the estimator returns, at each sample
//! point, the direction of `df/dx` and `df/dy` as angles in radians. Along a
//! curved axis these are the directions in which ticks and labels are laid
//! out.
//!
//! # Step policy
//!
//! Each derivative is a one-sided difference. The step starts at
//! `sqrt(f64::EPSILON)`, points toward the farther bound of the sampled
//! coordinate's domain and never crosses that bound. While both output
//! components stay unchanged the step is doubled.
//!
//! A first pass gives up once the step exceeds `1.0`: the coordinate curve is
//! degenerate at that point (for instance the angular direction at `r = 0` in
//! polar coordinates). A second pass then offsets the other coordinate by its
//! own base step and retries, which makes the tick at `r = 0` parallel to the
//! ticks at `r != 0`. Each pass evaluates at most `max_doublings` steps; if
//! neither pass finds a finite nonzero derivative the angle is `NaN`.

use crate::config::AngleConfig;
use crate::error::{Error, Result};
use crate::geometry::Point;

const LOG_TARGET: &str = "trueno_curvilinear::angle";

/// Values and tangent angles at a set of sample points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AngleEstimate {
    /// `f(x, y)` at each sample point.
    pub values: Vec<Point>,
    /// Angle of `df/dx` in radians, `NaN` where undefined.
    pub angle_dx: Vec<f64>,
    /// Angle of `df/dy` in radians, `NaN` where undefined.
    pub angle_dy: Vec<f64>,
}

impl AngleEstimate {
    /// Number of sample points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if there are no sample points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    X,
    Y,
}

impl Direction {
    fn offset(self, p: Point, along: f64, across: f64) -> Point {
        match self {
            Direction::X => Point::new(p.x + along, p.y + across),
            Direction::Y => Point::new(p.x + across, p.y + along),
        }
    }
}

/// Signed starting step and the distance to the farther domain bound.
#[derive(Debug, Clone, Copy)]
struct Step {
    eps: f64,
    max: f64,
}

/// Adaptive finite-difference estimator of tangent angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleEstimator {
    base_step: f64,
    max_doublings: u32,
}

impl Default for AngleEstimator {
    fn default() -> Self {
        Self {
            base_step: f64::EPSILON.sqrt(),
            max_doublings: 64,
        }
    }
}

impl AngleEstimator {
    /// Create an estimator with the default step policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an estimator from configuration.
    #[must_use]
    pub fn from_config(config: &AngleConfig) -> Self {
        Self::default().max_doublings(config.max_doublings)
    }

    /// Set the number of step doublings per pass.
    #[must_use]
    pub fn max_doublings(mut self, max_doublings: u32) -> Self {
        self.max_doublings = max_doublings.max(1);
        self
    }

    /// Evaluate `func` and its tangent angles at `(xs, ys)`.
    ///
    /// `xs` and `ys` broadcast: they have equal lengths, or one of them has a
    /// single element that is paired with every element of the other.
    /// `xlim` and `ylim` bound the valid input range; they may be unordered
    /// or infinite.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] if the arrays do not broadcast.
    pub fn estimate<F>(
        &self,
        func: F,
        xs: &[f64],
        ys: &[f64],
        xlim: (f64, f64),
        ylim: (f64, f64),
    ) -> Result<AngleEstimate>
    where
        F: Fn(Point) -> Point,
    {
        let n = match (xs.len(), ys.len()) {
            (a, b) if a == b => a,
            (1, b) => b,
            (a, 1) => a,
            (x_len, y_len) => return Err(Error::DataLengthMismatch { x_len, y_len }),
        };
        let pick = |v: &[f64], i: usize| if v.len() == 1 { v[0] } else { v[i] };
        let points: Vec<Point> = (0..n).map(|i| Point::new(pick(xs, i), pick(ys, i))).collect();
        Ok(self.estimate_points(&func, &points, xlim, ylim))
    }

    /// Like [`estimate`](Self::estimate) with the samples already paired.
    pub fn estimate_points<F>(
        &self,
        func: &F,
        points: &[Point],
        xlim: (f64, f64),
        ylim: (f64, f64),
    ) -> AngleEstimate
    where
        F: Fn(Point) -> Point,
    {
        let mut estimate = AngleEstimate {
            values: Vec::with_capacity(points.len()),
            angle_dx: Vec::with_capacity(points.len()),
            angle_dy: Vec::with_capacity(points.len()),
        };
        for &p in points {
            let x_step = self.initial_step(p.x, xlim);
            let y_step = self.initial_step(p.y, ylim);
            estimate.values.push(func(p));
            let dx = self.direction_angle(func, p, Direction::X, x_step, y_step.eps);
            let dy = self.direction_angle(func, p, Direction::Y, y_step, x_step.eps);
            estimate.angle_dx.push(dx);
            estimate.angle_dy.push(dy);
        }
        estimate
    }

    fn initial_step(&self, value: f64, lim: (f64, f64)) -> Step {
        let (lo, hi) = if lim.0 <= lim.1 { lim } else { (lim.1, lim.0) };
        let (dlo, dhi) = (value - lo, hi - value);
        let max = dlo.max(dhi);
        let sign = if dhi >= dlo { 1.0 } else { -1.0 };
        Step {
            eps: sign * self.base_step.min(max),
            max,
        }
    }

    fn direction_angle<F>(
        &self,
        func: &F,
        p: Point,
        direction: Direction,
        step: Step,
        nudge: f64,
    ) -> f64
    where
        F: Fn(Point) -> Point,
    {
        for (pass, across) in [(0, 0.0), (1, nudge)] {
            if pass == 1 {
                if across == 0.0 || !across.is_finite() {
                    break;
                }
                log::trace!(
                    target: LOG_TARGET,
                    "degenerate {direction:?} derivative at {p:?}, nudging by {across:e}"
                );
            }
            let origin = direction.offset(p, 0.0, across);
            let f0 = func(origin);
            let mut eps = step.eps;
            for _ in 0..self.max_doublings {
                if eps == 0.0 || !eps.is_finite() {
                    break;
                }
                let h = eps.signum() * eps.abs().min(step.max);
                let f1 = func(direction.offset(origin, h, 0.0));
                let (du, dv) = ((f1.x - f0.x) / h, (f1.y - f0.y) / h);
                if du.is_finite() && dv.is_finite() && (du != 0.0 || dv != 0.0) {
                    return dv.atan2(du);
                }
                if h.abs() >= step.max || (pass == 0 && h.abs() > 1.0) {
                    break;
                }
                eps *= 2.0;
            }
        }
        log::debug!(target: LOG_TARGET, "no tangent along {direction:?} at {p:?}");
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Affine2D, CoordinateTransform, PolarTransform};
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    const ALL: (f64, f64) = (f64::NEG_INFINITY, f64::INFINITY);

    fn angle_diff(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(2.0 * PI);
        d.min(2.0 * PI - d)
    }

    #[test]
    fn test_identity_angles() {
        let est = AngleEstimator::new()
            .estimate(|p| p, &[0.0, 1.5, -3.0], &[2.0, -7.0, 0.25], ALL, ALL)
            .unwrap();
        assert_eq!(est.len(), 3);
        for i in 0..3 {
            assert_relative_eq!(est.angle_dx[i], 0.0, epsilon = 1e-12);
            assert_relative_eq!(est.angle_dy[i], FRAC_PI_2, epsilon = 1e-12);
        }
        assert_eq!(est.values[1], Point::new(1.5, -7.0));
    }

    #[test]
    fn test_steps_toward_farther_bound() {
        // Points sitting on the upper bound must step backwards.
        let est = AngleEstimator::new()
            .estimate(|p| p, &[10.0], &[10.0], (0.0, 10.0), (10.0, 0.0))
            .unwrap();
        assert_relative_eq!(est.angle_dx[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(est.angle_dy[0], FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_shifts_angles() {
        let theta = 0.6;
        let rot = Affine2D::identity().rotate(theta);
        let est = AngleEstimator::new()
            .estimate(|p| rot.forward(p), &[0.5, 2.0, -4.0], &[1.0, 3.0, 8.0], ALL, ALL)
            .unwrap();
        for i in 0..3 {
            assert!(angle_diff(est.angle_dx[i], theta) < 1e-6);
            assert!(angle_diff(est.angle_dy[i], theta + FRAC_PI_2) < 1e-6);
        }
    }

    #[test]
    fn test_polar_center_uses_nudge() {
        let polar = PolarTransform::radians();
        let estimator = AngleEstimator::new();
        let run = || {
            estimator
                .estimate(|p| polar.forward(p), &[0.3], &[0.0], (-PI, PI), (0.0, f64::INFINITY))
                .unwrap()
        };
        let first = run();
        assert!(first.angle_dx[0].is_finite());
        // Angular direction at r=0 is the r>0 tangent: theta + 90 degrees.
        assert!(angle_diff(first.angle_dx[0], 0.3 + FRAC_PI_2) < 1e-6);
        assert!(angle_diff(first.angle_dy[0], 0.3) < 1e-6);
        let second = run();
        assert_eq!(first.angle_dx[0].to_bits(), second.angle_dx[0].to_bits());
        assert_eq!(first.angle_dy[0].to_bits(), second.angle_dy[0].to_bits());
    }

    #[test]
    fn test_constant_function_is_nan() {
        let est = AngleEstimator::new()
            .max_doublings(8)
            .estimate(|_| Point::new(1.0, 1.0), &[0.0], &[0.0], ALL, ALL)
            .unwrap();
        assert!(est.angle_dx[0].is_nan());
        assert!(est.angle_dy[0].is_nan());
    }

    #[test]
    fn test_degenerate_domain_is_nan() {
        // No room to move along y, and the x-derivative needs no nudge.
        let est = AngleEstimator::new().estimate(|p| p, &[1.0], &[2.0], ALL, (2.0, 2.0)).unwrap();
        assert_relative_eq!(est.angle_dx[0], 0.0, epsilon = 1e-12);
        assert!(est.angle_dy[0].is_nan());
    }

    #[test]
    fn test_broadcast_scalar() {
        let est = AngleEstimator::new()
            .estimate(|p| p, &[5.0], &[0.0, 1.0, 2.0, 3.0], ALL, ALL)
            .unwrap();
        assert_eq!(est.len(), 4);
        assert!(est.values.iter().all(|p| p.x == 5.0));
    }

    #[test]
    fn test_broadcast_mismatch() {
        let err = AngleEstimator::new()
            .estimate(|p| p, &[1.0, 2.0], &[1.0, 2.0, 3.0], ALL, ALL)
            .unwrap_err();
        assert!(matches!(err, Error::DataLengthMismatch { x_len: 2, y_len: 3 }));
    }

    #[test]
    fn test_coarse_function_needs_larger_step() {
        // Output only changes in steps of 1e-3; the step must grow to see it.
        let stairs = |p: Point| Point::new((p.x * 1e3).floor() / 1e3, (p.y * 1e3).floor() / 1e3);
        let est = AngleEstimator::new().estimate(stairs, &[0.0005], &[0.0005], ALL, ALL).unwrap();
        assert_relative_eq!(est.angle_dx[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(est.angle_dy[0], FRAC_PI_2, epsilon = 1e-12);
    }
}
