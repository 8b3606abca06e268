//! Coordinate transforms between curved and rectilinear space.
//!
//! A [`CoordinateTransform`] maps curved coordinates `(u, v)` (angle and
//! radius, longitude and latitude, ...) to the rectilinear data coordinates of
//! the plot and back. The grid finder samples gridlines through
//! [`CoordinateTransform::forward`] and recovers curved extents through
//! [`CoordinateTransform::inverse`].
//!
//! Provided transforms:
//!
//! - [`IdentityTransform`]
//! - [`Affine2D`] - translate, scale, rotate, skew and composition
//! - [`PolarTransform`] - `(theta, r)` to `(x, y)`
//! - [`FnTransform`] - a forward/inverse pair of closures
//! - [`Composite`] - one transform followed by another
//!
//! # Example
//!
//! ```rust
//! use trueno_curvilinear::geometry::Point;
//! use trueno_curvilinear::transform::{CoordinateTransform, PolarTransform};
//!
//! let polar = PolarTransform::degrees();
//! let p = polar.forward(Point::new(90.0, 2.0));
//! assert!(p.x.abs() < 1e-12);
//! assert!((p.y - 2.0).abs() < 1e-12);
//! ```

use crate::error::{Error, Result};
use crate::geometry::Point;

/// A bijection between curved coordinates and rectilinear coordinates.
///
/// `inverse(forward(p))` must reproduce `p` within floating tolerance over the
/// domain of interest. Points outside the domain may map to `NaN`.
pub trait CoordinateTransform {
    /// Curved to rectilinear.
    fn forward(&self, p: Point) -> Point;

    /// Rectilinear to curved.
    fn inverse(&self, p: Point) -> Point;

    /// Apply [`forward`](Self::forward) to every point.
    fn forward_all(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|&p| self.forward(p)).collect()
    }

    /// Apply [`inverse`](Self::inverse) to every point.
    fn inverse_all(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|&p| self.inverse(p)).collect()
    }

    /// This transform followed by `next`.
    fn then<B: CoordinateTransform>(self, next: B) -> Composite<Self, B>
    where
        Self: Sized,
    {
        Composite::new(self, next)
    }
}

impl<T: CoordinateTransform + ?Sized> CoordinateTransform for Box<T> {
    fn forward(&self, p: Point) -> Point {
        (**self).forward(p)
    }

    fn inverse(&self, p: Point) -> Point {
        (**self).inverse(p)
    }
}

impl<T: CoordinateTransform + ?Sized> CoordinateTransform for &T {
    fn forward(&self, p: Point) -> Point {
        (**self).forward(p)
    }

    fn inverse(&self, p: Point) -> Point {
        (**self).inverse(p)
    }
}

/// The identity mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityTransform;

impl CoordinateTransform for IdentityTransform {
    fn forward(&self, p: Point) -> Point {
        p
    }

    fn inverse(&self, p: Point) -> Point {
        p
    }
}

/// A 2D affine transform.
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`. Builder methods append
/// their operation after the existing ones, so
/// `Affine2D::identity().scale(2.0, 2.0).translate(1.0, 0.0)` scales first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2D {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Default for Affine2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine2D {
    /// The identity affine.
    #[must_use]
    pub const fn identity() -> Self {
        Self::from_values(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Build from matrix entries `[[a, c, e], [b, d, f]]`.
    #[must_use]
    pub const fn from_values(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Matrix entries as `(a, b, c, d, e, f)`.
    #[must_use]
    pub const fn values(&self) -> (f64, f64, f64, f64, f64, f64) {
        (self.a, self.b, self.c, self.d, self.e, self.f)
    }

    /// `self` followed by `next`.
    #[must_use]
    pub fn compose(&self, next: &Self) -> Self {
        Self {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    /// Append a translation.
    #[must_use]
    pub fn translate(self, tx: f64, ty: f64) -> Self {
        self.compose(&Self::from_values(1.0, 0.0, 0.0, 1.0, tx, ty))
    }

    /// Append a scaling.
    #[must_use]
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        self.compose(&Self::from_values(sx, 0.0, 0.0, sy, 0.0, 0.0))
    }

    /// Append a counter-clockwise rotation in radians.
    #[must_use]
    pub fn rotate(self, theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        self.compose(&Self::from_values(cos, sin, -sin, cos, 0.0, 0.0))
    }

    /// Append a counter-clockwise rotation in degrees.
    #[must_use]
    pub fn rotate_deg(self, degrees: f64) -> Self {
        self.rotate(degrees.to_radians())
    }

    /// Append a skew; `x_shear` tilts vertical lines, `y_shear` horizontal ones.
    #[must_use]
    pub fn skew_deg(self, x_shear: f64, y_shear: f64) -> Self {
        let (tx, ty) = (x_shear.to_radians().tan(), y_shear.to_radians().tan());
        self.compose(&Self::from_values(1.0, ty, tx, 1.0, 0.0, 0.0))
    }

    /// Determinant of the linear part.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// The inverse affine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SingularTransform`] when the determinant is zero.
    pub fn inverted(&self) -> Result<Self> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(Error::SingularTransform);
        }
        let (a, b, c, d) = (self.d / det, -self.b / det, -self.c / det, self.a / det);
        Ok(Self {
            a,
            b,
            c,
            d,
            e: -(a * self.e + c * self.f),
            f: -(b * self.e + d * self.f),
        })
    }

    /// Apply to a single point.
    #[must_use]
    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(self.a * p.x + self.c * p.y + self.e, self.b * p.x + self.d * p.y + self.f)
    }
}

impl CoordinateTransform for Affine2D {
    fn forward(&self, p: Point) -> Point {
        self.transform_point(p)
    }

    /// Singular affines have no inverse; every point maps to `NaN`.
    fn inverse(&self, p: Point) -> Point {
        self.inverted()
            .map_or(Point::new(f64::NAN, f64::NAN), |inv| inv.transform_point(p))
    }
}

/// Polar coordinates `(theta, r)` to rectilinear `(r cos theta, r sin theta)`.
///
/// The inverse returns theta in `(-180, 180]` degrees (or `(-pi, pi]` radians)
/// and a non-negative radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolarTransform {
    degrees: bool,
}

impl PolarTransform {
    /// Theta measured in radians.
    #[must_use]
    pub const fn radians() -> Self {
        Self { degrees: false }
    }

    /// Theta measured in degrees.
    #[must_use]
    pub const fn degrees() -> Self {
        Self { degrees: true }
    }
}

impl CoordinateTransform for PolarTransform {
    fn forward(&self, p: Point) -> Point {
        let theta = if self.degrees { p.x.to_radians() } else { p.x };
        let (sin, cos) = theta.sin_cos();
        Point::new(p.y * cos, p.y * sin)
    }

    fn inverse(&self, p: Point) -> Point {
        let theta = p.y.atan2(p.x);
        Point::new(if self.degrees { theta.to_degrees() } else { theta }, p.x.hypot(p.y))
    }
}

/// A transform defined by a pair of closures.
pub struct FnTransform<F, G> {
    forward: F,
    inverse: G,
}

impl<F, G> FnTransform<F, G>
where
    F: Fn(Point) -> Point,
    G: Fn(Point) -> Point,
{
    /// Wrap a forward closure and its inverse.
    pub fn new(forward: F, inverse: G) -> Self {
        Self { forward, inverse }
    }
}

impl<F, G> std::fmt::Debug for FnTransform<F, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnTransform")
    }
}

impl<F, G> CoordinateTransform for FnTransform<F, G>
where
    F: Fn(Point) -> Point,
    G: Fn(Point) -> Point,
{
    fn forward(&self, p: Point) -> Point {
        (self.forward)(p)
    }

    fn inverse(&self, p: Point) -> Point {
        (self.inverse)(p)
    }
}

/// `first` followed by `second`; the inverse runs them in reverse.
#[derive(Debug, Clone, Copy)]
pub struct Composite<A, B> {
    first: A,
    second: B,
}

impl<A, B> Composite<A, B> {
    /// Compose two transforms.
    pub const fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: CoordinateTransform, B: CoordinateTransform> CoordinateTransform for Composite<A, B> {
    fn forward(&self, p: Point) -> Point {
        self.second.forward(self.first.forward(p))
    }

    fn inverse(&self, p: Point) -> Point {
        self.first.inverse(self.second.inverse(p))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// Invariant: affine compose then inverse is the identity
        #[test]
        fn prop_affine_roundtrip(
            sx in 0.1f64..10.0,
            sy in 0.1f64..10.0,
            rot in -180.0f64..180.0,
            shear in -60.0f64..60.0,
            x in -1e3f64..1e3,
            y in -1e3f64..1e3
        ) {
            let t = Affine2D::identity().scale(sx, sy).rotate_deg(rot).skew_deg(shear, 0.0);
            let back = t.inverse(t.forward(Point::new(x, y)));
            prop_assert!((back.x - x).abs() < 1e-6 * (1.0 + x.abs()));
            prop_assert!((back.y - y).abs() < 1e-6 * (1.0 + y.abs()));
        }

        /// Invariant: polar round trip away from the pole
        #[test]
        fn prop_polar_roundtrip(theta in -179.0f64..179.0, r in 0.01f64..1e3) {
            let polar = PolarTransform::degrees();
            let back = polar.inverse(polar.forward(Point::new(theta, r)));
            prop_assert!((back.x - theta).abs() < 1e-8);
            prop_assert!((back.y - r).abs() < 1e-8 * r.max(1.0));
        }
    }
}
