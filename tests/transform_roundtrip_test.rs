//! Round-trip tests for the provided transforms.
//!
//! The grid finder maps the plot box back into curved space with `inverse`
//! and samples gridlines with `forward`, so every transform must invert
//! itself over its domain.
//!
//! Run: cargo test --test transform_roundtrip_test

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use trueno_curvilinear::geometry::Point;
use trueno_curvilinear::transform::{
    Affine2D, CoordinateTransform, FnTransform, IdentityTransform, PolarTransform,
};

fn assert_roundtrip(transform: &dyn CoordinateTransform, p: Point, tol: f64) {
    let back = transform.inverse(transform.forward(p));
    let x_ok = (back.x - p.x).abs() <= tol * (1.0 + p.x.abs());
    let y_ok = (back.y - p.y).abs() <= tol * (1.0 + p.y.abs());
    assert!(x_ok && y_ok, "round trip of {p:?} gave {back:?}");
}

fn sample_points() -> Vec<Point> {
    let mut points = Vec::new();
    for i in 0..12 {
        for j in 1..10 {
            points.push(Point::new(-165.0 + 30.0 * f64::from(i), 0.5 * f64::from(j)));
        }
    }
    points
}

#[test]
fn identity_roundtrip() {
    for p in sample_points() {
        assert_roundtrip(&IdentityTransform, p, 0.0);
    }
}

#[test]
fn polar_roundtrip() {
    let polar = PolarTransform::degrees();
    for p in sample_points() {
        assert_roundtrip(&polar, p, 1e-12);
    }
    let radians = PolarTransform::radians();
    assert_roundtrip(&radians, Point::new(1.0, 2.0), 1e-12);
}

#[test]
fn affine_shear_roundtrip() {
    let shear = Affine2D::identity().skew_deg(30.0, 10.0).translate(3.0, -1.0);
    for p in sample_points() {
        assert_roundtrip(&shear, p, 1e-12);
    }
}

#[test]
fn composite_roundtrip() {
    let frame = Affine2D::identity().scale(2.0, 0.5).rotate_deg(15.0);
    let composite = PolarTransform::degrees().then(frame);
    for p in sample_points() {
        assert_roundtrip(&composite, p, 1e-9);
    }
}

#[test]
fn closure_transform_roundtrip() {
    // Longitude scaled by cos(latitude) keeps the equator undistorted.
    let sinusoidal = FnTransform::new(
        |p: Point| Point::new(p.x * p.y.to_radians().cos(), p.y),
        |p: Point| Point::new(p.x / p.y.to_radians().cos(), p.y),
    );
    for lat in [-60.0, -30.0, 0.0, 45.0] {
        assert_roundtrip(&sinusoidal, Point::new(120.0, lat), 1e-12);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_shear_roundtrip(
        shear_x in -60.0f64..60.0,
        shear_y in -30.0f64..30.0,
        x in -1e3f64..1e3,
        y in -1e3f64..1e3
    ) {
        let t = Affine2D::identity().skew_deg(shear_x, shear_y);
        prop_assume!(t.determinant().abs() > 0.1);
        let back = t.inverse(t.forward(Point::new(x, y)));
        prop_assert!((back.x - x).abs() < 1e-6 * (1.0 + x.abs()));
        prop_assert!((back.y - y).abs() < 1e-6 * (1.0 + y.abs()));
    }

    #[test]
    fn prop_polar_roundtrip(theta in -179.9f64..179.9, r in 1e-3f64..1e3) {
        let polar = PolarTransform::degrees();
        let back = polar.inverse(polar.forward(Point::new(theta, r)));
        prop_assert!((back.x - theta).abs() < 1e-9);
        prop_assert!((back.y - r).abs() < 1e-9 * (1.0 + r));
    }
}
