//! Host plot state read by the grid helpers.
//!
//! The core never owns plot limits. Every query receives an [`AxesState`]
//! snapshot holding the current rectilinear limits and the display viewport
//! they are drawn into.

use crate::error::{Error, Result};
use crate::geometry::{Bbox, Point};
use crate::scale::{LinearScale, Scale};
use crate::transform::Affine2D;

/// Rectilinear axis limits plus the display rectangle of the axes.
///
/// Limits may be inverted (`xlim.0 > xlim.1`); the data transform then flips
/// that axis on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxesState {
    x_scale: LinearScale,
    y_scale: LinearScale,
    viewport: Bbox,
}

impl AxesState {
    /// Create axes state drawn into the unit viewport `[0, 1] x [0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns an error if either limit pair is empty or not finite.
    pub fn new(xlim: (f64, f64), ylim: (f64, f64)) -> Result<Self> {
        Self::with_viewport(xlim, ylim, Bbox::unit())
    }

    /// Create axes state drawn into `viewport` (display coordinates).
    ///
    /// # Errors
    ///
    /// Returns an error if a limit pair is empty or the viewport has zero area.
    pub fn with_viewport(xlim: (f64, f64), ylim: (f64, f64), viewport: Bbox) -> Result<Self> {
        if viewport.width() == 0.0 || viewport.height() == 0.0 {
            return Err(Error::ScaleDomain(
                "Viewport must have non-zero width and height".to_string(),
            ));
        }
        let x_scale = LinearScale::new(xlim, (viewport.x0, viewport.x1))?;
        let y_scale = LinearScale::new(ylim, (viewport.y0, viewport.y1))?;
        Ok(Self { x_scale, y_scale, viewport })
    }

    /// Current x limits as `(left, right)`.
    #[must_use]
    pub fn xlim(&self) -> (f64, f64) {
        self.x_scale.domain()
    }

    /// Current y limits as `(bottom, top)`.
    #[must_use]
    pub fn ylim(&self) -> (f64, f64) {
        self.y_scale.domain()
    }

    /// Display rectangle of the axes.
    #[must_use]
    pub fn viewport(&self) -> Bbox {
        self.viewport
    }

    /// The visible data region as a box `(x1, y1, x2, y2)`, orientation kept.
    #[must_use]
    pub fn view_bbox(&self) -> Bbox {
        let ((x1, x2), (y1, y2)) = (self.xlim(), self.ylim());
        Bbox::from_extents(x1, y1, x2, y2)
    }

    /// Data coordinates to display coordinates.
    #[must_use]
    pub fn trans_data(&self) -> Affine2D {
        Affine2D::from_values(
            self.x_scale.slope(),
            0.0,
            0.0,
            self.y_scale.slope(),
            self.x_scale.offset(),
            self.y_scale.offset(),
        )
    }

    /// Axes coordinates (`[0, 1]` across the viewport) to display coordinates.
    #[must_use]
    pub fn trans_axes(&self) -> Affine2D {
        let vp = self.viewport;
        Affine2D::from_values(vp.width(), 0.0, 0.0, vp.height(), vp.x0, vp.y0)
    }

    /// Map a display point to axes coordinates.
    #[must_use]
    pub fn display_to_axes(&self, p: Point) -> Point {
        let vp = self.viewport;
        Point::new((p.x - vp.x0) / vp.width(), (p.y - vp.y0) / vp.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_trans_data_maps_limits_to_viewport() {
        let viewport = Bbox::from_extents(100.0, 50.0, 500.0, 450.0);
        let axes = AxesState::with_viewport((0.0, 10.0), (-5.0, 5.0), viewport).unwrap();
        let a = axes.trans_data().transform_point(Point::new(2.5, 0.0));
        assert_relative_eq!(a.x, 200.0, epsilon = 1e-9);
        assert_relative_eq!(a.y, 250.0, epsilon = 1e-9);
        let corner = axes.trans_data().transform_point(Point::new(10.0, 5.0));
        assert_relative_eq!(corner.x, 500.0, epsilon = 1e-9);
        assert_relative_eq!(corner.y, 450.0, epsilon = 1e-9);
    }

    #[test]
    fn test_display_to_axes_inverts_trans_axes() {
        let viewport = Bbox::from_extents(10.0, 20.0, 110.0, 220.0);
        let axes = AxesState::with_viewport((0.0, 1.0), (0.0, 1.0), viewport).unwrap();
        let display = axes.trans_axes().transform_point(Point::new(0.25, 0.75));
        let back = axes.display_to_axes(display);
        assert_relative_eq!(back.x, 0.25, epsilon = 1e-12);
        assert_relative_eq!(back.y, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_inverted_limits() {
        let axes = AxesState::new((10.0, 0.0), (0.0, 1.0)).unwrap();
        assert_eq!(axes.xlim(), (10.0, 0.0));
        assert_relative_eq!(axes.trans_data().transform_point(Point::new(10.0, 0.0)).x, 0.0);
        assert_eq!(axes.view_bbox(), Bbox::from_extents(10.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_degenerate_limits_rejected() {
        assert!(AxesState::new((1.0, 1.0), (0.0, 1.0)).is_err());
        let flat = Bbox::from_extents(0.0, 0.0, 0.0, 1.0);
        assert!(AxesState::with_viewport((0.0, 1.0), (0.0, 1.0), flat).is_err());
    }
}
