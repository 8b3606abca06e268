//! Axis helpers for curvilinear grids.
//!
//! An axis helper turns the grid computed by a [`GridHelperCurveLinear`] into
//! tick geometry for one drawn axis:
//!
//! - [`FixedAxisHelper`] runs along an edge of the plot and reads the shared
//!   grid snapshot.
//! - [`FloatingAxisHelper`] follows a line of constant curved coordinate
//!   through the plot and keeps its own single-line grid.
//!
//! Both implement [`AxisArtistHelper`]. The grid helper and the host
//! [`AxesState`] are passed in on every call.

mod fixed;
mod floating;
mod grid_helper;

pub use fixed::FixedAxisHelper;
pub use floating::{FloatingAxisHelper, FloatingGridInfo};
pub use grid_helper::{GridAxis, GridHelperCurveLinear, Which};

use crate::axes::AxesState;
use crate::geometry::Point;
use crate::grid_finder::Coord;
use crate::transform::Affine2D;

const LOG_TARGET: &str = "trueno_curvilinear::axis";

/// A tick ready for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    /// Tick position in the helper's tick coordinates.
    pub location: Point,
    /// Direction across the axis, in degrees.
    pub angle_normal: f64,
    /// Direction along the axis, in degrees.
    pub angle_tangent: f64,
    /// Label text; empty for unlabeled ticks.
    pub label: String,
}

/// Iterator over ticks produced by an axis helper.
pub struct TickIter {
    inner: Box<dyn Iterator<Item = AxisTick>>,
}

impl TickIter {
    /// Wrap any tick iterator.
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = AxisTick> + 'static,
    {
        Self {
            inner: Box::new(iter),
        }
    }

    /// Iterate over a vector of ticks.
    #[must_use]
    pub fn from_vec(ticks: Vec<AxisTick>) -> Self {
        Self::new(ticks.into_iter())
    }

    /// An iterator yielding no ticks.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }
}

impl Iterator for TickIter {
    type Item = AxisTick;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl std::fmt::Debug for TickIter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TickIter")
    }
}

/// Shared contract of the axis helper variants.
pub trait AxisArtistHelper {
    /// Curved coordinate this axis is tied to.
    fn nth_coord(&self) -> Coord;

    /// Bring cached grid state up to date with the current limits.
    fn update_lim(&mut self, grid_helper: &mut GridHelperCurveLinear, axes: &AxesState);

    /// Transform from tick locations to display coordinates.
    fn get_tick_transform(&self, axes: &AxesState) -> Affine2D;

    /// `(major, minor)` ticks. Minor ticks are never produced.
    fn get_tick_iterators(
        &self,
        grid_helper: &GridHelperCurveLinear,
        axes: &AxesState,
    ) -> (TickIter, TickIter);
}
