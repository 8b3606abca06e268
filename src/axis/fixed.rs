//! Axis along an edge of the plot.

use crate::axes::AxesState;
use crate::grid_finder::{Coord, GridInfo, GridTick, Side};
use crate::transform::Affine2D;

use super::{AxisArtistHelper, AxisTick, GridHelperCurveLinear, TickIter, LOG_TARGET};

/// Ticks where the gridlines cross one edge of the plot.
///
/// The edge is straight, so tick angles are constant: ticks along left and
/// right edges have tangent 90 and normal 0, along bottom and top tangent 0
/// and normal 90. If the limits across the edge are inverted the ticks of
/// the opposite edge are used, which is where the requested edge is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAxisHelper {
    side: Side,
    nth_coord: Coord,
    nth_coord_ticks: Coord,
}

impl FixedAxisHelper {
    /// Helper for `side`, labeling the ticks of `nth_coord_ticks`.
    ///
    /// Without an explicit coordinate, bottom/top label the first coordinate
    /// and left/right the second.
    #[must_use]
    pub fn new(side: Side, nth_coord_ticks: Option<Coord>) -> Self {
        let nth_coord = if side.is_vertical() { Coord::Lat } else { Coord::Lon };
        Self {
            side,
            nth_coord,
            nth_coord_ticks: nth_coord_ticks.unwrap_or(nth_coord),
        }
    }

    /// Requested edge.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Coordinate whose ticks carry labels.
    #[must_use]
    pub fn nth_coord_ticks(&self) -> Coord {
        self.nth_coord_ticks
    }

    /// Edge whose ticks are drawn for the current limits.
    #[must_use]
    pub fn resolved_side(&self, axes: &AxesState) -> Side {
        let (lo, hi) = if self.side.is_vertical() { axes.xlim() } else { axes.ylim() };
        if lo > hi {
            self.side.opposite()
        } else {
            self.side
        }
    }

    /// `(normal, tangent)` in degrees.
    fn angles(&self) -> (f64, f64) {
        if self.side.is_vertical() {
            (0.0, 90.0)
        } else {
            (90.0, 0.0)
        }
    }

    fn major_ticks(&self, info: &GridInfo, side: Side) -> Vec<AxisTick> {
        let (angle_normal, angle_tangent) = self.angles();
        let labeled = self.nth_coord_ticks;
        let tick = |t: &GridTick, show_label: bool| AxisTick {
            location: t.location,
            angle_normal,
            angle_tangent,
            label: if show_label { t.label.clone() } else { String::new() },
        };
        [(labeled, true), (labeled.other(), false)]
            .into_iter()
            .flat_map(|(coord, show_label)| {
                info.coord(coord)
                    .ticks
                    .get(side)
                    .iter()
                    .map(move |t| tick(t, show_label))
            })
            .collect()
    }
}

impl AxisArtistHelper for FixedAxisHelper {
    fn nth_coord(&self) -> Coord {
        self.nth_coord
    }

    fn update_lim(&mut self, grid_helper: &mut GridHelperCurveLinear, axes: &AxesState) {
        grid_helper.update_lim(axes);
    }

    fn get_tick_transform(&self, axes: &AxesState) -> Affine2D {
        axes.trans_data()
    }

    fn get_tick_iterators(
        &self,
        grid_helper: &GridHelperCurveLinear,
        axes: &AxesState,
    ) -> (TickIter, TickIter) {
        let side = self.resolved_side(axes);
        let ticks = match grid_helper.grid_info() {
            Some(info) => self.major_ticks(info, side),
            None => {
                log::trace!(
                    target: LOG_TARGET,
                    "no grid snapshot for {} axis, computing one",
                    self.side
                );
                let info = grid_helper.grid_finder().get_grid_info(&axes.view_bbox());
                self.major_ticks(&info, side)
            }
        };
        (TickIter::from_vec(ticks), TickIter::empty())
    }
}
