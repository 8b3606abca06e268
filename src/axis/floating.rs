//! Axis following a line of constant curved coordinate.

use crate::axes::AxesState;
use crate::error::{Error, Result};
use crate::geometry::{linspace, Bbox, Path, Point};
use crate::grid_finder::{Coord, Side, TickLevels};
use crate::transform::{Affine2D, CoordinateTransform};

use super::{AxisArtistHelper, AxisTick, GridHelperCurveLinear, TickIter, LOG_TARGET};

/// Relative tolerance of the axes-square test for ticks.
const AXES_RTOL: f64 = 1e-10;

fn in_unit_interval_close(v: f64) -> bool {
    (-AXES_RTOL..=1.0 + AXES_RTOL).contains(&v)
}

/// Private grid of a floating axis.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingGridInfo {
    /// Curved extents with the free coordinate clamped.
    pub extremes: Bbox,
    /// Levels of the first coordinate.
    pub lon_levels: TickLevels,
    /// Levels of the second coordinate.
    pub lat_levels: TickLevels,
    /// Labels of the first coordinate's levels in use.
    pub lon_labels: Vec<String>,
    /// Labels of the second coordinate's levels in use.
    pub lat_labels: Vec<String>,
    /// The axis line in data coordinates.
    pub line: Path,
}

impl FloatingGridInfo {
    /// Levels of `coord`.
    #[must_use]
    pub fn levels(&self, coord: Coord) -> &TickLevels {
        match coord {
            Coord::Lon => &self.lon_levels,
            Coord::Lat => &self.lat_levels,
        }
    }

    /// Labels of `coord`.
    #[must_use]
    pub fn labels(&self, coord: Coord) -> &[String] {
        match coord {
            Coord::Lon => &self.lon_labels,
            Coord::Lat => &self.lat_labels,
        }
    }
    /// True if the allowed range of the free coordinate misses the view.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }
}

/// An axis where `nth_coord` is held at `value` and the other coordinate
/// sweeps the visible range, optionally limited by [`set_extremes`].
///
/// Tick positions and angles are computed in display space, so the helper's
/// tick and label transforms are the identity.
///
/// [`set_extremes`]: FloatingAxisHelper::set_extremes
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingAxisHelper {
    nth_coord: Coord,
    value: f64,
    extremes: (f64, f64),
    grid: Option<FloatingGridInfo>,
}

impl FloatingAxisHelper {
    /// Axis at `nth_coord == value`, unbounded.
    #[must_use]
    pub fn new(nth_coord: Coord, value: f64) -> Self {
        Self {
            nth_coord,
            value,
            extremes: (f64::NEG_INFINITY, f64::INFINITY),
            grid: None,
        }
    }

    /// Anchored value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Allowed range of the free coordinate.
    #[must_use]
    pub fn extremes(&self) -> (f64, f64) {
        self.extremes
    }

    /// Limit the free coordinate to `[low, high]`; `None` leaves that side
    /// unbounded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExtremes`] if a bound is NaN or `low > high`.
    pub fn set_extremes(&mut self, low: Option<f64>, high: Option<f64>) -> Result<()> {
        let low = low.unwrap_or(f64::NEG_INFINITY);
        let high = high.unwrap_or(f64::INFINITY);
        if low.is_nan() || high.is_nan() || low > high {
            return Err(Error::InvalidExtremes { low, high });
        }
        self.extremes = (low, high);
        Ok(())
    }

    /// Latest private grid, if computed.
    #[must_use]
    pub fn grid_info(&self) -> Option<&FloatingGridInfo> {
        self.grid.as_ref()
    }

    fn point(&self, free: f64) -> Point {
        match self.nth_coord {
            Coord::Lon => Point::new(self.value, free),
            Coord::Lat => Point::new(free, self.value),
        }
    }

    fn compute_grid(
        &self,
        grid_helper: &GridHelperCurveLinear,
        axes: &AxesState,
    ) -> FloatingGridInfo {
        let finder = grid_helper.grid_finder();
        let found = finder.find_extremes(&axes.view_bbox());
        let (lo, hi) = (found.min(), found.max());
        let (mut lon, mut lat) = ((lo.x, hi.x), (lo.y, hi.y));

        // Comparisons keep NaN extents as NaN.
        let (e0, e1) = self.extremes;
        let free = match self.nth_coord {
            Coord::Lon => &mut lat,
            Coord::Lat => &mut lon,
        };
        let (free_min, free_max) = (
            if e0 > free.0 { e0 } else { free.0 },
            if e1 < free.1 { e1 } else { free.1 },
        );

        if free_min > free_max {
            // The allowed range misses the view: collapse it and draw nothing.
            log::debug!(
                target: LOG_TARGET,
                "floating axis {:?} = {} has no visible extent",
                self.nth_coord,
                self.value
            );
            *free = (free_min, free_min);
            return FloatingGridInfo {
                extremes: Bbox::from_extents(lon.0, lat.0, lon.1, lat.1),
                lon_levels: TickLevels::default(),
                lat_levels: TickLevels::default(),
                lon_labels: Vec::new(),
                lat_labels: Vec::new(),
                line: Path::default(),
            };
        }
        *free = (free_min, free_max);

        let lon_levels = finder.locate(Coord::Lon, lon.0, lon.1);
        let lat_levels = finder.locate(Coord::Lat, lat.0, lat.1);
        let samples = linspace(free_min, free_max, finder.line_num_points());
        let line = finder.sample_line(samples.into_iter().map(|v| self.point(v)));

        FloatingGridInfo {
            extremes: Bbox::from_extents(lon.0, lat.0, lon.1, lat.1),
            lon_labels: finder.format_ticks(
                Coord::Lon,
                Side::Bottom,
                lon_levels.factor,
                lon_levels.used(),
            ),
            lat_labels: finder.format_ticks(
                Coord::Lat,
                Side::Bottom,
                lat_levels.factor,
                lat_levels.used(),
            ),
            lon_levels,
            lat_levels,
            line,
        }
    }

    fn with_grid<T>(
        &self,
        grid_helper: &GridHelperCurveLinear,
        axes: &AxesState,
        f: impl FnOnce(&FloatingGridInfo) -> T,
    ) -> T {
        match &self.grid {
            Some(grid) => f(grid),
            None => f(&self.compute_grid(grid_helper, axes)),
        }
    }

    /// Recompute the grid and return the axis line in data coordinates.
    pub fn get_line(&mut self, grid_helper: &mut GridHelperCurveLinear, axes: &AxesState) -> Path {
        self.update_lim(grid_helper, axes);
        self.grid.as_ref().map(|grid| grid.line.clone()).unwrap_or_default()
    }

    /// Transform of [`get_line`](Self::get_line) output to display space.
    #[must_use]
    pub fn get_line_transform(&self, axes: &AxesState) -> Affine2D {
        axes.trans_data()
    }

    /// Display position and angle (degrees) of the axis label, anchored at
    /// the middle of the free coordinate's extent.
    ///
    /// `None` if the anchor is outside the axes or its direction is
    /// undefined.
    #[must_use]
    pub fn get_axislabel_pos_angle(
        &self,
        grid_helper: &GridHelperCurveLinear,
        axes: &AxesState,
    ) -> Option<(Point, f64)> {
        self.with_grid(grid_helper, axes, |grid| {
            if grid.is_empty() {
                return None;
            }
            let (lo, hi) = (grid.extremes.min(), grid.extremes.max());
            let anchor = match self.nth_coord {
                Coord::Lon => Point::new(self.value, (lo.y + hi.y) / 2.0),
                Coord::Lat => Point::new((lo.x + hi.x) / 2.0, self.value),
            };
            let to_display = display_fn(grid_helper, axes);
            let estimate = grid_helper.angle_estimator().estimate_points(
                &to_display,
                &[anchor],
                (lo.x, hi.x),
                (lo.y, hi.y),
            );

            let position = *estimate.values.first()?;
            let p = axes.display_to_axes(position);
            if !((0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y)) {
                return None;
            }
            let angle = match self.nth_coord {
                Coord::Lon => estimate.angle_dy.first(),
                Coord::Lat => estimate.angle_dx.first(),
            }?;
            angle.is_finite().then(|| (position, angle.to_degrees()))
        })
    }

    /// Transform of the label anchor to display space.
    #[must_use]
    pub fn get_axislabel_transform(&self, _axes: &AxesState) -> Affine2D {
        Affine2D::identity()
    }
}

/// Curved coordinates to display coordinates.
fn display_fn<'a>(
    grid_helper: &'a GridHelperCurveLinear,
    axes: &AxesState,
) -> impl Fn(Point) -> Point + 'a {
    let trans_data = axes.trans_data();
    let transform = grid_helper.grid_finder().transform();
    move |p| trans_data.transform_point(transform.forward(p))
}

impl AxisArtistHelper for FloatingAxisHelper {
    fn nth_coord(&self) -> Coord {
        self.nth_coord
    }

    fn update_lim(&mut self, grid_helper: &mut GridHelperCurveLinear, axes: &AxesState) {
        grid_helper.update_lim(axes);
        log::trace!(
            target: LOG_TARGET,
            "updating floating axis {:?} = {}",
            self.nth_coord,
            self.value
        );
        self.grid = Some(self.compute_grid(grid_helper, axes));
    }

    fn get_tick_transform(&self, _axes: &AxesState) -> Affine2D {
        Affine2D::identity()
    }

    fn get_tick_iterators(
        &self,
        grid_helper: &GridHelperCurveLinear,
        axes: &AxesState,
    ) -> (TickIter, TickIter) {
        let ticks = self.with_grid(grid_helper, axes, |grid| {
            let free = self.nth_coord.other();
            let (e0, e1) = self.extremes;
            let (values, labels): (Vec<f64>, Vec<String>) = grid
                .levels(free)
                .values()
                .into_iter()
                .zip(grid.labels(free).iter().cloned())
                .filter(|(v, _)| e0 <= *v && *v <= e1)
                .unzip();

            let points: Vec<Point> = values.iter().map(|&v| self.point(v)).collect();
            let unbounded = (f64::NEG_INFINITY, f64::INFINITY);
            let (xlim, ylim) = match self.nth_coord {
                Coord::Lon => (unbounded, self.extremes),
                Coord::Lat => (self.extremes, unbounded),
            };
            let to_display = display_fn(grid_helper, axes);
            let estimate = grid_helper
                .angle_estimator()
                .estimate_points(&to_display, &points, xlim, ylim);
            let (normals, tangents) = match self.nth_coord {
                Coord::Lon => (&estimate.angle_dx, &estimate.angle_dy),
                Coord::Lat => (&estimate.angle_dy, &estimate.angle_dx),
            };

            let mut ticks = Vec::with_capacity(points.len());
            for (((&location, &normal), &tangent), label) in
                estimate.values.iter().zip(normals).zip(tangents).zip(labels)
            {
                let p = axes.display_to_axes(location);
                if !(in_unit_interval_close(p.x) && in_unit_interval_close(p.y)) {
                    continue;
                }
                if !(normal.is_finite() && tangent.is_finite()) {
                    log::debug!(target: LOG_TARGET, "dropping tick {label:?} with undefined angle");
                    continue;
                }
                ticks.push(AxisTick {
                    location,
                    angle_normal: normal.to_degrees(),
                    angle_tangent: tangent.to_degrees(),
                    label,
                });
            }
            ticks
        });
        (TickIter::from_vec(ticks), TickIter::empty())
    }
}
