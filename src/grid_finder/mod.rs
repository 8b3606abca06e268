//! Grid computation for a curved coordinate system.
//!
//! [`GridFinder`] owns the curved-to-rectilinear transform and the pluggable
//! strategies (extreme finder, one locator and one formatter per curved
//! coordinate). For a rectilinear bounding box it produces a [`GridInfo`]:
//! tick levels and labels, sampled gridlines, and the ticks where each
//! gridline crosses each edge of the box.
//!
//! # Example
//!
//! ```rust
//! use trueno_curvilinear::geometry::Bbox;
//! use trueno_curvilinear::grid_finder::{FixedLocator, GridFinder, Side};
//! use trueno_curvilinear::transform::IdentityTransform;
//!
//! let finder = GridFinder::new(IdentityTransform)
//!     .with_grid_locator1(FixedLocator::new(vec![0.0, 5.0, 10.0]))
//!     .with_grid_locator2(FixedLocator::new(vec![0.0, 5.0, 10.0]));
//! let info = finder.get_grid_info(&Bbox::from_extents(0.0, 0.0, 10.0, 10.0));
//!
//! assert_eq!(info.lon.lines.len(), 3);
//! assert_eq!(info.lon.ticks.get(Side::Bottom).len(), 3);
//! assert_eq!(info.lon.ticks.get(Side::Bottom)[1].label, "5");
//! ```

mod extremes;
mod formatter;
mod locator;

pub use extremes::{ExtremeFinder, ExtremeFinderCycle, ExtremeFinderSimple};
pub use formatter::{ScalarFormatter, TickFormatter};
pub use locator::{nice_step, FixedLocator, GridLocator, MaxNLocator, TickLevels};

use std::fmt;

use crate::config::GridConfig;
use crate::error::Result;
use crate::geometry::{linspace, Bbox, Path, Point};
use crate::transform::CoordinateTransform;

const LOG_TARGET: &str = "trueno_curvilinear::grid_finder";

/// Relative growth of the plot box before edge crossings are searched, so
/// gridlines lying exactly on an edge still cross it.
const EDGE_TOLERANCE: f64 = 2e-10;

/// An edge of the plotting region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Minimum x edge.
    Left,
    /// Maximum x edge.
    Right,
    /// Minimum y edge.
    Bottom,
    /// Maximum y edge.
    Top,
}

impl Side {
    /// All sides in crossing-search order.
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Bottom, Side::Top];

    /// The facing edge.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Top => Side::Bottom,
        }
    }

    /// True for left and right.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Top => "top",
        })
    }
}

/// One of the two curved coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coord {
    /// First curved coordinate (index 0, e.g. longitude or angle).
    Lon,
    /// Second curved coordinate (index 1, e.g. latitude or radius).
    Lat,
}

impl Coord {
    /// The other coordinate.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Coord::Lon => Coord::Lat,
            Coord::Lat => Coord::Lon,
        }
    }

    /// `0` for [`Coord::Lon`], `1` for [`Coord::Lat`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Component of `p` holding this coordinate.
    #[must_use]
    pub const fn of(self, p: Point) -> f64 {
        match self {
            Coord::Lon => p.x,
            Coord::Lat => p.y,
        }
    }
}

/// A gridline crossing one edge of the plot box.
#[derive(Debug, Clone, PartialEq)]
pub struct GridTick {
    /// Tick level (pre-scaling) of the gridline.
    pub level: f64,
    /// Crossing point in rectilinear coordinates.
    pub location: Point,
    /// Direction of the gridline at the crossing, in degrees.
    pub angle: f64,
    /// Formatted label.
    pub label: String,
}

/// Ticks grouped by plot edge.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SideTicks {
    sides: [Vec<GridTick>; 4],
}

impl SideTicks {
    /// Ticks on `side`, in gridline order.
    #[must_use]
    pub fn get(&self, side: Side) -> &[GridTick] {
        &self.sides[side.index()]
    }

    fn get_mut(&mut self, side: Side) -> &mut Vec<GridTick> {
        &mut self.sides[side.index()]
    }

    /// Every side with its ticks.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &[GridTick])> {
        Side::ALL.into_iter().map(move |side| (side, self.get(side)))
    }
}

/// Grid description of one curved coordinate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoordGridInfo {
    /// Locator output over the curved extremes.
    pub levels: TickLevels,
    /// Labels of the levels in use (formatted for the bottom side).
    pub labels: Vec<String>,
    /// One sampled gridline per level in use.
    pub lines: Vec<Path>,
    /// Edge crossings of the gridlines.
    pub ticks: SideTicks,
}

/// Snapshot of a computed grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridInfo {
    /// Curved-space extents covering the plot box.
    pub extremes: Bbox,
    /// Gridlines of constant first coordinate.
    pub lon: CoordGridInfo,
    /// Gridlines of constant second coordinate.
    pub lat: CoordGridInfo,
}

impl GridInfo {
    /// The grid of `coord`.
    #[must_use]
    pub fn coord(&self, coord: Coord) -> &CoordGridInfo {
        match coord {
            Coord::Lon => &self.lon,
            Coord::Lat => &self.lat,
        }
    }
}

/// Finds where a polyline crosses the edges of `bbox`.
///
/// Returns `(location, angle_deg)` pairs per side in [`Side::ALL`] order.
fn find_line_box_crossings(line: &Path, bbox: &Bbox) -> [Vec<(Point, f64)>; 4] {
    let (lo, hi) = (bbox.min(), bbox.max());
    let mut crossings: [Vec<(Point, f64)>; 4] = Default::default();
    for side in Side::ALL {
        // `u` runs across the edge, `v` along it.
        let uv = |p: Point| if side.is_vertical() { (p.x, p.y) } else { (p.y, p.x) };
        let (u0, (vmin, vmax)) = match side {
            Side::Left => (lo.x, (lo.y, hi.y)),
            Side::Right => (hi.x, (lo.y, hi.y)),
            Side::Bottom => (lo.y, (lo.x, hi.x)),
            Side::Top => (hi.y, (lo.x, hi.x)),
        };
        let inside = |p: Point| {
            let u = uv(p).0;
            if matches!(side, Side::Left | Side::Bottom) { u > u0 } else { u < u0 }
        };
        for segment in line.segments() {
            if inside(segment.start) == inside(segment.end) {
                continue;
            }
            let ((ua, va), (ub, vb)) = (uv(segment.start), uv(segment.end));
            let v = va + (u0 - ua) * (vb - va) / (ub - ua);
            if !(vmin..=vmax).contains(&v) {
                continue;
            }
            let location = if side.is_vertical() { Point::new(u0, v) } else { Point::new(v, u0) };
            crossings[side.index()].push((location, segment.angle_deg()));
        }
    }
    crossings
}

/// Computes curvilinear grids for a transform.
pub struct GridFinder {
    transform: Box<dyn CoordinateTransform>,
    extreme_finder: Box<dyn ExtremeFinder>,
    grid_locator1: Box<dyn GridLocator>,
    grid_locator2: Box<dyn GridLocator>,
    tick_formatter1: Box<dyn TickFormatter>,
    tick_formatter2: Box<dyn TickFormatter>,
    line_num_points: usize,
}

impl fmt::Debug for GridFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridFinder")
            .field("line_num_points", &self.line_num_points)
            .finish_non_exhaustive()
    }
}

impl GridFinder {
    /// Grid finder with default strategies: a 20x20 [`ExtremeFinderSimple`],
    /// [`MaxNLocator`] and [`ScalarFormatter`] for both coordinates, and 100
    /// points per gridline.
    pub fn new(transform: impl CoordinateTransform + 'static) -> Self {
        let config = GridConfig::default();
        Self::with_defaults(Box::new(transform), &config)
    }

    /// Grid finder with default strategies sized by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn from_config(
        transform: impl CoordinateTransform + 'static,
        config: &GridConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_defaults(Box::new(transform), config))
    }

    fn with_defaults(transform: Box<dyn CoordinateTransform>, config: &GridConfig) -> Self {
        Self {
            transform,
            extreme_finder: Box::new(ExtremeFinderSimple::new(
                config.extreme_finder.nx,
                config.extreme_finder.ny,
            )),
            grid_locator1: Box::new(MaxNLocator::new(config.locator.nbins)),
            grid_locator2: Box::new(MaxNLocator::new(config.locator.nbins)),
            tick_formatter1: Box::new(ScalarFormatter),
            tick_formatter2: Box::new(ScalarFormatter),
            line_num_points: config.line_num_points,
        }
    }

    /// Replace the extreme finder.
    #[must_use]
    pub fn with_extreme_finder(mut self, finder: impl ExtremeFinder + 'static) -> Self {
        self.set_extreme_finder(finder);
        self
    }

    /// Replace the locator of the first coordinate.
    #[must_use]
    pub fn with_grid_locator1(mut self, locator: impl GridLocator + 'static) -> Self {
        self.set_grid_locator(Coord::Lon, locator);
        self
    }

    /// Replace the locator of the second coordinate.
    #[must_use]
    pub fn with_grid_locator2(mut self, locator: impl GridLocator + 'static) -> Self {
        self.set_grid_locator(Coord::Lat, locator);
        self
    }

    /// Replace the formatter of the first coordinate.
    #[must_use]
    pub fn with_tick_formatter1(mut self, formatter: impl TickFormatter + 'static) -> Self {
        self.set_tick_formatter(Coord::Lon, formatter);
        self
    }

    /// Replace the formatter of the second coordinate.
    #[must_use]
    pub fn with_tick_formatter2(mut self, formatter: impl TickFormatter + 'static) -> Self {
        self.set_tick_formatter(Coord::Lat, formatter);
        self
    }

    /// Set the number of points sampled along each gridline (at least 2).
    #[must_use]
    pub fn with_line_num_points(mut self, n: usize) -> Self {
        self.line_num_points = n.max(2);
        self
    }

    /// Replace the transform.
    pub fn set_transform(&mut self, transform: impl CoordinateTransform + 'static) {
        self.transform = Box::new(transform);
    }

    /// Replace the extreme finder.
    pub fn set_extreme_finder(&mut self, finder: impl ExtremeFinder + 'static) {
        self.extreme_finder = Box::new(finder);
    }

    /// Replace the locator of `coord`.
    pub fn set_grid_locator(&mut self, coord: Coord, locator: impl GridLocator + 'static) {
        match coord {
            Coord::Lon => self.grid_locator1 = Box::new(locator),
            Coord::Lat => self.grid_locator2 = Box::new(locator),
        }
    }

    /// Replace the formatter of `coord`.
    pub fn set_tick_formatter(&mut self, coord: Coord, formatter: impl TickFormatter + 'static) {
        match coord {
            Coord::Lon => self.tick_formatter1 = Box::new(formatter),
            Coord::Lat => self.tick_formatter2 = Box::new(formatter),
        }
    }

    /// The curved-to-rectilinear transform.
    #[must_use]
    pub fn transform(&self) -> &dyn CoordinateTransform {
        self.transform.as_ref()
    }

    /// Points sampled along each gridline.
    #[must_use]
    pub fn line_num_points(&self) -> usize {
        self.line_num_points
    }

    /// Curved-space extents covering the rectilinear `bbox`.
    #[must_use]
    pub fn find_extremes(&self, bbox: &Bbox) -> Bbox {
        self.extreme_finder.find_extremes(self.transform(), bbox)
    }

    /// Tick levels of `coord` over `[v1, v2]`.
    #[must_use]
    pub fn locate(&self, coord: Coord, v1: f64, v2: f64) -> TickLevels {
        match coord {
            Coord::Lon => self.grid_locator1.locate(v1, v2),
            Coord::Lat => self.grid_locator2.locate(v1, v2),
        }
    }

    /// Labels of `levels` of `coord` drawn on `side`.
    #[must_use]
    pub fn format_ticks(
        &self,
        coord: Coord,
        side: Side,
        factor: f64,
        levels: &[f64],
    ) -> Vec<String> {
        match coord {
            Coord::Lon => self.tick_formatter1.format(side, factor, levels),
            Coord::Lat => self.tick_formatter2.format(side, factor, levels),
        }
    }

    /// Compute the full grid for the rectilinear box `bbox`.
    #[must_use]
    pub fn get_grid_info(&self, bbox: &Bbox) -> GridInfo {
        let extremes = self.find_extremes(bbox);
        let (lo, hi) = (extremes.min(), extremes.max());

        let lon_levels = self.locate(Coord::Lon, lo.x, hi.x);
        let lat_levels = self.locate(Coord::Lat, lo.y, hi.y);
        log::trace!(
            target: LOG_TARGET,
            "grid for {bbox:?}: extremes {extremes:?}, {} lon / {} lat levels",
            lon_levels.count,
            lat_levels.count
        );

        let lats = linspace(lo.y, hi.y, self.line_num_points);
        let lons = linspace(lo.x, hi.x, self.line_num_points);
        let lon_lines = lon_levels
            .values()
            .into_iter()
            .map(|lon| self.sample_line(lats.iter().map(|&lat| Point::new(lon, lat))))
            .collect();
        let lat_lines = lat_levels
            .values()
            .into_iter()
            .map(|lat| self.sample_line(lons.iter().map(|&lon| Point::new(lon, lat))))
            .collect();

        let edges = bbox.expanded(1.0 + EDGE_TOLERANCE, 1.0 + EDGE_TOLERANCE);
        GridInfo {
            extremes,
            lon: self.coord_grid_info(Coord::Lon, lon_levels, lon_lines, &edges),
            lat: self.coord_grid_info(Coord::Lat, lat_levels, lat_lines, &edges),
        }
    }

    /// Map curved points along a gridline to a rectilinear path.
    pub(crate) fn sample_line(&self, curved: impl Iterator<Item = Point>) -> Path {
        Path::new(curved.map(|p| self.transform.forward(p)).collect())
    }

    fn coord_grid_info(
        &self,
        coord: Coord,
        levels: TickLevels,
        lines: Vec<Path>,
        edges: &Bbox,
    ) -> CoordGridInfo {
        let mut ticks = SideTicks::default();
        for (line, &level) in lines.iter().zip(levels.used()) {
            let crossings = find_line_box_crossings(line, edges);
            for (side, crossings) in Side::ALL.into_iter().zip(crossings) {
                ticks.get_mut(side).extend(crossings.into_iter().map(|(location, angle)| GridTick {
                    level,
                    location,
                    angle,
                    label: String::new(),
                }));
            }
        }

        for side in Side::ALL {
            let side_ticks = ticks.get_mut(side);
            let side_levels: Vec<f64> = side_ticks.iter().map(|t| t.level).collect();
            let labels = self.format_ticks(coord, side, levels.factor, &side_levels);
            if labels.len() != side_levels.len() {
                log::warn!(
                    target: LOG_TARGET,
                    "{coord:?} formatter returned {} labels for {} ticks on {side}",
                    labels.len(),
                    side_levels.len()
                );
            }
            for (tick, label) in side_ticks.iter_mut().zip(labels) {
                tick.label = label;
            }
        }

        let labels = self.format_ticks(coord, Side::Bottom, levels.factor, levels.used());
        CoordGridInfo { levels, labels, lines, ticks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Affine2D, IdentityTransform, PolarTransform};
    use approx::assert_relative_eq;

    fn even_levels() -> FixedLocator {
        FixedLocator::new(vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0])
    }

    #[test]
    fn test_crossings_horizontal_line() {
        let line = Path::new(vec![Point::new(-1.0, 5.0), Point::new(11.0, 5.0)]);
        let crossings = find_line_box_crossings(&line, &Bbox::from_extents(0.0, 0.0, 10.0, 10.0));
        assert_eq!(crossings[Side::Left.index()], vec![(Point::new(0.0, 5.0), 0.0)]);
        assert_eq!(crossings[Side::Right.index()], vec![(Point::new(10.0, 5.0), 0.0)]);
        assert!(crossings[Side::Bottom.index()].is_empty());
        assert!(crossings[Side::Top.index()].is_empty());
    }

    #[test]
    fn test_crossings_skip_outside_edge_span() {
        let line = Path::new(vec![Point::new(-1.0, 20.0), Point::new(11.0, 20.0)]);
        let crossings = find_line_box_crossings(&line, &Bbox::from_extents(0.0, 0.0, 10.0, 10.0));
        assert!(crossings.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_crossings_ignore_nan_vertices() {
        let line = Path::new(vec![
            Point::new(f64::NAN, 5.0),
            Point::new(5.0, 5.0),
            Point::new(11.0, 5.0),
        ]);
        let crossings = find_line_box_crossings(&line, &Bbox::from_extents(0.0, 0.0, 10.0, 10.0));
        assert!(crossings[Side::Left.index()].is_empty());
        assert_eq!(crossings[Side::Right.index()].len(), 1);
    }

    #[test]
    fn test_identity_grid() {
        let finder = GridFinder::new(IdentityTransform)
            .with_grid_locator1(even_levels())
            .with_grid_locator2(even_levels());
        let info = finder.get_grid_info(&Bbox::from_extents(0.0, 0.0, 10.0, 10.0));

        assert_eq!(info.lon.lines.len(), 6);
        assert_eq!(info.lat.lines.len(), 6);
        assert!(info.lon.lines.iter().all(|l| l.len() == 100));
        assert_eq!(info.lon.labels, vec!["0", "2", "4", "6", "8", "10"]);

        // Vertical lines cross bottom and top only.
        assert!(info.lon.ticks.get(Side::Left).is_empty());
        let bottom: Vec<f64> = info.lon.ticks.get(Side::Bottom).iter().map(|t| t.level).collect();
        assert_eq!(bottom, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        for tick in info.lon.ticks.get(Side::Top) {
            assert_relative_eq!(tick.location.y, 10.0, epsilon = 1e-8);
            assert_relative_eq!(tick.location.x, tick.level, epsilon = 1e-8);
            assert_relative_eq!(tick.angle, 90.0, epsilon = 1e-8);
        }

        let left: Vec<&str> = info
            .lat
            .ticks
            .get(Side::Left)
            .iter()
            .map(|t| t.label.as_str())
            .collect();
        assert_eq!(left, vec!["0", "2", "4", "6", "8", "10"]);
    }

    #[test]
    fn test_formatter_receives_side() {
        let finder = GridFinder::new(IdentityTransform)
            .with_grid_locator2(even_levels())
            .with_tick_formatter2(|side: Side, _: f64, levels: &[f64]| {
                levels.iter().map(|l| format!("{side}:{l}")).collect::<Vec<_>>()
            });
        let info = finder.get_grid_info(&Bbox::from_extents(0.0, 0.0, 10.0, 10.0));
        assert_eq!(info.lat.ticks.get(Side::Right)[0].label, "right:0");
        assert_eq!(info.lat.labels[1], "bottom:2");
    }

    #[test]
    fn test_scale_factor_divides_levels() {
        let finder = GridFinder::new(IdentityTransform)
            .with_grid_locator1(|_: f64, _: f64| TickLevels::new(vec![200.0, 500.0], 100.0));
        let info = finder.get_grid_info(&Bbox::from_extents(0.0, 0.0, 10.0, 10.0));
        let first = info.lon.lines[0].first().unwrap();
        assert_relative_eq!(first.x, 2.0, epsilon = 1e-12);
        assert_eq!(info.lon.labels, vec!["2", "5"]);
    }

    #[test]
    fn test_rotated_grid_crossing_angles() {
        let finder = GridFinder::new(Affine2D::identity().rotate_deg(30.0))
            .with_grid_locator1(FixedLocator::new(vec![0.0]));
        let info = finder.get_grid_info(&Bbox::from_extents(-5.0, -5.0, 5.0, 5.0));
        let top = info.lon.ticks.get(Side::Top);
        assert_eq!(top.len(), 1);
        // Line of constant lon, swept along +lat, rotated by 30 degrees.
        assert_relative_eq!(top[0].angle, 120.0, epsilon = 1e-8);
    }

    #[test]
    fn test_polar_grid_lines_are_circles() {
        let finder = GridFinder::new(PolarTransform::degrees())
            .with_extreme_finder(
                ExtremeFinderCycle::new(20, 20).lat_minmax(Some((0.0, f64::INFINITY))),
            )
            .with_grid_locator2(FixedLocator::new(vec![2.0]));
        let info = finder.get_grid_info(&Bbox::from_extents(-5.0, -5.0, 5.0, 5.0));
        assert_eq!(info.lat.lines.len(), 1);
        for p in info.lat.lines[0].vertices() {
            assert_relative_eq!(p.x.hypot(p.y), 2.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_side_helpers() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Top.opposite(), Side::Bottom);
        assert_eq!(Coord::Lon.other(), Coord::Lat);
        assert_eq!(Coord::Lat.index(), 1);
        assert_eq!(Side::Bottom.to_string(), "bottom");
    }
}
