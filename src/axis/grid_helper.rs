//! Owner of the grid finder and the shared grid snapshot.

use crate::angle::AngleEstimator;
use crate::axes::AxesState;
use crate::config::GridConfig;
use crate::error::Result;
use crate::geometry::Path;
use crate::grid_finder::{Coord, GridFinder, GridInfo, Side};
use crate::transform::CoordinateTransform;

use super::{FixedAxisHelper, FloatingAxisHelper, LOG_TARGET};

/// Tick family selector for [`GridHelperCurveLinear::get_gridlines`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Which {
    /// Major gridlines.
    #[default]
    Major,
    /// Minor gridlines (never produced).
    Minor,
    /// Major and minor.
    Both,
}

/// Gridline family selector for [`GridHelperCurveLinear::get_gridlines`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridAxis {
    /// Lines of constant first coordinate.
    X,
    /// Lines of constant second coordinate.
    Y,
    /// Both families.
    #[default]
    Both,
}

type Limits = ((f64, f64), (f64, f64));

/// Computes and caches the curvilinear grid of one plot.
///
/// The snapshot is replaced wholesale whenever the plot limits change or the
/// grid finder is reconfigured.
///
/// # Example
///
/// ```rust
/// use trueno_curvilinear::axes::AxesState;
/// use trueno_curvilinear::axis::{AxisArtistHelper, GridHelperCurveLinear};
/// use trueno_curvilinear::grid_finder::Side;
/// use trueno_curvilinear::transform::IdentityTransform;
///
/// let axes = AxesState::new((0.0, 10.0), (0.0, 10.0))?;
/// let mut grid = GridHelperCurveLinear::new(IdentityTransform);
/// let mut left = grid.new_fixed_axis(Side::Left, None);
/// left.update_lim(&mut grid, &axes);
///
/// let (major, minor) = left.get_tick_iterators(&grid, &axes);
/// assert!(major.count() > 0);
/// assert_eq!(minor.count(), 0);
/// # Ok::<(), trueno_curvilinear::Error>(())
/// ```
#[derive(Debug)]
pub struct GridHelperCurveLinear {
    grid_finder: GridFinder,
    angle_estimator: AngleEstimator,
    grid_info: Option<GridInfo>,
    old_limits: Option<Limits>,
}

impl GridHelperCurveLinear {
    /// Grid helper with default strategies.
    pub fn new(transform: impl CoordinateTransform + 'static) -> Self {
        Self::with_grid_finder(GridFinder::new(transform))
    }

    /// Grid helper with default strategies sized by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn from_config(
        transform: impl CoordinateTransform + 'static,
        config: &GridConfig,
    ) -> Result<Self> {
        let grid_finder = GridFinder::from_config(transform, config)?;
        Ok(Self {
            angle_estimator: AngleEstimator::from_config(&config.angle),
            ..Self::with_grid_finder(grid_finder)
        })
    }

    /// Grid helper around a configured grid finder.
    #[must_use]
    pub fn with_grid_finder(grid_finder: GridFinder) -> Self {
        Self {
            grid_finder,
            angle_estimator: AngleEstimator::default(),
            grid_info: None,
            old_limits: None,
        }
    }

    /// The grid finder.
    #[must_use]
    pub fn grid_finder(&self) -> &GridFinder {
        &self.grid_finder
    }

    /// Estimator used for floating axis tick angles.
    #[must_use]
    pub fn angle_estimator(&self) -> &AngleEstimator {
        &self.angle_estimator
    }

    /// Latest grid snapshot, if one has been computed.
    #[must_use]
    pub fn grid_info(&self) -> Option<&GridInfo> {
        self.grid_info.as_ref()
    }

    /// Reconfigure the grid finder and force the next
    /// [`update_lim`](Self::update_lim) to recompute.
    pub fn update_grid_finder(&mut self, f: impl FnOnce(&mut GridFinder)) {
        f(&mut self.grid_finder);
        self.old_limits = None;
    }

    /// Replace the transform and force recomputation.
    pub fn set_transform(&mut self, transform: impl CoordinateTransform + 'static) {
        self.update_grid_finder(|finder| finder.set_transform(transform));
    }

    /// Recompute the grid if the plot limits changed since the last call.
    pub fn update_lim(&mut self, axes: &AxesState) {
        let limits = (axes.xlim(), axes.ylim());
        if self.old_limits == Some(limits) {
            return;
        }
        log::trace!(target: LOG_TARGET, "recomputing grid for limits {limits:?}");
        self.grid_info = Some(self.grid_finder.get_grid_info(&axes.view_bbox()));
        self.old_limits = Some(limits);
    }

    /// Helper for an axis along `side`.
    ///
    /// `nth_coord` picks the coordinate whose ticks are labeled; by default
    /// the first coordinate on bottom/top and the second on left/right.
    #[must_use]
    pub fn new_fixed_axis(&self, side: Side, nth_coord: Option<Coord>) -> FixedAxisHelper {
        FixedAxisHelper::new(side, nth_coord)
    }

    /// Helper for an axis where `nth_coord` is held at `value`.
    #[must_use]
    pub fn new_floating_axis(&self, nth_coord: Coord, value: f64) -> FloatingAxisHelper {
        FloatingAxisHelper::new(nth_coord, value)
    }

    /// Gridlines of the latest snapshot, in data coordinates.
    #[must_use]
    pub fn get_gridlines(&self, which: Which, axis: GridAxis) -> Vec<Path> {
        let Some(info) = &self.grid_info else {
            return Vec::new();
        };
        if which == Which::Minor {
            return Vec::new();
        }
        let mut lines = Vec::new();
        if matches!(axis, GridAxis::X | GridAxis::Both) {
            lines.extend(info.lon.lines.iter().cloned());
        }
        if matches!(axis, GridAxis::Y | GridAxis::Both) {
            lines.extend(info.lat.lines.iter().cloned());
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_finder::FixedLocator;
    use crate::transform::{Affine2D, IdentityTransform};

    fn even_levels() -> FixedLocator {
        FixedLocator::new(vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0])
    }

    fn helper() -> GridHelperCurveLinear {
        let mut helper = GridHelperCurveLinear::new(IdentityTransform);
        helper.update_grid_finder(|finder| {
            finder.set_grid_locator(Coord::Lon, even_levels());
            finder.set_grid_locator(Coord::Lat, even_levels());
        });
        helper
    }

    #[test]
    fn test_gridlines_before_update_are_empty() {
        assert!(helper().get_gridlines(Which::Major, GridAxis::Both).is_empty());
    }

    #[test]
    fn test_gridlines_by_family() {
        let mut helper = helper();
        helper.update_lim(&AxesState::new((0.0, 10.0), (0.0, 10.0)).unwrap());
        assert_eq!(helper.get_gridlines(Which::Major, GridAxis::Both).len(), 12);
        assert_eq!(helper.get_gridlines(Which::Both, GridAxis::X).len(), 6);
        assert_eq!(helper.get_gridlines(Which::Major, GridAxis::Y).len(), 6);
        assert!(helper.get_gridlines(Which::Minor, GridAxis::Both).is_empty());
    }

    #[test]
    fn test_update_lim_skips_unchanged_limits() {
        let mut helper = helper();
        let axes = AxesState::new((0.0, 10.0), (0.0, 10.0)).unwrap();
        helper.update_lim(&axes);
        let first = helper.grid_info().cloned();

        // Same limits: the snapshot stays, even after the transform is
        // swapped behind the helper's back.
        helper.grid_finder = GridFinder::new(Affine2D::identity().scale(2.0, 2.0));
        helper.update_lim(&axes);
        assert_eq!(helper.grid_info().cloned(), first);

        helper.update_lim(&AxesState::new((0.0, 5.0), (0.0, 10.0)).unwrap());
        assert_ne!(helper.grid_info().cloned(), first);
    }

    #[test]
    fn test_set_transform_forces_recompute() {
        let mut helper = helper();
        let axes = AxesState::new((0.0, 10.0), (0.0, 10.0)).unwrap();
        helper.update_lim(&axes);
        let before = helper.grid_info().map(|info| info.extremes);

        helper.set_transform(Affine2D::identity().scale(2.0, 2.0));
        helper.update_lim(&axes);
        let after = helper.grid_info().map(|info| info.extremes);
        assert_ne!(before, after);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = GridConfig::default();
        config.line_num_points = 0;
        assert!(GridHelperCurveLinear::from_config(IdentityTransform, &config).is_err());
        let config = GridConfig::default();
        assert!(GridHelperCurveLinear::from_config(IdentityTransform, &config).is_ok());
    }
}
