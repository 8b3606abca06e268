//! Curved-space extents of a rectilinear bounding box.

use crate::geometry::{linspace, Bbox, Point};
use crate::transform::CoordinateTransform;

/// Finds the curved-coordinate box covering a rectilinear box.
pub trait ExtremeFinder {
    /// Curved-space box containing every point of `bbox` mapped through
    /// `transform.inverse`. Extents are returned sorted (`x0 <= x1`,
    /// `y0 <= y1`), or `NaN` when no sample maps to a finite point.
    fn find_extremes(&self, transform: &dyn CoordinateTransform, bbox: &Bbox) -> Bbox;
}

impl<T: ExtremeFinder + ?Sized> ExtremeFinder for Box<T> {
    fn find_extremes(&self, transform: &dyn CoordinateTransform, bbox: &Bbox) -> Bbox {
        (**self).find_extremes(transform, bbox)
    }
}

fn nan_bbox() -> Bbox {
    Bbox::from_extents(f64::NAN, f64::NAN, f64::NAN, f64::NAN)
}

/// `nx * ny` sample points spread evenly over `bbox`, inverted into curved space.
fn sample_inverse(
    transform: &dyn CoordinateTransform,
    bbox: &Bbox,
    nx: usize,
    ny: usize,
) -> Vec<Point> {
    let xs = linspace(bbox.x0, bbox.x1, nx);
    let ys = linspace(bbox.y0, bbox.y1, ny);
    ys.iter()
        .flat_map(|&y| xs.iter().map(move |&x| Point::new(x, y)))
        .map(|p| transform.inverse(p))
        .collect()
}

/// Samples the box on a regular grid and pads the result.
///
/// The curved extents are widened by `2 / nx` and `2 / ny` of their size so
/// that gridlines reach past the plot edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtremeFinderSimple {
    nx: usize,
    ny: usize,
}

impl Default for ExtremeFinderSimple {
    fn default() -> Self {
        Self::new(20, 20)
    }
}

impl ExtremeFinderSimple {
    /// Sample `nx` by `ny` points (each at least 2).
    #[must_use]
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            nx: nx.max(2),
            ny: ny.max(2),
        }
    }

    /// Samples per axis as `(nx, ny)`.
    #[must_use]
    pub fn samples(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    fn padding(&self) -> (f64, f64) {
        (1.0 + 2.0 / self.nx as f64, 1.0 + 2.0 / self.ny as f64)
    }
}

impl ExtremeFinder for ExtremeFinderSimple {
    fn find_extremes(&self, transform: &dyn CoordinateTransform, bbox: &Bbox) -> Bbox {
        let (sw, sh) = self.padding();
        Bbox::from_points(sample_inverse(transform, bbox, self.nx, self.ny))
            .map_or_else(nan_bbox, |b| b.expanded(sw, sh))
    }
}

/// Extreme finder for cyclic coordinates such as angles and longitudes.
///
/// Samples farther than half a cycle above the smallest sample are shifted
/// down by one cycle before the extents are taken, so a view straddling the
/// wrap point gets one contiguous range. The padded range is then limited to
/// one cycle and clamped to the optional min/max bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremeFinderCycle {
    simple: ExtremeFinderSimple,
    lon_cycle: Option<f64>,
    lat_cycle: Option<f64>,
    lon_minmax: Option<(f64, f64)>,
    lat_minmax: Option<(f64, f64)>,
}

impl ExtremeFinderCycle {
    /// Geographic defaults: longitude cycles every 360, latitude is clamped
    /// to `[-90, 90]`.
    #[must_use]
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            simple: ExtremeFinderSimple::new(nx, ny),
            lon_cycle: Some(360.0),
            lat_cycle: None,
            lon_minmax: None,
            lat_minmax: Some((-90.0, 90.0)),
        }
    }

    /// Set the period of the first coordinate (`None` for non-cyclic).
    #[must_use]
    pub fn lon_cycle(mut self, cycle: Option<f64>) -> Self {
        self.lon_cycle = cycle;
        self
    }

    /// Set the period of the second coordinate (`None` for non-cyclic).
    #[must_use]
    pub fn lat_cycle(mut self, cycle: Option<f64>) -> Self {
        self.lat_cycle = cycle;
        self
    }

    /// Clamp the first coordinate to `(min, max)`.
    #[must_use]
    pub fn lon_minmax(mut self, minmax: Option<(f64, f64)>) -> Self {
        self.lon_minmax = minmax;
        self
    }

    /// Clamp the second coordinate to `(min, max)`.
    #[must_use]
    pub fn lat_minmax(mut self, minmax: Option<(f64, f64)>) -> Self {
        self.lat_minmax = minmax;
        self
    }
}

fn unwrap_cycle(values: &mut [f64], cycle: f64) {
    let v0 = values.iter().copied().filter(|v| !v.is_nan()).fold(f64::INFINITY, f64::min);
    for v in values.iter_mut() {
        if *v - v0 > cycle / 2.0 {
            *v -= cycle;
        }
    }
}

fn clamp_range(min: f64, max: f64, cycle: Option<f64>, minmax: Option<(f64, f64)>) -> (f64, f64) {
    let max = cycle.map_or(max, |c| max.min(min + c));
    match minmax {
        Some((lo, hi)) => (min.max(lo), max.min(hi)),
        None => (min, max),
    }
}

impl ExtremeFinder for ExtremeFinderCycle {
    fn find_extremes(&self, transform: &dyn CoordinateTransform, bbox: &Bbox) -> Bbox {
        let (nx, ny) = self.simple.samples();
        let samples = sample_inverse(transform, bbox, nx, ny);
        let mut lon: Vec<f64> = samples.iter().map(|p| p.x).collect();
        let mut lat: Vec<f64> = samples.iter().map(|p| p.y).collect();
        if let Some(cycle) = self.lon_cycle {
            unwrap_cycle(&mut lon, cycle);
        }
        if let Some(cycle) = self.lat_cycle {
            unwrap_cycle(&mut lat, cycle);
        }

        let (sw, sh) = self.simple.padding();
        let Some(tbbox) = Bbox::from_points(lon.into_iter().zip(lat).map(Point::from)) else {
            return nan_bbox();
        };
        let tbbox = tbbox.expanded(sw, sh);
        let (lon_min, lon_max) = clamp_range(tbbox.x0, tbbox.x1, self.lon_cycle, self.lon_minmax);
        let (lat_min, lat_max) = clamp_range(tbbox.y0, tbbox.y1, self.lat_cycle, self.lat_minmax);
        Bbox::from_extents(lon_min, lat_min, lon_max, lat_max)
    }
}
