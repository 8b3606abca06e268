//! Geometric primitives for grid layout.
//!
//! Provides the point, segment, bounding box and path types shared by the
//! transforms, the grid finder and the axis helpers. All coordinates are `f64`:
//! finite differencing in [`crate::angle`] needs the full mantissa.

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True if both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Line {
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
}

impl Line {
    /// Create a new line segment.
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Direction of the segment in degrees, measured from +x.
    #[must_use]
    pub fn angle_deg(&self) -> f64 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x).to_degrees()
    }
}

/// An axis-aligned bounding box given by two corners.
///
/// The corners are stored as given, so a box built from inverted plot limits
/// (`x0 > x1`) keeps that orientation. [`Bbox::min`] and [`Bbox::max`] always
/// return the sorted corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbox {
    /// First x extent.
    pub x0: f64,
    /// First y extent.
    pub y0: f64,
    /// Second x extent.
    pub x1: f64,
    /// Second y extent.
    pub y1: f64,
}

impl Bbox {
    /// Create a box from its extents `(x0, y0, x1, y1)`.
    #[must_use]
    pub const fn from_extents(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// The unit square `[0, 1] x [0, 1]`.
    #[must_use]
    pub const fn unit() -> Self {
        Self::from_extents(0.0, 0.0, 1.0, 1.0)
    }

    /// Smallest box containing every finite point; `None` if there is none.
    ///
    /// Non-finite points are skipped, so transforms that return `NaN` outside
    /// their domain do not poison the result.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        points
            .into_iter()
            .filter(|p| p.is_finite())
            .fold(None, |acc: Option<Self>, p| {
                Some(match acc {
                    None => Self::from_extents(p.x, p.y, p.x, p.y),
                    Some(b) => Self::from_extents(
                        b.x0.min(p.x),
                        b.y0.min(p.y),
                        b.x1.max(p.x),
                        b.y1.max(p.y),
                    ),
                })
            })
    }

    /// Lower-left corner (sorted).
    #[must_use]
    pub fn min(&self) -> Point {
        Point::new(self.x0.min(self.x1), self.y0.min(self.y1))
    }

    /// Upper-right corner (sorted).
    #[must_use]
    pub fn max(&self) -> Point {
        Point::new(self.x0.max(self.x1), self.y0.max(self.y1))
    }

    /// Signed width `x1 - x0`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Signed height `y1 - y0`.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Scale the box about its center by `sw` horizontally and `sh` vertically.
    #[must_use]
    pub fn expanded(&self, sw: f64, sh: f64) -> Self {
        let dx = self.width() * (sw - 1.0) / 2.0;
        let dy = self.height() * (sh - 1.0) / 2.0;
        Self::from_extents(self.x0 - dx, self.y0 - dy, self.x1 + dx, self.y1 + dy)
    }
}

/// An open polyline in some coordinate space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    vertices: Vec<Point>,
}

impl Path {
    /// Create a path from its vertices.
    #[must_use]
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Vertices in drawing order.
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True if the path has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Consecutive segments of the path.
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.vertices.windows(2).map(|w| Line::new(w[0], w[1]))
    }

    /// First vertex.
    #[must_use]
    pub fn first(&self) -> Option<Point> {
        self.vertices.first().copied()
    }

    /// Last vertex.
    #[must_use]
    pub fn last(&self) -> Option<Point> {
        self.vertices.last().copied()
    }
}

/// `steps` evenly spaced values from `start` to `end`, both included.
///
/// Fewer than two steps yields just the endpoints that fit.
#[must_use]
pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (steps as f64 - 1.0);
            (0..steps)
                .map(|i| if i == steps - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_angle() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(0.0, 2.0));
        assert!((line.angle_deg() - 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_bbox_sorted_corners() {
        let bbox = Bbox::from_extents(10.0, 0.0, 0.0, 5.0);
        assert_eq!(bbox.min(), Point::new(0.0, 0.0));
        assert_eq!(bbox.max(), Point::new(10.0, 5.0));
        assert!((bbox.width() + 10.0).abs() < 1e-12);
        assert!((bbox.height() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_bbox_expanded() {
        let bbox = Bbox::from_extents(0.0, 0.0, 10.0, 20.0).expanded(1.1, 1.5);
        assert!((bbox.x0 + 0.5).abs() < 1e-12);
        assert!((bbox.x1 - 10.5).abs() < 1e-12);
        assert!((bbox.y0 + 5.0).abs() < 1e-12);
        assert!((bbox.y1 - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_bbox_from_points_skips_nan() {
        let bbox = Bbox::from_points([
            Point::new(1.0, 2.0),
            Point::new(f64::NAN, 100.0),
            Point::new(-3.0, 4.0),
        ])
        .unwrap();
        assert_eq!(bbox, Bbox::from_extents(-3.0, 2.0, 1.0, 4.0));
        assert!(Bbox::from_points([Point::new(f64::NAN, 0.0)]).is_none());
    }

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(-0.5, 10.5, 100);
        assert_eq!(v.len(), 100);
        assert_eq!(v[0], -0.5);
        assert_eq!(v[99], 10.5);
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
        assert!(linspace(1.0, 2.0, 0).is_empty());
    }

    #[test]
    fn test_path_segments() {
        let path = Path::new(vec![
            Point::ORIGIN,
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ]);
        assert_eq!(path.len(), 3);
        assert_eq!(path.segments().count(), 2);
        assert_eq!(path.last(), Some(Point::new(1.0, 1.0)));
    }
}
