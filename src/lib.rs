//! # Trueno-Curvilinear
//!
//! Curvilinear grid layout for 2-D plotting surfaces.
//!
//! Given an invertible mapping between a curved coordinate space (polar,
//! geographic, sheared, ...) and the rectilinear data space of a plot, this
//! crate computes where gridlines and axis lines go, where ticks sit, which
//! direction they point, and what labels they carry. Drawing is left to the
//! caller.
//!
//! ## Components
//!
//! - **Angle estimation** ([`angle`]): tangent directions of coordinate curves
//!   by adaptive finite differences, robust to degenerate points such as the
//!   center of a polar plot.
//! - **Grid finding** ([`grid_finder`]): curved extremes, tick levels, labels,
//!   sampled gridlines and edge crossings for a bounding box.
//! - **Axis helpers** ([`axis`]): tick geometry for axes along the plot edges
//!   and for floating axes at a constant curved coordinate.
//!
//! ## Quick Start
//!
//! ```rust
//! use trueno_curvilinear::prelude::*;
//!
//! let axes = AxesState::new((-5.0, 5.0), (-5.0, 5.0))?;
//! let mut grid = GridHelperCurveLinear::new(PolarTransform::degrees());
//! grid.update_grid_finder(|finder| {
//!     let radii = Some((0.0, f64::INFINITY));
//!     finder.set_extreme_finder(ExtremeFinderCycle::new(20, 20).lat_minmax(radii));
//! });
//!
//! // Radial axis at 30 degrees.
//! let mut radial = grid.new_floating_axis(Coord::Lon, 30.0);
//! let line = radial.get_line(&mut grid, &axes);
//! assert_eq!(line.len(), 100);
//!
//! let (major, _minor) = radial.get_tick_iterators(&grid, &axes);
//! for tick in major {
//!     assert!((tick.angle_tangent - 30.0).abs() < 1e-3);
//! }
//! # Ok::<(), trueno_curvilinear::Error>(())
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade under the
//! `trueno_curvilinear` target. The library never installs a logger.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in numeric geometry code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Geometric primitives (points, segments, boxes, paths).
pub mod geometry;

/// Scale functions for data-to-display mappings.
pub mod scale;

/// Curved-to-rectilinear coordinate transforms.
pub mod transform;

/// Host plot limits and viewport.
pub mod axes;

// ============================================================================
// Grid Layout
// ============================================================================

/// Tangent angle estimation by finite differences.
pub mod angle;

/// Grid computation: extremes, locators, formatters, gridlines.
pub mod grid_finder;

/// Fixed and floating axis helpers.
pub mod axis;

// ============================================================================
// Configuration and Errors
// ============================================================================

/// YAML grid configuration.
pub mod config;

/// Error types for grid layout operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use trueno_curvilinear::prelude::*;
/// ```
pub mod prelude {
    pub use crate::angle::{AngleEstimate, AngleEstimator};
    pub use crate::axes::AxesState;
    pub use crate::axis::{
        AxisArtistHelper, AxisTick, FixedAxisHelper, FloatingAxisHelper, GridAxis,
        GridHelperCurveLinear, Which,
    };
    pub use crate::config::GridConfig;
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Bbox, Path, Point};
    pub use crate::grid_finder::{
        Coord, ExtremeFinderCycle, ExtremeFinderSimple, FixedLocator, GridFinder, GridInfo,
        MaxNLocator, ScalarFormatter, Side, TickLevels,
    };
    pub use crate::scale::{LinearScale, Scale};
    pub use crate::transform::{Affine2D, CoordinateTransform, IdentityTransform, PolarTransform};
}
