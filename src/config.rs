//! Grid layout configuration.
//!
//! Sampling densities and numeric limits used by the grid finder, the extreme
//! finder, the default locator and the angle estimator. Loaded from YAML with
//! defaults for every missing key:
//!
//! ```yaml
//! line_num_points: 100
//! extreme_finder:
//!   nx: 20
//!   ny: 20
//! locator:
//!   nbins: 10
//! angle:
//!   max_doublings: 64
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sampling grid of the default extreme finder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtremeFinderConfig {
    /// Samples across the rectilinear x range.
    #[serde(default = "default_samples")]
    pub nx: usize,

    /// Samples across the rectilinear y range.
    #[serde(default = "default_samples")]
    pub ny: usize,
}

fn default_samples() -> usize {
    20
}

impl Default for ExtremeFinderConfig {
    fn default() -> Self {
        Self {
            nx: default_samples(),
            ny: default_samples(),
        }
    }
}

/// Default locator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Maximum number of intervals between levels.
    #[serde(default = "default_nbins")]
    pub nbins: usize,
}

fn default_nbins() -> usize {
    10
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            nbins: default_nbins(),
        }
    }
}

/// Finite-difference settings of the angle estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AngleConfig {
    /// Step doublings per pass before a direction is declared degenerate.
    #[serde(default = "default_max_doublings")]
    pub max_doublings: u32,
}

fn default_max_doublings() -> u32 {
    64
}

impl Default for AngleConfig {
    fn default() -> Self {
        Self {
            max_doublings: default_max_doublings(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Points sampled along every gridline and floating axis line.
    #[serde(default = "default_line_num_points")]
    pub line_num_points: usize,

    /// Extreme finder sampling.
    #[serde(default)]
    pub extreme_finder: ExtremeFinderConfig,

    /// Default locator.
    #[serde(default)]
    pub locator: LocatorConfig,

    /// Angle estimator.
    #[serde(default)]
    pub angle: AngleConfig,
}

fn default_line_num_points() -> usize {
    100
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            line_num_points: default_line_num_points(),
            extreme_finder: ExtremeFinderConfig::default(),
            locator: LocatorConfig::default(),
            angle: AngleConfig::default(),
        }
    }
}

impl GridConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails, or
    /// [`Error::InvalidConfig`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse {
                line,
                message: e.to_string(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Checks that every sampling density can produce a line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.line_num_points < 2 {
            return Err(Error::InvalidConfig(format!(
                "line_num_points must be at least 2, got {}",
                self.line_num_points
            )));
        }
        if self.extreme_finder.nx < 2 || self.extreme_finder.ny < 2 {
            return Err(Error::InvalidConfig(format!(
                "extreme_finder samples must be at least 2, got {}x{}",
                self.extreme_finder.nx, self.extreme_finder.ny
            )));
        }
        if self.locator.nbins == 0 {
            return Err(Error::InvalidConfig("locator.nbins must be positive".to_string()));
        }
        if self.angle.max_doublings == 0 {
            return Err(Error::InvalidConfig("angle.max_doublings must be positive".to_string()));
        }
        Ok(())
    }
}
