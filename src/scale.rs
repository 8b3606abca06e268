//! Scale functions for data-to-display mappings.
//!
//! The host plot maps its rectilinear axis limits onto a display viewport with
//! one linear scale per axis. [`crate::axes::AxesState`] builds its data and
//! axes transforms from these.

use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
///
/// An inverted domain (`min > max`) is valid and flips the mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty or not finite.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(Error::ScaleDomain("Domain bounds must be finite".to_string()));
        }
        if domain.0 == domain.1 {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Range units per domain unit.
    #[must_use]
    pub fn slope(&self) -> f64 {
        (self.range_max - self.range_min) / (self.domain_max - self.domain_min)
    }

    /// Range value at domain value zero.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.range_min - self.domain_min * self.slope()
    }

}

impl Scale<f64, f64> for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new((0.0, 100.0), (0.0, 500.0)).unwrap();
        assert!((scale.scale(50.0) - 250.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_scale_equal_domain() {
        assert!(LinearScale::new((5.0, 5.0), (0.0, 1.0)).is_err());
        assert!(LinearScale::new((0.0, f64::INFINITY), (0.0, 1.0)).is_err());
    }

    #[test]
    fn test_slope_offset_match_scale() {
        let scale = LinearScale::new((-2.0, 6.0), (100.0, 300.0)).unwrap();
        for v in [-2.0, 0.0, 1.5, 6.0] {
            let affine = scale.slope() * v + scale.offset();
            assert!((affine - scale.scale(v)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_inverted_domain() {
        let scale = LinearScale::new((10.0, 0.0), (0.0, 1.0)).unwrap();
        assert!(scale.slope() < 0.0);
        assert!((scale.scale(10.0)).abs() < 1e-12);
        assert!((scale.scale(0.0) - 1.0).abs() < 1e-12);
    }
}
