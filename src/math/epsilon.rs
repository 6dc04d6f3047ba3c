use serde::{Deserialize, Serialize};

use super::Point2;

/// Tolerances used by every kernel operation.
///
/// A single value is threaded through offsets, frametify and splitting so
/// that tests can tighten or loosen the comparisons deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Epsilon {
    /// Distance below which two points are the same point (model units).
    pub length: f64,
    /// Sine of the angle below which two directions are parallel.
    pub angle: f64,
    /// Offset arcs with a smaller radius are replaced by their chord.
    pub small_arc: f64,
}

impl Epsilon {
    /// Tolerances tuned for millimetre-scale window geometry.
    pub const DEFAULT: Self = Self {
        length: 1e-6,
        angle: 1e-9,
        small_arc: 0.5,
    };

    /// Returns a copy with a different length tolerance.
    #[must_use]
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    /// Returns a copy with a different parallelism tolerance.
    #[must_use]
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Returns a copy with a different small-arc radius threshold.
    #[must_use]
    pub fn with_small_arc(mut self, small_arc: f64) -> Self {
        self.small_arc = small_arc;
        self
    }

    /// Whether `value` is zero within the length tolerance.
    #[must_use]
    pub fn is_zero(&self, value: f64) -> bool {
        value.abs() <= self.length
    }

    /// Whether two scalars are equal within the length tolerance.
    #[must_use]
    pub fn approx_eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.length
    }

    /// Whether two points coincide within the length tolerance.
    #[must_use]
    pub fn same_point(&self, a: &Point2, b: &Point2) -> bool {
        (a - b).norm() <= self.length
    }
}

impl Default for Epsilon {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn same_point_respects_length() {
        let eps = Epsilon::default();
        assert!(eps.same_point(&Point2::new(1.0, 1.0), &Point2::new(1.0, 1.0 + 1e-8)));
        assert!(!eps.same_point(&Point2::new(1.0, 1.0), &Point2::new(1.0, 1.001)));
        let loose = eps.with_length(0.01);
        assert!(loose.same_point(&Point2::new(1.0, 1.0), &Point2::new(1.0, 1.001)));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let eps: Epsilon = serde_json::from_str(r#"{"length": 0.001}"#).unwrap();
        assert!((eps.length - 0.001).abs() < 1e-15);
        assert!((eps.small_arc - Epsilon::DEFAULT.small_arc).abs() < 1e-15);
    }
}
