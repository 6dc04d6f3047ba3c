use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::{cross, left_normal};
use crate::math::{Point2, Vector2};

/// An infinite 2D line defined by an origin point and a unit direction.
///
/// The parametric form is: `P(t) = origin + t * direction`. Cut lines and
/// divider centrelines are expressed as `Line`s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    origin: Point2,
    direction: Vector2,
}

impl Line {
    /// Creates a new line from an origin and direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length.
    pub fn new(origin: Point2, direction: Vector2) -> Result<Self> {
        let len = direction.norm();
        if len < f64::EPSILON {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            origin,
            direction: direction / len,
        })
    }

    /// Line through `a` heading towards `b`.
    ///
    /// # Errors
    ///
    /// Returns an error if the two points coincide.
    pub fn through(a: Point2, b: Point2) -> Result<Self> {
        Self::new(a, b - a)
    }

    /// Vertical line `x = x`, directed upwards.
    #[must_use]
    pub fn vertical(x: f64) -> Self {
        Self {
            origin: Point2::new(x, 0.0),
            direction: Vector2::new(0.0, 1.0),
        }
    }

    /// Horizontal line `y = y`, directed to the right.
    #[must_use]
    pub fn horizontal(y: f64) -> Self {
        Self {
            origin: Point2::new(0.0, y),
            direction: Vector2::new(1.0, 0.0),
        }
    }

    /// Returns the origin point of the line.
    #[must_use]
    pub fn origin(&self) -> &Point2 {
        &self.origin
    }

    /// Returns the unit direction vector of the line.
    #[must_use]
    pub fn direction(&self) -> &Vector2 {
        &self.direction
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.origin + self.direction * t
    }

    /// Parameter of the orthogonal projection of `p` onto the line.
    #[must_use]
    pub fn project(&self, p: &Point2) -> f64 {
        (p - self.origin).dot(&self.direction)
    }

    /// Signed distance of `p` from the line, positive on the left.
    #[must_use]
    pub fn side_of(&self, p: &Point2) -> f64 {
        cross(&self.direction, &(p - self.origin))
    }

    /// Parallel line shifted by `distance` towards the left.
    #[must_use]
    pub fn offset(&self, distance: f64) -> Self {
        Self {
            origin: self.origin + left_normal(&self.direction) * distance,
            direction: self.direction,
        }
    }

    /// The same line with opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            origin: self.origin,
            direction: -self.direction,
        }
    }
}
