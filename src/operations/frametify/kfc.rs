use crate::error::Result;
use crate::geometry::{Line, Polygon};
use crate::math::Epsilon;

use super::basic::{chord_line, require_edges, square_through};
use super::strategy::FrametifyStrategy;

/// Three lights side by side under a top split at vertices 3 and 4.
///
/// Expects six edges: bottom, right, three top pieces, left. Mullions run
/// square to the top through vertices 3 and 4 (slots 6 and 7).
#[derive(Debug, Clone)]
pub struct KfcFrametify<'a> {
    outer: &'a Polygon,
    dividers: [Line; 2],
    epsilon: Epsilon,
}

impl<'a> KfcFrametify<'a> {
    /// # Errors
    ///
    /// Returns `GeometryError::MalformedPolygon` unless `outer` has six
    /// edges.
    pub fn new(outer: &'a Polygon) -> Result<Self> {
        require_edges(outer, 6, "KFC frame")?;
        Ok(Self {
            outer,
            dividers: [square_through(outer, 3)?, square_through(outer, 4)?],
            epsilon: Epsilon::DEFAULT,
        })
    }

    #[must_use]
    pub fn epsilon(mut self, epsilon: Epsilon) -> Self {
        self.epsilon = epsilon;
        self
    }
}

impl FrametifyStrategy for KfcFrametify<'_> {
    fn outer(&self) -> &Polygon {
        self.outer
    }

    fn epsilon(&self) -> &Epsilon {
        &self.epsilon
    }

    fn dividers(&self) -> &[Line] {
        &self.dividers
    }
}

/// Two lights under a top split at vertex 3.
///
/// Expects five edges: bottom, right, two top pieces, left. The mullion is
/// slot 5.
#[derive(Debug, Clone)]
pub struct HalfKfcFrametify<'a> {
    outer: &'a Polygon,
    dividers: [Line; 1],
    epsilon: Epsilon,
}

impl<'a> HalfKfcFrametify<'a> {
    /// # Errors
    ///
    /// Returns `GeometryError::MalformedPolygon` unless `outer` has five
    /// edges.
    pub fn new(outer: &'a Polygon) -> Result<Self> {
        require_edges(outer, 5, "half KFC frame")?;
        Ok(Self {
            outer,
            dividers: [square_through(outer, 3)?],
            epsilon: Epsilon::DEFAULT,
        })
    }

    #[must_use]
    pub fn epsilon(mut self, epsilon: Epsilon) -> Self {
        self.epsilon = epsilon;
        self
    }
}

impl FrametifyStrategy for HalfKfcFrametify<'_> {
    fn outer(&self) -> &Polygon {
        self.outer
    }

    fn epsilon(&self) -> &Epsilon {
        &self.epsilon
    }

    fn dividers(&self) -> &[Line] {
        &self.dividers
    }
}

/// An L-shaped opening whose step edge (edge 2, ending at the reflex
/// vertex 3) is continued by a mullion across the wide part.
///
/// Expects six edges; the mullion is slot 6.
#[derive(Debug, Clone)]
pub struct HalfKfc2Frametify<'a> {
    outer: &'a Polygon,
    dividers: [Line; 1],
    epsilon: Epsilon,
}

impl<'a> HalfKfc2Frametify<'a> {
    /// # Errors
    ///
    /// Returns `GeometryError::MalformedPolygon` unless `outer` has six
    /// edges.
    pub fn new(outer: &'a Polygon) -> Result<Self> {
        require_edges(outer, 6, "L-shaped frame")?;
        Ok(Self {
            outer,
            dividers: [chord_line(outer, 2)?],
            epsilon: Epsilon::DEFAULT,
        })
    }

    #[must_use]
    pub fn epsilon(mut self, epsilon: Epsilon) -> Self {
        self.epsilon = epsilon;
        self
    }
}

impl FrametifyStrategy for HalfKfc2Frametify<'_> {
    fn outer(&self) -> &Polygon {
        self.outer
    }

    fn epsilon(&self) -> &Epsilon {
        &self.epsilon
    }

    fn dividers(&self) -> &[Line] {
        &self.dividers
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{FenestraError, GeometryError};
    use crate::geometry::PolyId;
    use crate::math::Point2;
    use crate::operations::frametify::{FrameResult, SlotRole};
    use approx::assert_abs_diff_eq;

    fn area_of(result: &FrameResult) -> f64 {
        result.inner_polys.iter().map(Polygon::area).sum::<f64>()
            + result.bar_polys.iter().map(|b| b.polygon.area()).sum::<f64>()
    }

    fn kfc() -> Polygon {
        Polygon::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(2400.0, 0.0),
            Point2::new(2400.0, 1500.0),
            Point2::new(1600.0, 1500.0),
            Point2::new(800.0, 1500.0),
            Point2::new(0.0, 1500.0),
        ])
        .unwrap()
    }

    #[test]
    fn kfc_has_three_lights() {
        let outer = kfc();
        let f = KfcFrametify::new(&outer).unwrap();
        assert_eq!(f.slot_count(), 8);
        assert_eq!(f.slot_role(6), SlotRole::Mullion);

        let result = f.run(&[60.0], &[]).unwrap();
        assert_eq!(result.inner_polys.len(), 3);
        let mut widths: Vec<f64> = result.inner_polys.iter().map(|p| p.bbox().width()).collect();
        widths.sort_by(f64::total_cmp);
        // Outer lights lose 60 + 30, the middle one 30 + 30.
        assert_abs_diff_eq!(widths[0], 710.0, epsilon = 1e-9);
        assert_abs_diff_eq!(widths[1], 710.0, epsilon = 1e-9);
        assert_abs_diff_eq!(widths[2], 740.0, epsilon = 1e-9);

        assert_eq!(result.bar_polys.iter().filter(|b| b.slot() == 6).count(), 2);
        assert_eq!(result.bar_polys.iter().filter(|b| b.slot() == 7).count(), 2);
        assert!(result.bar_polys.iter().any(|b| b.polygon.poly_id() == PolyId::new(7, 1)));
        assert_abs_diff_eq!(area_of(&result), outer.area(), epsilon = 1e-6);
    }

    #[test]
    fn kfc_rejects_wrong_edge_count() {
        let rect = Polygon::rectangle(Point2::origin(), 100.0, 100.0).unwrap();
        let err = KfcFrametify::new(&rect).unwrap_err();
        assert!(matches!(err, FenestraError::Geometry(GeometryError::MalformedPolygon(_))));
    }

    #[test]
    fn half_kfc_has_two_lights() {
        let outer = Polygon::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(1600.0, 0.0),
            Point2::new(1600.0, 1200.0),
            Point2::new(1000.0, 1200.0),
            Point2::new(0.0, 1200.0),
        ])
        .unwrap();
        let result = HalfKfcFrametify::new(&outer).unwrap().run(&[60.0, 60.0, 60.0, 60.0, 60.0, 80.0], &[]).unwrap();
        assert_eq!(result.inner_polys.len(), 2);
        let left = result.inner_polys.iter().find(|p| p.bbox().min.x < 100.0).unwrap();
        assert_abs_diff_eq!(left.bbox().max.x, 960.0, epsilon = 1e-9);
        assert_abs_diff_eq!(area_of(&result), outer.area(), epsilon = 1e-6);
    }

    #[test]
    fn l_shape_mullion_continues_the_step() {
        let outer = Polygon::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(1500.0, 0.0),
            Point2::new(1500.0, 1000.0),
            Point2::new(800.0, 1000.0),
            Point2::new(800.0, 2000.0),
            Point2::new(0.0, 2000.0),
        ])
        .unwrap();
        let f = HalfKfc2Frametify::new(&outer).unwrap();
        let zones = f.zones().unwrap();
        assert_eq!(zones.len(), 2);
        let result = f.run(&[60.0], &[]).unwrap();
        assert_eq!(result.inner_polys.len(), 2);
        // The cavity under the mullion steps down to meet the wider frame.
        let lower = result.inner_polys.iter().find(|p| p.bbox().min.y < 100.0).unwrap();
        assert_abs_diff_eq!(lower.bbox().max.y, 970.0, epsilon = 1e-9);
        assert_eq!(lower.len(), 6);
        assert_abs_diff_eq!(area_of(&result), outer.area(), epsilon = 1e-6);
    }
}
