use std::f64::consts::PI;

use crate::error::{FrameError, GeometryError, Result};
use crate::geometry::{Arc, Edge, Polygon};
use crate::math::polygon_2d::left_normal;
use crate::math::{Epsilon, Point2, Vector2};
use crate::operations::frametify::{
    Direction, Ear2Frametify, Frametify, FrametifyStrategy, HalfKfc2Frametify, HalfKfcFrametify, KfcFrametify,
    SingleTrackFrametify, SlotRole,
};

/// Which frametify variant frames a shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Octagon,
    Arch,
    Circle,
    Free,
    Kfc,
    HalfKfc,
    HalfKfc2,
    Ear2,
    SingleTrack { hidden: Vec<Direction> },
}

/// An outer polygon together with the way it is framed.
///
/// Slot roles and hidden slots are taken from the frametify variant when
/// the shape is built, so a `Shape` always frames.
#[derive(Debug, Clone)]
pub struct Shape {
    kind: ShapeKind,
    polygon: Polygon,
    epsilon: Epsilon,
    slot_roles: Vec<SlotRole>,
    hidden: Vec<usize>,
}

impl Shape {
    /// # Errors
    ///
    /// Returns `GeometryError::MalformedPolygon` if the polygon does not fit
    /// the variant `kind` names.
    pub fn new(kind: ShapeKind, polygon: Polygon) -> Result<Self> {
        Self::with_epsilon(kind, polygon, Epsilon::DEFAULT)
    }

    /// # Errors
    ///
    /// See [`Shape::new`].
    pub fn with_epsilon(kind: ShapeKind, polygon: Polygon, epsilon: Epsilon) -> Result<Self> {
        let mut shape = Self {
            kind,
            polygon,
            epsilon,
            slot_roles: Vec::new(),
            hidden: Vec::new(),
        };
        let (roles, hidden) = {
            let strategy = shape.frametify()?;
            let roles: Vec<SlotRole> = (0..strategy.slot_count()).map(|s| strategy.slot_role(s)).collect();
            (roles, strategy.hidden_slots().to_vec())
        };
        shape.slot_roles = roles;
        shape.hidden = hidden;
        Ok(shape)
    }

    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for non-positive sizes.
    pub fn rectangle(origin: Point2, width: f64, height: f64) -> Result<Self> {
        Self::new(ShapeKind::Rectangle, Polygon::rectangle(origin, width, height)?)
    }

    /// A rectangle with its four corners cut at 45° by `chamfer`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` unless the chamfer fits inside
    /// both sides.
    pub fn octagon(origin: Point2, width: f64, height: f64, chamfer: f64) -> Result<Self> {
        if chamfer <= 0.0 || 2.0 * chamfer >= width.min(height) {
            return Err(GeometryError::Degenerate(format!(
                "chamfer {chamfer} does not fit a {width} x {height} octagon"
            ))
            .into());
        }
        let (x, y, c) = (origin.x, origin.y, chamfer);
        let polygon = Polygon::from_points(&[
            Point2::new(x + c, y),
            Point2::new(x + width - c, y),
            Point2::new(x + width, y + c),
            Point2::new(x + width, y + height - c),
            Point2::new(x + width - c, y + height),
            Point2::new(x + c, y + height),
            Point2::new(x, y + height - c),
            Point2::new(x, y + c),
        ])?;
        Self::new(ShapeKind::Octagon, polygon)
    }

    /// Straight sides of height `spring` under a semicircular head.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for non-positive sizes.
    pub fn arch(origin: Point2, width: f64, spring: f64) -> Result<Self> {
        Self::new(ShapeKind::Arch, arched(origin, width, spring)?)
    }

    /// The arch with a transom along the spring line.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for non-positive sizes.
    pub fn ear2(origin: Point2, width: f64, spring: f64) -> Result<Self> {
        Self::new(ShapeKind::Ear2, arched(origin, width, spring)?)
    }

    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for a non-positive radius.
    pub fn circle(center: Point2, radius: f64) -> Result<Self> {
        Self::new(ShapeKind::Circle, Polygon::circle(center, radius)?)
    }

    /// Any closed polygon, framed along every edge.
    ///
    /// # Errors
    ///
    /// See [`Shape::new`].
    pub fn free(polygon: Polygon) -> Result<Self> {
        Self::new(ShapeKind::Free, polygon)
    }

    /// Three lights of the given widths side by side.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for non-positive sizes.
    pub fn kfc(origin: Point2, lights: [f64; 3], height: f64) -> Result<Self> {
        Self::new(ShapeKind::Kfc, split_top(origin, &lights, height)?)
    }

    /// Two lights of the given widths side by side.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for non-positive sizes.
    pub fn half_kfc(origin: Point2, lights: [f64; 2], height: f64) -> Result<Self> {
        Self::new(ShapeKind::HalfKfc, split_top(origin, &lights, height)?)
    }

    /// An L: `width` wide up to `step_height`, then `upper_width` wide up
    /// to `height` on the left.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` unless the upper part is
    /// narrower and the step lies below the top.
    pub fn half_kfc2(origin: Point2, width: f64, height: f64, upper_width: f64, step_height: f64) -> Result<Self> {
        if !(0.0 < upper_width && upper_width < width && 0.0 < step_height && step_height < height) {
            return Err(GeometryError::Degenerate(format!(
                "step at {upper_width} x {step_height} does not fit a {width} x {height} L"
            ))
            .into());
        }
        let (x, y) = (origin.x, origin.y);
        let polygon = Polygon::from_points(&[
            Point2::new(x, y),
            Point2::new(x + width, y),
            Point2::new(x + width, y + step_height),
            Point2::new(x + upper_width, y + step_height),
            Point2::new(x + upper_width, y + height),
            Point2::new(x, y + height),
        ])?;
        Self::new(ShapeKind::HalfKfc2, polygon)
    }

    /// Two sliding sashes; `hidden` sides get no visible bar.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for non-positive sizes.
    pub fn single_track(origin: Point2, width: f64, height: f64, hidden: Vec<Direction>) -> Result<Self> {
        Self::new(
            ShapeKind::SingleTrack { hidden },
            Polygon::rectangle(origin, width, height)?,
        )
    }

    /// A single track with the default hidden side,
    /// [`Direction::DEFAULT_HIDDEN`].
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for non-positive sizes.
    pub fn single_track_default(origin: Point2, width: f64, height: f64) -> Result<Self> {
        Self::single_track(origin, width, height, Direction::DEFAULT_HIDDEN.to_vec())
    }

    #[must_use]
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    #[must_use]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    #[must_use]
    pub fn epsilon(&self) -> &Epsilon {
        &self.epsilon
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slot_roles.len()
    }

    /// Role of `slot`; slots past the end read as frame.
    #[must_use]
    pub fn slot_role(&self, slot: usize) -> SlotRole {
        self.slot_roles.get(slot).copied().unwrap_or(SlotRole::Frame)
    }

    #[must_use]
    pub fn is_hidden(&self, slot: usize) -> bool {
        self.hidden.contains(&slot)
    }

    /// The frametify variant for this shape.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::MalformedPolygon` if the polygon does not fit
    /// the variant.
    pub fn frametify(&self) -> Result<Box<dyn FrametifyStrategy + '_>> {
        let (p, eps) = (&self.polygon, self.epsilon);
        let strategy: Box<dyn FrametifyStrategy + '_> = match &self.kind {
            ShapeKind::Rectangle | ShapeKind::Octagon | ShapeKind::Arch | ShapeKind::Circle | ShapeKind::Free => {
                Box::new(Frametify::new(p).epsilon(eps))
            }
            ShapeKind::Kfc => Box::new(KfcFrametify::new(p)?.epsilon(eps)),
            ShapeKind::HalfKfc => Box::new(HalfKfcFrametify::new(p)?.epsilon(eps)),
            ShapeKind::HalfKfc2 => Box::new(HalfKfc2Frametify::new(p)?.epsilon(eps)),
            ShapeKind::Ear2 => Box::new(Ear2Frametify::new(p)?.epsilon(eps)),
            ShapeKind::SingleTrack { hidden } => Box::new(SingleTrackFrametify::new(p, hidden)?.epsilon(eps)),
        };
        Ok(strategy)
    }

    #[must_use]
    pub fn translate(&self, v: &Vector2) -> Self {
        Self {
            polygon: self.polygon.translate(v),
            ..self.clone()
        }
    }

    /// Moves straight edge `index` (and the collinear run it belongs to), or
    /// changes the rise of an arc edge with its ends kept.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the edge cannot move that far.
    pub fn drag_edge(&self, index: usize, delta: &Vector2) -> Result<Self> {
        self.reshaped(self.polygon.drag_edge(index, delta, &self.epsilon)?)
    }

    /// Moves divider `k` by the component of `delta` it can follow.
    ///
    /// KFC mullions slide along the top, the L mullion moves with the step
    /// and the arch transom moves the spring line. The single-track
    /// interlock stays at the bottom midpoint.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::NoDivider` if the shape has no movable divider
    /// `k`, and `GeometryError::Degenerate` if the move collapses an edge.
    pub fn drag_divider(&self, k: usize, delta: &Vector2) -> Result<Self> {
        let eps = &self.epsilon;
        let polygon = match (&self.kind, k) {
            (ShapeKind::Kfc, 0) | (ShapeKind::HalfKfc, 0) => self.polygon.slide_vertex(3, delta, eps)?,
            (ShapeKind::Kfc, 1) => self.polygon.slide_vertex(4, delta, eps)?,
            (ShapeKind::HalfKfc2, 0) => self.polygon.drag_edge(2, delta, eps)?,
            (ShapeKind::Ear2, 0) => raise_head(&self.polygon, delta, eps)?,
            _ => return Err(FrameError::NoDivider(k).into()),
        };
        self.reshaped(polygon)
    }

    fn reshaped(&self, polygon: Polygon) -> Result<Self> {
        Self::with_epsilon(self.kind.clone(), polygon, self.epsilon)
    }
}

fn arched(origin: Point2, width: f64, spring: f64) -> Result<Polygon> {
    if width <= 0.0 || spring <= 0.0 {
        return Err(GeometryError::Degenerate(format!("arch {width} wide with sides {spring} high")).into());
    }
    let (x, y, r) = (origin.x, origin.y, width / 2.0);
    Polygon::new(vec![
        Edge::segment(Point2::new(x, y), Point2::new(x + width, y)),
        Edge::segment(Point2::new(x + width, y), Point2::new(x + width, y + spring)),
        Edge::Arc(Arc::new(Point2::new(x + r, y + spring), r, 0.0, PI, false)?),
        Edge::segment(Point2::new(x, y + spring), Point2::new(x, y)),
    ])
}

/// A rectangle whose top is split into one piece per light, right to left.
fn split_top(origin: Point2, lights: &[f64], height: f64) -> Result<Polygon> {
    if height <= 0.0 || lights.iter().any(|w| *w <= 0.0) {
        return Err(GeometryError::Degenerate(format!("lights {lights:?} under height {height}")).into());
    }
    let width: f64 = lights.iter().sum();
    let (x, y) = (origin.x, origin.y);
    let mut points = vec![
        Point2::new(x, y),
        Point2::new(x + width, y),
        Point2::new(x + width, y + height),
    ];
    let mut right = x + width;
    for w in lights.iter().rev().take(lights.len() - 1) {
        right -= w;
        points.push(Point2::new(right, y + height));
    }
    points.push(Point2::new(x, y + height));
    Polygon::from_points(&points)
}

/// Moves the arched head of a four-edge arch square to its chord and
/// stretches the sides to follow.
fn raise_head(polygon: &Polygon, delta: &Vector2, eps: &Epsilon) -> Result<Polygon> {
    let edges = polygon.edges();
    let [right, head, left] = [&edges[1], &edges[2], &edges[3]];
    let chord = head.end() - head.start();
    let normal = left_normal(&chord.try_normalize(f64::EPSILON).ok_or(GeometryError::ZeroVector)?);
    let shift = normal * delta.dot(&normal);
    let head = head.translate(&shift);
    let right_side = Edge::segment(right.start(), head.start());
    let left_side = Edge::segment(head.end(), left.end());
    if right_side.length() <= eps.length
        || left_side.length() <= eps.length
        || right.start_tangent().dot(&right_side.start_tangent()) <= 0.0
    {
        return Err(GeometryError::Degenerate("transom would drop below the sill".to_owned()).into());
    }
    let moved = Polygon::with_epsilon(vec![edges[0], right_side, head, left_side], eps)?;
    Ok(moved.with_poly_id(polygon.poly_id()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::FenestraError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn builders_pick_their_variant() {
        let kfc = Shape::kfc(Point2::origin(), [800.0, 800.0, 800.0], 1500.0).unwrap();
        assert_eq!(kfc.polygon().len(), 6);
        assert_eq!(kfc.slot_count(), 8);
        assert_eq!(kfc.slot_role(7), SlotRole::Mullion);
        assert_abs_diff_eq!(kfc.polygon().edges()[3].start().x, 1600.0, epsilon = 1e-9);

        let half = Shape::half_kfc(Point2::origin(), [1000.0, 600.0], 1200.0).unwrap();
        assert_eq!(half.slot_count(), 6);

        let track = Shape::single_track(Point2::origin(), 2000.0, 1200.0, vec![Direction::Left]).unwrap();
        assert_eq!(track.slot_role(4), SlotRole::Interlock);
        assert!(track.is_hidden(3) && !track.is_hidden(1));
        let default_track = Shape::single_track_default(Point2::origin(), 2000.0, 1200.0).unwrap();
        assert_eq!(default_track.kind(), &ShapeKind::SingleTrack { hidden: vec![Direction::Right] });
        assert!(default_track.is_hidden(1));

        let octagon = Shape::octagon(Point2::origin(), 1000.0, 1000.0, 200.0).unwrap();
        assert_eq!(octagon.slot_count(), 8);
        assert!(Shape::octagon(Point2::origin(), 100.0, 100.0, 60.0).is_err());

        let ear = Shape::ear2(Point2::origin(), 1000.0, 600.0).unwrap();
        assert_eq!(ear.slot_count(), 5);
        assert_eq!(Shape::arch(Point2::origin(), 1000.0, 600.0).unwrap().slot_count(), 4);
        assert_eq!(Shape::circle(Point2::origin(), 500.0).unwrap().slot_count(), 1);
    }

    #[test]
    fn mismatched_polygon_is_rejected() {
        let rect = Polygon::rectangle(Point2::origin(), 100.0, 100.0).unwrap();
        let err = Shape::new(ShapeKind::Kfc, rect).unwrap_err();
        assert!(matches!(err, FenestraError::Geometry(GeometryError::MalformedPolygon(_))));
    }

    #[test]
    fn drag_kfc_mullion() {
        let kfc = Shape::kfc(Point2::origin(), [800.0, 800.0, 800.0], 1500.0).unwrap();
        let moved = kfc.drag_divider(0, &Vector2::new(100.0, 40.0)).unwrap();
        assert_abs_diff_eq!(moved.polygon().edges()[3].start().x, 1700.0, epsilon = 1e-9);
        let result = moved.frametify().unwrap().run(&[60.0], &[]).unwrap();
        let right = result.inner_polys.iter().find(|p| p.bbox().max.x > 2300.0).unwrap();
        assert_abs_diff_eq!(right.bbox().min.x, 1730.0, epsilon = 1e-9);
        assert!(kfc.drag_divider(2, &Vector2::new(1.0, 0.0)).is_err());
    }

    #[test]
    fn drag_l_step_and_arch_transom() {
        let l = Shape::half_kfc2(Point2::origin(), 1500.0, 2000.0, 800.0, 1000.0).unwrap();
        let moved = l.drag_divider(0, &Vector2::new(0.0, 150.0)).unwrap();
        assert_abs_diff_eq!(moved.polygon().edges()[2].start().y, 1150.0, epsilon = 1e-9);

        let ear = Shape::ear2(Point2::origin(), 1000.0, 600.0).unwrap();
        let raised = ear.drag_divider(0, &Vector2::new(30.0, 100.0)).unwrap();
        assert_abs_diff_eq!(raised.polygon().bbox().max.y, 1200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(raised.polygon().bbox().max.x, 1000.0, epsilon = 1e-9);
        assert!(ear.drag_divider(0, &Vector2::new(0.0, -700.0)).is_err());

        let track = Shape::single_track(Point2::origin(), 2000.0, 1200.0, vec![]).unwrap();
        assert!(matches!(
            track.drag_divider(0, &Vector2::new(10.0, 0.0)),
            Err(FenestraError::Frame(FrameError::NoDivider(0)))
        ));
    }

    #[test]
    fn translate_and_drag_edge() {
        let rect = Shape::rectangle(Point2::origin(), 1200.0, 1000.0).unwrap();
        let moved = rect.translate(&Vector2::new(10.0, 20.0));
        assert_abs_diff_eq!(moved.polygon().bbox().min.x, 10.0, epsilon = 1e-12);
        let wider = rect.drag_edge(1, &Vector2::new(300.0, 0.0)).unwrap();
        assert_abs_diff_eq!(wider.polygon().bbox().width(), 1500.0, epsilon = 1e-9);
        assert_eq!(wider.kind(), &ShapeKind::Rectangle);

        let arch = Shape::arch(Point2::origin(), 1000.0, 600.0).unwrap();
        let lower = arch.drag_edge(2, &Vector2::new(0.0, -250.0)).unwrap();
        assert_abs_diff_eq!(lower.polygon().bbox().max.y, 850.0, epsilon = 1e-9);
        assert_eq!(lower.kind(), &ShapeKind::Arch);
    }
}
