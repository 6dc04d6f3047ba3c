use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::math::arc_2d::angle_of;
use crate::math::polygon_2d::{cross, point_in_polygon};
use crate::math::{Epsilon, Point2, Vector2};
use crate::operations::offset::rejoin_at;

use super::dock::{corner_kind, Docking};
use super::edge::{Arc, Edge};

/// Stable identity of a polygon across rebuilds and splits.
///
/// Two ids are equal iff both `index` and `pos` match. Serialized as
/// `{"idx": .., "pos": ..}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PolyId {
    #[serde(rename = "idx")]
    pub index: usize,
    pub pos: usize,
}

impl PolyId {
    #[must_use]
    pub fn new(index: usize, pos: usize) -> Self {
        Self { index, pos }
    }
}

/// Winding direction of a closed edge loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
}

impl Orientation {
    /// `+1.0` for counter-clockwise, `-1.0` for clockwise.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Clockwise => -1.0,
            Self::CounterClockwise => 1.0,
        }
    }

    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }

    fn from_signed_area(area: f64) -> Self {
        if area < 0.0 {
            Self::Clockwise
        } else {
            Self::CounterClockwise
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point2,
    pub max: Point2,
}

impl Aabb {
    fn from_points(points: impl IntoIterator<Item = Point2>) -> Self {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Self { min, max }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        nalgebra::center(&self.min, &self.max)
    }
}

/// Annulus parameters recognised by [`Polygon::ring`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub center: Point2,
    pub outer_radius: f64,
    pub inner_radius: f64,
}

/// An ordered, closed chain of edges.
///
/// Consecutive edges share an endpoint within the length tolerance the
/// polygon was built with, and the last edge ends where the first starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    edges: Vec<Edge>,
    orientation: Orientation,
    bbox: Aabb,
    poly_id: PolyId,
    is_mullion: bool,
}

impl Polygon {
    /// Builds a polygon with the default tolerances.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::MalformedPolygon` if `edges` is empty or does
    /// not close.
    pub fn new(edges: Vec<Edge>) -> Result<Self> {
        Self::with_epsilon(edges, &Epsilon::DEFAULT)
    }

    /// Builds a polygon, checking closure against `eps.length`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::MalformedPolygon` if `edges` is empty or does
    /// not close.
    pub fn with_epsilon(edges: Vec<Edge>, eps: &Epsilon) -> Result<Self> {
        if edges.is_empty() {
            return Err(
                GeometryError::MalformedPolygon("polygon needs at least one edge".to_owned()).into(),
            );
        }
        let n = edges.len();
        for i in 0..n {
            let j = (i + 1) % n;
            if !eps.same_point(&edges[i].end(), &edges[j].start()) {
                return Err(GeometryError::MalformedPolygon(format!(
                    "edge {i} ends at ({:.6}, {:.6}) but edge {j} starts at ({:.6}, {:.6})",
                    edges[i].end().x,
                    edges[i].end().y,
                    edges[j].start().x,
                    edges[j].start().y,
                ))
                .into());
            }
        }

        let area: f64 = edges.iter().map(Edge::area_term).sum();
        let bbox = Aabb::from_points(edges.iter().flat_map(Edge::bounding_points));
        Ok(Self {
            edges,
            orientation: Orientation::from_signed_area(area),
            bbox,
            poly_id: PolyId::default(),
            is_mullion: false,
        })
    }

    /// Closed polygon of straight segments through `points`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::MalformedPolygon` for fewer than 3 points.
    pub fn from_points(points: &[Point2]) -> Result<Self> {
        if points.len() < 3 {
            return Err(GeometryError::MalformedPolygon(format!(
                "{} points cannot enclose an area",
                points.len()
            ))
            .into());
        }
        let n = points.len();
        let edges = (0..n)
            .map(|i| Edge::segment(points[i], points[(i + 1) % n]))
            .collect();
        Self::new(edges)
    }

    /// Counter-clockwise rectangle with its lower-left corner at `origin`.
    ///
    /// Edges run bottom, right, top, left.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for a non-positive size.
    pub fn rectangle(origin: Point2, width: f64, height: f64) -> Result<Self> {
        if width <= 0.0 || height <= 0.0 {
            return Err(GeometryError::Degenerate(format!(
                "rectangle size {width} x {height} must be positive"
            ))
            .into());
        }
        Self::from_points(&[
            origin,
            Point2::new(origin.x + width, origin.y),
            Point2::new(origin.x + width, origin.y + height),
            Point2::new(origin.x, origin.y + height),
        ])
    }

    /// Single-edge full circle, counter-clockwise.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for a non-positive radius.
    pub fn circle(center: Point2, radius: f64) -> Result<Self> {
        Self::new(vec![Edge::Arc(Arc::circle(center, radius)?)])
    }

    /// Circular band between two concentric circles.
    ///
    /// The outer circle runs counter-clockwise from angle 0, a zero-width
    /// seam drops to the inner circle which runs clockwise, and the seam
    /// returns to the start.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` unless `0 < inner < outer`.
    pub fn annulus(center: Point2, outer_radius: f64, inner_radius: f64) -> Result<Self> {
        if inner_radius <= 0.0 || inner_radius >= outer_radius {
            return Err(GeometryError::Degenerate(format!(
                "annulus radii {inner_radius} and {outer_radius} must satisfy 0 < inner < outer"
            ))
            .into());
        }
        let outer = Arc::circle(center, outer_radius)?;
        let inner = Arc::new(center, inner_radius, 0.0, -TAU, true)?;
        Self::new(vec![
            Edge::Arc(outer),
            Edge::segment(outer.end(), inner.start()),
            Edge::Arc(inner),
            Edge::segment(inner.end(), outer.start()),
        ])
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }

    #[must_use]
    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Always false for a constructed polygon.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[must_use]
    pub fn bbox(&self) -> &Aabb {
        &self.bbox
    }

    #[must_use]
    pub fn poly_id(&self) -> PolyId {
        self.poly_id
    }

    #[must_use]
    pub fn is_mullion(&self) -> bool {
        self.is_mullion
    }

    #[must_use]
    pub fn with_poly_id(mut self, poly_id: PolyId) -> Self {
        self.poly_id = poly_id;
        self
    }

    #[must_use]
    pub fn with_mullion(mut self, is_mullion: bool) -> Self {
        self.is_mullion = is_mullion;
        self
    }

    pub fn set_poly_id(&mut self, poly_id: PolyId) {
        self.poly_id = poly_id;
    }

    /// Start point of every edge.
    #[must_use]
    pub fn vertices(&self) -> Vec<Point2> {
        self.edges.iter().map(Edge::start).collect()
    }

    /// Positive when counter-clockwise.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        self.edges.iter().map(Edge::area_term).sum()
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Boundary approximated by points within `tolerance`.
    #[must_use]
    pub fn flatten(&self, tolerance: f64) -> Vec<Point2> {
        self.edges.iter().flat_map(|e| e.flatten(tolerance)).collect()
    }

    /// Even-odd containment test. Points on the boundary may land on either
    /// side; use [`Polygon::is_strictly_inside`] to exclude them.
    #[must_use]
    pub fn contains_point(&self, p: &Point2) -> bool {
        let diag = (self.bbox.max - self.bbox.min).norm();
        let tolerance = (diag * 1e-6).max(1e-9);
        point_in_polygon(&self.flatten(tolerance), p)
    }

    #[must_use]
    pub fn distance_to_boundary(&self, p: &Point2) -> f64 {
        self.edges
            .iter()
            .map(|e| e.distance_to(p))
            .fold(f64::INFINITY, f64::min)
    }

    /// Inside and farther than `eps.length` from the boundary.
    #[must_use]
    pub fn is_strictly_inside(&self, p: &Point2, eps: &Epsilon) -> bool {
        self.distance_to_boundary(p) > eps.length && self.contains_point(p)
    }

    /// Dock kinds at both ends of every edge.
    #[must_use]
    pub fn docking(&self, eps: &Epsilon) -> Vec<Docking> {
        let n = self.edges.len();
        let corner = |i: usize| {
            let prev = &self.edges[(i + n - 1) % n];
            corner_kind(
                &prev.end_tangent(),
                &self.edges[i].start_tangent(),
                self.orientation,
                eps,
            )
        };
        (0..n)
            .map(|i| Docking {
                start: corner(i),
                end: corner((i + 1) % n),
            })
            .collect()
    }

    /// A single full-circle edge.
    #[must_use]
    pub fn is_circle(&self) -> bool {
        self.edges.len() == 1 && self.edges[0].is_full_circle()
    }

    /// Recognises the annulus layout produced by [`Polygon::annulus`].
    #[must_use]
    pub fn ring(&self) -> Option<Ring> {
        let [Edge::Arc(a), Edge::Segment(_), Edge::Arc(b), Edge::Segment(_)] = self.edges.as_slice() else {
            return None;
        };
        if !a.is_full_circle() || !b.is_full_circle() || (a.center - b.center).norm() > 1e-9 {
            return None;
        }
        if (a.radius - b.radius).abs() < 1e-9 {
            return None;
        }
        Some(Ring {
            center: a.center,
            outer_radius: a.radius.max(b.radius),
            inner_radius: a.radius.min(b.radius),
        })
    }

    #[must_use]
    pub fn translate(&self, v: &Vector2) -> Self {
        self.map_edges(|e| e.translate(v))
    }

    /// Rotates counter-clockwise by `angle` radians around `center`.
    #[must_use]
    pub fn rotate(&self, angle: f64, center: &Point2) -> Self {
        self.map_edges(|e| e.rotate(angle, center))
    }

    /// The same boundary travelled the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            edges: self.edges.iter().rev().map(Edge::reversed).collect(),
            orientation: self.orientation.flipped(),
            bbox: self.bbox,
            poly_id: self.poly_id,
            is_mullion: self.is_mullion,
        }
    }

    /// Returns this polygon with the requested winding.
    #[must_use]
    pub fn reoriented(self, orientation: Orientation) -> Self {
        if self.orientation == orientation {
            self
        } else {
            self.reversed()
        }
    }

    /// Moves a straight edge by `delta`, together with the collinear
    /// segments it continues, and re-resolves the two joints at the ends of
    /// the moved run.
    ///
    /// # Errors
    ///
    /// An arc edge keeps its ends and changes its radius instead; see
    /// [`Polygon::drag_arc`].
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the whole boundary is one line, or a neighbour would flip over. Offset
    /// errors surface when a moved joint can no longer be resolved.
    pub fn drag_edge(&self, index: usize, delta: &Vector2, eps: &Epsilon) -> Result<Self> {
        let n = self.edges.len();
        let edge = self.edge(index).ok_or_else(|| {
            GeometryError::Degenerate(format!("edge {index} out of range for {n} edges"))
        })?;
        if let Some(arc) = edge.as_arc() {
            return self.drag_arc(index, *arc, delta, eps);
        }
        let dir = edge.start_tangent();
        let origin = edge.start();
        let continues = |e: &Edge| {
            e.is_segment()
                && cross(&dir, &e.start_tangent()).abs() < eps.angle
                && dir.dot(&e.start_tangent()) > 0.0
                && cross(&dir, &(e.start() - origin)).abs() <= eps.length
        };

        let mut first = index;
        let mut last = index;
        let mut count = 1;
        while count < n && continues(&self.edges[(first + n - 1) % n]) {
            first = (first + n - 1) % n;
            count += 1;
        }
        while count < n && continues(&self.edges[(last + 1) % n]) {
            last = (last + 1) % n;
            count += 1;
        }
        if count == n {
            return Err(GeometryError::Degenerate("boundary is a single straight run".to_owned()).into());
        }

        let mut edges = self.edges.clone();
        for k in 0..count {
            let j = (first + k) % n;
            edges[j] = edges[j].translate(delta);
        }
        let edges = rejoin_at(&edges, first, true, eps)?;
        let after = (last + 1) % n;
        let edges = rejoin_at(&edges, after, true, eps)?;

        for j in [(first + n - 1) % n, after] {
            if flipped(&self.edges[j], &edges[j], eps) {
                return Err(GeometryError::Degenerate(format!(
                    "dragging edge {index} collapses edge {j}"
                ))
                .into());
            }
        }
        self.rebuilt(edges, eps)
    }

    /// Raises or flattens arc edge `index` by the component of `delta` along
    /// the arc's bulge. The ends stay put, so the neighbours are untouched
    /// and the radius follows the new rise.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for a full circle or when the
    /// arc would flatten onto or through its chord.
    pub fn drag_arc(&self, index: usize, arc: Arc, delta: &Vector2, eps: &Epsilon) -> Result<Self> {
        if arc.is_full_circle() {
            return Err(GeometryError::Degenerate(format!("edge {index} is a full circle")).into());
        }
        let (start, end) = (arc.start(), arc.end());
        let half = (end - start).norm() / 2.0;
        let chord_mid = nalgebra::center(&start, &end);
        let apex = arc.point_at(0.5);
        let bulge = (apex - chord_mid)
            .try_normalize(f64::EPSILON)
            .ok_or(GeometryError::ZeroVector)?;
        let rise = (apex - chord_mid).norm() + delta.dot(&bulge);
        if !rise.is_finite() || rise <= eps.length || half <= eps.length {
            return Err(GeometryError::Degenerate(format!(
                "dragging arc {index} flattens it onto its chord"
            ))
            .into());
        }
        let radius = (half * half + rise * rise) / (2.0 * rise);
        let center = chord_mid + bulge * (rise - radius);
        let dragged = Arc::new(
            center,
            radius,
            angle_of(&center, &start),
            angle_of(&center, &end),
            arc.clockwise,
        )?;
        let mut edges = self.edges.clone();
        edges[index] = Edge::Arc(dragged);
        self.rebuilt(edges, eps)
    }

    /// Slides the vertex at the start of edge `index` along the line of the
    /// two collinear segments it joins. Only the component of `delta` along
    /// that line is used.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the vertex does not join two
    /// collinear segments or would pass a neighbouring vertex.
    pub fn slide_vertex(&self, index: usize, delta: &Vector2, eps: &Epsilon) -> Result<Self> {
        let n = self.edges.len();
        if index >= n || n < 2 {
            return Err(GeometryError::Degenerate(format!(
                "vertex {index} out of range for {n} edges"
            ))
            .into());
        }
        let prev = (index + n - 1) % n;
        let (a, b) = (&self.edges[prev], &self.edges[index]);
        let dir = b.start_tangent();
        if !a.is_segment()
            || !b.is_segment()
            || cross(&a.start_tangent(), &dir).abs() >= eps.angle
            || a.start_tangent().dot(&dir) <= 0.0
        {
            return Err(GeometryError::Degenerate(format!(
                "vertex {index} does not join two collinear segments"
            ))
            .into());
        }

        let p = b.start() + dir * delta.dot(&dir);
        if (p - a.start()).dot(&dir) <= eps.length || (b.end() - p).dot(&dir) <= eps.length {
            return Err(GeometryError::Degenerate(format!(
                "vertex {index} would pass a neighbouring vertex"
            ))
            .into());
        }

        let mut edges = self.edges.clone();
        edges[prev] = Edge::segment(a.start(), p);
        edges[index] = Edge::segment(p, b.end());
        self.rebuilt(edges, eps)
    }

    fn map_edges(&self, f: impl Fn(&Edge) -> Edge) -> Self {
        let edges: Vec<Edge> = self.edges.iter().map(f).collect();
        let bbox = Aabb::from_points(edges.iter().flat_map(Edge::bounding_points));
        Self {
            edges,
            orientation: self.orientation,
            bbox,
            poly_id: self.poly_id,
            is_mullion: self.is_mullion,
        }
    }

    fn rebuilt(&self, edges: Vec<Edge>, eps: &Epsilon) -> Result<Self> {
        Ok(Self::with_epsilon(edges, eps)?
            .with_poly_id(self.poly_id)
            .with_mullion(self.is_mullion))
    }
}

/// Whether `after` reverses or swallows the edge `before` was.
fn flipped(before: &Edge, after: &Edge, eps: &Epsilon) -> bool {
    match (before, after) {
        (Edge::Segment(_), Edge::Segment(_)) => {
            after.length() <= eps.length || before.start_tangent().dot(&after.start_tangent()) <= 0.0
        }
        (Edge::Arc(a), Edge::Arc(b)) => (a.sweep() - b.sweep()).abs() > std::f64::consts::PI,
        _ => true,
    }
}
