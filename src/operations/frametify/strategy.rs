use std::collections::BTreeMap;

use crate::error::{FrameError, Result};
use crate::geometry::{Edge, Line, Orientation, PolyId, Polygon};
use crate::math::Epsilon;
use crate::operations::offset::{broadcast, close_steps, find_parallel_edges};

use super::bar::{ring_bar, Bar, ZoneOutline};
use super::joint::{resolve_corner, Corner, CornerSide, JointWay};
use super::zone::{SlotRole, Zone};

/// Bars and cavities produced by one frametify run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameResult {
    pub inner_polys: Vec<Polygon>,
    pub bar_polys: Vec<Bar>,
}

/// Frames an outer polygon: bars along every slot, cavities inside.
///
/// Slots `0..outer().len()` are the outer edges; the following slots are the
/// dividers, one per [`dividers`](Self::dividers) line. Shape variants only
/// say where their dividers run; zoning, offsets and bar construction are
/// shared.
pub trait FrametifyStrategy {
    fn outer(&self) -> &Polygon;

    fn epsilon(&self) -> &Epsilon;

    /// Centrelines of the dividers, in slot order.
    fn dividers(&self) -> &[Line] {
        &[]
    }

    fn divider_role(&self) -> SlotRole {
        SlotRole::Mullion
    }

    /// Slots framed with zero width whose bars are virtual.
    fn hidden_slots(&self) -> &[usize] {
        &[]
    }

    fn slot_count(&self) -> usize {
        self.outer().len() + self.dividers().len()
    }

    fn slot_role(&self, slot: usize) -> SlotRole {
        if slot < self.outer().len() {
            SlotRole::Frame
        } else {
            self.divider_role()
        }
    }

    /// Partitions the outer polygon along the dividers.
    ///
    /// # Errors
    ///
    /// Returns a `SplitError` if a divider cuts a zone badly.
    fn zones(&self) -> Result<Vec<Zone>> {
        let n = self.outer().len();
        let mut zones = vec![Zone::whole(self.outer())];
        for (k, line) in self.dividers().iter().enumerate() {
            let mut next = Vec::with_capacity(zones.len() + 1);
            for zone in zones {
                next.extend(zone.divide(line, n + k, self.epsilon())?);
            }
            zones = next;
        }
        Ok(zones)
    }

    /// Cavities left inside the bars, one per zone.
    ///
    /// # Errors
    ///
    /// Returns an `OffsetError` if an offset degenerates or the widths do
    /// not match the slots.
    fn inner_polygons(&self, offsets: &[f64]) -> Result<Vec<Polygon>> {
        let eps = self.epsilon();
        let widths = slot_widths(self, offsets)?;
        self.zones()?
            .iter()
            .enumerate()
            .map(|(z, zone)| {
                let inner = offset_zone(self, zone, &widths)?.inner;
                Ok(Polygon::with_epsilon(close_steps(inner, true, eps), eps)?
                    .with_poly_id(PolyId::new(z, 0)))
            })
            .collect()
    }

    /// One bar per zone edge, ordered by `PolyId`.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::InvalidJointWay` for a joint way the corner
    /// cannot take and an `OffsetError` if an offset degenerates.
    fn bar_polygons(&self, offsets: &[f64], joint_ways: &[JointWay]) -> Result<Vec<Bar>> {
        let eps = self.epsilon();
        let widths = slot_widths(self, offsets)?;
        let ways = slot_joint_ways(joint_ways, self.slot_count())?;
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        let mut bars = Vec::new();

        for zone in self.zones()? {
            let frame = offset_zone(self, &zone, &widths)?;
            let mut push = |k: usize, polygon: Polygon| {
                let slot = zone.slots[k];
                let pos = counts.entry(slot).or_default();
                bars.push(Bar {
                    polygon: polygon
                        .reoriented(Orientation::CounterClockwise)
                        .with_poly_id(PolyId::new(slot, *pos)),
                    is_virtual: self.hidden_slots().contains(&slot),
                });
                *pos += 1;
            };

            let corners = zone_corners(self, &zone, &frame.widths, &ways)?;
            if zone.polygon.is_circle() {
                if let Some(ring) = ring_bar(&zone.polygon, &frame.inner, eps)? {
                    push(0, ring);
                }
                continue;
            }

            let outline = ZoneOutline {
                zone: &zone.polygon,
                inner: &frame.inner,
                corners: &corners,
                widths: &frame.widths,
            };
            for k in 0..zone.polygon.len() {
                if let Some(bar) = outline.create_bar(k, eps)? {
                    push(k, bar);
                }
            }
        }
        bars.sort_by_key(|b| b.polygon.poly_id());
        Ok(bars)
    }

    /// Checks every corner against its joint way without building bars.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::InvalidJointWay` for the first corner that
    /// cannot take its joint way.
    fn check_joint_ways(&self, offsets: &[f64], joint_ways: &[JointWay]) -> Result<()> {
        let widths = slot_widths(self, offsets)?;
        let ways = slot_joint_ways(joint_ways, self.slot_count())?;
        for zone in self.zones()? {
            let zone_widths = edge_widths(self, &zone, &widths);
            zone_corners(self, &zone, &zone_widths, &ways)?;
        }
        Ok(())
    }

    /// Builds both cavities and bars.
    ///
    /// # Errors
    ///
    /// See [`inner_polygons`](Self::inner_polygons) and
    /// [`bar_polygons`](Self::bar_polygons).
    fn run(&self, offsets: &[f64], joint_ways: &[JointWay]) -> Result<FrameResult> {
        let result = FrameResult {
            inner_polys: self.inner_polygons(offsets)?,
            bar_polys: self.bar_polygons(offsets, joint_ways)?,
        };
        tracing::debug!(
            "framed {} slots: {} bars, {} cavities",
            self.slot_count(),
            result.bar_polys.len(),
            result.inner_polys.len()
        );
        Ok(result)
    }
}

struct ZoneFrame {
    widths: Vec<f64>,
    inner: Vec<Edge>,
}

/// Per-slot widths, broadcast from a single value; hidden slots get zero.
fn slot_widths<S: FrametifyStrategy + ?Sized>(strategy: &S, offsets: &[f64]) -> Result<Vec<f64>> {
    let mut widths = broadcast(offsets, strategy.slot_count())?;
    for (slot, &width) in widths.iter().enumerate() {
        if !width.is_finite() || width < 0.0 {
            return Err(FrameError::InvalidWidth { slot, width }.into());
        }
    }
    for &slot in strategy.hidden_slots() {
        if let Some(w) = widths.get_mut(slot) {
            *w = 0.0;
        }
    }
    Ok(widths)
}

fn slot_joint_ways(joint_ways: &[JointWay], n: usize) -> Result<Vec<JointWay>> {
    match joint_ways.len() {
        0 => Ok(vec![JointWay::Default; n]),
        1 => Ok(vec![joint_ways[0]; n]),
        len if len == n => Ok(joint_ways.to_vec()),
        found => Err(FrameError::JointWayCount { expected: n, found }.into()),
    }
}

/// Offset of each zone edge: dividers give each side half their width.
fn edge_widths<S: FrametifyStrategy + ?Sized>(strategy: &S, zone: &Zone, widths: &[f64]) -> Vec<f64> {
    zone.slots
        .iter()
        .map(|&slot| {
            let w = widths.get(slot).copied().unwrap_or(0.0);
            if strategy.slot_role(slot).is_divider() {
                w / 2.0
            } else {
                w
            }
        })
        .collect()
}

fn offset_zone<S: FrametifyStrategy + ?Sized>(strategy: &S, zone: &Zone, widths: &[f64]) -> Result<ZoneFrame> {
    let widths = edge_widths(strategy, zone, widths);
    let inner = find_parallel_edges(
        zone.polygon.edges(),
        &widths,
        true,
        zone.polygon.orientation(),
        true,
        strategy.epsilon(),
    )?;
    Ok(ZoneFrame { widths, inner })
}

fn zone_corners<S: FrametifyStrategy + ?Sized>(
    strategy: &S,
    zone: &Zone,
    widths: &[f64],
    ways: &[JointWay],
) -> Result<Vec<Corner>> {
    let edges = zone.polygon.edges();
    let n = edges.len();
    (0..n)
        .map(|k| {
            let p = (k + n - 1) % n;
            let slot = zone.slots[k];
            let side = |i: usize| CornerSide {
                edge: &edges[i],
                role: strategy.slot_role(zone.slots[i]),
                width: widths[i],
            };
            let way = ways.get(slot).copied().unwrap_or_default();
            resolve_corner(&side(p), &side(k), way, slot, strategy.epsilon())
        })
        .collect()
}
