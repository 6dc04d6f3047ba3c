use serde::{Deserialize, Serialize};

use crate::error::{FenestraError, FrameError, Result, SplitError};
use crate::geometry::{Line, Polygon};
use crate::math::Epsilon;
use crate::operations::split::{EdgeOrigin, Fragment, Splitter};

/// What kind of profile a slot carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotRole {
    /// A bar along the outer boundary.
    Frame,
    /// A fixed dividing bar between two lights.
    Mullion,
    /// The meeting bar of two sliding sashes.
    Interlock,
}

impl SlotRole {
    /// Dividers straddle their centreline: each zone gets half the width.
    #[must_use]
    pub fn is_divider(self) -> bool {
        matches!(self, Self::Mullion | Self::Interlock)
    }
}

/// A region of the outer polygon framed on its own, with the slot each of
/// its edges belongs to.
#[derive(Debug, Clone)]
pub struct Zone {
    pub polygon: Polygon,
    pub slots: Vec<usize>,
}

impl Zone {
    /// The whole polygon as one zone; edge `i` is slot `i`.
    #[must_use]
    pub fn whole(polygon: &Polygon) -> Self {
        Self {
            polygon: polygon.clone(),
            slots: (0..polygon.len()).collect(),
        }
    }

    /// Splits the zone along a divider centreline. Edges laid along the cut
    /// join the `divider` slot.
    ///
    /// A line that misses the zone leaves it whole.
    ///
    /// # Errors
    ///
    /// Propagates any split failure other than a missed zone.
    pub fn divide(self, line: &Line, divider: usize, eps: &Epsilon) -> Result<Vec<Self>> {
        let fragments = match Splitter::new(&self.polygon, *line).epsilon(*eps).fragments() {
            Ok(fragments) => fragments,
            Err(FenestraError::Split(SplitError::NoCrossing)) => return Ok(vec![self]),
            Err(e) => return Err(e),
        };
        fragments
            .into_iter()
            .map(|f| self.adopt(f, divider))
            .collect()
    }

    fn adopt(&self, fragment: Fragment, divider: usize) -> Result<Self> {
        let count = self.slots.len();
        let slots = fragment
            .origins
            .iter()
            .map(|origin| match origin {
                EdgeOrigin::Bridge => Ok(divider),
                EdgeOrigin::Source(i) => self
                    .slots
                    .get(*i)
                    .copied()
                    .ok_or(FrameError::SlotOutOfRange { slot: *i, count }),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            polygon: fragment.polygon,
            slots,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    #[test]
    fn divider_edges_take_the_divider_slot() {
        let rect = Polygon::rectangle(Point2::origin(), 1200.0, 1000.0).unwrap();
        let zones = Zone::whole(&rect)
            .divide(&Line::vertical(400.0), 4, &Epsilon::default())
            .unwrap();
        assert_eq!(zones.len(), 2);
        for z in &zones {
            assert_eq!(z.slots.len(), z.polygon.len());
            assert_eq!(z.slots.iter().filter(|&&s| s == 4).count(), 1);
            assert!(z.slots.contains(&0) && z.slots.contains(&2));
        }
        let left = zones.iter().find(|z| z.slots.contains(&3)).unwrap();
        assert!(!left.slots.contains(&1));
    }

    #[test]
    fn missed_zone_stays_whole() {
        let rect = Polygon::rectangle(Point2::origin(), 100.0, 100.0).unwrap();
        let zones = Zone::whole(&rect)
            .divide(&Line::vertical(400.0), 4, &Epsilon::default())
            .unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].slots, vec![0, 1, 2, 3]);
    }
}
