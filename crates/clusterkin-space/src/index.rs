//! Interval index for candidate-product lookup.

use crate::error::SpaceError;
use crate::interval::Interval;
use crate::partition::Subpaving;
use crate::region::Region;
use clusterkin_core::ClusterId;

/// Sorted-bounds index over the regions of a [`Subpaving`].
///
/// The distinct intervals of the primary axis are kept sorted; each maps to
/// the clusters whose region uses it. A query binary-searches the primary
/// axis and filters the remaining axes linearly.
///
/// Built once after tiling and immutable afterwards.
#[derive(Clone, Debug)]
pub struct RegionIndex {
    primary: usize,
    bounds: Vec<Interval>,
    members: Vec<Vec<ClusterId>>,
    regions: Vec<Region>,
}

impl RegionIndex {
    /// Index `paving` on the axis `primary`.
    pub fn new(paving: &Subpaving, primary: usize) -> Result<Self, SpaceError> {
        if primary >= paving.ndim() {
            return Err(SpaceError::AxisMismatch {
                expected: paving.ndim(),
                found: primary + 1,
            });
        }
        let mut keyed: Vec<(Interval, ClusterId)> =
            paving.iter().map(|(id, r)| (r.axis(primary), id)).collect();
        keyed.sort_unstable();

        let mut bounds: Vec<Interval> = Vec::new();
        let mut members: Vec<Vec<ClusterId>> = Vec::new();
        for (iv, id) in keyed {
            match bounds.last() {
                Some(last) if *last == iv => {
                    if let Some(m) = members.last_mut() {
                        m.push(id);
                    }
                }
                _ => {
                    bounds.push(iv);
                    members.push(vec![id]);
                }
            }
        }
        Ok(Self {
            primary,
            bounds,
            members,
            regions: paving.regions().to_vec(),
        })
    }

    /// Axis the index is sorted on.
    pub fn primary(&self) -> usize {
        self.primary
    }

    /// Number of distinct primary-axis intervals.
    pub fn bucket_count(&self) -> usize {
        self.bounds.len()
    }

    /// Clusters whose region meets the inclusive box `[lo, hi]`, in
    /// ascending id order.
    ///
    /// Returns `Err(SpaceError::AxisMismatch)` if `lo` or `hi` has the
    /// wrong number of axes.
    pub fn query(&self, lo: &[u32], hi: &[u32]) -> Result<Vec<ClusterId>, SpaceError> {
        let ndim = self.regions.first().map_or(0, Region::ndim);
        for len in [lo.len(), hi.len()] {
            if len != ndim {
                return Err(SpaceError::AxisMismatch {
                    expected: ndim,
                    found: len,
                });
            }
        }
        let (plo, phi) = (lo[self.primary], hi[self.primary]);
        let start = self.bounds.partition_point(|iv| iv.last() < plo);

        let mut out = Vec::new();
        for (iv, ids) in self.bounds[start..].iter().zip(&self.members[start..]) {
            if iv.begin() > phi {
                break;
            }
            out.extend(ids.iter().copied().filter(|id| {
                self.regions[id.index()]
                    .axes()
                    .iter()
                    .enumerate()
                    .all(|(ax, a)| ax == self.primary || a.overlaps_inclusive(lo[ax], hi[ax]))
            }));
        }
        out.sort_unstable();
        Ok(out)
    }

    /// The cluster containing the exact `composition`, if any.
    pub fn find(&self, composition: &[u32]) -> Option<ClusterId> {
        self.query(composition, composition)
            .ok()
            .and_then(|hits| hits.first().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{AxisPartition, Partitioner};
    use clusterkin_core::Species;
    use proptest::prelude::*;

    fn paving() -> Subpaving {
        Partitioner::new(vec![
            AxisPartition::grouped(Species::He, 20, 5, 4).unwrap(),
            AxisPartition::exact(Species::V, 3),
        ])
        .subpave()
        .unwrap()
    }

    #[test]
    fn primary_axis_out_of_range_is_rejected() {
        assert!(RegionIndex::new(&paving(), 2).is_err());
    }

    #[test]
    fn find_locates_grouped_compositions() {
        let p = paving();
        let index = RegionIndex::new(&p, 0).unwrap();
        let id = index.find(&[10, 2]).unwrap();
        assert!(p.region(id).contains(&[10, 2]));
        assert!(index.find(&[0, 0]).is_none());
        assert!(index.find(&[21, 0]).is_none());
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let index = RegionIndex::new(&paving(), 0).unwrap();
        assert!(matches!(
            index.query(&[1], &[2]),
            Err(SpaceError::AxisMismatch { expected: 2, found: 1 })
        ));
    }

    proptest! {
        #[test]
        fn query_matches_linear_scan(
            lo0 in 0u32..22, span0 in 0u32..8,
            lo1 in 0u32..4, span1 in 0u32..3,
            primary in 0usize..2,
        ) {
            let p = paving();
            let index = RegionIndex::new(&p, primary).unwrap();
            let lo = [lo0, lo1];
            let hi = [lo0 + span0, lo1 + span1];
            let expected: Vec<ClusterId> = p
                .iter()
                .filter(|(_, r)| {
                    r.axes().iter().enumerate().all(|(ax, iv)| iv.overlaps_inclusive(lo[ax], hi[ax]))
                })
                .map(|(id, _)| id)
                .collect();
            prop_assert_eq!(index.query(&lo, &hi).unwrap(), expected);
        }
    }
}
