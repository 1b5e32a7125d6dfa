//! Building the subpaving: per-axis partitions, Cartesian product, tiling.

use crate::error::SpaceError;
use crate::interval::Interval;
use crate::region::Region;
use clusterkin_core::{ClusterId, Species};
use smallvec::SmallVec;

/// How one species axis is cut into intervals.
///
/// Counts below `group_min` are tracked exactly. From `group_min` up to
/// `max` the axis is cut into runs of `group_width` counts; the last run is
/// clipped at `max + 1` when the subpaving is tiled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AxisPartition {
    /// Species tracked along this axis.
    pub species: Species,
    /// Largest count represented (inclusive).
    pub max: u32,
    /// First count that is grouped.
    pub group_min: u32,
    /// Width of each grouped interval.
    pub group_width: u32,
}

impl AxisPartition {
    /// An axis where every count from 0 to `max` is its own interval.
    pub fn exact(species: Species, max: u32) -> Self {
        Self {
            species,
            max,
            group_min: max.saturating_add(1),
            group_width: 1,
        }
    }

    /// An axis grouped into runs of `group_width` from `group_min` on.
    ///
    /// Returns `Err(SpaceError::InvalidPartition)` if `group_width == 0` or
    /// `group_min == 0` (the zero count is always exact).
    pub fn grouped(
        species: Species,
        max: u32,
        group_min: u32,
        group_width: u32,
    ) -> Result<Self, SpaceError> {
        let axis = Self {
            species,
            max,
            group_min,
            group_width,
        };
        axis.validate()?;
        Ok(axis)
    }

    /// Check the grouping parameters.
    pub fn validate(&self) -> Result<(), SpaceError> {
        if self.group_width == 0 {
            return Err(SpaceError::InvalidPartition {
                reason: format!("group_width for {} must be at least 1", self.species),
            });
        }
        if self.group_min == 0 {
            return Err(SpaceError::InvalidPartition {
                reason: format!("group_min for {} must be at least 1", self.species),
            });
        }
        Ok(())
    }

    /// The unclipped intervals along this axis, in increasing order.
    ///
    /// The final grouped interval may extend past `max + 1`.
    pub fn intervals(&self) -> Result<Vec<Interval>, SpaceError> {
        self.validate()?;
        let exact_end = self.group_min.min(self.max.saturating_add(1));
        let mut out: Vec<Interval> = (0..exact_end).map(Interval::singleton).collect();
        let mut start = self.group_min;
        while start <= self.max {
            let end = start.saturating_add(self.group_width);
            out.push(Interval::new(start, end)?);
            start = end;
        }
        Ok(out)
    }
}

/// Cuts composition space into the regions that become clusters.
///
/// # Examples
///
/// ```
/// use clusterkin_core::Species;
/// use clusterkin_space::{AxisPartition, Partitioner};
///
/// let p = Partitioner::new(vec![
///     AxisPartition::exact(Species::He, 3),
///     AxisPartition::exact(Species::V, 2),
/// ]);
/// let paving = p.subpave().unwrap();
/// // 4 * 3 compositions minus the empty cluster.
/// assert_eq!(paving.len(), 11);
/// ```
#[derive(Clone, Debug)]
pub struct Partitioner {
    axes: Vec<AxisPartition>,
}

impl Partitioner {
    /// Create a partitioner over the given axes, in network axis order.
    pub fn new(axes: Vec<AxisPartition>) -> Self {
        Self { axes }
    }

    /// Per-axis partitions.
    pub fn axes(&self) -> &[AxisPartition] {
        &self.axes
    }

    /// Build the subpaving.
    ///
    /// Takes the Cartesian product of the per-axis intervals (last axis
    /// varying fastest), drops the all-zero composition, then tiles every
    /// axis to `max + 1`. Region `n` of the result is cluster `n`.
    pub fn subpave(&self) -> Result<Subpaving, SpaceError> {
        if self.axes.is_empty() {
            return Err(SpaceError::EmptyPartition);
        }
        for (n, axis) in self.axes.iter().enumerate() {
            if self.axes[..n].iter().any(|a| a.species == axis.species) {
                return Err(SpaceError::InvalidPartition {
                    reason: format!("species {} appears on more than one axis", axis.species),
                });
            }
        }

        let per_axis = self
            .axes
            .iter()
            .map(AxisPartition::intervals)
            .collect::<Result<Vec<_>, _>>()?;
        let mut regions = Vec::with_capacity(per_axis.iter().map(Vec::len).product());
        let mut cursor = vec![0usize; per_axis.len()];
        'product: loop {
            let region = Region::new(cursor.iter().zip(&per_axis).map(|(&c, ivs)| ivs[c]))?;
            if !region.is_null() {
                regions.push(region);
            }
            // Odometer increment, last axis fastest.
            for ax in (0..cursor.len()).rev() {
                cursor[ax] += 1;
                if cursor[ax] < per_axis[ax].len() {
                    continue 'product;
                }
                cursor[ax] = 0;
            }
            break;
        }
        if regions.is_empty() {
            return Err(SpaceError::EmptyPartition);
        }

        let mut paving = Subpaving {
            regions,
            species: self.axes.iter().map(|a| a.species).collect(),
            max: self.axes.iter().map(|a| a.max).collect(),
        };
        for (ax, axis) in self.axes.iter().enumerate() {
            paving.tile(ax, axis.max.saturating_add(1))?;
        }
        log::debug!(
            target: "clusterkin",
            "subpaving built: {} regions over {} axes",
            paving.len(),
            paving.ndim()
        );
        Ok(paving)
    }
}

/// The arena of disjoint regions, indexed by [`ClusterId`].
#[derive(Clone, Debug)]
pub struct Subpaving {
    regions: Vec<Region>,
    species: SmallVec<[Species; 4]>,
    max: SmallVec<[u32; 4]>,
}

impl Subpaving {
    /// Clip every region on `axis` to the exclusive `limit`.
    ///
    /// A region that would become empty is a configuration error.
    pub fn tile(&mut self, axis: usize, limit: u32) -> Result<(), SpaceError> {
        if axis >= self.ndim() {
            return Err(SpaceError::AxisMismatch {
                expected: self.ndim(),
                found: axis + 1,
            });
        }
        for region in &mut self.regions {
            let iv = region.axis(axis);
            if iv.end() > limit {
                region.set_axis(axis, iv.clip(limit)?);
            }
        }
        Ok(())
    }

    /// All regions, in cluster order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Region of cluster `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn region(&self, id: ClusterId) -> &Region {
        &self.regions[id.index()]
    }

    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Always `false`; construction rejects an empty paving.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Number of species axes.
    pub fn ndim(&self) -> usize {
        self.species.len()
    }

    /// Species of each axis.
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    /// Largest count per axis (inclusive).
    pub fn max(&self) -> &[u32] {
        &self.max
    }

    /// Axis position of `species`, if present.
    pub fn axis_of(&self, species: Species) -> Option<usize> {
        self.species.iter().position(|&s| s == species)
    }

    /// Iterate `(ClusterId, &Region)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ClusterId, &Region)> {
        self.regions
            .iter()
            .enumerate()
            .map(|(n, r)| (ClusterId(n as u32), r))
    }
}
