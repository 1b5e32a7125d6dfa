//! Axis-aligned boxes in composition space.

use crate::error::SpaceError;
use crate::interval::Interval;
use clusterkin_core::Composition;
use smallvec::SmallVec;
use std::fmt;

/// An axis-aligned box of species counts, one [`Interval`] per axis.
///
/// A region whose every interval has width 1 is a *simplex*: it stands for
/// exactly one composition. Wider regions are super-clusters.
///
/// # Examples
///
/// ```
/// use clusterkin_space::{Interval, Region};
///
/// let r = Region::new([Interval::new(4, 8).unwrap(), Interval::singleton(1)]).unwrap();
/// assert_eq!(r.volume(), 4);
/// assert!(!r.is_simplex());
/// assert_eq!(r.origin().as_slice(), &[4, 1]);
/// assert_eq!(r.upper_limit().as_slice(), &[8, 2]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    axes: SmallVec<[Interval; 4]>,
}

impl Region {
    /// Build a region from its per-axis intervals.
    ///
    /// Returns `Err(SpaceError::EmptyRegion)` if no axis is given.
    pub fn new(axes: impl IntoIterator<Item = Interval>) -> Result<Self, SpaceError> {
        let axes: SmallVec<[Interval; 4]> = axes.into_iter().collect();
        if axes.is_empty() {
            return Err(SpaceError::EmptyRegion);
        }
        Ok(Self { axes })
    }

    /// The simplex region holding exactly `composition`.
    pub fn point(composition: &[u32]) -> Result<Self, SpaceError> {
        Self::new(composition.iter().map(|&v| Interval::singleton(v)))
    }

    /// Number of species axes.
    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    /// Interval along axis `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.ndim()`.
    pub fn axis(&self, i: usize) -> Interval {
        self.axes[i]
    }

    /// All per-axis intervals.
    pub fn axes(&self) -> &[Interval] {
        &self.axes
    }

    /// Lower corner (inclusive).
    pub fn origin(&self) -> Composition {
        self.axes.iter().map(Interval::begin).collect()
    }

    /// Upper corner (exclusive).
    pub fn upper_limit(&self) -> Composition {
        self.axes.iter().map(Interval::end).collect()
    }

    /// Whether the region holds a single composition.
    pub fn is_simplex(&self) -> bool {
        self.axes.iter().all(Interval::is_singleton)
    }

    /// Number of compositions covered.
    pub fn volume(&self) -> u64 {
        self.axes.iter().map(|iv| iv.width() as u64).product()
    }

    /// Mean composition of the region.
    pub fn center(&self) -> SmallVec<[f64; 4]> {
        self.axes.iter().map(Interval::center).collect()
    }

    /// Whether `composition` lies inside the region.
    pub fn contains(&self, composition: &[u32]) -> bool {
        composition.len() == self.axes.len()
            && self
                .axes
                .iter()
                .zip(composition)
                .all(|(iv, &v)| iv.contains(v))
    }

    /// Whether two regions share at least one composition.
    pub fn overlaps(&self, other: &Region) -> bool {
        self.axes.len() == other.axes.len()
            && self
                .axes
                .iter()
                .zip(&other.axes)
                .all(|(a, b)| a.intersects(b))
    }

    /// Whether every count is zero, i.e. the region is the empty cluster.
    pub fn is_null(&self) -> bool {
        self.axes.iter().all(|iv| iv.begin() == 0 && iv.end() == 1)
    }

    /// Replace the interval on axis `i`.
    pub(crate) fn set_axis(&mut self, i: usize, iv: Interval) {
        self.axes[i] = iv;
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, iv) in self.axes.iter().enumerate() {
            if n > 0 {
                f.write_str("x")?;
            }
            write!(f, "{iv}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(b: u32, e: u32) -> Interval {
        Interval::new(b, e).unwrap()
    }

    #[test]
    fn empty_region_is_rejected() {
        assert_eq!(Region::new([]), Err(SpaceError::EmptyRegion));
    }

    #[test]
    fn point_region_is_simplex() {
        let r = Region::point(&[3, 0, 2]).unwrap();
        assert!(r.is_simplex());
        assert_eq!(r.volume(), 1);
        assert!(r.contains(&[3, 0, 2]));
        assert!(!r.contains(&[3, 0, 1]));
        assert!(!r.contains(&[3, 0]));
    }

    #[test]
    fn center_is_the_mean_composition() {
        let r = Region::new([iv(4, 8), iv(0, 1)]).unwrap();
        assert_eq!(r.center().as_slice(), &[5.5, 0.0]);
    }

    #[test]
    fn overlap_requires_every_axis() {
        let a = Region::new([iv(0, 4), iv(0, 4)]).unwrap();
        let b = Region::new([iv(3, 6), iv(4, 6)]).unwrap();
        let c = Region::new([iv(3, 6), iv(2, 6)]).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn display_joins_axes() {
        let r = Region::new([iv(1, 2), iv(0, 3)]).unwrap();
        assert_eq!(r.to_string(), "[1, 2)x[0, 3)");
    }
}
