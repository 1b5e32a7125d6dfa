//! Half-open integer intervals along one composition axis.

use crate::error::SpaceError;
use std::fmt;

/// A half-open interval `[begin, end)` of species counts.
///
/// Construction rejects empty and inverted intervals, so every `Interval`
/// holds at least one count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    begin: u32,
    end: u32,
}

impl Interval {
    /// Create `[begin, end)`.
    ///
    /// Returns `Err(SpaceError::DegenerateInterval)` if `begin >= end`.
    pub fn new(begin: u32, end: u32) -> Result<Self, SpaceError> {
        if begin >= end {
            return Err(SpaceError::DegenerateInterval { begin, end });
        }
        Ok(Self { begin, end })
    }

    /// The single-count interval `[v, v + 1)`.
    pub fn singleton(v: u32) -> Self {
        Self { begin: v, end: v + 1 }
    }

    /// Inclusive lower bound.
    pub fn begin(&self) -> u32 {
        self.begin
    }

    /// Exclusive upper bound.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Largest count in the interval (`end - 1`).
    pub fn last(&self) -> u32 {
        self.end - 1
    }

    /// Number of counts covered.
    pub fn width(&self) -> u32 {
        self.end - self.begin
    }

    /// Whether the interval holds exactly one count.
    pub fn is_singleton(&self) -> bool {
        self.width() == 1
    }

    /// Whether `v` lies in the interval.
    pub fn contains(&self, v: u32) -> bool {
        self.begin <= v && v < self.end
    }

    /// Whether the interval meets the inclusive range `[lo, hi]`.
    pub fn overlaps_inclusive(&self, lo: u32, hi: u32) -> bool {
        self.begin <= hi && self.last() >= lo
    }

    /// Whether two intervals share at least one count.
    pub fn intersects(&self, other: &Interval) -> bool {
        self.begin < other.end && other.begin < self.end
    }

    /// Mean count of the interval.
    pub fn center(&self) -> f64 {
        (self.begin as f64 + self.last() as f64) / 2.0
    }

    /// Clip the upper bound to `limit` (exclusive).
    ///
    /// Returns `Err(SpaceError::DegenerateInterval)` if nothing remains.
    pub fn clip(&self, limit: u32) -> Result<Self, SpaceError> {
        Self::new(self.begin, self.end.min(limit))
    }

    /// Fraction of pairs `(a, b)`, `a ∈ self`, `b ∈ other`, whose sum lies
    /// in `target`.
    ///
    /// Evaluated in O(width) by counting, for each `a`, how many `b` land
    /// in `[target.begin - a, target.end - a)`.
    pub fn sum_fraction(&self, other: &Interval, target: &Interval) -> f64 {
        let mut hits: u64 = 0;
        for a in self.begin..self.end {
            let lo = target.begin.saturating_sub(a).max(other.begin);
            let hi = target.end.saturating_sub(a).min(other.end);
            if hi > lo {
                hits += (hi - lo) as u64;
            }
        }
        hits as f64 / (self.width() as f64 * other.width() as f64)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}
