//! Composition-space partitioning for clusterkin networks.
//!
//! This crate subdivides the bounded integer lattice of species counts into
//! disjoint axis-aligned [`Region`]s, one per cluster. Small counts are
//! tracked exactly (singleton regions); larger counts are grouped into
//! super-clusters to bound the size of the network.
//!
//! # Pieces
//!
//! - [`Interval`] / [`Region`]: half-open boxes in composition space
//! - [`Partitioner`] / [`Subpaving`]: builds and tiles the region arena
//! - [`RegionIndex`]: sorted-bounds lookup of regions overlapping a box
//! - [`SpatialGrid`] / [`SurfaceMap`]: the depth grid the network lives on

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod index;
pub mod interval;
pub mod partition;
pub mod region;

pub use error::SpaceError;
pub use grid::{SpatialGrid, SurfaceMap};
pub use index::RegionIndex;
pub use interval::Interval;
pub use partition::{AxisPartition, Partitioner, Subpaving};
pub use region::Region;
