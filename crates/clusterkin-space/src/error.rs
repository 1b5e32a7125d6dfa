//! Error types for partitioning and grid construction.

use std::fmt;

/// Errors arising from composition-space partitioning or grid setup.
///
/// Every variant is a fatal configuration error: network construction
/// aborts rather than exposing a partially built subpaving.
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceError {
    /// An interval is empty or inverted (`begin >= end`).
    DegenerateInterval {
        /// Inclusive lower bound.
        begin: u32,
        /// Exclusive upper bound.
        end: u32,
    },
    /// A region was constructed with zero axes.
    EmptyRegion,
    /// Two compositions or regions disagree on the number of axes.
    AxisMismatch {
        /// Expected number of axes.
        expected: usize,
        /// Number of axes found.
        found: usize,
    },
    /// A partition parameter is invalid.
    InvalidPartition {
        /// What went wrong.
        reason: String,
    },
    /// The partition produced no clusters.
    EmptyPartition,
    /// A spatial grid parameter is invalid.
    InvalidGrid {
        /// What went wrong.
        reason: String,
    },
    /// A surface position lies outside the grid.
    SurfaceOutOfRange {
        /// Requested surface node.
        position: usize,
        /// Number of grid nodes.
        len: usize,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateInterval { begin, end } => {
                write!(f, "degenerate interval [{begin}, {end})")
            }
            Self::EmptyRegion => write!(f, "region must have at least one axis"),
            Self::AxisMismatch { expected, found } => {
                write!(f, "expected {expected} composition axes, found {found}")
            }
            Self::InvalidPartition { reason } => write!(f, "invalid partition: {reason}"),
            Self::EmptyPartition => write!(f, "partition produced no clusters"),
            Self::InvalidGrid { reason } => write!(f, "invalid grid: {reason}"),
            Self::SurfaceOutOfRange { position, len } => {
                write!(f, "surface position {position} outside grid of {len} nodes")
            }
        }
    }
}

impl std::error::Error for SpaceError {}
