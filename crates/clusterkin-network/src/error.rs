//! Error types for network configuration and construction.

use clusterkin_core::{Composition, ParseEnumError, Species};
use clusterkin_space::SpaceError;
use std::error::Error;
use std::fmt;

/// Errors raised while validating a [`NetworkConfig`](crate::NetworkConfig)
/// or building a [`ReactionNetwork`](crate::ReactionNetwork).
///
/// Construction aborts on the first error; no partial network is ever
/// returned.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Partitioning or indexing composition space failed.
    Space(SpaceError),
    /// A configuration value is out of range or inconsistent.
    InvalidConfig {
        /// What went wrong.
        reason: String,
    },
    /// A geometry name did not parse.
    UnknownGeometry(ParseEnumError),
    /// A species symbol did not parse.
    UnknownSpecies(ParseEnumError),
    /// The profile's primary species is not one of its axes.
    InvalidPrimaryAxis {
        /// The configured primary species.
        species: Species,
    },
    /// Two mobility entries name the same composition.
    DuplicateMobility {
        /// The repeated composition.
        composition: Composition,
    },
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space(e) => write!(f, "composition space: {e}"),
            Self::InvalidConfig { reason } => write!(f, "invalid network config: {reason}"),
            Self::UnknownGeometry(e) | Self::UnknownSpecies(e) => write!(f, "{e}"),
            Self::InvalidPrimaryAxis { species } => {
                write!(f, "primary species {species} is not a network axis")
            }
            Self::DuplicateMobility { composition } => {
                write!(f, "duplicate mobility entry for {:?}", composition.as_slice())
            }
        }
    }
}

impl Error for NetworkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            Self::UnknownGeometry(e) | Self::UnknownSpecies(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for NetworkError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}
