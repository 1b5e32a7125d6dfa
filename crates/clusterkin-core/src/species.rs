//! Species axes and the [`Composition`] type alias.

use crate::constants;
use crate::error::ParseEnumError;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// A chemical or defect species tracked along one composition axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Species {
    /// Helium.
    He,
    /// Deuterium.
    D,
    /// Tritium.
    T,
    /// Xenon (fission gas).
    Xe,
    /// Vacancy.
    V,
    /// Self-interstitial.
    I,
}

impl Species {
    /// Every species, in canonical order.
    pub const ALL: [Species; 6] = [
        Species::He,
        Species::D,
        Species::T,
        Species::Xe,
        Species::V,
        Species::I,
    ];

    /// Short chemical symbol used in configuration files.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::He => "He",
            Self::D => "D",
            Self::T => "T",
            Self::Xe => "Xe",
            Self::V => "V",
            Self::I => "I",
        }
    }

    /// Whether this species is a foreign atom rather than a lattice defect.
    pub fn is_impurity(self) -> bool {
        matches!(self, Self::He | Self::D | Self::T | Self::Xe)
    }

    /// Whether this species is a hydrogen isotope.
    pub fn is_hydrogen(self) -> bool {
        matches!(self, Self::D | Self::T)
    }

    /// Physical radius of an isolated impurity atom (nm).
    ///
    /// Lattice defects have no intrinsic radius and return `None`; their
    /// monomer radius follows from the lattice parameter instead.
    pub fn impurity_radius(self) -> Option<f64> {
        match self {
            Self::He => Some(constants::HELIUM_RADIUS),
            Self::Xe => Some(constants::XENON_RADIUS),
            Self::D | Self::T => Some(constants::HYDROGEN_RADIUS),
            Self::V | Self::I => None,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Species {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .into_iter()
            .find(|sp| sp.symbol() == s)
            .ok_or_else(|| ParseEnumError::new("species", s))
    }
}

/// Species counts of a cluster, one entry per network axis.
///
/// Uses `SmallVec<[u32; 4]>` to avoid heap allocation for networks with
/// up to four species axes. Wider networks spill to the heap transparently.
pub type Composition = SmallVec<[u32; 4]>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_round_trip() {
        for sp in Species::ALL {
            assert_eq!(sp.symbol().parse::<Species>().unwrap(), sp);
        }
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let err = "Kr".parse::<Species>().unwrap_err();
        assert_eq!(err.what, "species");
        assert_eq!(err.value, "Kr");
    }

    #[test]
    fn defects_have_no_impurity_radius() {
        assert!(Species::V.impurity_radius().is_none());
        assert!(Species::I.impurity_radius().is_none());
        assert!(Species::He.impurity_radius().unwrap() > 0.0);
    }
}
