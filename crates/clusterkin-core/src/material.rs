//! Host materials and their lattice constants.

use crate::constants;
use crate::error::ParseEnumError;
use crate::species::Species;
use std::fmt;
use std::str::FromStr;

/// Host material of the simulated domain.
///
/// Parsed once from the configuration string and then carried as a closed
/// enum; every material-specific constant is resolved from it by `match`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Material {
    /// Tungsten with a (100) surface.
    W100,
    /// Tungsten with a (110) surface.
    W110,
    /// Tungsten with a (111) surface.
    W111,
    /// Tungsten with a (211) surface.
    W211,
    /// Tungsten coupled to a binary-collision implantation profile.
    Tridyn,
    /// Uranium dioxide nuclear fuel.
    Fuel,
    /// Alpha iron.
    Fe,
}

impl Material {
    /// Configuration string for this material.
    pub fn name(self) -> &'static str {
        match self {
            Self::W100 => "W100",
            Self::W110 => "W110",
            Self::W111 => "W111",
            Self::W211 => "W211",
            Self::Tridyn => "TRIDYN",
            Self::Fuel => "Fuel",
            Self::Fe => "Fe",
        }
    }

    /// Whether the host lattice is tungsten.
    pub fn is_tungsten(self) -> bool {
        matches!(
            self,
            Self::W100 | Self::W110 | Self::W111 | Self::W211 | Self::Tridyn
        )
    }

    /// Lattice constant (nm).
    pub fn lattice_constant(self) -> f64 {
        match self {
            Self::Fuel => constants::UO2_LATTICE_CONSTANT,
            Self::Fe => constants::IRON_LATTICE_CONSTANT,
            _ => constants::TUNGSTEN_LATTICE_CONSTANT,
        }
    }

    /// Number of host atoms per conventional unit cell.
    ///
    /// UO2 counts cation sites only, since fission gas sits on the
    /// uranium sublattice.
    pub fn atoms_per_cell(self) -> f64 {
        match self {
            Self::Fuel => 4.0,
            _ => 2.0,
        }
    }

    /// Magnitude of the Burgers vector for a lattice parameter `a` (nm).
    pub fn burgers_vector(self, a: f64) -> f64 {
        match self {
            Self::Fuel => a / std::f64::consts::SQRT_2,
            _ => a * 3f64.sqrt() / 2.0,
        }
    }

    /// The impurity species the material is usually simulated with.
    pub fn default_impurity(self) -> Species {
        match self {
            Self::Fuel => Species::Xe,
            _ => Species::He,
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Material {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "W100" => Ok(Self::W100),
            "W110" => Ok(Self::W110),
            "W111" => Ok(Self::W111),
            "W211" => Ok(Self::W211),
            "TRIDYN" => Ok(Self::Tridyn),
            "Fuel" => Ok(Self::Fuel),
            "Fe" => Ok(Self::Fe),
            other => Err(ParseEnumError::new("material", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tungsten_variants_share_constants() {
        for name in ["W100", "W110", "W111", "W211", "TRIDYN"] {
            let m: Material = name.parse().unwrap();
            assert!(m.is_tungsten());
            assert_eq!(m.lattice_constant(), constants::TUNGSTEN_LATTICE_CONSTANT);
            assert_eq!(m.name(), name);
        }
    }

    #[test]
    fn fuel_uses_xenon_and_fluorite_cell() {
        let m: Material = "Fuel".parse().unwrap();
        assert_eq!(m.default_impurity(), Species::Xe);
        assert_eq!(m.atoms_per_cell(), 4.0);
    }

    #[test]
    fn unknown_material_is_rejected() {
        let err = "Zr".parse::<Material>().unwrap_err();
        assert_eq!(format!("{err}"), "unknown material 'Zr'");
    }

    proptest! {
        #[test]
        fn lowercase_names_never_resolve(name in "[a-z]{0,8}") {
            let err = name.parse::<Material>().unwrap_err();
            prop_assert_eq!(err.what, "material");
            prop_assert_eq!(err.value, name);
        }
    }
}
