//! Network profiles: the capability descriptor a generic network is built
//! against.
//!
//! A [`NetworkProfile`] names the species axes, the primary axis used for
//! indexing, nucleation and re-solution, the axes along which a unit
//! monomer can be emitted, and the ordered [`ClassificationRule`]s that
//! assign a [`Geometry`] to each cluster.

use crate::error::NetworkError;
use clusterkin_core::{ParseEnumError, Species};
use clusterkin_space::Region;
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::str::FromStr;

// ── Geometry ───────────────────────────────────────────────────────

/// Capture geometry of a cluster, selecting its radius formula and rate law.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Geometry {
    /// Compact three-dimensional cluster or bubble.
    Sphere,
    /// Impurity cluster pinned at a vacancy-type trap.
    Trap,
    /// Planar dislocation loop.
    Loop,
    /// Freely migrating gas cluster with no lattice defect.
    Free,
    /// Cluster bound at a dislocation junction.
    Junction,
    /// Mixed impurity/defect complex.
    Complex,
}

impl Geometry {
    /// Every geometry.
    pub const ALL: [Geometry; 6] = [
        Geometry::Sphere,
        Geometry::Trap,
        Geometry::Loop,
        Geometry::Free,
        Geometry::Junction,
        Geometry::Complex,
    ];

    /// Configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sphere => "Sphere",
            Self::Trap => "Trap",
            Self::Loop => "Loop",
            Self::Free => "Free",
            Self::Junction => "Junction",
            Self::Complex => "Complex",
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Geometry {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Geometry::ALL
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseEnumError::new("geometry", s))
    }
}

// ── Classification rules ───────────────────────────────────────────

/// A predicate on one species axis of a region.
///
/// Count predicates look at the region's origin; [`Dominant`](Self::Dominant)
/// compares the region's mean composition. A species that is not a network
/// axis counts as zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisCondition {
    /// The species is absent.
    Zero(Species),
    /// At least one atom or defect of the species is present.
    Positive(Species),
    /// At least `n` of the species are present.
    AtLeast(Species, u32),
    /// The species has the largest mean count of all axes (ties allowed).
    Dominant(Species),
}

impl AxisCondition {
    fn holds(&self, axes: &[Species], region: &Region) -> bool {
        let count = |sp: Species| {
            axes.iter()
                .position(|&a| a == sp)
                .map_or(0, |ax| region.axis(ax).begin())
        };
        match *self {
            Self::Zero(sp) => count(sp) == 0,
            Self::Positive(sp) => count(sp) > 0,
            Self::AtLeast(sp, n) => count(sp) >= n,
            Self::Dominant(sp) => match axes.iter().position(|&a| a == sp) {
                None => false,
                Some(ax) => {
                    let center = region.center();
                    center[ax] > 0.0 && center.iter().all(|&c| c <= center[ax])
                }
            },
        }
    }
}

impl FromStr for AxisCondition {
    type Err = NetworkError;

    /// Parse `He=0`, `He>0`, `I>=2` or `^I` (dominant).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let species = |sym: &str| {
            sym.trim()
                .parse::<Species>()
                .map_err(NetworkError::UnknownSpecies)
        };
        if let Some(sym) = s.strip_prefix('^') {
            return Ok(Self::Dominant(species(sym)?));
        }
        if let Some((sym, n)) = s.split_once(">=") {
            let n = n.trim().parse::<u32>().map_err(|_| NetworkError::InvalidConfig {
                reason: format!("bad count in condition '{s}'"),
            })?;
            return Ok(Self::AtLeast(species(sym)?, n));
        }
        if let Some(sym) = s.strip_suffix(">0") {
            return Ok(Self::Positive(species(sym)?));
        }
        if let Some(sym) = s.strip_suffix("=0") {
            return Ok(Self::Zero(species(sym)?));
        }
        Err(NetworkError::InvalidConfig {
            reason: format!("unrecognised condition '{s}'"),
        })
    }
}

/// Assigns `geometry` to every region satisfying all `conditions`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassificationRule {
    /// Geometry assigned on a match.
    pub geometry: Geometry,
    /// Conditions that must all hold.
    pub conditions: Vec<AxisCondition>,
}

impl ClassificationRule {
    /// Build a rule.
    pub fn new(geometry: Geometry, conditions: Vec<AxisCondition>) -> Self {
        Self {
            geometry,
            conditions,
        }
    }

    /// Whether the rule applies to `region`.
    pub fn matches(&self, axes: &[Species], region: &Region) -> bool {
        self.conditions.iter().all(|c| c.holds(axes, region))
    }
}

impl FromStr for ClassificationRule {
    type Err = NetworkError;

    /// Parse `"<Geometry>: <cond> <cond> ..."`, e.g. `"Trap: He>0 V>0"`.
    ///
    /// A rule with no conditions matches every region.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (geometry, rest) = s.split_once(':').unwrap_or((s, ""));
        let geometry = geometry
            .trim()
            .parse::<Geometry>()
            .map_err(NetworkError::UnknownGeometry)?;
        let conditions = rest
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<AxisCondition>, _>>()?;
        Ok(Self {
            geometry,
            conditions,
        })
    }
}

// ── NetworkProfile ─────────────────────────────────────────────────

/// Capability descriptor for one family of reaction networks.
///
/// The generic builder never branches on a network "type"; everything that
/// differs between, say, a fission-gas network and a plasma-surface network
/// is data in the profile.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkProfile {
    /// Human-readable name, used in diagnostics.
    pub name: String,
    /// Species of each composition axis, in axis order.
    pub species: SmallVec<[Species; 4]>,
    /// Species indexed by the region index and used for nucleation and
    /// re-solution.
    pub primary: Species,
    /// Species along which a unit monomer can dissociate from a cluster.
    pub monomer_axes: SmallVec<[Species; 4]>,
    /// Ordered classification rules; the first match wins.
    pub rules: Vec<ClassificationRule>,
    /// Geometry of clusters no rule matches.
    pub default_geometry: Geometry,
}

impl NetworkProfile {
    /// A profile over `species` with `primary` as the only monomer axis,
    /// no classification rules and spherical clusters.
    pub fn new(name: impl Into<String>, species: &[Species], primary: Species) -> Self {
        Self {
            name: name.into(),
            species: species.iter().copied().collect(),
            primary,
            monomer_axes: smallvec![primary],
            rules: Vec::new(),
            default_geometry: Geometry::Sphere,
        }
    }

    /// Replace the monomer axes.
    pub fn with_monomer_axes(mut self, axes: &[Species]) -> Self {
        self.monomer_axes = axes.iter().copied().collect();
        self
    }

    /// Append a classification rule.
    pub fn with_rule(mut self, rule: ClassificationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Fission-gas network: xenon only.
    pub fn ne() -> Self {
        Self::new("NE", &[Species::Xe], Species::Xe)
    }

    /// Plasma-surface interaction network in tungsten: helium, hydrogen
    /// isotopes, vacancies and interstitials.
    pub fn psi() -> Self {
        use AxisCondition::*;
        Self::new(
            "PSI",
            &[Species::He, Species::D, Species::T, Species::V, Species::I],
            Species::He,
        )
        .with_monomer_axes(&[Species::He, Species::D, Species::T, Species::V, Species::I])
        .with_rule(ClassificationRule::new(
            Geometry::Free,
            vec![Zero(Species::V), Zero(Species::I)],
        ))
    }

    /// Iron network: helium, vacancies and interstitial loops.
    pub fn fe() -> Self {
        use AxisCondition::*;
        Self::new("Fe", &[Species::He, Species::V, Species::I], Species::He)
            .with_monomer_axes(&[Species::He, Species::V, Species::I])
            .with_rule(ClassificationRule::new(
                Geometry::Loop,
                vec![AtLeast(Species::I, 2), Zero(Species::He), Zero(Species::V)],
            ))
            .with_rule(ClassificationRule::new(
                Geometry::Trap,
                vec![Positive(Species::He), Positive(Species::V)],
            ))
    }

    /// Axis position of `species`, if it is a network axis.
    pub fn axis_of(&self, species: Species) -> Option<usize> {
        self.species.iter().position(|&s| s == species)
    }

    /// Axis position of the primary species.
    pub fn primary_axis(&self) -> Result<usize, NetworkError> {
        self.axis_of(self.primary)
            .ok_or(NetworkError::InvalidPrimaryAxis {
                species: self.primary,
            })
    }

    /// Check that the primary and monomer species are axes and that no
    /// axis repeats.
    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.species.is_empty() {
            return Err(NetworkError::InvalidConfig {
                reason: format!("profile {} has no species axes", self.name),
            });
        }
        for (n, sp) in self.species.iter().enumerate() {
            if self.species[..n].contains(sp) {
                return Err(NetworkError::InvalidConfig {
                    reason: format!("species {sp} appears twice in profile {}", self.name),
                });
            }
        }
        self.primary_axis()?;
        if let Some(sp) = self.monomer_axes.iter().find(|&&sp| self.axis_of(sp).is_none()) {
            return Err(NetworkError::InvalidConfig {
                reason: format!("monomer species {sp} is not an axis of profile {}", self.name),
            });
        }
        Ok(())
    }

    /// Geometry of `region` under this profile.
    pub fn classify(&self, region: &Region) -> Geometry {
        self.rules
            .iter()
            .find(|r| r.matches(&self.species, region))
            .map_or(self.default_geometry, |r| r.geometry)
    }
}
