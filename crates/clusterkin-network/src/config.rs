//! Network configuration and validation.
//!
//! [`NetworkConfig`] is the plain-data input to
//! [`NetworkBuilder`](crate::NetworkBuilder). [`validate()`](NetworkConfig::validate)
//! checks structural invariants; [`resolve()`](NetworkConfig::resolve)
//! additionally applies the documented fallbacks for non-physical lattice
//! and impurity radii, reporting each through the diagnostics sink.

use crate::binding::BindingFits;
use crate::error::NetworkError;
use crate::profile::NetworkProfile;
use clusterkin_core::{Composition, Diagnostic, DiagnosticsSink, Material, Species};
use clusterkin_space::AxisPartition;
use indexmap::{IndexMap, IndexSet};

// ── Mobility ───────────────────────────────────────────────────────

/// Diffusion parameters of one exact composition.
///
/// `D(T) = diffusion_factor * exp(-migration_energy / (k_B T))`.
#[derive(Clone, Debug, PartialEq)]
pub struct MobilityEntry {
    /// Exact composition, one count per network axis.
    pub composition: Composition,
    /// Diffusion pre-factor `D0` (nm² s⁻¹).
    pub diffusion_factor: f64,
    /// Migration energy `Em` (eV).
    pub migration_energy: f64,
}

impl MobilityEntry {
    /// Build an entry.
    pub fn new(composition: &[u32], diffusion_factor: f64, migration_energy: f64) -> Self {
        Self {
            composition: composition.iter().copied().collect(),
            diffusion_factor,
            migration_energy,
        }
    }
}

// ── CoreRadii ──────────────────────────────────────────────────────

/// Extra capture distance keyed by an unordered pair of dominant species.
///
/// Pairs without an entry have a core radius of zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoreRadii {
    radii: IndexMap<(Species, Species), f64>,
}

impl CoreRadii {
    fn key(a: Species, b: Species) -> (Species, Species) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Set the core radius (nm) for the pair `{a, b}`.
    pub fn insert(&mut self, a: Species, b: Species, radius: f64) {
        self.radii.insert(Self::key(a, b), radius);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, a: Species, b: Species, radius: f64) -> Self {
        self.insert(a, b, radius);
        self
    }

    /// Core radius for `{a, b}` (nm), zero when unset.
    pub fn get(&self, a: Species, b: Species) -> f64 {
        self.radii.get(&Self::key(a, b)).copied().unwrap_or(0.0)
    }

    fn iter(&self) -> impl Iterator<Item = (&(Species, Species), &f64)> {
        self.radii.iter()
    }
}

// ── Reaction-channel settings ──────────────────────────────────────

/// Absorption at dislocations and grain boundaries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SinkSettings {
    /// Sink strength `S` (nm⁻²).
    pub strength: f64,
    /// Bias applied to interstitial-dominant clusters (> 1).
    pub interstitial_bias: f64,
}

impl Default for SinkSettings {
    fn default() -> Self {
        Self {
            strength: 1.0e-3,
            interstitial_bias: 1.2,
        }
    }
}

/// Irradiation-induced re-solution of gas from bubbles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolutionSettings {
    /// Smallest primary size that can lose a monomer by re-solution.
    pub min_size: u32,
    /// Dimensionless fit factor of the re-solution rate.
    pub fit: f64,
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            min_size: 10,
            fit: 1.0e-2,
        }
    }
}

/// Heterogeneous nucleation of primary dimers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NucleationSettings {
    /// Nucleation rate (s⁻¹).
    pub rate: f64,
}

// ── NetworkConfig ──────────────────────────────────────────────────

/// Everything needed to build a [`ReactionNetwork`](crate::ReactionNetwork).
#[derive(Clone, Debug)]
pub struct NetworkConfig {
    /// Species axes and classification.
    pub profile: NetworkProfile,
    /// Per-axis partition, in profile axis order.
    pub partitions: Vec<AxisPartition>,
    /// Host material.
    pub material: Material,
    /// Lattice parameter (nm); non-positive falls back to the material's.
    pub lattice_parameter: f64,
    /// Radius of the profile's impurity monomer (nm); non-positive falls
    /// back to the species constant.
    pub impurity_radius: f64,
    /// Diffusion parameters of the mobile compositions.
    pub mobility: Vec<MobilityEntry>,
    /// Binding-energy fit per family.
    pub binding: BindingFits,
    /// Core radii for sphere-sphere capture.
    pub core_radii: CoreRadii,
    /// Sink absorption, `None` to disable.
    pub sinks: Option<SinkSettings>,
    /// Re-solution, `None` to disable.
    pub resolution: Option<ResolutionSettings>,
    /// Nucleation, `None` to disable.
    pub nucleation: Option<NucleationSettings>,
    /// Fission rate density (s⁻¹ nm⁻³).
    pub fission_rate: f64,
    /// Fission-gas yield per fission.
    pub fission_yield: f64,
    /// Alignment angles used when averaging loop capture cross-sections.
    pub loop_angles: usize,
}

impl NetworkConfig {
    /// Default configuration for `profile` with every axis exact up to
    /// `max`.
    pub fn new(profile: NetworkProfile, max: u32) -> Self {
        let partitions = profile
            .species
            .iter()
            .map(|&sp| AxisPartition::exact(sp, max))
            .collect();
        Self {
            profile,
            partitions,
            material: Material::W100,
            lattice_parameter: 0.0,
            impurity_radius: 0.0,
            mobility: Vec::new(),
            binding: BindingFits::default(),
            core_radii: CoreRadii::default(),
            sinks: None,
            resolution: None,
            nucleation: None,
            fission_rate: 0.0,
            fission_yield: 0.25,
            loop_angles: 4,
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), NetworkError> {
        self.profile.validate()?;

        let axes: Vec<Species> = self.partitions.iter().map(|p| p.species).collect();
        if axes.as_slice() != self.profile.species.as_slice() {
            return Err(NetworkError::InvalidConfig {
                reason: format!(
                    "partition axes {axes:?} do not match profile axes {:?}",
                    self.profile.species.as_slice()
                ),
            });
        }
        for p in &self.partitions {
            p.validate()?;
        }

        let mut seen: IndexSet<&[u32]> = IndexSet::new();
        for entry in &self.mobility {
            if entry.composition.len() != axes.len() {
                return Err(NetworkError::InvalidConfig {
                    reason: format!(
                        "mobility entry {:?} has {} axes, expected {}",
                        entry.composition.as_slice(),
                        entry.composition.len(),
                        axes.len()
                    ),
                });
            }
            if !(entry.diffusion_factor >= 0.0 && entry.diffusion_factor.is_finite()) {
                return Err(invalid("diffusion factor", entry.diffusion_factor));
            }
            if !entry.migration_energy.is_finite() {
                return Err(invalid("migration energy", entry.migration_energy));
            }
            if !seen.insert(entry.composition.as_slice()) {
                return Err(NetworkError::DuplicateMobility {
                    composition: entry.composition.clone(),
                });
            }
        }

        for (_, &r) in self.core_radii.iter() {
            if !(r >= 0.0 && r.is_finite()) {
                return Err(invalid("core radius", r));
            }
        }
        if let Some(s) = &self.sinks {
            if !(s.strength >= 0.0 && s.strength.is_finite()) {
                return Err(invalid("sink strength", s.strength));
            }
            if !(s.interstitial_bias >= 1.0 && s.interstitial_bias.is_finite()) {
                return Err(invalid("interstitial bias", s.interstitial_bias));
            }
        }
        if let Some(r) = &self.resolution {
            if !(r.fit >= 0.0 && r.fit.is_finite()) {
                return Err(invalid("re-solution fit", r.fit));
            }
        }
        if let Some(n) = &self.nucleation {
            if !(n.rate >= 0.0 && n.rate.is_finite()) {
                return Err(invalid("nucleation rate", n.rate));
            }
        }
        for (name, v) in [
            ("fission rate", self.fission_rate),
            ("fission yield", self.fission_yield),
        ] {
            if !(v >= 0.0 && v.is_finite()) {
                return Err(invalid(name, v));
            }
        }
        if self.loop_angles == 0 {
            return Err(NetworkError::InvalidConfig {
                reason: "loop_angles must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Validate, then resolve the physical lengths.
    ///
    /// A non-positive lattice parameter falls back to the material
    /// constant; a non-positive impurity radius falls back to the radius of
    /// the profile's primary species (or helium for defect-only profiles).
    /// Each fallback is reported as a [`Diagnostic::Fallback`].
    pub fn resolve(&self, sink: &dyn DiagnosticsSink) -> Result<ResolvedLengths, NetworkError> {
        self.validate()?;

        let mut lattice_parameter = self.lattice_parameter;
        if !(lattice_parameter > 0.0) {
            let used = self.material.lattice_constant();
            sink.record(&Diagnostic::Fallback {
                parameter: "lattice_parameter",
                given: lattice_parameter,
                used,
            });
            lattice_parameter = used;
        }

        let mut impurity_radius = self.impurity_radius;
        if !(impurity_radius > 0.0) {
            let used = self
                .profile
                .primary
                .impurity_radius()
                .or_else(|| self.material.default_impurity().impurity_radius())
                .unwrap_or(clusterkin_core::constants::HELIUM_RADIUS);
            sink.record(&Diagnostic::Fallback {
                parameter: "impurity_radius",
                given: impurity_radius,
                used,
            });
            impurity_radius = used;
        }

        let atomic_volume = lattice_parameter.powi(3) / self.material.atoms_per_cell();
        Ok(ResolvedLengths {
            lattice_parameter,
            impurity_radius,
            atomic_volume,
            burgers_vector: self.material.burgers_vector(lattice_parameter),
        })
    }
}

fn invalid(name: &str, value: f64) -> NetworkError {
    NetworkError::InvalidConfig {
        reason: format!("{name} must be finite and non-negative, got {value}"),
    }
}

/// Physical lengths after fallbacks have been applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedLengths {
    /// Lattice parameter `a` (nm).
    pub lattice_parameter: f64,
    /// Impurity monomer radius (nm).
    pub impurity_radius: f64,
    /// Atomic volume `Ω = a³ / atoms_per_cell` (nm³).
    pub atomic_volume: f64,
    /// Burgers vector magnitude (nm).
    pub burgers_vector: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::NetworkProfile;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect(Mutex<Vec<Diagnostic>>);

    impl DiagnosticsSink for Collect {
        fn record(&self, d: &Diagnostic) {
            self.0.lock().unwrap().push(d.clone());
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(NetworkConfig::new(NetworkProfile::psi(), 4).validate().is_ok());
    }

    #[test]
    fn mismatched_partition_axes_are_rejected() {
        let mut cfg = NetworkConfig::new(NetworkProfile::fe(), 4);
        cfg.partitions.swap(0, 1);
        assert!(matches!(cfg.validate(), Err(NetworkError::InvalidConfig { .. })));
    }

    #[test]
    fn duplicate_mobility_is_rejected() {
        let mut cfg = NetworkConfig::new(NetworkProfile::ne(), 10);
        cfg.mobility.push(MobilityEntry::new(&[1], 1.0, 0.5));
        cfg.mobility.push(MobilityEntry::new(&[1], 2.0, 0.5));
        assert!(matches!(
            cfg.validate(),
            Err(NetworkError::DuplicateMobility { .. })
        ));
    }

    #[test]
    fn negative_diffusion_factor_is_rejected() {
        let mut cfg = NetworkConfig::new(NetworkProfile::ne(), 10);
        cfg.mobility.push(MobilityEntry::new(&[1], -1.0, 0.5));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn bias_below_one_is_rejected() {
        let mut cfg = NetworkConfig::new(NetworkProfile::fe(), 3);
        cfg.sinks = Some(SinkSettings {
            strength: 1.0,
            interstitial_bias: 0.5,
        });
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_physical_lengths_fall_back_and_are_reported() {
        let mut cfg = NetworkConfig::new(NetworkProfile::ne(), 10);
        cfg.material = Material::Fuel;
        cfg.lattice_parameter = -1.0;
        cfg.impurity_radius = 0.0;
        let sink = Collect::default();
        let lengths = cfg.resolve(&sink).unwrap();
        assert_eq!(
            lengths.lattice_parameter,
            clusterkin_core::constants::UO2_LATTICE_CONSTANT
        );
        assert_eq!(
            lengths.impurity_radius,
            clusterkin_core::constants::XENON_RADIUS
        );
        let events = sink.0.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            Diagnostic::Fallback {
                parameter: "lattice_parameter",
                ..
            }
        ));
    }

    #[test]
    fn physical_lengths_are_kept_silently() {
        let mut cfg = NetworkConfig::new(NetworkProfile::ne(), 10);
        cfg.lattice_parameter = 0.5;
        cfg.impurity_radius = 0.2;
        let sink = Collect::default();
        let lengths = cfg.resolve(&sink).unwrap();
        assert_eq!(lengths.lattice_parameter, 0.5);
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[test]
    fn core_radii_are_symmetric() {
        let radii = CoreRadii::default().with(Species::V, Species::He, 0.2);
        assert_eq!(radii.get(Species::He, Species::V), 0.2);
        assert_eq!(radii.get(Species::He, Species::He), 0.0);
    }
}
