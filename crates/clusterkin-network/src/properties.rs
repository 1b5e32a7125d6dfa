//! Per-cluster physical properties fixed at setup.
//!
//! The table is built once from the subpaving and configuration. Values
//! that depend on temperature (diffusion coefficients, rates) are not
//! stored here; they live in the rate crate's per-grid-point data and are
//! recomputed from these constants.

use crate::binding::BindingFamily;
use crate::config::{NetworkConfig, ResolvedLengths};
use crate::error::NetworkError;
use crate::profile::{Geometry, NetworkProfile};
use clusterkin_core::{ClusterId, Species};
use clusterkin_space::{Region, Subpaving};
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::f64::consts::PI;

/// Setup-time properties of one cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterProperties {
    /// Cluster id.
    pub id: ClusterId,
    /// Composition box.
    pub region: Region,
    /// Capture geometry.
    pub geometry: Geometry,
    /// Binding-energy family.
    pub family: BindingFamily,
    /// Species with the largest mean count (first axis on ties).
    pub dominant: Species,
    /// Representative size used by the radius and binding-energy laws.
    pub size: f64,
    /// Mean count along the primary axis.
    pub primary_size: f64,
    /// Species of a unit monomer (exactly one count on one axis).
    pub monomer: Option<Species>,
    /// Diffusion pre-factor `D0` (nm² s⁻¹); zero for immobile clusters.
    pub diffusion_factor: f64,
    /// Migration energy `Em` (eV).
    pub migration_energy: f64,
    /// Reaction radius (nm).
    pub reaction_radius: f64,
    /// Binding energy of the cluster's own family at its representative
    /// size (eV).
    pub binding_energy: f64,
    /// Energy to emit one monomer of each species the cluster holds (eV).
    pub emission_energies: SmallVec<[(Species, f64); 4]>,
}

impl ClusterProperties {
    /// Whether the cluster diffuses.
    pub fn is_mobile(&self) -> bool {
        self.diffusion_factor > 0.0
    }

    /// Whether the interstitial count dominates the composition.
    pub fn is_interstitial_dominant(&self) -> bool {
        self.dominant == Species::I
    }

    /// Energy to emit one `species` monomer, or the family
    /// [`binding_energy`](Self::binding_energy) if the cluster holds none.
    pub fn emission_energy(&self, species: Species) -> f64 {
        self.emission_energies
            .iter()
            .find(|(sp, _)| *sp == species)
            .map_or(self.binding_energy, |&(_, e)| e)
    }
}

/// Properties of every cluster, indexed by [`ClusterId`].
#[derive(Clone, Debug)]
pub struct PropertyTable {
    entries: Vec<ClusterProperties>,
    primary_monomer: Option<ClusterId>,
}

impl PropertyTable {
    /// Compute properties for every region of `paving`.
    pub fn build(
        paving: &Subpaving,
        config: &NetworkConfig,
        lengths: &ResolvedLengths,
    ) -> Result<Self, NetworkError> {
        let profile = &config.profile;
        let primary = profile.primary_axis()?;

        let mut mobility: IndexMap<&[u32], (f64, f64)> = config
            .mobility
            .iter()
            .map(|m| {
                (
                    m.composition.as_slice(),
                    (m.diffusion_factor, m.migration_energy),
                )
            })
            .collect();

        let mut entries = Vec::with_capacity(paving.len());
        for (id, region) in paving.iter() {
            let geometry = profile.classify(region);
            let center = region.center();
            let dominant = dominant_species(profile, &center);
            let monomer = unit_monomer(profile, region);
            let size = representative_size(profile, &center);
            let family = binding_family(geometry, dominant);

            let (diffusion_factor, migration_energy) = if region.is_simplex() {
                mobility
                    .swap_remove(region.origin().as_slice())
                    .unwrap_or((0.0, 0.0))
            } else {
                (0.0, 0.0)
            };

            let reaction_radius =
                reaction_radius(profile, lengths, geometry, monomer, &center, size);
            let emission_energies = profile
                .monomer_axes
                .iter()
                .filter_map(|&sp| {
                    let n = center[profile.axis_of(sp)?];
                    let fit = emission_family(geometry, family, sp);
                    (n > 0.0).then(|| (sp, config.binding.energy(fit, n)))
                })
                .collect();

            entries.push(ClusterProperties {
                id,
                region: region.clone(),
                geometry,
                family,
                dominant,
                size,
                primary_size: center[primary],
                monomer,
                diffusion_factor,
                migration_energy,
                reaction_radius,
                binding_energy: config.binding.energy(family, size),
                emission_energies,
            });
        }

        for (composition, _) in &mobility {
            log::warn!(
                target: "clusterkin",
                "mobility entry {composition:?} matches no exact cluster and is ignored"
            );
        }

        let primary_monomer = entries
            .iter()
            .find(|p| p.monomer == Some(profile.primary))
            .map(|p| p.id);

        Ok(Self {
            entries,
            primary_monomer,
        })
    }

    /// Properties of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn get(&self, id: ClusterId) -> &ClusterProperties {
        &self.entries[id.index()]
    }

    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in cluster order.
    pub fn iter(&self) -> impl Iterator<Item = &ClusterProperties> {
        self.entries.iter()
    }

    /// Ids of clusters with `D0 > 0`.
    pub fn diffusing(&self) -> Vec<ClusterId> {
        self.entries
            .iter()
            .filter(|p| p.is_mobile())
            .map(|p| p.id)
            .collect()
    }

    /// The single-count primary monomer, if the network has one.
    pub fn primary_monomer(&self) -> Option<ClusterId> {
        self.primary_monomer
    }

    /// Binding energy of `k -> i + j`: the emission energy of the monomer
    /// among `i` and `j`, the lower one when both are monomers.
    pub fn dissociation_energy(&self, k: ClusterId, i: ClusterId, j: ClusterId) -> f64 {
        let parent = self.get(k);
        [i, j]
            .into_iter()
            .filter_map(|id| self.get(id).monomer)
            .map(|sp| parent.emission_energy(sp))
            .reduce(f64::min)
            .unwrap_or(parent.binding_energy)
    }
}

fn dominant_species(profile: &NetworkProfile, center: &[f64]) -> Species {
    let mut best = 0;
    for (ax, &c) in center.iter().enumerate() {
        if c > center[best] {
            best = ax;
        }
    }
    profile.species[best]
}

fn unit_monomer(profile: &NetworkProfile, region: &Region) -> Option<Species> {
    if !region.is_simplex() {
        return None;
    }
    let origin = region.origin();
    let mut nonzero = origin.iter().enumerate().filter(|(_, c)| **c != 0);
    match (nonzero.next(), nonzero.next()) {
        (Some((ax, &1)), None) => Some(profile.species[ax]),
        _ => None,
    }
}

/// Size along the axis that sets the cluster's volume: vacancies if any,
/// else interstitials if any, else the total count.
fn representative_size(profile: &NetworkProfile, center: &[f64]) -> f64 {
    for sp in [Species::V, Species::I] {
        if let Some(ax) = profile.axis_of(sp) {
            if center[ax] > 0.0 {
                return center[ax];
            }
        }
    }
    center.iter().sum()
}

fn size_species(profile: &NetworkProfile, center: &[f64]) -> Species {
    for sp in [Species::V, Species::I] {
        if let Some(ax) = profile.axis_of(sp) {
            if center[ax] > 0.0 {
                return sp;
            }
        }
    }
    dominant_species(profile, center)
}

fn monomer_radius(profile: &NetworkProfile, lengths: &ResolvedLengths, species: Species) -> f64 {
    if species == profile.primary && species.is_impurity() {
        return lengths.impurity_radius;
    }
    species
        .impurity_radius()
        .unwrap_or(lengths.lattice_parameter * 3f64.sqrt() / 4.0)
}

fn reaction_radius(
    profile: &NetworkProfile,
    lengths: &ResolvedLengths,
    geometry: Geometry,
    monomer: Option<Species>,
    center: &[f64],
    size: f64,
) -> f64 {
    if let Some(sp) = monomer {
        return monomer_radius(profile, lengths, sp);
    }
    match geometry {
        Geometry::Loop => (size * lengths.atomic_volume / (PI * lengths.burgers_vector)).sqrt(),
        Geometry::Sphere | Geometry::Trap | Geometry::Free | Geometry::Junction | Geometry::Complex => {
            let r1 = monomer_radius(profile, lengths, size_species(profile, center));
            if size <= 1.0 {
                r1
            } else {
                let scale = (3.0 * lengths.atomic_volume / (4.0 * PI)).cbrt();
                r1 + scale * (size.cbrt() - 1.0)
            }
        }
    }
}

/// Fit used when a cluster of `geometry` and `family` emits `emitted`.
fn emission_family(geometry: Geometry, family: BindingFamily, emitted: Species) -> BindingFamily {
    match (geometry, emitted) {
        (Geometry::Junction | Geometry::Complex, _) => family,
        (_, Species::V) => BindingFamily::Vacancy,
        (_, Species::I) => BindingFamily::Interstitial,
        (Geometry::Trap, _) => BindingFamily::Trapped,
        _ => family,
    }
}

fn binding_family(geometry: Geometry, dominant: Species) -> BindingFamily {
    match geometry {
        Geometry::Trap => BindingFamily::Trapped,
        Geometry::Junction => BindingFamily::Junction,
        Geometry::Complex => BindingFamily::Complex,
        Geometry::Sphere | Geometry::Loop | Geometry::Free => {
            if dominant == Species::I {
                BindingFamily::Interstitial
            } else {
                BindingFamily::Vacancy
            }
        }
    }
}

const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<PropertyTable>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MobilityEntry;
    use clusterkin_core::NullSink;
    use clusterkin_space::{AxisPartition, Partitioner};

    fn table(config: &NetworkConfig) -> PropertyTable {
        let paving = Partitioner::new(config.partitions.clone()).subpave().unwrap();
        let lengths = config.resolve(&NullSink).unwrap();
        PropertyTable::build(&paving, config, &lengths).unwrap()
    }

    fn find(t: &PropertyTable, composition: &[u32]) -> ClusterProperties {
        t.iter()
            .find(|p| p.region.contains(composition))
            .cloned()
            .unwrap()
    }

    #[test]
    fn clusters_without_mobility_are_immobile() {
        let mut cfg = NetworkConfig::new(NetworkProfile::ne(), 5);
        cfg.mobility.push(MobilityEntry::new(&[1], 1.0e11, 0.4));
        let t = table(&cfg);
        assert_eq!(t.diffusing(), vec![ClusterId(0)]);
        assert_eq!(find(&t, &[2]).diffusion_factor, 0.0);
        assert_eq!(t.primary_monomer(), Some(ClusterId(0)));
    }

    #[test]
    fn impurity_monomer_uses_configured_radius() {
        let mut cfg = NetworkConfig::new(NetworkProfile::ne(), 5);
        cfg.impurity_radius = 0.42;
        let t = table(&cfg);
        assert_eq!(find(&t, &[1]).reaction_radius, 0.42);
    }

    #[test]
    fn sphere_radius_grows_with_cube_root() {
        let mut cfg = NetworkConfig::new(NetworkProfile::fe(), 8);
        cfg.material = clusterkin_core::Material::Fe;
        let t = table(&cfg);
        let a = clusterkin_core::constants::IRON_LATTICE_CONSTANT;
        let r1 = a * 3f64.sqrt() / 4.0;
        assert!((find(&t, &[0, 1, 0]).reaction_radius - r1).abs() < 1e-12);

        let omega = a.powi(3) / 2.0;
        let expected = r1 + (3.0 * omega / (4.0 * PI)).cbrt() * (8f64.cbrt() - 1.0);
        assert!((find(&t, &[0, 8, 0]).reaction_radius - expected).abs() < 1e-12);
    }

    #[test]
    fn loops_use_the_burgers_vector() {
        let mut cfg = NetworkConfig::new(NetworkProfile::fe(), 6);
        cfg.material = clusterkin_core::Material::Fe;
        let t = table(&cfg);
        let p = find(&t, &[0, 0, 6]);
        assert_eq!(p.geometry, Geometry::Loop);
        assert_eq!(p.family, BindingFamily::Interstitial);
        let a = clusterkin_core::constants::IRON_LATTICE_CONSTANT;
        let omega = a.powi(3) / 2.0;
        let b = a * 3f64.sqrt() / 2.0;
        assert!((p.reaction_radius - (6.0 * omega / (PI * b)).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn traps_use_the_trapped_fit() {
        let cfg = NetworkConfig::new(NetworkProfile::fe(), 4);
        let t = table(&cfg);
        let p = find(&t, &[3, 2, 0]);
        assert_eq!(p.geometry, Geometry::Trap);
        assert_eq!(p.family, BindingFamily::Trapped);
        assert_eq!(p.size, 2.0);
        assert_eq!(
            p.binding_energy,
            cfg.binding.energy(BindingFamily::Trapped, 2.0)
        );
    }

    #[test]
    fn trapped_clusters_bind_each_species_separately() {
        let cfg = NetworkConfig::new(NetworkProfile::fe(), 4);
        let t = table(&cfg);
        let p = find(&t, &[3, 2, 0]);
        let he = p.emission_energy(Species::He);
        let v = p.emission_energy(Species::V);
        assert_eq!(he, cfg.binding.energy(BindingFamily::Trapped, 3.0));
        assert_eq!(v, cfg.binding.energy(BindingFamily::Vacancy, 2.0));
        assert_ne!(he, v);
        // No interstitials, so the family value stands in.
        assert_eq!(p.emission_energy(Species::I), p.binding_energy);

        let (k, he1, v1) = (p.id, find(&t, &[1, 0, 0]).id, find(&t, &[0, 1, 0]).id);
        let he2v2 = find(&t, &[2, 2, 0]).id;
        let he3v1 = find(&t, &[3, 1, 0]).id;
        assert_eq!(t.dissociation_energy(k, he1, he2v2), he);
        assert_eq!(t.dissociation_energy(k, v1, he3v1), v);
    }

    #[test]
    fn pure_clusters_emit_with_the_family_fit() {
        let cfg = NetworkConfig::new(NetworkProfile::ne(), 6);
        let t = table(&cfg);
        let p = find(&t, &[5]);
        assert_eq!(p.emission_energy(Species::Xe), p.binding_energy);
    }

    #[test]
    fn grouped_clusters_use_mean_size() {
        let mut cfg = NetworkConfig::new(NetworkProfile::ne(), 20);
        cfg.partitions = vec![AxisPartition::grouped(Species::Xe, 20, 5, 4).unwrap()];
        let t = table(&cfg);
        let p = find(&t, &[6]);
        assert_eq!(p.region.volume(), 4);
        assert_eq!(p.size, 6.5);
        assert_eq!(p.primary_size, 6.5);
        assert!(p.monomer.is_none());
    }
}
