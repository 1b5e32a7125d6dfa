//! The assembled reaction network and its builder.

use crate::binding::BindingFits;
use crate::config::{
    CoreRadii, MobilityEntry, NetworkConfig, NucleationSettings, ResolutionSettings,
    ResolvedLengths, SinkSettings,
};
use crate::connectivity::ConnectivityMap;
use crate::error::NetworkError;
use crate::generate::{generate_reactions, GeneratorSettings};
use crate::profile::NetworkProfile;
use crate::properties::{ClusterProperties, PropertyTable};
use crate::reaction::Reaction;
use clusterkin_core::{ClusterId, Diagnostic, DiagnosticsSink, Material, ReactionId, Species};
use clusterkin_space::{AxisPartition, Partitioner, RegionIndex, Subpaving};

/// Rate-law inputs that are fixed at setup.
#[derive(Clone, Debug, PartialEq)]
pub struct RateParameters {
    /// Core radii for sphere-sphere capture.
    pub core_radii: CoreRadii,
    /// Sink absorption settings, if enabled.
    pub sinks: Option<SinkSettings>,
    /// Re-solution settings, if enabled.
    pub resolution: Option<ResolutionSettings>,
    /// Nucleation rate (s⁻¹); zero when disabled.
    pub nucleation_rate: f64,
    /// Fission rate density.
    pub fission_rate: f64,
    /// Fission-gas yield.
    pub fission_yield: f64,
    /// Alignment angles for loop capture averaging.
    pub loop_angles: usize,
}

/// An immutable reaction network: clusters, their properties, the
/// deduplicated reaction list, and the Jacobian fill map.
///
/// Built once by [`NetworkBuilder`] and shared by reference afterwards.
#[derive(Clone, Debug)]
pub struct ReactionNetwork {
    profile: NetworkProfile,
    material: Material,
    lengths: ResolvedLengths,
    paving: Subpaving,
    index: RegionIndex,
    properties: PropertyTable,
    reactions: Vec<Reaction>,
    connectivity: ConnectivityMap,
    rates: RateParameters,
}

impl ReactionNetwork {
    /// Build a network from a complete configuration.
    ///
    /// Any validation, partitioning or indexing failure aborts construction.
    pub fn from_config(
        config: &NetworkConfig,
        sink: &dyn DiagnosticsSink,
    ) -> Result<Self, NetworkError> {
        let lengths = config.resolve(sink)?;
        let paving = Partitioner::new(config.partitions.clone()).subpave()?;
        let index = RegionIndex::new(&paving, config.profile.primary_axis()?)?;
        let properties = PropertyTable::build(&paving, config, &lengths)?;

        let settings = GeneratorSettings {
            nucleation: config.nucleation.is_some(),
            resolution_min_size: config.resolution.map(|r| r.min_size),
            sinks: config.sinks.is_some(),
            monomer_axes: config.profile.monomer_axes.to_vec(),
            primary: Some(config.profile.primary),
        };
        let reactions = generate_reactions(&paving, &index, &properties, &settings)?;
        let connectivity = ConnectivityMap::from_reactions(paving.len(), &reactions);

        sink.record(&Diagnostic::NetworkBuilt {
            clusters: paving.len(),
            reactions: reactions.len(),
            nnz: connectivity.nnz(),
        });

        Ok(Self {
            profile: config.profile.clone(),
            material: config.material,
            lengths,
            paving,
            index,
            properties,
            reactions,
            connectivity,
            rates: RateParameters {
                core_radii: config.core_radii.clone(),
                sinks: config.sinks,
                resolution: config.resolution,
                nucleation_rate: config.nucleation.map_or(0.0, |n| n.rate),
                fission_rate: config.fission_rate,
                fission_yield: config.fission_yield,
                loop_angles: config.loop_angles,
            },
        })
    }

    /// Number of clusters.
    pub fn num_clusters(&self) -> usize {
        self.paving.len()
    }

    /// Network profile.
    pub fn profile(&self) -> &NetworkProfile {
        &self.profile
    }

    /// Host material.
    pub fn material(&self) -> Material {
        self.material
    }

    /// Lattice parameter, radii and atomic volume after fallbacks.
    pub fn lengths(&self) -> &ResolvedLengths {
        &self.lengths
    }

    /// Composition-space regions.
    pub fn paving(&self) -> &Subpaving {
        &self.paving
    }

    /// Region index over the primary axis.
    pub fn index(&self) -> &RegionIndex {
        &self.index
    }

    /// Per-cluster properties.
    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }

    /// Properties of cluster `id`.
    pub fn cluster(&self, id: ClusterId) -> &ClusterProperties {
        self.properties.get(id)
    }

    /// The cluster holding an exact composition.
    pub fn find(&self, composition: &[u32]) -> Option<ClusterId> {
        self.index.find(composition)
    }

    /// Reactions in identity order; position `n` is `ReactionId(n)`.
    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    /// Reaction `id`.
    pub fn reaction(&self, id: ReactionId) -> &Reaction {
        &self.reactions[id.index()]
    }

    /// Jacobian fill map of the cluster block.
    pub fn connectivity(&self) -> &ConnectivityMap {
        &self.connectivity
    }

    /// Rate-law parameters.
    pub fn rate_parameters(&self) -> &RateParameters {
        &self.rates
    }
}

const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<ReactionNetwork>();
};

/// Builder for [`ReactionNetwork`].
///
/// # Examples
///
/// ```
/// use clusterkin_core::{Material, NullSink, Species};
/// use clusterkin_network::{MobilityEntry, NetworkBuilder, NetworkProfile};
///
/// let network = NetworkBuilder::new(NetworkProfile::ne())
///     .max_size(Species::Xe, 8)
///     .material(Material::Fuel)
///     .mobility(MobilityEntry::new(&[1], 1.0e11, 3.04))
///     .build(&NullSink)
///     .unwrap();
/// assert_eq!(network.num_clusters(), 8);
/// ```
#[derive(Clone, Debug)]
pub struct NetworkBuilder {
    config: NetworkConfig,
}

impl NetworkBuilder {
    /// Start from `profile` with every axis exact up to 1.
    pub fn new(profile: NetworkProfile) -> Self {
        Self {
            config: NetworkConfig::new(profile, 1),
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: NetworkConfig) -> Self {
        Self { config }
    }

    /// Track `species` exactly up to `max`.
    pub fn max_size(mut self, species: Species, max: u32) -> Self {
        if let Some(p) = self.config.partitions.iter_mut().find(|p| p.species == species) {
            *p = AxisPartition::exact(species, max);
        }
        self
    }

    /// Replace the partition of one axis.
    pub fn partition(mut self, partition: AxisPartition) -> Self {
        if let Some(p) = self
            .config
            .partitions
            .iter_mut()
            .find(|p| p.species == partition.species)
        {
            *p = partition;
        }
        self
    }

    /// Host material.
    pub fn material(mut self, material: Material) -> Self {
        self.config.material = material;
        self
    }

    /// Lattice parameter (nm).
    pub fn lattice_parameter(mut self, a: f64) -> Self {
        self.config.lattice_parameter = a;
        self
    }

    /// Impurity monomer radius (nm).
    pub fn impurity_radius(mut self, r: f64) -> Self {
        self.config.impurity_radius = r;
        self
    }

    /// Add a mobility entry.
    pub fn mobility(mut self, entry: MobilityEntry) -> Self {
        self.config.mobility.push(entry);
        self
    }

    /// Binding-energy fits.
    pub fn binding(mut self, fits: BindingFits) -> Self {
        self.config.binding = fits;
        self
    }

    /// Core radius for the dominant-species pair `{a, b}`.
    pub fn core_radius(mut self, a: Species, b: Species, radius: f64) -> Self {
        self.config.core_radii.insert(a, b, radius);
        self
    }

    /// Enable sink absorption.
    pub fn sinks(mut self, settings: SinkSettings) -> Self {
        self.config.sinks = Some(settings);
        self
    }

    /// Enable re-solution.
    pub fn resolution(mut self, settings: ResolutionSettings) -> Self {
        self.config.resolution = Some(settings);
        self
    }

    /// Enable nucleation at `rate`.
    pub fn nucleation(mut self, rate: f64) -> Self {
        self.config.nucleation = Some(NucleationSettings { rate });
        self
    }

    /// Fission rate density and gas yield.
    pub fn fission(mut self, rate: f64, yield_per_fission: f64) -> Self {
        self.config.fission_rate = rate;
        self.config.fission_yield = yield_per_fission;
        self
    }

    /// Alignment angles for loop capture averaging.
    pub fn loop_angles(mut self, n: usize) -> Self {
        self.config.loop_angles = n;
        self
    }

    /// The configuration assembled so far.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Validate and build.
    pub fn build(self, sink: &dyn DiagnosticsSink) -> Result<ReactionNetwork, NetworkError> {
        ReactionNetwork::from_config(&self.config, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterkin_core::NullSink;

    #[test]
    fn builder_reports_network_built() {
        use std::sync::Mutex;
        struct Last(Mutex<Option<Diagnostic>>);
        impl DiagnosticsSink for Last {
            fn record(&self, d: &Diagnostic) {
                *self.0.lock().unwrap() = Some(d.clone());
            }
        }
        let sink = Last(Mutex::new(None));
        let net = NetworkBuilder::new(NetworkProfile::ne())
            .max_size(Species::Xe, 5)
            .lattice_parameter(0.5)
            .impurity_radius(0.3)
            .build(&sink)
            .unwrap();
        let last = sink.0.lock().unwrap().clone();
        assert_eq!(
            last,
            Some(Diagnostic::NetworkBuilt {
                clusters: 5,
                reactions: net.reactions().len(),
                nnz: net.connectivity().nnz(),
            })
        );
    }

    #[test]
    fn invalid_config_aborts_construction() {
        let err = NetworkBuilder::new(NetworkProfile::ne())
            .mobility(MobilityEntry::new(&[1, 1], 1.0, 1.0))
            .build(&NullSink)
            .unwrap_err();
        assert!(matches!(err, NetworkError::InvalidConfig { .. }));
    }

    #[test]
    fn zero_group_width_aborts_construction() {
        let err = NetworkBuilder::new(NetworkProfile::ne())
            .partition(AxisPartition {
                species: Species::Xe,
                max: 10,
                group_min: 2,
                group_width: 0,
            })
            .build(&NullSink)
            .unwrap_err();
        assert!(matches!(err, NetworkError::Space(_)));
    }

    #[test]
    fn find_maps_compositions_to_ids() {
        let net = NetworkBuilder::new(NetworkProfile::fe())
            .max_size(Species::He, 2)
            .max_size(Species::V, 2)
            .max_size(Species::I, 2)
            .build(&NullSink)
            .unwrap();
        let id = net.find(&[1, 1, 0]).unwrap();
        assert_eq!(net.cluster(id).region.origin().as_slice(), &[1, 1, 0]);
    }
}
