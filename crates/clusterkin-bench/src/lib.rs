//! Benchmark profiles for clusterkin.
//!
//! - [`reference_network`]: grouped He-V network typical of a tungsten run
//! - [`reference_evaluator`]: that network on a 64-node grid with the heat
//!   equation and Soret drift coupled
//! - [`seeded_state`]: deterministic concentrations for a given evaluator

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use clusterkin_core::{GridIndex, NullSink, Species};
use clusterkin_engine::{EngineConfig, Evaluator, GridState, HeatConfig, SoretConfig};
use clusterkin_network::{MobilityEntry, NetworkBuilder, NetworkProfile, ReactionNetwork};
use clusterkin_space::{AxisPartition, SpatialGrid};
use clusterkin_test_utils::seeded_concentrations;

/// He up to `max_he`, V up to `max_v`, both grouped in runs of 4 past 8.
pub fn reference_network(max_he: u32, max_v: u32) -> ReactionNetwork {
    let profile = NetworkProfile::new("HeV", &[Species::He, Species::V], Species::He);
    NetworkBuilder::new(profile)
        .partition(AxisPartition::grouped(Species::He, max_he, 9, 4).unwrap())
        .partition(AxisPartition::grouped(Species::V, max_v, 9, 4).unwrap())
        .mobility(MobilityEntry::new(&[1, 0], 2.95e10, 0.13))
        .mobility(MobilityEntry::new(&[2, 0], 3.24e10, 0.20))
        .mobility(MobilityEntry::new(&[0, 1], 1.8e12, 1.30))
        .build(&NullSink)
        .unwrap()
}

/// [`reference_network`] with thermal coupling on 64 nodes 0.5 nm apart.
pub fn reference_evaluator(max_he: u32, max_v: u32) -> Evaluator {
    let config = EngineConfig {
        heat: Some(HeatConfig::new(2.0e-7, 1000.0, "W100")),
        soret: SoretConfig {
            enabled: true,
            beta: 0.3,
            heat_flux: 2.0e-7,
            conductivity: 1.7e-7,
        },
        ..EngineConfig::default()
    };
    Evaluator::new(
        Arc::new(reference_network(max_he, max_v)),
        SpatialGrid::uniform(64, 0.5, 1).unwrap(),
        config,
        &NullSink,
    )
    .unwrap()
}

/// Concentrations drawn from `seed`, temperatures at the bulk value.
pub fn seeded_state(eval: &Evaluator, seed: u64) -> GridState {
    let mut state = eval.new_state();
    let clusters = eval.network().num_clusters();
    let conc = seeded_concentrations(seed, state.num_points() * clusters, 1.0e-12, 1.0e-4);
    for (p, chunk) in conc.chunks(clusters).enumerate() {
        state.point_mut(GridIndex(p))[..clusters].copy_from_slice(chunk);
    }
    state
}
