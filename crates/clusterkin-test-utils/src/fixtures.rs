//! Reference networks.
//!
//! - [`xenon`]: ungrouped fission-gas network with a mobile monomer.
//! - [`grouped_xenon`]: the same with sizes above 4 grouped in pairs.
//! - [`iron`]: He-V-I network with mobile monomers of every species.

use clusterkin_core::{NullSink, Species};
use clusterkin_network::{MobilityEntry, NetworkBuilder, NetworkProfile, ReactionNetwork};
use clusterkin_space::AxisPartition;

/// Xe monomer: `D0 = 1e11 nm² s⁻¹`, `Em = 1 eV`.
pub fn xenon_mobility() -> MobilityEntry {
    MobilityEntry::new(&[1], 1.0e11, 1.0)
}

/// Xenon clusters up to `max` atoms, no grouping, no sinks.
pub fn xenon(max: u32) -> ReactionNetwork {
    NetworkBuilder::new(NetworkProfile::ne())
        .max_size(Species::Xe, max)
        .mobility(xenon_mobility())
        .build(&NullSink)
        .expect("xenon fixture builds")
}

/// Xenon clusters up to `max` atoms, exact up to 4 and grouped in pairs
/// beyond.
pub fn grouped_xenon(max: u32) -> ReactionNetwork {
    let axis = AxisPartition::grouped(Species::Xe, max, 5, 2).expect("valid grouping");
    NetworkBuilder::new(NetworkProfile::ne())
        .partition(axis)
        .mobility(xenon_mobility())
        .build(&NullSink)
        .expect("grouped xenon fixture builds")
}

/// Helium-vacancy-interstitial clusters in iron with mobile monomers.
pub fn iron(he: u32, v: u32, i: u32) -> ReactionNetwork {
    NetworkBuilder::new(NetworkProfile::fe())
        .max_size(Species::He, he)
        .max_size(Species::V, v)
        .max_size(Species::I, i)
        .mobility(MobilityEntry::new(&[1, 0, 0], 2.9e11, 0.13))
        .mobility(MobilityEntry::new(&[0, 1, 0], 1.8e12, 1.30))
        .mobility(MobilityEntry::new(&[0, 0, 1], 8.8e10, 0.01))
        .build(&NullSink)
        .expect("iron fixture builds")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_build() {
        assert_eq!(xenon(6).num_clusters(), 6);
        assert!(grouped_xenon(12).num_clusters() < 12);
        assert!(iron(2, 2, 2).num_clusters() > 0);
    }
}
