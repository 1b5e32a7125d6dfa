//! Reaction networks for clusterkin.
//!
//! A [`ReactionNetwork`] is built once from a [`NetworkConfig`]: the
//! composition space is partitioned into clusters, each cluster receives
//! its setup-time properties, and every valid reaction channel between them
//! is derived combinatorially. The network is immutable afterwards and
//! shared by reference across grid points and threads.
//!
//! # Pieces
//!
//! - [`NetworkProfile`]: species axes, primary axis, monomer axes and
//!   classification rules
//! - [`PropertyTable`]: geometry, radius, mobility and binding energy
//! - [`generate_reactions`]: the parallel pair scan
//! - [`ConnectivityMap`]: the symmetric Jacobian fill map

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod binding;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod generate;
pub mod network;
pub mod profile;
pub mod properties;
pub mod reaction;

pub use binding::{BindingFamily, BindingFit, BindingFits};
pub use config::{
    CoreRadii, MobilityEntry, NetworkConfig, NucleationSettings, ResolutionSettings,
    ResolvedLengths, SinkSettings,
};
pub use connectivity::ConnectivityMap;
pub use error::NetworkError;
pub use generate::{generate_reactions, GeneratorSettings};
pub use network::{NetworkBuilder, RateParameters, ReactionNetwork};
pub use profile::{AxisCondition, ClassificationRule, Geometry, NetworkProfile};
pub use properties::{ClusterProperties, PropertyTable};
pub use reaction::{Reaction, ReactionKey, ReactionKind};
