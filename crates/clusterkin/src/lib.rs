//! Clusterkin: cluster-dynamics reaction networks with spatial transport and
//! thermal coupling.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! clusterkin sub-crates. For most users, adding `clusterkin` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use clusterkin::prelude::*;
//!
//! // Xenon clusters up to 8 atoms; only the monomer moves.
//! let network = NetworkBuilder::new(NetworkProfile::ne())
//!     .max_size(Species::Xe, 8)
//!     .mobility(MobilityEntry::new(&[1], 1.0e11, 1.0))
//!     .build(&NullSink)
//!     .unwrap();
//!
//! // Ten depth nodes 0.5 nm apart, constant temperature.
//! let grid = SpatialGrid::uniform(10, 0.5, 1).unwrap();
//! let config = EngineConfig {
//!     temperature: 1200.0,
//!     ..EngineConfig::default()
//! };
//! let mut eval = Evaluator::new(Arc::new(network), grid, config, &NullSink).unwrap();
//!
//! let mut state = eval.new_state();
//! state.point_mut(GridIndex(4))[0] = 1.0e-4;
//!
//! let mut flux = vec![0.0; state.as_slice().len()];
//! eval.evaluate_all_flux(&state, &mut flux).unwrap();
//! let jacobian = eval.evaluate_all_jacobian(&state).unwrap();
//! assert!(flux[4 * eval.dofs_per_point()] < 0.0);
//! assert!(!jacobian.is_empty());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `clusterkin-core` | IDs, species, materials, diagnostics, evaluation errors |
//! | [`space`] | `clusterkin-space` | Composition-space partitioning and the spatial grid |
//! | [`network`] | `clusterkin-network` | Profiles, properties, reaction generation, connectivity |
//! | [`rates`] | `clusterkin-rates` | Rate laws and the per-grid-point rate cache |
//! | [`engine`] | `clusterkin-engine` | Flux/Jacobian assembly, diffusion, Soret, heat equation |
//! | [`uq`] | `clusterkin-uq` | Log-posterior evaluation for parameter calibration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, IDs, and the diagnostics sink (`clusterkin-core`).
pub use clusterkin_core as types;

/// Composition-space partitioning and the spatial grid (`clusterkin-space`).
///
/// [`space::Partitioner`] cuts composition space into the regions that
/// become clusters; [`space::SpatialGrid`] holds the depth nodes.
pub use clusterkin_space as space;

/// Reaction networks (`clusterkin-network`).
///
/// [`network::NetworkBuilder`] produces an immutable
/// [`network::ReactionNetwork`] from a profile and configuration.
pub use clusterkin_network as network;

/// Rate laws (`clusterkin-rates`).
pub use clusterkin_rates as rates;

/// Flux and Jacobian evaluation (`clusterkin-engine`).
///
/// [`engine::Evaluator`] is the per-step entry point.
pub use clusterkin_engine as engine;

/// Parameter calibration (`clusterkin-uq`).
pub use clusterkin_uq as uq;

/// Common imports for typical clusterkin usage.
///
/// ```rust
/// use clusterkin::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use clusterkin_core::{
        ClusterId, Diagnostic, DiagnosticsSink, GridIndex, LogSink, Material, NullSink,
        ReactionId, Species,
    };

    // Errors
    pub use clusterkin_core::EvalError;
    pub use clusterkin_engine::ConfigError;
    pub use clusterkin_network::NetworkError;
    pub use clusterkin_space::SpaceError;

    // Space
    pub use clusterkin_space::{AxisPartition, SpatialGrid};

    // Network
    pub use clusterkin_network::{
        MobilityEntry, NetworkBuilder, NetworkProfile, Reaction, ReactionKind, ReactionNetwork,
        SinkSettings,
    };

    // Rates
    pub use clusterkin_rates::{ClusterData, RateCache};

    // Engine
    pub use clusterkin_engine::{
        EngineConfig, Evaluator, GridState, HeatConfig, SoretConfig, StepMetrics, Triplet,
    };
}
