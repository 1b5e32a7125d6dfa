//! Flux and Jacobian assembly for clusterkin.
//!
//! The [`Evaluator`] combines four contributions at every grid point:
//!
//! - reaction terms from the [`Assembler`], which lowers the network's
//!   reactions into precomputed flux terms and a fixed CSR Jacobian block;
//! - Fickian diffusion of mobile clusters ([`FickianDiffusion`]);
//! - Soret drift along the thermal gradient ([`SoretHandler`]);
//! - the heat equation for the temperature degree of freedom
//!   ([`HeatEquationHandler`]).
//!
//! The network is shared read-only behind an `Arc`. Rate tables live in a
//! [`RateCache`](clusterkin_rates::RateCache) owned by the evaluator and
//! are rewritten only by
//! [`Evaluator::update_temperatures`], which takes `&mut self`; every
//! evaluation call takes `&self` plus a caller-owned [`GridState`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod assembler;
pub mod config;
pub mod diffusion;
pub mod evaluator;
pub mod heat;
pub mod metrics;
pub mod sequence;
pub mod soret;
pub mod state;

pub use assembler::{Assembler, BlockRow, JacobianBlock};
pub use config::{ConfigError, EngineConfig, HeatConfig, SoretConfig};
pub use diffusion::FickianDiffusion;
pub use evaluator::{Evaluator, Triplet};
pub use heat::{
    surface_stencil, ConductivityFit, HeatEquationHandler, HeatParameters, HeatState,
};
pub use metrics::StepMetrics;
pub use sequence::GrowthFactorStepSequence;
pub use soret::SoretHandler;
pub use state::{GridState, Offset, Stencil, StencilEntry};
