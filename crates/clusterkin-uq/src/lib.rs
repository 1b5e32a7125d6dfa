//! Bayesian calibration support for clusterkin rate parameters.
//!
//! A [`Posterior`] scores a chain state against observations through a
//! cheap [`SurrogateModel`] of the full simulation. Priors and noise
//! models are closed enums parsed once from their configuration names;
//! a sampler then calls [`Posterior::log_posterior`] or the parallel
//! [`Posterior::log_posterior_batch`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod posterior;
pub mod prior;
pub mod surrogate;

pub use error::PosteriorError;
pub use posterior::{Observation, Posterior};
pub use prior::{NoiseModel, Prior, OUT_OF_SUPPORT};
pub use surrogate::{Basis, PolynomialSurrogate, SurrogateModel};
