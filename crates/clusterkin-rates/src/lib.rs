//! Rate-law evaluation for clusterkin reaction networks.
//!
//! Given an immutable [`ReactionNetwork`](clusterkin_network::ReactionNetwork)
//! and a temperature, [`ClusterData::compute`] evaluates every cluster's
//! diffusion coefficient and every reaction's rate constant, each with its
//! temperature derivative. [`RateCache`] keeps one such table per grid point
//! and rewrites only the points whose temperature moved.
//!
//! Rate laws dispatch on the geometry pair of the reacting clusters:
//!
//! | Pair | Law |
//! |------|-----|
//! | sphere / sphere | `4π(r0 + r1 + r_core)(D0 + D1)` |
//! | trap / non-loop | `σ(D0 + D1)/a` |
//! | loop / anything | `σ̄(D0 + D1) b/a²` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod cluster_data;
pub mod geometry;
pub mod law;

pub use cache::RateCache;
pub use cluster_data::ClusterData;
pub use law::{diffusion_coefficient, Rate, RateContext};

const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<RateCache>();
    assert::<ClusterData>();
};
