//! Core types and traits for the clusterkin reaction-network engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental vocabulary shared by the rest of the workspace:
//! strongly-typed ids, species and compositions, physical constants,
//! materials, the injected diagnostics sink, and per-evaluation errors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod id;
pub mod material;
pub mod species;

pub use diagnostics::{Diagnostic, DiagnosticsSink, LogSink, NullSink};
pub use error::{EvalError, ParseEnumError};
pub use id::{ClusterId, Generation, GridIndex, ReactionId};
pub use material::Material;
pub use species::{Composition, Species};
