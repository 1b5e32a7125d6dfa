//! Injected diagnostics sink.
//!
//! Setup and rate-recomputation code reports notable events through a
//! `&dyn DiagnosticsSink` passed in by the caller. Nothing in the workspace
//! writes to global state or installs a logger; [`LogSink`] forwards to
//! the `log` facade for hosts that already run one.

use crate::material::Material;

/// A notable event raised during setup or rate recomputation.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// A reaction network finished construction.
    NetworkBuilt {
        /// Number of clusters (degrees of freedom excluding temperature).
        clusters: usize,
        /// Number of deduplicated reactions.
        reactions: usize,
        /// Non-zero entries in the connectivity map.
        nnz: usize,
    },
    /// A non-physical parameter was replaced by a documented default.
    Fallback {
        /// Name of the parameter.
        parameter: &'static str,
        /// The rejected value.
        given: f64,
        /// The value used instead.
        used: f64,
    },
    /// Rate tables were rewritten after a temperature change.
    RatesRecomputed {
        /// Generation stamped on the new tables.
        generation: u64,
        /// Number of grid points whose tables changed.
        points: usize,
    },
    /// The heat-equation handler received its material parameters.
    HeatConfigured {
        /// Host material.
        material: Material,
        /// Surface heat flux (W nm^-2).
        flux: f64,
        /// Bulk temperature (K).
        bulk_temperature: f64,
    },
    /// The Soret handler registered its diffusing clusters.
    SoretInitialized {
        /// Number of diffusing clusters coupled to temperature.
        diffusing: usize,
    },
}

/// Receiver for [`Diagnostic`] events.
///
/// Implementations must be cheap and non-blocking; they may be called
/// from rayon worker threads.
pub trait DiagnosticsSink: Send + Sync {
    /// Record one event.
    fn record(&self, diagnostic: &Diagnostic);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&self, _diagnostic: &Diagnostic) {}
}

/// Forwards events to the `log` facade under the `clusterkin` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn record(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::NetworkBuilt {
                clusters,
                reactions,
                nnz,
            } => log::info!(
                target: "clusterkin",
                "reaction network built: {clusters} clusters, {reactions} reactions, {nnz} non-zeros"
            ),
            Diagnostic::Fallback {
                parameter,
                given,
                used,
            } => log::warn!(
                target: "clusterkin",
                "non-physical {parameter} = {given}, falling back to {used}"
            ),
            Diagnostic::RatesRecomputed { generation, points } => log::debug!(
                target: "clusterkin",
                "rates recomputed at {points} grid points (generation {generation})"
            ),
            Diagnostic::HeatConfigured {
                material,
                flux,
                bulk_temperature,
            } => log::info!(
                target: "clusterkin",
                "heat equation on {material}: flux {flux} W nm-2, bulk temperature {bulk_temperature} K"
            ),
            Diagnostic::SoretInitialized { diffusing } => log::info!(
                target: "clusterkin",
                "Soret coupling active for {diffusing} diffusing clusters"
            ),
        }
    }
}

// Compile-time assertion: the provided sinks are shareable across threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<NullSink>();
    assert::<LogSink>();
};
