//! Soret drift: diffusing clusters pushed along the thermal gradient.

use crate::config::SoretConfig;
use crate::state::{Offset, Stencil, StencilEntry};
use clusterkin_core::{ClusterId, Diagnostic, DiagnosticsSink};
use clusterkin_network::{ConnectivityMap, ReactionNetwork};
use clusterkin_rates::ClusterData;

/// Adds `D · h · (c_R − c_L) / (h_L + h_R)` to every diffusing cluster,
/// with local heat factor `h = β φ / κ / T²`.
///
/// The diffusion coefficients themselves are read, never modified.
#[derive(Clone, Debug, PartialEq)]
pub struct SoretHandler {
    diffusing: Vec<ClusterId>,
    beta: f64,
    heat_flux: f64,
    conductivity: f64,
    temperature: usize,
}

impl SoretHandler {
    /// A handler with the settings of `config` and no clusters yet.
    pub fn new(config: &SoretConfig) -> Self {
        Self {
            diffusing: Vec::new(),
            beta: config.beta,
            heat_flux: config.heat_flux,
            conductivity: config.conductivity,
            temperature: 0,
        }
    }

    /// Record the diffusing clusters of `network` and couple each of them
    /// to the temperature degree of freedom in `connectivity`.
    pub fn initialize(
        &mut self,
        network: &ReactionNetwork,
        connectivity: &mut ConnectivityMap,
        sink: &dyn DiagnosticsSink,
    ) {
        self.diffusing = network.properties().diffusing();
        connectivity.couple_to_temperature(&self.diffusing);
        self.temperature = connectivity.num_clusters();
        sink.record(&Diagnostic::SoretInitialized {
            diffusing: self.diffusing.len(),
        });
    }

    /// Clusters coupled to temperature.
    pub fn diffusing(&self) -> &[ClusterId] {
        &self.diffusing
    }

    /// Replace the heat flux `φ`.
    pub fn set_heat_flux(&mut self, flux: f64) {
        self.heat_flux = flux;
    }

    /// Replace the conductivity `κ`.
    pub fn set_conductivity(&mut self, conductivity: f64) {
        self.conductivity = conductivity;
    }

    /// `h = β φ / κ / T²`; exactly zero when `φ` or `κ` is zero.
    pub fn heat_factor(&self, temperature: f64) -> f64 {
        if self.heat_flux == 0.0 || self.conductivity == 0.0 {
            return 0.0;
        }
        self.beta * self.heat_flux / self.conductivity / (temperature * temperature)
    }

    /// Add the drift flux to `out`.
    pub fn compute_flux(&self, data: &ClusterData, stencil: &Stencil<'_>, out: &mut [f64]) {
        let h = self.heat_factor(stencil.center[self.temperature]);
        let span = stencil.hx_left + stencil.hx_right;
        for &id in &self.diffusing {
            let i = id.index();
            let gradient = stencil.right[i] - stencil.left_value(i);
            out[i] += data.diffusion()[i] * h * gradient / span;
        }
    }

    /// Partials of [`compute_flux`](Self::compute_flux) with respect to
    /// `c_L`, `c_R` and `T`.
    ///
    /// Entries are emitted even when they are zero so the Jacobian
    /// structure does not depend on the heat flux.
    pub fn compute_partials(&self, data: &ClusterData, stencil: &Stencil<'_>, out: &mut Vec<StencilEntry>) {
        let t = stencil.center[self.temperature];
        let h = self.heat_factor(t);
        let dh = -2.0 * h / t;
        let span = stencil.hx_left + stencil.hx_right;
        for &id in &self.diffusing {
            let i = id.index();
            let (d, dd) = (data.diffusion()[i], data.diffusion_dt()[i]);
            let gradient = stencil.right[i] - stencil.left_value(i);
            if stencil.left.is_some() {
                out.push(StencilEntry {
                    row: i,
                    offset: Offset::Left,
                    column: i,
                    value: -d * h / span,
                });
            }
            out.push(StencilEntry {
                row: i,
                offset: Offset::Right,
                column: i,
                value: d * h / span,
            });
            out.push(StencilEntry {
                row: i,
                offset: Offset::Center,
                column: self.temperature,
                value: (dd * h + d * dh) * gradient / span,
            });
        }
    }
}
