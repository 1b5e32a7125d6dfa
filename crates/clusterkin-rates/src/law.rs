//! Rate laws per reaction kind and geometry pair.
//!
//! Each law returns the rate and its temperature derivative as a [`Rate`].
//! Diffusion-limited laws are `G * (D0 + D1)` with a geometry factor `G`
//! from [`crate::geometry`], so their derivative is `G * (D0' + D1')`.

use crate::geometry::{
    loop_loop_cross_section, loop_sphere_cross_section, sphere_factor, trap_cross_section,
};
use clusterkin_core::constants::K_BOLTZMANN;
use clusterkin_core::{ClusterId, EvalError};
use clusterkin_network::{Geometry, Reaction, ReactionKind, ReactionNetwork};

/// A rate constant and its derivative with respect to temperature.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rate {
    /// Rate constant.
    pub value: f64,
    /// `∂k/∂T`.
    pub dt: f64,
}

/// `D(T) = D0 exp(-Em / (k_B T))` and `∂D/∂T = D Em / (k_B T²)`.
pub fn diffusion_coefficient(d0: f64, em: f64, temperature: f64) -> (f64, f64) {
    if d0 == 0.0 {
        return (0.0, 0.0);
    }
    let d = d0 * (-em / (K_BOLTZMANN * temperature)).exp();
    (d, d * em / (K_BOLTZMANN * temperature * temperature))
}

/// Inputs shared by every law at one grid point.
#[derive(Clone, Copy, Debug)]
pub struct RateContext<'a> {
    /// The network the reactions belong to.
    pub network: &'a ReactionNetwork,
    /// Temperature (K).
    pub temperature: f64,
    /// Per-cluster diffusion coefficients.
    pub diffusion: &'a [f64],
    /// Per-cluster `∂D/∂T`.
    pub diffusion_dt: &'a [f64],
}

impl RateContext<'_> {
    fn mobility(&self, i: ClusterId, j: ClusterId) -> (f64, f64) {
        (
            self.diffusion[i.index()] + self.diffusion[j.index()],
            self.diffusion_dt[i.index()] + self.diffusion_dt[j.index()],
        )
    }

    /// Encounter rate of clusters `i` and `j`.
    pub fn capture(&self, i: ClusterId, j: ClusterId) -> Rate {
        let net = self.network;
        let (pi, pj) = (net.cluster(i), net.cluster(j));
        let lengths = net.lengths();
        let params = net.rate_parameters();
        let (a, b) = (lengths.lattice_parameter, lengths.burgers_vector);
        let (ri, rj) = (pi.reaction_radius, pj.reaction_radius);

        let factor = match (pi.geometry, pj.geometry) {
            (Geometry::Loop, Geometry::Loop) => {
                loop_loop_cross_section(ri, rj, params.loop_angles) * b / (a * a)
            }
            (Geometry::Loop, _) => loop_sphere_cross_section(ri, rj, params.loop_angles) * b / (a * a),
            (_, Geometry::Loop) => loop_sphere_cross_section(rj, ri, params.loop_angles) * b / (a * a),
            (Geometry::Trap, _) => trap_cross_section(ri, rj) / a,
            (_, Geometry::Trap) => trap_cross_section(rj, ri) / a,
            (
                Geometry::Sphere | Geometry::Free | Geometry::Junction | Geometry::Complex,
                Geometry::Sphere | Geometry::Free | Geometry::Junction | Geometry::Complex,
            ) => sphere_factor(ri, rj, params.core_radii.get(pi.dominant, pj.dominant)),
        };
        let (d, dd) = self.mobility(i, j);
        Rate {
            value: factor * d,
            dt: factor * dd,
        }
    }

    /// `k₋ = k₊ exp(-E_b / (k_B T))` for `k -> i + j`, with `E_b` the
    /// energy to emit the monomer among `i` and `j`.
    pub fn dissociation(&self, k: ClusterId, i: ClusterId, j: ClusterId) -> Rate {
        let forward = self.capture(i, j);
        let eb = self.network.properties().dissociation_energy(k, i, j);
        let kt = K_BOLTZMANN * self.temperature;
        let boltz = (-eb / kt).exp();
        let value = forward.value * boltz;
        Rate {
            value,
            dt: forward.dt * boltz + value * eb / (kt * self.temperature),
        }
    }

    /// `k = S · bias · D`.
    pub fn sink(&self, i: ClusterId) -> Rate {
        let Some(s) = self.network.rate_parameters().sinks else {
            return Rate::default();
        };
        let bias = if self.network.cluster(i).is_interstitial_dominant() {
            s.interstitial_bias
        } else {
            1.0
        };
        Rate {
            value: s.strength * bias * self.diffusion[i.index()],
            dt: s.strength * bias * self.diffusion_dt[i.index()],
        }
    }

    /// `k = fission_rate · yield · fit · (r_k / r_1)²`.
    pub fn resolution(&self, k: ClusterId) -> Rate {
        let net = self.network;
        let params = net.rate_parameters();
        let Some(res) = params.resolution else {
            return Rate::default();
        };
        let r1 = net
            .properties()
            .primary_monomer()
            .map_or(net.lengths().impurity_radius, |m| net.cluster(m).reaction_radius);
        let ratio = net.cluster(k).reaction_radius / r1;
        Rate {
            value: params.fission_rate * params.fission_yield * res.fit * ratio * ratio,
            dt: 0.0,
        }
    }

    /// Fixed nucleation rate.
    pub fn nucleation(&self) -> Rate {
        Rate {
            value: self.network.rate_parameters().nucleation_rate,
            dt: 0.0,
        }
    }

    /// Rate of `reaction`.
    ///
    /// Returns [`EvalError::MalformedReaction`] when the participant
    /// counts do not match the kind, e.g. a dissociation with one product.
    pub fn evaluate(&self, reaction: &Reaction) -> Result<Rate, EvalError> {
        let rate = match (reaction.kind(), reaction.reactants(), reaction.products()) {
            (ReactionKind::Production, &[i, j], &[_]) => self.capture(i, j),
            (ReactionKind::Dissociation, &[k], &[i, j]) => self.dissociation(k, i, j),
            (ReactionKind::ReSolution, &[k], &[_, _]) => self.resolution(k),
            (ReactionKind::Sink, &[i], &[]) => self.sink(i),
            (ReactionKind::Nucleation, &[m, n], &[_]) if m == n => self.nucleation(),
            (kind, reactants, products) => {
                return Err(EvalError::MalformedReaction {
                    kind: kind.name(),
                    reactants: reactants.len(),
                    products: products.len(),
                })
            }
        };
        Ok(rate)
    }
}
