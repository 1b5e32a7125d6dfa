//! Fickian diffusion of mobile clusters.

use crate::state::{Offset, Stencil, StencilEntry};
use clusterkin_core::ClusterId;
use clusterkin_network::ReactionNetwork;
use clusterkin_rates::ClusterData;

/// Second-order diffusion stencil on the non-uniform depth grid plus the
/// uniform transverse axes.
///
/// Only clusters with a non-zero diffusion factor take part.
#[derive(Clone, Debug, PartialEq)]
pub struct FickianDiffusion {
    diffusing: Vec<ClusterId>,
    temperature: Option<usize>,
}

impl FickianDiffusion {
    /// Collect the diffusing clusters of `network`. `temperature` is the
    /// local temperature degree of freedom, if any.
    pub fn new(network: &ReactionNetwork, temperature: Option<usize>) -> Self {
        Self {
            diffusing: network.properties().diffusing(),
            temperature,
        }
    }

    /// Clusters this operator moves.
    pub fn diffusing(&self) -> &[ClusterId] {
        &self.diffusing
    }

    /// Add the diffusion flux of every diffusing cluster to `out`.
    pub fn compute_flux(&self, data: &ClusterData, stencil: &Stencil<'_>, out: &mut [f64]) {
        let (hl, hr) = (stencil.hx_left, stencil.hx_right);
        for &id in &self.diffusing {
            let i = id.index();
            let d = data.diffusion()[i];
            out[i] += d * depth_term(stencil, i, hl, hr) + d * transverse_term(stencil, i);
        }
    }

    /// Partial derivatives of [`compute_flux`](Self::compute_flux).
    ///
    /// Emits one entry per stencil point per diffusing cluster, plus the
    /// temperature column when present.
    pub fn compute_partials(&self, data: &ClusterData, stencil: &Stencil<'_>, out: &mut Vec<StencilEntry>) {
        let (hl, hr) = (stencil.hx_left, stencil.hx_right);
        let factor = 2.0 / (hl + hr);
        for &id in &self.diffusing {
            let i = id.index();
            let d = data.diffusion()[i];
            let s_sum: f64 = stencil.s[..stencil.transverse.len()].iter().sum();
            let mut push = |offset, value| {
                out.push(StencilEntry {
                    row: i,
                    offset,
                    column: i,
                    value,
                })
            };
            push(
                Offset::Center,
                -d * factor * (1.0 / hl + 1.0 / hr) - 2.0 * d * s_sum,
            );
            if stencil.left.is_some() {
                push(Offset::Left, d * factor / hl);
            }
            push(Offset::Right, d * factor / hr);
            for (dim, s) in stencil.s.iter().take(stencil.transverse.len()).enumerate() {
                push(Offset::Minus(dim), d * s);
                push(Offset::Plus(dim), d * s);
            }
            if let Some(t) = self.temperature {
                let dd = data.diffusion_dt()[i];
                out.push(StencilEntry {
                    row: i,
                    offset: Offset::Center,
                    column: t,
                    value: dd * (depth_term(stencil, i, hl, hr) + transverse_term(stencil, i)),
                });
            }
        }
    }
}

fn depth_term(stencil: &Stencil<'_>, i: usize, hl: f64, hr: f64) -> f64 {
    let c = stencil.center[i];
    let cl = stencil.left_value(i);
    let cr = stencil.right[i];
    (2.0 / (hl + hr)) * (cl / hl + cr / hr - (1.0 / hl + 1.0 / hr) * c)
}

fn transverse_term(stencil: &Stencil<'_>, i: usize) -> f64 {
    let c = stencil.center[i];
    stencil
        .transverse
        .iter()
        .zip(stencil.s)
        .map(|((minus, plus), s)| s * (minus[i] + plus[i] - 2.0 * c))
        .sum()
}
