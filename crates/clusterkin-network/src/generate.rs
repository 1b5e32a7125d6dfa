//! Combinatorial reaction generation.
//!
//! Every unordered pair `(i, j)`, `i <= j`, is tested against the region
//! index for products whose region overlaps the reachable sum box
//! `[origin_i + origin_j, upper_i + upper_j - 2]`. Rows of the upper
//! triangle are scanned in parallel and concatenated in row order, so the
//! result does not depend on thread scheduling.

use crate::error::NetworkError;
use crate::properties::PropertyTable;
use crate::reaction::{Reaction, ReactionKey};
use clusterkin_core::{ClusterId, Composition, Species};
use clusterkin_space::{RegionIndex, Subpaving};
use indexmap::IndexMap;
use rayon::prelude::*;

/// Which optional channels to generate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneratorSettings {
    /// Register primary monomer + primary monomer as nucleation.
    pub nucleation: bool,
    /// Smallest primary size that loses monomers by re-solution; `None`
    /// disables re-solution.
    pub resolution_min_size: Option<u32>,
    /// Register a sink channel for every mobile cluster.
    pub sinks: bool,
    /// Species along which a unit monomer can dissociate.
    pub monomer_axes: Vec<Species>,
    /// The primary species.
    pub primary: Option<Species>,
}

/// Generate the deduplicated reaction list, sorted by identity.
pub fn generate_reactions(
    paving: &Subpaving,
    index: &RegionIndex,
    table: &PropertyTable,
    settings: &GeneratorSettings,
) -> Result<Vec<Reaction>, NetworkError> {
    let n = paving.len();
    let rows: Vec<Vec<Reaction>> = (0..n)
        .into_par_iter()
        .map(|i| scan_row(ClusterId(i as u32), paving, index, table, settings))
        .collect::<Result<_, _>>()?;

    let mut unique: IndexMap<ReactionKey, f64> = IndexMap::new();
    for r in rows.into_iter().flatten() {
        unique.entry(r.key).or_insert(r.coefficient);
    }
    if settings.sinks {
        for p in table.iter().filter(|p| p.is_mobile()) {
            let r = Reaction::sink(p.id);
            unique.entry(r.key).or_insert(r.coefficient);
        }
    }
    unique.sort_keys();

    log::debug!(
        target: "clusterkin",
        "generated {} reactions over {} clusters",
        unique.len(),
        n
    );
    Ok(unique
        .into_iter()
        .map(|(key, coefficient)| Reaction { key, coefficient })
        .collect())
}

fn scan_row(
    i: ClusterId,
    paving: &Subpaving,
    index: &RegionIndex,
    table: &PropertyTable,
    settings: &GeneratorSettings,
) -> Result<Vec<Reaction>, NetworkError> {
    let ri = paving.region(i);
    let oi = ri.origin();
    let ui = ri.upper_limit();
    let pi = table.get(i);
    let is_primary_monomer = |id: ClusterId| {
        settings.primary.is_some() && table.get(id).monomer == settings.primary
    };
    let emits = |id: ClusterId| {
        table
            .get(id)
            .monomer
            .is_some_and(|sp| settings.monomer_axes.contains(&sp))
    };

    let mut out = Vec::new();
    for j in i.0..paving.len() as u32 {
        let j = ClusterId(j);
        let rj = paving.region(j);
        let lo: Composition = oi.iter().zip(rj.origin()).map(|(a, b)| a + b).collect();
        let hi: Composition = ui
            .iter()
            .zip(rj.upper_limit())
            .map(|(a, b)| a + b - 2)
            .collect();

        let any_simplex = pi.region.is_simplex() || rj.is_simplex();
        let monomer_pair = emits(i) || emits(j);
        let primary_pair = is_primary_monomer(i) || is_primary_monomer(j);

        for k in index.query(&lo, &hi)? {
            let rk = paving.region(k);
            let w: f64 = (0..rk.ndim())
                .map(|ax| ri.axis(ax).sum_fraction(&rj.axis(ax), &rk.axis(ax)))
                .product();
            if w <= 0.0 {
                continue;
            }

            if settings.nucleation && is_primary_monomer(i) && is_primary_monomer(j) {
                out.push(Reaction::nucleation(i, k));
            } else {
                out.push(Reaction::production(i, j, k, w));
            }

            if any_simplex && monomer_pair {
                out.push(Reaction::dissociation(k, i, j, w));
            }

            if let Some(min) = settings.resolution_min_size {
                if primary_pair && table.get(k).primary_size >= f64::from(min) {
                    out.push(Reaction::resolution(k, i, j, w));
                }
            }
        }
    }
    Ok(out)
}
