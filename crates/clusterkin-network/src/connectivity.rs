//! Sparse fill map of the per-grid-point Jacobian.

use crate::reaction::Reaction;
use clusterkin_core::ClusterId;

/// For each local degree of freedom, the sorted list of degrees of freedom
/// its flux depends on.
///
/// Rows `0..num_clusters` belong to clusters. When thermal coupling is
/// enabled an extra row and column `num_clusters` stand for the
/// temperature. The map is symmetric: every participant of a reaction
/// appears in every other participant's row. Every row contains its own
/// diagonal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectivityMap {
    num_clusters: usize,
    rows: Vec<Vec<usize>>,
    temperature: bool,
}

impl ConnectivityMap {
    /// Build the cluster block from `reactions`.
    pub fn from_reactions(num_clusters: usize, reactions: &[Reaction]) -> Self {
        let mut rows: Vec<Vec<usize>> = (0..num_clusters).map(|i| vec![i]).collect();
        let mut scratch: Vec<usize> = Vec::with_capacity(4);
        for r in reactions {
            scratch.clear();
            scratch.extend(r.participants().map(ClusterId::index));
            for &a in &scratch {
                rows[a].extend(scratch.iter().copied());
            }
        }
        for row in &mut rows {
            row.sort_unstable();
            row.dedup();
        }
        Self {
            num_clusters,
            rows,
            temperature: false,
        }
    }

    /// Add the temperature row and a temperature column in every cluster
    /// row. Idempotent.
    pub fn enable_temperature(&mut self) {
        if self.temperature {
            return;
        }
        let t = self.num_clusters;
        for row in &mut self.rows {
            row.push(t);
        }
        self.rows.push(vec![t]);
        self.temperature = true;
    }

    /// Couple `clusters` to temperature in both directions: each gets the
    /// temperature column and the temperature row gets each of them.
    pub fn couple_to_temperature(&mut self, clusters: &[ClusterId]) {
        self.enable_temperature();
        let t = self.num_clusters;
        for id in clusters {
            insert_sorted(&mut self.rows[id.index()], t);
            insert_sorted(&mut self.rows[t], id.index());
        }
    }

    /// Number of clusters.
    pub fn num_clusters(&self) -> usize {
        self.num_clusters
    }

    /// Degrees of freedom per grid point.
    pub fn num_dofs(&self) -> usize {
        self.rows.len()
    }

    /// Whether the temperature degree of freedom is present.
    pub fn has_temperature(&self) -> bool {
        self.temperature
    }

    /// Index of the temperature degree of freedom, if present.
    pub fn temperature_index(&self) -> Option<usize> {
        self.temperature.then_some(self.num_clusters)
    }

    /// Dependencies of degree of freedom `dof`.
    ///
    /// # Panics
    ///
    /// Panics if `dof >= self.num_dofs()`.
    pub fn row(&self, dof: usize) -> &[usize] {
        &self.rows[dof]
    }

    /// Iterate `(dof, dependencies)` in row order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.rows.iter().enumerate().map(|(i, r)| (i, r.as_slice()))
    }

    /// Total number of structural non-zeros.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

fn insert_sorted(row: &mut Vec<usize>, v: usize) {
    if let Err(pos) = row.binary_search(&v) {
        row.insert(pos, v);
    }
}

const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<ConnectivityMap>();
};
