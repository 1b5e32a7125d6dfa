//! Reaction flux and Jacobian assembly at one grid point.
//!
//! Every reaction is lowered once at setup into a term: the
//! concentrations its flux multiplies, the net stoichiometry it applies,
//! and the precomputed CSR positions each partial derivative lands in.
//! Assembly is then a flat loop over terms with no lookups, and the
//! Jacobian index structure never depends on concentrations.

use crate::config::ConfigError;
use clusterkin_core::{ClusterId, EvalError};
use clusterkin_network::{ConnectivityMap, Reaction, ReactionKind, ReactionNetwork};
use clusterkin_rates::ClusterData;
use smallvec::{smallvec, SmallVec};

// ── JacobianBlock ──────────────────────────────────────────────────

/// The per-grid-point Jacobian in CSR layout.
///
/// Rows and columns are local degrees of freedom. The structure is copied
/// from a [`ConnectivityMap`] and never changes; only the values do.
#[derive(Clone, Debug, PartialEq)]
pub struct JacobianBlock {
    offsets: Vec<usize>,
    columns: Vec<usize>,
    values: Vec<f64>,
}

/// One row of a [`JacobianBlock`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockRow<'a> {
    /// Local row degree of freedom.
    pub row: usize,
    /// Sorted column degrees of freedom.
    pub columns: &'a [usize],
    /// Values aligned with `columns`.
    pub values: &'a [f64],
}

impl JacobianBlock {
    /// A zeroed block with the structure of `map`.
    pub fn from_connectivity(map: &ConnectivityMap) -> Self {
        let mut offsets = Vec::with_capacity(map.num_dofs() + 1);
        let mut columns = Vec::with_capacity(map.nnz());
        offsets.push(0);
        for (_, row) in map.iter() {
            columns.extend_from_slice(row);
            offsets.push(columns.len());
        }
        let values = vec![0.0; columns.len()];
        Self {
            offsets,
            columns,
            values,
        }
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of structural non-zeros.
    pub fn nnz(&self) -> usize {
        self.columns.len()
    }

    /// Position of entry `(row, column)` in the value array.
    pub fn position(&self, row: usize, column: usize) -> Option<usize> {
        let lo = *self.offsets.get(row)?;
        let hi = *self.offsets.get(row + 1)?;
        self.columns[lo..hi]
            .binary_search(&column)
            .ok()
            .map(|p| lo + p)
    }

    /// Value of entry `(row, column)`, if it is structural.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.position(row, column).map(|p| self.values[p])
    }

    /// Row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.num_rows()`.
    pub fn row(&self, row: usize) -> BlockRow<'_> {
        let (lo, hi) = (self.offsets[row], self.offsets[row + 1]);
        BlockRow {
            row,
            columns: &self.columns[lo..hi],
            values: &self.values[lo..hi],
        }
    }

    /// The requested rows, in the order given. Out-of-range rows are
    /// skipped.
    pub fn rows(&self, subset: &[usize]) -> Vec<BlockRow<'_>> {
        subset
            .iter()
            .filter(|&&r| r < self.num_rows())
            .map(|&r| self.row(r))
            .collect()
    }

    /// Iterate every row.
    pub fn iter(&self) -> impl Iterator<Item = BlockRow<'_>> {
        (0..self.num_rows()).map(|r| self.row(r))
    }

    /// Reset every value to zero, keeping the structure.
    pub fn clear(&mut self) {
        self.values.fill(0.0);
    }

    /// Value array aligned with the CSR columns.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

// ── Term ───────────────────────────────────────────────────────────

/// A reaction lowered for assembly: `f = w · k · Π c[factors]`.
#[derive(Clone, Debug, PartialEq)]
struct Term {
    coefficient: f64,
    factors: SmallVec<[usize; 2]>,
    /// Net change per cluster, merged so each cluster appears once.
    stoichiometry: SmallVec<[(usize, f64); 3]>,
    /// Position of `(stoichiometry[s].0, factors[p])` at `s * factors.len() + p`.
    scatter: SmallVec<[usize; 6]>,
    /// Position of `(stoichiometry[s].0, T)`; empty without a temperature
    /// degree of freedom.
    temperature: SmallVec<[usize; 3]>,
}

fn accumulate(st: &mut SmallVec<[(usize, f64); 3]>, id: ClusterId, delta: f64) {
    let id = id.index();
    match st.iter_mut().find(|(c, _)| *c == id) {
        Some((_, v)) => *v += delta,
        None => st.push((id, delta)),
    }
}

fn lower(reaction: &Reaction) -> (SmallVec<[usize; 2]>, SmallVec<[(usize, f64); 3]>) {
    let mut st = SmallVec::new();
    let factors: SmallVec<[usize; 2]> = match reaction.kind() {
        ReactionKind::Production => {
            for &r in reaction.reactants() {
                accumulate(&mut st, r, -1.0);
            }
            for &p in reaction.products() {
                accumulate(&mut st, p, 1.0);
            }
            reaction.reactants().iter().map(|c| c.index()).collect()
        }
        ReactionKind::Nucleation => {
            let monomer = reaction.reactants()[0];
            accumulate(&mut st, monomer, -2.0);
            for &p in reaction.products() {
                accumulate(&mut st, p, 1.0);
            }
            smallvec![monomer.index()]
        }
        ReactionKind::Dissociation | ReactionKind::ReSolution | ReactionKind::Sink => {
            let source = reaction.reactants()[0];
            accumulate(&mut st, source, -1.0);
            for &p in reaction.products() {
                accumulate(&mut st, p, 1.0);
            }
            smallvec![source.index()]
        }
    };
    (factors, st)
}

fn product(conc: &[f64], factors: &[usize], skip: Option<usize>) -> f64 {
    factors
        .iter()
        .enumerate()
        .filter(|(p, _)| Some(*p) != skip)
        .map(|(_, &c)| conc[c])
        .product()
}

// ── Assembler ──────────────────────────────────────────────────────

/// Reaction-term flux and Jacobian assembly for one network.
#[derive(Clone, Debug)]
pub struct Assembler {
    terms: Vec<Term>,
    num_clusters: usize,
    template: JacobianBlock,
}

impl Assembler {
    /// Lower every reaction of `network` against the fill map
    /// `connectivity`.
    ///
    /// `connectivity` may carry a temperature degree of freedom; if it does,
    /// `∂f/∂T` is scattered into the temperature column. Returns
    /// [`ConfigError::IncompleteConnectivity`] if a reaction touches an
    /// entry the map lacks.
    pub fn new(network: &ReactionNetwork, connectivity: &ConnectivityMap) -> Result<Self, ConfigError> {
        let template = JacobianBlock::from_connectivity(connectivity);
        let t = connectivity.temperature_index();
        let locate = |row: usize, column: usize| {
            template
                .position(row, column)
                .ok_or(ConfigError::IncompleteConnectivity { row, column })
        };

        let mut terms = Vec::with_capacity(network.reactions().len());
        for reaction in network.reactions() {
            let (factors, stoichiometry) = lower(reaction);
            let mut scatter = SmallVec::new();
            let mut temperature = SmallVec::new();
            for &(row, _) in &stoichiometry {
                for &column in &factors {
                    scatter.push(locate(row, column)?);
                }
                if let Some(t) = t {
                    temperature.push(locate(row, t)?);
                }
            }
            terms.push(Term {
                coefficient: reaction.coefficient,
                factors,
                stoichiometry,
                scatter,
                temperature,
            });
        }

        log::debug!(
            target: "clusterkin",
            "assembler: {} reaction terms over {} non-zeros",
            terms.len(),
            template.nnz()
        );
        Ok(Self {
            terms,
            num_clusters: network.num_clusters(),
            template,
        })
    }

    /// Number of lowered reactions.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// A zeroed block with the assembler's structure.
    pub fn new_block(&self) -> JacobianBlock {
        self.template.clone()
    }

    fn check(&self, data: &ClusterData, conc: &[f64], out_len: usize) -> Result<(), EvalError> {
        let checks = [
            ("rates", self.terms.len(), data.rates().len()),
            ("concentrations", self.num_clusters, conc.len().min(self.num_clusters)),
            ("flux output", self.num_clusters, out_len.min(self.num_clusters)),
        ];
        for (what, expected, found) in checks {
            if found != expected {
                return Err(EvalError::StateShape {
                    what,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }

    /// Add every reaction's net production minus consumption to `out`.
    ///
    /// `conc` and `out` hold at least one entry per cluster; a trailing
    /// temperature entry is ignored.
    pub fn assemble_flux(&self, data: &ClusterData, conc: &[f64], out: &mut [f64]) -> Result<(), EvalError> {
        self.check(data, conc, out.len())?;
        for (term, &k) in self.terms.iter().zip(data.rates()) {
            let f = term.coefficient * k * product(conc, &term.factors, None);
            for &(row, s) in &term.stoichiometry {
                out[row] += s * f;
            }
        }
        Ok(())
    }

    /// Add every reaction's partial derivatives to `out`.
    ///
    /// `out` must come from [`new_block`](Self::new_block). Values are
    /// added, not overwritten; call [`JacobianBlock::clear`] first to start
    /// from zero. Zero-rate reactions are still scattered.
    pub fn assemble_partials(
        &self,
        data: &ClusterData,
        conc: &[f64],
        out: &mut JacobianBlock,
    ) -> Result<(), EvalError> {
        self.check(data, conc, self.num_clusters)?;
        if out.nnz() != self.template.nnz() {
            return Err(EvalError::StateShape {
                what: "jacobian block",
                expected: self.template.nnz(),
                found: out.nnz(),
            });
        }
        let rates = data.rates().iter().zip(data.rates_dt());
        for (term, (&k, &dk)) in self.terms.iter().zip(rates) {
            let wk = term.coefficient * k;
            let np = term.factors.len();
            for p in 0..np {
                let d = wk * product(conc, &term.factors, Some(p));
                for (s, &(_, coef)) in term.stoichiometry.iter().enumerate() {
                    out.values[term.scatter[s * np + p]] += coef * d;
                }
            }
            if !term.temperature.is_empty() {
                let df = term.coefficient * dk * product(conc, &term.factors, None);
                for (&pos, &(_, coef)) in term.temperature.iter().zip(&term.stoichiometry) {
                    out.values[pos] += coef * df;
                }
            }
        }
        Ok(())
    }
}

const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Assembler>();
    assert::<JacobianBlock>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use clusterkin_core::{GridIndex, NullSink, Species};
    use clusterkin_network::{MobilityEntry, NetworkBuilder, NetworkProfile, SinkSettings};

    fn network(nucleation: bool) -> ReactionNetwork {
        let mut b = NetworkBuilder::new(NetworkProfile::ne())
            .max_size(Species::Xe, 4)
            .mobility(MobilityEntry::new(&[1], 1.0e11, 1.0))
            .sinks(SinkSettings::default());
        if nucleation {
            b = b.nucleation(1.0e-3);
        }
        b.build(&NullSink).unwrap()
    }

    #[test]
    fn csr_structure_mirrors_connectivity() {
        let net = network(false);
        let block = JacobianBlock::from_connectivity(net.connectivity());
        assert_eq!(block.nnz(), net.connectivity().nnz());
        for (r, row) in net.connectivity().iter() {
            assert_eq!(block.row(r).columns, row);
        }
        assert_eq!(block.position(0, 99), None);
    }

    #[test]
    fn missing_entry_is_a_config_error() {
        let net = network(false);
        let sparse = ConnectivityMap::from_reactions(net.num_clusters(), &[]);
        let err = Assembler::new(&net, &sparse).unwrap_err();
        assert!(matches!(err, ConfigError::IncompleteConnectivity { .. }));
    }

    #[test]
    fn self_production_consumes_twice() {
        let net = network(false);
        let asm = Assembler::new(&net, net.connectivity()).unwrap();
        let data = ClusterData::compute(&net, GridIndex(0), 1000.0).unwrap();
        let mut conc = vec![0.0; net.num_clusters()];
        conc[0] = 1.0e-3;
        let mut out = vec![0.0; net.num_clusters()];
        asm.assemble_flux(&data, &conc, &mut out).unwrap();

        let dimer = net.find(&[2]).unwrap().index();
        let pid = net
            .reactions()
            .iter()
            .position(|r| r.kind() == ReactionKind::Production && r.products()[0].index() == dimer)
            .unwrap();
        let sid = net
            .reactions()
            .iter()
            .position(|r| r.kind() == ReactionKind::Sink && r.reactants()[0].index() == 0)
            .unwrap();
        let f = data.rates()[pid] * conc[0] * conc[0];
        let sink = data.rates()[sid] * conc[0];
        assert!((out[dimer] - f).abs() <= 1e-12 * f.abs());
        assert!((out[0] - (-2.0 * f - sink)).abs() <= 1e-12 * (2.0 * f + sink).abs());
    }

    #[test]
    fn nucleation_is_linear_in_the_monomer() {
        let net = network(true);
        let asm = Assembler::new(&net, net.connectivity()).unwrap();
        let data = ClusterData::compute(&net, GridIndex(0), 1000.0).unwrap();
        assert!(net
            .reactions()
            .iter()
            .any(|r| r.kind() == ReactionKind::Nucleation));

        // Only the monomer is populated, so the dimer row sees nucleation
        // alone: d(k c1)/d c1 = k.
        let mut conc = vec![0.0; net.num_clusters()];
        conc[0] = 2.0;
        let mut block = asm.new_block();
        asm.assemble_partials(&data, &conc, &mut block).unwrap();
        let dimer = net.find(&[2]).unwrap().index();
        assert_eq!(block.get(dimer, 0), Some(1.0e-3));

        let mut out = vec![0.0; net.num_clusters()];
        asm.assemble_flux(&data, &conc, &mut out).unwrap();
        assert_eq!(out[dimer], 2.0e-3);
    }

    #[test]
    fn partials_match_finite_differences() {
        let net = network(true);
        let asm = Assembler::new(&net, net.connectivity()).unwrap();
        let data = ClusterData::compute(&net, GridIndex(0), 1100.0).unwrap();
        let n = net.num_clusters();
        let conc: Vec<f64> = (0..n).map(|i| 1.0e-2 / (i as f64 + 1.0)).collect();

        let mut block = asm.new_block();
        asm.assemble_partials(&data, &conc, &mut block).unwrap();

        let flux = |c: &[f64]| {
            let mut out = vec![0.0; n];
            asm.assemble_flux(&data, c, &mut out).unwrap();
            out
        };
        for col in 0..n {
            let h = 1e-7 * conc[col];
            let mut plus = conc.clone();
            plus[col] += h;
            let mut minus = conc.clone();
            minus[col] -= h;
            let (fp, fm) = (flux(&plus), flux(&minus));
            for row in 0..n {
                let fd = (fp[row] - fm[row]) / (2.0 * h);
                let analytic = block.get(row, col).unwrap_or(0.0);
                let row_scale = block
                    .row(row)
                    .values
                    .iter()
                    .fold(fd.abs().max(analytic.abs()), |m, v| m.max(v.abs()));
                assert!(
                    (fd - analytic).abs() <= 1e-6 * row_scale,
                    "d f[{row}] / d c[{col}]: {analytic} vs {fd}"
                );
            }
        }
    }
}
