//! Reaction channels.

use clusterkin_core::ClusterId;
use smallvec::{smallvec, SmallVec};
use std::fmt;

/// Kind of a reaction channel.
///
/// The declaration order is the identity order used to sort the network's
/// reaction list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReactionKind {
    /// `i + j -> k`.
    Production,
    /// `k -> i + j`, emission of a monomer.
    Dissociation,
    /// `k -> i + j`, irradiation-driven loss of a primary monomer.
    ReSolution,
    /// `i -> ∅`, absorption at extended defects.
    Sink,
    /// `1 + 1 -> 2` at a fixed heterogeneous rate.
    Nucleation,
}

impl ReactionKind {
    /// Lower-case display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Dissociation => "dissociation",
            Self::ReSolution => "re-solution",
            Self::Sink => "sink",
            Self::Nucleation => "nucleation",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of a reaction: kind, reactants and products.
///
/// Two-body participant lists are kept sorted so `i + j` and `j + i` are the
/// same channel.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReactionKey {
    /// Channel kind.
    pub kind: ReactionKind,
    /// Consumed clusters.
    pub reactants: SmallVec<[ClusterId; 2]>,
    /// Produced clusters.
    pub products: SmallVec<[ClusterId; 2]>,
}

/// A reaction channel with its setup-time overlap coefficient.
///
/// The scalar rate is not stored here; it lives in the per-grid-point rate
/// table at this reaction's position.
#[derive(Clone, Debug, PartialEq)]
pub struct Reaction {
    /// Identity.
    pub key: ReactionKey,
    /// Fraction of reactant composition pairs whose sum lands in the
    /// product region, in `(0, 1]`.
    pub coefficient: f64,
}

fn pair(a: ClusterId, b: ClusterId) -> SmallVec<[ClusterId; 2]> {
    if a <= b {
        smallvec![a, b]
    } else {
        smallvec![b, a]
    }
}

impl Reaction {
    fn new(
        kind: ReactionKind,
        reactants: SmallVec<[ClusterId; 2]>,
        products: SmallVec<[ClusterId; 2]>,
        coefficient: f64,
    ) -> Self {
        Self {
            key: ReactionKey {
                kind,
                reactants,
                products,
            },
            coefficient,
        }
    }

    /// `i + j -> k` with overlap coefficient `w`.
    pub fn production(i: ClusterId, j: ClusterId, k: ClusterId, w: f64) -> Self {
        Self::new(ReactionKind::Production, pair(i, j), smallvec![k], w)
    }

    /// `k -> i + j` with overlap coefficient `w`.
    pub fn dissociation(k: ClusterId, i: ClusterId, j: ClusterId, w: f64) -> Self {
        Self::new(ReactionKind::Dissociation, smallvec![k], pair(i, j), w)
    }

    /// `k -> i + j` by re-solution.
    pub fn resolution(k: ClusterId, i: ClusterId, j: ClusterId, w: f64) -> Self {
        Self::new(ReactionKind::ReSolution, smallvec![k], pair(i, j), w)
    }

    /// `i -> ∅`.
    pub fn sink(i: ClusterId) -> Self {
        Self::new(ReactionKind::Sink, smallvec![i], SmallVec::new(), 1.0)
    }

    /// `monomer + monomer -> dimer`.
    pub fn nucleation(monomer: ClusterId, dimer: ClusterId) -> Self {
        Self::new(
            ReactionKind::Nucleation,
            smallvec![monomer, monomer],
            smallvec![dimer],
            1.0,
        )
    }

    /// Channel kind.
    pub fn kind(&self) -> ReactionKind {
        self.key.kind
    }

    /// Consumed clusters.
    pub fn reactants(&self) -> &[ClusterId] {
        &self.key.reactants
    }

    /// Produced clusters.
    pub fn products(&self) -> &[ClusterId] {
        &self.key.products
    }

    /// Every cluster the reaction touches, reactants first, with repeats.
    pub fn participants(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.key
            .reactants
            .iter()
            .chain(self.key.products.iter())
            .copied()
    }

    /// The cluster whose binding energy and forward capture rate define a
    /// dissociation-type channel: `(k, i, j)` for `k -> i + j`.
    pub fn split(&self) -> Option<(ClusterId, ClusterId, ClusterId)> {
        match (self.key.reactants.as_slice(), self.key.products.as_slice()) {
            ([k], [i, j]) => Some((*k, *i, *j)),
            _ => None,
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |ids: &[ClusterId]| {
            ids.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" + ")
        };
        let products = if self.key.products.is_empty() {
            "∅".to_string()
        } else {
            join(&self.key.products)
        };
        write!(
            f,
            "{}: {} -> {} (w = {})",
            self.key.kind,
            join(&self.key.reactants),
            products,
            self.coefficient
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_order_is_canonical() {
        let a = Reaction::production(ClusterId(3), ClusterId(1), ClusterId(4), 1.0);
        let b = Reaction::production(ClusterId(1), ClusterId(3), ClusterId(4), 1.0);
        assert_eq!(a.key, b.key);
    }

    #[test]
    fn kinds_sort_in_identity_order() {
        let mut keys = [
            Reaction::sink(ClusterId(0)).key,
            Reaction::dissociation(ClusterId(2), ClusterId(0), ClusterId(1), 1.0).key,
            Reaction::production(ClusterId(0), ClusterId(1), ClusterId(2), 1.0).key,
        ];
        keys.sort();
        assert_eq!(keys[0].kind, ReactionKind::Production);
        assert_eq!(keys[1].kind, ReactionKind::Dissociation);
        assert_eq!(keys[2].kind, ReactionKind::Sink);
    }

    #[test]
    fn split_only_applies_to_breakup_channels() {
        let d = Reaction::dissociation(ClusterId(5), ClusterId(2), ClusterId(0), 0.5);
        assert_eq!(d.split(), Some((ClusterId(5), ClusterId(0), ClusterId(2))));
        assert!(Reaction::sink(ClusterId(1)).split().is_none());
    }

    #[test]
    fn display_names_participants() {
        let r = Reaction::sink(ClusterId(7));
        assert_eq!(r.to_string(), "sink: 7 -> ∅ (w = 1)");
    }
}
