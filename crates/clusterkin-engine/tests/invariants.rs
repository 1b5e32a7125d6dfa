//! Conservation and structural invariants of the assembled system.

use std::collections::BTreeSet;
use std::sync::Arc;

use clusterkin_core::{ClusterId, GridIndex, NullSink};
use clusterkin_engine::{EngineConfig, Evaluator, GridState, HeatConfig, SoretConfig};
use clusterkin_network::{ReactionKind, ReactionNetwork};
use clusterkin_space::SpatialGrid;
use clusterkin_test_utils::{fixtures, seeded_concentrations};
use proptest::prelude::*;

fn reactions_only(network: ReactionNetwork) -> Evaluator {
    let config = EngineConfig {
        diffusion: false,
        ..EngineConfig::default()
    };
    Evaluator::new(
        Arc::new(network),
        SpatialGrid::uniform(3, 1.0, 1).unwrap(),
        config,
        &NullSink,
    )
    .unwrap()
}

fn fill(eval: &Evaluator, seed: u64) -> GridState {
    let mut state = eval.new_state();
    let n = state.as_slice().len();
    state
        .as_mut_slice()
        .copy_from_slice(&seeded_concentrations(seed, n, 1.0e-10, 1.0e-2));
    state
}

/// Largest single reaction term at `index`, used to scale tolerances.
fn largest_term(eval: &Evaluator, state: &GridState, index: GridIndex) -> f64 {
    let data = eval.cache().get(index).unwrap();
    let c = state.point(index);
    eval.network()
        .reactions()
        .iter()
        .zip(data.rates())
        .map(|(r, &k)| {
            let reactants: f64 = r.reactants().iter().map(|id| c[id.index()]).product();
            (k * r.coefficient * reactants).abs()
        })
        .fold(0.0, f64::max)
}

/// `Σ_i n_i(axis) · f_i` at `index`.
fn axis_balance(eval: &Evaluator, state: &GridState, index: GridIndex, axis: usize) -> f64 {
    let flux = eval.evaluate_flux(state, index).unwrap();
    let network = eval.network();
    (0..network.num_clusters())
        .map(|i| {
            let count = network.cluster(ClusterId(i as u32)).region.origin()[axis];
            f64::from(count) * flux[i]
        })
        .sum()
}

fn assert_conserved(eval: &Evaluator, seed: u64, axes: usize) {
    let state = fill(eval, seed);
    let index = GridIndex(1);
    let scale = largest_term(eval, &state, index) * eval.network().reactions().len() as f64;
    for axis in 0..axes {
        let balance = axis_balance(eval, &state, index, axis);
        assert!(
            balance.abs() <= 1e-10 * scale,
            "axis {axis}: net {balance} against scale {scale}"
        );
    }
}

#[test]
fn xenon_atoms_are_conserved() {
    let eval = reactions_only(fixtures::xenon(8));
    for seed in 0..8 {
        assert_conserved(&eval, seed, 1);
    }
}

#[test]
fn every_species_is_conserved_in_iron() {
    let eval = reactions_only(fixtures::iron(2, 2, 2));
    for seed in 0..4 {
        assert_conserved(&eval, seed, 3);
    }
}

/// Rebuild the flux at `index` term by term: each reaction moves the same
/// `f = w · k · Π c` out of every reactant slot and into every product.
/// Returns the flux and, per cluster, the sum of `|f|` touching it.
fn termwise_flux(eval: &Evaluator, state: &GridState, index: GridIndex) -> (Vec<f64>, Vec<f64>) {
    let network = eval.network();
    let data = eval.cache().get(index).unwrap();
    let c = state.point(index);
    let mut flux = vec![0.0; network.num_clusters()];
    let mut scale = vec![0.0; network.num_clusters()];
    for (r, &k) in network.reactions().iter().zip(data.rates()) {
        let reactants = r.reactants();
        let conc: f64 = match r.kind() {
            ReactionKind::Production => reactants.iter().map(|id| c[id.index()]).product(),
            _ => c[reactants[0].index()],
        };
        let f = r.coefficient * k * conc;
        for id in reactants {
            flux[id.index()] -= f;
            scale[id.index()] += f.abs();
        }
        for id in r.products() {
            flux[id.index()] += f;
            scale[id.index()] += f.abs();
        }
    }
    (flux, scale)
}

fn assert_termwise(eval: &Evaluator, seed: u64) {
    let state = fill(eval, seed);
    for p in 0..state.num_points() {
        let index = GridIndex(p);
        let flux = eval.evaluate_flux(&state, index).unwrap();
        let (expected, scale) = termwise_flux(eval, &state, index);
        for (i, ((got, want), s)) in flux.iter().zip(&expected).zip(&scale).enumerate() {
            assert!(
                (got - want).abs() <= 1e-12 * s,
                "point {p} cluster {i}: {got} against {want}"
            );
        }
    }
}

#[test]
fn grouped_network_splits_productions() {
    let network = fixtures::grouped_xenon(16);
    let partial = network
        .reactions()
        .iter()
        .filter(|r| r.kind() == ReactionKind::Production && r.coefficient < 1.0)
        .count();
    assert!(partial > 0);
    assert_termwise(&reactions_only(network), 3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn grouped_flux_moves_each_term_between_its_slots(seed in any::<u64>(), max in 8u32..24) {
        let eval = reactions_only(fixtures::grouped_xenon(max));
        assert_termwise(&eval, seed);
    }

    #[test]
    fn conservation_holds_for_any_state(seed in any::<u64>(), max in 2u32..10) {
        let eval = reactions_only(fixtures::xenon(max));
        assert_conserved(&eval, seed, 1);
    }

    #[test]
    fn sparsity_ignores_concentrations(
        seed in any::<u64>(),
        zeros in prop::collection::vec(any::<bool>(), 4 * 5),
    ) {
        let config = EngineConfig {
            heat: Some(HeatConfig::new(1.0e-7, 1000.0, "W100")),
            soret: SoretConfig {
                enabled: true,
                beta: 1.0,
                heat_flux: 1.0e-7,
                conductivity: 1.0e-7,
            },
            ..EngineConfig::default()
        };
        let mut eval = Evaluator::new(
            Arc::new(fixtures::xenon(4)),
            SpatialGrid::uniform(4, 1.0, 1).unwrap(),
            config,
            &NullSink,
        )
        .unwrap();
        let t = eval.connectivity().temperature_index().unwrap();

        let reference = eval.new_state();
        let mut state = eval.new_state();
        let conc = seeded_concentrations(seed, 4 * 4, 1.0e-9, 1.0e-1);
        for p in 0..4 {
            let point = state.point_mut(GridIndex(p));
            for d in 0..4 {
                point[d] = if zeros[p * 5 + d] { 0.0 } else { conc[p * 4 + d] };
            }
            point[t] = if zeros[p * 5 + 4] { 900.0 } else { 1100.0 };
        }

        let coordinates = |eval: &mut Evaluator, state: &GridState| -> BTreeSet<(usize, usize)> {
            eval.evaluate_all_jacobian(state)
                .unwrap()
                .into_iter()
                .map(|e| (e.row, e.column))
                .collect()
        };
        let a = coordinates(&mut eval, &reference);
        let b = coordinates(&mut eval, &state);
        prop_assert_eq!(a, b);
    }
}
