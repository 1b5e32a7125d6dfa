//! Temperature-dependent data for one grid point.

use crate::law::{diffusion_coefficient, Rate, RateContext};
use clusterkin_core::{EvalError, Generation, GridIndex, ReactionId};
use clusterkin_network::ReactionNetwork;
use rayon::prelude::*;

/// Diffusion coefficients and reaction rates at one temperature.
///
/// Recomputed as a whole whenever the temperature changes; never patched.
/// Read-only during assembly.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterData {
    grid: GridIndex,
    temperature: f64,
    diffusion: Vec<f64>,
    diffusion_dt: Vec<f64>,
    lattice_parameter: f64,
    atomic_volume: f64,
    rates: Vec<f64>,
    rates_dt: Vec<f64>,
    generation: Generation,
}

impl ClusterData {
    /// Evaluate every diffusion coefficient and reaction rate of `network`
    /// at `temperature`.
    ///
    /// Rejects a non-finite or non-positive temperature with
    /// [`EvalError::InvalidTemperature`].
    pub fn compute(
        network: &ReactionNetwork,
        grid: GridIndex,
        temperature: f64,
    ) -> Result<Self, EvalError> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(EvalError::InvalidTemperature {
                grid,
                value: temperature,
            });
        }

        let (diffusion, diffusion_dt): (Vec<f64>, Vec<f64>) = network
            .properties()
            .iter()
            .map(|p| diffusion_coefficient(p.diffusion_factor, p.migration_energy, temperature))
            .unzip();

        let ctx = RateContext {
            network,
            temperature,
            diffusion: &diffusion,
            diffusion_dt: &diffusion_dt,
        };
        let (rates, rates_dt): (Vec<f64>, Vec<f64>) = network
            .reactions()
            .par_iter()
            .map(|r| ctx.evaluate(r))
            .collect::<Result<Vec<Rate>, _>>()?
            .into_iter()
            .map(|Rate { value, dt }| (value, dt))
            .unzip();

        let lengths = network.lengths();
        Ok(Self {
            grid,
            temperature,
            diffusion,
            diffusion_dt,
            lattice_parameter: lengths.lattice_parameter,
            atomic_volume: lengths.atomic_volume,
            rates,
            rates_dt,
            generation: Generation::default(),
        })
    }

    /// Grid point this data belongs to.
    pub fn grid(&self) -> GridIndex {
        self.grid
    }

    /// Temperature (K).
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Per-cluster diffusion coefficients (nm² s⁻¹).
    pub fn diffusion(&self) -> &[f64] {
        &self.diffusion
    }

    /// Per-cluster `∂D/∂T`.
    pub fn diffusion_dt(&self) -> &[f64] {
        &self.diffusion_dt
    }

    /// Lattice parameter (nm).
    pub fn lattice_parameter(&self) -> f64 {
        self.lattice_parameter
    }

    /// Atomic volume (nm³).
    pub fn atomic_volume(&self) -> f64 {
        self.atomic_volume
    }

    /// Per-reaction rate constants, indexed by [`ReactionId`].
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Per-reaction `∂k/∂T`.
    pub fn rates_dt(&self) -> &[f64] {
        &self.rates_dt
    }

    /// Rate of reaction `id`.
    pub fn rate(&self, id: ReactionId) -> f64 {
        self.rates[id.index()]
    }

    /// Generation stamped by the owning cache.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub(crate) fn stamp(&mut self, generation: Generation) {
        self.generation = generation;
    }
}
