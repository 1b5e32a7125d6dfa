//! Per-step flux and Jacobian evaluation over the whole grid.
//!
//! [`Evaluator`] ties an immutable [`ReactionNetwork`] to a spatial grid:
//! it owns the rate cache, the reaction assembler and the stencil handlers
//! (Fickian diffusion, Soret drift, heat equation). Evaluations read the
//! caller's [`GridState`] by reference and are pure functions of it and the
//! cache; only [`update_temperatures`](Evaluator::update_temperatures)
//! writes, and it takes `&mut self`.

use std::sync::Arc;
use std::time::Instant;

use clusterkin_core::{DiagnosticsSink, EvalError, GridIndex};
use clusterkin_network::{ConnectivityMap, ReactionNetwork};
use clusterkin_rates::RateCache;
use clusterkin_space::{SpaceError, SpatialGrid, SurfaceMap};
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::assembler::Assembler;
use crate::config::{ConfigError, EngineConfig};
use crate::diffusion::FickianDiffusion;
use crate::heat::HeatEquationHandler;
use crate::metrics::{elapsed_us, StepMetrics};
use crate::soret::SoretHandler;
use crate::state::{GridState, Neighbours, Offset, Stencil, StencilEntry};

/// One Jacobian entry in global degree-of-freedom numbering.
///
/// Global index of local degree of freedom `d` at point `p` is
/// `p * dofs_per_point + d`. Entries with equal coordinates are summed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triplet {
    /// Global row.
    pub row: usize,
    /// Global column.
    pub column: usize,
    /// Value.
    pub value: f64,
}

const HEAT_OFFSETS: [Offset; 7] = [
    Offset::Center,
    Offset::Left,
    Offset::Right,
    Offset::Minus(0),
    Offset::Plus(0),
    Offset::Minus(1),
    Offset::Plus(1),
];

/// Flux and Jacobian evaluation for one network on one grid.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use clusterkin_core::{GridIndex, NullSink, Species};
/// use clusterkin_engine::{EngineConfig, Evaluator};
/// use clusterkin_network::{MobilityEntry, NetworkBuilder, NetworkProfile};
/// use clusterkin_space::SpatialGrid;
///
/// let network = NetworkBuilder::new(NetworkProfile::ne())
///     .max_size(Species::Xe, 4)
///     .mobility(MobilityEntry::new(&[1], 1.0e11, 1.0))
///     .build(&NullSink)
///     .unwrap();
/// let grid = SpatialGrid::uniform(5, 1.0, 1).unwrap();
/// let eval = Evaluator::new(Arc::new(network), grid, EngineConfig::default(), &NullSink).unwrap();
///
/// let mut state = eval.new_state();
/// state.point_mut(GridIndex(2))[0] = 1.0e-3;
/// let flux = eval.evaluate_flux(&state, GridIndex(2)).unwrap();
/// assert!(flux[0] < 0.0);
/// ```
#[derive(Debug)]
pub struct Evaluator {
    network: Arc<ReactionNetwork>,
    config: EngineConfig,
    grid: SpatialGrid,
    surface: SurfaceMap,
    connectivity: ConnectivityMap,
    assembler: Assembler,
    diffusion: Option<FickianDiffusion>,
    soret: Option<SoretHandler>,
    heat: Option<HeatEquationHandler>,
    cache: RateCache,
    metrics: StepMetrics,
}

impl Evaluator {
    /// Validate `config`, couple the handlers it enables, and compute the
    /// initial rate tables.
    ///
    /// Every grid point starts at the bulk temperature when the heat
    /// equation is on, at `config.temperature` otherwise.
    pub fn new(
        network: Arc<ReactionNetwork>,
        grid: SpatialGrid,
        config: EngineConfig,
        sink: &dyn DiagnosticsSink,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if (config.ny > 1 && grid.dim() < 2) || (config.nz > 1 && grid.dim() < 3) {
            return Err(ConfigError::Space(SpaceError::InvalidGrid {
                reason: format!(
                    "{}x{} transverse columns need a {}-D grid",
                    config.ny,
                    config.nz,
                    if config.nz > 1 { 3 } else { 2 }
                ),
            }));
        }
        let surface = SurfaceMap::new(config.ny, config.nz, config.initial_surface, &grid)?;

        let mut connectivity = network.connectivity().clone();
        let heat = match &config.heat {
            Some(hc) => {
                connectivity.enable_temperature();
                let mut h = HeatEquationHandler::new(hc.flux, hc.bulk_temperature, grid.dim());
                h.configure(hc, network.num_clusters(), sink)?;
                h.begin_evaluation()?;
                Some(h)
            }
            None => None,
        };
        let soret = if config.soret.enabled {
            let mut s = SoretHandler::new(&config.soret);
            s.initialize(&network, &mut connectivity, sink);
            Some(s)
        } else {
            None
        };
        let diffusion = config
            .diffusion
            .then(|| FickianDiffusion::new(&network, connectivity.temperature_index()));
        let assembler = Assembler::new(&network, &connectivity)?;

        let initial = config
            .heat
            .as_ref()
            .map_or(config.temperature, |h| h.bulk_temperature);
        let points = grid.len() * config.ny * config.nz;
        let cache = RateCache::new(&network, &vec![initial; points])?;

        log::debug!(
            target: "clusterkin",
            "evaluator: {points} grid points, {} dofs per point, {} non-zeros per block",
            connectivity.num_dofs(),
            connectivity.nnz()
        );

        Ok(Self {
            network,
            config,
            grid,
            surface,
            connectivity,
            assembler,
            diffusion,
            soret,
            heat,
            cache,
            metrics: StepMetrics::default(),
        })
    }

    /// The network being evaluated.
    pub fn network(&self) -> &ReactionNetwork {
        &self.network
    }

    /// Engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Depth grid.
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Surface node per transverse column.
    pub fn surface(&self) -> &SurfaceMap {
        &self.surface
    }

    /// Per-point fill map, including the temperature row and column when
    /// the heat equation is on.
    pub fn connectivity(&self) -> &ConnectivityMap {
        &self.connectivity
    }

    /// Values per grid point.
    pub fn dofs_per_point(&self) -> usize {
        self.connectivity.num_dofs()
    }

    /// `(nx, ny, nz)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.grid.len(), self.config.ny, self.config.nz)
    }

    /// Rate tables.
    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Heat handler, when the heat equation is on.
    pub fn heat(&self) -> Option<&HeatEquationHandler> {
        self.heat.as_ref()
    }

    /// Soret handler, when Soret drift is on.
    pub fn soret(&self) -> Option<&SoretHandler> {
        self.soret.as_ref()
    }

    /// Mutable Soret handler, for flux or conductivity updates.
    pub fn soret_mut(&mut self) -> Option<&mut SoretHandler> {
        self.soret.as_mut()
    }

    /// Timings of the most recent calls.
    pub fn metrics(&self) -> &StepMetrics {
        &self.metrics
    }

    /// A zeroed state of the right shape, with every temperature set to
    /// the initial temperature.
    pub fn new_state(&self) -> GridState {
        let mut state = GridState::zeros(self.shape(), self.dofs_per_point());
        if let (Some(t), Some(h)) = (self.connectivity.temperature_index(), &self.heat) {
            state.fill_dof(t, h.bulk_temperature());
        }
        state
    }

    /// Move the surface of column `(iy, iz)` to depth node `position`.
    pub fn set_surface(&mut self, iy: usize, iz: usize, position: usize) -> Result<(), ConfigError> {
        self.surface.set(iy, iz, position)?;
        Ok(())
    }

    fn check_state(&self, state: &GridState) -> Result<(), EvalError> {
        if state.shape() != self.shape() {
            let (nx, ny, nz) = self.shape();
            return Err(EvalError::StateShape {
                what: "grid points",
                expected: nx * ny * nz,
                found: state.num_points(),
            });
        }
        if state.dofs_per_point() != self.dofs_per_point() {
            return Err(EvalError::StateShape {
                what: "degrees of freedom per point",
                expected: self.dofs_per_point(),
                found: state.dofs_per_point(),
            });
        }
        Ok(())
    }

    /// Point `index` sits above the surface of its column.
    fn is_vacuum(&self, state: &GridState, index: GridIndex) -> bool {
        let (ix, iy, iz) = state.coords(index);
        ix < self.surface.get(iy, iz)
    }

    fn stencil<'s>(&self, state: &'s GridState, index: GridIndex) -> (Stencil<'s>, Neighbours) {
        let (ix, iy, iz) = state.coords(index);
        let surface = self.surface.get(iy, iz);
        let nb = state.neighbours(index, surface);
        let [sy, sz] = self.grid.transverse_factors();
        let mut s = [0.0; 2];
        let mut axes = 0;
        for (n, factor) in [(self.config.ny, sy), (self.config.nz, sz)] {
            if n > 1 {
                s[axes] = factor;
                axes += 1;
            }
        }
        let transverse: SmallVec<[(&[f64], &[f64]); 2]> = nb
            .transverse
            .iter()
            .map(|&(m, p)| (state.point(m), state.point(p)))
            .collect();
        let stencil = Stencil {
            center: state.point(index),
            left: nb.left.map(|l| state.point(l)),
            right: state.point(nb.right),
            transverse,
            hx_left: self.grid.hx_left(ix),
            hx_right: self.grid.hx_right(ix),
            s,
            depth: self.grid.depth(ix, surface),
        };
        (stencil, nb)
    }

    fn flux_into(&self, state: &GridState, index: GridIndex, out: &mut [f64]) -> Result<(), EvalError> {
        out.fill(0.0);
        state.check_index(index)?;
        if self.is_vacuum(state, index) {
            return Ok(());
        }
        let data = self.cache.checked(index, self.cache.generation())?;
        let (stencil, _) = self.stencil(state, index);

        self.assembler.assemble_flux(data, stencil.center, out)?;
        if let Some(d) = &self.diffusion {
            d.compute_flux(data, &stencil, out);
        }
        if let Some(s) = &self.soret {
            s.compute_flux(data, &stencil, out);
        }
        if let (Some(h), Some(t)) = (&self.heat, self.connectivity.temperature_index()) {
            h.compute_temperature(&stencil, &mut out[t])?;
        }
        Ok(())
    }

    /// Flux of every degree of freedom at `index`.
    ///
    /// Points above the surface have zero flux.
    pub fn evaluate_flux(&self, state: &GridState, index: GridIndex) -> Result<Vec<f64>, EvalError> {
        self.check_state(state)?;
        let mut out = vec![0.0; self.dofs_per_point()];
        self.flux_into(state, index, &mut out)?;
        Ok(out)
    }

    /// Jacobian entries of the rows at `index`, including the columns of
    /// neighbouring points.
    ///
    /// The set of coordinates depends only on the network, the handlers
    /// and the surface position, never on concentrations. Points above the
    /// surface produce no entries.
    pub fn evaluate_jacobian_entries(
        &self,
        state: &GridState,
        index: GridIndex,
    ) -> Result<Vec<Triplet>, EvalError> {
        self.check_state(state)?;
        state.check_index(index)?;
        if self.is_vacuum(state, index) {
            return Ok(Vec::new());
        }
        let data = self.cache.checked(index, self.cache.generation())?;
        let (stencil, nb) = self.stencil(state, index);
        let dofs = self.dofs_per_point();
        let base = index.0 * dofs;

        let mut block = self.assembler.new_block();
        self.assembler
            .assemble_partials(data, stencil.center, &mut block)?;
        let mut triplets: Vec<Triplet> = block
            .iter()
            .flat_map(|row| {
                row.columns
                    .iter()
                    .zip(row.values)
                    .map(move |(&c, &value)| Triplet {
                        row: base + row.row,
                        column: base + c,
                        value,
                    })
            })
            .collect();

        let mut entries: Vec<StencilEntry> = Vec::new();
        if let Some(d) = &self.diffusion {
            d.compute_partials(data, &stencil, &mut entries);
        }
        if let Some(s) = &self.soret {
            s.compute_partials(data, &stencil, &mut entries);
        }
        if let (Some(h), Some(t)) = (&self.heat, self.connectivity.temperature_index()) {
            if let Some(val) = h.compute_partials_for_temperature(&stencil)? {
                entries.extend(HEAT_OFFSETS.iter().zip(val).map(|(&offset, value)| StencilEntry {
                    row: t,
                    offset,
                    column: t,
                    value,
                }));
            }
        }
        triplets.extend(entries.into_iter().filter_map(|e| {
            nb.resolve(e.offset).map(|p| Triplet {
                row: base + e.row,
                column: p.0 * dofs + e.column,
                value: e.value,
            })
        }));
        Ok(triplets)
    }

    /// Flux at every grid point into `out`, in parallel across points.
    pub fn evaluate_all_flux(&mut self, state: &GridState, out: &mut [f64]) -> Result<(), EvalError> {
        self.check_state(state)?;
        if out.len() != state.as_slice().len() {
            return Err(EvalError::StateShape {
                what: "flux output",
                expected: state.as_slice().len(),
                found: out.len(),
            });
        }
        let start = Instant::now();
        let this = &*self;
        out.par_chunks_mut(this.dofs_per_point())
            .enumerate()
            .try_for_each(|(i, chunk)| this.flux_into(state, GridIndex(i), chunk))?;
        self.metrics.flux_us = elapsed_us(start);
        Ok(())
    }

    /// Jacobian entries of every grid point, in parallel across points.
    pub fn evaluate_all_jacobian(&mut self, state: &GridState) -> Result<Vec<Triplet>, EvalError> {
        self.check_state(state)?;
        let start = Instant::now();
        let this = &*self;
        let per_point = (0..state.num_points())
            .into_par_iter()
            .map(|i| this.evaluate_jacobian_entries(state, GridIndex(i)))
            .collect::<Result<Vec<_>, _>>()?;
        let triplets: Vec<Triplet> = per_point.into_iter().flatten().collect();
        self.metrics.jacobian_us = elapsed_us(start);
        self.metrics.jacobian_entries = triplets.len();
        Ok(triplets)
    }

    /// Refresh the rate tables from the temperatures in `state` at `time`.
    ///
    /// With the heat equation on, each point's temperature is read from
    /// its temperature degree of freedom through
    /// [`HeatEquationHandler::temperature_at`]; otherwise the constant
    /// configured temperature is used. Points above the surface keep their
    /// current temperature. Returns the number of recomputed points.
    pub fn update_temperatures(
        &mut self,
        state: &GridState,
        time: f64,
        sink: &dyn DiagnosticsSink,
    ) -> Result<usize, EvalError> {
        self.check_state(state)?;
        let start = Instant::now();
        let t_dof = self.connectivity.temperature_index();
        let mut temperatures = Vec::with_capacity(state.num_points());
        for i in 0..state.num_points() {
            let index = GridIndex(i);
            let (ix, iy, iz) = state.coords(index);
            let surface = self.surface.get(iy, iz);
            let t = if ix < surface {
                self.cache.get(index)?.temperature()
            } else {
                match (t_dof, self.heat.as_ref()) {
                    (Some(dof), Some(h)) => h.temperature_at(
                        [self.grid.depth(ix, surface), 0.0, 0.0],
                        time,
                        state.point(index)[dof],
                    ),
                    _ => self.config.temperature,
                }
            };
            temperatures.push(t);
        }
        let n = self
            .cache
            .set_temperatures(&self.network, &temperatures, sink)?;
        self.metrics.rate_update_us = elapsed_us(start);
        self.metrics.points_recomputed = n;
        Ok(n)
    }
}

const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Evaluator>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeatConfig;
    use clusterkin_core::{NullSink, Species};
    use clusterkin_network::{MobilityEntry, NetworkBuilder, NetworkProfile};

    fn network() -> Arc<ReactionNetwork> {
        Arc::new(
            NetworkBuilder::new(NetworkProfile::ne())
                .max_size(Species::Xe, 4)
                .mobility(MobilityEntry::new(&[1], 1.0e11, 1.0))
                .build(&NullSink)
                .unwrap(),
        )
    }

    fn heated() -> Evaluator {
        let config = EngineConfig {
            heat: Some(HeatConfig::new(1.0e-6, 1000.0, "Fuel")),
            ..EngineConfig::default()
        };
        Evaluator::new(network(), SpatialGrid::uniform(6, 1.0, 1).unwrap(), config, &NullSink)
            .unwrap()
    }

    #[test]
    fn heat_adds_a_temperature_dof() {
        let eval = heated();
        assert_eq!(eval.dofs_per_point(), 5);
        let state = eval.new_state();
        assert_eq!(state.point(GridIndex(3))[4], 1000.0);
    }

    #[test]
    fn wrong_state_shape_is_rejected() {
        let eval = heated();
        let state = GridState::zeros((6, 1, 1), 4);
        assert!(matches!(
            eval.evaluate_flux(&state, GridIndex(0)),
            Err(EvalError::StateShape { .. })
        ));
        let state = eval.new_state();
        assert!(matches!(
            eval.evaluate_flux(&state, GridIndex(6)),
            Err(EvalError::GridIndexOutOfRange { .. })
        ));
    }

    #[test]
    fn points_above_the_surface_are_inert() {
        let mut eval = heated();
        eval.set_surface(0, 0, 2).unwrap();
        let mut state = eval.new_state();
        state.point_mut(GridIndex(1))[0] = 1.0;
        let flux = eval.evaluate_flux(&state, GridIndex(1)).unwrap();
        assert!(flux.iter().all(|&f| f == 0.0));
        assert!(eval
            .evaluate_jacobian_entries(&state, GridIndex(1))
            .unwrap()
            .is_empty());
        assert!(eval.set_surface(0, 0, 6).is_err());
    }

    #[test]
    fn whole_grid_flux_matches_pointwise() {
        let mut eval = heated();
        let mut state = eval.new_state();
        for i in 0..6 {
            state.point_mut(GridIndex(i))[0] = 1.0e-3 * (i as f64 + 1.0);
        }
        let mut all = vec![0.0; state.as_slice().len()];
        eval.evaluate_all_flux(&state, &mut all).unwrap();
        for i in 0..6 {
            let f = eval.evaluate_flux(&state, GridIndex(i)).unwrap();
            assert_eq!(&all[i * 5..(i + 1) * 5], f.as_slice());
        }
    }

    #[test]
    fn temperature_update_reads_the_state() {
        let mut eval = heated();
        let mut state = eval.new_state();
        state.point_mut(GridIndex(2))[4] = 1100.0;
        // At t = 0 the handler still reports the bulk temperature.
        assert_eq!(eval.update_temperatures(&state, 0.0, &NullSink).unwrap(), 0);
        assert_eq!(eval.update_temperatures(&state, 1.0, &NullSink).unwrap(), 1);
        assert_eq!(eval.cache().get(GridIndex(2)).unwrap().temperature(), 1100.0);
        assert_eq!(eval.metrics().points_recomputed, 1);
    }

    #[test]
    fn each_point_keeps_its_own_temperature() {
        let mut eval = heated();
        let mut state = eval.new_state();
        for (i, t) in [(1, 1050.0), (3, 1200.0), (4, 980.0)] {
            state.point_mut(GridIndex(i))[4] = t;
        }
        assert_eq!(eval.update_temperatures(&state, 1.0, &NullSink).unwrap(), 3);
        for (i, t) in [(0, 1000.0), (1, 1050.0), (2, 1000.0), (3, 1200.0), (4, 980.0), (5, 1000.0)] {
            assert_eq!(eval.cache().get(GridIndex(i)).unwrap().temperature(), t);
        }
        // The shared handler carries nothing over from the last point.
        let heat = eval.heat().unwrap();
        assert_eq!(heat.get_temperature([0.0; 3], 1.0), 1000.0);
    }

    #[test]
    fn transverse_columns_need_a_wide_grid() {
        let config = EngineConfig {
            ny: 3,
            ..EngineConfig::default()
        };
        let err = Evaluator::new(network(), SpatialGrid::uniform(4, 1.0, 1).unwrap(), config, &NullSink)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Space(_)));
    }
}
