//! Generation-stamped rate tables for every grid point.

use crate::cluster_data::ClusterData;
use clusterkin_core::{Diagnostic, DiagnosticsSink, EvalError, Generation, GridIndex};
use clusterkin_network::ReactionNetwork;
use rayon::prelude::*;

/// One [`ClusterData`] per grid point.
///
/// [`set_temperatures`](Self::set_temperatures) is the only writer and
/// takes `&mut self`; evaluations read through `&RateCache` and may run
/// concurrently. Each write advances the [`Generation`] and restamps every
/// point, so a reader can check it holds current data with
/// [`checked`](Self::checked).
#[derive(Clone, Debug)]
pub struct RateCache {
    points: Vec<ClusterData>,
    generation: Generation,
}

impl RateCache {
    /// Compute rates at every grid point for `temperatures`.
    pub fn new(network: &ReactionNetwork, temperatures: &[f64]) -> Result<Self, EvalError> {
        let points = temperatures
            .par_iter()
            .enumerate()
            .map(|(i, &t)| ClusterData::compute(network, GridIndex(i), t))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            target: "clusterkin",
            "rate cache: {} grid points, {} reactions each",
            points.len(),
            network.reactions().len()
        );
        Ok(Self {
            points,
            generation: Generation::default(),
        })
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the cache holds no grid points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Current generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Recompute the points whose temperature changed.
    ///
    /// Every temperature is validated before anything is written, so a
    /// rejected update leaves the cache untouched. Returns the number of
    /// recomputed points.
    pub fn set_temperatures(
        &mut self,
        network: &ReactionNetwork,
        temperatures: &[f64],
        sink: &dyn DiagnosticsSink,
    ) -> Result<usize, EvalError> {
        if temperatures.len() != self.points.len() {
            return Err(EvalError::StateShape {
                what: "temperatures",
                expected: self.points.len(),
                found: temperatures.len(),
            });
        }
        if let Some((i, &t)) = temperatures
            .iter()
            .enumerate()
            .find(|(_, t)| !t.is_finite() || **t <= 0.0)
        {
            return Err(EvalError::InvalidTemperature {
                grid: GridIndex(i),
                value: t,
            });
        }

        let generation = self.generation.next();
        let changed = self
            .points
            .par_iter_mut()
            .zip(temperatures.par_iter())
            .map(|(point, &t)| -> Result<usize, EvalError> {
                let recompute = point.temperature() != t;
                if recompute {
                    *point = ClusterData::compute(network, point.grid(), t)?;
                }
                point.stamp(generation);
                Ok(usize::from(recompute))
            })
            .try_reduce(|| 0, |a, b| Ok(a + b))?;

        self.generation = generation;
        sink.record(&Diagnostic::RatesRecomputed {
            generation: generation.0,
            points: changed,
        });
        Ok(changed)
    }

    /// Rate data at `grid`.
    pub fn get(&self, grid: GridIndex) -> Result<&ClusterData, EvalError> {
        self.points
            .get(grid.0)
            .ok_or(EvalError::GridIndexOutOfRange {
                index: grid,
                len: self.points.len(),
            })
    }

    /// Rate data at `grid`, failing if it was not produced by `expected`.
    pub fn checked(&self, grid: GridIndex, expected: Generation) -> Result<&ClusterData, EvalError> {
        let data = self.get(grid)?;
        if data.generation() != expected {
            return Err(EvalError::StaleRates {
                expected,
                found: data.generation(),
            });
        }
        Ok(data)
    }

    /// All points in grid order.
    pub fn points(&self) -> &[ClusterData] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterkin_core::{NullSink, Species};
    use clusterkin_network::{MobilityEntry, NetworkBuilder, NetworkProfile};

    fn network() -> ReactionNetwork {
        NetworkBuilder::new(NetworkProfile::ne())
            .max_size(Species::Xe, 4)
            .mobility(MobilityEntry::new(&[1], 1.0e11, 1.0))
            .build(&NullSink)
            .unwrap()
    }

    #[test]
    fn only_changed_points_are_recomputed() {
        let net = network();
        let mut cache = RateCache::new(&net, &[800.0, 800.0, 800.0]).unwrap();
        let n = cache
            .set_temperatures(&net, &[800.0, 900.0, 800.0], &NullSink)
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(cache.generation(), Generation(1));
        assert_eq!(cache.get(GridIndex(1)).unwrap().temperature(), 900.0);
        for p in cache.points() {
            assert_eq!(p.generation(), Generation(1));
        }
    }

    #[test]
    fn rejected_update_leaves_cache_untouched() {
        let net = network();
        let mut cache = RateCache::new(&net, &[800.0, 800.0]).unwrap();
        let err = cache
            .set_temperatures(&net, &[900.0, -1.0], &NullSink)
            .unwrap_err();
        assert!(matches!(
            err,
            EvalError::InvalidTemperature { grid: GridIndex(1), .. }
        ));
        assert_eq!(cache.generation(), Generation(0));
        assert_eq!(cache.get(GridIndex(0)).unwrap().temperature(), 800.0);
    }

    #[test]
    fn wrong_length_is_a_shape_error() {
        let net = network();
        let mut cache = RateCache::new(&net, &[800.0]).unwrap();
        let err = cache.set_temperatures(&net, &[1.0, 2.0], &NullSink).unwrap_err();
        assert!(matches!(err, EvalError::StateShape { .. }));
    }

    #[test]
    fn stale_generation_is_detected() {
        let net = network();
        let mut cache = RateCache::new(&net, &[800.0]).unwrap();
        let before = cache.generation();
        cache.set_temperatures(&net, &[850.0], &NullSink).unwrap();
        let err = cache.checked(GridIndex(0), before).unwrap_err();
        assert_eq!(
            err,
            EvalError::StaleRates {
                expected: Generation(0),
                found: Generation(1),
            }
        );
        assert!(cache.checked(GridIndex(0), cache.generation()).is_ok());
    }

    #[test]
    fn out_of_range_grid_index() {
        let net = network();
        let cache = RateCache::new(&net, &[800.0]).unwrap();
        assert!(matches!(
            cache.get(GridIndex(3)),
            Err(EvalError::GridIndexOutOfRange { len: 1, .. })
        ));
    }
}
