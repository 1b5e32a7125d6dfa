//! Log-posterior of surrogate parameters given observations.

use std::f64::consts::PI;

use rayon::prelude::*;

use crate::error::PosteriorError;
use crate::prior::{NoiseModel, Prior, OUT_OF_SUPPORT};
use crate::surrogate::SurrogateModel;

/// One measurement: model inputs and the observed value.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    /// Input coordinates.
    pub inputs: Vec<f64>,
    /// Measured value.
    pub value: f64,
}

impl Observation {
    /// Build an observation.
    pub fn new(inputs: impl Into<Vec<f64>>, value: f64) -> Self {
        Self {
            inputs: inputs.into(),
            value,
        }
    }
}

/// Gaussian-likelihood posterior over a chain of parameters.
///
/// A chain state `m` holds one entry per prior. Entry `i` feeds model
/// parameter `chain_index[i]`; with [`NoiseModel::InferStdev`] the last
/// entry is `ln σ` instead and has no model slot. Model parameters not
/// fed by the chain keep their value from `fixed`.
pub struct Posterior<M> {
    model: M,
    data: Vec<Observation>,
    priors: Vec<Prior>,
    noise: NoiseModel,
    chain_index: Vec<usize>,
    fixed: Vec<f64>,
}

impl<M: SurrogateModel> Posterior<M> {
    /// Validate the pieces against each other.
    ///
    /// `fixed` must have one value per model parameter; `chain_index` one
    /// distinct model slot per non-noise prior.
    pub fn new(
        model: M,
        data: Vec<Observation>,
        priors: Vec<Prior>,
        noise: NoiseModel,
        chain_index: Vec<usize>,
        fixed: Vec<f64>,
    ) -> Result<Self, PosteriorError> {
        for p in &priors {
            p.validate()?;
        }
        noise.validate()?;

        if noise.is_inferred() && priors.is_empty() {
            return Err(PosteriorError::ParameterShape {
                what: "priors",
                expected: 1,
                found: 0,
            });
        }
        let chained = priors.len() - usize::from(noise.is_inferred());
        if chain_index.len() != chained {
            return Err(PosteriorError::ParameterShape {
                what: "chain index",
                expected: chained,
                found: chain_index.len(),
            });
        }
        if fixed.len() != model.num_params() {
            return Err(PosteriorError::ParameterShape {
                what: "model parameters",
                expected: model.num_params(),
                found: fixed.len(),
            });
        }
        let mut seen = vec![false; fixed.len()];
        for &slot in &chain_index {
            match seen.get_mut(slot) {
                Some(s) if !*s => *s = true,
                _ => {
                    return Err(PosteriorError::ParameterShape {
                        what: "chain index slot",
                        expected: fixed.len(),
                        found: slot,
                    })
                }
            }
        }
        if let Some(bad) = data.iter().find(|o| o.inputs.len() != model.num_inputs()) {
            return Err(PosteriorError::ParameterShape {
                what: "observation inputs",
                expected: model.num_inputs(),
                found: bad.inputs.len(),
            });
        }

        log::debug!(
            target: "clusterkin",
            "posterior: {} chain parameters, {} observations",
            priors.len(),
            data.len()
        );
        Ok(Self {
            model,
            data,
            priors,
            noise,
            chain_index,
            fixed,
        })
    }

    /// Chain dimension.
    pub fn dim(&self) -> usize {
        self.priors.len()
    }

    /// Observations.
    pub fn data(&self) -> &[Observation] {
        &self.data
    }

    /// Forward model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Sum of prior log-densities, or [`OUT_OF_SUPPORT`] as soon as one
    /// entry leaves its support.
    pub fn log_prior(&self, m: &[f64]) -> Result<f64, PosteriorError> {
        self.check(m)?;
        let mut sum = 0.0;
        for (p, &x) in self.priors.iter().zip(m) {
            match p.log_density_checked(x) {
                Some(v) => sum += v,
                None => return Ok(OUT_OF_SUPPORT),
            }
        }
        Ok(sum)
    }

    /// Gaussian log-likelihood of the observations.
    pub fn log_likelihood(&self, m: &[f64]) -> Result<f64, PosteriorError> {
        self.check(m)?;
        let mut params = self.fixed.clone();
        for (&slot, &x) in self.chain_index.iter().zip(m) {
            params[slot] = x;
        }
        let log_sigma = m.last().copied().unwrap_or(0.0);
        Ok(self
            .data
            .iter()
            .map(|obs| {
                let y = self.model.evaluate(&params, &obs.inputs);
                let sigma = self.noise.sigma(y, log_sigma);
                let var = sigma * sigma;
                let err = obs.value - y;
                -0.5 * (2.0 * PI).ln() - 0.5 * var.ln() - err * err / (2.0 * var)
            })
            .sum())
    }

    /// `log p(m | data)` up to the evidence.
    ///
    /// Returns [`OUT_OF_SUPPORT`] without running the model when a uniform
    /// prior excludes `m`.
    ///
    /// # Examples
    ///
    /// ```
    /// use clusterkin_uq::{Basis, NoiseModel, Observation, PolynomialSurrogate, Posterior, Prior};
    ///
    /// let model = PolynomialSurrogate::total_order(Basis::Legendre, 1, 1);
    /// let data = vec![Observation::new([0.0], 1.0), Observation::new([0.5], 2.0)];
    /// let post = Posterior::new(
    ///     model,
    ///     data,
    ///     vec![Prior::Uniform { lower: -5.0, upper: 5.0 }; 2],
    ///     NoiseModel::ConstStdev { sigma: 0.1 },
    ///     vec![0, 1],
    ///     vec![0.0, 0.0],
    /// )
    /// .unwrap();
    /// let best = post.log_posterior(&[1.0, 2.0]).unwrap();
    /// assert!(best > post.log_posterior(&[1.1, 2.0]).unwrap());
    /// assert_eq!(post.log_posterior(&[6.0, 2.0]).unwrap(), -1.0e180);
    /// ```
    pub fn log_posterior(&self, m: &[f64]) -> Result<f64, PosteriorError> {
        let prior = self.log_prior(m)?;
        if prior == OUT_OF_SUPPORT {
            return Ok(OUT_OF_SUPPORT);
        }
        Ok(prior + self.log_likelihood(m)?)
    }

    /// [`log_posterior`](Self::log_posterior) for many chain states in
    /// parallel, in input order.
    pub fn log_posterior_batch(&self, states: &[Vec<f64>]) -> Result<Vec<f64>, PosteriorError> {
        states.par_iter().map(|m| self.log_posterior(m)).collect()
    }

    fn check(&self, m: &[f64]) -> Result<(), PosteriorError> {
        if m.len() != self.priors.len() {
            return Err(PosteriorError::ParameterShape {
                what: "chain state",
                expected: self.priors.len(),
                found: m.len(),
            });
        }
        Ok(())
    }
}

const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Posterior<crate::PolynomialSurrogate>>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surrogate::{Basis, PolynomialSurrogate};

    /// y = c0 + c1 x
    fn line() -> PolynomialSurrogate {
        PolynomialSurrogate::total_order(Basis::Legendre, 1, 1)
    }

    fn data() -> Vec<Observation> {
        vec![
            Observation::new([0.0], 1.0),
            Observation::new([1.0], 3.5),
            Observation::new([-1.0], -1.0),
        ]
    }

    fn gaussian(err: f64, sigma: f64) -> f64 {
        -0.5 * (2.0 * PI).ln() - sigma.ln() - err * err / (2.0 * sigma * sigma)
    }

    #[test]
    fn const_stdev_likelihood_by_hand() {
        let post = Posterior::new(
            line(),
            data(),
            vec![Prior::Normal { mean: 0.0, sigma: 10.0 }; 2],
            NoiseModel::ConstStdev { sigma: 0.5 },
            vec![0, 1],
            vec![0.0; 2],
        )
        .unwrap();
        let m = [1.0, 2.0];
        let expected = gaussian(0.0, 0.5) + gaussian(0.5, 0.5) + gaussian(0.0, 0.5);
        assert!((post.log_likelihood(&m).unwrap() - expected).abs() < 1e-12);
        let p = Prior::Normal { mean: 0.0, sigma: 10.0 };
        let prior = p.log_density(1.0) + p.log_density(2.0);
        assert!((post.log_posterior(&m).unwrap() - (expected + prior)).abs() < 1e-12);
    }

    #[test]
    fn inferred_noise_reads_the_last_entry() {
        let post = Posterior::new(
            line(),
            data(),
            vec![
                Prior::Uniform { lower: -10.0, upper: 10.0 },
                Prior::Uniform { lower: -10.0, upper: 10.0 },
                Prior::Uniform { lower: -5.0, upper: 5.0 },
            ],
            NoiseModel::InferStdev,
            vec![0, 1],
            vec![0.0; 2],
        )
        .unwrap();
        let m = [1.0, 2.0, 0.25f64.ln()];
        let expected = gaussian(0.0, 0.25) + gaussian(0.5, 0.25) + gaussian(0.0, 0.25);
        assert!((post.log_likelihood(&m).unwrap() - expected).abs() < 1e-12);
        assert_eq!(post.dim(), 3);
    }

    #[test]
    fn const_stn_scales_with_the_model() {
        let post = Posterior::new(
            line(),
            vec![Observation::new([1.0], 3.0)],
            vec![Prior::Normal { mean: 0.0, sigma: 1.0 }],
            NoiseModel::ConstStn { ratio: 0.1 },
            vec![1],
            vec![1.0, 0.0],
        )
        .unwrap();
        // c0 fixed at 1, c1 = 3 gives y = 4 and sigma = 0.4.
        let ll = post.log_likelihood(&[3.0]).unwrap();
        assert!((ll - gaussian(-1.0, 0.4)).abs() < 1e-12);
    }

    #[test]
    fn shapes_are_checked() {
        let err = Posterior::new(
            line(),
            data(),
            vec![Prior::Normal { mean: 0.0, sigma: 1.0 }; 2],
            NoiseModel::ConstStdev { sigma: 1.0 },
            vec![0],
            vec![0.0; 2],
        )
        .err();
        assert!(matches!(err, Some(PosteriorError::ParameterShape { what: "chain index", .. })));

        let err = Posterior::new(
            line(),
            data(),
            vec![Prior::Normal { mean: 0.0, sigma: 1.0 }; 2],
            NoiseModel::ConstStdev { sigma: 1.0 },
            vec![1, 1],
            vec![0.0; 2],
        )
        .err();
        assert!(matches!(err, Some(PosteriorError::ParameterShape { .. })));

        let post = Posterior::new(
            line(),
            data(),
            vec![Prior::Normal { mean: 0.0, sigma: 1.0 }; 2],
            NoiseModel::ConstStdev { sigma: 1.0 },
            vec![0, 1],
            vec![0.0; 2],
        )
        .unwrap();
        assert!(post.log_posterior(&[1.0]).is_err());
    }

    #[test]
    fn batch_matches_single_evaluations() {
        let post = Posterior::new(
            line(),
            data(),
            vec![Prior::Uniform { lower: -3.0, upper: 3.0 }; 2],
            NoiseModel::ConstStdev { sigma: 0.2 },
            vec![0, 1],
            vec![0.0; 2],
        )
        .unwrap();
        let states: Vec<Vec<f64>> = (0..20)
            .map(|i| vec![-2.0 + 0.2 * i as f64, 1.0 + 0.1 * i as f64])
            .collect();
        let batch = post.log_posterior_batch(&states).unwrap();
        for (m, v) in states.iter().zip(batch) {
            assert_eq!(post.log_posterior(m).unwrap(), v);
        }
    }
}
