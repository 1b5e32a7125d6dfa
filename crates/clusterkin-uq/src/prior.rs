//! Parameter priors and observation-noise models.

use std::f64::consts::PI;

use clusterkin_core::ParseEnumError;

use crate::error::PosteriorError;

/// Log-density returned for parameters outside a uniform prior's support.
///
/// Finite so that samplers comparing log-posteriors never see `-inf - -inf`.
pub const OUT_OF_SUPPORT: f64 = -1.0e180;

/// Prior on one chain parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Prior {
    /// Flat on the open interval `(lower, upper)`.
    Uniform {
        /// Lower bound, exclusive.
        lower: f64,
        /// Upper bound, exclusive.
        upper: f64,
    },
    /// Gaussian.
    Normal {
        /// Mean.
        mean: f64,
        /// Standard deviation.
        sigma: f64,
    },
}

impl Prior {
    /// Build a prior from its configuration name and two parameters:
    /// `(lower, upper)` for `uniform`, `(mean, sigma)` for `normal`.
    ///
    /// # Examples
    ///
    /// ```
    /// use clusterkin_uq::Prior;
    ///
    /// let p = Prior::parse("uniform", 0.0, 2.0).unwrap();
    /// assert_eq!(p.log_density(1.0), -(2.0f64).ln());
    /// assert!(Prior::parse("uniform", 2.0, 2.0).is_err());
    /// assert!(Prior::parse("cauchy", 0.0, 1.0).is_err());
    /// ```
    pub fn parse(name: &str, first: f64, second: f64) -> Result<Self, PosteriorError> {
        let prior = match name {
            "uniform" => Self::Uniform {
                lower: first,
                upper: second,
            },
            "normal" => Self::Normal {
                mean: first,
                sigma: second,
            },
            other => return Err(PosteriorError::UnknownPrior(ParseEnumError::new("prior", other))),
        };
        prior.validate()?;
        Ok(prior)
    }

    /// Reject empty uniform supports and non-positive normal widths.
    pub fn validate(&self) -> Result<(), PosteriorError> {
        match *self {
            Self::Uniform { lower, upper } => {
                if lower.partial_cmp(&upper) != Some(std::cmp::Ordering::Less) {
                    return Err(PosteriorError::InvalidPriorBounds { lower, upper });
                }
            }
            Self::Normal { sigma, .. } => {
                if !(sigma > 0.0 && sigma.is_finite()) {
                    return Err(PosteriorError::NonPositiveSigma { sigma });
                }
            }
        }
        Ok(())
    }

    /// Log-density at `x`, or `None` outside the support.
    pub fn log_density_checked(&self, x: f64) -> Option<f64> {
        match *self {
            Self::Uniform { lower, upper } => {
                (x > lower && x < upper).then(|| -(upper - lower).ln())
            }
            Self::Normal { mean, sigma } => {
                let z = (x - mean) / sigma;
                Some(-0.5 * (2.0 * PI * sigma * sigma).ln() - 0.5 * z * z)
            }
        }
    }

    /// Log-density at `x`; [`OUT_OF_SUPPORT`] outside the support.
    pub fn log_density(&self, x: f64) -> f64 {
        self.log_density_checked(x).unwrap_or(OUT_OF_SUPPORT)
    }
}

/// How the observation noise standard deviation is obtained.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NoiseModel {
    /// Constant signal-to-noise: `σ = ratio · |model|`.
    ConstStn {
        /// Noise-to-signal ratio.
        ratio: f64,
    },
    /// Fixed `σ`.
    ConstStdev {
        /// Standard deviation.
        sigma: f64,
    },
    /// `σ = exp(m_last)`, with `ln σ` carried as the last chain parameter.
    InferStdev,
}

impl NoiseModel {
    /// Build a noise model from its configuration name. `parameter` is the
    /// ratio or the standard deviation; `infer_stdev` ignores it.
    pub fn parse(name: &str, parameter: f64) -> Result<Self, PosteriorError> {
        let noise = match name {
            "const_stn" => Self::ConstStn { ratio: parameter },
            "const_stdev" => Self::ConstStdev { sigma: parameter },
            "infer_stdev" => Self::InferStdev,
            other => return Err(PosteriorError::UnknownNoise(ParseEnumError::new("noise model", other))),
        };
        noise.validate()?;
        Ok(noise)
    }

    /// Reject non-positive fixed noise levels.
    pub fn validate(&self) -> Result<(), PosteriorError> {
        match *self {
            Self::ConstStn { ratio: sigma } | Self::ConstStdev { sigma } => {
                if !(sigma > 0.0 && sigma.is_finite()) {
                    return Err(PosteriorError::NonPositiveSigma { sigma });
                }
                Ok(())
            }
            Self::InferStdev => Ok(()),
        }
    }

    /// Whether the last chain parameter is `ln σ`.
    pub fn is_inferred(&self) -> bool {
        matches!(self, Self::InferStdev)
    }

    /// Noise standard deviation for a model value, given the chain's
    /// `ln σ` entry when inferred.
    pub fn sigma(&self, model_value: f64, log_sigma: f64) -> f64 {
        match *self {
            Self::ConstStn { ratio } => ratio * model_value.abs(),
            Self::ConstStdev { sigma } => sigma,
            Self::InferStdev => log_sigma.exp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_support_is_open() {
        let p = Prior::parse("uniform", -1.0, 1.0).unwrap();
        assert_eq!(p.log_density(-1.0), OUT_OF_SUPPORT);
        assert_eq!(p.log_density(1.0), OUT_OF_SUPPORT);
        assert_eq!(p.log_density_checked(0.5), Some(-(2.0f64).ln()));
    }

    #[test]
    fn normal_density_peaks_at_the_mean() {
        let p = Prior::parse("normal", 3.0, 0.5).unwrap();
        let peak = p.log_density(3.0);
        assert!((peak + 0.5 * (2.0 * PI * 0.25).ln()).abs() < 1e-14);
        assert!((p.log_density(3.5) - (peak - 0.5)).abs() < 1e-14);
        assert_eq!(p.log_density(2.0), p.log_density(4.0));
    }

    #[test]
    fn invalid_priors_are_rejected() {
        assert_eq!(
            Prior::parse("uniform", 1.0, 0.0),
            Err(PosteriorError::InvalidPriorBounds {
                lower: 1.0,
                upper: 0.0
            })
        );
        assert!(Prior::parse("uniform", f64::NAN, 0.0).is_err());
        assert_eq!(
            Prior::parse("normal", 0.0, 0.0),
            Err(PosteriorError::NonPositiveSigma { sigma: 0.0 })
        );
        assert!(matches!(
            Prior::parse("beta", 0.0, 1.0),
            Err(PosteriorError::UnknownPrior(_))
        ));
    }

    #[test]
    fn noise_models_parse_by_name() {
        assert_eq!(
            NoiseModel::parse("const_stn", 0.1).unwrap(),
            NoiseModel::ConstStn { ratio: 0.1 }
        );
        assert!(NoiseModel::parse("infer_stdev", f64::NAN).unwrap().is_inferred());
        assert!(matches!(
            NoiseModel::parse("white", 1.0),
            Err(PosteriorError::UnknownNoise(_))
        ));
        assert!(NoiseModel::parse("const_stdev", -1.0).is_err());
    }

    #[test]
    fn sigma_follows_the_model() {
        assert_eq!(NoiseModel::ConstStn { ratio: 0.1 }.sigma(-20.0, 0.0), 2.0);
        assert_eq!(NoiseModel::ConstStdev { sigma: 0.3 }.sigma(5.0, 9.0), 0.3);
        assert_eq!(NoiseModel::InferStdev.sigma(5.0, 0.0), 1.0);
    }
}
