//! Errors from posterior construction and evaluation.

use std::error::Error;
use std::fmt;

use clusterkin_core::ParseEnumError;

/// Errors raised while building or evaluating a [`Posterior`](crate::Posterior).
#[derive(Clone, Debug, PartialEq)]
pub enum PosteriorError {
    /// A prior name other than `uniform` or `normal`.
    UnknownPrior(ParseEnumError),
    /// A noise-model name other than `const_stn`, `const_stdev` or
    /// `infer_stdev`.
    UnknownNoise(ParseEnumError),
    /// A uniform prior with `lower >= upper`.
    InvalidPriorBounds {
        /// Lower bound.
        lower: f64,
        /// Upper bound.
        upper: f64,
    },
    /// A normal prior or fixed noise level that is not strictly positive.
    NonPositiveSigma {
        /// The rejected value.
        sigma: f64,
    },
    /// A parameter or data vector has the wrong length.
    ParameterShape {
        /// Which vector was malformed.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        found: usize,
    },
}

impl fmt::Display for PosteriorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPrior(e) | Self::UnknownNoise(e) => write!(f, "{e}"),
            Self::InvalidPriorBounds { lower, upper } => {
                write!(f, "uniform prior bounds [{lower}, {upper}] are empty")
            }
            Self::NonPositiveSigma { sigma } => {
                write!(f, "standard deviation must be positive, got {sigma}")
            }
            Self::ParameterShape {
                what,
                expected,
                found,
            } => write!(f, "{what}: expected {expected} values, found {found}"),
        }
    }
}

impl Error for PosteriorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownPrior(e) | Self::UnknownNoise(e) => Some(e),
            _ => None,
        }
    }
}
