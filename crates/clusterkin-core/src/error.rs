//! Error types shared across the workspace.
//!
//! Setup-time errors live next to the configuration they validate
//! (`SpaceError`, `NetworkError`, `ConfigError`); this module holds the
//! string-parsing error used by every closed enum and the per-evaluation
//! error returned by the rate evaluator and assembler.

use crate::id::{Generation, GridIndex};
use std::error::Error;
use std::fmt;

/// A configuration string did not name any variant of a closed enum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseEnumError {
    /// What kind of value was being parsed (e.g. `"material"`).
    pub what: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    /// Build a parse error for `value` of kind `what`.
    pub fn new(what: &'static str, value: impl Into<String>) -> Self {
        Self {
            what,
            value: value.into(),
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.what, self.value)
    }
}

impl Error for ParseEnumError {}

/// Errors from a single flux, Jacobian, or rate evaluation.
///
/// All of these are fatal to the evaluation: a silently wrong rate would
/// corrupt conservation without any visible symptom.
#[derive(Clone, Debug, PartialEq)]
pub enum EvalError {
    /// Temperature is non-finite or not strictly positive.
    InvalidTemperature {
        /// Grid point carrying the temperature.
        grid: GridIndex,
        /// The rejected value (K).
        value: f64,
    },
    /// A state or output buffer has the wrong length.
    StateShape {
        /// Which buffer was malformed.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        found: usize,
    },
    /// A grid index is outside the state.
    GridIndexOutOfRange {
        /// The offending index.
        index: GridIndex,
        /// Number of grid points in the state.
        len: usize,
    },
    /// Rate data was produced for a different temperature generation.
    StaleRates {
        /// Generation the caller expected.
        expected: Generation,
        /// Generation stored with the rate data.
        found: Generation,
    },
    /// A stencil handler was evaluated before it finished setup.
    HandlerNotReady {
        /// Which handler.
        handler: &'static str,
    },
    /// A reaction's participant counts do not fit its kind.
    MalformedReaction {
        /// Reaction kind name.
        kind: &'static str,
        /// Number of reactants.
        reactants: usize,
        /// Number of products.
        products: usize,
    },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTemperature { grid, value } => {
                write!(
                    f,
                    "temperature at grid point {grid} must be finite and positive, got {value}"
                )
            }
            Self::StateShape {
                what,
                expected,
                found,
            } => write!(f, "{what} has length {found}, expected {expected}"),
            Self::GridIndexOutOfRange { index, len } => {
                write!(f, "grid index {index} out of range for {len} points")
            }
            Self::StaleRates { expected, found } => {
                write!(
                    f,
                    "rate data is from generation {found}, expected generation {expected}"
                )
            }
            Self::HandlerNotReady { handler } => {
                write!(f, "{handler} handler evaluated before setup finished")
            }
            Self::MalformedReaction {
                kind,
                reactants,
                products,
            } => write!(
                f,
                "{kind} reaction with {reactants} reactants and {products} products has no rate law"
            ),
        }
    }
}

impl Error for EvalError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_error_display_mentions_values() {
        let err = EvalError::InvalidTemperature {
            grid: GridIndex(3),
            value: -1.0,
        };
        let msg = format!("{err}");
        assert!(msg.contains("grid point 3"));
        assert!(msg.contains("-1"));

        let err = EvalError::StaleRates {
            expected: Generation(4),
            found: Generation(2),
        };
        assert!(format!("{err}").contains("generation 2"));

        let err = EvalError::MalformedReaction {
            kind: "dissociation",
            reactants: 1,
            products: 1,
        };
        assert!(format!("{err}").starts_with("dissociation reaction with 1 reactants"));
    }
}
