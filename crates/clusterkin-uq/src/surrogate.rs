//! Forward models evaluated inside the likelihood.
//!
//! Running the full reaction network for every likelihood evaluation is
//! too slow for sampling, so calibration runs against a cheap surrogate.
//! [`PolynomialSurrogate`] is a polynomial-chaos expansion whose
//! coefficients are the calibrated parameters.

use crate::error::PosteriorError;

/// A forward model `y = f(params; x)`.
pub trait SurrogateModel: Send + Sync {
    /// Number of model parameters.
    fn num_params(&self) -> usize;

    /// Number of input coordinates per observation.
    fn num_inputs(&self) -> usize;

    /// Model output at input `x` for `params`.
    ///
    /// Callers guarantee `params.len() == num_params()` and
    /// `x.len() == num_inputs()`.
    fn evaluate(&self, params: &[f64], x: &[f64]) -> f64;
}

/// Orthogonal polynomial family of a [`PolynomialSurrogate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Basis {
    /// Legendre polynomials, orthogonal on `[-1, 1]`.
    Legendre,
    /// Probabilists' Hermite polynomials, orthogonal under `N(0, 1)`.
    Hermite,
}

impl Basis {
    /// `P_0(x) ..= P_order(x)`.
    fn values(self, x: f64, order: usize, out: &mut Vec<f64>) {
        out.clear();
        out.push(1.0);
        if order == 0 {
            return;
        }
        out.push(x);
        for n in 1..order {
            let nf = n as f64;
            let next = match self {
                Self::Legendre => ((2.0 * nf + 1.0) * x * out[n] - nf * out[n - 1]) / (nf + 1.0),
                Self::Hermite => x * out[n] - nf * out[n - 1],
            };
            out.push(next);
        }
    }
}

/// `f(c; x) = Σ_k c_k Π_d P_{α_kd}(x_d)` over a fixed set of
/// multi-indices `α_k`.
///
/// # Examples
///
/// ```
/// use clusterkin_uq::{Basis, PolynomialSurrogate, SurrogateModel};
///
/// // 1 + 2 x + 3 P_2(x) in one input.
/// let pc = PolynomialSurrogate::total_order(Basis::Legendre, 1, 2);
/// let y = pc.evaluate(&[1.0, 2.0, 3.0], &[0.5]);
/// assert!((y - (1.0 + 1.0 + 3.0 * (-0.125))).abs() < 1e-15);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PolynomialSurrogate {
    basis: Basis,
    dims: usize,
    multi_indices: Vec<Vec<usize>>,
    max_order: usize,
}

impl PolynomialSurrogate {
    /// Surrogate over explicit multi-indices, each of length `dims`.
    pub fn new(
        basis: Basis,
        dims: usize,
        multi_indices: Vec<Vec<usize>>,
    ) -> Result<Self, PosteriorError> {
        if let Some(bad) = multi_indices.iter().find(|m| m.len() != dims) {
            return Err(PosteriorError::ParameterShape {
                what: "multi-index",
                expected: dims,
                found: bad.len(),
            });
        }
        let max_order = multi_indices
            .iter()
            .flat_map(|m| m.iter().copied())
            .max()
            .unwrap_or(0);
        Ok(Self {
            basis,
            dims,
            multi_indices,
            max_order,
        })
    }

    /// Every multi-index of total order at most `order`, in graded
    /// order.
    pub fn total_order(basis: Basis, dims: usize, order: usize) -> Self {
        let mut multi_indices = Vec::new();
        for total in 0..=order {
            push_compositions(total, dims, &mut Vec::with_capacity(dims), &mut multi_indices);
        }
        Self {
            basis,
            dims,
            multi_indices,
            max_order: if dims == 0 { 0 } else { order },
        }
    }

    /// Basis family.
    pub fn basis(&self) -> Basis {
        self.basis
    }

    /// Multi-indices, one per coefficient.
    pub fn multi_indices(&self) -> &[Vec<usize>] {
        &self.multi_indices
    }
}

/// Append every way of writing `total` as an ordered sum of `dims`
/// non-negative parts, the first part largest first.
fn push_compositions(total: usize, dims: usize, prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
    if dims == 0 {
        if total == 0 {
            out.push(prefix.clone());
        }
        return;
    }
    if dims == 1 {
        prefix.push(total);
        out.push(prefix.clone());
        prefix.pop();
        return;
    }
    for first in (0..=total).rev() {
        prefix.push(first);
        push_compositions(total - first, dims - 1, prefix, out);
        prefix.pop();
    }
}

impl SurrogateModel for PolynomialSurrogate {
    fn num_params(&self) -> usize {
        self.multi_indices.len()
    }

    fn num_inputs(&self) -> usize {
        self.dims
    }

    fn evaluate(&self, params: &[f64], x: &[f64]) -> f64 {
        let mut scratch = Vec::with_capacity(self.max_order + 1);
        let table: Vec<Vec<f64>> = x
            .iter()
            .map(|&xd| {
                self.basis.values(xd, self.max_order, &mut scratch);
                scratch.clone()
            })
            .collect();
        self.multi_indices
            .iter()
            .zip(params)
            .map(|(alpha, &c)| {
                c * alpha
                    .iter()
                    .zip(&table)
                    .map(|(&a, values)| values[a])
                    .product::<f64>()
            })
            .sum()
    }
}
