//! Binding-energy fits.
//!
//! Each cluster family has a capillary-law fit
//! `E_b(n) = max(0.1, a + b (n^p - (n-1)^p))` giving the energy needed to
//! emit one monomer from a cluster of size `n`. The coefficients are
//! configuration data.

use clusterkin_core::constants::MIN_BINDING_ENERGY;
use clusterkin_core::ParseEnumError;
use std::fmt;
use std::str::FromStr;

/// Family of clusters sharing one binding-energy fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BindingFamily {
    /// Vacancy clusters and gas bubbles.
    Vacancy,
    /// Interstitial-dominant clusters.
    Interstitial,
    /// Gas trapped at a vacancy-type defect.
    Trapped,
    /// Clusters at dislocation junctions.
    Junction,
    /// Mixed complexes.
    Complex,
}

impl BindingFamily {
    /// Every family, in fit-table order.
    pub const ALL: [BindingFamily; 5] = [
        BindingFamily::Vacancy,
        BindingFamily::Interstitial,
        BindingFamily::Trapped,
        BindingFamily::Junction,
        BindingFamily::Complex,
    ];

    /// Configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Vacancy => "Vacancy",
            Self::Interstitial => "Interstitial",
            Self::Trapped => "Trapped",
            Self::Junction => "Junction",
            Self::Complex => "Complex",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BindingFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BindingFamily {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BindingFamily::ALL
            .into_iter()
            .find(|fam| fam.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseEnumError::new("binding family", s))
    }
}

/// Coefficients of one capillary-law fit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BindingFit {
    /// Constant term (eV).
    pub a: f64,
    /// Capillary coefficient (eV).
    pub b: f64,
    /// Exponent, 2/3 for a surface-energy law.
    pub p: f64,
}

impl BindingFit {
    /// Binding energy of a cluster of representative size `n` (eV).
    pub fn energy(&self, n: f64) -> f64 {
        let n = n.max(1.0);
        let e = self.a + self.b * (n.powf(self.p) - (n - 1.0).powf(self.p));
        e.max(MIN_BINDING_ENERGY)
    }
}

/// One [`BindingFit`] per [`BindingFamily`].
#[derive(Clone, Debug, PartialEq)]
pub struct BindingFits {
    fits: [BindingFit; 5],
}

impl BindingFits {
    /// Fit for `family`.
    pub fn get(&self, family: BindingFamily) -> BindingFit {
        self.fits[family.slot()]
    }

    /// Replace the fit for `family`.
    pub fn set(&mut self, family: BindingFamily, fit: BindingFit) {
        self.fits[family.slot()] = fit;
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, family: BindingFamily, fit: BindingFit) -> Self {
        self.set(family, fit);
        self
    }

    /// Binding energy of a size-`n` cluster of `family`.
    pub fn energy(&self, family: BindingFamily, n: f64) -> f64 {
        self.get(family).energy(n)
    }
}

impl Default for BindingFits {
    fn default() -> Self {
        const TWO_THIRDS: f64 = 2.0 / 3.0;
        let fit = |a, b| BindingFit { a, b, p: TWO_THIRDS };
        Self {
            fits: [
                fit(3.6, -3.9),
                fit(9.96, -8.5),
                fit(4.0, -3.0),
                fit(2.0, -1.0),
                fit(1.5, -1.0),
            ],
        }
    }
}
