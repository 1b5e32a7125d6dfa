//! Heat equation with a depth- and temperature-dependent conductivity.
//!
//! The conductivity is `κ(x, T) = β(T) · α(x)` with
//!
//! - `β(T) = (a ln²T + b lnT + c) · 1e-9`, a fit in W nm⁻¹ K⁻¹;
//! - `α(x) = 0.2 + 0.8 / (1 + exp(x_int − x))`, a smooth step at the
//!   interface depth `x_int`.
//!
//! The surface node carries the imposed heat flux `φ`; interior nodes use a
//! midpoint stencil. Both add correction terms for the variable
//! conductivity.

use crate::config::{ConfigError, HeatConfig};
use crate::state::Stencil;
use clusterkin_core::{Diagnostic, DiagnosticsSink, EvalError, Material};

/// Lifecycle of a [`HeatEquationHandler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeatState {
    /// Created; no material parameters yet.
    Uninitialized,
    /// Material parameters set.
    Configured,
    /// Ready for flux and partial evaluation.
    Evaluating,
}

/// `β(T) = (a ln²T + b lnT + c) · 1e-9`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConductivityFit {
    /// Quadratic coefficient.
    pub a: f64,
    /// Linear coefficient.
    pub b: f64,
    /// Constant term.
    pub c: f64,
}

/// Material heat parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatParameters {
    /// `1 / (ρ c_p)` (nm³ K J⁻¹).
    pub heat_coefficient: f64,
    /// Conductivity fit.
    pub conductivity: ConductivityFit,
}

impl HeatParameters {
    /// Tabulated parameters of `material`.
    pub fn for_material(material: Material) -> Self {
        match material {
            Material::Fuel => Self {
                heat_coefficient: 3.88e20,
                conductivity: ConductivityFit {
                    a: 0.45,
                    b: -8.7,
                    c: 44.8,
                },
            },
            Material::Fe => Self {
                heat_coefficient: 2.83e20,
                conductivity: ConductivityFit {
                    a: 5.0,
                    b: -100.0,
                    c: 487.0,
                },
            },
            Material::W100
            | Material::W110
            | Material::W111
            | Material::W211
            | Material::Tridyn => Self {
                heat_coefficient: 3.88e20,
                conductivity: ConductivityFit {
                    a: 10.63,
                    b: -180.3,
                    c: 856.3,
                },
            },
        }
    }

    /// Check that every coefficient is finite and the heat coefficient is
    /// non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ConductivityFit { a, b, c } = self.conductivity;
        if !(self.heat_coefficient.is_finite() && self.heat_coefficient >= 0.0) {
            return Err(ConfigError::InvalidHeat {
                reason: format!(
                    "heat coefficient must be finite and non-negative, got {}",
                    self.heat_coefficient
                ),
            });
        }
        if ![a, b, c].iter().all(|v| v.is_finite()) {
            return Err(ConfigError::InvalidHeat {
                reason: "conductivity fit must be finite".to_string(),
            });
        }
        Ok(())
    }
}

/// Boundary expression at the surface node:
/// `mhc · (2/h_L) · (φ/κ + ΔT/h_R)` with `ΔT = T_R − T`.
pub fn surface_stencil(
    mid_heat_coefficient: f64,
    hx_left: f64,
    hx_right: f64,
    flux: f64,
    conductivity: f64,
    delta_t: f64,
) -> f64 {
    mid_heat_coefficient * (2.0 / hx_left) * (flux / conductivity + delta_t / hx_right)
}

/// Local conductivity terms at one node.
#[derive(Clone, Copy, Debug)]
struct Local {
    alpha: f64,
    beta: f64,
    d_alpha: f64,
    d_beta: f64,
    dd_beta: f64,
    kappa: f64,
    mhc: f64,
}

/// Temperature as one extra degree of freedom per grid point.
///
/// Moves through [`HeatState`] `Uninitialized → Configured → Evaluating`;
/// the compute operations refuse to run before `Evaluating`. With zero
/// flux every compute operation is a no-op and
/// [`get_temperature`](Self::get_temperature) returns the bulk
/// temperature.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatEquationHandler {
    state: HeatState,
    flux: f64,
    bulk_temperature: f64,
    local_temperature: f64,
    dimension: usize,
    material: Option<Material>,
    parameters: HeatParameters,
    interface_location: f64,
    dof: usize,
}

impl HeatEquationHandler {
    /// A handler for heat flux `flux` (W nm⁻²) and bulk temperature
    /// `bulk_temperature` (K) in `dimension` spatial dimensions.
    pub fn new(flux: f64, bulk_temperature: f64, dimension: usize) -> Self {
        Self {
            state: HeatState::Uninitialized,
            flux,
            bulk_temperature,
            local_temperature: bulk_temperature,
            dimension: dimension.clamp(1, 3),
            material: None,
            parameters: HeatParameters {
                heat_coefficient: 0.0,
                conductivity: ConductivityFit {
                    a: 0.0,
                    b: 0.0,
                    c: 0.0,
                },
            },
            interface_location: 0.0,
            dof: 0,
        }
    }

    /// Resolve the material, apply any parameter override, and move to
    /// [`HeatState::Configured`].
    ///
    /// `dof` is the temperature's local degree of freedom. Returns
    /// [`ConfigError::UnknownMaterial`] for a material string with no
    /// heat parameters.
    pub fn configure(
        &mut self,
        config: &HeatConfig,
        dof: usize,
        sink: &dyn DiagnosticsSink,
    ) -> Result<(), ConfigError> {
        if self.state == HeatState::Evaluating {
            return Err(ConfigError::HeatNotReady { state: self.state });
        }
        let material: Material = config
            .material
            .parse()
            .map_err(ConfigError::UnknownMaterial)?;
        let parameters = config
            .parameters
            .unwrap_or_else(|| HeatParameters::for_material(material));
        parameters.validate()?;

        self.material = Some(material);
        self.parameters = parameters;
        self.interface_location = config.interface_location;
        self.dof = dof;
        self.state = HeatState::Configured;
        sink.record(&Diagnostic::HeatConfigured {
            material,
            flux: self.flux,
            bulk_temperature: self.bulk_temperature,
        });
        Ok(())
    }

    /// Move to [`HeatState::Evaluating`].
    pub fn begin_evaluation(&mut self) -> Result<(), ConfigError> {
        match self.state {
            HeatState::Uninitialized => Err(ConfigError::HeatNotReady { state: self.state }),
            HeatState::Configured | HeatState::Evaluating => {
                self.state = HeatState::Evaluating;
                Ok(())
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HeatState {
        self.state
    }

    /// Resolved material, once configured.
    pub fn material(&self) -> Option<Material> {
        self.material
    }

    /// Active parameters.
    pub fn parameters(&self) -> &HeatParameters {
        &self.parameters
    }

    /// Surface heat flux (W nm⁻²).
    pub fn flux(&self) -> f64 {
        self.flux
    }

    /// Whether the heat flux is zero.
    pub fn is_zero_flux(&self) -> bool {
        self.flux == 0.0
    }

    /// Bulk temperature (K).
    pub fn bulk_temperature(&self) -> f64 {
        self.bulk_temperature
    }

    /// Record the temperature reported for the current step.
    pub fn set_local_temperature(&mut self, temperature: f64) {
        self.local_temperature = temperature;
    }

    /// Temperature at `position` and `time`.
    ///
    /// The bulk temperature when the flux is zero or at `t = 0`, the last
    /// recorded local temperature otherwise.
    pub fn get_temperature(&self, position: [f64; 3], time: f64) -> f64 {
        self.temperature_at(position, time, self.local_temperature)
    }

    /// Like [`get_temperature`](Self::get_temperature) with `local` as the
    /// point's own temperature, leaving the handler untouched.
    pub fn temperature_at(&self, _position: [f64; 3], time: f64, local: f64) -> f64 {
        if self.is_zero_flux() || time == 0.0 {
            self.bulk_temperature
        } else {
            local
        }
    }

    /// `α(x)`.
    pub fn heat_alpha(&self, depth: f64) -> f64 {
        0.2 + 0.8 / (1.0 + (self.interface_location - depth).exp())
    }

    /// `β(T)`.
    pub fn heat_beta(&self, temperature: f64) -> f64 {
        let ConductivityFit { a, b, c } = self.parameters.conductivity;
        let ln_t = temperature.ln();
        (a * ln_t * ln_t + b * ln_t + c) * 1.0e-9
    }

    /// `κ(x, T) = β(T) α(x)`.
    pub fn conductivity(&self, depth: f64, temperature: f64) -> f64 {
        self.heat_beta(temperature) * self.heat_alpha(depth)
    }

    fn local(&self, depth: f64, temperature: f64) -> Local {
        let ConductivityFit { a, b, .. } = self.parameters.conductivity;
        let ln_t = temperature.ln();
        let u = self.interface_location - depth;
        let d_alpha = if u > 500.0 {
            0.0
        } else {
            let e = u.exp();
            0.8 * e / ((1.0 + e) * (1.0 + e))
        };
        let alpha = self.heat_alpha(depth);
        let beta = self.heat_beta(temperature);
        let kappa = alpha * beta;
        Local {
            alpha,
            beta,
            d_alpha,
            d_beta: (b + 2.0 * a * ln_t) * 1.0e-9 / temperature,
            dd_beta: (-b + 2.0 * a * (1.0 - ln_t)) * 1.0e-9 / (temperature * temperature),
            kappa,
            mhc: self.parameters.heat_coefficient * kappa,
        }
    }

    fn ready(&self) -> Result<(), EvalError> {
        if self.state == HeatState::Evaluating {
            Ok(())
        } else {
            Err(EvalError::HandlerNotReady {
                handler: "heat equation",
            })
        }
    }

    /// Add the temperature flux at one node to `out`.
    ///
    /// The node is the surface when `stencil.left` is `None`. Fails with
    /// [`EvalError::HandlerNotReady`] before [`HeatState::Evaluating`].
    pub fn compute_temperature(&self, stencil: &Stencil<'_>, out: &mut f64) -> Result<(), EvalError> {
        self.ready()?;
        if self.is_zero_flux() {
            return Ok(());
        }
        let t = stencil.center[self.dof];
        let tr = stencil.right[self.dof];
        let (hl, hr) = (stencil.hx_left, stencil.hx_right);
        let phi = self.flux;
        let l = self.local(stencil.depth, t);

        match stencil.left {
            None => {
                *out += surface_stencil(l.mhc, hl, hr, phi, l.kappa, tr - t);
                *out += -l.mhc * phi * l.beta * l.d_alpha / (l.kappa * l.kappa)
                    + l.mhc * phi * phi * l.alpha * l.d_beta / (l.kappa * l.kappa * l.kappa);
            }
            Some(left) => {
                let tl = left[self.dof];
                let span = hl + hr;
                *out += l.mhc * (2.0 / hl) * (tl + (hl / hr) * tr - (1.0 + hl / hr) * t) / span;
                *out += l.mhc * (tr - tl) * l.beta * l.d_alpha / (l.kappa * span)
                    + l.mhc * l.alpha * l.d_beta * (tr - tl) * (tr - tl) / (l.kappa * span * span);
            }
        }

        for ((minus, plus), s) in stencil.transverse.iter().zip(stencil.s).take(self.dimension - 1) {
            *out += l.mhc * s * (minus[self.dof] + plus[self.dof] - 2.0 * t);
        }
        Ok(())
    }

    /// Partials of [`compute_temperature`](Self::compute_temperature) as
    /// `[center, left, right, y−, y+, z−, z+]`, or `None` with zero flux.
    pub fn compute_partials_for_temperature(
        &self,
        stencil: &Stencil<'_>,
    ) -> Result<Option<[f64; 7]>, EvalError> {
        self.ready()?;
        if self.is_zero_flux() {
            return Ok(None);
        }
        let t = stencil.center[self.dof];
        let tr = stencil.right[self.dof];
        let (hl, hr) = (stencil.hx_left, stencil.hx_right);
        let phi = self.flux;
        let l = self.local(stencil.depth, t);
        let (mhc, k) = (l.mhc, l.kappa);
        let mut val = [0.0; 7];

        match stencil.left {
            None => {
                val[0] = -2.0 * mhc / (hl * hr)
                    + 2.0 * mhc * l.alpha * l.d_beta * (tr - t) / (k * hl * hr)
                    + phi * phi * mhc * l.alpha * l.dd_beta / (k * k * k)
                    - 2.0 * phi * phi * mhc * l.alpha * l.alpha * l.d_beta * l.d_beta / (k * k * k * k)
                    + mhc * phi * l.beta * l.alpha * l.d_alpha * l.d_beta / (k * k * k)
                    - mhc * phi * l.d_beta * l.d_alpha / (k * k);
                val[1] = 0.0;
                val[2] = 2.0 * mhc / (hl * hr);
            }
            Some(left) => {
                let tl = left[self.dof];
                let span = hl + hr;
                val[0] = -2.0 * mhc / (hl * hr)
                    + mhc * l.alpha * l.dd_beta * (tr - tl) * (tr - tl) / (k * span * span)
                    + mhc * (2.0 / hl) * l.alpha * l.d_beta * (tl + (hl / hr) * tr - (1.0 + hl / hr) * t)
                        / (span * k)
                    + mhc * l.d_beta * l.d_alpha * (tr - tl) / (span * k);
                val[1] = 2.0 * mhc / (hl * span) - mhc * l.beta * l.d_alpha / (k * span)
                    + 2.0 * mhc * (tl - tr) * l.alpha * l.d_beta / (k * span * span);
                val[2] = 2.0 * mhc / (hr * span)
                    + mhc * l.beta * l.d_alpha / (k * span)
                    + 2.0 * mhc * (tr - tl) * l.alpha * l.d_beta / (k * span * span);
            }
        }

        for (d, s) in stencil
            .s
            .iter()
            .take(stencil.transverse.len().min(self.dimension - 1))
            .enumerate()
        {
            val[0] -= 2.0 * mhc * s;
            val[2 * d + 3] = mhc * s;
            val[2 * d + 4] = mhc * s;
        }
        Ok(Some(val))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterkin_core::NullSink;
    use smallvec::smallvec;

    fn evaluating(flux: f64, config: HeatConfig) -> HeatEquationHandler {
        let mut h = HeatEquationHandler::new(flux, 1000.0, 1);
        h.configure(&config, 0, &NullSink).unwrap();
        h.begin_evaluation().unwrap();
        h
    }

    #[test]
    fn lifecycle_gates_evaluation() {
        let mut h = HeatEquationHandler::new(1.0e-3, 800.0, 1);
        assert_eq!(h.state(), HeatState::Uninitialized);
        assert!(matches!(
            h.begin_evaluation(),
            Err(ConfigError::HeatNotReady {
                state: HeatState::Uninitialized
            })
        ));
        let t = [800.0];
        let stencil = Stencil {
            center: &t,
            left: None,
            right: &t,
            transverse: smallvec![],
            hx_left: 1.0,
            hx_right: 1.0,
            s: [0.0, 0.0],
            depth: 0.0,
        };
        let mut out = 0.0;
        assert!(h.compute_temperature(&stencil, &mut out).is_err());

        h.configure(&HeatConfig::new(1.0e-3, 800.0, "W100"), 0, &NullSink)
            .unwrap();
        assert_eq!(h.state(), HeatState::Configured);
        assert!(h.compute_partials_for_temperature(&stencil).is_err());
        h.begin_evaluation().unwrap();
        assert!(h.compute_temperature(&stencil, &mut out).is_ok());
    }

    #[test]
    fn unknown_material_is_rejected() {
        let mut h = HeatEquationHandler::new(1.0, 800.0, 1);
        let err = h
            .configure(&HeatConfig::new(1.0, 800.0, "Zr"), 0, &NullSink)
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMaterial(_)));
        assert_eq!(h.state(), HeatState::Uninitialized);
    }

    #[test]
    fn temperature_follows_flux_and_time() {
        let mut h = evaluating(0.0, HeatConfig::new(0.0, 1000.0, "Fe"));
        h.set_local_temperature(1500.0);
        assert_eq!(h.get_temperature([0.0; 3], 5.0), 1000.0);

        let mut h = evaluating(1.0e-4, HeatConfig::new(1.0e-4, 1000.0, "Fe"));
        h.set_local_temperature(1500.0);
        assert_eq!(h.get_temperature([0.0; 3], 0.0), 1000.0);
        assert_eq!(h.get_temperature([0.0; 3], 5.0), 1500.0);
    }

    #[test]
    fn zero_flux_is_a_no_op() {
        let h = evaluating(0.0, HeatConfig::new(0.0, 1000.0, "Fuel"));
        let (c, r) = ([900.0], [950.0]);
        let stencil = Stencil {
            center: &c,
            left: Some(&c[..]),
            right: &r,
            transverse: smallvec![],
            hx_left: 1.0,
            hx_right: 1.0,
            s: [0.0, 0.0],
            depth: 5.0,
        };
        let mut out = 0.0;
        h.compute_temperature(&stencil, &mut out).unwrap();
        assert_eq!(out, 0.0);
        assert_eq!(h.compute_partials_for_temperature(&stencil).unwrap(), None);
    }

    #[test]
    fn interior_partials_match_finite_differences() {
        let h = evaluating(1.0e-6, HeatConfig::new(1.0e-6, 1000.0, "W100"));
        let (tl, tc, tr) = (1010.0, 1000.0, 980.0);
        let eval = |tl: f64, tc: f64, tr: f64| {
            let (l, c, r) = ([tl], [tc], [tr]);
            let stencil = Stencil {
                center: &c,
                left: Some(&l[..]),
                right: &r,
                transverse: smallvec![],
                hx_left: 0.5,
                hx_right: 1.0,
                s: [0.0, 0.0],
                depth: 1.0e4,
            };
            let mut out = 0.0;
            h.compute_temperature(&stencil, &mut out).unwrap();
            (out, h.compute_partials_for_temperature(&stencil).unwrap().unwrap())
        };
        let (_, val) = eval(tl, tc, tr);
        let step = 1e-3;
        let d_left = (eval(tl + step, tc, tr).0 - eval(tl - step, tc, tr).0) / (2.0 * step);
        let d_right = (eval(tl, tc, tr + step).0 - eval(tl, tc, tr - step).0) / (2.0 * step);
        assert!((val[1] - d_left).abs() <= 1e-6 * d_left.abs());
        assert!((val[2] - d_right).abs() <= 1e-6 * d_right.abs());
    }

    #[test]
    fn transverse_terms_use_the_extra_dimensions() {
        let mut h = HeatEquationHandler::new(1.0e-6, 1000.0, 2);
        h.configure(&HeatConfig::new(1.0e-6, 1000.0, "W100"), 0, &NullSink)
            .unwrap();
        h.begin_evaluation().unwrap();
        let (c, m, p) = ([1000.0], [1000.0], [1000.0]);
        let stencil = Stencil {
            center: &c,
            left: Some(&c[..]),
            right: &c,
            transverse: smallvec![(&m[..], &p[..])],
            hx_left: 1.0,
            hx_right: 1.0,
            s: [4.0, 0.0],
            depth: 1.0e4,
        };
        let val = h.compute_partials_for_temperature(&stencil).unwrap().unwrap();
        let mhc = h.parameters().heat_coefficient * h.conductivity(1.0e4, 1000.0);
        assert!((val[3] - 4.0 * mhc).abs() <= 1e-12 * mhc);
        assert_eq!(val[3], val[4]);
        assert_eq!(val[5], 0.0);
    }
}
