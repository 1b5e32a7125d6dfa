//! Engine configuration, validation, and error types.
//!
//! [`EngineConfig`] carries everything the per-step [`Evaluator`](crate::Evaluator)
//! needs beyond the reaction network itself: whether Fickian diffusion is
//! coupled, the Soret settings, and the heat-equation settings.
//! [`validate()`](EngineConfig::validate) checks them once at startup.

use std::error::Error;
use std::fmt;

use clusterkin_core::{EvalError, ParseEnumError};
use clusterkin_network::NetworkError;
use clusterkin_space::SpaceError;

use crate::heat::{HeatParameters, HeatState};

// ── SoretConfig ────────────────────────────────────────────────────

/// Thermal-gradient (Soret) drift of diffusing clusters.
#[derive(Clone, Debug, PartialEq)]
pub struct SoretConfig {
    /// Whether the coupling is active. Default: `false`.
    pub enabled: bool,
    /// Heat-of-transport factor `β`. Default: 0.
    pub beta: f64,
    /// Heat flux `φ` (W nm⁻²). Default: 0.
    pub heat_flux: f64,
    /// Thermal conductivity `κ`. Default: 0.
    pub conductivity: f64,
}

impl Default for SoretConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            beta: 0.0,
            heat_flux: 0.0,
            conductivity: 0.0,
        }
    }
}

// ── HeatConfig ─────────────────────────────────────────────────────

/// Heat-equation settings.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatConfig {
    /// Surface heat flux (W nm⁻²). Zero turns every heat term off.
    pub flux: f64,
    /// Bulk temperature (K).
    pub bulk_temperature: f64,
    /// Host material name, parsed at setup.
    pub material: String,
    /// Depth of the conductivity interface below the surface (nm).
    pub interface_location: f64,
    /// Overrides the material's tabulated parameters when set.
    pub parameters: Option<HeatParameters>,
}

impl HeatConfig {
    /// Heat settings for `material` with no parameter override.
    pub fn new(flux: f64, bulk_temperature: f64, material: impl Into<String>) -> Self {
        Self {
            flux,
            bulk_temperature,
            material: material.into(),
            interface_location: 0.0,
            parameters: None,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building an [`Evaluator`](crate::Evaluator).
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The reaction network could not be built.
    Network(NetworkError),
    /// The spatial grid or surface map is invalid.
    Space(SpaceError),
    /// Initial rate tables could not be computed.
    Rates(EvalError),
    /// The heat material string names no known material.
    UnknownMaterial(ParseEnumError),
    /// Heat settings violate an invariant.
    InvalidHeat {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// Soret settings violate an invariant.
    InvalidSoret {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// A reaction touches a Jacobian entry missing from the fill map.
    IncompleteConnectivity {
        /// Row degree of freedom.
        row: usize,
        /// Column degree of freedom.
        column: usize,
    },
    /// The heat handler was used before reaching the required state.
    HeatNotReady {
        /// State the handler was in.
        state: HeatState,
    },
    /// Constant temperature is non-finite or not strictly positive.
    InvalidTemperature {
        /// The invalid value (K).
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "network: {e}"),
            Self::Space(e) => write!(f, "grid: {e}"),
            Self::Rates(e) => write!(f, "rates: {e}"),
            Self::UnknownMaterial(e) => {
                write!(f, "{e}: no heat parameters defined for it")
            }
            Self::InvalidHeat { reason } => write!(f, "invalid heat config: {reason}"),
            Self::InvalidSoret { reason } => write!(f, "invalid Soret config: {reason}"),
            Self::IncompleteConnectivity { row, column } => {
                write!(f, "connectivity map has no entry ({row}, {column})")
            }
            Self::HeatNotReady { state } => {
                write!(f, "heat equation handler is {state:?}")
            }
            Self::InvalidTemperature { value } => {
                write!(f, "temperature must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Network(e) => Some(e),
            Self::Space(e) => Some(e),
            Self::Rates(e) => Some(e),
            Self::UnknownMaterial(e) => Some(e),
            _ => None,
        }
    }
}

impl From<NetworkError> for ConfigError {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

impl From<EvalError> for ConfigError {
    fn from(e: EvalError) -> Self {
        Self::Rates(e)
    }
}

// ── EngineConfig ───────────────────────────────────────────────────

/// Everything the evaluator needs besides the network and grid.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Couple Fickian diffusion of mobile clusters. Default: `true`.
    pub diffusion: bool,
    /// Soret settings.
    pub soret: SoretConfig,
    /// Heat-equation settings; `None` keeps temperature constant and drops
    /// the temperature degree of freedom.
    pub heat: Option<HeatConfig>,
    /// Temperature used when `heat` is `None` (K). Default: 1000.
    pub temperature: f64,
    /// Initial surface node of every column. Default: 0.
    pub initial_surface: usize,
    /// Transverse columns along y. Default: 1.
    pub ny: usize,
    /// Transverse columns along z. Default: 1.
    pub nz: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            diffusion: true,
            soret: SoretConfig::default(),
            heat: None,
            temperature: 1000.0,
            initial_surface: 0,
            ny: 1,
            nz: 1,
        }
    }
}

impl EngineConfig {
    /// Whether each grid point carries a temperature degree of freedom.
    pub fn has_temperature(&self) -> bool {
        self.heat.is_some()
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(ConfigError::InvalidTemperature {
                value: self.temperature,
            });
        }
        if let Some(heat) = &self.heat {
            if !heat.flux.is_finite() {
                return Err(ConfigError::InvalidHeat {
                    reason: format!("flux must be finite, got {}", heat.flux),
                });
            }
            if !(heat.bulk_temperature.is_finite() && heat.bulk_temperature > 0.0) {
                return Err(ConfigError::InvalidHeat {
                    reason: format!(
                        "bulk temperature must be finite and positive, got {}",
                        heat.bulk_temperature
                    ),
                });
            }
            if !heat.interface_location.is_finite() {
                return Err(ConfigError::InvalidHeat {
                    reason: "interface location must be finite".to_string(),
                });
            }
            if let Some(p) = &heat.parameters {
                p.validate()?;
            }
        }
        let s = &self.soret;
        if s.enabled {
            if self.heat.is_none() {
                return Err(ConfigError::InvalidSoret {
                    reason: "Soret coupling needs the heat equation".to_string(),
                });
            }
            for (name, v) in [
                ("beta", s.beta),
                ("heat_flux", s.heat_flux),
                ("conductivity", s.conductivity),
            ] {
                if !v.is_finite() {
                    return Err(ConfigError::InvalidSoret {
                        reason: format!("{name} must be finite, got {v}"),
                    });
                }
            }
            if s.conductivity < 0.0 {
                return Err(ConfigError::InvalidSoret {
                    reason: format!("conductivity must be non-negative, got {}", s.conductivity),
                });
            }
        }
        if self.ny == 0 || self.nz == 0 {
            return Err(ConfigError::Space(SpaceError::InvalidGrid {
                reason: format!("need at least one column, got {}x{}", self.ny, self.nz),
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(!EngineConfig::default().has_temperature());
    }

    #[test]
    fn soret_without_heat_is_rejected() {
        let cfg = EngineConfig {
            soret: SoretConfig {
                enabled: true,
                ..SoretConfig::default()
            },
            ..EngineConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidSoret { .. })
        ));
    }

    #[test]
    fn non_positive_bulk_temperature_is_rejected() {
        let cfg = EngineConfig {
            heat: Some(HeatConfig::new(1.0e-6, 0.0, "W100")),
            ..EngineConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidHeat { .. })));
    }

    #[test]
    fn nan_temperature_is_rejected() {
        let cfg = EngineConfig {
            temperature: f64::NAN,
            ..EngineConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidTemperature { .. })
        ));
    }

    #[test]
    fn error_display_names_the_cause() {
        let err = ConfigError::UnknownMaterial(ParseEnumError::new("material", "Zr"));
        assert!(format!("{err}").contains("'Zr'"));
        let err = ConfigError::IncompleteConnectivity { row: 3, column: 7 };
        assert_eq!(format!("{err}"), "connectivity map has no entry (3, 7)");
    }
}
