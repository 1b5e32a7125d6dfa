//! Physical constants shared across the workspace.
//!
//! Lengths are in nanometres, energies in electron-volts, temperatures in
//! kelvin.

/// Boltzmann constant (eV/K).
pub const K_BOLTZMANN: f64 = 8.617_333_262e-5;

/// Lattice constant of tungsten (nm).
pub const TUNGSTEN_LATTICE_CONSTANT: f64 = 0.316_52;

/// Lattice constant of uranium dioxide (nm).
pub const UO2_LATTICE_CONSTANT: f64 = 0.547_0;

/// Lattice constant of alpha iron (nm).
pub const IRON_LATTICE_CONSTANT: f64 = 0.287_0;

/// Radius of an isolated helium atom (nm).
pub const HELIUM_RADIUS: f64 = 0.3;

/// Radius of an isolated xenon atom (nm).
pub const XENON_RADIUS: f64 = 0.3;

/// Radius of an isolated hydrogen-isotope atom (nm).
pub const HYDROGEN_RADIUS: f64 = 0.1;

/// Binding energies below this floor are clamped (eV).
pub const MIN_BINDING_ENERGY: f64 = 0.1;
