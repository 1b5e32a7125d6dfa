//! Capture geometry: the diffusion-independent factor of each encounter
//! rate.
//!
//! Every diffusion-limited rate in this crate has the form
//! `k = G * (D0 + D1)` where `G` depends only on radii and lattice lengths.
//! This module computes `G`.

use std::f64::consts::{FRAC_PI_2, PI};

/// `4π (r0 + r1 + r_core)`, the Smoluchowski factor for two spheres.
pub fn sphere_factor(r0: f64, r1: f64, r_core: f64) -> f64 {
    4.0 * PI * (r0 + r1 + r_core)
}

/// Capture cross-section of a trap of radius `rt` for a partner of radius
/// `rm`.
///
/// A trap at least as large as its partner captures on the full disc
/// `π (rt + rm)²`; a smaller trap on the reduced `4π rt rm`.
pub fn trap_cross_section(rt: f64, rm: f64) -> f64 {
    if rt >= rm {
        PI * (rt + rm) * (rt + rm)
    } else {
        4.0 * PI * rt * rm
    }
}

/// Alignment angles `θ_k = (k + ½)(π/2)/n` and their `sin θ_k` weights.
fn angles(n: usize) -> impl Iterator<Item = (f64, f64)> {
    let n = n.max(1);
    (0..n).map(move |k| {
        let theta = (k as f64 + 0.5) * FRAC_PI_2 / n as f64;
        (theta, theta.sin())
    })
}

fn averaged_ellipse(n: usize, semi_axes: impl Fn(f64) -> (f64, f64)) -> f64 {
    let (mut area, mut weight) = (0.0, 0.0);
    for (theta, w) in angles(n) {
        let (a, b) = semi_axes(theta);
        area += w * PI * a * b;
        weight += w;
    }
    area / weight
}

/// Mean elliptical cross-section of a loop of radius `r_loop` meeting a
/// sphere of radius `r`, averaged over `n` alignment angles.
pub fn loop_sphere_cross_section(r_loop: f64, r: f64, n: usize) -> f64 {
    averaged_ellipse(n, |theta| (r_loop + r, r_loop * theta.cos().abs() + r))
}

/// Mean elliptical cross-section of two loops, averaged over `n` alignment
/// angles.
pub fn loop_loop_cross_section(r0: f64, r1: f64, n: usize) -> f64 {
    averaged_ellipse(n, |theta| {
        (r0 + r1, r0 * theta.cos().abs() + r1 * theta.sin().abs())
    })
}
