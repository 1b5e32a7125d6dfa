//! Spatial grid description along the depth axis.

use crate::error::SpaceError;

/// A 1-D non-uniform depth grid with optional uniform transverse axes.
///
/// Node positions are in nm. Spacings at the first and last node mirror the
/// neighbouring interior spacing, which is what a reflecting boundary
/// stencil needs.
///
/// # Examples
///
/// ```
/// use clusterkin_space::SpatialGrid;
///
/// let g = SpatialGrid::uniform(5, 0.5, 1).unwrap();
/// assert_eq!(g.len(), 5);
/// assert_eq!(g.hx_left(0), 0.5);
/// assert_eq!(g.depth(3, 1), 1.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialGrid {
    x: Vec<f64>,
    hy: f64,
    hz: f64,
    dim: usize,
}

impl SpatialGrid {
    /// Minimum number of depth nodes.
    pub const MIN_NODES: usize = 3;

    /// Build a grid from node positions.
    ///
    /// `hy` and `hz` are ignored below dimension 2 and 3 respectively.
    /// Returns `Err(SpaceError::InvalidGrid)` if there are fewer than
    /// three nodes, positions are not strictly increasing, `dim` is not
    /// 1, 2 or 3, or a used transverse spacing is not positive.
    pub fn new(x: Vec<f64>, dim: usize, hy: f64, hz: f64) -> Result<Self, SpaceError> {
        if x.len() < Self::MIN_NODES {
            return Err(SpaceError::InvalidGrid {
                reason: format!(
                    "need at least {} nodes, got {}",
                    Self::MIN_NODES,
                    x.len()
                ),
            });
        }
        if !(1..=3).contains(&dim) {
            return Err(SpaceError::InvalidGrid {
                reason: format!("dimension must be 1, 2 or 3, got {dim}"),
            });
        }
        if let Some(w) = x.windows(2).position(|w| !(w[1] > w[0])) {
            return Err(SpaceError::InvalidGrid {
                reason: format!("node positions not strictly increasing at node {}", w + 1),
            });
        }
        for (name, h, used) in [("hy", hy, dim >= 2), ("hz", hz, dim >= 3)] {
            if used && !(h > 0.0 && h.is_finite()) {
                return Err(SpaceError::InvalidGrid {
                    reason: format!("{name} must be positive, got {h}"),
                });
            }
        }
        Ok(Self { x, hy, hz, dim })
    }

    /// `n` nodes spaced `h` apart starting at 0, with transverse spacing
    /// `h` when `dim > 1`.
    pub fn uniform(n: usize, h: f64, dim: usize) -> Result<Self, SpaceError> {
        if !(h > 0.0 && h.is_finite()) {
            return Err(SpaceError::InvalidGrid {
                reason: format!("spacing must be positive, got {h}"),
            });
        }
        Self::new((0..n).map(|i| i as f64 * h).collect(), dim, h, h)
    }

    /// Number of depth nodes.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always `false`; construction rejects short grids.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Spatial dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Node positions.
    pub fn positions(&self) -> &[f64] {
        &self.x
    }

    /// Position of node `i`.
    pub fn x(&self, i: usize) -> f64 {
        self.x[i]
    }

    /// Spacing between node `i` and its left neighbour.
    pub fn hx_left(&self, i: usize) -> f64 {
        if i == 0 {
            self.x[1] - self.x[0]
        } else {
            self.x[i] - self.x[i - 1]
        }
    }

    /// Spacing between node `i` and its right neighbour.
    pub fn hx_right(&self, i: usize) -> f64 {
        let last = self.x.len() - 1;
        if i >= last {
            self.x[last] - self.x[last - 1]
        } else {
            self.x[i + 1] - self.x[i]
        }
    }

    /// Distance of node `i` below the surface node.
    pub fn depth(&self, i: usize, surface: usize) -> f64 {
        self.x[i] - self.x[surface]
    }

    /// Transverse stencil factors `[1/hy², 1/hz²]`, zero for unused axes.
    pub fn transverse_factors(&self) -> [f64; 2] {
        let sy = if self.dim >= 2 { 1.0 / (self.hy * self.hy) } else { 0.0 };
        let sz = if self.dim >= 3 { 1.0 / (self.hz * self.hz) } else { 0.0 };
        [sy, sz]
    }

    /// Depth attached to each node for depth-dependent network parameters.
    ///
    /// Interior points use the midpoint of the cell to their right; the
    /// last point uses its own position.
    pub fn network_depths(&self, surface: usize) -> Result<Vec<f64>, SpaceError> {
        if surface >= self.x.len() {
            return Err(SpaceError::SurfaceOutOfRange {
                position: surface,
                len: self.x.len(),
            });
        }
        let last = self.x.len() - 1;
        let origin = self.x[surface];
        Ok((0..self.x.len())
            .map(|i| {
                if i == last {
                    self.x[i] - origin
                } else {
                    0.5 * (self.x[i] + self.x[i + 1]) - origin
                }
            })
            .collect())
    }
}

/// Surface node per transverse column `(j, k)`.
///
/// 1-D problems have a single column. The surface moves as material is
/// eroded or deposited; callers update it with [`SurfaceMap::set`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfaceMap {
    ny: usize,
    nz: usize,
    grid_len: usize,
    positions: Vec<usize>,
}

impl SurfaceMap {
    /// Every column starts with its surface at node `initial`.
    pub fn new(ny: usize, nz: usize, initial: usize, grid: &SpatialGrid) -> Result<Self, SpaceError> {
        if ny == 0 || nz == 0 {
            return Err(SpaceError::InvalidGrid {
                reason: format!("surface map needs at least one column, got {ny}x{nz}"),
            });
        }
        if initial >= grid.len() {
            return Err(SpaceError::SurfaceOutOfRange {
                position: initial,
                len: grid.len(),
            });
        }
        Ok(Self {
            ny,
            nz,
            grid_len: grid.len(),
            positions: vec![initial; ny * nz],
        })
    }

    /// Surface node of column `(j, k)`.
    ///
    /// # Panics
    ///
    /// Panics if `(j, k)` is outside the map.
    pub fn get(&self, j: usize, k: usize) -> usize {
        assert!(j < self.ny && k < self.nz, "column ({j}, {k}) out of range");
        self.positions[k * self.ny + j]
    }

    /// Move the surface of column `(j, k)` to node `position`.
    pub fn set(&mut self, j: usize, k: usize, position: usize) -> Result<(), SpaceError> {
        if position >= self.grid_len {
            return Err(SpaceError::SurfaceOutOfRange {
                position,
                len: self.grid_len,
            });
        }
        assert!(j < self.ny && k < self.nz, "column ({j}, {k}) out of range");
        self.positions[k * self.ny + j] = position;
        Ok(())
    }

    /// Columns along y and z.
    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_grid_is_rejected() {
        assert!(matches!(
            SpatialGrid::new(vec![0.0, 1.0], 1, 0.0, 0.0),
            Err(SpaceError::InvalidGrid { .. })
        ));
    }

    #[test]
    fn non_monotone_grid_is_rejected() {
        assert!(SpatialGrid::new(vec![0.0, 1.0, 1.0], 1, 0.0, 0.0).is_err());
    }

    #[test]
    fn unused_transverse_spacing_is_ignored() {
        let g = SpatialGrid::new(vec![0.0, 1.0, 3.0], 1, 0.0, -1.0).unwrap();
        assert_eq!(g.transverse_factors(), [0.0, 0.0]);
        assert!(SpatialGrid::new(vec![0.0, 1.0, 3.0], 2, 0.0, 0.0).is_err());
    }

    #[test]
    fn end_spacings_are_mirrored() {
        let g = SpatialGrid::new(vec![0.0, 1.0, 3.0, 6.0], 1, 0.0, 0.0).unwrap();
        assert_eq!(g.hx_left(0), 1.0);
        assert_eq!(g.hx_right(0), 1.0);
        assert_eq!(g.hx_left(2), 2.0);
        assert_eq!(g.hx_right(2), 3.0);
        assert_eq!(g.hx_right(3), 3.0);
    }

    #[test]
    fn network_depths_use_midpoints() {
        let g = SpatialGrid::new(vec![0.0, 1.0, 3.0, 6.0], 1, 0.0, 0.0).unwrap();
        assert_eq!(g.network_depths(1).unwrap(), vec![-0.5, 1.0, 3.5, 5.0]);
        assert!(g.network_depths(4).is_err());
    }

    #[test]
    fn surface_map_tracks_columns() {
        let g = SpatialGrid::uniform(6, 1.0, 3).unwrap();
        let mut s = SurfaceMap::new(2, 3, 0, &g).unwrap();
        s.set(1, 2, 4).unwrap();
        assert_eq!(s.get(1, 2), 4);
        assert_eq!(s.get(0, 2), 0);
        assert!(s.set(0, 0, 6).is_err());
    }
}
