//! Dense per-grid-point state and the neighbour stencil built from it.

use clusterkin_core::{EvalError, GridIndex};
use smallvec::SmallVec;

/// Concentrations (and an optional temperature) at every grid point.
///
/// Point `(ix, iy, iz)` has linear index `ix + nx * (iy + ny * iz)`; its
/// `dofs_per_point` values are contiguous. When a temperature degree of
/// freedom is present it is the last value of each point.
///
/// The external integrator owns the state; the evaluator reads it by
/// reference and never keeps it.
///
/// # Examples
///
/// ```
/// use clusterkin_core::GridIndex;
/// use clusterkin_engine::GridState;
///
/// let mut s = GridState::zeros((4, 1, 1), 3);
/// s.point_mut(GridIndex(2))[1] = 0.5;
/// assert_eq!(s.point(GridIndex(2)), &[0.0, 0.5, 0.0]);
/// assert_eq!(s.as_slice().len(), 12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GridState {
    shape: (usize, usize, usize),
    dofs: usize,
    values: Vec<f64>,
}

impl GridState {
    /// A zeroed state of `shape = (nx, ny, nz)` points.
    pub fn zeros(shape: (usize, usize, usize), dofs_per_point: usize) -> Self {
        let (nx, ny, nz) = shape;
        Self {
            shape,
            dofs: dofs_per_point,
            values: vec![0.0; nx * ny * nz * dofs_per_point],
        }
    }

    /// Wrap an existing buffer.
    ///
    /// Returns [`EvalError::StateShape`] if `values` does not hold exactly
    /// `nx * ny * nz * dofs_per_point` entries.
    pub fn from_vec(
        shape: (usize, usize, usize),
        dofs_per_point: usize,
        values: Vec<f64>,
    ) -> Result<Self, EvalError> {
        let (nx, ny, nz) = shape;
        let expected = nx * ny * nz * dofs_per_point;
        if values.len() != expected {
            return Err(EvalError::StateShape {
                what: "state",
                expected,
                found: values.len(),
            });
        }
        Ok(Self {
            shape,
            dofs: dofs_per_point,
            values,
        })
    }

    /// `(nx, ny, nz)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.shape
    }

    /// Number of grid points.
    pub fn num_points(&self) -> usize {
        let (nx, ny, nz) = self.shape;
        nx * ny * nz
    }

    /// Values per grid point.
    pub fn dofs_per_point(&self) -> usize {
        self.dofs
    }

    /// Linear index of point `(ix, iy, iz)`.
    pub fn linear(&self, ix: usize, iy: usize, iz: usize) -> GridIndex {
        let (nx, ny, _) = self.shape;
        GridIndex(ix + nx * (iy + ny * iz))
    }

    /// `(ix, iy, iz)` of a linear index.
    pub fn coords(&self, index: GridIndex) -> (usize, usize, usize) {
        let (nx, ny, _) = self.shape;
        let i = index.0;
        (i % nx, (i / nx) % ny, i / (nx * ny))
    }

    /// Values of one point.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn point(&self, index: GridIndex) -> &[f64] {
        let start = index.0 * self.dofs;
        &self.values[start..start + self.dofs]
    }

    /// Mutable values of one point.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn point_mut(&mut self, index: GridIndex) -> &mut [f64] {
        let start = index.0 * self.dofs;
        &mut self.values[start..start + self.dofs]
    }

    /// The whole buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// The whole buffer, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Set every point's value at local degree of freedom `dof`.
    pub fn fill_dof(&mut self, dof: usize, value: f64) {
        for chunk in self.values.chunks_mut(self.dofs) {
            chunk[dof] = value;
        }
    }

    pub(crate) fn check_index(&self, index: GridIndex) -> Result<(), EvalError> {
        if index.0 >= self.num_points() {
            return Err(EvalError::GridIndexOutOfRange {
                index,
                len: self.num_points(),
            });
        }
        Ok(())
    }

    /// Neighbour indices of `index` for a surface at depth node `surface`.
    ///
    /// Depth neighbours are clamped at the bulk end and absent above the
    /// surface. Transverse neighbours wrap around.
    pub(crate) fn neighbours(&self, index: GridIndex, surface: usize) -> Neighbours {
        let (nx, ny, nz) = self.shape;
        let (ix, iy, iz) = self.coords(index);
        let left = (ix > surface).then(|| self.linear(ix - 1, iy, iz));
        let right = self.linear((ix + 1).min(nx - 1), iy, iz);
        let mut transverse = SmallVec::new();
        if ny > 1 {
            transverse.push((
                self.linear(ix, (iy + ny - 1) % ny, iz),
                self.linear(ix, (iy + 1) % ny, iz),
            ));
        }
        if nz > 1 {
            transverse.push((
                self.linear(ix, iy, (iz + nz - 1) % nz),
                self.linear(ix, iy, (iz + 1) % nz),
            ));
        }
        Neighbours {
            center: index,
            left,
            right,
            transverse,
        }
    }
}

/// Linear indices of the points a stencil reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Neighbours {
    pub center: GridIndex,
    /// `None` for the surface point.
    pub left: Option<GridIndex>,
    pub right: GridIndex,
    /// `(minus, plus)` per transverse axis.
    pub transverse: SmallVec<[(GridIndex, GridIndex); 2]>,
}

impl Neighbours {
    pub(crate) fn resolve(&self, offset: Offset) -> Option<GridIndex> {
        match offset {
            Offset::Center => Some(self.center),
            Offset::Left => self.left,
            Offset::Right => Some(self.right),
            Offset::Minus(d) => self.transverse.get(d).map(|p| p.0),
            Offset::Plus(d) => self.transverse.get(d).map(|p| p.1),
        }
    }
}

/// Values a stencil operator reads at one grid point.
///
/// `left` is `None` at the surface; cluster operators treat the missing
/// neighbour as vacuum (zero concentration) and the heat operator switches
/// to its flux boundary.
#[derive(Clone, Debug)]
pub struct Stencil<'a> {
    /// Values at the point itself.
    pub center: &'a [f64],
    /// Values at the shallower neighbour.
    pub left: Option<&'a [f64]>,
    /// Values at the deeper neighbour.
    pub right: &'a [f64],
    /// `(minus, plus)` neighbour values per transverse axis.
    pub transverse: SmallVec<[(&'a [f64], &'a [f64]); 2]>,
    /// Spacing to the left neighbour (nm).
    pub hx_left: f64,
    /// Spacing to the right neighbour (nm).
    pub hx_right: f64,
    /// Transverse factors `1/h²` per transverse axis.
    pub s: [f64; 2],
    /// Distance below the surface (nm).
    pub depth: f64,
}

impl Stencil<'_> {
    /// Value of `dof` at the left neighbour, or 0 above the surface.
    pub fn left_value(&self, dof: usize) -> f64 {
        self.left.map_or(0.0, |l| l[dof])
    }
}

/// Which stencil point a Jacobian entry's column lives at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Offset {
    /// The point itself.
    Center,
    /// The shallower neighbour.
    Left,
    /// The deeper neighbour.
    Right,
    /// The `-` neighbour along transverse axis `d` (0 = y, 1 = z).
    Minus(usize),
    /// The `+` neighbour along transverse axis `d`.
    Plus(usize),
}

/// One partial derivative produced by a stencil operator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StencilEntry {
    /// Local row degree of freedom at the center point.
    pub row: usize,
    /// Point the column belongs to.
    pub offset: Offset,
    /// Local column degree of freedom at that point.
    pub column: usize,
    /// Value.
    pub value: f64,
}
