//! Per-element geometry supplied by the finite element infrastructure.
//!
//! The core never evaluates shape functions itself; it consumes spatial
//! shape-function gradients and integration weights at a fixed set of points.

use crate::error::{Error, Result};
use crate::types::RegionId;
use nalgebra::{DMatrix, DVector};

/// One quadrature (or stress evaluation) point.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationPoint {
    /// Quadrature weight in reference coordinates.
    pub weight: f64,
    /// Jacobian determinant of the reference-to-physical map.
    pub det_j: f64,
    /// Spatial shape-function gradients, shape (n_nodes, dim): row a holds ∇N_a.
    pub gradients: DMatrix<f64>,
}

impl EvaluationPoint {
    /// Integration factor weight * |J|.
    pub fn measure(&self) -> f64 {
        self.weight * self.det_j
    }
}

/// Shape-function gradients and weights for one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementGeometry {
    dim: usize,
    n_nodes: usize,
    points: Vec<EvaluationPoint>,
}

impl ElementGeometry {
    /// Validate and wrap collaborator-supplied geometry.
    ///
    /// # Errors
    ///
    /// Fails if `dim` is not 2 or 3, if any gradient block is not
    /// `n_nodes x dim`, or if a value is not finite.
    pub fn new(dim: usize, n_nodes: usize, points: Vec<EvaluationPoint>) -> Result<Self> {
        if dim != 2 && dim != 3 {
            return Err(Error::Geometry(format!(
                "spatial dimension must be 2 or 3, got {}",
                dim
            )));
        }
        for (i, p) in points.iter().enumerate() {
            if p.gradients.nrows() != n_nodes || p.gradients.ncols() != dim {
                return Err(Error::Geometry(format!(
                    "point {}: gradient block is {}x{}, expected {}x{}",
                    i,
                    p.gradients.nrows(),
                    p.gradients.ncols(),
                    n_nodes,
                    dim
                )));
            }
            if !p.weight.is_finite()
                || !p.det_j.is_finite()
                || p.gradients.iter().any(|g| !g.is_finite())
            {
                return Err(Error::Geometry(format!("point {}: non-finite value", i)));
            }
        }
        Ok(Self {
            dim,
            n_nodes,
            points,
        })
    }

    /// Spatial dimension (2 or 3).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of element nodes.
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Local degrees of freedom, n_nodes * dim.
    pub fn n_dofs(&self) -> usize {
        self.n_nodes * self.dim
    }

    /// Evaluation points.
    pub fn points(&self) -> &[EvaluationPoint] {
        &self.points
    }

    /// Element length/area/volume as Σ w |J|.
    pub fn measure(&self) -> f64 {
        self.points.iter().map(EvaluationPoint::measure).sum()
    }
}

/// A mesh element as seen by assembly and recovery.
///
/// Local DOF `a * dim + i` is displacement component `i` of node `a` and maps
/// to global index `dofs[a * dim + i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshElement {
    pub region: RegionId,
    pub dofs: Vec<usize>,
    pub geometry: ElementGeometry,
}

impl MeshElement {
    /// Bundle region, DOF map and geometry.
    pub fn new(region: RegionId, dofs: Vec<usize>, geometry: ElementGeometry) -> Result<Self> {
        if dofs.len() != geometry.n_dofs() {
            return Err(Error::Geometry(format!(
                "element has {} dofs, geometry expects {}",
                dofs.len(),
                geometry.n_dofs()
            )));
        }
        Ok(Self {
            region,
            dofs,
            geometry,
        })
    }

    /// Gather this element's local sub-vector from a global field.
    pub fn gather(&self, field: &[f64]) -> Result<DVector<f64>> {
        let mut local = DVector::zeros(self.dofs.len());
        for (slot, &dof) in local.iter_mut().zip(&self.dofs) {
            *slot = *field.get(dof).ok_or(Error::DofOutOfRange {
                dof,
                len: field.len(),
            })?;
        }
        Ok(local)
    }
}
