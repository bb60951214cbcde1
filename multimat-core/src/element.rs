//! Reference elements that turn nodal coordinates into [`ElementGeometry`].
//!
//! This is the geometry half of a finite element library reduced to what the
//! stiffness integrator and stress recovery consume: spatial shape-function
//! gradients, weights and Jacobian determinants at a fixed set of points.
//!
//! # Submodules
//!
//! - [`gauss`] - Gauss quadrature rules for numerical integration
//! - [`plane_strain`] - 2D triangle and quadrilateral
//! - [`tri6`] - 2D quadratic triangle
//! - [`tet4`], [`hex8`] - 3D tetrahedron and brick

use crate::error::{Error, Result};
use crate::geometry::{ElementGeometry, EvaluationPoint};
use crate::types::Point3;
use nalgebra::DMatrix;

pub mod gauss;
pub mod hex8;
pub mod plane_strain;
pub mod tet4;
pub mod tri6;

pub use gauss::{gauss_1d, gauss_hex, gauss_quad, gauss_tet, gauss_tri, GaussPoint};
pub use hex8::Hex8;
pub use plane_strain::{Quad4, Tri3};
pub use tet4::Tet4;
pub use tri6::Tri6;

/// Where geometry is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sampling {
    /// The element's default Gauss rule.
    #[default]
    Quadrature,
    /// The element's nodes, with equal weights summing to the reference
    /// measure (a vertex rule).
    Nodes,
}

/// Supported element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// 3-node triangle (plane strain).
    Tri3,
    /// 6-node quadratic triangle (plane strain).
    Tri6,
    /// 4-node quadrilateral (plane strain).
    Quad4,
    /// 4-node tetrahedron.
    Tet4,
    /// 8-node hexahedron.
    Hex8,
}

impl ElementKind {
    /// Number of nodes for this element kind.
    pub fn n_nodes(self) -> usize {
        match self {
            ElementKind::Tri3 => 3,
            ElementKind::Quad4 | ElementKind::Tet4 => 4,
            ElementKind::Tri6 => 6,
            ElementKind::Hex8 => 8,
        }
    }

    /// Spatial dimension (2D or 3D).
    pub fn dimension(self) -> usize {
        match self {
            ElementKind::Tri3 | ElementKind::Tri6 | ElementKind::Quad4 => 2,
            ElementKind::Tet4 | ElementKind::Hex8 => 3,
        }
    }
}

/// Reference element interface.
///
/// Implementors supply reference-space data; the provided
/// [`ElementShape::geometry`] maps it to physical space.
pub trait ElementShape: Send + Sync {
    /// Element kind.
    fn kind(&self) -> ElementKind;

    /// Number of nodes.
    fn n_nodes(&self) -> usize {
        self.kind().n_nodes()
    }

    /// Spatial dimension.
    fn dim(&self) -> usize {
        self.kind().dimension()
    }

    /// Length/area/volume of the reference element.
    fn reference_measure(&self) -> f64;

    /// Natural coordinates of each node.
    fn reference_nodes(&self) -> Vec<[f64; 3]>;

    /// Default quadrature as (natural coordinates, weight).
    fn quadrature(&self) -> Result<Vec<([f64; 3], f64)>>;

    /// Shape-function derivatives with respect to natural coordinates,
    /// shape (n_nodes, dim).
    fn shape_derivatives(&self, xi: &[f64; 3]) -> DMatrix<f64>;

    /// Evaluate physical-space geometry for nodal coordinates `coords`.
    ///
    /// # Errors
    ///
    /// Fails on a wrong node count or a non-positive Jacobian determinant
    /// (inverted or degenerate element).
    fn geometry(&self, coords: &[Point3], sampling: Sampling) -> Result<ElementGeometry> {
        let n = self.n_nodes();
        let dim = self.dim();
        if coords.len() != n {
            return Err(Error::Geometry(format!(
                "{:?} requires {} nodal coordinates, got {}",
                self.kind(),
                n,
                coords.len()
            )));
        }

        let x = DMatrix::from_fn(n, dim, |a, i| coords[a][i]);

        let samples = match sampling {
            Sampling::Quadrature => self.quadrature()?,
            Sampling::Nodes => {
                let w = self.reference_measure() / n as f64;
                self.reference_nodes().into_iter().map(|xi| (xi, w)).collect()
            }
        };

        let points = samples
            .into_iter()
            .map(|(xi, weight)| {
                let dn_dxi = self.shape_derivatives(&xi);

                // J[(r, c)] = ∂x_c/∂ξ_r
                let j = dn_dxi.transpose() * &x;
                let det_j = j.determinant();
                if !(det_j > 0.0) {
                    return Err(Error::Geometry(format!(
                        "{:?}: non-positive Jacobian determinant {} (inverted or degenerate element)",
                        self.kind(),
                        det_j
                    )));
                }
                let j_inv = j.try_inverse().ok_or_else(|| {
                    Error::Geometry(format!("{:?}: singular Jacobian", self.kind()))
                })?;

                // row a: ∇N_a = J^-1 ∂N_a/∂ξ, written as a row vector
                let gradients = dn_dxi * j_inv.transpose();

                Ok(EvaluationPoint {
                    weight,
                    det_j,
                    gradients,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        ElementGeometry::new(dim, n, points)
    }
}

/// Create the reference element for a kind.
pub fn create_shape(kind: ElementKind) -> Box<dyn ElementShape> {
    match kind {
        ElementKind::Tri3 => Box::new(Tri3),
        ElementKind::Tri6 => Box::new(Tri6),
        ElementKind::Quad4 => Box::new(Quad4),
        ElementKind::Tet4 => Box::new(Tet4),
        ElementKind::Hex8 => Box::new(Hex8),
    }
}
