//! Strain-displacement operator.
//!
//! Stiffness integration and stress recovery both go through
//! [`strain_displacement`], so the discrete strain used to compute the
//! displacement is the one used to recover stress from it.
//!
//! Row layout of B for node `a` (columns `a*dim ..`), with ∇N_a = (b, c, d):
//!
//! ```text
//! ε_xx: ∂u/∂x         -> [b, 0, 0]
//! ε_yy: ∂v/∂y         -> [0, c, 0]
//! ε_zz: ∂w/∂z         -> [0, 0, d]
//! γ_yz: ∂v/∂z + ∂w/∂y -> [0, d, c]
//! γ_xz: ∂u/∂z + ∂w/∂x -> [d, 0, b]
//! γ_xy: ∂u/∂y + ∂v/∂x -> [c, b, 0]
//! ```
//!
//! In 2D the element is in plane strain: there is no w and no z-derivative,
//! so rows zz, yz and xz vanish.

use crate::error::{Error, Result};
use crate::geometry::EvaluationPoint;
use crate::types::StrainVector;
use nalgebra::{DMatrix, DVector, Vector6};

/// Build the 6 x (n_nodes * dim) B-matrix from spatial gradients.
///
/// `gradients` has one row per node and `dim` columns.
pub fn strain_displacement(gradients: &DMatrix<f64>, dim: usize) -> Result<DMatrix<f64>> {
    if gradients.ncols() != dim {
        return Err(Error::Geometry(format!(
            "gradient block has {} columns, expected {}",
            gradients.ncols(),
            dim
        )));
    }

    let n_nodes = gradients.nrows();
    let mut b = DMatrix::zeros(6, n_nodes * dim);

    match dim {
        2 => {
            for a in 0..n_nodes {
                let col = a * 2;
                let (bx, cy) = (gradients[(a, 0)], gradients[(a, 1)]);
                b[(0, col)] = bx;
                b[(1, col + 1)] = cy;
                b[(5, col)] = cy;
                b[(5, col + 1)] = bx;
            }
        }
        3 => {
            for a in 0..n_nodes {
                let col = a * 3;
                let (bx, cy, dz) = (gradients[(a, 0)], gradients[(a, 1)], gradients[(a, 2)]);

                b[(0, col)] = bx;
                b[(1, col + 1)] = cy;
                b[(2, col + 2)] = dz;

                b[(3, col + 1)] = dz;
                b[(3, col + 2)] = cy;

                b[(4, col)] = dz;
                b[(4, col + 2)] = bx;

                b[(5, col)] = cy;
                b[(5, col + 1)] = bx;
            }
        }
        _ => {
            return Err(Error::Geometry(format!(
                "spatial dimension must be 2 or 3, got {}",
                dim
            )))
        }
    }

    Ok(b)
}

/// Engineering strain ε = B u at one evaluation point.
pub fn strain_at(point: &EvaluationPoint, dim: usize, local_displacement: &DVector<f64>) -> Result<StrainVector> {
    let b = strain_displacement(&point.gradients, dim)?;
    if b.ncols() != local_displacement.len() {
        return Err(Error::Geometry(format!(
            "element displacement has {} entries, expected {}",
            local_displacement.len(),
            b.ncols()
        )));
    }
    let eps = b * local_displacement;
    Ok(StrainVector(Vector6::from_iterator(eps.iter().copied())))
}
