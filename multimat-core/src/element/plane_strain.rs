//! Plane strain elements for 2D analysis.
//!
//! Out-of-plane strains vanish (ε_z = γ_yz = γ_xz = 0) but the full 6x6
//! elastic tensor still produces σ_z = λ(ε_x + ε_y). Nodes have (x, y)
//! coordinates stored as Point3 with z = 0; each node has 2 DOFs (u, v).
//! Integration is per unit depth.
//!
//! This module provides:
//! - [`Tri3`] - 3-node triangle (Constant Strain Triangle, CST)
//! - [`Quad4`] - 4-node quadrilateral (bilinear)

use crate::element::gauss::{gauss_quad, gauss_tri};
use crate::element::{ElementKind, ElementShape};
use crate::error::Result;
use nalgebra::DMatrix;

/// 3-node triangle.
///
/// N1 = 1 - ξ - η, N2 = ξ, N3 = η on the unit triangle; constant strain,
/// one-point rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tri3;

impl ElementShape for Tri3 {
    fn kind(&self) -> ElementKind {
        ElementKind::Tri3
    }

    fn reference_measure(&self) -> f64 {
        0.5
    }

    fn reference_nodes(&self) -> Vec<[f64; 3]> {
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
    }

    fn quadrature(&self) -> Result<Vec<([f64; 3], f64)>> {
        // area coordinates (L1, L2, L3) -> (ξ, η) = (L2, L3)
        Ok(gauss_tri(1)?
            .into_iter()
            .map(|gp| ([gp.coords[1], gp.coords[2], 0.0], gp.weight))
            .collect())
    }

    fn shape_derivatives(&self, _xi: &[f64; 3]) -> DMatrix<f64> {
        DMatrix::from_row_slice(3, 2, &[
            -1.0, -1.0,
             1.0,  0.0,
             0.0,  1.0,
        ])
    }
}

/// 4-node bilinear quadrilateral, 2x2 Gauss integration.
///
/// ```text
/// N_i = (1 + ξ_i*ξ)(1 + η_i*η) / 4
///
/// 3 --- 2
/// |     |
/// 0 --- 1
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Quad4;

impl Quad4 {
    /// Node positions in natural coordinates.
    const NODE_COORDS: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
}

impl ElementShape for Quad4 {
    fn kind(&self) -> ElementKind {
        ElementKind::Quad4
    }

    fn reference_measure(&self) -> f64 {
        4.0
    }

    fn reference_nodes(&self) -> Vec<[f64; 3]> {
        Self::NODE_COORDS.iter().map(|&(x, e)| [x, e, 0.0]).collect()
    }

    fn quadrature(&self) -> Result<Vec<([f64; 3], f64)>> {
        Ok(gauss_quad(2)?
            .into_iter()
            .map(|gp| ([gp.coords[0], gp.coords[1], 0.0], gp.weight))
            .collect())
    }

    fn shape_derivatives(&self, xi: &[f64; 3]) -> DMatrix<f64> {
        let (x, e) = (xi[0], xi[1]);
        DMatrix::from_fn(4, 2, |i, d| {
            let (xi_i, eta_i) = Self::NODE_COORDS[i];
            if d == 0 {
                0.25 * xi_i * (1.0 + eta_i * e)
            } else {
                0.25 * (1.0 + xi_i * x) * eta_i
            }
        })
    }
}
