//! 8-node hexahedron (Hex8).
//!
//! - 8 nodes at vertices, 3 DOFs per node, 24 total DOFs
//! - Trilinear shape functions
//! - 2×2×2 Gauss integration (8 points)
//!
//! # Shape Functions
//!
//! ```text
//! N_i = (1 + ξ_i*ξ)(1 + η_i*η)(1 + ζ_i*ζ) / 8
//! ```
//! where (ξ_i, η_i, ζ_i) are ±1 for node i.
//!
//! # Node Numbering
//!
//! ```text
//!        7-------6
//!       /|      /|
//!      / |     / |
//!     4-------5  |
//!     |  3----|--2
//!     | /     | /
//!     |/      |/
//!     0-------1
//! ```

use crate::element::gauss::gauss_hex;
use crate::element::{ElementKind, ElementShape};
use crate::error::Result;
use nalgebra::DMatrix;

/// Natural coordinates for each of the 8 nodes.
const XI: [f64; 8] = [-1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0];
const ETA: [f64; 8] = [-1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0];
const ZETA: [f64; 8] = [-1.0, -1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0];

/// 8-node hexahedral element (trilinear brick).
#[derive(Debug, Clone, Copy, Default)]
pub struct Hex8;

impl ElementShape for Hex8 {
    fn kind(&self) -> ElementKind {
        ElementKind::Hex8
    }

    fn reference_measure(&self) -> f64 {
        8.0
    }

    fn reference_nodes(&self) -> Vec<[f64; 3]> {
        (0..8).map(|i| [XI[i], ETA[i], ZETA[i]]).collect()
    }

    fn quadrature(&self) -> Result<Vec<([f64; 3], f64)>> {
        Ok(gauss_hex(2)?
            .into_iter()
            .map(|gp| ([gp.coords[0], gp.coords[1], gp.coords[2]], gp.weight))
            .collect())
    }

    fn shape_derivatives(&self, xi: &[f64; 3]) -> DMatrix<f64> {
        let [xi, eta, zeta] = *xi;
        DMatrix::from_fn(8, 3, |i, d| match d {
            // dN_i/dξ = (1/8) ξ_i (1 + η_i η)(1 + ζ_i ζ)
            0 => 0.125 * XI[i] * (1.0 + ETA[i] * eta) * (1.0 + ZETA[i] * zeta),
            // dN_i/dη = (1/8) (1 + ξ_i ξ) η_i (1 + ζ_i ζ)
            1 => 0.125 * (1.0 + XI[i] * xi) * ETA[i] * (1.0 + ZETA[i] * zeta),
            // dN_i/dζ = (1/8) (1 + ξ_i ξ)(1 + η_i η) ζ_i
            _ => 0.125 * (1.0 + XI[i] * xi) * (1.0 + ETA[i] * eta) * ZETA[i],
        })
    }
}
