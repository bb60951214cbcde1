//! 4-node tetrahedron (Tet4).
//!
//! - 4 nodes at vertices, 3 DOFs per node, 12 total DOFs
//! - Constant strain/stress within element
//! - Single integration point at centroid
//!
//! # Shape Functions
//!
//! With natural coordinates (ξ, η, ζ) on the unit tetrahedron:
//! - N1 = 1 - ξ - η - ζ
//! - N2 = ξ, N3 = η, N4 = ζ
//!
//! # Limitations
//!
//! - Volumetric locking in nearly incompressible materials (ν → 0.5)
//! - Low accuracy in bending, requires fine meshes

use crate::element::gauss::gauss_tet;
use crate::element::{ElementKind, ElementShape};
use crate::error::Result;
use nalgebra::DMatrix;

/// 4-node tetrahedral element (constant strain tetrahedron).
#[derive(Debug, Clone, Copy, Default)]
pub struct Tet4;

impl ElementShape for Tet4 {
    fn kind(&self) -> ElementKind {
        ElementKind::Tet4
    }

    fn reference_measure(&self) -> f64 {
        1.0 / 6.0
    }

    fn reference_nodes(&self) -> Vec<[f64; 3]> {
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ]
    }

    fn quadrature(&self) -> Result<Vec<([f64; 3], f64)>> {
        // barycentric (L1, L2, L3, L4) -> (ξ, η, ζ) = (L2, L3, L4)
        Ok(gauss_tet(1)?
            .into_iter()
            .map(|gp| ([gp.coords[1], gp.coords[2], gp.coords[3]], gp.weight))
            .collect())
    }

    fn shape_derivatives(&self, _xi: &[f64; 3]) -> DMatrix<f64> {
        DMatrix::from_row_slice(4, 3, &[
            -1.0, -1.0, -1.0,
             1.0,  0.0,  0.0,
             0.0,  1.0,  0.0,
             0.0,  0.0,  1.0,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Sampling;
    use crate::types::Point3;
    use approx::assert_relative_eq;

    fn unit_tetrahedron() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn test_tet4_volume_scaled() {
        // Scale by 2 in each direction -> volume * 8
        let coords: Vec<Point3> = unit_tetrahedron().into_iter().map(|p| p * 2.0).collect();
        let g = Tet4.geometry(&coords, Sampling::Quadrature).unwrap();
        assert_relative_eq!(g.measure(), 8.0 / 6.0, epsilon = 1e-14);
    }

    #[test]
    fn test_tet4_unit_gradients() {
        let g = Tet4.geometry(&unit_tetrahedron(), Sampling::Quadrature).unwrap();
        assert_eq!(g.points().len(), 1);
        let p = &g.points()[0];
        assert_relative_eq!(p.det_j, 1.0, epsilon = 1e-14);
        assert_relative_eq!(p.gradients, Tet4.shape_derivatives(&[0.0; 3]), epsilon = 1e-14);
    }

    #[test]
    fn test_tet4_degenerate_rejected() {
        // all four nodes in the z = 0 plane
        let coords = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        assert!(Tet4.geometry(&coords, Sampling::Quadrature).is_err());
    }

    #[test]
    fn test_tet4_node_count() {
        assert_eq!(Tet4.n_nodes(), 4);
        assert_eq!(Tet4.dim(), 3);
    }
}
