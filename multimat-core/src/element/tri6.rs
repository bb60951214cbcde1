//! 6-node quadratic triangle (plane strain).
//!
//! ```text
//!   2
//!   | \
//!   5   4
//!   |     \
//!   0 --3-- 1
//! ```
//!
//! Corner nodes 0, 1, 2; mid-edge nodes 3 (edge 0-1), 4 (edge 1-2) and
//! 5 (edge 2-0). With area coordinates L1 = 1 - ξ - η, L2 = ξ, L3 = η:
//!
//! ```text
//! N0 = L1(2L1 - 1)   N3 = 4 L1 L2
//! N1 = L2(2L2 - 1)   N4 = 4 L2 L3
//! N2 = L3(2L3 - 1)   N5 = 4 L3 L1
//! ```
//!
//! Strain varies linearly over a straight-edged element, so the degree-2
//! three-point rule integrates the stiffness exactly.

use crate::element::gauss::gauss_tri;
use crate::element::{ElementKind, ElementShape};
use crate::error::Result;
use nalgebra::DMatrix;

/// 6-node quadratic triangle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tri6;

impl ElementShape for Tri6 {
    fn kind(&self) -> ElementKind {
        ElementKind::Tri6
    }

    fn reference_measure(&self) -> f64 {
        0.5
    }

    fn reference_nodes(&self) -> Vec<[f64; 3]> {
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.5, 0.0, 0.0],
            [0.5, 0.5, 0.0],
            [0.0, 0.5, 0.0],
        ]
    }

    fn quadrature(&self) -> Result<Vec<([f64; 3], f64)>> {
        Ok(gauss_tri(3)?
            .into_iter()
            .map(|gp| ([gp.coords[1], gp.coords[2], 0.0], gp.weight))
            .collect())
    }

    fn shape_derivatives(&self, xi: &[f64; 3]) -> DMatrix<f64> {
        let (x, e) = (xi[0], xi[1]);
        let l1 = 1.0 - x - e;
        DMatrix::from_row_slice(6, 2, &[
            1.0 - 4.0 * l1,    1.0 - 4.0 * l1,
            4.0 * x - 1.0,     0.0,
            0.0,               4.0 * e - 1.0,
            4.0 * (l1 - x),   -4.0 * x,
            4.0 * e,           4.0 * x,
           -4.0 * e,           4.0 * (l1 - e),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Sampling;
    use crate::types::Point3;
    use approx::assert_relative_eq;

    /// Straight-edged triangle with mid-edge nodes at the edge midpoints.
    fn triangle(corners: [Point3; 3]) -> Vec<Point3> {
        let [a, b, c] = corners;
        vec![a, b, c, (a + b) * 0.5, (b + c) * 0.5, (c + a) * 0.5]
    }

    #[test]
    fn test_tri6_area() {
        let coords = triangle([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        ]);
        for sampling in [Sampling::Quadrature, Sampling::Nodes] {
            let g = Tri6.geometry(&coords, sampling).unwrap();
            assert_relative_eq!(g.measure(), 6.0, epsilon = 1e-13);
        }
        assert_eq!(Tri6.geometry(&coords, Sampling::Quadrature).unwrap().points().len(), 3);
        assert_eq!(Tri6.geometry(&coords, Sampling::Nodes).unwrap().points().len(), 6);
    }

    #[test]
    fn test_tri6_corner_derivatives() {
        // at node 0: dN0/dξ = -3, dN3/dξ = 4, dN5/dη = 4, the rest vanish or are ±1
        let d = Tri6.shape_derivatives(&[0.0, 0.0, 0.0]);
        assert_relative_eq!(d[(0, 0)], -3.0);
        assert_relative_eq!(d[(1, 0)], -1.0);
        assert_relative_eq!(d[(3, 0)], 4.0);
        assert_relative_eq!(d[(5, 1)], 4.0);
        assert_relative_eq!(d[(4, 0)], 0.0);
        for c in 0..2 {
            assert_relative_eq!(d.column(c).sum(), 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_tri6_reproduces_quadratic_field() {
        let coords = triangle([
            Point3::new(0.2, -0.1, 0.0),
            Point3::new(2.0, 0.4, 0.0),
            Point3::new(0.6, 1.7, 0.0),
        ]);
        // f = x^2 + 3xy - y^2, ∇f = (2x + 3y, 3x - 2y)
        let f: Vec<f64> = coords.iter().map(|p| p.x * p.x + 3.0 * p.x * p.y - p.y * p.y).collect();

        let g = Tri6.geometry(&coords, Sampling::Nodes).unwrap();
        for (p, x) in g.points().iter().zip(&coords) {
            let grad_x: f64 = (0..6).map(|a| f[a] * p.gradients[(a, 0)]).sum();
            let grad_y: f64 = (0..6).map(|a| f[a] * p.gradients[(a, 1)]).sum();
            assert_relative_eq!(grad_x, 2.0 * x.x + 3.0 * x.y, epsilon = 1e-12);
            assert_relative_eq!(grad_y, 3.0 * x.x - 2.0 * x.y, epsilon = 1e-12);
        }
    }
}
