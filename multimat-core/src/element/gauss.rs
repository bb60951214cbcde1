//! Gauss quadrature rules for numerical integration.
//!
//! Rules for the reference line, triangle, quadrilateral, tetrahedron and
//! hexahedron. Simplex rules are given in barycentric coordinates; tensor
//! rules in natural coordinates on [-1, 1]^d.
//!
//! ```
//! use multimat_core::element::gauss::{gauss_hex, gauss_tet};
//!
//! let volume: f64 = gauss_hex(2).unwrap().iter().map(|gp| gp.weight).sum();
//! assert!((volume - 8.0).abs() < 1e-14);
//!
//! for gp in gauss_tet(4).unwrap() {
//!     // gp.coords holds (L1, L2, L3, L4)
//!     assert!((gp.coords.iter().sum::<f64>() - 1.0).abs() < 1e-14);
//! }
//! ```

use crate::error::{Error, Result};

/// A Gauss quadrature point with natural coordinates and weight.
#[derive(Debug, Clone, Copy)]
pub struct GaussPoint {
    /// Natural coordinates.
    /// - For tensor rules: [ξ, η, ζ, 0] in [-1, 1]
    /// - For simplex rules: barycentric [L1, L2, L3, L4] (unused slots zero)
    pub coords: [f64; 4],
    /// Integration weight.
    pub weight: f64,
}

impl GaussPoint {
    /// Create a new Gauss point.
    pub fn new(coords: [f64; 4], weight: f64) -> Self {
        Self { coords, weight }
    }
}

fn unsupported(rule: &str, n: usize, allowed: &str) -> Error {
    Error::Geometry(format!("{}: n must be {}, got {}", rule, allowed, n))
}

/// 1D Gauss-Legendre (point, weight) pairs on [-1, 1], `n` in 1..=4.
pub fn gauss_1d(n: usize) -> Result<Vec<(f64, f64)>> {
    let rule = match n {
        1 => vec![(0.0, 2.0)],
        2 => {
            let p = 1.0 / 3.0_f64.sqrt();
            vec![(-p, 1.0), (p, 1.0)]
        }
        3 => {
            let p = (3.0 / 5.0_f64).sqrt();
            vec![(-p, 5.0 / 9.0), (0.0, 8.0 / 9.0), (p, 5.0 / 9.0)]
        }
        4 => {
            // Points: ±√((3 ∓ 2√(6/5))/7), weights: (18 ± √30) / 36
            let sqrt_6_5 = (6.0 / 5.0_f64).sqrt();
            let p1 = ((3.0 - 2.0 * sqrt_6_5) / 7.0).sqrt();
            let p2 = ((3.0 + 2.0 * sqrt_6_5) / 7.0).sqrt();
            let sqrt_30 = 30.0_f64.sqrt();
            let w1 = (18.0 + sqrt_30) / 36.0;
            let w2 = (18.0 - sqrt_30) / 36.0;
            vec![(-p2, w2), (-p1, w1), (p1, w1), (p2, w2)]
        }
        _ => return Err(unsupported("gauss_1d", n, "1, 2, 3, or 4")),
    };
    Ok(rule)
}

/// Tetrahedral rule on the unit tetrahedron (volume 1/6), `n` in {1, 4}.
///
/// - n=1: centroid, exact for linear integrands
/// - n=4: exact for quadratics
pub fn gauss_tet(n: usize) -> Result<Vec<GaussPoint>> {
    let rule = match n {
        1 => vec![GaussPoint::new([0.25, 0.25, 0.25, 0.25], 1.0 / 6.0)],
        4 => {
            // (α, β, β, β) and permutations
            let sqrt5 = 5.0_f64.sqrt();
            let alpha = (5.0 + 3.0 * sqrt5) / 20.0;
            let beta = (5.0 - sqrt5) / 20.0;
            let w = 1.0 / 24.0;
            vec![
                GaussPoint::new([alpha, beta, beta, beta], w),
                GaussPoint::new([beta, alpha, beta, beta], w),
                GaussPoint::new([beta, beta, alpha, beta], w),
                GaussPoint::new([beta, beta, beta, alpha], w),
            ]
        }
        _ => return Err(unsupported("gauss_tet", n, "1 or 4")),
    };
    Ok(rule)
}

/// Hexahedral tensor-product rule on [-1, 1]^3 with `n` points per direction.
pub fn gauss_hex(n: usize) -> Result<Vec<GaussPoint>> {
    if !(1..=3).contains(&n) {
        return Err(unsupported("gauss_hex", n, "1, 2, or 3"));
    }

    let rule_1d = gauss_1d(n)?;
    let mut points = Vec::with_capacity(n * n * n);

    for &(xi, w_xi) in &rule_1d {
        for &(eta, w_eta) in &rule_1d {
            for &(zeta, w_zeta) in &rule_1d {
                points.push(GaussPoint::new([xi, eta, zeta, 0.0], w_xi * w_eta * w_zeta));
            }
        }
    }

    Ok(points)
}

/// Triangle rule on the unit triangle (area 1/2), `n` in {1, 3}.
pub fn gauss_tri(n: usize) -> Result<Vec<GaussPoint>> {
    let rule = match n {
        1 => vec![GaussPoint::new([1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0, 0.0], 0.5)],
        3 => {
            // edge midpoints, degree 2
            let w = 1.0 / 6.0;
            vec![
                GaussPoint::new([0.5, 0.5, 0.0, 0.0], w),
                GaussPoint::new([0.0, 0.5, 0.5, 0.0], w),
                GaussPoint::new([0.5, 0.0, 0.5, 0.0], w),
            ]
        }
        _ => return Err(unsupported("gauss_tri", n, "1 or 3")),
    };
    Ok(rule)
}

/// Quadrilateral tensor-product rule on [-1, 1]^2 with `n` points per direction.
pub fn gauss_quad(n: usize) -> Result<Vec<GaussPoint>> {
    if !(1..=3).contains(&n) {
        return Err(unsupported("gauss_quad", n, "1, 2, or 3"));
    }

    let rule_1d = gauss_1d(n)?;
    let mut points = Vec::with_capacity(n * n);

    for &(xi, w_xi) in &rule_1d {
        for &(eta, w_eta) in &rule_1d {
            points.push(GaussPoint::new([xi, eta, 0.0, 0.0], w_xi * w_eta));
        }
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gauss_1d_integrates_polynomials() {
        // ∫_{-1}^{1} 3 dx = 6
        let rule = gauss_1d(1).unwrap();
        let integral: f64 = rule.iter().map(|&(_, w)| 3.0 * w).sum();
        assert_relative_eq!(integral, 6.0, epsilon = 1e-14);

        // 2-point rule is exact to degree 3
        let rule = gauss_1d(2).unwrap();
        let integral: f64 = rule.iter().map(|&(x, w)| x.powi(3) * w).sum();
        assert_relative_eq!(integral, 0.0, epsilon = 1e-14);
        let integral: f64 = rule.iter().map(|&(x, w)| x.powi(2) * w).sum();
        assert_relative_eq!(integral, 2.0 / 3.0, epsilon = 1e-14);
    }

    #[test]
    fn test_gauss_1d_weights_sum() {
        for n in 1..=4 {
            let sum: f64 = gauss_1d(n).unwrap().iter().map(|&(_, w)| w).sum();
            assert_relative_eq!(sum, 2.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_gauss_tet_weights_and_barycentric_sum() {
        for &n in &[1, 4] {
            let rule = gauss_tet(n).unwrap();
            let sum: f64 = rule.iter().map(|gp| gp.weight).sum();
            assert_relative_eq!(sum, 1.0 / 6.0, epsilon = 1e-14);
            for gp in &rule {
                let l: f64 = gp.coords.iter().sum();
                assert_relative_eq!(l, 1.0, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_gauss_hex_point_count_and_weights() {
        for n in 1..=3 {
            let rule = gauss_hex(n).unwrap();
            assert_eq!(rule.len(), n * n * n);
            let sum: f64 = rule.iter().map(|gp| gp.weight).sum();
            assert_relative_eq!(sum, 8.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_gauss_tri_weights_sum() {
        for &n in &[1, 3] {
            let sum: f64 = gauss_tri(n).unwrap().iter().map(|gp| gp.weight).sum();
            assert_relative_eq!(sum, 0.5, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_gauss_quad_weights_sum() {
        for n in 1..=3 {
            let sum: f64 = gauss_quad(n).unwrap().iter().map(|gp| gp.weight).sum();
            assert_relative_eq!(sum, 4.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_unsupported_orders() {
        assert!(matches!(gauss_1d(5), Err(Error::Geometry(_))));
        assert!(gauss_tet(3).is_err());
        assert!(gauss_hex(4).is_err());
        assert!(gauss_tri(2).is_err());
        assert!(gauss_quad(0).is_err());
    }
}
