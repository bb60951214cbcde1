//! Core data types for elastic tensors and Voigt vectors.
//!
//! All 6-component quantities share one Voigt ordering:
//! `[xx, yy, zz, yz, xz, xy]`. Strains carry engineering shear
//! (γ = 2ε) in the last three slots.

use crate::error::{Error, Result};
use nalgebra::{Matrix3, Matrix6, Vector3, Vector6};
use std::ops::Index;

/// A point in 3D space. 2D nodes are stored with z = 0.
pub type Point3 = Vector3<f64>;

/// Mesh region (material attribute) identifier, 1-based.
pub type RegionId = u32;

/// One slot of a Voigt vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoigtComponent {
    Xx,
    Yy,
    Zz,
    Yz,
    Xz,
    Xy,
}

impl VoigtComponent {
    /// All components in storage order.
    pub const ALL: [VoigtComponent; 6] = [
        VoigtComponent::Xx,
        VoigtComponent::Yy,
        VoigtComponent::Zz,
        VoigtComponent::Yz,
        VoigtComponent::Xz,
        VoigtComponent::Xy,
    ];

    /// Storage index within a Voigt vector.
    pub fn index(self) -> usize {
        match self {
            VoigtComponent::Xx => 0,
            VoigtComponent::Yy => 1,
            VoigtComponent::Zz => 2,
            VoigtComponent::Yz => 3,
            VoigtComponent::Xz => 4,
            VoigtComponent::Xy => 5,
        }
    }

    /// Whether this is a normal (diagonal) component.
    pub fn is_normal(self) -> bool {
        self.index() < 3
    }
}

/// Symmetric stress tensor in Voigt notation.
///
/// Components are ordered as: [σ_xx, σ_yy, σ_zz, τ_yz, τ_xz, τ_xy]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressVector(pub Vector6<f64>);

impl StressVector {
    /// Create a new stress vector from Voigt components.
    pub fn new(components: [f64; 6]) -> Self {
        Self(Vector6::from_row_slice(&components))
    }

    /// Zero stress state.
    pub fn zero() -> Self {
        Self(Vector6::zeros())
    }

    /// Value of a single component.
    pub fn component(&self, c: VoigtComponent) -> f64 {
        self.0[c.index()]
    }

    /// Compute von Mises equivalent stress.
    pub fn von_mises(&self) -> f64 {
        let s = &self.0;
        let (s_xx, s_yy, s_zz) = (s[0], s[1], s[2]);
        let (t_yz, t_xz, t_xy) = (s[3], s[4], s[5]);

        let term1 = (s_xx - s_yy).powi(2) + (s_yy - s_zz).powi(2) + (s_zz - s_xx).powi(2);
        let term2 = 6.0 * (t_xy.powi(2) + t_yz.powi(2) + t_xz.powi(2));

        ((term1 + term2) / 2.0).sqrt()
    }

    /// Compute hydrostatic (mean) stress.
    pub fn hydrostatic(&self) -> f64 {
        (self.0[0] + self.0[1] + self.0[2]) / 3.0
    }

    /// Extract the full 3x3 symmetric stress matrix.
    pub fn to_matrix(&self) -> Matrix3<f64> {
        let s = &self.0;
        Matrix3::new(
            s[0], s[5], s[4],
            s[5], s[1], s[3],
            s[4], s[3], s[2],
        )
    }
}

/// Symmetric strain tensor in Voigt notation.
///
/// Components are ordered as: [ε_xx, ε_yy, ε_zz, γ_yz, γ_xz, γ_xy]
/// where γ = 2ε for engineering shear strain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrainVector(pub Vector6<f64>);

impl StrainVector {
    /// Create a new strain vector from Voigt components.
    pub fn new(components: [f64; 6]) -> Self {
        Self(Vector6::from_row_slice(&components))
    }

    /// Zero strain state.
    pub fn zero() -> Self {
        Self(Vector6::zeros())
    }

    /// Compute volumetric strain.
    pub fn volumetric(&self) -> f64 {
        self.0[0] + self.0[1] + self.0[2]
    }

    /// Extract the full 3x3 symmetric strain matrix.
    pub fn to_matrix(&self) -> Matrix3<f64> {
        let e = &self.0;
        // off-diagonal terms are γ/2 = ε
        Matrix3::new(
            e[0],       e[5] / 2.0, e[4] / 2.0,
            e[5] / 2.0, e[1],       e[3] / 2.0,
            e[4] / 2.0, e[3] / 2.0, e[2],
        )
    }
}

/// Elastic stiffness tensor C in Voigt notation, σ = C ε.
///
/// Immutable once built: the wrapped matrix is only reachable by shared
/// reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElasticTensor(Matrix6<f64>);

impl ElasticTensor {
    /// Relative tolerance used by [`ElasticTensor::from_matrix`].
    pub const SYMMETRY_TOLERANCE: f64 = 1e-12;

    /// Wrap an arbitrary (e.g. anisotropic) 6x6 stiffness.
    ///
    /// # Errors
    ///
    /// Fails if the matrix has non-finite entries, is not symmetric, or is
    /// not positive definite.
    pub fn from_matrix(matrix: Matrix6<f64>) -> Result<Self> {
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidMaterialParameter {
                name: "elastic tensor",
                value: f64::NAN,
                reason: "entries must be finite",
            });
        }
        let scale = matrix.amax().max(f64::MIN_POSITIVE);
        let asymmetry = (matrix - matrix.transpose()).amax() / scale;
        if asymmetry > Self::SYMMETRY_TOLERANCE {
            return Err(Error::InvalidMaterialParameter {
                name: "elastic tensor",
                value: asymmetry,
                reason: "tensor must be symmetric",
            });
        }
        let definite = matrix
            .cholesky()
            .is_some_and(|c| c.l_dirty().diagonal().iter().all(|&d| d > 0.0));
        if !definite {
            return Err(Error::InvalidMaterialParameter {
                name: "elastic tensor",
                value: matrix.symmetric_eigenvalues().min(),
                reason: "tensor must be positive definite",
            });
        }
        Ok(Self(matrix))
    }

    /// Crate-internal constructor for tensors symmetric by construction.
    pub(crate) fn from_symmetric(matrix: Matrix6<f64>) -> Self {
        Self(matrix)
    }

    /// Borrow the underlying matrix.
    pub fn as_matrix(&self) -> &Matrix6<f64> {
        &self.0
    }

    /// σ = C ε.
    pub fn stress(&self, strain: &StrainVector) -> StressVector {
        StressVector(self.0 * strain.0)
    }
}

impl Index<(usize, usize)> for ElasticTensor {
    type Output = f64;

    fn index(&self, idx: (usize, usize)) -> &f64 {
        &self.0[idx]
    }
}
