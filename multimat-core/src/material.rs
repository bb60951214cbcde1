//! Isotropic elastic constants and elastic tensor construction.
//!
//! The tensor is assembled from the Lamé parameters:
//!
//! ```text
//!       [λ+2μ   λ     λ    0  0  0]
//!       [ λ    λ+2μ   λ    0  0  0]
//! C  =  [ λ     λ    λ+2μ  0  0  0]
//!       [ 0     0     0    μ  0  0]
//!       [ 0     0     0    0  μ  0]
//!       [ 0     0     0    0  0  μ]
//! ```

use crate::error::{Error, Result};
use crate::types::ElasticTensor;
use nalgebra::Matrix6;

/// Engineering constants for one isotropic linear elastic material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElasticConstants {
    youngs_modulus: f64,
    poissons_ratio: f64,
}

impl ElasticConstants {
    /// Create a new isotropic linear elastic material.
    ///
    /// # Arguments
    ///
    /// * `youngs_modulus` - Young's modulus E, must be positive and finite
    /// * `poissons_ratio` - Poisson's ratio ν, -1 < ν < 0.5
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMaterialParameter`] if either constant is
    /// outside the isotropic stability bounds.
    pub fn new(youngs_modulus: f64, poissons_ratio: f64) -> Result<Self> {
        if !youngs_modulus.is_finite() || youngs_modulus <= 0.0 {
            return Err(Error::InvalidMaterialParameter {
                name: "youngs_modulus",
                value: youngs_modulus,
                reason: "must be positive and finite",
            });
        }
        if !(poissons_ratio > -1.0 && poissons_ratio < 0.5) {
            return Err(Error::InvalidMaterialParameter {
                name: "poissons_ratio",
                value: poissons_ratio,
                reason: "must lie in (-1, 0.5)",
            });
        }
        Ok(Self {
            youngs_modulus,
            poissons_ratio,
        })
    }

    /// Young's modulus E.
    pub fn youngs_modulus(&self) -> f64 {
        self.youngs_modulus
    }

    /// Poisson's ratio ν.
    pub fn poissons_ratio(&self) -> f64 {
        self.poissons_ratio
    }

    /// Lamé's first parameter λ = Eν / ((1+ν)(1-2ν)).
    pub fn lame_lambda(&self) -> f64 {
        let e = self.youngs_modulus;
        let nu = self.poissons_ratio;
        e * nu / ((1.0 + nu) * (1.0 - 2.0 * nu))
    }

    /// Lamé's second parameter μ = E / (2(1 + ν)), the shear modulus.
    pub fn lame_mu(&self) -> f64 {
        self.youngs_modulus / (2.0 * (1.0 + self.poissons_ratio))
    }

    /// Bulk modulus K = E / (3(1 - 2ν)).
    pub fn bulk_modulus(&self) -> f64 {
        self.youngs_modulus / (3.0 * (1.0 - 2.0 * self.poissons_ratio))
    }

    /// 6x6 elastic tensor in Voigt notation.
    pub fn elasticity_tensor(&self) -> ElasticTensor {
        let lambda = self.lame_lambda();
        let mu = self.lame_mu();
        let normal = lambda + 2.0 * mu;

        ElasticTensor::from_symmetric(Matrix6::new(
            normal, lambda, lambda, 0.0, 0.0, 0.0,
            lambda, normal, lambda, 0.0, 0.0, 0.0,
            lambda, lambda, normal, 0.0, 0.0, 0.0,
            0.0,    0.0,    0.0,    mu,  0.0, 0.0,
            0.0,    0.0,    0.0,    0.0, mu,  0.0,
            0.0,    0.0,    0.0,    0.0, 0.0, mu,
        ))
    }
}

/// Build the isotropic elastic tensor for (E, ν).
///
/// Pure: identical inputs always give identical tensors.
pub fn build_elasticity_tensor(youngs_modulus: f64, poissons_ratio: f64) -> Result<ElasticTensor> {
    Ok(ElasticConstants::new(youngs_modulus, poissons_ratio)?.elasticity_tensor())
}
