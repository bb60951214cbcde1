//! Material configuration.
//!
//! Materials are passed in explicitly rather than living in driver state. A
//! configuration is a JSON document of the form:
//!
//! ```json
//! {
//!   "materials": [
//!     { "youngs_modulus": 1000e3, "poissons_ratio": 0.3 },
//!     { "region": 2, "youngs_modulus": 200e3, "poissons_ratio": 0.3 }
//!   ]
//! }
//! ```
//!
//! Entries without a `region` are placed positionally, see
//! [`MaterialTensorTable::from_config`](crate::table::MaterialTensorTable::from_config).

use crate::error::Result;
use crate::material::ElasticConstants;
use crate::types::RegionId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One material entry as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    /// Explicit region id; positional when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionId>,
    /// Young's modulus E.
    pub youngs_modulus: f64,
    /// Poisson's ratio ν.
    pub poissons_ratio: f64,
}

impl MaterialSpec {
    /// Positional isotropic material.
    pub fn isotropic(youngs_modulus: f64, poissons_ratio: f64) -> Self {
        Self {
            region: None,
            youngs_modulus,
            poissons_ratio,
        }
    }

    /// Pin this material to a region.
    pub fn in_region(mut self, region: RegionId) -> Self {
        self.region = Some(region);
        self
    }

    /// Validate into elastic constants.
    pub fn constants(&self) -> Result<ElasticConstants> {
        ElasticConstants::new(self.youngs_modulus, self.poissons_ratio)
    }
}

/// Ordered list of materials for a mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialConfig {
    pub materials: Vec<MaterialSpec>,
}

impl MaterialConfig {
    /// Parse from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Stiff/soft cantilever pair: E = 1000e3 and 200e3, ν = 0.3.
    pub fn two_material_beam() -> Self {
        Self {
            materials: vec![
                MaterialSpec::isotropic(1000e3, 0.3),
                MaterialSpec::isotropic(200e3, 0.3),
            ],
        }
    }
}
