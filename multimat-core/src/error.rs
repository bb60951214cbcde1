//! Error types for multimat operations.

use thiserror::Error;

/// Result type alias using the multimat Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building material tables, integrating element
/// stiffness or recovering stress.
#[derive(Error, Debug)]
pub enum Error {
    /// Young's modulus or Poisson's ratio outside the isotropic stability bounds.
    #[error("invalid material parameter: {name} = {value} ({reason})")]
    InvalidMaterialParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A region referenced by mesh geometry has no tensor in the table.
    #[error("no elastic tensor mapped for region {region}")]
    MissingRegionMapping { region: u32 },

    /// Insert into a slot the table was not sized for.
    #[error("region {region} outside table range 1..={n_regions}")]
    RegionOutOfRange { region: u32, n_regions: u32 },

    /// Element stiffness failed the symmetry check.
    #[error("element stiffness asymmetry {asymmetry:e} exceeds tolerance {tolerance:e}")]
    AsymmetryDefect { asymmetry: f64, tolerance: f64 },

    /// Malformed element geometry.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Element DOF not addressable in the supplied displacement field.
    #[error("dof {dof} out of range for displacement field of length {len}")]
    DofOutOfRange { dof: usize, len: usize },

    /// Global operator assembly errors.
    #[error("assembly error: {0}")]
    Assembly(String),

    /// Mesh-related errors.
    #[error("mesh error: {0}")]
    Mesh(String),

    /// Configuration parse errors.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O errors (configuration files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
