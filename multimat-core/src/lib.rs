//! multimat-core - piecewise-material linear elasticity
//!
//! Element-level building blocks for small-strain elasticity on meshes whose
//! elements carry a material region attribute:
//! - Isotropic elastic tensors in Voigt notation built from (E, ν)
//! - A region-indexed table of those tensors
//! - Element stiffness integration with parallel assembly using Rayon
//! - Per-element, per-point stress recovery from a solved displacement field
//!
//! # Architecture
//!
//! - [`ElasticConstants`] / [`build_elasticity_tensor`]: (E, ν) to [`ElasticTensor`]
//! - [`MaterialTensorTable`]: region id to tensor, built once and shared read-only
//! - [`ElasticityStiffnessIntegrator`]: K_e = Σ w |J| Bᵀ C B, fed to an [`AssemblySink`]
//! - [`StressRecoveryOperator`]: σ = C B u_e at each evaluation point
//! - [`Mesh`] and [`element`]: the geometry that drives both
//!
//! Voigt order is `[xx, yy, zz, yz, xz, xy]` with engineering shear strains.
//! Linear solvers are out of scope; the global operator leaves the crate
//! through [`AssemblySink`].

pub mod assembly;
pub mod config;
pub mod element;
pub mod error;
pub mod geometry;
pub mod material;
pub mod mesh;
pub mod sparse;
pub mod strain;
pub mod stress;
pub mod table;
pub mod types;

pub use assembly::{AssemblyOptions, ElasticityStiffnessIntegrator};
pub use config::{MaterialConfig, MaterialSpec};
pub use element::{create_shape, ElementKind, ElementShape, Sampling};
pub use error::{Error, Result};
pub use geometry::{ElementGeometry, EvaluationPoint, MeshElement};
pub use material::{build_elasticity_tensor, ElasticConstants};
pub use mesh::Mesh;
pub use sparse::{AssemblySink, CsrMatrix, LoadVector, TripletMatrix};
pub use stress::{recover, StressField, StressRecoveryOperator};
pub use table::{build_material_table, MaterialAssignment, MaterialTensorTable};
pub use types::{ElasticTensor, Point3, RegionId, StrainVector, StressVector, VoigtComponent};
