//! Stress recovery from displacement solution.
//!
//! After solving Ku = f for displacements, this module computes element stresses:
//! 1. Gather element nodal displacements from the global solution
//! 2. Compute strain: ε = B * u_e, with the same B as assembly
//! 3. Compute stress: σ = C * ε, with C from the element's region
//!
//! Stresses are evaluated at whatever points the element geometry carries
//! (Gauss points or nodes). Nothing is averaged across elements: a node on a
//! material interface gets one value per adjacent element.

use crate::error::Result;
use crate::geometry::MeshElement;
use crate::strain::strain_at;
use crate::table::MaterialTensorTable;
use crate::types::{RegionId, StrainVector, StressVector, VoigtComponent};
use rayon::prelude::*;

/// Stress result for a single element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStress {
    /// Element index in the input slice.
    pub element_id: usize,
    /// Region the element belongs to.
    pub region: RegionId,
    /// Stress at each evaluation point.
    pub point_stresses: Vec<StressVector>,
}

impl ElementStress {
    /// Compute the average stress across all evaluation points.
    pub fn average_stress(&self) -> StressVector {
        if self.point_stresses.is_empty() {
            return StressVector::zero();
        }
        let sum = self
            .point_stresses
            .iter()
            .fold(StressVector::zero().0, |acc, s| acc + s.0);
        StressVector(sum / self.point_stresses.len() as f64)
    }

    /// Maximum von Mises stress among all evaluation points.
    pub fn max_von_mises(&self) -> f64 {
        self.point_stresses
            .iter()
            .map(|s| s.von_mises())
            .fold(0.0, f64::max)
    }
}

/// Strain result for a single element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStrain {
    pub element_id: usize,
    pub region: RegionId,
    pub point_strains: Vec<StrainVector>,
}

/// Stress recovery results for the entire mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct StressField {
    /// Element stresses indexed by element ID.
    pub element_stresses: Vec<ElementStress>,
}

impl StressField {
    /// Get stress for a specific element.
    pub fn element(&self, elem_id: usize) -> Option<&ElementStress> {
        self.element_stresses.get(elem_id)
    }

    /// Number of elements with stress data.
    pub fn n_elements(&self) -> usize {
        self.element_stresses.len()
    }

    /// Total number of evaluation points.
    pub fn n_points(&self) -> usize {
        self.element_stresses.iter().map(|es| es.point_stresses.len()).sum()
    }

    /// One scalar subfield, element-major then point-major.
    pub fn component(&self, c: VoigtComponent) -> Vec<f64> {
        self.element_stresses
            .iter()
            .flat_map(|es| es.point_stresses.iter().map(move |s| s.component(c)))
            .collect()
    }

    /// All six components per point, flattened to (elements x points x 6).
    pub fn to_flat(&self) -> Vec<f64> {
        self.element_stresses
            .iter()
            .flat_map(|es| es.point_stresses.iter())
            .flat_map(|s| s.0.iter().copied())
            .collect()
    }

    /// Maximum von Mises stress across all elements.
    pub fn max_von_mises(&self) -> f64 {
        self.element_stresses
            .iter()
            .map(|es| es.max_von_mises())
            .fold(0.0, f64::max)
    }

    /// Compute average element stresses.
    pub fn average_stresses(&self) -> Vec<StressVector> {
        self.element_stresses
            .iter()
            .map(|es| es.average_stress())
            .collect()
    }

    /// Von Mises stress of each element's average stress.
    pub fn von_mises_stresses(&self) -> Vec<f64> {
        self.element_stresses
            .iter()
            .map(|es| es.average_stress().von_mises())
            .collect()
    }
}

/// Evaluates σ = C(region) B u_e per element and point.
#[derive(Debug, Clone, Copy)]
pub struct StressRecoveryOperator<'a> {
    table: &'a MaterialTensorTable,
    parallel: bool,
}

impl<'a> StressRecoveryOperator<'a> {
    /// Operator that spreads elements over the Rayon thread pool.
    pub fn new(table: &'a MaterialTensorTable) -> Self {
        Self::with_parallel(table, true)
    }

    /// Operator with an explicit parallel toggle; serial runs visit elements
    /// in order.
    pub fn with_parallel(table: &'a MaterialTensorTable, parallel: bool) -> Self {
        Self { table, parallel }
    }

    /// Stress for one element.
    pub fn element_stress(&self, element_id: usize, element: &MeshElement, displacement: &[f64]) -> Result<ElementStress> {
        let strains = element_strains(element, displacement)?;
        let tensor = self.table.lookup(element.region)?;
        Ok(ElementStress {
            element_id,
            region: element.region,
            point_stresses: strains.iter().map(|e| tensor.stress(e)).collect(),
        })
    }

    fn map_elements<T, F>(&self, elements: &[MeshElement], f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize, &MeshElement) -> Result<T> + Sync + Send,
    {
        if self.parallel {
            elements.par_iter().enumerate().map(|(id, elem)| f(id, elem)).collect()
        } else {
            elements.iter().enumerate().map(|(id, elem)| f(id, elem)).collect()
        }
    }

    /// Recover stresses for every element.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::DofOutOfRange`] if an element DOF exceeds the
    ///   displacement length
    /// - [`crate::Error::MissingRegionMapping`] for an unmapped region
    pub fn recover(&self, displacement: &[f64], elements: &[MeshElement]) -> Result<StressField> {
        let element_stresses =
            self.map_elements(elements, |id, elem| self.element_stress(id, elem, displacement))?;

        let field = StressField { element_stresses };
        log::info!(
            "recovered stress at {} points in {} elements, max von Mises {:.6e}",
            field.n_points(),
            field.n_elements(),
            field.max_von_mises()
        );
        Ok(field)
    }

    /// Strains only; no tensor lookup.
    pub fn recover_strains(&self, displacement: &[f64], elements: &[MeshElement]) -> Result<Vec<ElementStrain>> {
        self.map_elements(elements, |id, elem| {
            Ok(ElementStrain {
                element_id: id,
                region: elem.region,
                point_strains: element_strains(elem, displacement)?,
            })
        })
    }
}

fn element_strains(element: &MeshElement, displacement: &[f64]) -> Result<Vec<StrainVector>> {
    let local = element.gather(displacement)?;
    let dim = element.geometry.dim();
    element
        .geometry
        .points()
        .iter()
        .map(|p| strain_at(p, dim, &local))
        .collect()
}

/// Recover stresses from a displacement solution.
///
/// # Example
///
/// ```ignore
/// let mut k = DMatrix::zeros(n_dofs, n_dofs);
/// ElasticityStiffnessIntegrator::new(&table).assemble(&elements, &mut k)?;
/// let u = solve(k, f);
/// let stresses = recover(u.as_slice(), &elements, &table)?;
/// println!("Max von Mises stress: {:.2}", stresses.max_von_mises());
/// ```
pub fn recover(displacement: &[f64], elements: &[MeshElement], table: &MaterialTensorTable) -> Result<StressField> {
    StressRecoveryOperator::new(table).recover(displacement, elements)
}
