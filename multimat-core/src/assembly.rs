//! Element stiffness integration and parallel assembly.
//!
//! [`ElasticityStiffnessIntegrator::assemble_element`] computes one local
//! matrix K_e = Σ_q w_q |J_q| Bᵀ C B with C taken from the element's region.
//! [`ElasticityStiffnessIntegrator::assemble`] runs that over a slice of
//! elements using Rayon and feeds the results to an [`AssemblySink`] in
//! element order.

use crate::error::{Error, Result};
use crate::geometry::{ElementGeometry, MeshElement};
use crate::sparse::AssemblySink;
use crate::strain::strain_displacement;
use crate::table::MaterialTensorTable;
use crate::types::RegionId;
use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Assembly options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyOptions {
    /// Compute element matrices on the Rayon thread pool.
    pub parallel: bool,
    /// Largest accepted relative asymmetry of an element matrix.
    pub symmetry_tolerance: f64,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            symmetry_tolerance: 1e-10,
        }
    }
}

/// Relative asymmetry max|K_ij - K_ji| / max|K_ij| of a square matrix.
///
/// Zero for the zero matrix.
pub fn asymmetry(k: &DMatrix<f64>) -> f64 {
    let scale = k.amax();
    if scale == 0.0 {
        return 0.0;
    }
    (k - k.transpose()).amax() / scale
}

/// Integrates linear-elastic element stiffness against a region table.
#[derive(Debug, Clone, Copy)]
pub struct ElasticityStiffnessIntegrator<'a> {
    table: &'a MaterialTensorTable,
    options: AssemblyOptions,
}

impl<'a> ElasticityStiffnessIntegrator<'a> {
    /// Integrator with default options.
    pub fn new(table: &'a MaterialTensorTable) -> Self {
        Self::with_options(table, AssemblyOptions::default())
    }

    pub fn with_options(table: &'a MaterialTensorTable, options: AssemblyOptions) -> Self {
        Self { table, options }
    }

    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// Local stiffness for one element of `region`.
    ///
    /// The result is (n_nodes*dim) square and exactly symmetric.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingRegionMapping`] if the table has no tensor for `region`
    /// - [`Error::AsymmetryDefect`] in debug builds when the integrated matrix
    ///   exceeds the symmetry tolerance (release builds log a warning instead)
    pub fn assemble_element(&self, region: RegionId, geometry: &ElementGeometry) -> Result<DMatrix<f64>> {
        let tensor = self.table.lookup(region)?;
        let c = DMatrix::from_iterator(6, 6, tensor.as_matrix().iter().copied());

        let n_dofs = geometry.n_dofs();
        let mut k = DMatrix::zeros(n_dofs, n_dofs);

        for point in geometry.points() {
            let b = strain_displacement(&point.gradients, geometry.dim())?;
            let db = &c * &b;
            k += (b.transpose() * db) * point.measure();
        }

        let asym = asymmetry(&k);
        if asym > self.options.symmetry_tolerance {
            if cfg!(debug_assertions) {
                return Err(Error::AsymmetryDefect {
                    asymmetry: asym,
                    tolerance: self.options.symmetry_tolerance,
                });
            }
            log::warn!(
                "region {} element stiffness asymmetry {:e} exceeds {:e}",
                region,
                asym,
                self.options.symmetry_tolerance
            );
        }

        Ok((&k + k.transpose()) * 0.5)
    }

    /// Local stiffness for every element, in element order.
    ///
    /// In serial mode the error is the lowest-indexed failing element's; in
    /// parallel mode it is one of the failing elements' errors.
    pub fn element_matrices(&self, elements: &[MeshElement]) -> Result<Vec<DMatrix<f64>>> {
        let integrate = |elem: &MeshElement| self.assemble_element(elem.region, &elem.geometry);
        if self.options.parallel {
            elements.par_iter().map(integrate).collect()
        } else {
            elements.iter().map(integrate).collect()
        }
    }

    /// Integrate all elements and accumulate them into `sink`.
    ///
    /// Local matrices are computed first (in parallel if enabled); the sink
    /// sees them sequentially in element order. Any element error aborts
    /// before anything reaches the sink.
    pub fn assemble<S: AssemblySink + ?Sized>(&self, elements: &[MeshElement], sink: &mut S) -> Result<()> {
        let matrices = self.element_matrices(elements)?;
        for (elem, ke) in elements.iter().zip(&matrices) {
            sink.add_element_matrix(&elem.dofs, ke)?;
        }
        log::info!(
            "assembled {} element matrices ({} regions)",
            matrices.len(),
            self.table.n_regions()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{create_shape, ElementKind, Sampling};
    use crate::material::build_elasticity_tensor;
    use crate::sparse::TripletMatrix;
    use crate::types::{ElasticTensor, Point3};
    use approx::assert_relative_eq;
    use nalgebra::{DVector, SymmetricEigen};

    fn two_region_table() -> MaterialTensorTable {
        let mut table = MaterialTensorTable::with_regions(2);
        table.insert(1, build_elasticity_tensor(1000e3, 0.3).unwrap()).unwrap();
        table.insert(2, build_elasticity_tensor(200e3, 0.3).unwrap()).unwrap();
        table
    }

    fn geometry(kind: ElementKind, coords: &[Point3]) -> ElementGeometry {
        create_shape(kind).geometry(coords, Sampling::Quadrature).unwrap()
    }

    fn unit_tet() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ]
    }

    fn unit_cube() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ]
    }

    fn square(x0: f64) -> Vec<Point3> {
        vec![
            Point3::new(x0, 0.0, 0.0),
            Point3::new(x0 + 1.0, 0.0, 0.0),
            Point3::new(x0 + 1.0, 1.0, 0.0),
            Point3::new(x0, 1.0, 0.0),
        ]
    }

    fn tri6(corners: &[Point3; 3]) -> Vec<Point3> {
        let [a, b, c] = *corners;
        vec![a, b, c, (a + b) * 0.5, (b + c) * 0.5, (c + a) * 0.5]
    }

    fn zero_eigenvalues(k: &DMatrix<f64>) -> usize {
        let eig = SymmetricEigen::new(k.clone());
        let max = eig.eigenvalues.amax();
        for &v in eig.eigenvalues.iter() {
            assert!(v > -1e-8 * max, "negative eigenvalue {}", v);
        }
        eig.eigenvalues.iter().filter(|v| v.abs() < 1e-8 * max).count()
    }

    #[test]
    fn test_element_stiffness_symmetric() {
        let table = two_region_table();
        let integrator = ElasticityStiffnessIntegrator::new(&table);
        let k = integrator.assemble_element(1, &geometry(ElementKind::Hex8, &unit_cube())).unwrap();
        assert_eq!(k.shape(), (24, 24));
        assert_eq!(asymmetry(&k), 0.0);
    }

    #[test]
    fn test_rigid_body_modes() {
        let table = two_region_table();
        let integrator = ElasticityStiffnessIntegrator::new(&table);

        let tri = [Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.3, 0.0), Point3::new(0.5, 1.4, 0.0)];
        let cases = [
            (ElementKind::Tri3, tri.to_vec(), 3),
            (ElementKind::Tri6, tri6(&tri), 3),
            (ElementKind::Quad4, square(0.0), 3),
            (ElementKind::Tet4, unit_tet(), 6),
            (ElementKind::Hex8, unit_cube(), 6),
        ];
        for (kind, coords, rigid) in cases {
            let k = integrator.assemble_element(2, &geometry(kind, &coords)).unwrap();
            assert_eq!(zero_eigenvalues(&k), rigid, "{:?}", kind);
        }
    }

    #[test]
    fn test_translation_has_no_force() {
        let table = two_region_table();
        let k = ElasticityStiffnessIntegrator::new(&table)
            .assemble_element(1, &geometry(ElementKind::Hex8, &unit_cube()))
            .unwrap();
        let u = DVector::from_fn(24, |i, _| if i % 3 == 1 { 0.7 } else { 0.0 });
        assert!((k * u).amax() < 1e-6);
    }

    #[test]
    fn test_stiffness_scales_with_region_modulus() {
        let table = two_region_table();
        let integrator = ElasticityStiffnessIntegrator::new(&table);
        let g = geometry(ElementKind::Tet4, &unit_tet());

        let k1 = integrator.assemble_element(1, &g).unwrap();
        let k2 = integrator.assemble_element(2, &g).unwrap();
        assert!((&k1 - &k2).amax() > 1.0);
        assert_relative_eq!(k1, k2 * 5.0, max_relative = 1e-12);
    }

    #[test]
    fn test_tet4_known_entry() {
        // ∇N_0 = (-1, -1, -1): u_0 enters rows xx, xz and xy, so
        // K_00 = V (C_xx,xx + C_xz,xz + C_xy,xy)
        let table = two_region_table();
        let k = ElasticityStiffnessIntegrator::new(&table)
            .assemble_element(1, &geometry(ElementKind::Tet4, &unit_tet()))
            .unwrap();
        let c = table.lookup(1).unwrap();
        let expected = (c[(0, 0)] + c[(4, 4)] + c[(5, 5)]) / 6.0;
        assert_relative_eq!(k[(0, 0)], expected, max_relative = 1e-12);
    }

    #[test]
    fn test_missing_region() {
        let table = two_region_table();
        let integrator = ElasticityStiffnessIntegrator::new(&table);
        let result = integrator.assemble_element(3, &geometry(ElementKind::Tet4, &unit_tet()));
        assert!(matches!(result, Err(Error::MissingRegionMapping { region: 3 })));
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_asymmetric_tensor_rejected_in_debug() {
        let mut m = *build_elasticity_tensor(1.0, 0.3).unwrap().as_matrix();
        m[(0, 1)] += 1.0;
        let mut table = MaterialTensorTable::with_regions(1);
        table.insert(1, ElasticTensor::from_symmetric(m)).unwrap();

        let result = ElasticityStiffnessIntegrator::new(&table)
            .assemble_element(1, &geometry(ElementKind::Tet4, &unit_tet()));
        assert!(matches!(result, Err(Error::AsymmetryDefect { .. })));
    }

    fn strip() -> Vec<MeshElement> {
        // two quads sharing nodes 1 and 2; node i has dofs 2i, 2i+1
        //  3 -- 2 -- 5
        //  |    |    |
        //  0 -- 1 -- 4
        let left = geometry(ElementKind::Quad4, &square(0.0));
        let right = geometry(ElementKind::Quad4, &square(1.0));
        let dofs = |nodes: [usize; 4]| nodes.iter().flat_map(|&n| [2 * n, 2 * n + 1]).collect();
        vec![
            MeshElement::new(1, dofs([0, 1, 2, 3]), left).unwrap(),
            MeshElement::new(2, dofs([1, 4, 5, 2]), right).unwrap(),
        ]
    }

    #[test]
    fn test_assemble_dense_and_sparse_agree() {
        let table = two_region_table();
        let elements = strip();

        let mut dense = DMatrix::zeros(12, 12);
        ElasticityStiffnessIntegrator::new(&table).assemble(&elements, &mut dense).unwrap();

        let mut triplet = TripletMatrix::new(12, 12);
        let serial = AssemblyOptions {
            parallel: false,
            ..AssemblyOptions::default()
        };
        ElasticityStiffnessIntegrator::with_options(&table, serial)
            .assemble(&elements, &mut triplet)
            .unwrap();
        let sparse = DMatrix::from(&triplet.to_csr().unwrap());

        assert_relative_eq!(dense, sparse, max_relative = 1e-12);
        assert_eq!(asymmetry(&dense), 0.0);

        // shared node 1: both regions contribute
        let k1 = ElasticityStiffnessIntegrator::new(&table)
            .assemble_element(1, &elements[0].geometry)
            .unwrap();
        assert!(dense[(2, 2)] > k1[(2, 2)]);
    }

    #[test]
    fn test_assemble_aborts_on_first_error() {
        let table = MaterialTensorTable::with_regions(2);
        let mut dense = DMatrix::zeros(12, 12);
        let result = ElasticityStiffnessIntegrator::new(&table).assemble(&strip(), &mut dense);
        assert!(result.is_err());
        assert_eq!(dense.amax(), 0.0);
    }

    #[test]
    fn test_serial_error_is_lowest_failing_element() {
        let mut table = MaterialTensorTable::with_regions(4);
        table.insert(1, build_elasticity_tensor(1.0, 0.3).unwrap()).unwrap();
        let g = geometry(ElementKind::Tet4, &unit_tet());
        let elements: Vec<MeshElement> = [1, 3, 1, 4]
            .iter()
            .map(|&region| MeshElement::new(region, (0..12).collect(), g.clone()).unwrap())
            .collect();

        let serial = AssemblyOptions {
            parallel: false,
            ..AssemblyOptions::default()
        };
        let result = ElasticityStiffnessIntegrator::with_options(&table, serial).element_matrices(&elements);
        assert!(matches!(result, Err(Error::MissingRegionMapping { region: 3 })));

        let result = ElasticityStiffnessIntegrator::new(&table).element_matrices(&elements);
        assert!(matches!(
            result,
            Err(Error::MissingRegionMapping { region: 3 | 4 })
        ));
    }

    #[test]
    fn test_options_from_json() {
        let opts: AssemblyOptions = serde_json::from_str(r#"{"parallel": false}"#).unwrap();
        assert!(!opts.parallel);
        assert_eq!(opts.symmetry_tolerance, 1e-10);
    }
}
