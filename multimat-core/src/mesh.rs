//! Mesh data structure.
//!
//! Stores nodal coordinates, element connectivity with region attributes and
//! boundary faces with boundary attributes. Attributes are 1-based, matching
//! the region ids of [`crate::table::MaterialTensorTable`].

use crate::element::{create_shape, ElementKind, Sampling};
use crate::error::{Error, Result};
use crate::geometry::MeshElement;
use crate::sparse::LoadVector;
use crate::types::{Point3, RegionId};
use rayon::prelude::*;

/// Element connectivity with its region attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementConnectivity {
    /// Element kind.
    pub kind: ElementKind,
    /// Node indices (0-based).
    pub nodes: Vec<usize>,
    /// Region attribute (1-based).
    pub region: RegionId,
}

/// A tagged boundary face: an edge in 2D, a triangle or quadrilateral in 3D.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFace {
    pub nodes: Vec<usize>,
    pub attribute: u32,
}

/// Finite element mesh.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    nodes: Vec<Point3>,
    elements: Vec<ElementConnectivity>,
    boundary: Vec<BoundaryFace>,
}

impl Mesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(n_nodes: usize, n_elements: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(n_nodes),
            elements: Vec::with_capacity(n_elements),
            boundary: Vec::new(),
        }
    }

    /// Add a node to the mesh, returning its index.
    pub fn add_node(&mut self, point: Point3) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(point);
        idx
    }

    /// Add multiple nodes at once.
    pub fn add_nodes(&mut self, points: impl IntoIterator<Item = Point3>) {
        self.nodes.extend(points);
    }

    fn check_nodes(&self, nodes: &[usize]) -> Result<()> {
        match nodes.iter().find(|&&n| n >= self.nodes.len()) {
            Some(&n) => Err(Error::Mesh(format!(
                "Node index {} out of bounds (mesh has {} nodes)",
                n,
                self.nodes.len()
            ))),
            None => Ok(()),
        }
    }

    /// Add an element in `region`, returning its index.
    ///
    /// All elements must share one spatial dimension.
    pub fn add_element(&mut self, kind: ElementKind, nodes: Vec<usize>, region: RegionId) -> Result<usize> {
        if nodes.len() != kind.n_nodes() {
            return Err(Error::Mesh(format!(
                "Element kind {:?} requires {} nodes, got {}",
                kind,
                kind.n_nodes(),
                nodes.len()
            )));
        }
        if region == 0 {
            return Err(Error::Mesh("region attributes start at 1".into()));
        }
        if let Some(dim) = self.dim() {
            if kind.dimension() != dim {
                return Err(Error::Mesh(format!(
                    "{:?} is {}D but the mesh is {}D",
                    kind,
                    kind.dimension(),
                    dim
                )));
            }
        }
        self.check_nodes(&nodes)?;

        let idx = self.elements.len();
        self.elements.push(ElementConnectivity { kind, nodes, region });
        Ok(idx)
    }

    /// Tag a boundary face with `attribute`.
    pub fn add_boundary_face(&mut self, nodes: Vec<usize>, attribute: u32) -> Result<usize> {
        if attribute == 0 {
            return Err(Error::Mesh("boundary attributes start at 1".into()));
        }
        let expected: &[usize] = match self.dim() {
            Some(2) => &[2],
            Some(_) => &[3, 4],
            None => return Err(Error::Mesh("add elements before boundary faces".into())),
        };
        if !expected.contains(&nodes.len()) {
            return Err(Error::Mesh(format!(
                "boundary face with {} nodes in a {}D mesh",
                nodes.len(),
                self.dim().unwrap_or(0)
            )));
        }
        self.check_nodes(&nodes)?;

        let idx = self.boundary.len();
        self.boundary.push(BoundaryFace { nodes, attribute });
        Ok(idx)
    }

    /// Number of nodes in the mesh.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements in the mesh.
    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    /// Get nodal coordinates.
    pub fn nodes(&self) -> &[Point3] {
        &self.nodes
    }

    /// Get element connectivity.
    pub fn elements(&self) -> &[ElementConnectivity] {
        &self.elements
    }

    /// Tagged boundary faces in insertion order.
    pub fn boundary_faces(&self) -> &[BoundaryFace] {
        &self.boundary
    }

    /// Spatial dimension, `None` for a mesh without elements.
    pub fn dim(&self) -> Option<usize> {
        self.elements.first().map(|e| e.kind.dimension())
    }

    /// Global DOF count, `n_nodes * dim`.
    pub fn n_dofs(&self) -> usize {
        self.nodes.len() * self.dim().unwrap_or(0)
    }

    /// Largest region attribute, 0 for an empty mesh.
    pub fn max_region(&self) -> RegionId {
        self.elements.iter().map(|e| e.region).max().unwrap_or(0)
    }

    /// Largest boundary attribute, 0 without boundary faces.
    pub fn max_boundary_attribute(&self) -> u32 {
        self.boundary.iter().map(|f| f.attribute).max().unwrap_or(0)
    }

    /// Element count per region; entry `r - 1` counts region `r`.
    pub fn region_histogram(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.max_region() as usize];
        for e in &self.elements {
            counts[e.region as usize - 1] += 1;
        }
        log::debug!("elements per region: {:?}", counts);
        counts
    }

    /// Face count per boundary attribute; entry `a - 1` counts attribute `a`.
    pub fn boundary_histogram(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.max_boundary_attribute() as usize];
        for f in &self.boundary {
            counts[f.attribute as usize - 1] += 1;
        }
        log::debug!("faces per boundary attribute: {:?}", counts);
        counts
    }

    /// Get coordinates for an element's nodes.
    pub fn element_coords(&self, elem_idx: usize) -> Option<Vec<Point3>> {
        let elem = self.elements.get(elem_idx)?;
        Some(elem.nodes.iter().map(|&i| self.nodes[i]).collect())
    }

    /// Compute mesh bounding box.
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        let first = *self.nodes.first()?;
        Some(self.nodes[1..].iter().fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        }))
    }

    /// Geometry and DOF maps for every element, with node-major numbering
    /// `node * dim + component`.
    pub fn mesh_elements(&self, sampling: Sampling) -> Result<Vec<MeshElement>> {
        let Some(dim) = self.dim() else {
            return Ok(Vec::new());
        };
        self.elements
            .par_iter()
            .map(|conn| {
                let coords: Vec<Point3> = conn.nodes.iter().map(|&i| self.nodes[i]).collect();
                let geometry = create_shape(conn.kind).geometry(&coords, sampling)?;
                let dofs = conn
                    .nodes
                    .iter()
                    .flat_map(|&n| (0..dim).map(move |c| n * dim + c))
                    .collect();
                MeshElement::new(conn.region, dofs, geometry)
            })
            .collect()
    }

    /// Sorted, deduplicated nodes on faces tagged `attribute`.
    pub fn boundary_nodes(&self, attribute: u32) -> Vec<usize> {
        let mut nodes: Vec<usize> = self
            .boundary
            .iter()
            .filter(|f| f.attribute == attribute)
            .flat_map(|f| f.nodes.iter().copied())
            .collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes
    }

    /// All DOFs of the nodes on faces tagged `attribute`.
    pub fn boundary_dofs(&self, attribute: u32) -> Vec<usize> {
        let dim = self.dim().unwrap_or(0);
        self.boundary_nodes(attribute)
            .into_iter()
            .flat_map(|n| (0..dim).map(move |c| n * dim + c))
            .collect()
    }

    fn face_measure(&self, face: &BoundaryFace) -> f64 {
        let p = |i: usize| self.nodes[face.nodes[i]];
        match face.nodes.len() {
            2 => (p(1) - p(0)).norm(),
            3 => 0.5 * (p(1) - p(0)).cross(&(p(2) - p(0))).norm(),
            // planar quadrilateral: half the diagonal cross product
            _ => 0.5 * (p(2) - p(0)).cross(&(p(3) - p(1))).norm(),
        }
    }

    /// Constant traction (force per unit length or area) on faces tagged
    /// `attribute`, lumped equally to each face's nodes.
    pub fn boundary_load(&self, attribute: u32, traction: &[f64]) -> Result<LoadVector> {
        let dim = self.dim().unwrap_or(0);
        if traction.len() != dim {
            return Err(Error::Mesh(format!(
                "traction has {} components for a {}D mesh",
                traction.len(),
                dim
            )));
        }

        let mut load = LoadVector::zeros(self.n_dofs());
        for face in self.boundary.iter().filter(|f| f.attribute == attribute) {
            let share = self.face_measure(face) / face.nodes.len() as f64;
            for &n in &face.nodes {
                for (c, t) in traction.iter().enumerate() {
                    load.add(n * dim + c, t * share)?;
                }
            }
        }
        Ok(load)
    }
}
