//! Global operator sinks.
//!
//! The core hands element matrices to an [`AssemblySink`] and never touches
//! the global operator itself. [`TripletMatrix`] accumulates COO triplets and
//! converts to CSR; a dense `DMatrix` also works as a sink for small systems.

use crate::error::{Error, Result};
use nalgebra::DMatrix;
use nalgebra_sparse::csr::CsrMatrix as NalgebraCsr;

/// Compressed Sparse Row matrix.
pub type CsrMatrix = NalgebraCsr<f64>;

/// Accepts local element matrices at DOF-mapped positions.
pub trait AssemblySink {
    /// Accumulate `local[(i, j)]` into global entry `(dofs[i], dofs[j])`.
    fn add_element_matrix(&mut self, dofs: &[usize], local: &DMatrix<f64>) -> Result<()>;
}

fn check_block(dofs: &[usize], local: &DMatrix<f64>, n: usize) -> Result<()> {
    if local.nrows() != dofs.len() || local.ncols() != dofs.len() {
        return Err(Error::Assembly(format!(
            "local matrix is {}x{} for {} dofs",
            local.nrows(),
            local.ncols(),
            dofs.len()
        )));
    }
    match dofs.iter().find(|&&d| d >= n) {
        Some(&dof) => Err(Error::DofOutOfRange { dof, len: n }),
        None => Ok(()),
    }
}

impl AssemblySink for DMatrix<f64> {
    fn add_element_matrix(&mut self, dofs: &[usize], local: &DMatrix<f64>) -> Result<()> {
        check_block(dofs, local, self.nrows().min(self.ncols()))?;
        for (i, &gi) in dofs.iter().enumerate() {
            for (j, &gj) in dofs.iter().enumerate() {
                self[(gi, gj)] += local[(i, j)];
            }
        }
        Ok(())
    }
}

/// Builder for assembling a sparse matrix from triplets (COO format).
///
/// Accumulates (row, col, value) triplets and converts to CSR when complete.
#[derive(Debug, Clone)]
pub struct TripletMatrix {
    n_rows: usize,
    n_cols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
}

impl TripletMatrix {
    /// Create a new triplet matrix builder.
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self::with_capacity(n_rows, n_cols, 0)
    }

    /// Create with estimated capacity.
    pub fn with_capacity(n_rows: usize, n_cols: usize, nnz_estimate: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            rows: Vec::with_capacity(nnz_estimate),
            cols: Vec::with_capacity(nnz_estimate),
            values: Vec::with_capacity(nnz_estimate),
        }
    }

    /// Add a value at (row, col). Duplicates are summed during conversion.
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.n_rows, "Row index out of bounds");
        debug_assert!(col < self.n_cols, "Column index out of bounds");

        if value != 0.0 {
            self.rows.push(row);
            self.cols.push(col);
            self.values.push(value);
        }
    }

    /// Number of stored triplets.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Convert to CSR format, summing duplicate entries.
    pub fn to_csr(self) -> Result<CsrMatrix> {
        use nalgebra_sparse::coo::CooMatrix;

        let coo = CooMatrix::try_from_triplets(
            self.n_rows,
            self.n_cols,
            self.rows,
            self.cols,
            self.values,
        )
        .map_err(|e| Error::Assembly(format!("invalid triplet data: {}", e)))?;

        Ok(CsrMatrix::from(&coo))
    }
}

impl AssemblySink for TripletMatrix {
    fn add_element_matrix(&mut self, dofs: &[usize], local: &DMatrix<f64>) -> Result<()> {
        check_block(dofs, local, self.n_rows.min(self.n_cols))?;
        for (i, &gi) in dofs.iter().enumerate() {
            for (j, &gj) in dofs.iter().enumerate() {
                self.add(gi, gj, local[(i, j)]);
            }
        }
        Ok(())
    }
}

/// Dense vector accumulated by DOF, for right-hand sides.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadVector {
    values: Vec<f64>,
}

impl LoadVector {
    /// Create a zero vector of given size.
    pub fn zeros(size: usize) -> Self {
        Self {
            values: vec![0.0; size],
        }
    }

    /// Add a value at the given index.
    pub fn add(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(Error::DofOutOfRange { dof: index, len })?;
        *slot += value;
        Ok(())
    }

    /// Get the underlying dense vector.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Consume and return the dense vector.
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}
