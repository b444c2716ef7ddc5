//! Sparse matrix support for design matrices.
//!
//! One-hot encoded categorical features produce design matrices with a single
//! non-zero per feature block per row. They are stored in compressed sparse
//! row (CSR) format, which supports the two products a first-order solver
//! needs: `A x` for the linear outputs and `Aᵀ r` for the gradient.

use crate::core::{
    error::{ModelError as Error, Result},
    types::{DMatrix, DVector, Scalar},
};
use num_traits::Float;

/// Compressed Sparse Row (CSR) format matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T: Scalar> {
    /// Number of rows
    nrows: usize,
    /// Number of columns
    ncols: usize,
    /// Row pointers (length nrows + 1)
    row_ptr: Vec<usize>,
    /// Column indices (length nnz)
    col_idx: Vec<usize>,
    /// Non-zero values (length nnz)
    values: Vec<T>,
}

impl<T: Scalar> CsrMatrix<T> {
    /// Creates a new CSR matrix from raw data.
    pub fn new(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        if row_ptr.len() != nrows + 1 {
            return Err(Error::DimensionMismatch {
                expected: format!("row_ptr length {}", nrows + 1),
                actual: format!("row_ptr length {}", row_ptr.len()),
            });
        }

        if row_ptr[0] != 0 || row_ptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::invalid_parameter(
                "row_ptr must start at 0 and be non-decreasing",
            ));
        }

        let nnz = row_ptr[nrows];
        if col_idx.len() != nnz {
            return Err(Error::DimensionMismatch {
                expected: format!("col_idx length {}", nnz),
                actual: format!("col_idx length {}", col_idx.len()),
            });
        }

        if values.len() != nnz {
            return Err(Error::DimensionMismatch {
                expected: format!("values length {}", nnz),
                actual: format!("values length {}", values.len()),
            });
        }

        if let Some(&j) = col_idx.iter().find(|&&j| j >= ncols) {
            return Err(Error::DimensionMismatch {
                expected: format!("column index < {}", ncols),
                actual: format!("column index {}", j),
            });
        }

        Ok(Self {
            nrows,
            ncols,
            row_ptr,
            col_idx,
            values,
        })
    }

    /// Builds a CSR matrix from `(row, col, value)` triplets.
    ///
    /// Entries may come in any order; duplicates are summed.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        rows: &[usize],
        cols: &[usize],
        values: &[T],
    ) -> Result<Self> {
        if rows.len() != cols.len() || rows.len() != values.len() {
            return Err(Error::DimensionMismatch {
                expected: format!("{} triplets", rows.len()),
                actual: format!("{} columns and {} values", cols.len(), values.len()),
            });
        }

        let mut triplets = Vec::with_capacity(rows.len());
        for ((&r, &c), &v) in rows.iter().zip(cols).zip(values) {
            if r >= nrows {
                return Err(Error::DimensionMismatch {
                    expected: format!("row < {}", nrows),
                    actual: format!("row = {}", r),
                });
            }
            if c >= ncols {
                return Err(Error::DimensionMismatch {
                    expected: format!("col < {}", ncols),
                    actual: format!("col = {}", c),
                });
            }
            triplets.push((r, c, v));
        }
        triplets.sort_by_key(|&(r, c, _)| (r, c));

        let mut row_ptr = vec![0; nrows + 1];
        let mut col_idx: Vec<usize> = Vec::with_capacity(triplets.len());
        let mut data: Vec<T> = Vec::with_capacity(triplets.len());
        let mut last: Option<(usize, usize)> = None;

        for (r, c, v) in triplets {
            if last == Some((r, c)) {
                if let Some(value) = data.last_mut() {
                    *value += v;
                }
                continue;
            }
            col_idx.push(c);
            data.push(v);
            row_ptr[r + 1] += 1;
            last = Some((r, c));
        }

        for i in 0..nrows {
            row_ptr[i + 1] += row_ptr[i];
        }

        Ok(Self {
            nrows,
            ncols,
            row_ptr,
            col_idx,
            values: data,
        })
    }

    /// Creates a CSR matrix from a dense matrix.
    pub fn from_dense(dense: &DMatrix<T>, tolerance: T) -> Self {
        let mut row_ptr = vec![0];
        let mut col_idx = Vec::new();
        let mut values = Vec::new();

        for i in 0..dense.nrows() {
            for j in 0..dense.ncols() {
                let val = dense[(i, j)];
                if Float::abs(val) > tolerance {
                    col_idx.push(j);
                    values.push(val);
                }
            }
            row_ptr.push(col_idx.len());
        }

        Self {
            nrows: dense.nrows(),
            ncols: dense.ncols(),
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Converts to a dense matrix.
    pub fn to_dense(&self) -> DMatrix<T> {
        let mut dense = DMatrix::zeros(self.nrows, self.ncols);

        for i in 0..self.nrows {
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                dense[(i, self.col_idx[k])] = self.values[k];
            }
        }

        dense
    }

    /// Returns the number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Returns the number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Returns the number of stored elements.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Row pointer array (length `nrows + 1`).
    #[inline]
    pub fn row_offsets(&self) -> &[usize] {
        &self.row_ptr
    }

    /// Column index of every stored element.
    #[inline]
    pub fn col_indices(&self) -> &[usize] {
        &self.col_idx
    }

    /// Stored values.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Column indices and values of row `i`.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = self.row_ptr[i]..self.row_ptr[i + 1];
        self.col_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Returns the sparsity (fraction of zero elements).
    #[inline]
    pub fn sparsity(&self) -> f64 {
        let total_elements = self.nrows * self.ncols;
        if total_elements == 0 {
            0.0
        } else {
            1.0 - (self.nnz() as f64 / total_elements as f64)
        }
    }

    /// Sparse matrix-vector multiplication: y = A * x
    pub fn spmv(&self, x: &DVector<T>, y: &mut DVector<T>) -> Result<()> {
        if x.len() != self.ncols {
            return Err(Error::DimensionMismatch {
                expected: format!("vector length {}", self.ncols),
                actual: format!("vector length {}", x.len()),
            });
        }

        if y.len() != self.nrows {
            return Err(Error::DimensionMismatch {
                expected: format!("result length {}", self.nrows),
                actual: format!("result length {}", y.len()),
            });
        }

        for i in 0..self.nrows {
            let mut sum = T::zero();
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                sum += self.values[k] * x[self.col_idx[k]];
            }
            y[i] = sum;
        }

        Ok(())
    }

    /// Transposed sparse matrix-vector multiplication: y = Aᵀ * x
    ///
    /// Scatters each row into `y` instead of materialising the transpose.
    pub fn spmv_transpose(&self, x: &DVector<T>, y: &mut DVector<T>) -> Result<()> {
        if x.len() != self.nrows {
            return Err(Error::DimensionMismatch {
                expected: format!("vector length {}", self.nrows),
                actual: format!("vector length {}", x.len()),
            });
        }

        if y.len() != self.ncols {
            return Err(Error::DimensionMismatch {
                expected: format!("result length {}", self.ncols),
                actual: format!("result length {}", y.len()),
            });
        }

        y.fill(T::zero());
        for i in 0..self.nrows {
            let xi = x[i];
            if xi == T::zero() {
                continue;
            }
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                y[self.col_idx[k]] += self.values[k] * xi;
            }
        }

        Ok(())
    }
}
