//! Validated square matrix of directed edge weights.
//!
//! `matrix[i][j]` is the cost of travelling from node `i` to node `j` in any
//! consistent unit (the HTTP provider reports kilometres). The matrix need not
//! be symmetric. Every entry is checked once on construction so the solver can
//! read it without further validation.

use thiserror::Error;

/// Errors returned when constructing a [`DistanceMatrix`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// No rows were supplied.
    #[error("distance matrix must contain at least the origin")]
    Empty,
    /// A row length differs from the number of rows.
    #[error("row {row} has {found} entries, expected {expected}")]
    NotSquare {
        /// Offending row index.
        row: usize,
        /// Required row length.
        expected: usize,
        /// Actual row length.
        found: usize,
    },
    /// An off-diagonal weight is negative, NaN or infinite.
    #[error("weight from {from} to {to} must be finite and non-negative, got {weight}")]
    InvalidWeight {
        /// Source node index.
        from: usize,
        /// Target node index.
        to: usize,
        /// The rejected value.
        weight: f64,
    },
    /// A diagonal entry is not zero.
    #[error("diagonal entry {index} must be zero, got {weight}")]
    NonZeroDiagonal {
        /// Node index of the diagonal cell.
        index: usize,
        /// The rejected value.
        weight: f64,
    },
}

/// An `n x n` table of non-negative, finite edge weights with a zero diagonal.
///
/// # Examples
/// ```
/// use wayfarer_core::DistanceMatrix;
///
/// # fn main() -> Result<(), wayfarer_core::MatrixError> {
/// let matrix = DistanceMatrix::new(vec![
///     vec![0.0, 10.0],
///     vec![12.5, 0.0],
/// ])?;
/// assert_eq!(matrix.size(), 2);
/// assert_eq!(matrix.get(1, 0), Some(12.5));
/// assert!(!matrix.is_symmetric());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")
)]
pub struct DistanceMatrix {
    size: usize,
    weights: Vec<f64>,
}

impl DistanceMatrix {
    /// Validate and construct a matrix from rows.
    ///
    /// # Errors
    ///
    /// Returns a [`MatrixError`] describing the first invalid row or cell.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let size = rows.len();
        if size == 0 {
            return Err(MatrixError::Empty);
        }
        let mut weights = Vec::with_capacity(size * size);
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(MatrixError::NotSquare {
                    row: row_index,
                    expected: size,
                    found: row.len(),
                });
            }
            for (column, weight) in row.into_iter().enumerate() {
                check_cell(row_index, column, weight)?;
                weights.push(weight);
            }
        }
        Ok(Self { size, weights })
    }

    /// Build a matrix of `size` nodes by evaluating `weight(from, to)`.
    ///
    /// The closure is called for every cell, diagonal included.
    ///
    /// # Errors
    ///
    /// Returns a [`MatrixError`] for an empty size or an invalid weight.
    pub fn from_fn<F>(size: usize, mut weight: F) -> Result<Self, MatrixError>
    where
        F: FnMut(usize, usize) -> f64,
    {
        Self::new(
            (0..size)
                .map(|from| (0..size).map(|to| weight(from, to)).collect())
                .collect(),
        )
    }

    /// Number of nodes covered by the matrix.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Weight of the edge `from -> to`, if both indices are in range.
    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> Option<f64> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.weights.get(from * self.size + to).copied()
    }

    /// Weight of the edge `from -> to`.
    ///
    /// Out-of-range indices yield `f64::INFINITY`, which any search treats as
    /// an unusable edge.
    #[must_use]
    pub fn weight(&self, from: usize, to: usize) -> f64 {
        self.get(from, to).unwrap_or(f64::INFINITY)
    }

    /// Row `from` as a slice.
    #[must_use]
    pub fn row(&self, from: usize) -> Option<&[f64]> {
        let start = from.checked_mul(self.size)?;
        self.weights.get(start..start + self.size)
    }

    /// Whether `matrix[i][j] == matrix[j][i]` for every pair.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| (i + 1..self.size).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Sum of the edges along `path`, accumulated from left to right.
    ///
    /// Returns `None` when an index is out of range. A path with fewer than
    /// two nodes has length zero.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "path lengths are sums of floating-point edge weights"
    )]
    pub fn path_length(&self, path: &[usize]) -> Option<f64> {
        path.iter()
            .zip(path.iter().skip(1))
            .try_fold(0.0, |total, (&from, &to)| Some(total + self.get(from, to)?))
    }

    /// Copy the matrix back into nested rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.weights
            .chunks(self.size)
            .map(<[f64]>::to_vec)
            .collect()
    }
}

fn check_cell(from: usize, to: usize, weight: f64) -> Result<(), MatrixError> {
    if from == to {
        #[expect(
            clippy::float_cmp,
            reason = "the diagonal must be exactly zero, not approximately"
        )]
        let is_zero = weight == 0.0;
        if !is_zero {
            return Err(MatrixError::NonZeroDiagonal {
                index: from,
                weight,
            });
        }
        return Ok(());
    }
    if !weight.is_finite() || weight < 0.0 {
        return Err(MatrixError::InvalidWeight { from, to, weight });
    }
    Ok(())
}

impl TryFrom<Vec<Vec<f64>>> for DistanceMatrix {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<DistanceMatrix> for Vec<Vec<f64>> {
    fn from(matrix: DistanceMatrix) -> Self {
        matrix.to_rows()
    }
}
