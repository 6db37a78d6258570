//! Dense row-major matrices for the moment operators

// crate modules
use crate::error::{Error, Result};

// sntools modules
use sntools_utils::{f, ValueExt};

// external crates
use itertools::Itertools;
use nalgebra::DMatrix;

// standard library
use std::io::Write;
use std::ops::Index;

/// A dense matrix of `f64` values stored row by row
///
/// Operators are small and built once, so this is a plain owned buffer with
/// just enough arithmetic to apply them. Conversions to and from
/// [nalgebra::DMatrix] are provided for anything heavier.
///
/// ```rust
/// # use sntools_moments::DenseMatrix;
/// let matrix = DenseMatrix::from_row_major(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// assert_eq!(matrix[(1, 0)], 4.0);
/// assert_eq!(matrix.row(0), &[1.0, 2.0, 3.0]);
/// assert_eq!(matrix.mul_vec(&[1.0, 0.0, 1.0]).unwrap(), vec![4.0, 10.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// Matrix of zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Identity matrix of size `n`
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    /// Wrap a row-major buffer, which must hold exactly `rows * cols` values
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::ShapeMismatch {
                name: "matrix data",
                expected: rows * cols,
                found: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Fill each entry from its `(row, column)` position
    pub fn from_fn<F: FnMut(usize, usize) -> f64>(rows: usize, cols: usize, mut f: F) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    /// Fill each entry from its position, stopping at the first error
    pub(crate) fn try_from_fn<F>(rows: usize, cols: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> Result<f64>,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j)?);
            }
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Underlying row-major buffer
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Checked entry access
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Row `i` as a slice, panics if out of range
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |i, j| self[(j, i)])
    }

    /// Matrix-vector product, the vector length must match the columns
    pub fn mul_vec(&self, v: &[f64]) -> Result<Vec<f64>> {
        if v.len() != self.cols {
            return Err(Error::ShapeMismatch {
                name: "vector",
                expected: self.cols,
                found: v.len(),
            });
        }

        Ok((0..self.rows)
            .map(|i| self.row(i).iter().zip(v).map(|(a, b)| a * b).sum())
            .collect())
    }

    /// Matrix product `self * other`
    pub fn mul(&self, other: &DenseMatrix) -> Result<DenseMatrix> {
        if other.rows != self.cols {
            return Err(Error::ShapeMismatch {
                name: "matrix rows",
                expected: self.cols,
                found: other.rows,
            });
        }

        Ok(Self::from_fn(self.rows, other.cols, |i, j| {
            (0..self.cols).map(|k| self[(i, k)] * other[(k, j)]).sum()
        }))
    }

    /// True when every entry of the leading diagonal is non-zero
    ///
    /// ```rust
    /// # use sntools_moments::DenseMatrix;
    /// assert!(DenseMatrix::identity(3).diagonal_not_zero());
    /// assert!(!DenseMatrix::zeros(2, 2).diagonal_not_zero());
    /// ```
    pub fn diagonal_not_zero(&self) -> bool {
        (0..self.rows.min(self.cols)).all(|i| self[(i, i)] != 0.0)
    }

    /// Square and within an absolute `tolerance` of the identity
    pub fn is_identity(&self, tolerance: f64) -> bool {
        if self.rows != self.cols {
            return false;
        }
        (0..self.rows)
            .cartesian_product(0..self.cols)
            .all(|(i, j)| {
                let expected = if i == j { 1.0 } else { 0.0 };
                (self[(i, j)] - expected).abs() <= tolerance
            })
    }

    /// Write the matrix under a heading, one row per line
    ///
    /// ```rust
    /// # use sntools_moments::DenseMatrix;
    /// let mut out = Vec::new();
    /// DenseMatrix::identity(2).print("I", &mut out).unwrap();
    /// let text = String::from_utf8(out).unwrap();
    /// assert!(text.starts_with("I (2 x 2)"));
    /// assert!(text.contains("1.00000e+00  0.00000e+00"));
    /// ```
    pub fn print(&self, name: &str, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{name} ({} x {})", self.rows, self.cols)?;
        for i in 0..self.rows {
            writeln!(out, "{:>5}  {}", i, self.format_row(i))?;
        }
        Ok(())
    }

    fn format_row(&self, i: usize) -> String {
        self.row(i)
            .iter()
            .map(|value| f!("{:>12}", value.sci(5, 2)))
            .join(" ")
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[row * self.cols + col]
    }
}

impl std::fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for i in 0..self.rows {
            writeln!(f, "{}", self.format_row(i))?;
        }
        Ok(())
    }
}

impl From<&DenseMatrix> for DMatrix<f64> {
    fn from(matrix: &DenseMatrix) -> Self {
        DMatrix::from_row_slice(matrix.rows, matrix.cols, &matrix.data)
    }
}

impl From<DMatrix<f64>> for DenseMatrix {
    fn from(matrix: DMatrix<f64>) -> Self {
        let (rows, cols) = matrix.shape();
        Self::from_fn(rows, cols, |i, j| matrix[(i, j)])
    }
}
