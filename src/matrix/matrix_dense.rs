use approx::AbsDiffEq;
use itertools::{iproduct, Itertools};
use num_traits::{Float, FromPrimitive};

use crate::config::default_tolerance;
use crate::error::{LinalgError, Result};
use crate::matrix::vector::Vector;
use crate::utils::{nearly_equal, nearly_zero, swap_row_prefix};
use std::fmt;
use std::iter::Sum;
use std::ops;

pub trait Real:  // Avoid repeating all the traits
    Float
    + FromPrimitive
    + Sum<Self>
    + AbsDiffEq<Epsilon = Self>
    + fmt::Debug
    + fmt::Display
{
}

impl<T> Real for T where
    T: Float + FromPrimitive + Sum<T> + AbsDiffEq<Epsilon = T> + fmt::Debug + fmt::Display
{
}

/// Dense row-major matrix.
///
/// Both dimensions are non-zero, except for the basis returned by a trivial
/// nullspace which has zero columns.
#[derive(Debug, Clone)]
pub struct MatrixDense<T = f64> {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) cells: Vec<T>,
    // next cell written by `append`
    cursor: usize,
}

impl<T: Real> MatrixDense<T> {
    /// Zero-filled `rows x cols` matrix.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(LinalgError::InvalidSize { rows, cols });
        }
        Ok(MatrixDense {
            rows,
            cols,
            cells: vec![T::zero(); rows * cols],
            cursor: 0,
        })
    }

    pub fn from_vec(rows: usize, cols: usize, cells: Vec<T>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(LinalgError::InvalidSize { rows, cols });
        }
        if cells.len() != rows * cols {
            return Err(LinalgError::SizeMismatch {
                expected: rows * cols,
                got: cells.len(),
            });
        }
        Ok(MatrixDense {
            rows,
            cols,
            cells,
            cursor: 0,
        })
    }

    pub fn from_list(lines: Vec<Vec<T>>) -> Result<Self> {
        let rows = lines.len();
        let cols = lines.first().map(|l| l.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(LinalgError::InvalidSize { rows, cols });
        }
        if let Some(line) = lines.iter().find(|l| l.len() != cols) {
            return Err(LinalgError::SizeMismatch {
                expected: cols,
                got: line.len(),
            });
        }

        Ok(MatrixDense {
            rows,
            cols,
            cells: lines.into_iter().flatten().collect(),
            cursor: 0,
        })
    }

    pub fn to_list(&self) -> Vec<Vec<T>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.cells
            .chunks(self.cols)
            .map(|line| line.to_vec())
            .collect()
    }

    pub fn identity(n: usize) -> Result<Self> {
        let mut identity = Self::new(n, n)?;
        for i in 0..n {
            identity.cells[i * n + i] = T::one();
        }
        Ok(identity)
    }

    /// Single-column matrix holding `vector`.
    pub fn from_column(vector: &Vector<T>) -> Self {
        MatrixDense {
            rows: vector.len(),
            cols: 1,
            cells: vector.as_slice().to_vec(),
            cursor: 0,
        }
    }

    pub(crate) fn with_zero_columns(rows: usize) -> Self {
        MatrixDense {
            rows,
            cols: 0,
            cells: Vec::new(),
            cursor: 0,
        }
    }

    pub(crate) fn from_columns(rows: usize, columns: &[Vec<T>]) -> Self {
        if columns.is_empty() {
            return Self::with_zero_columns(rows);
        }
        let cols = columns.len();
        MatrixDense {
            rows,
            cols,
            cells: iproduct!(0..rows, 0..cols)
                .map(|(i, j)| columns[j][i])
                .collect(),
            cursor: 0,
        }
    }

    /// Write the next cell in row-major order.
    ///
    /// ```
    /// # use astra_linalg::matrix::matrix_dense::MatrixDense;
    /// let mut m = MatrixDense::<f64>::new(2, 2).unwrap();
    /// m.append(1.0).unwrap().append(2.0).unwrap().append(3.0).unwrap().append(4.0).unwrap();
    /// assert_eq!(m.to_list(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    /// assert!(m.append(5.0).is_err());
    /// ```
    pub fn append(&mut self, value: T) -> Result<&mut Self> {
        if self.cursor >= self.cells.len() {
            return Err(LinalgError::InitOutOfRange {
                capacity: self.cells.len(),
            });
        }
        self.cells[self.cursor] = value;
        self.cursor += 1;
        Ok(self)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    #[inline(always)]
    pub fn at(&self, row: usize, col: usize) -> T {
        self.cells[row * self.cols + col]
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.rows {
            return Err(LinalgError::IndexOutOfRange {
                index: row,
                bound: self.rows,
            });
        }
        Ok(())
    }

    fn check_col(&self, col: usize) -> Result<()> {
        if col >= self.cols {
            return Err(LinalgError::IndexOutOfRange {
                index: col,
                bound: self.cols,
            });
        }
        Ok(())
    }

    pub(crate) fn ensure_square(&self) -> Result<()> {
        if !self.is_square() {
            return Err(LinalgError::NonSquareMatrix {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.check_row(row)?;
        self.check_col(col)?;
        Ok(self.at(row, col))
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.check_row(row)?;
        self.check_col(col)?;
        self.cells[row * self.cols + col] = value;
        Ok(())
    }

    pub fn row(&self, row: usize) -> Result<Vector<T>> {
        self.check_row(row)?;
        Vector::from_vec(self.cells[row * self.cols..(row + 1) * self.cols].to_vec())
    }

    pub fn col(&self, col: usize) -> Result<Vector<T>> {
        self.check_col(col)?;
        Vector::from_vec((0..self.rows).map(|r| self.at(r, col)).collect())
    }

    pub fn sum(&self) -> T {
        self.cells.iter().copied().sum()
    }

    pub fn prod(&self) -> T {
        self.cells.iter().fold(T::one(), |acc, &v| acc * v)
    }

    pub fn avg(&self) -> T {
        self.sum() / T::from_usize(self.cells.len()).unwrap_or_else(T::one)
    }

    pub fn min(&self) -> T {
        self.cells.iter().copied().fold(T::infinity(), T::min)
    }

    pub fn max(&self) -> T {
        self.cells.iter().copied().fold(T::neg_infinity(), T::max)
    }

    pub fn trace(&self) -> Result<T> {
        self.ensure_square()?;
        Ok((0..self.rows).map(|i| self.at(i, i)).sum())
    }

    /// Product of the main diagonal.
    pub fn principal_prod(&self) -> Result<T> {
        self.ensure_square()?;
        Ok((0..self.rows).fold(T::one(), |acc, i| acc * self.at(i, i)))
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn is_identity(&self, tol: T) -> bool {
        self.is_square()
            && iproduct!(0..self.rows, 0..self.cols).all(|(i, j)| {
                let expected = if i == j { T::one() } else { T::zero() };
                nearly_equal(self.at(i, j), expected, tol)
            })
    }

    pub fn is_symmetric(&self, tol: T) -> bool {
        self.is_square()
            && iproduct!(0..self.rows, 0..self.cols)
                .all(|(i, j)| nearly_equal(self.at(i, j), self.at(j, i), tol))
    }

    pub fn is_diagonal(&self, tol: T) -> bool {
        self.is_square()
            && iproduct!(0..self.rows, 0..self.cols)
                .all(|(i, j)| i == j || nearly_zero(self.at(i, j), tol))
    }

    pub fn is_upper_triangular(&self, tol: T) -> bool {
        self.is_square()
            && iproduct!(0..self.rows, 0..self.cols)
                .all(|(i, j)| j >= i || nearly_zero(self.at(i, j), tol))
    }

    pub fn is_lower_triangular(&self, tol: T) -> bool {
        self.is_square()
            && iproduct!(0..self.rows, 0..self.cols)
                .all(|(i, j)| j <= i || nearly_zero(self.at(i, j), tol))
    }

    pub fn is_triangular(&self, tol: T) -> bool {
        self.is_lower_triangular(tol) || self.is_upper_triangular(tol)
    }

    pub fn is_zero(&self, tol: T) -> bool {
        self.cells.iter().all(|&v| nearly_zero(v, tol))
    }

    pub fn is_zero_row(&self, row: usize, tol: T) -> Result<bool> {
        self.check_row(row)?;
        Ok((0..self.cols).all(|c| nearly_zero(self.at(row, c), tol)))
    }

    pub fn is_zero_col(&self, col: usize, tol: T) -> Result<bool> {
        self.check_col(col)?;
        Ok((0..self.rows).all(|r| nearly_zero(self.at(r, col), tol)))
    }

    pub fn row_swap(&mut self, r1: usize, r2: usize) -> Result<()> {
        self.check_row(r1)?;
        self.check_row(r2)?;
        swap_row_prefix(&mut self.cells, self.cols, r1, r2, self.cols);
        Ok(())
    }

    /// Swap rows `r1` and `r2` in columns `0..limit` only.
    pub fn partial_row_swap(&mut self, r1: usize, r2: usize, limit: usize) -> Result<()> {
        self.check_row(r1)?;
        self.check_row(r2)?;
        if limit > self.cols {
            return Err(LinalgError::IndexOutOfRange {
                index: limit,
                bound: self.cols + 1,
            });
        }
        swap_row_prefix(&mut self.cells, self.cols, r1, r2, limit);
        Ok(())
    }

    pub fn col_swap(&mut self, c1: usize, c2: usize) -> Result<()> {
        self.check_col(c1)?;
        self.check_col(c2)?;
        if c1 != c2 {
            for r in 0..self.rows {
                self.cells.swap(r * self.cols + c1, r * self.cols + c2);
            }
        }
        Ok(())
    }

    pub fn transpose(&self) -> MatrixDense<T> {
        MatrixDense {
            rows: self.cols,
            cols: self.rows,
            cells: iproduct!(0..self.cols, 0..self.rows)
                .map(|(c, r)| self.at(r, c))
                .collect(),
            cursor: 0,
        }
    }

    pub fn transpose_mut(&mut self) {
        *self = self.transpose();
    }

    pub fn clear(&mut self) {
        self.fill(T::zero());
    }

    pub fn fill(&mut self, value: T) {
        self.cells.iter_mut().for_each(|v| *v = value);
    }

    pub fn replace(&mut self, old: T, new: T) {
        self.cells
            .iter_mut()
            .filter(|v| **v == old)
            .for_each(|v| *v = new);
    }

    /// Reshape to `rows x cols`, discarding the contents.
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<()> {
        *self = Self::new(rows, cols)?;
        Ok(())
    }

    /// Append the columns of `other` to the right of `self`.
    pub fn join(&mut self, other: &MatrixDense<T>) -> Result<()> {
        if self.rows != other.rows {
            return Err(LinalgError::SizeMismatch {
                expected: self.rows,
                got: other.rows,
            });
        }

        let cols = self.cols + other.cols;
        self.cells = (0..self.rows)
            .flat_map(|r| {
                self.cells[r * self.cols..(r + 1) * self.cols]
                    .iter()
                    .chain(other.cells[r * other.cols..(r + 1) * other.cols].iter())
                    .copied()
            })
            .collect();
        self.cols = cols;
        Ok(())
    }

    /// `[self | other]` as a new matrix.
    pub fn augment(&self, other: &MatrixDense<T>) -> Result<MatrixDense<T>> {
        let mut augmented = self.clone();
        augmented.join(other)?;
        Ok(augmented)
    }

    /// Block between the corners `(r1, c1)` and `(r2, c2)`, both inclusive.
    pub fn submatrix(&self, r1: usize, c1: usize, r2: usize, c2: usize) -> Result<MatrixDense<T>> {
        self.check_row(r1)?;
        self.check_row(r2)?;
        self.check_col(c1)?;
        self.check_col(c2)?;
        if r1 > r2 || c1 > c2 {
            return Err(LinalgError::InvalidArgument {
                reason: format!("submatrix corners ({r1}, {c1}) and ({r2}, {c2}) are inverted"),
            });
        }

        MatrixDense::from_vec(
            r2 - r1 + 1,
            c2 - c1 + 1,
            iproduct!(r1..=r2, c1..=c2)
                .map(|(r, c)| self.at(r, c))
                .collect(),
        )
    }

    pub fn approx_eq(&self, other: &MatrixDense<T>, tol: T) -> bool {
        self.shape() == other.shape()
            && self
                .cells
                .iter()
                .zip(other.cells.iter())
                .all(|(&a, &b)| nearly_equal(a, b, tol))
    }

    fn ensure_same_shape(&self, rhs: &MatrixDense<T>) -> Result<()> {
        if self.rows != rhs.rows {
            return Err(LinalgError::SizeMismatch {
                expected: self.rows,
                got: rhs.rows,
            });
        }
        if self.cols != rhs.cols {
            return Err(LinalgError::SizeMismatch {
                expected: self.cols,
                got: rhs.cols,
            });
        }
        Ok(())
    }

    fn zip_with(&self, rhs: &MatrixDense<T>, f: impl Fn(T, T) -> T) -> Result<MatrixDense<T>> {
        self.ensure_same_shape(rhs)?;
        Ok(MatrixDense {
            rows: self.rows,
            cols: self.cols,
            cells: self
                .cells
                .iter()
                .zip(rhs.cells.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
            cursor: 0,
        })
    }

    fn map(&self, f: impl Fn(T) -> T) -> MatrixDense<T> {
        MatrixDense {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(|&v| f(v)).collect(),
            cursor: 0,
        }
    }
}

impl<T> ops::Index<(usize, usize)> for MatrixDense<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of range for {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.cells[row * self.cols + col]
    }
}

impl<T> ops::IndexMut<(usize, usize)> for MatrixDense<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of range for {}x{} matrix",
            self.rows,
            self.cols
        );
        &mut self.cells[row * self.cols + col]
    }
}

impl<T: Real> ops::Add<&MatrixDense<T>> for &MatrixDense<T> {
    type Output = Result<MatrixDense<T>>;

    fn add(self, rhs: &MatrixDense<T>) -> Result<MatrixDense<T>> {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<T: Real> ops::Sub<&MatrixDense<T>> for &MatrixDense<T> {
    type Output = Result<MatrixDense<T>>;

    fn sub(self, rhs: &MatrixDense<T>) -> Result<MatrixDense<T>> {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<T: Real> ops::Mul<&MatrixDense<T>> for &MatrixDense<T> {
    type Output = Result<MatrixDense<T>>;

    fn mul(self, rhs: &MatrixDense<T>) -> Result<MatrixDense<T>> {
        if self.cols != rhs.rows {
            return Err(LinalgError::SizeMismatch {
                expected: self.cols,
                got: rhs.rows,
            });
        }

        Ok(MatrixDense {
            rows: self.rows,
            cols: rhs.cols,
            cells: iproduct!(0..self.rows, 0..rhs.cols)
                .map(|(i, j)| (0..self.cols).map(|k| self.at(i, k) * rhs.at(k, j)).sum::<T>())
                .collect(),
            cursor: 0,
        })
    }
}

impl<T: Real> ops::Mul<&Vector<T>> for &MatrixDense<T> {
    type Output = Result<Vector<T>>;

    fn mul(self, rhs: &Vector<T>) -> Result<Vector<T>> {
        if self.cols != rhs.len() {
            return Err(LinalgError::SizeMismatch {
                expected: self.cols,
                got: rhs.len(),
            });
        }

        Vector::from_vec(
            (0..self.rows)
                .map(|i| (0..self.cols).map(|k| self.at(i, k) * rhs[k]).sum::<T>())
                .collect(),
        )
    }
}

impl<T: Real> ops::Mul<T> for &MatrixDense<T> {
    type Output = MatrixDense<T>;

    fn mul(self, scalar: T) -> MatrixDense<T> {
        self.map(|v| v * scalar)
    }
}

impl<T: Real> ops::Div<T> for &MatrixDense<T> {
    type Output = Result<MatrixDense<T>>;

    fn div(self, scalar: T) -> Result<MatrixDense<T>> {
        if nearly_zero(scalar, default_tolerance()) {
            return Err(LinalgError::ZeroDivision);
        }
        Ok(self.map(|v| v / scalar))
    }
}

impl<T: PartialEq> PartialEq for MatrixDense<T> {
    fn eq(&self, other: &MatrixDense<T>) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.cells == other.cells
    }
}

impl<T: Real> AbsDiffEq for MatrixDense<T> {
    type Epsilon = T;

    fn default_epsilon() -> T {
        default_tolerance()
    }

    fn abs_diff_eq(&self, other: &MatrixDense<T>, epsilon: T) -> bool {
        self.shape() == other.shape()
            && self
                .cells
                .iter()
                .zip(other.cells.iter())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<T: Real> fmt::Display for MatrixDense<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.to_list() {
            writeln!(f, "[{}]", line.iter().map(|v| format!("{v:>8}")).join(", "))?;
        }
        Ok(())
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
