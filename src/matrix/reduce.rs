use crate::config::Config;
use crate::decomposer::palu;
use crate::error::{LinalgError, Result};
use crate::matrix::matrix::Matrix;
use crate::matrix::matrix_dense::{MatrixDense, Real};
use crate::utils::{chop, nearly_equal, nearly_zero, swap_row_prefix};

impl<T: Real> MatrixDense<T> {
    fn leading_col(&self, row: usize, tol: T) -> Option<usize> {
        (0..self.cols).position(|c| !nearly_zero(self.at(row, c), tol))
    }

    // (row, col) of every leading entry, top to bottom
    fn leading_entries(&self, tol: T) -> Vec<(usize, usize)> {
        (0..self.rows)
            .filter_map(|r| self.leading_col(r, tol).map(|c| (r, c)))
            .collect()
    }

    // row[target] += factor * row[source]
    fn add_row_multiple(&mut self, target: usize, source: usize, factor: T) {
        for k in 0..self.cols {
            let value = self.cells[source * self.cols + k];
            let cell = &mut self.cells[target * self.cols + k];
            *cell = *cell + factor * value;
        }
    }

    fn diagonal_pivot(&self, i: usize) -> Result<T> {
        let pivot = self.at(i, i);
        if pivot == T::zero() {
            return Err(LinalgError::ZeroDivision);
        }
        Ok(pivot)
    }
}

impl<T: Real> Matrix<T> for MatrixDense<T> {
    fn is_rref(&self, config: &Config<T>) -> bool {
        let tol = config.tolerance();
        let mut lead = None;

        for i in 0..self.rows {
            match self.leading_col(i, tol) {
                None => {
                    for r in i + 1..self.rows {
                        if self.leading_col(r, tol).is_some() {
                            return false;
                        }
                    }
                    break;
                }
                Some(pivot_col) => {
                    if let Some(prev_lead) = lead {
                        if pivot_col <= prev_lead {
                            return false;
                        }
                    }
                    lead = Some(pivot_col);

                    if !nearly_equal(self.at(i, pivot_col), T::one(), tol) {
                        return false;
                    }

                    for r in 0..self.rows {
                        if r != i && !nearly_zero(self.at(r, pivot_col), tol) {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    fn rref(&self, config: &Config<T>) -> MatrixDense<T> {
        let tol = config.tolerance();
        let mut mat = self.clone();
        let mut row = 0;

        // forward pass: unit pivots, zeros below
        for col in 0..mat.cols {
            let pivot_row = match (row..mat.rows).find(|&r| !nearly_zero(mat.at(r, col), tol)) {
                Some(r) => r,
                None => continue,
            };

            swap_row_prefix(&mut mat.cells, self.cols, row, pivot_row, self.cols);

            let pivot_val = mat.at(row, col);
            for k in 0..mat.cols {
                mat[(row, k)] = mat[(row, k)] / pivot_val;
            }

            for r in row + 1..mat.rows {
                let factor = mat.at(r, col);
                mat.add_row_multiple(r, row, -factor);
            }

            row += 1;
        }

        // backward pass: zeros above each pivot
        for i in (0..row).rev() {
            let pivot_col = match mat.leading_col(i, tol) {
                Some(c) => c,
                None => continue,
            };
            for r in (0..i).rev() {
                let factor = mat.at(r, pivot_col);
                mat.add_row_multiple(r, i, -factor);
            }
        }

        mat.cells.iter_mut().for_each(|v| *v = chop(*v, tol));
        mat
    }

    fn rank(&self, config: &Config<T>) -> usize {
        self.rref(config).leading_entries(config.tolerance()).len()
    }

    fn pivot_columns(&self, config: &Config<T>) -> Vec<usize> {
        self.rref(config)
            .leading_entries(config.tolerance())
            .into_iter()
            .map(|(_, c)| c)
            .collect()
    }

    fn is_pivot_col(&self, col: usize, config: &Config<T>) -> Result<bool> {
        if col >= self.cols {
            return Err(LinalgError::IndexOutOfRange {
                index: col,
                bound: self.cols,
            });
        }
        Ok(self.pivot_columns(config).contains(&col))
    }

    fn is_pivot_row(&self, row: usize, config: &Config<T>) -> Result<bool> {
        if row >= self.rows {
            return Err(LinalgError::IndexOutOfRange {
                index: row,
                bound: self.rows,
            });
        }
        Ok(self
            .rref(config)
            .leading_entries(config.tolerance())
            .iter()
            .any(|&(r, _)| r == row))
    }

    fn det(&self, config: &Config<T>) -> Result<T> {
        self.ensure_square()?;
        let plu = palu(self, config)?;
        Ok(plu.u.principal_prod()? * plu.sign())
    }

    fn is_singular(&self, config: &Config<T>) -> Result<bool> {
        Ok(nearly_zero(self.det(config)?, config.tolerance()))
    }

    fn is_invertible(&self, config: &Config<T>) -> bool {
        self.is_square() && matches!(self.is_singular(config), Ok(false))
    }

    /// Gauss-Jordan elimination against the identity, without row exchanges.
    ///
    /// An exact zero reached on the diagonal fails with `ZeroDivision`, even
    /// for an invertible matrix such as `[[0, 1], [1, 0]]`. Small but non-zero
    /// pivots are divided by as they are.
    fn inverse(&self, config: &Config<T>) -> Result<MatrixDense<T>> {
        self.ensure_square()?;
        if self.is_singular(config)? {
            return Err(LinalgError::SingularMatrix);
        }

        let n = self.rows;
        let mut mat = self.clone();
        let mut inverse = MatrixDense::identity(n)?;

        for i in 0..n {
            let current = mat.diagonal_pivot(i)?;
            for j in i + 1..n {
                let mult = -mat.at(j, i) / current;
                mat.add_row_multiple(j, i, mult);
                inverse.add_row_multiple(j, i, mult);
            }
        }

        for i in (0..n).rev() {
            let current = mat.diagonal_pivot(i)?;
            for j in (0..i).rev() {
                let mult = -mat.at(j, i) / current;
                mat.add_row_multiple(j, i, mult);
                inverse.add_row_multiple(j, i, mult);
            }
        }

        for i in 0..n {
            let current = mat.diagonal_pivot(i)?;
            for k in 0..n {
                inverse[(i, k)] = inverse[(i, k)] / current;
            }
        }

        log::debug!("inverse: inverted {n}x{n} matrix");
        Ok(inverse)
    }

    fn nullspace(&self, config: &Config<T>) -> MatrixDense<T> {
        let tol = config.tolerance();
        let mat = if self.is_rref(config) {
            self.clone()
        } else {
            self.rref(config)
        };

        let mut pivot_row_for_col = vec![None; mat.cols];
        for (r, c) in mat.leading_entries(tol) {
            pivot_row_for_col[c] = Some(r);
        }

        let free_cols: Vec<usize> = (0..mat.cols)
            .filter(|&c| pivot_row_for_col[c].is_none())
            .collect();

        let mut basis = vec![];
        for &free_col in &free_cols {
            let mut vec = vec![T::zero(); mat.cols];
            vec[free_col] = T::one();

            for (pivot_col, pivot_row) in pivot_row_for_col.iter().enumerate() {
                if let Some(r) = pivot_row {
                    vec[pivot_col] = -mat.at(*r, free_col);
                }
            }
            basis.push(vec);
        }

        log::debug!(
            "nullspace: {} free variables out of {}",
            free_cols.len(),
            mat.cols
        );
        MatrixDense::from_columns(mat.cols, &basis)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
