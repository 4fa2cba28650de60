//! Pivoted triangular factorization `P·A = L·U`.

use crate::config::Config;
use crate::error::Result;
use crate::matrix::matrix_dense::{MatrixDense, Real};
use crate::matrix::vector::Vector;
use crate::solver::{backward_sub, forward_sub};
use crate::utils::{chop, nearly_zero, parity_sign};

/// Output of [`palu`].
///
/// `p` is a permutation matrix, `l` is unit lower triangular, `u` is upper
/// triangular and `swaps` counts the row interchanges that built `p`.
#[derive(Debug, Clone, PartialEq)]
pub struct PluResult<T = f64> {
    pub p: MatrixDense<T>,
    pub l: MatrixDense<T>,
    pub u: MatrixDense<T>,
    pub swaps: usize,
}

impl<T: Real> PluResult<T> {
    /// `(-1)^swaps`, the determinant of `p`.
    pub fn sign(&self) -> T {
        parity_sign(self.swaps)
    }

    /// `Pᵀ·L·U`, which equals the factored matrix.
    pub fn reconstruct(&self) -> Result<MatrixDense<T>> {
        let lu = (&self.l * &self.u)?;
        &self.p.transpose() * &lu
    }

    /// Solve `A·x = b` with this factorization of `A`.
    ///
    /// No solvability check is made: zero pivots in `u` follow the
    /// substitution policy of [`backward_sub`].
    pub fn solve(&self, b: &Vector<T>, config: &Config<T>) -> Result<Vector<T>> {
        let permuted = (&self.p * b)?;
        let y = forward_sub(&self.l, &permuted, config)?;
        backward_sub(&self.u, &y, config)
    }
}

/// Factor a square matrix as `P·A = L·U` with partial pivoting.
///
/// Columns whose remaining entries are all within tolerance of zero are
/// skipped, leaving a zero pivot in `U`; rank deficiency is not an error.
pub fn palu<T: Real>(a: &MatrixDense<T>, config: &Config<T>) -> Result<PluResult<T>> {
    a.ensure_square()?;

    let n = a.rows();
    let tol = config.tolerance();
    let mut p = MatrixDense::identity(n)?;
    let mut l = MatrixDense::identity(n)?;
    let mut u = a.clone();
    let mut swaps = 0;

    for x in 0..n {
        // largest magnitude wins, first occurrence on ties
        let mut pivot_row = x;
        for y in x + 1..n {
            if u[(y, x)].abs() > u[(pivot_row, x)].abs() {
                pivot_row = y;
            }
        }

        if nearly_zero(u[(pivot_row, x)], tol) {
            log::trace!("palu: column {x} is numerically zero, skipped");
            continue;
        }

        if pivot_row != x {
            u.row_swap(x, pivot_row)?;
            p.row_swap(x, pivot_row)?;
            // columns >= x of L are still zero below the diagonal
            l.partial_row_swap(x, pivot_row, x)?;
            swaps += 1;
            log::trace!("palu: swapped rows {x} and {pivot_row}");
        }

        let pivot = u[(x, x)];
        for y in x + 1..n {
            let current = u[(y, x)];
            if nearly_zero(current, tol) {
                u[(y, x)] = T::zero();
                continue;
            }

            let factor = current / pivot;
            u[(y, x)] = T::zero();
            for i in x + 1..n {
                u[(y, i)] = chop(u[(y, i)] - factor * u[(x, i)], tol);
            }
            l[(y, x)] = factor;
        }
    }

    log::debug!("palu: factored {n}x{n} matrix with {swaps} row swaps");
    Ok(PluResult { p, l, u, swaps })
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LinalgError;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn m(lines: Vec<Vec<f64>>) -> MatrixDense {
        MatrixDense::from_list(lines).unwrap()
    }

    fn is_permutation(p: &MatrixDense) -> bool {
        let ones_in = |cells: Vec<f64>| {
            cells.iter().filter(|&&v| v == 1.0).count() == 1
                && cells.iter().all(|&v| v == 0.0 || v == 1.0)
        };
        (0..p.rows()).all(|i| ones_in(p.row(i).unwrap().as_slice().to_vec()))
            && (0..p.cols()).all(|j| ones_in(p.col(j).unwrap().as_slice().to_vec()))
    }

    fn check_invariants(a: &MatrixDense, plu: &PluResult) {
        let tol = 1e-9;
        assert!(is_permutation(&plu.p));
        assert!(plu.l.is_lower_triangular(0.0));
        assert!((0..plu.l.rows()).all(|i| plu.l.at(i, i) == 1.0));
        assert!(plu.u.is_upper_triangular(0.0));

        let pa = (&plu.p * a).unwrap();
        let lu = (&plu.l * &plu.u).unwrap();
        assert_abs_diff_eq!(pa, lu, epsilon = tol);
        assert_abs_diff_eq!(plu.reconstruct().unwrap(), *a, epsilon = tol);
    }

    #[test]
    fn test_palu_identity() {
        let i = MatrixDense::<f64>::identity(4).unwrap();
        let plu = palu(&i, &Config::default()).unwrap();
        assert_eq!(plu.p, i);
        assert_eq!(plu.l, i);
        assert_eq!(plu.u, i);
        assert_eq!(plu.swaps, 0);
        assert_eq!(plu.sign(), 1.0);
    }

    #[test]
    fn test_palu_non_square() {
        let a = m(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(
            palu(&a, &Config::default()).unwrap_err(),
            LinalgError::NonSquareMatrix { rows: 2, cols: 3 }
        );
    }

    #[test]
    fn test_palu_2x2() {
        let a = m(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let plu = palu(&a, &Config::default()).unwrap();

        assert_eq!(plu.swaps, 1);
        assert_eq!(plu.p, m(vec![vec![0.0, 1.0], vec![1.0, 0.0]]));
        assert_abs_diff_eq!(
            plu.l,
            m(vec![vec![1.0, 0.0], vec![1.0 / 3.0, 1.0]]),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            plu.u,
            m(vec![vec![3.0, 4.0], vec![0.0, 2.0 / 3.0]]),
            epsilon = 1e-12
        );
        check_invariants(&a, &plu);
    }

    #[test]
    fn test_palu_singular() {
        let a = m(vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 9.0],
        ]);
        let plu = palu(&a, &Config::default()).unwrap();

        assert_eq!(plu.u.principal_prod().unwrap(), 0.0);
        assert_eq!(plu.u.at(2, 2), 0.0);
        assert_eq!(plu.swaps % 2, 0);
        check_invariants(&a, &plu);
    }

    #[test]
    fn test_palu_zero_column_skipped() {
        let a = m(vec![vec![0.0, 1.0], vec![0.0, 2.0]]);
        let plu = palu(&a, &Config::default()).unwrap();

        assert_eq!(plu.swaps, 0);
        assert_eq!(plu.u, a);
        assert_eq!(plu.l, MatrixDense::identity(2).unwrap());
    }

    #[test]
    fn test_palu_tie_breaks_on_first_row() {
        let a = m(vec![vec![2.0, 1.0], vec![-2.0, 3.0]]);
        let plu = palu(&a, &Config::default()).unwrap();
        assert_eq!(plu.swaps, 0);
        assert_eq!(plu.u, m(vec![vec![2.0, 1.0], vec![0.0, 4.0]]));
    }

    #[test]
    fn test_palu_partial_swap_keeps_multipliers() {
        let a = m(vec![
            vec![1.0, 2.0, -1.0, 5.0],
            vec![3.0, 6.0, -3.0, -2.0],
            vec![7.0, -5.0, 3.0, -1.0],
            vec![5.0, 10.0, 2.0, -7.0],
        ]);
        let plu = palu(&a, &Config::default()).unwrap();
        assert_eq!(plu.swaps, 3);
        check_invariants(&a, &plu);
    }

    #[test]
    fn test_palu_random() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 1..8 {
            let cells = (0..n * n).map(|_| rng.gen_range(-10.0..10.0)).collect();
            let a = MatrixDense::from_vec(n, n, cells).unwrap();
            let plu = palu(&a, &Config::default()).unwrap();

            assert!(is_permutation(&plu.p));
            assert!(plu.u.is_upper_triangular(0.0));
            assert_abs_diff_eq!(plu.reconstruct().unwrap(), a, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_plu_solve_multiple_rhs() {
        let config = Config::default();
        let a = m(vec![
            vec![4.0, 1.0, 0.0],
            vec![1.0, 3.0, 1.0],
            vec![0.0, 1.0, 2.0],
        ]);
        let plu = palu(&a, &config).unwrap();

        for rhs in [vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]] {
            let b = Vector::from_vec(rhs).unwrap();
            let x = plu.solve(&b, &config).unwrap();
            assert_abs_diff_eq!((&a * &x).unwrap(), b, epsilon = 1e-10);
        }
    }
}
