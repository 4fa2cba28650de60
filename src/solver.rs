//! Triangular substitution and full linear system solving.
//!
//! `A·x = b` is classified by comparing `rank(A)` with `rank([A | b])`
//! before any factorization takes place:
//!
//! - unique solution: `rank(A) == rank([A|b]) == n`
//! - infinitely many: `rank(A) == rank([A|b]) < n`
//! - none:            `rank(A) < rank([A|b])`

use crate::config::Config;
use crate::decomposer::palu;
use crate::error::{LinalgError, Result};
use crate::matrix::matrix::Matrix;
use crate::matrix::matrix_dense::{MatrixDense, Real};
use crate::matrix::vector::Vector;

/// Outcome of the rank test on `A·x = b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solvability {
    Unique,
    Infinite { rank: usize, variables: usize },
    Inconsistent { rank: usize, augmented_rank: usize },
}

/// Solve `L·x = b` top-down.
///
/// A zero on the diagonal sets the matching unknown to `0` instead of
/// failing, so a degenerate system yields *a* vector, not necessarily a
/// solution. Use [`solve`] when solvability matters.
pub fn forward_sub<T: Real>(
    l: &MatrixDense<T>,
    b: &Vector<T>,
    config: &Config<T>,
) -> Result<Vector<T>> {
    let m = b.len();
    if l.cols() != m {
        return Err(LinalgError::SizeMismatch {
            expected: l.cols(),
            got: m,
        });
    }
    if !l.is_lower_triangular(config.tolerance()) {
        return Err(LinalgError::NotLowerTriangular);
    }

    let mut x = Vector::new(m)?;
    for v in 0..m {
        let diag = l[(v, v)];
        if diag == T::zero() {
            x[v] = T::zero();
            continue;
        }

        let mut value = b[v];
        for i in 0..v {
            value = value - l[(v, i)] * x[i];
        }
        x[v] = value / diag;
    }
    Ok(x)
}

/// Solve `U·x = b` bottom-up, with the same zero-diagonal policy as
/// [`forward_sub`].
pub fn backward_sub<T: Real>(
    u: &MatrixDense<T>,
    b: &Vector<T>,
    config: &Config<T>,
) -> Result<Vector<T>> {
    let m = b.len();
    if u.cols() != m {
        return Err(LinalgError::SizeMismatch {
            expected: u.cols(),
            got: m,
        });
    }
    if !u.is_upper_triangular(config.tolerance()) {
        return Err(LinalgError::NotUpperTriangular);
    }

    let mut x = Vector::new(m)?;
    for v in (0..m).rev() {
        let diag = u[(v, v)];
        if diag == T::zero() {
            x[v] = T::zero();
            continue;
        }

        let mut value = b[v];
        for i in v + 1..m {
            value = value - u[(v, i)] * x[i];
        }
        x[v] = value / diag;
    }
    Ok(x)
}

/// Rank test for `A·x = b`; `A` may be rectangular.
pub fn classify<T: Real>(
    a: &MatrixDense<T>,
    b: &Vector<T>,
    config: &Config<T>,
) -> Result<Solvability> {
    if a.rows() != b.len() {
        return Err(LinalgError::SizeMismatch {
            expected: a.rows(),
            got: b.len(),
        });
    }

    let augmented = a.augment(&MatrixDense::from_column(b))?;
    let rank = a.rank(config);
    let augmented_rank = augmented.rank(config);
    let variables = a.cols();
    log::debug!("classify: rank(A) = {rank}, rank([A|b]) = {augmented_rank}, {variables} variables");

    Ok(if rank < augmented_rank {
        Solvability::Inconsistent {
            rank,
            augmented_rank,
        }
    } else if rank < variables {
        Solvability::Infinite { rank, variables }
    } else {
        Solvability::Unique
    })
}

/// Solve the square system `A·x = b`.
///
/// Fails with `NoSolution` or `InfiniteSolutions` unless the solution is unique.
pub fn solve<T: Real>(a: &MatrixDense<T>, b: &Vector<T>, config: &Config<T>) -> Result<Vector<T>> {
    a.ensure_square()?;
    if a.cols() != b.len() {
        return Err(LinalgError::SizeMismatch {
            expected: a.cols(),
            got: b.len(),
        });
    }

    match classify(a, b, config)? {
        Solvability::Inconsistent {
            rank,
            augmented_rank,
        } => Err(LinalgError::NoSolution {
            rank,
            augmented_rank,
        }),
        Solvability::Infinite { rank, variables } => {
            Err(LinalgError::InfiniteSolutions { rank, variables })
        }
        Solvability::Unique => palu(a, config)?.solve(b, config),
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn m(lines: Vec<Vec<f64>>) -> MatrixDense {
        MatrixDense::from_list(lines).unwrap()
    }

    fn v(cells: &[f64]) -> Vector {
        Vector::from_vec(cells.to_vec()).unwrap()
    }

    #[test]
    fn test_forward_sub() {
        let config = Config::default();
        let l = m(vec![
            vec![2.0, 0.0, 0.0],
            vec![3.0, 1.0, 0.0],
            vec![1.0, -1.0, 4.0],
        ]);
        let x = forward_sub(&l, &v(&[4.0, 7.0, 9.0]), &config).unwrap();
        assert_abs_diff_eq!(x, v(&[2.0, 1.0, 2.0]), epsilon = 1e-12);
    }

    #[test]
    fn test_forward_sub_zero_diagonal_policy() {
        let l = m(vec![vec![0.0, 0.0], vec![1.0, 2.0]]);
        let x = forward_sub(&l, &v(&[5.0, 4.0]), &Config::default()).unwrap();
        assert_eq!(x, v(&[0.0, 2.0]));
    }

    #[test]
    fn test_forward_sub_rejects() {
        let config = Config::default();
        let upper = m(vec![vec![1.0, 2.0], vec![0.0, 1.0]]);
        assert_eq!(
            forward_sub(&upper, &v(&[1.0, 1.0]), &config).unwrap_err(),
            LinalgError::NotLowerTriangular
        );
        assert_eq!(
            forward_sub(&upper.transpose(), &v(&[1.0, 1.0, 1.0]), &config).unwrap_err(),
            LinalgError::SizeMismatch {
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn test_backward_sub() {
        let config = Config::default();
        let u = m(vec![
            vec![2.0, 1.0, -1.0],
            vec![0.0, 3.0, 2.0],
            vec![0.0, 0.0, 4.0],
        ]);
        let x = backward_sub(&u, &v(&[3.0, 13.0, 8.0]), &config).unwrap();
        assert_abs_diff_eq!(x, v(&[1.0, 3.0, 2.0]), epsilon = 1e-12);

        let degenerate = m(vec![vec![1.0, 1.0], vec![0.0, 0.0]]);
        let x = backward_sub(&degenerate, &v(&[3.0, 9.0]), &config).unwrap();
        assert_eq!(x, v(&[3.0, 0.0]));

        assert_eq!(
            backward_sub(&u.transpose(), &v(&[1.0, 1.0, 1.0]), &config).unwrap_err(),
            LinalgError::NotUpperTriangular
        );
        assert!(backward_sub(&u, &v(&[1.0]), &config)
            .unwrap_err()
            .is_dimension_error());
    }

    #[test]
    fn test_solve_unique() {
        let a = m(vec![
            vec![1.0, 2.0, -1.0, 5.0],
            vec![3.0, 6.0, -3.0, -2.0],
            vec![7.0, -5.0, 3.0, -1.0],
            vec![5.0, 10.0, 2.0, -7.0],
        ]);
        let b = v(&[22.0, -2.0, 2.0, 3.0]);
        let x = solve(&a, &b, &Config::default()).unwrap();
        assert_abs_diff_eq!(x, v(&[1.0, 2.0, 3.0, 4.0]), epsilon = 1e-9);
    }

    #[test]
    fn test_solve_no_solution() {
        let a = m(vec![vec![1.0, 1.0], vec![1.0, 1.0]]);
        let err = solve(&a, &v(&[1.0, 2.0]), &Config::default()).unwrap_err();
        assert_eq!(
            err,
            LinalgError::NoSolution {
                rank: 1,
                augmented_rank: 2
            }
        );
        assert!(err.is_solvability_error());
    }

    #[test]
    fn test_solve_infinite_solutions() {
        let a = m(vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 9.0],
        ]);
        assert_eq!(
            solve(&a, &v(&[6.0, 15.0, 24.0]), &Config::default()).unwrap_err(),
            LinalgError::InfiniteSolutions {
                rank: 2,
                variables: 3
            }
        );
    }

    #[test]
    fn test_solve_validates_shape() {
        let config = Config::default();
        let rect = m(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(
            solve(&rect, &v(&[1.0, 2.0]), &config).unwrap_err(),
            LinalgError::NonSquareMatrix { rows: 2, cols: 3 }
        );

        let square = m(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert!(solve(&square, &v(&[1.0, 2.0, 3.0]), &config)
            .unwrap_err()
            .is_dimension_error());
    }

    #[test]
    fn test_classify_rectangular() {
        let config = Config::default();
        let tall = m(vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]]);
        assert_eq!(
            classify(&tall, &v(&[1.0, 2.0, 3.0]), &config).unwrap(),
            Solvability::Unique
        );
        assert_eq!(
            classify(&tall, &v(&[1.0, 2.0, 4.0]), &config).unwrap(),
            Solvability::Inconsistent {
                rank: 2,
                augmented_rank: 3
            }
        );

        let wide = m(vec![vec![1.0, 2.0, 3.0]]);
        assert_eq!(
            classify(&wide, &v(&[1.0]), &config).unwrap(),
            Solvability::Infinite {
                rank: 1,
                variables: 3
            }
        );
        assert!(classify(&wide, &v(&[1.0, 2.0]), &config).is_err());
    }

    #[test]
    fn test_solve_random_systems() {
        let config = Config::default();
        let mut rng = StdRng::seed_from_u64(42);
        for n in 1..7 {
            let cells = (0..n * n).map(|_| rng.gen_range(-5.0..5.0)).collect();
            let a = MatrixDense::from_vec(n, n, cells).unwrap();
            let expected =
                Vector::from_vec((0..n).map(|_| rng.gen_range(-5.0..5.0)).collect()).unwrap();
            let b = (&a * &expected).unwrap();

            let x = solve(&a, &b, &config).unwrap();
            assert_abs_diff_eq!((&a * &x).unwrap(), b, epsilon = 1e-6);
        }
    }
}
