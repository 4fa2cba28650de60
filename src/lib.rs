//! Dense linear algebra: pivoted LU factorization, triangular substitution,
//! rank-checked system solving, row reduction, determinant, inverse and
//! nullspace.
//!
//! ```
//! use astra_linalg::{solve, Config, MatrixDense, Vector};
//!
//! let a = MatrixDense::from_list(vec![vec![2.0, 1.0], vec![1.0, 3.0]]).unwrap();
//! let b = Vector::from_vec(vec![3.0, 5.0]).unwrap();
//! let x = solve(&a, &b, &Config::default()).unwrap();
//! assert!(x.approx_eq(&Vector::from_vec(vec![0.8, 1.4]).unwrap(), 1e-12));
//! ```

pub mod config;
pub mod decomposer;
pub mod error;
pub mod matrix {
    pub mod matrix;
    pub mod matrix_dense;
    pub mod reduce;
    pub mod vector;
}
pub mod solver;
pub mod utils;

#[cfg(feature = "python")]
pub mod python;

pub use config::{Config, DEFAULT_TOLERANCE};
pub use decomposer::{palu, PluResult};
pub use error::{LinalgError, Result};
pub use matrix::matrix::Matrix;
pub use matrix::matrix_dense::{MatrixDense, Real};
pub use matrix::vector::Vector;
pub use solver::{backward_sub, classify, forward_sub, solve, Solvability};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn astra_linalg(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyMatrix>()?;
    m.add_function(wrap_pyfunction!(python::forward_sub, m)?)?;
    m.add_function(wrap_pyfunction!(python::backward_sub, m)?)?;
    Ok(())
}
