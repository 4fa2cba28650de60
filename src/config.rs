//! Numerical configuration shared by factorization, reduction and solving.

use crate::error::{LinalgError, Result};
use crate::matrix::matrix_dense::Real;

/// Threshold below which a value is treated as exactly zero.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// `DEFAULT_TOLERANCE` converted to `T`.
pub fn default_tolerance<T: Real>() -> T {
    T::from_f64(DEFAULT_TOLERANCE).unwrap_or_else(T::epsilon)
}

/// Tolerance configuration passed to every tolerance-sensitive operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config<T = f64> {
    tolerance: T,
}

impl<T: Real> Default for Config<T> {
    fn default() -> Self {
        Config {
            tolerance: default_tolerance(),
        }
    }
}

impl<T: Real> Config<T> {
    pub fn new(tolerance: T) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < T::zero() {
            return Err(LinalgError::InvalidArgument {
                reason: format!("tolerance must be finite and non-negative, got {tolerance}"),
            });
        }
        Ok(Config { tolerance })
    }

    /// Values with `|x| <= tolerance` are treated as zero.
    pub fn tolerance(&self) -> T {
        self.tolerance
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
