//! Error types for the dense linear algebra kernel.
//!
//! Every fallible operation validates its inputs up front and reports one of
//! these variants.

use thiserror::Error;

/// Errors that can occur while building or operating on matrices and vectors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LinalgError {
    /// A container was requested with a zero dimension.
    #[error("invalid size initialization: {rows}x{cols}")]
    InvalidSize { rows: usize, cols: usize },

    /// An index was outside `0..bound`.
    #[error("index {index} out of range (bound {bound})")]
    IndexOutOfRange { index: usize, bound: usize },

    /// More values were appended than the container can hold.
    #[error("initialization out of range: capacity is {capacity}")]
    InitOutOfRange { capacity: usize },

    /// Two operands have incompatible dimensions.
    #[error("size mismatch: expected {expected}, got {got}")]
    SizeMismatch { expected: usize, got: usize },

    #[error("matrix is not square: {rows}x{cols}")]
    NonSquareMatrix { rows: usize, cols: usize },

    #[error("matrix is not lower triangular")]
    NotLowerTriangular,

    #[error("matrix is not upper triangular")]
    NotUpperTriangular,

    #[error("matrix is singular")]
    SingularMatrix,

    #[error("division by zero")]
    ZeroDivision,

    /// An angle was requested against a zero-length vector.
    #[error("null vector has no direction")]
    NullVector,

    /// `rank(A) < rank([A | b])`.
    #[error("system has no solution: rank(A) = {rank}, rank([A|b]) = {augmented_rank}")]
    NoSolution { rank: usize, augmented_rank: usize },

    /// `rank(A) == rank([A | b]) < variables`.
    #[error("system has infinitely many solutions: rank {rank} < {variables} variables")]
    InfiniteSolutions { rank: usize, variables: usize },

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

/// A specialized `Result` type for linear algebra operations.
pub type Result<T> = std::result::Result<T, LinalgError>;

impl LinalgError {
    /// Returns `true` for shape and indexing errors.
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            LinalgError::InvalidSize { .. }
                | LinalgError::IndexOutOfRange { .. }
                | LinalgError::InitOutOfRange { .. }
                | LinalgError::SizeMismatch { .. }
                | LinalgError::NonSquareMatrix { .. }
        )
    }

    /// Returns `true` when a linear system was classified as not uniquely solvable.
    pub fn is_solvability_error(&self) -> bool {
        matches!(
            self,
            LinalgError::NoSolution { .. } | LinalgError::InfiniteSolutions { .. }
        )
    }

    /// Returns `true` for errors raised by the values themselves rather than their shape.
    pub fn is_numerical_error(&self) -> bool {
        matches!(
            self,
            LinalgError::SingularMatrix | LinalgError::ZeroDivision | LinalgError::NullVector
        )
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
