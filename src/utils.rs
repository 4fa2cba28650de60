use crate::matrix::matrix_dense::Real;

#[inline(always)]
pub fn nearly_zero<T: Real>(x: T, tol: T) -> bool {
    x.abs() <= tol
}

#[inline(always)]
pub fn nearly_equal<T: Real>(a: T, b: T, tol: T) -> bool {
    (a - b).abs() <= tol
}

// snap values within tolerance to exactly zero
#[inline(always)]
pub fn chop<T: Real>(x: T, tol: T) -> T {
    if nearly_zero(x, tol) {
        T::zero()
    } else {
        x
    }
}

/// Swap the first `limit` entries of rows `r1` and `r2` of a row-major buffer.
pub fn swap_row_prefix<T>(cells: &mut [T], cols: usize, r1: usize, r2: usize, limit: usize) {
    if r1 == r2 {
        return;
    }
    for k in 0..limit {
        cells.swap(r1 * cols + k, r2 * cols + k);
    }
}

/// `(-1)^swaps`
pub fn parity_sign<T: Real>(swaps: usize) -> T {
    if swaps % 2 == 0 {
        T::one()
    } else {
        -T::one()
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
