use approx::AbsDiffEq;
use itertools::Itertools;

use crate::config::default_tolerance;
use crate::error::{LinalgError, Result};
use crate::matrix::matrix_dense::Real;
use crate::utils::nearly_equal;
use std::fmt;
use std::ops;

/// Dense vector of fixed, non-zero size.
#[derive(Debug, Clone)]
pub struct Vector<T = f64> {
    cells: Vec<T>,
    // next cell written by `append`
    cursor: usize,
}

impl<T: Real> Vector<T> {
    /// Zero-filled vector of `size` entries.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(LinalgError::InvalidSize { rows: 0, cols: 1 });
        }
        Ok(Vector {
            cells: vec![T::zero(); size],
            cursor: 0,
        })
    }

    pub fn from_vec(cells: Vec<T>) -> Result<Self> {
        if cells.is_empty() {
            return Err(LinalgError::InvalidSize { rows: 0, cols: 1 });
        }
        Ok(Vector { cells, cursor: 0 })
    }

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

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }

    pub fn get(&self, i: usize) -> Result<T> {
        self.cells
            .get(i)
            .copied()
            .ok_or(LinalgError::IndexOutOfRange {
                index: i,
                bound: self.cells.len(),
            })
    }

    pub fn set(&mut self, i: usize, value: T) -> Result<()> {
        let bound = self.cells.len();
        let cell = self
            .cells
            .get_mut(i)
            .ok_or(LinalgError::IndexOutOfRange { index: i, bound })?;
        *cell = value;
        Ok(())
    }

    fn ensure_same_len(&self, rhs: &Vector<T>) -> Result<()> {
        if self.len() != rhs.len() {
            return Err(LinalgError::SizeMismatch {
                expected: self.len(),
                got: rhs.len(),
            });
        }
        Ok(())
    }

    pub fn dot(&self, rhs: &Vector<T>) -> Result<T> {
        self.ensure_same_len(rhs)?;
        Ok(self
            .cells
            .iter()
            .zip(rhs.cells.iter())
            .map(|(&a, &b)| a * b)
            .sum())
    }

    /// Cross product, defined for 3-vectors only.
    pub fn cross(&self, rhs: &Vector<T>) -> Result<Vector<T>> {
        for size in [self.len(), rhs.len()] {
            if size != 3 {
                return Err(LinalgError::SizeMismatch {
                    expected: 3,
                    got: size,
                });
            }
        }
        let (a, b) = (&self.cells, &rhs.cells);
        Vector::from_vec(vec![
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ])
    }

    pub fn magnitude(&self) -> T {
        self.cells.iter().map(|&v| v * v).sum::<T>().sqrt()
    }

    pub fn normalize(&self) -> Result<Vector<T>> {
        let mag = self.magnitude();
        if mag == T::zero() {
            return Err(LinalgError::ZeroDivision);
        }
        self / mag
    }

    pub fn sum(&self) -> T {
        self.cells.iter().copied().sum()
    }

    pub fn avg(&self) -> T {
        self.sum() / T::from_usize(self.len()).unwrap_or_else(T::one)
    }

    pub fn min(&self) -> T {
        self.cells.iter().copied().fold(T::infinity(), T::min)
    }

    pub fn max(&self) -> T {
        self.cells.iter().copied().fold(T::neg_infinity(), T::max)
    }

    /// Angle between two vectors, in radians.
    pub fn angle(v1: &Vector<T>, v2: &Vector<T>) -> Result<T> {
        v1.ensure_same_len(v2)?;
        let (mag1, mag2) = (v1.magnitude(), v2.magnitude());
        if mag1 == T::zero() || mag2 == T::zero() {
            return Err(LinalgError::NullVector);
        }

        let cos_theta = v1.dot(v2)? / (mag1 * mag2);
        Ok(cos_theta.max(-T::one()).min(T::one()).acos())
    }

    pub fn angle_deg(v1: &Vector<T>, v2: &Vector<T>) -> Result<T> {
        Ok(Self::angle(v1, v2)?.to_degrees())
    }

    pub fn approx_eq(&self, other: &Vector<T>, tol: T) -> bool {
        self.len() == other.len()
            && self
                .cells
                .iter()
                .zip(other.cells.iter())
                .all(|(&a, &b)| nearly_equal(a, b, tol))
    }

    fn zip_with(&self, rhs: &Vector<T>, f: impl Fn(T, T) -> T) -> Result<Vector<T>> {
        self.ensure_same_len(rhs)?;
        Ok(Vector {
            cells: self
                .cells
                .iter()
                .zip(rhs.cells.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
            cursor: 0,
        })
    }

    fn map(&self, f: impl Fn(T) -> T) -> Vector<T> {
        Vector {
            cells: self.cells.iter().map(|&v| f(v)).collect(),
            cursor: 0,
        }
    }
}

impl<T> ops::Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.cells[i]
    }
}

impl<T> ops::IndexMut<usize> for Vector<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.cells[i]
    }
}

impl<T: Real> ops::Add<&Vector<T>> for &Vector<T> {
    type Output = Result<Vector<T>>;

    fn add(self, rhs: &Vector<T>) -> Result<Vector<T>> {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<T: Real> ops::Sub<&Vector<T>> for &Vector<T> {
    type Output = Result<Vector<T>>;

    fn sub(self, rhs: &Vector<T>) -> Result<Vector<T>> {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<T: Real> ops::Mul<T> for &Vector<T> {
    type Output = Vector<T>;

    fn mul(self, scalar: T) -> Vector<T> {
        self.map(|v| v * scalar)
    }
}

impl<T: Real> ops::Div<T> for &Vector<T> {
    type Output = Result<Vector<T>>;

    fn div(self, scalar: T) -> Result<Vector<T>> {
        if scalar == T::zero() {
            return Err(LinalgError::ZeroDivision);
        }
        Ok(self.map(|v| v / scalar))
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Vector<T>) -> bool {
        self.cells == other.cells
    }
}

impl<T: Real> AbsDiffEq for Vector<T> {
    type Epsilon = T;

    fn default_epsilon() -> T {
        default_tolerance()
    }

    fn abs_diff_eq(&self, other: &Vector<T>, epsilon: T) -> bool {
        self.len() == other.len()
            && self
                .cells
                .iter()
                .zip(other.cells.iter())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<T: Real> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.cells.iter().join(", "))
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn v(cells: &[f64]) -> Vector {
        Vector::from_vec(cells.to_vec()).unwrap()
    }

    #[test]
    fn test_construction() {
        assert_eq!(Vector::<f64>::new(3).unwrap().as_slice(), &[0.0, 0.0, 0.0]);
        assert!(Vector::<f64>::new(0).is_err());
        assert!(Vector::<f64>::from_vec(vec![]).is_err());

        let mut a = Vector::<f64>::new(3).unwrap();
        a.append(1.0).unwrap().append(2.0).unwrap().append(3.0).unwrap();
        assert_eq!(a, v(&[1.0, 2.0, 3.0]));
        assert_eq!(
            a.append(4.0).unwrap_err(),
            LinalgError::InitOutOfRange { capacity: 3 }
        );
    }

    #[test]
    fn test_access() {
        let mut a = v(&[1.0, 2.0]);
        assert_eq!(a.get(1).unwrap(), 2.0);
        assert_eq!(
            a.get(2).unwrap_err(),
            LinalgError::IndexOutOfRange { index: 2, bound: 2 }
        );
        a.set(0, 5.0).unwrap();
        assert_eq!(a[0], 5.0);
        assert!(a.set(3, 1.0).is_err());
        a[1] = 7.0;
        assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec![5.0, 7.0]);
    }

    #[test]
    fn test_arithmetic() {
        let a = v(&[3.0, 4.0, 5.0]);
        let b = v(&[1.0, 2.0, 3.0]);

        assert_eq!((&a + &b).unwrap(), v(&[4.0, 6.0, 8.0]));
        assert_eq!((&a - &b).unwrap(), v(&[2.0, 2.0, 2.0]));
        assert_eq!(&a * 2.0, v(&[6.0, 8.0, 10.0]));
        assert_eq!((&a / 2.0).unwrap(), v(&[1.5, 2.0, 2.5]));
        assert_eq!((&a / 0.0).unwrap_err(), LinalgError::ZeroDivision);
        assert_eq!(a.dot(&b).unwrap(), 26.0);
        assert_eq!(a.cross(&b).unwrap(), v(&[2.0, -4.0, 2.0]));

        let short = v(&[1.0, 2.0]);
        assert!((&a + &short).is_err());
        assert!(a.dot(&short).is_err());
        assert_eq!(
            a.cross(&short).unwrap_err(),
            LinalgError::SizeMismatch {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_statistics() {
        let a = v(&[3.0, 4.0, -1.0]);
        assert_eq!(a.sum(), 6.0);
        assert_eq!(a.avg(), 2.0);
        assert_eq!(a.min(), -1.0);
        assert_eq!(a.max(), 4.0);
        assert_eq!(v(&[3.0, 4.0]).magnitude(), 5.0);
    }

    #[test]
    fn test_normalize() {
        let n = v(&[3.0, 4.0]).normalize().unwrap();
        assert_abs_diff_eq!(n, v(&[0.6, 0.8]), epsilon = 1e-12);
        assert_eq!(
            v(&[0.0, 0.0]).normalize().unwrap_err(),
            LinalgError::ZeroDivision
        );
    }

    #[test]
    fn test_angle() {
        let x = v(&[1.0, 0.0, 0.0]);
        let y = v(&[0.0, 2.0, 0.0]);
        assert_abs_diff_eq!(Vector::angle(&x, &y).unwrap(), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(Vector::angle_deg(&x, &y).unwrap(), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(Vector::angle(&x, &x).unwrap(), 0.0, epsilon = 1e-12);

        let zero = Vector::<f64>::new(3).unwrap();
        assert_eq!(
            Vector::angle(&x, &zero).unwrap_err(),
            LinalgError::NullVector
        );
        assert!(Vector::angle(&x, &v(&[1.0])).is_err());
    }

    #[test]
    fn test_equality_and_display() {
        let a = v(&[1.0, 2.0]);
        let b = v(&[1.0, 2.0 + 1e-9]);
        assert_ne!(a, b);
        assert!(a.approx_eq(&b, 1e-6));
        assert!(!a.approx_eq(&v(&[1.0]), 1.0));
        assert_eq!(v(&[1.0, 2.5, -3.0]).to_string(), "[1, 2.5, -3]");
    }
}
