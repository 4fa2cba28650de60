use crate::config::Config;
use crate::error::Result;

/// Row-reduction based analytics over a dense matrix.
///
/// Every method works on a copy; the receiver is never modified.
pub trait Matrix<T>
where
    Self: Sized,
{
    fn is_rref(&self, config: &Config<T>) -> bool;
    fn rref(&self, config: &Config<T>) -> Self;
    fn rank(&self, config: &Config<T>) -> usize;
    fn pivot_columns(&self, config: &Config<T>) -> Vec<usize>;
    fn is_pivot_col(&self, col: usize, config: &Config<T>) -> Result<bool>;
    fn is_pivot_row(&self, row: usize, config: &Config<T>) -> Result<bool>;

    fn det(&self, config: &Config<T>) -> Result<T>;
    fn is_singular(&self, config: &Config<T>) -> Result<bool>;
    fn is_invertible(&self, config: &Config<T>) -> bool;
    fn inverse(&self, config: &Config<T>) -> Result<Self>;

    /// Basis of `{v : A·v = 0}`, one column per free variable.
    fn nullspace(&self, config: &Config<T>) -> Self;
}
