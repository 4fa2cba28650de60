#![allow(non_snake_case)]

use crate::config::Config;
use crate::decomposer::palu;
use crate::error::LinalgError;
use crate::matrix::matrix::Matrix;
use crate::matrix::matrix_dense::MatrixDense;
use crate::matrix::vector::Vector;
use crate::solver;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyType;

impl From<LinalgError> for PyErr {
    fn from(error: LinalgError) -> PyErr {
        PyValueError::new_err(error.to_string())
    }
}

fn config(tol: Option<f64>) -> PyResult<Config> {
    match tol {
        Some(tol) => Ok(Config::new(tol)?),
        None => Ok(Config::default()),
    }
}

#[derive(Debug, Clone)]
#[pyclass(name = "Matrix", frozen)]
pub struct PyMatrix {
    pub inner: MatrixDense,
}

impl From<MatrixDense> for PyMatrix {
    fn from(inner: MatrixDense) -> Self {
        PyMatrix { inner }
    }
}

#[pymethods]
impl PyMatrix {
    #[new]
    pub fn new(lines: Vec<Vec<f64>>) -> PyResult<Self> {
        Ok(MatrixDense::from_list(lines)?.into())
    }

    #[classmethod]
    pub fn identity(_cls: &Bound<PyType>, n: usize) -> PyResult<Self> {
        Ok(MatrixDense::identity(n)?.into())
    }

    pub fn to_list(&self) -> Vec<Vec<f64>> {
        self.inner.to_list()
    }

    #[getter]
    pub fn rows(&self) -> usize {
        self.inner.rows()
    }

    #[getter]
    pub fn cols(&self) -> usize {
        self.inner.cols()
    }

    #[getter]
    pub fn T(&self) -> PyMatrix {
        self.inner.transpose().into()
    }

    pub fn __add__(&self, rhs: &PyMatrix) -> PyResult<PyMatrix> {
        Ok((&self.inner + &rhs.inner)?.into())
    }

    pub fn __sub__(&self, rhs: &PyMatrix) -> PyResult<PyMatrix> {
        Ok((&self.inner - &rhs.inner)?.into())
    }

    pub fn __mul__(&self, rhs: &PyMatrix) -> PyResult<PyMatrix> {
        Ok((&self.inner * &rhs.inner)?.into())
    }

    pub fn __repr__(&self) -> String {
        format!("Matrix({:?})", self.inner.to_list())
    }

    pub fn __str__(&self) -> String {
        self.inner.to_string()
    }

    #[pyo3(signature = (tol=None))]
    pub fn rref(&self, tol: Option<f64>) -> PyResult<PyMatrix> {
        Ok(self.inner.rref(&config(tol)?).into())
    }

    #[pyo3(signature = (tol=None))]
    pub fn rank(&self, tol: Option<f64>) -> PyResult<usize> {
        Ok(self.inner.rank(&config(tol)?))
    }

    pub fn det(&self) -> PyResult<f64> {
        Ok(self.inner.det(&Config::default())?)
    }

    pub fn inv(&self) -> PyResult<PyMatrix> {
        Ok(self.inner.inverse(&Config::default())?.into())
    }

    pub fn nullspace(&self) -> PyMatrix {
        self.inner.nullspace(&Config::default()).into()
    }

    pub fn palu(&self) -> PyResult<(PyMatrix, PyMatrix, PyMatrix, usize)> {
        let plu = palu(&self.inner, &Config::default())?;
        Ok((plu.p.into(), plu.l.into(), plu.u.into(), plu.swaps))
    }

    pub fn solve(&self, b: Vec<f64>) -> PyResult<Vec<f64>> {
        let x = solver::solve(&self.inner, &Vector::from_vec(b)?, &Config::default())?;
        Ok(x.as_slice().to_vec())
    }
}

#[pyfunction]
pub fn forward_sub(l: &PyMatrix, b: Vec<f64>) -> PyResult<Vec<f64>> {
    let x = solver::forward_sub(&l.inner, &Vector::from_vec(b)?, &Config::default())?;
    Ok(x.as_slice().to_vec())
}

#[pyfunction]
pub fn backward_sub(u: &PyMatrix, b: Vec<f64>) -> PyResult<Vec<f64>> {
    let x = solver::backward_sub(&u.inner, &Vector::from_vec(b)?, &Config::default())?;
    Ok(x.as_slice().to_vec())
}
