//! Finite difference Jacobians of the flow residual.

use crate::error::SolverResult;
use nalgebra::{DMatrix, DVector};

/// Differencing scheme for the Jacobian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JacobianScheme {
    /// One extra residual evaluation per unknown.
    #[default]
    Forward,
    /// Two extra residual evaluations per unknown, second-order accurate.
    Central,
}

impl JacobianScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            JacobianScheme::Forward => "forward",
            JacobianScheme::Central => "central",
        }
    }

    pub fn evaluate<F>(&self, x: &DVector<f64>, f: F, epsilon: f64) -> SolverResult<DMatrix<f64>>
    where
        F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    {
        match self {
            JacobianScheme::Forward => finite_difference_jacobian(x, f, epsilon),
            JacobianScheme::Central => central_difference_jacobian(x, f, epsilon),
        }
    }
}

/// Step for column `j`, scaled with the magnitude of the flow.
fn step(x: &DVector<f64>, j: usize, epsilon: f64) -> f64 {
    epsilon * x[j].abs().max(1.0)
}

/// Compute Jacobian using forward finite differences.
///
/// For each column j, perturbs x[j] by a scaled step h and computes (f(x+h) - f(x))/h.
pub fn finite_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let n = x.len();
    let f_x = f(x)?;
    let mut jac = DMatrix::zeros(f_x.len(), n);

    for j in 0..n {
        let dx = step(x, j, epsilon);
        let mut x_perturbed = x.clone();
        x_perturbed[j] += dx;

        let df = (f(&x_perturbed)? - &f_x) / dx;
        jac.set_column(j, &df);
    }

    Ok(jac)
}

/// Compute Jacobian using central finite differences.
pub fn central_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let n = x.len();
    let m = f(x)?.len();
    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        let dx = step(x, j, epsilon);

        let mut x_plus = x.clone();
        x_plus[j] += dx;
        let mut x_minus = x.clone();
        x_minus[j] -= dx;

        let df = (f(&x_plus)? - f(&x_minus)?) / (2.0 * dx);
        jac.set_column(j, &df);
    }

    Ok(jac)
}
