//! Damped Newton solver with a Levenberg–Marquardt fallback step.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

/// Newton solver configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative tolerance for residual norm (against the initial norm)
    pub rel_tol: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
    /// Relative finite-difference step for the Jacobian
    pub fd_epsilon: f64,
    /// Damping for the Levenberg–Marquardt fallback, scaled by the largest diagonal of JᵀJ
    pub lm_damping: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-8,
            rel_tol: 1e-12,
            line_search_beta: 0.5,
            max_line_search_iters: 20,
            fd_epsilon: 1e-7,
            lm_damping: 1e-3,
        }
    }
}

impl NewtonConfig {
    pub(crate) fn validate(&self) -> SolverResult<()> {
        let setup = |what: &str| SolverError::ProblemSetup {
            what: what.to_string(),
        };
        if self.max_iterations == 0 {
            return Err(setup("max_iterations must be at least 1"));
        }
        if !(self.abs_tol.is_finite() && self.abs_tol > 0.0) {
            return Err(setup("abs_tol must be positive"));
        }
        if !(self.rel_tol.is_finite() && self.rel_tol >= 0.0) {
            return Err(setup("rel_tol must be non-negative"));
        }
        if !(self.line_search_beta > 0.0 && self.line_search_beta < 1.0) {
            return Err(setup("line_search_beta must lie in (0, 1)"));
        }
        if !(self.fd_epsilon.is_finite() && self.fd_epsilon > 0.0) {
            return Err(setup("fd_epsilon must be positive"));
        }
        if !(self.lm_damping.is_finite() && self.lm_damping > 0.0) {
            return Err(setup("lm_damping must be positive"));
        }
        Ok(())
    }
}

/// Newton iteration result.
#[derive(Debug, Clone)]
pub struct NewtonResult {
    /// Solution vector (last iterate when not converged)
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

/// Newton solver with backtracking line search.
///
/// Hitting the iteration cap or a stalled line search is not an error: the
/// best iterate so far is returned with `converged == false`.
pub fn newton_solve<F, J>(
    x0: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> SolverResult<DMatrix<f64>>,
{
    let mut x = x0;
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();
    if !r_norm.is_finite() {
        return Err(SolverError::Numeric {
            what: "Residual at initial guess is not finite".to_string(),
        });
    }
    let r0_norm = r_norm;
    let converged = |norm: f64| norm < config.abs_tol || norm < config.rel_tol * r0_norm;

    for iter in 0..config.max_iterations {
        if converged(r_norm) {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        let jac = jacobian_fn(&x)?;
        let dx = newton_step(&jac, &r, config.lm_damping)?;

        // Backtrack until the residual norm decreases
        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..config.max_line_search_iters {
            let x_new = &x + alpha * &dx;
            let r_new = residual_fn(&x_new)?;
            let r_new_norm = r_new.norm();
            if r_new_norm < r_norm {
                accepted = Some((x_new, r_new, r_new_norm));
                break;
            }
            alpha *= config.line_search_beta;
        }

        let Some((x_new, r_new, r_new_norm)) = accepted else {
            warn!(iteration = iter, residual_norm = r_norm, "line search stagnated");
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: false,
            });
        };

        debug!(
            iteration = iter,
            residual_norm = r_new_norm,
            step = alpha,
            "newton step"
        );
        x = x_new;
        r = r_new;
        r_norm = r_new_norm;
    }

    Ok(NewtonResult {
        x,
        residual_norm: r_norm,
        iterations: config.max_iterations,
        converged: converged(r_norm),
    })
}

/// Solve J dx = -r, falling back to a damped least-squares step when J is singular.
fn newton_step(jac: &DMatrix<f64>, r: &DVector<f64>, damping: f64) -> SolverResult<DVector<f64>> {
    let rhs = -r;
    if let Some(dx) = jac.clone().lu().solve(&rhs) {
        if dx.iter().all(|v| v.is_finite()) {
            return Ok(dx);
        }
    }
    warn!("singular Jacobian, taking Levenberg-Marquardt step");
    levenberg_marquardt_step(jac, r, damping)
}

/// Solve (JᵀJ + λI) dx = -Jᵀr with λ = damping · max(1, max diag(JᵀJ)).
pub fn levenberg_marquardt_step(
    jac: &DMatrix<f64>,
    r: &DVector<f64>,
    damping: f64,
) -> SolverResult<DVector<f64>> {
    let jt = jac.transpose();
    let mut normal = &jt * jac;
    let scale = normal.diagonal().iter().fold(1.0_f64, |acc, d| acc.max(*d));
    let lambda = damping * scale;
    for i in 0..normal.nrows() {
        normal[(i, i)] += lambda;
    }

    let rhs = -(&jt * r);
    normal
        .cholesky()
        .map(|c| c.solve(&rhs))
        .filter(|dx| dx.iter().all(|v| v.is_finite()))
        .ok_or_else(|| SolverError::Numeric {
            what: "Damped normal equations could not be solved".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_quadratic() {
        // Solve x^2 - 4 = 0
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] - 4.0))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<DMatrix<f64>> {
            Ok(DMatrix::from_element(1, 1, 2.0 * x[0]))
        };

        let x0 = DVector::from_element(1, 3.0);
        let config = NewtonConfig::default();
        let result = newton_solve(x0, residual, jacobian, &config).unwrap();

        assert!(result.converged);
        assert!((result.x[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn singular_start_uses_damped_step() {
        // f = [x0*x1 - 2, x0 - 1]; J is singular at x0 = 0
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![x[0] * x[1] - 2.0, x[0] - 1.0]))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<DMatrix<f64>> {
            Ok(DMatrix::from_row_slice(2, 2, &[x[1], x[0], 1.0, 0.0]))
        };

        let x0 = DVector::from_vec(vec![0.0, 1.0]);
        let result = newton_solve(x0, residual, jacobian, &NewtonConfig::default()).unwrap();

        assert!(result.converged);
        assert!((result.x[0] - 1.0).abs() < 1e-8);
        assert!((result.x[1] - 2.0).abs() < 1e-8);
    }

    #[test]
    fn iteration_cap_returns_last_iterate() {
        // Slow convergence on a triple root
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, (x[0] - 1.0).powi(3)))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<DMatrix<f64>> {
            Ok(DMatrix::from_element(1, 1, 3.0 * (x[0] - 1.0).powi(2)))
        };

        let config = NewtonConfig {
            max_iterations: 3,
            ..NewtonConfig::default()
        };
        let result =
            newton_solve(DVector::from_element(1, 4.0), residual, jacobian, &config).unwrap();

        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
        assert!(result.x[0] < 4.0 && result.x[0] > 1.0);
    }

    #[test]
    fn already_converged_takes_no_steps() {
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> { Ok(x.clone()) };
        let jacobian =
            |x: &DVector<f64>| -> SolverResult<DMatrix<f64>> { Ok(DMatrix::identity(x.len(), x.len())) };

        let result = newton_solve(
            DVector::zeros(3),
            residual,
            jacobian,
            &NewtonConfig::default(),
        )
        .unwrap();
        assert!(result.converged);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn damped_step_on_rank_deficient_system() {
        let jac = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 1.0, 0.0]);
        let r = DVector::from_vec(vec![-2.0, -1.0]);
        let dx = levenberg_marquardt_step(&jac, &r, 1e-3).unwrap();
        assert!(dx[0] > 1.4 && dx[0] < 1.5);
        assert_eq!(dx[1], 0.0);
    }

    #[test]
    fn config_validation() {
        assert!(NewtonConfig::default().validate().is_ok());
        let bad = NewtonConfig {
            line_search_beta: 1.0,
            ..NewtonConfig::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(SolverError::ProblemSetup { .. })
        ));
    }
}
