//! High-level solve entry point.

use crate::error::{SolverError, SolverResult};
use crate::initialization::InitialGuess;
use crate::jacobian::JacobianScheme;
use crate::newton::{NewtonConfig, newton_solve};
use crate::problem::FlowProblem;
use nalgebra::DVector;
use pn_core::numeric::max_abs;
use pn_graph::Network;
use tracing::{info, warn};

/// Default tolerance on the sum of external flows (L/s).
pub const DEFAULT_BALANCE_TOLERANCE: f64 = 1e-9;

/// Options for [`find_flow_rates`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOptions {
    pub newton: NewtonConfig,
    pub jacobian: JacobianScheme,
    pub initial_guess: InitialGuess,
    /// Node whose balance equation is dropped; `None` picks the first node.
    pub reference_node: Option<String>,
    /// Largest accepted |sum of external flows| (L/s).
    pub balance_tolerance: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            newton: NewtonConfig::default(),
            jacobian: JacobianScheme::default(),
            initial_guess: InitialGuess::default(),
            reference_node: None,
            balance_tolerance: DEFAULT_BALANCE_TOLERANCE,
        }
    }
}

impl SolveOptions {
    fn validate(&self) -> SolverResult<()> {
        self.newton.validate()?;
        if let InitialGuess::Uniform(q) = self.initial_guess {
            if !q.is_finite() || q == 0.0 {
                return Err(SolverError::ProblemSetup {
                    what: format!("uniform initial flow must be finite and nonzero, got {q}"),
                });
            }
        }
        if !(self.balance_tolerance.is_finite() && self.balance_tolerance >= 0.0) {
            return Err(SolverError::ProblemSetup {
                what: "balance_tolerance must be non-negative".to_string(),
            });
        }
        Ok(())
    }
}

/// Outcome of a network solve.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSolution {
    /// Committed pipe flows (L/s), in pipe order
    pub flows: Vec<f64>,
    /// Residual norm of the committed flows
    pub residual_norm: f64,
    /// Newton iterations taken
    pub iterations: usize,
    /// Whether the residual reached tolerance
    pub converged: bool,
}

/// Solve the pipe flows of `network` and commit them into its pipes.
///
/// Non-convergence is not an error: the last iterate is committed and the
/// solution is flagged `converged == false`.
pub fn find_flow_rates(network: &mut Network, options: &SolveOptions) -> SolverResult<FlowSolution> {
    options.validate()?;

    let result = {
        let problem = FlowProblem::new(
            network,
            options.reference_node.as_deref(),
            options.balance_tolerance,
        )?;
        let x0 = options.initial_guess.flows(network);

        let residual = |x: &DVector<f64>| problem.residual(x);
        let jacobian = |x: &DVector<f64>| {
            options
                .jacobian
                .evaluate(x, |y: &DVector<f64>| problem.residual(y), options.newton.fd_epsilon)
        };

        newton_solve(x0, residual, jacobian, &options.newton)?
    };

    let flows: Vec<f64> = result.x.iter().copied().collect();
    if result.converged {
        network.commit_flows(&flows)?;
    } else {
        network.commit_iterate(&flows)?;
    }

    if result.converged {
        info!(
            iterations = result.iterations,
            residual_norm = result.residual_norm,
            max_node_imbalance = max_abs(&network.node_flow_rates()),
            guess = options.initial_guess.as_str(),
            "flow solve converged"
        );
    } else {
        warn!(
            iterations = result.iterations,
            residual_norm = result.residual_norm,
            "flow solve did not converge; committed last iterate"
        );
    }

    Ok(FlowSolution {
        flows,
        residual_norm: result.residual_norm,
        iterations: result.iterations,
        converged: result.converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_valid() {
        assert!(SolveOptions::default().validate().is_ok());
    }

    #[test]
    fn zero_uniform_guess_is_rejected() {
        let options = SolveOptions {
            initial_guess: InitialGuess::Uniform(0.0),
            ..SolveOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(SolverError::ProblemSetup { .. })
        ));
    }
}
