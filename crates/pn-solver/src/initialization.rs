//! Initial guess for the pipe flows.

use nalgebra::DVector;
use pn_components::DEFAULT_FLOW_LPS;
use pn_graph::Network;

/// Where the Newton iteration starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InitialGuess {
    /// Every pipe starts at the same flow (L/s). Must be nonzero.
    Uniform(f64),
    /// Start from the flows currently held by the pipes.
    WarmStart,
}

impl Default for InitialGuess {
    fn default() -> Self {
        InitialGuess::Uniform(DEFAULT_FLOW_LPS)
    }
}

impl InitialGuess {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitialGuess::Uniform(_) => "uniform",
            InitialGuess::WarmStart => "warm-start",
        }
    }

    /// Build the starting flow vector for `network`.
    pub fn flows(&self, network: &Network) -> DVector<f64> {
        match *self {
            InitialGuess::Uniform(q) => DVector::from_element(network.pipes().len(), q),
            InitialGuess::WarmStart => DVector::from_vec(network.flows()),
        }
    }
}
