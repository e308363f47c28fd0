//! Error types for solver operations.

use pn_components::ComponentError;
use pn_core::error::PnError;
use pn_fluids::FluidError;
use pn_graph::GraphError;
use thiserror::Error;

/// Errors that can occur while solving a network.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for PnError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::ProblemSetup { what } => PnError::Invariant {
                what: format!("problem setup: {what}"),
            },
            SolverError::Component(e) => e.into(),
            SolverError::Fluid(e) => e.into(),
            SolverError::Graph(e) => e.into(),
            SolverError::Numeric { what } => PnError::Invariant {
                what: format!("numeric: {what}"),
            },
        }
    }
}
