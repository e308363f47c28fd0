use pn_components::ComponentError;
use pn_graph::GraphError;
use pn_solver::SolverError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}
