//! Topology error types.

use pn_core::PnError;
use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

/// Network construction and topology errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The network has no pipes.
    #[error("Network has no pipes")]
    Empty,

    /// Two pipes join the same pair of nodes.
    #[error("Duplicate pipe {name}")]
    DuplicatePipe { name: String },

    /// A loop names a pipe the network does not contain.
    #[error("Loop {loop_name} references unknown pipe {pipe}")]
    UnknownPipe { loop_name: String, pipe: String },

    /// A node name that no pipe touches.
    #[error("Unknown node {name}")]
    UnknownNode { name: String },

    /// A loop name is used twice.
    #[error("Duplicate loop {name}")]
    DuplicateLoop { name: String },

    /// A loop without pipes.
    #[error("Loop {loop_name} has no pipes")]
    EmptyLoop { loop_name: String },

    /// A loop lists the same pipe twice.
    #[error("Loop {loop_name} lists pipe {pipe} more than once")]
    RepeatedPipe { loop_name: String, pipe: String },

    /// Consecutive pipes of a loop do not share a node.
    #[error("Loop {loop_name} is broken: pipe {pipe} does not touch node {node}")]
    BrokenLoop {
        loop_name: String,
        pipe: String,
        node: String,
    },

    /// The walk around a loop ends somewhere other than where it started.
    #[error("Loop {loop_name} is open: walk starts at {start} but ends at {end}")]
    OpenLoop {
        loop_name: String,
        start: String,
        end: String,
    },

    /// Node adjacency does not match pipe endpoints.
    #[error("Node {node} adjacency is inconsistent with pipe {pipe}")]
    InconsistentAdjacency { node: String, pipe: String },

    /// A flow vector does not have one entry per pipe.
    #[error("Flow vector has {actual} entries for {expected} pipes")]
    FlowLength { expected: usize, actual: usize },
}

impl From<GraphError> for PnError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::UnknownNode { name } => PnError::NotFound { what: "node", name },
            GraphError::UnknownPipe { pipe, .. } => PnError::NotFound {
                what: "pipe",
                name: pipe,
            },
            other => PnError::Invariant {
                what: other.to_string(),
            },
        }
    }
}
