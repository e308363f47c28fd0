//! pn-graph: pipe network topology.
//!
//! Responsibilities:
//! - Own the pipes of a network and derive its nodes from pipe endpoints
//! - Hold per-node external flows and user-declared loops
//! - Validate topology (duplicate pipes, loop continuity and closure)
//! - Evaluate node balances and loop head losses, at committed flows or for
//!   a candidate flow vector
//!
//! Sign convention: a positive pipe flow runs from the pipe's low node to its
//! high node. Positive external flow enters the network.
//!
//! # Example
//!
//! ```
//! use pn_core::units::{m, mm};
//! use pn_fluids::Fluid;
//! use pn_graph::NetworkBuilder;
//!
//! let mut builder = NetworkBuilder::new(Fluid::water());
//! builder.add_pipe("a", "b", m(100.0), mm(200.0), m(0.00025)).unwrap();
//! builder.add_pipe("b", "c", m(100.0), mm(200.0), m(0.00025)).unwrap();
//! builder.add_pipe("a", "c", m(100.0), mm(200.0), m(0.00025)).unwrap();
//!
//! let mut net = builder.build().unwrap();
//! net.add_loop("A", ["a-b", "b-c", "a-c"]).unwrap();
//! assert_eq!(net.nodes().len(), 3);
//! assert_eq!(net.loops().len(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod network;
mod validate;

pub use builder::NetworkBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::{Loop, LoopWalk, NetworkStage, Node};
pub use network::Network;
