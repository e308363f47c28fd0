//! Steady-state flow solver for looped pipe networks.
//!
//! The unknowns are the signed pipe flows (L/s). The solver balances flow at
//! every node but one and drives the head loss around every declared loop to
//! zero, using a damped Newton method on a finite-difference Jacobian.
//!
//! # Example
//!
//! ```
//! use pn_core::units::{m, mm};
//! use pn_fluids::Fluid;
//! use pn_graph::NetworkBuilder;
//! use pn_solver::{SolveOptions, find_flow_rates};
//!
//! let mut builder = NetworkBuilder::new(Fluid::water());
//! builder.add_pipe("a", "b", m(100.0), mm(200.0), m(0.00025)).unwrap();
//! builder.add_pipe("b", "c", m(100.0), mm(200.0), m(0.00025)).unwrap();
//! builder.add_pipe("a", "c", m(100.0), mm(150.0), m(0.00025)).unwrap();
//! let mut net = builder.build().unwrap();
//! net.add_loop("A", ["a-b", "b-c", "a-c"]).unwrap();
//! net.set_external_flow("a", 20.0).unwrap();
//! net.set_external_flow("c", -20.0).unwrap();
//!
//! let solution = find_flow_rates(&mut net, &SolveOptions::default()).unwrap();
//! assert!(solution.converged);
//! assert!((solution.flows[0] + solution.flows[2] - 20.0).abs() < 1e-6);
//! ```

pub mod error;
pub mod initialization;
pub mod jacobian;
pub mod newton;
pub mod problem;
pub mod report;
pub mod solve;

pub use error::{SolverError, SolverResult};
pub use initialization::InitialGuess;
pub use jacobian::JacobianScheme;
pub use newton::{NewtonConfig, NewtonResult};
pub use problem::FlowProblem;
pub use report::{FlowReport, LoopCheckEntry, NodeBalanceEntry, PipeFlowEntry};
pub use solve::{DEFAULT_BALANCE_TOLERANCE, FlowSolution, SolveOptions, find_flow_rates};
