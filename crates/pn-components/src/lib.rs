//! pn-components: pipe hydraulics for pipenet.
//!
//! Provides:
//! - [`Pipe`], a canonical-endpoint pipe segment with Darcy–Weisbach losses
//! - friction factor correlations (laminar, Colebrook–White, transition band)
//! - pluggable [`TransitionModel`]s for 2000 < Re < 4000
//!
//! Every hydraulic quantity is a pure function of geometry, fluid and a flow
//! rate, so a solver can evaluate candidate flows through [`Pipe::at`]
//! without mutating the pipe.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pn_components::{LinearBlend, Pipe};
//! use pn_core::units::{m, mm};
//! use pn_fluids::Fluid;
//!
//! let pipe = Pipe::new("b", "a", m(250.0), mm(300.0), m(0.00025), Arc::new(Fluid::water())).unwrap();
//! assert_eq!(pipe.name(), "a-b");
//!
//! let hl = pipe.at(40.0).friction_head_loss(&LinearBlend).unwrap();
//! assert!(hl > 0.0);
//! ```

pub mod common;
pub mod error;
pub mod friction;
pub mod pipe;
pub mod transition;

// Re-exports
pub use error::{ComponentError, ComponentResult};
pub use friction::{FlowRegime, colebrook, darcy_friction_factor};
pub use pipe::{DEFAULT_FLOW_LPS, Pipe, PipeFlow};
pub use transition::{LinearBlend, NormalScatter, TransitionBand, TransitionModel};
