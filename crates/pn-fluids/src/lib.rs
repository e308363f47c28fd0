//! pn-fluids: incompressible fluid properties for pipenet.
//!
//! A [`Fluid`] is an immutable bundle of dynamic viscosity and density with
//! the kinematic viscosity derived from them. Pipes share one fluid through
//! an `Arc`, so every pipe in a network sees the same properties.
//!
//! # Example
//!
//! ```
//! use pn_core::units::{kg_per_m3, pa_s};
//! use pn_fluids::Fluid;
//!
//! let water = Fluid::new(pa_s(0.00089), kg_per_m3(1000.0)).unwrap();
//! assert!((water.nu() - 8.9e-7).abs() < 1e-15);
//! ```

pub mod error;
pub mod fluid;

// Re-exports for ergonomics
pub use error::{FluidError, FluidResult};
pub use fluid::Fluid;
