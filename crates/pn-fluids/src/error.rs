//! Fluid property errors.

use pn_core::PnError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur while building fluid properties.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (zero or negative viscosity, density).
    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },
}

impl From<FluidError> for PnError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::NonPhysical { what, value } => PnError::Invariant {
                what: format!("Non-physical fluid value for {}: {}", what, value),
            },
        }
    }
}
