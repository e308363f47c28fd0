//! Error types for component operations.

use pn_core::error::PnError;
use thiserror::Error;

/// Errors that can occur during component calculations.
#[derive(Error, Debug, Clone)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<ComponentError> for PnError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::NonPhysical { what } => PnError::InvalidArg { what },
            ComponentError::NonFinite { what, value } => PnError::NonFinite { what, value },
            ComponentError::ConvergenceFailed { what } => PnError::Invariant {
                what: format!("convergence failed: {}", what),
            },
            ComponentError::InvalidArg { what } => PnError::InvalidArg { what },
        }
    }
}
