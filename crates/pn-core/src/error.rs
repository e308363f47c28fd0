use thiserror::Error;

pub type PnResult<T> = Result<T, PnError>;

#[derive(Error, Debug)]
pub enum PnError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Not found: {what} '{name}'")]
    NotFound { what: &'static str, name: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
