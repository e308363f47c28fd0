//! Common utilities for component calculations.

use crate::error::{ComponentError, ComponentResult};
use pn_core::numeric::ensure_finite;

/// Separator between endpoint names in a pipe name (`"a-b"`).
pub const NAME_SEPARATOR: char = '-';

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<f64> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonFinite { what, value })
}

/// Ensure a value is finite and strictly positive.
pub fn check_positive(value: f64, what: &'static str) -> ComponentResult<f64> {
    check_finite(value, what)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ComponentError::NonPhysical { what })
    }
}

/// Order two endpoint names so the lexicographically smaller one comes first.
pub fn canonical_endpoints<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Name of the pipe joining `a` and `b`, independent of argument order.
pub fn pipe_name(a: &str, b: &str) -> String {
    let (low, high) = canonical_endpoints(a, b);
    format!("{low}{NAME_SEPARATOR}{high}")
}

/// Canonicalize a pipe name written in either direction (`"e-a"` -> `"a-e"`).
///
/// Returns `None` when the name has no separator.
pub fn canonical_pipe_name(name: &str) -> Option<String> {
    let (a, b) = name.split_once(NAME_SEPARATOR)?;
    Some(pipe_name(a.trim(), b.trim()))
}
