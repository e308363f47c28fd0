use crate::PnError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PnError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PnError::NonFinite { what, value: v })
    }
}

/// Sign convention used for flow directions: zero counts as positive.
pub fn direction(v: Real) -> Real {
    if v >= 0.0 { 1.0 } else { -1.0 }
}

/// Largest absolute entry of a slice (0 for an empty slice).
pub fn max_abs(values: &[Real]) -> Real {
    values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}
