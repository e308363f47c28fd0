//! Darcy friction factor correlations.
//!
//! The regime is chosen from the Reynolds number magnitude:
//! - `Re <= 2000`: laminar, `f = 64 / Re`
//! - `Re >= 4000`: turbulent, implicit Colebrook–White equation
//! - in between: a [`TransitionModel`] blends the two

use crate::common::check_finite;
use crate::error::{ComponentError, ComponentResult};
use crate::transition::{TransitionBand, TransitionModel};

/// Upper Reynolds number of the laminar regime (inclusive).
pub const LAMINAR_LIMIT: f64 = 2000.0;

/// Lower Reynolds number of the turbulent regime (inclusive).
pub const TURBULENT_LIMIT: f64 = 4000.0;

/// Starting friction factor for the Colebrook iteration.
pub const COLEBROOK_SEED: f64 = 0.02;

const COLEBROOK_MAX_ITER: usize = 50;
const COLEBROOK_REL_TOL: f64 = 1e-13;

/// Flow regime implied by a Reynolds number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRegime {
    Laminar,
    Transitional,
    Turbulent,
}

impl FlowRegime {
    /// Classify by magnitude, so reversed flows land in the same regime.
    pub fn classify(reynolds: f64) -> Self {
        let re = reynolds.abs();
        if re <= LAMINAR_LIMIT {
            FlowRegime::Laminar
        } else if re >= TURBULENT_LIMIT {
            FlowRegime::Turbulent
        } else {
            FlowRegime::Transitional
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowRegime::Laminar => "laminar",
            FlowRegime::Transitional => "transitional",
            FlowRegime::Turbulent => "turbulent",
        }
    }
}

/// Hagen–Poiseuille friction factor.
pub fn laminar(reynolds: f64) -> ComponentResult<f64> {
    let re = check_reynolds(reynolds)?;
    Ok(64.0 / re)
}

/// Solve Colebrook–White for the Darcy friction factor.
///
/// Iterates Newton's method on `x = 1/sqrt(f)`, where the equation
/// `x + 2 log10(rr/3.7 + 2.51 x / Re) = 0` is monotone and concave, starting
/// from `f = 0.02`.
pub fn colebrook(reynolds: f64, relative_roughness: f64) -> ComponentResult<f64> {
    let re = check_reynolds(reynolds)?;
    check_finite(relative_roughness, "relative roughness")?;
    if relative_roughness < 0.0 {
        return Err(ComponentError::NonPhysical {
            what: "relative roughness",
        });
    }

    let a = relative_roughness / 3.7;
    let b = 2.51 / re;
    let ln10 = std::f64::consts::LN_10;

    let mut x = 1.0 / COLEBROOK_SEED.sqrt();
    for _ in 0..COLEBROOK_MAX_ITER {
        let arg = a + b * x;
        let g = x + 2.0 * arg.log10();
        let dg = 1.0 + 2.0 * b / (arg * ln10);
        let dx = g / dg;
        x -= dx;

        if !x.is_finite() || x <= 0.0 {
            return Err(ComponentError::ConvergenceFailed {
                what: "Colebrook iterate left the physical range",
            });
        }
        if dx.abs() <= COLEBROOK_REL_TOL * x {
            return Ok(1.0 / (x * x));
        }
    }

    Err(ComponentError::ConvergenceFailed {
        what: "Colebrook iteration limit reached",
    })
}

/// Laminar and turbulent values at a transitional Reynolds number.
pub fn transition_band(reynolds: f64, relative_roughness: f64) -> ComponentResult<TransitionBand> {
    let re = check_reynolds(reynolds)?;
    Ok(TransitionBand {
        reynolds: re,
        laminar: laminar(re)?,
        turbulent: colebrook(re, relative_roughness)?,
    })
}

/// Darcy friction factor for any regime.
pub fn darcy_friction_factor(
    reynolds: f64,
    relative_roughness: f64,
    model: &dyn TransitionModel,
) -> ComponentResult<f64> {
    let re = check_reynolds(reynolds)?;
    let f = match FlowRegime::classify(re) {
        FlowRegime::Laminar => laminar(re)?,
        FlowRegime::Turbulent => colebrook(re, relative_roughness)?,
        FlowRegime::Transitional => {
            model.friction_factor(&transition_band(re, relative_roughness)?)?
        }
    };
    check_finite(f, "friction factor")
}

fn check_reynolds(reynolds: f64) -> ComponentResult<f64> {
    let re = check_finite(reynolds, "Reynolds number")?.abs();
    if re == 0.0 {
        return Err(ComponentError::NonPhysical {
            what: "friction factor at zero Reynolds number",
        });
    }
    Ok(re)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::{LinearBlend, NormalScatter};
    use proptest::prelude::*;

    fn colebrook_residual(f: f64, re: f64, rr: f64) -> f64 {
        1.0 / f.sqrt() + 2.0 * (rr / 3.7 + 2.51 / (re * f.sqrt())).log10()
    }

    #[test]
    fn laminar_boundary_is_closed_form() {
        let f = darcy_friction_factor(2000.0, 1e-3, &LinearBlend).unwrap();
        assert!((f - 0.032).abs() < 1e-15);
    }

    #[test]
    fn turbulent_boundary_uses_colebrook() {
        let rr = 0.00025 / 0.2;
        let f = darcy_friction_factor(4000.0, rr, &NormalScatter::seeded(1)).unwrap();
        let expected = colebrook(4000.0, rr).unwrap();
        assert_eq!(f, expected);
        assert!(colebrook_residual(f, 4000.0, rr).abs() < 1e-10);
    }

    #[test]
    fn colebrook_matches_moody_chart() {
        // Smooth-ish pipe at Re = 1e5: f ~ 0.0185 on the Moody chart.
        let f = colebrook(1.0e5, 1.0e-4).unwrap();
        assert!((f - 0.0185).abs() < 5e-4, "f = {f}");
        assert!(colebrook_residual(f, 1.0e5, 1.0e-4).abs() < 1e-10);
    }

    #[test]
    fn colebrook_smooth_pipe() {
        let f = colebrook(1.0e6, 0.0).unwrap();
        assert!((f - 0.0116).abs() < 3e-4, "f = {f}");
    }

    #[test]
    fn rougher_pipes_have_more_friction() {
        let smooth = colebrook(1.0e5, 1.0e-5).unwrap();
        let rough = colebrook(1.0e5, 1.0e-2).unwrap();
        assert!(rough > smooth);
    }

    #[test]
    fn reversed_flow_uses_magnitude() {
        let forward = darcy_friction_factor(5.0e4, 1e-3, &LinearBlend).unwrap();
        let reverse = darcy_friction_factor(-5.0e4, 1e-3, &LinearBlend).unwrap();
        assert_eq!(forward, reverse);
        assert_eq!(FlowRegime::classify(-1500.0), FlowRegime::Laminar);
    }

    #[test]
    fn zero_reynolds_is_non_physical() {
        assert!(matches!(
            darcy_friction_factor(0.0, 1e-3, &LinearBlend),
            Err(ComponentError::NonPhysical { .. })
        ));
    }

    #[test]
    fn negative_roughness_is_rejected() {
        assert!(colebrook(1.0e5, -1e-3).is_err());
    }

    #[test]
    fn linear_blend_is_continuous_at_band_edges() {
        let rr = 1.25e-3;
        let below = darcy_friction_factor(2000.0, rr, &LinearBlend).unwrap();
        let just_above = darcy_friction_factor(2000.0 + 1e-6, rr, &LinearBlend).unwrap();
        assert!((below - just_above).abs() < 1e-8);

        let at_turbulent = darcy_friction_factor(4000.0, rr, &LinearBlend).unwrap();
        let just_below = darcy_friction_factor(4000.0 - 1e-6, rr, &LinearBlend).unwrap();
        assert!((at_turbulent - just_below).abs() < 1e-8);
    }

    fn scatter_mean(re: f64, rr: f64, samples: usize) -> f64 {
        let model = NormalScatter::seeded(2024);
        let total: f64 = (0..samples)
            .map(|_| darcy_friction_factor(re, rr, &model).unwrap())
            .sum();
        total / samples as f64
    }

    #[test]
    fn scatter_mean_approaches_laminar_edge() {
        let rr = 1.25e-3;
        let mean = scatter_mean(2001.0, rr, 20_000);
        let laminar_edge = laminar(2000.0).unwrap();
        assert!((mean - laminar_edge).abs() / laminar_edge < 0.01, "mean = {mean}");
    }

    #[test]
    fn scatter_mean_approaches_turbulent_edge() {
        let rr = 1.25e-3;
        let mean = scatter_mean(3999.0, rr, 20_000);
        let turbulent_edge = colebrook(4000.0, rr).unwrap();
        assert!((mean - turbulent_edge).abs() / turbulent_edge < 0.01, "mean = {mean}");
    }

    proptest! {
        #[test]
        fn colebrook_root_satisfies_equation(re in 4.0e3_f64..1.0e8, rr in 0.0_f64..0.05) {
            let f = colebrook(re, rr).unwrap();
            prop_assert!(f > 0.0);
            prop_assert!(colebrook_residual(f, re, rr).abs() < 1e-8);
        }

        #[test]
        fn linear_blend_stays_between_edges(re in 2000.5_f64..3999.5, rr in 0.0_f64..0.05) {
            let band = transition_band(re, rr).unwrap();
            let f = darcy_friction_factor(re, rr, &LinearBlend).unwrap();
            let lo = band.laminar.min(band.turbulent);
            let hi = band.laminar.max(band.turbulent);
            prop_assert!(f >= lo - 1e-15 && f <= hi + 1e-15);
        }
    }
}
