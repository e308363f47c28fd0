//! Friction models for the laminar–turbulent transition band.
//!
//! Between Re = 2000 and Re = 4000 there is no physical closed form for the
//! friction factor. The band is described by a [`TransitionBand`] (laminar and
//! turbulent values at the same Reynolds number) and a [`TransitionModel`]
//! turns it into a single friction factor.

use crate::error::{ComponentError, ComponentResult};
use crate::friction::{LAMINAR_LIMIT, TURBULENT_LIMIT};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use std::cell::RefCell;
use std::fmt;

/// Laminar and turbulent friction factors evaluated at one transitional Re.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionBand {
    pub reynolds: f64,
    pub laminar: f64,
    pub turbulent: f64,
}

impl TransitionBand {
    /// Fractional position of Re inside [2000, 4000].
    pub fn weight(&self) -> f64 {
        ((self.reynolds - LAMINAR_LIMIT) / (TURBULENT_LIMIT - LAMINAR_LIMIT)).clamp(0.0, 1.0)
    }

    /// Linear interpolation between the laminar and turbulent values.
    pub fn mean(&self) -> f64 {
        self.laminar + (self.turbulent - self.laminar) * self.weight()
    }
}

/// Strategy for the friction factor inside the transition band.
pub trait TransitionModel: fmt::Debug {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// Friction factor for a transitional flow.
    fn friction_factor(&self, band: &TransitionBand) -> ComponentResult<f64>;
}

/// Deterministic model: the interpolated mean, nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearBlend;

impl TransitionModel for LinearBlend {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn friction_factor(&self, band: &TransitionBand) -> ComponentResult<f64> {
        Ok(band.mean())
    }
}

/// Default spread of [`NormalScatter`] relative to the mean.
pub const DEFAULT_RELATIVE_SPREAD: f64 = 0.2;

/// Stochastic model: a normal draw centred on the interpolated mean.
///
/// The generator is owned by the model and must be seeded explicitly, so two
/// models built from the same seed produce the same sequence.
#[derive(Debug)]
pub struct NormalScatter {
    rng: RefCell<StdRng>,
    relative_spread: f64,
}

impl NormalScatter {
    /// Model with a seeded `StdRng` and a standard deviation of 0.2 × mean.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: RefCell::new(rng),
            relative_spread: DEFAULT_RELATIVE_SPREAD,
        }
    }

    /// Override the standard deviation as a fraction of the mean.
    pub fn with_relative_spread(mut self, relative_spread: f64) -> ComponentResult<Self> {
        if !(relative_spread.is_finite() && relative_spread >= 0.0) {
            return Err(ComponentError::InvalidArg {
                what: "relative spread must be finite and non-negative",
            });
        }
        self.relative_spread = relative_spread;
        Ok(self)
    }

    pub fn relative_spread(&self) -> f64 {
        self.relative_spread
    }
}

impl TransitionModel for NormalScatter {
    fn name(&self) -> &'static str {
        "scatter"
    }

    fn friction_factor(&self, band: &TransitionBand) -> ComponentResult<f64> {
        let mean = band.mean();
        let normal = Normal::new(mean, self.relative_spread * mean.abs()).map_err(|_| {
            ComponentError::InvalidArg {
                what: "transitional friction distribution",
            }
        })?;
        Ok(normal.sample(&mut *self.rng.borrow_mut()))
    }
}
