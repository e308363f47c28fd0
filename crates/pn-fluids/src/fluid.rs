//! Incompressible fluid property bundle.

use crate::error::{FluidError, FluidResult};
use pn_core::units::{DynVisc, Density, KinVisc, kg_per_m3, pa_s};

/// Dynamic viscosity of water near 20 °C (Pa·s).
pub const WATER_MU: f64 = 0.00089;

/// Density of water (kg/m³).
pub const WATER_RHO: f64 = 1000.0;

/// Immutable fluid properties.
///
/// The kinematic viscosity is always derived as `mu / rho`; there is no way
/// to set it independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fluid {
    mu: f64,
    rho: f64,
}

impl Fluid {
    /// Create a fluid from dynamic viscosity and density.
    pub fn new(mu: DynVisc, rho: Density) -> FluidResult<Self> {
        Self::from_si(mu.value, rho.value)
    }

    /// Create a fluid from raw SI values (Pa·s, kg/m³).
    pub fn from_si(mu: f64, rho: f64) -> FluidResult<Self> {
        if !(mu.is_finite() && mu > 0.0) {
            return Err(FluidError::NonPhysical {
                what: "dynamic viscosity",
                value: mu,
            });
        }
        if !(rho.is_finite() && rho > 0.0) {
            return Err(FluidError::NonPhysical {
                what: "density",
                value: rho,
            });
        }
        Ok(Self { mu, rho })
    }

    /// Water at roughly room temperature.
    pub fn water() -> Self {
        Self {
            mu: WATER_MU,
            rho: WATER_RHO,
        }
    }

    /// Dynamic viscosity (Pa·s).
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Density (kg/m³).
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Kinematic viscosity (m²/s).
    pub fn nu(&self) -> f64 {
        self.mu / self.rho
    }

    pub fn dynamic_viscosity(&self) -> DynVisc {
        pa_s(self.mu)
    }

    pub fn density(&self) -> Density {
        kg_per_m3(self.rho)
    }

    pub fn kinematic_viscosity(&self) -> KinVisc {
        use uom::si::diffusion_coefficient::square_meter_per_second;
        KinVisc::new::<square_meter_per_second>(self.nu())
    }
}

impl Default for Fluid {
    fn default() -> Self {
        Self::water()
    }
}
