//! Pipe segment with Darcy–Weisbach friction.

use crate::common::{
    NAME_SEPARATOR, canonical_endpoints, check_finite, check_positive, pipe_name,
};
use crate::error::{ComponentError, ComponentResult};
use crate::friction::{FlowRegime, darcy_friction_factor};
use crate::transition::TransitionModel;
use pn_core::numeric::direction;
use pn_core::units::constants::{G_MPS2, LITERS_PER_M3};
use pn_core::units::{Length, VolumeRate, lps, to_lps};
use pn_fluids::Fluid;
use std::sync::Arc;
use uom::si::length::meter;

/// Flow assigned to a freshly built pipe (L/s).
///
/// Non-zero so that every derived quantity is defined before the first solve.
pub const DEFAULT_FLOW_LPS: f64 = 10.0;

/// A pipe segment between two named nodes.
///
/// Endpoints are stored in canonical order (`low_node <= high_node`), so the
/// pipe's name does not depend on the order they were given in. The sign of
/// the flow rate carries the direction: positive means low → high.
///
/// Geometry is stored in SI (m); the flow rate is in L/s.
#[derive(Debug, Clone)]
pub struct Pipe {
    low_node: String,
    high_node: String,
    /// Pipe length (m)
    length: f64,
    /// Inner diameter (m)
    diameter: f64,
    /// Absolute wall roughness (m)
    roughness: f64,
    fluid: Arc<Fluid>,
    /// Volumetric flow rate (L/s), low → high positive
    flow_rate: f64,
}

impl Pipe {
    /// Create a new pipe between `a` and `b`.
    pub fn new(
        a: impl Into<String>,
        b: impl Into<String>,
        length: Length,
        diameter: Length,
        roughness: Length,
        fluid: Arc<Fluid>,
    ) -> ComponentResult<Self> {
        let a = a.into();
        let b = b.into();
        if a.is_empty() || b.is_empty() {
            return Err(ComponentError::InvalidArg {
                what: "pipe endpoint name is empty",
            });
        }
        if a.contains(NAME_SEPARATOR) || b.contains(NAME_SEPARATOR) {
            return Err(ComponentError::InvalidArg {
                what: "pipe endpoint name contains the name separator",
            });
        }
        if a == b {
            return Err(ComponentError::InvalidArg {
                what: "pipe endpoints must differ",
            });
        }

        let length = check_positive(length.get::<meter>(), "pipe length")?;
        let diameter = check_positive(diameter.get::<meter>(), "pipe diameter")?;
        let roughness = check_finite(roughness.get::<meter>(), "pipe roughness")?;
        if roughness < 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "pipe roughness",
            });
        }

        let (low, high) = canonical_endpoints(&a, &b);
        Ok(Self {
            low_node: low.to_string(),
            high_node: high.to_string(),
            length,
            diameter,
            roughness,
            fluid,
            flow_rate: DEFAULT_FLOW_LPS,
        })
    }

    /// `"{low}-{high}"`.
    pub fn name(&self) -> String {
        pipe_name(&self.low_node, &self.high_node)
    }

    pub fn low_node(&self) -> &str {
        &self.low_node
    }

    pub fn high_node(&self) -> &str {
        &self.high_node
    }

    /// Does the pipe connect to `node`?
    pub fn contains_node(&self, node: &str) -> bool {
        node == self.low_node || node == self.high_node
    }

    /// Endpoint across the pipe from `node`, if `node` is an endpoint.
    pub fn other_end(&self, node: &str) -> Option<&str> {
        if node == self.low_node {
            Some(&self.high_node)
        } else if node == self.high_node {
            Some(&self.low_node)
        } else {
            None
        }
    }

    /// Length (m).
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Inner diameter (m).
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    /// Absolute roughness (m).
    pub fn roughness(&self) -> f64 {
        self.roughness
    }

    pub fn fluid(&self) -> &Fluid {
        &self.fluid
    }

    /// Cross-section area (m²).
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.diameter.powi(2) / 4.0
    }

    pub fn relative_roughness(&self) -> f64 {
        self.roughness / self.diameter
    }

    /// Current flow rate (L/s).
    pub fn flow_rate(&self) -> f64 {
        self.flow_rate
    }

    pub fn set_flow_rate(&mut self, flow_rate: f64) {
        self.flow_rate = flow_rate;
    }

    /// Current flow rate as a dimensioned quantity.
    pub fn volume_flow(&self) -> VolumeRate {
        lps(self.flow_rate)
    }

    pub fn set_volume_flow(&mut self, flow: VolumeRate) {
        self.flow_rate = to_lps(flow);
    }

    /// Hydraulics of this pipe at an arbitrary flow, leaving the stored flow untouched.
    pub fn at(&self, flow_rate: f64) -> PipeFlow<'_> {
        PipeFlow {
            pipe: self,
            flow_rate,
        }
    }

    /// Hydraulics at the stored flow.
    pub fn current(&self) -> PipeFlow<'_> {
        self.at(self.flow_rate)
    }

    /// Mean velocity (m/s).
    pub fn velocity(&self) -> f64 {
        self.current().velocity()
    }

    pub fn reynolds(&self) -> f64 {
        self.current().reynolds()
    }

    pub fn regime(&self) -> FlowRegime {
        self.current().regime()
    }

    pub fn friction_factor(&self, model: &dyn TransitionModel) -> ComponentResult<f64> {
        self.current().friction_factor(model)
    }

    /// Unsigned head loss (m of fluid).
    pub fn friction_head_loss(&self, model: &dyn TransitionModel) -> ComponentResult<f64> {
        self.current().friction_head_loss(model)
    }

    /// Head loss seen by a loop walk entering at `from_node`.
    pub fn signed_head_loss(
        &self,
        from_node: &str,
        model: &dyn TransitionModel,
    ) -> ComponentResult<f64> {
        self.current().signed_head_loss(from_node, model)
    }

    /// Flow into `node` through this pipe (L/s).
    pub fn flow_contribution_to_node(&self, node: &str) -> f64 {
        self.current().flow_contribution_to_node(node)
    }
}

/// A pipe evaluated at one particular flow rate.
///
/// Every quantity is computed on demand; nothing is cached.
#[derive(Debug, Clone, Copy)]
pub struct PipeFlow<'a> {
    pipe: &'a Pipe,
    flow_rate: f64,
}

impl PipeFlow<'_> {
    pub fn flow_rate(&self) -> f64 {
        self.flow_rate
    }

    /// Mean velocity (m/s), signed like the flow.
    pub fn velocity(&self) -> f64 {
        self.flow_rate / (LITERS_PER_M3 * self.pipe.area())
    }

    /// Reynolds number, signed like the flow.
    pub fn reynolds(&self) -> f64 {
        let fluid = self.pipe.fluid();
        fluid.rho() * self.velocity() * self.pipe.diameter / fluid.mu()
    }

    pub fn regime(&self) -> FlowRegime {
        FlowRegime::classify(self.reynolds())
    }

    pub fn friction_factor(&self, model: &dyn TransitionModel) -> ComponentResult<f64> {
        darcy_friction_factor(self.reynolds(), self.pipe.relative_roughness(), model)
    }

    /// Darcy–Weisbach head loss, `f (L/D) v² / (2g)`.
    pub fn friction_head_loss(&self, model: &dyn TransitionModel) -> ComponentResult<f64> {
        let v = self.velocity();
        if v == 0.0 {
            return Ok(0.0);
        }
        let f = self.friction_factor(model)?;
        let hl = f * (self.pipe.length / self.pipe.diameter) * v.powi(2) / (2.0 * G_MPS2);
        check_finite(hl, "head loss")
    }

    /// Head loss signed by traversal direction and flow direction.
    pub fn signed_head_loss(
        &self,
        from_node: &str,
        model: &dyn TransitionModel,
    ) -> ComponentResult<f64> {
        let traverse = if from_node == self.pipe.low_node {
            1.0
        } else {
            -1.0
        };
        Ok(traverse * direction(self.flow_rate) * self.friction_head_loss(model)?)
    }

    /// Flow leaving through the low end counts as outflow from the low node.
    pub fn flow_contribution_to_node(&self, node: &str) -> f64 {
        if node == self.pipe.low_node {
            -self.flow_rate
        } else {
            self.flow_rate
        }
    }
}
