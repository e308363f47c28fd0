//! Core network data structures.

use pn_components::{ComponentResult, Pipe, TransitionModel};
use pn_core::{LoopId, NodeId, PipeId};

/// A junction in the network.
///
/// Nodes are derived from pipe endpoints when the network is built; their
/// incident-pipe list is fixed from then on. Only the external flow changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    /// Pipes whose low or high end is this node.
    pub(crate) pipes: Vec<PipeId>,
    /// External supply (+) or demand (-) in L/s.
    pub(crate) external_flow: f64,
}

impl Node {
    pub fn pipes(&self) -> &[PipeId] {
        &self.pipes
    }

    pub fn external_flow(&self) -> f64 {
        self.external_flow
    }

    /// Net flow into the node at the pipes' current flows (L/s).
    pub fn net_flow_rate(&self, pipes: &[Pipe]) -> f64 {
        self.balance(pipes, |id| pipes[id.slot()].flow_rate())
    }

    /// Net flow into the node for a candidate flow vector indexed by pipe.
    pub fn net_flow_at(&self, pipes: &[Pipe], flows: &[f64]) -> f64 {
        self.balance(pipes, |id| flows[id.slot()])
    }

    fn balance(&self, pipes: &[Pipe], flow_of: impl Fn(PipeId) -> f64) -> f64 {
        self.pipes.iter().fold(self.external_flow, |acc, &id| {
            acc + pipes[id.slot()]
                .at(flow_of(id))
                .flow_contribution_to_node(&self.name)
        })
    }
}

/// An ordered cycle of pipes.
///
/// The walk starts at the low node of the first pipe and always leaves each
/// pipe through the end it did not enter by. Loops are validated when they are
/// added to a network, so the walk is continuous and closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop {
    pub id: LoopId,
    pub name: String,
    pub(crate) pipes: Vec<PipeId>,
}

impl Loop {
    pub fn pipes(&self) -> &[PipeId] {
        &self.pipes
    }

    /// Each pipe of the loop paired with the node the walk enters it from.
    pub fn walk<'a>(&'a self, pipes: &'a [Pipe]) -> LoopWalk<'a> {
        let current = self
            .pipes
            .first()
            .map(|id| pipes[id.slot()].low_node())
            .unwrap_or_default();
        LoopWalk {
            ids: self.pipes.iter(),
            pipes,
            current,
        }
    }

    /// Net head loss around the loop at the pipes' current flows (m).
    pub fn head_loss(&self, pipes: &[Pipe], model: &dyn TransitionModel) -> ComponentResult<f64> {
        self.walk(pipes)
            .try_fold(0.0, |acc, (id, from)| -> ComponentResult<f64> {
                Ok(acc + pipes[id.slot()].signed_head_loss(from, model)?)
            })
    }

    /// Net head loss around the loop for a candidate flow vector (m).
    pub fn head_loss_at(
        &self,
        pipes: &[Pipe],
        flows: &[f64],
        model: &dyn TransitionModel,
    ) -> ComponentResult<f64> {
        self.walk(pipes)
            .try_fold(0.0, |acc, (id, from)| -> ComponentResult<f64> {
                let pipe = pipes[id.slot()].at(flows[id.slot()]);
                Ok(acc + pipe.signed_head_loss(from, model)?)
            })
    }
}

/// Iterator over `(pipe, entry node)` pairs of a loop.
#[derive(Debug, Clone)]
pub struct LoopWalk<'a> {
    ids: std::slice::Iter<'a, PipeId>,
    pipes: &'a [Pipe],
    current: &'a str,
}

impl<'a> Iterator for LoopWalk<'a> {
    type Item = (PipeId, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let &id = self.ids.next()?;
        let pipe = &self.pipes[id.slot()];
        let from = self.current;
        self.current = pipe.other_end(from).unwrap_or(pipe.high_node());
        Some((id, from))
    }
}

/// Lifecycle of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStage {
    /// Nodes derived from pipes, no loops yet.
    NodesBuilt,
    /// At least one loop assigned; flows not solved for the current inputs.
    LoopsAssigned,
    /// Flows committed by a solver for the current inputs.
    Solved,
}

impl NetworkStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkStage::NodesBuilt => "nodes-built",
            NetworkStage::LoopsAssigned => "loops-assigned",
            NetworkStage::Solved => "solved",
        }
    }
}
