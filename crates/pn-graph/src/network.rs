//! The assembled pipe network.

use std::sync::Arc;

use pn_components::common::canonical_pipe_name;
use pn_components::{ComponentResult, Pipe, TransitionModel};
use pn_core::{LoopId, NodeId, PipeId};
use pn_fluids::Fluid;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Loop, NetworkStage, Node};
use crate::validate;

/// A looped pipe network: pipes, derived nodes, declared loops and the
/// friction model used in the transition band.
///
/// The network owns every pipe; nodes and loops refer to pipes by [`PipeId`].
#[derive(Debug)]
pub struct Network {
    pub(crate) fluid: Arc<Fluid>,
    pub(crate) pipes: Vec<Pipe>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) loops: Vec<Loop>,
    pub(crate) transition: Box<dyn TransitionModel>,
    pub(crate) stage: NetworkStage,
}

impl Network {
    pub fn fluid(&self) -> &Fluid {
        &self.fluid
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn loops(&self) -> &[Loop] {
        &self.loops
    }

    pub fn stage(&self) -> NetworkStage {
        self.stage
    }

    pub fn pipe(&self, id: PipeId) -> Option<&Pipe> {
        self.pipes.get(id.slot())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot())
    }

    pub fn get_loop(&self, id: LoopId) -> Option<&Loop> {
        self.loops.get(id.slot())
    }

    pub fn transition_model(&self) -> &dyn TransitionModel {
        self.transition.as_ref()
    }

    /// Swap the transition-band model. Previously committed flows are kept.
    pub fn set_transition_model(&mut self, model: Box<dyn TransitionModel>) {
        self.transition = model;
        self.invalidate();
    }

    /// Look up a pipe by name; `"b-a"` finds pipe `a-b`.
    pub fn find_pipe_by_name(&self, name: &str) -> Option<&Pipe> {
        self.pipe_id_by_name(name).and_then(|id| self.pipe(id))
    }

    pub fn pipe_id_by_name(&self, name: &str) -> Option<PipeId> {
        self.position_of_pipe(name).or_else(|| {
            let canonical = canonical_pipe_name(name)?;
            self.position_of_pipe(&canonical)
        })
    }

    fn position_of_pipe(&self, name: &str) -> Option<PipeId> {
        self.pipes
            .iter()
            .position(|p| p.name() == name)
            .map(PipeId::from_usize)
    }

    /// Pipes with `node` at either end, in pipe order.
    pub fn pipes_incident_to(&self, node: &str) -> Vec<&Pipe> {
        self.find_node(node)
            .map(|n| n.pipes().iter().map(|id| &self.pipes[id.slot()]).collect())
            .unwrap_or_default()
    }

    pub fn node_exists(&self, name: &str) -> bool {
        self.find_node(name).is_some()
    }

    pub fn find_node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn node_id_by_name(&self, name: &str) -> Option<NodeId> {
        self.find_node(name).map(|n| n.id)
    }

    /// Set the external flow at a node (L/s, + into the node).
    pub fn set_external_flow(&mut self, name: &str, flow: f64) -> GraphResult<()> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.name == name)
            .ok_or_else(|| GraphError::UnknownNode {
                name: name.to_string(),
            })?;
        node.external_flow = flow;
        self.invalidate();
        Ok(())
    }

    /// Sum of all external flows (L/s). Zero for a balanced network.
    pub fn total_external_flow(&self) -> f64 {
        self.nodes.iter().map(Node::external_flow).sum()
    }

    /// Declare a loop from an ordered list of pipe names.
    ///
    /// Pipe names may be given with their endpoints in either order. The loop
    /// must be a closed walk that starts at the low node of its first pipe.
    pub fn add_loop<I, S>(&mut self, name: impl Into<String>, pipe_names: I) -> GraphResult<LoopId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();
        if self.loops.iter().any(|l| l.name == name) {
            return Err(GraphError::DuplicateLoop { name });
        }

        let ids = pipe_names
            .into_iter()
            .map(|pipe| {
                let pipe = pipe.as_ref();
                self.pipe_id_by_name(pipe)
                    .ok_or_else(|| GraphError::UnknownPipe {
                        loop_name: name.clone(),
                        pipe: pipe.to_string(),
                    })
            })
            .collect::<GraphResult<Vec<_>>>()?;

        validate::validate_loop_walk(&name, &ids, &self.pipes)?;

        let id = LoopId::from_usize(self.loops.len());
        self.loops.push(Loop {
            id,
            name,
            pipes: ids,
        });
        self.stage = NetworkStage::LoopsAssigned;
        Ok(id)
    }

    /// Current pipe flows (L/s), indexed by pipe.
    pub fn flows(&self) -> Vec<f64> {
        self.pipes.iter().map(Pipe::flow_rate).collect()
    }

    /// Write a solved flow vector back into the pipes.
    pub fn commit_flows(&mut self, flows: &[f64]) -> GraphResult<()> {
        self.write_flows(flows)?;
        self.stage = NetworkStage::Solved;
        Ok(())
    }

    /// Write an unconverged iterate back into the pipes.
    ///
    /// The flows become readable, but the network leaves `Solved` so that
    /// callers checking the stage do not mistake the iterate for a solution.
    pub fn commit_iterate(&mut self, flows: &[f64]) -> GraphResult<()> {
        self.write_flows(flows)?;
        self.invalidate();
        Ok(())
    }

    fn write_flows(&mut self, flows: &[f64]) -> GraphResult<()> {
        if flows.len() != self.pipes.len() {
            return Err(GraphError::FlowLength {
                expected: self.pipes.len(),
                actual: flows.len(),
            });
        }
        for (pipe, &q) in self.pipes.iter_mut().zip(flows) {
            pipe.set_flow_rate(q);
        }
        Ok(())
    }

    /// Net flow into each node at the current pipe flows (L/s).
    pub fn node_flow_rates(&self) -> Vec<f64> {
        self.nodes
            .iter()
            .map(|n| n.net_flow_rate(&self.pipes))
            .collect()
    }

    /// Net head loss around each loop at the current pipe flows (m).
    pub fn loop_head_losses(&self) -> ComponentResult<Vec<f64>> {
        self.loops
            .iter()
            .map(|l| l.head_loss(&self.pipes, self.transition.as_ref()))
            .collect()
    }

    fn invalidate(&mut self) {
        if self.stage == NetworkStage::Solved {
            self.stage = if self.loops.is_empty() {
                NetworkStage::NodesBuilt
            } else {
                NetworkStage::LoopsAssigned
            };
        }
    }
}
