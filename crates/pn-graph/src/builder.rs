//! Incremental network builder.

use std::collections::HashMap;
use std::sync::Arc;

use pn_components::{ComponentResult, LinearBlend, Pipe, TransitionModel};
use pn_core::units::Length;
use pn_core::{NodeId, PipeId};
use pn_fluids::Fluid;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Node, NetworkStage};
use crate::network::Network;
use crate::validate;

/// Builder for a pipe network.
///
/// Add pipes with `add_pipe`, then call `build()` to derive the nodes from
/// the pipe endpoints and freeze the topology into a [`Network`].
#[derive(Debug)]
pub struct NetworkBuilder {
    fluid: Arc<Fluid>,
    pipes: Vec<Pipe>,
    transition: Box<dyn TransitionModel>,
}

impl NetworkBuilder {
    /// Create an empty builder for pipes carrying `fluid`.
    pub fn new(fluid: Fluid) -> Self {
        Self {
            fluid: Arc::new(fluid),
            pipes: Vec::new(),
            transition: Box::new(LinearBlend),
        }
    }

    /// Use a different friction model for the transition band.
    pub fn transition_model(mut self, model: Box<dyn TransitionModel>) -> Self {
        self.transition = model;
        self
    }

    /// Shared fluid handed to every pipe created by `add_pipe`.
    pub fn fluid(&self) -> Arc<Fluid> {
        Arc::clone(&self.fluid)
    }

    /// Add a pipe between `a` and `b` and return its ID.
    pub fn add_pipe(
        &mut self,
        a: impl Into<String>,
        b: impl Into<String>,
        length: Length,
        diameter: Length,
        roughness: Length,
    ) -> ComponentResult<PipeId> {
        let pipe = Pipe::new(a, b, length, diameter, roughness, self.fluid())?;
        Ok(self.push_pipe(pipe))
    }

    /// Add an already constructed pipe.
    pub fn push_pipe(&mut self, pipe: Pipe) -> PipeId {
        let id = PipeId::from_usize(self.pipes.len());
        self.pipes.push(pipe);
        id
    }

    pub fn pipe_count(&self) -> usize {
        self.pipes.len()
    }

    /// Derive nodes, validate, and return the network.
    pub fn build(self) -> GraphResult<Network> {
        if self.pipes.is_empty() {
            return Err(GraphError::Empty);
        }
        validate::validate_unique_pipes(&self.pipes)?;

        let nodes = Self::derive_nodes(&self.pipes);
        validate::validate_incidence(&nodes, &self.pipes)?;

        Ok(Network {
            fluid: self.fluid,
            pipes: self.pipes,
            nodes,
            loops: Vec::new(),
            transition: self.transition,
            stage: NetworkStage::NodesBuilt,
        })
    }

    /// One node per distinct endpoint, in first-seen order (low end before high end).
    fn derive_nodes(pipes: &[Pipe]) -> Vec<Node> {
        let mut index: HashMap<&str, NodeId> = HashMap::new();
        let mut nodes: Vec<Node> = Vec::new();

        for pipe in pipes {
            for end in [pipe.low_node(), pipe.high_node()] {
                if index.contains_key(end) {
                    continue;
                }
                let id = NodeId::from_usize(nodes.len());
                index.insert(end, id);
                nodes.push(Node {
                    id,
                    name: end.to_string(),
                    pipes: Self::incident_pipes(pipes, end),
                    external_flow: 0.0,
                });
            }
        }

        nodes
    }

    fn incident_pipes(pipes: &[Pipe], node: &str) -> Vec<PipeId> {
        pipes
            .iter()
            .enumerate()
            .filter(|(_, p)| p.contains_node(node))
            .map(|(i, _)| PipeId::from_usize(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pn_core::units::{m, mm};

    fn add(builder: &mut NetworkBuilder, a: &str, b: &str) -> PipeId {
        builder
            .add_pipe(a, b, m(100.0), mm(200.0), m(0.00025))
            .unwrap()
    }

    #[test]
    fn builder_basic() {
        let mut builder = NetworkBuilder::new(Fluid::water());
        let p0 = add(&mut builder, "a", "b");
        let p1 = add(&mut builder, "c", "b");
        assert_eq!(p0.index(), 0);
        assert_eq!(p1.index(), 1);
        assert_eq!(builder.pipe_count(), 2);
    }

    #[test]
    fn nodes_in_first_seen_order() {
        let mut builder = NetworkBuilder::new(Fluid::water());
        add(&mut builder, "b", "a");
        add(&mut builder, "c", "b");
        let net = builder.build().unwrap();
        let names: Vec<&str> = net.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(net.nodes()[1].pipes().len(), 2);
    }

    #[test]
    fn pipes_share_one_fluid() {
        let mut builder = NetworkBuilder::new(Fluid::water());
        add(&mut builder, "a", "b");
        add(&mut builder, "b", "c");
        let net = builder.build().unwrap();
        let first = net.pipes()[0].fluid() as *const Fluid;
        let second = net.pipes()[1].fluid() as *const Fluid;
        assert_eq!(first, second);
    }

    #[test]
    fn empty_builder_fails() {
        let builder = NetworkBuilder::new(Fluid::water());
        assert!(matches!(builder.build(), Err(GraphError::Empty)));
    }

    #[test]
    fn duplicate_pipe_fails() {
        let mut builder = NetworkBuilder::new(Fluid::water());
        add(&mut builder, "a", "b");
        add(&mut builder, "b", "a");
        assert!(matches!(
            builder.build(),
            Err(GraphError::DuplicatePipe { .. })
        ));
    }

    #[test]
    fn invalid_pipe_is_reported_by_add() {
        let mut builder = NetworkBuilder::new(Fluid::water());
        assert!(builder.add_pipe("a", "a", m(1.0), mm(100.0), m(0.0)).is_err());
        assert_eq!(builder.pipe_count(), 0);
    }
}
