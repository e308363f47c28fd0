//! Topology validation logic.

use std::collections::HashSet;

use pn_components::Pipe;
use pn_core::PipeId;

use crate::error::{GraphError, GraphResult};
use crate::graph::Node;

/// Check that every node's incident list is exactly the pipes touching it.
pub(crate) fn validate_incidence(nodes: &[Node], pipes: &[Pipe]) -> GraphResult<()> {
    for node in nodes {
        // Listed pipes must touch the node
        for &id in node.pipes() {
            let pipe = &pipes[id.slot()];
            if !pipe.contains_node(&node.name) {
                return Err(GraphError::InconsistentAdjacency {
                    node: node.name.clone(),
                    pipe: pipe.name(),
                });
            }
        }

        // Touching pipes must be listed
        for (i, pipe) in pipes.iter().enumerate() {
            if pipe.contains_node(&node.name) && !node.pipes().contains(&PipeId::from_usize(i)) {
                return Err(GraphError::InconsistentAdjacency {
                    node: node.name.clone(),
                    pipe: pipe.name(),
                });
            }
        }
    }
    Ok(())
}

/// Check that pipe names are unique.
pub(crate) fn validate_unique_pipes(pipes: &[Pipe]) -> GraphResult<()> {
    let mut seen = HashSet::new();
    for pipe in pipes {
        let name = pipe.name();
        if !seen.insert(name.clone()) {
            return Err(GraphError::DuplicatePipe { name });
        }
    }
    Ok(())
}

/// Check that a loop is a continuous closed walk starting at its first pipe's low node.
pub(crate) fn validate_loop_walk(loop_name: &str, ids: &[PipeId], pipes: &[Pipe]) -> GraphResult<()> {
    let Some(first) = ids.first() else {
        return Err(GraphError::EmptyLoop {
            loop_name: loop_name.to_string(),
        });
    };

    let mut used = HashSet::new();
    for &id in ids {
        if !used.insert(id) {
            return Err(GraphError::RepeatedPipe {
                loop_name: loop_name.to_string(),
                pipe: pipes[id.slot()].name(),
            });
        }
    }

    let start = pipes[first.slot()].low_node();
    let mut current = start;
    for &id in ids {
        let pipe = &pipes[id.slot()];
        current = pipe.other_end(current).ok_or_else(|| GraphError::BrokenLoop {
            loop_name: loop_name.to_string(),
            pipe: pipe.name(),
            node: current.to_string(),
        })?;
    }

    if current != start {
        return Err(GraphError::OpenLoop {
            loop_name: loop_name.to_string(),
            start: start.to_string(),
            end: current.to_string(),
        });
    }
    Ok(())
}
