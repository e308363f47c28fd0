//! Human and machine readable summary of a solved network.

use std::fmt;

use crate::error::SolverResult;
use crate::solve::FlowSolution;
use pn_core::numeric::max_abs;
use pn_graph::Network;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipeFlowEntry {
    pub name: String,
    /// Signed flow, low node to high node (L/s)
    pub flow_lps: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeBalanceEntry {
    pub name: String,
    /// Net flow into the node (L/s)
    pub net_flow_lps: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoopCheckEntry {
    pub name: String,
    /// Net head loss around the loop (m)
    pub head_loss_m: f64,
}

/// Pipe flows plus node and loop checks at the committed flows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowReport {
    pub converged: bool,
    pub iterations: usize,
    pub residual_norm: f64,
    pub pipes: Vec<PipeFlowEntry>,
    pub nodes: Vec<NodeBalanceEntry>,
    pub loops: Vec<LoopCheckEntry>,
}

impl FlowReport {
    /// Collect the report from a network holding committed flows.
    pub fn new(network: &Network, solution: &FlowSolution) -> SolverResult<Self> {
        let pipes = network
            .pipes()
            .iter()
            .map(|p| PipeFlowEntry {
                name: p.name(),
                flow_lps: p.flow_rate(),
            })
            .collect();

        let nodes = network
            .nodes()
            .iter()
            .zip(network.node_flow_rates())
            .map(|(n, q)| NodeBalanceEntry {
                name: n.name.clone(),
                net_flow_lps: q,
            })
            .collect();

        let loops = network
            .loops()
            .iter()
            .zip(network.loop_head_losses()?)
            .map(|(l, hl)| LoopCheckEntry {
                name: l.name.clone(),
                head_loss_m: hl,
            })
            .collect();

        Ok(Self {
            converged: solution.converged,
            iterations: solution.iterations,
            residual_norm: solution.residual_norm,
            pipes,
            nodes,
            loops,
        })
    }

    pub fn max_node_imbalance(&self) -> f64 {
        let flows: Vec<f64> = self.nodes.iter().map(|n| n.net_flow_lps).collect();
        max_abs(&flows)
    }

    pub fn max_loop_head_loss(&self) -> f64 {
        let losses: Vec<f64> = self.loops.iter().map(|l| l.head_loss_m).collect();
        max_abs(&losses)
    }
}

/// Two decimals, with negative zero printed as zero.
fn two_decimals(v: f64) -> String {
    let s = format!("{v:.2}");
    if s == "-0.00" { "0.00".to_string() } else { s }
}

impl fmt::Display for FlowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.pipes {
            writeln!(f, "The flow in segment {} is {} L/s", p.name, two_decimals(p.flow_lps))?;
        }
        writeln!(f)?;
        for n in &self.nodes {
            writeln!(f, "net flow into node {} is {}", n.name, two_decimals(n.net_flow_lps))?;
        }
        writeln!(f)?;
        for l in &self.loops {
            writeln!(f, "head loss for loop {} is {}", l.name, two_decimals(l.head_loss_m))?;
        }
        if !self.converged {
            writeln!(
                f,
                "\nwarning: solve did not converge after {} iterations (residual {:.3e})",
                self.iterations, self.residual_norm
            )?;
        }
        Ok(())
    }
}
