//! Residual assembly for the looped flow problem.
//!
//! Unknowns are the pipe flows (L/s), one per pipe, in pipe order. Equations
//! are the net flow into every node except the reference node, followed by
//! the head loss around every loop:
//!
//! ```text
//! r = [ balance(n) for n != reference ] ++ [ head_loss(l) for l in loops ]
//! ```
//!
//! The residual never writes into the network; candidate flows are evaluated
//! through [`pn_components::Pipe::at`].

use crate::error::{SolverError, SolverResult};
use nalgebra::DVector;
use pn_core::numeric::{Tolerances, nearly_equal};
use pn_core::NodeId;
use pn_graph::Network;

/// A network paired with the choice of dropped node equation.
#[derive(Debug)]
pub struct FlowProblem<'a> {
    network: &'a Network,
    reference: NodeId,
}

impl<'a> FlowProblem<'a> {
    /// Check the network can be solved and pick the reference node.
    ///
    /// `reference_node` defaults to the first derived node. Fails with
    /// `ProblemSetup` if the node is unknown, if the equation count does not
    /// match the pipe count, or if the external flows do not sum to zero
    /// within `balance_tolerance`.
    pub fn new(
        network: &'a Network,
        reference_node: Option<&str>,
        balance_tolerance: f64,
    ) -> SolverResult<Self> {
        if network.pipes().is_empty() {
            return Err(SolverError::ProblemSetup {
                what: "network has no pipes".to_string(),
            });
        }

        let reference = match reference_node {
            Some(name) => network
                .node_id_by_name(name)
                .ok_or_else(|| SolverError::ProblemSetup {
                    what: format!("reference node {name} is not in the network"),
                })?,
            None => network
                .nodes()
                .first()
                .map(|n| n.id)
                .ok_or_else(|| SolverError::ProblemSetup {
                    what: "network has no nodes".to_string(),
                })?,
        };

        let problem = Self { network, reference };
        problem.check_equation_count()?;
        problem.check_external_balance(balance_tolerance)?;
        Ok(problem)
    }

    pub fn network(&self) -> &'a Network {
        self.network
    }

    pub fn reference_node(&self) -> NodeId {
        self.reference
    }

    pub fn unknown_count(&self) -> usize {
        self.network.pipes().len()
    }

    pub fn equation_count(&self) -> usize {
        self.network.nodes().len() - 1 + self.network.loops().len()
    }

    fn check_equation_count(&self) -> SolverResult<()> {
        let (equations, unknowns) = (self.equation_count(), self.unknown_count());
        if equations != unknowns {
            return Err(SolverError::ProblemSetup {
                what: format!(
                    "{equations} equations ({} node balances, {} loops) for {unknowns} pipe flows",
                    self.network.nodes().len() - 1,
                    self.network.loops().len()
                ),
            });
        }
        Ok(())
    }

    fn check_external_balance(&self, tolerance: f64) -> SolverResult<()> {
        let total = self.network.total_external_flow();
        let tol = Tolerances {
            abs: tolerance,
            rel: 0.0,
        };
        if !nearly_equal(total, 0.0, tol) {
            return Err(SolverError::ProblemSetup {
                what: format!("external flows sum to {total} L/s instead of zero"),
            });
        }
        Ok(())
    }

    /// Evaluate the residual for a candidate flow vector.
    pub fn residual(&self, flows: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let net = self.network;
        let q = flows.as_slice();
        let model = net.transition_model();

        let mut r = Vec::with_capacity(self.equation_count());
        r.extend(
            net.nodes()
                .iter()
                .filter(|n| n.id != self.reference)
                .map(|n| n.net_flow_at(net.pipes(), q)),
        );
        for lp in net.loops() {
            r.push(lp.head_loss_at(net.pipes(), q, model)?);
        }

        Ok(DVector::from_vec(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pn_core::units::{m, mm};
    use pn_fluids::Fluid;
    use pn_graph::NetworkBuilder;

    fn triangle() -> Network {
        let mut builder = NetworkBuilder::new(Fluid::water());
        for (a, b) in [("a", "b"), ("b", "c"), ("a", "c")] {
            builder
                .add_pipe(a, b, m(100.0), mm(200.0), m(0.00025))
                .unwrap();
        }
        let mut net = builder.build().unwrap();
        net.add_loop("T", ["a-b", "b-c", "a-c"]).unwrap();
        net.set_external_flow("a", 10.0).unwrap();
        net.set_external_flow("c", -10.0).unwrap();
        net
    }

    #[test]
    fn layout_drops_reference_node() {
        let net = triangle();
        let problem = FlowProblem::new(&net, None, 1e-9).unwrap();
        assert_eq!(problem.reference_node().index(), 0);
        assert_eq!(problem.equation_count(), 3);

        // Balances for b and c, then the loop
        let r = problem.residual(&DVector::from_vec(vec![0.0, 0.0, 10.0])).unwrap();
        assert_eq!(r.len(), 3);
        assert_eq!(r[0], 0.0);
        assert_eq!(r[1], 0.0);
        assert!(r[2] < 0.0);
    }

    #[test]
    fn named_reference_node() {
        let net = triangle();
        let problem = FlowProblem::new(&net, Some("c"), 1e-9).unwrap();
        assert_eq!(problem.reference_node().index(), 2);

        // Balances for a and b
        let r = problem.residual(&DVector::from_vec(vec![4.0, 4.0, 6.0])).unwrap();
        assert_eq!(r[0], 0.0);
        assert_eq!(r[1], 0.0);
    }

    #[test]
    fn unknown_reference_node() {
        let net = triangle();
        assert!(matches!(
            FlowProblem::new(&net, Some("z"), 1e-9),
            Err(SolverError::ProblemSetup { .. })
        ));
    }

    #[test]
    fn unbalanced_external_flows() {
        let mut net = triangle();
        net.set_external_flow("b", 1.0).unwrap();
        assert!(matches!(
            FlowProblem::new(&net, None, 1e-9),
            Err(SolverError::ProblemSetup { .. })
        ));
    }

    #[test]
    fn missing_loop_leaves_system_short() {
        let mut builder = NetworkBuilder::new(Fluid::water());
        for (a, b) in [("a", "b"), ("b", "c"), ("a", "c")] {
            builder
                .add_pipe(a, b, m(100.0), mm(200.0), m(0.00025))
                .unwrap();
        }
        let net = builder.build().unwrap();
        let err = FlowProblem::new(&net, None, 1e-9).unwrap_err();
        assert!(err.to_string().contains("2 equations"));
    }

    #[test]
    fn residual_leaves_pipes_untouched() {
        let net = triangle();
        let before = net.flows();
        let problem = FlowProblem::new(&net, None, 1e-9).unwrap();
        problem
            .residual(&DVector::from_vec(vec![1.0, -2.0, 3.0]))
            .unwrap();
        assert_eq!(net.flows(), before);
    }
}
