//! The ten-pipe, three-loop water network used for demonstration.

use pn_components::TransitionModel;
use pn_core::units::{m, mm};
use pn_fluids::Fluid;
use pn_graph::{Network, NetworkBuilder};

use crate::error::CliResult;

/// Absolute roughness of every pipe (m).
const ROUGHNESS_M: f64 = 0.00025;

/// (low node, high node, length m, diameter mm)
const PIPES: [(&str, &str, f64, f64); 10] = [
    ("a", "b", 250.0, 300.0),
    ("a", "c", 100.0, 200.0),
    ("b", "e", 100.0, 200.0),
    ("c", "d", 125.0, 200.0),
    ("c", "f", 100.0, 150.0),
    ("d", "e", 125.0, 200.0),
    ("d", "g", 100.0, 150.0),
    ("e", "h", 100.0, 150.0),
    ("f", "g", 125.0, 250.0),
    ("g", "h", 125.0, 250.0),
];

const LOOPS: [(&str, &[&str]); 3] = [
    ("A", &["a-b", "b-e", "d-e", "c-d", "a-c"]),
    ("B", &["c-d", "d-g", "f-g", "c-f"]),
    ("C", &["d-e", "e-h", "g-h", "d-g"]),
];

/// External supply (+) and demand (-) in L/s.
const EXTERNAL_FLOWS: [(&str, f64); 4] = [("a", 60.0), ("d", -30.0), ("f", -15.0), ("h", -15.0)];

pub fn build(transition: Box<dyn TransitionModel>) -> CliResult<Network> {
    let mut builder = NetworkBuilder::new(Fluid::water()).transition_model(transition);
    for (a, b, length, diameter) in PIPES {
        builder.add_pipe(a, b, m(length), mm(diameter), m(ROUGHNESS_M))?;
    }

    let mut network = builder.build()?;
    for (name, pipes) in LOOPS {
        network.add_loop(name, pipes.iter().copied())?;
    }
    for (node, flow) in EXTERNAL_FLOWS {
        network.set_external_flow(node, flow)?;
    }
    Ok(network)
}
