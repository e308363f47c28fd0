use pn_core::units::{m, mm};
use pn_fluids::Fluid;
use pn_graph::{GraphError, Network, NetworkBuilder, NetworkStage};
use proptest::prelude::*;

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

fn reference_network() -> Network {
    let mut builder = NetworkBuilder::new(Fluid::water());
    for (a, b, length, diameter) in PIPES {
        builder
            .add_pipe(a, b, m(length), mm(diameter), m(0.00025))
            .unwrap();
    }
    let mut net = builder.build().unwrap();
    net.add_loop("A", ["a-b", "b-e", "d-e", "c-d", "a-c"]).unwrap();
    net.add_loop("B", ["c-d", "d-g", "f-g", "c-f"]).unwrap();
    net.add_loop("C", ["d-e", "e-h", "g-h", "d-g"]).unwrap();
    net
}

#[test]
fn derives_nodes_in_first_seen_order() {
    let net = reference_network();
    let names: Vec<&str> = net.nodes().iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "e", "d", "f", "g", "h"]);
    assert_eq!(net.pipes().len(), 10);
    assert_eq!(net.loops().len(), 3);
    assert_eq!(net.stage(), NetworkStage::LoopsAssigned);
}

#[test]
fn incident_pipes_match_endpoints() {
    let net = reference_network();
    let names = |node: &str| -> Vec<String> {
        net.pipes_incident_to(node).iter().map(|p| p.name()).collect()
    };
    assert_eq!(names("a"), vec!["a-b", "a-c"]);
    assert_eq!(names("d"), vec!["c-d", "d-e", "d-g"]);
    assert_eq!(names("g"), vec!["d-g", "f-g", "g-h"]);
    assert_eq!(names("h"), vec!["e-h", "g-h"]);
}

#[test]
fn loop_pipe_names_resolve_in_either_order() {
    let mut net = reference_network();
    let id = net.add_loop("D", ["c-f", "g-f", "d-g", "d-c"]).unwrap();
    let names: Vec<String> = net
        .get_loop(id)
        .unwrap()
        .pipes()
        .iter()
        .map(|&p| net.pipe(p).unwrap().name())
        .collect();
    assert_eq!(names, vec!["c-f", "f-g", "d-g", "c-d"]);
}

#[test]
fn malformed_loops_are_rejected() {
    let mut net = reference_network();

    assert!(matches!(
        net.add_loop("X", ["a-b", "b-x"]),
        Err(GraphError::UnknownPipe { .. })
    ));
    assert!(matches!(
        net.add_loop("Y", ["a-b", "c-d", "a-c"]),
        Err(GraphError::BrokenLoop { .. })
    ));
    assert!(matches!(
        net.add_loop("Z", ["a-b", "b-e"]),
        Err(GraphError::OpenLoop { .. })
    ));
    assert!(matches!(
        net.add_loop("W", Vec::<&str>::new()),
        Err(GraphError::EmptyLoop { .. })
    ));
    assert_eq!(net.loops().len(), 3);
}

#[test]
fn default_flows_give_node_imbalances() {
    let mut net = reference_network();
    for (node, q) in [("a", 60.0), ("d", -30.0), ("f", -15.0), ("h", -15.0)] {
        net.set_external_flow(node, q).unwrap();
    }
    assert!(net.total_external_flow().abs() < 1e-12);

    // Every pipe starts at 10 L/s from low to high node.
    let rates = net.node_flow_rates();
    let by_name = |name: &str| rates[net.node_id_by_name(name).unwrap().slot()];
    assert!((by_name("a") - 40.0).abs() < 1e-12);
    assert!((by_name("b") - 0.0).abs() < 1e-12);
    assert!((by_name("c") - (-10.0)).abs() < 1e-12);
    assert!((by_name("d") - (-40.0)).abs() < 1e-12);
    assert!((by_name("h") - 5.0).abs() < 1e-12);
}

#[test]
fn loop_head_losses_are_finite_at_default_flows() {
    let net = reference_network();
    let losses = net.loop_head_losses().unwrap();
    assert_eq!(losses.len(), 3);
    assert!(losses.iter().all(|hl| hl.is_finite()));
}

#[test]
fn duplicate_pipe_in_either_orientation() {
    let mut builder = NetworkBuilder::new(Fluid::water());
    builder.add_pipe("a", "b", m(1.0), mm(100.0), m(0.0)).unwrap();
    builder.add_pipe("b", "a", m(2.0), mm(100.0), m(0.0)).unwrap();
    assert_eq!(
        builder.build().unwrap_err(),
        GraphError::DuplicatePipe { name: "a-b".into() }
    );
}

proptest! {
    // Each pipe adds +q at one end and -q at the other, so node imbalances
    // always sum to the total external flow.
    #[test]
    fn node_imbalances_sum_to_external_total(
        flows in prop::collection::vec(-100.0f64..100.0, 10),
        supply in 0.0f64..100.0,
    ) {
        let mut net = reference_network();
        net.set_external_flow("a", supply).unwrap();
        net.set_external_flow("h", -0.5 * supply).unwrap();

        let total: f64 = net
            .nodes()
            .iter()
            .map(|n| n.net_flow_at(net.pipes(), &flows))
            .sum();
        prop_assert!((total - 0.5 * supply).abs() < 1e-9);
    }
}
