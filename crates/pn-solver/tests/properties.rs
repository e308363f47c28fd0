use pn_core::units::{m, mm};
use pn_fluids::Fluid;
use pn_graph::{Network, NetworkBuilder};
use pn_solver::{SolveOptions, find_flow_rates};
use proptest::prelude::*;

fn ladder(supply: f64, split: f64) -> Network {
    // Two loops sharing the rung b-e:
    //   a - b - c
    //   |   |   |
    //   d - e - f
    let mut builder = NetworkBuilder::new(Fluid::water());
    for (a, b, length, diameter) in [
        ("a", "b", 120.0, 200.0),
        ("b", "c", 80.0, 150.0),
        ("a", "d", 60.0, 200.0),
        ("b", "e", 90.0, 150.0),
        ("c", "f", 70.0, 150.0),
        ("d", "e", 110.0, 250.0),
        ("e", "f", 100.0, 200.0),
    ] {
        builder
            .add_pipe(a, b, m(length), mm(diameter), m(0.00025))
            .unwrap();
    }
    let mut net = builder.build().unwrap();
    net.add_loop("L", ["a-b", "b-e", "d-e", "a-d"]).unwrap();
    net.add_loop("R", ["b-c", "c-f", "e-f", "b-e"]).unwrap();
    net.set_external_flow("a", supply).unwrap();
    net.set_external_flow("c", -split * supply).unwrap();
    net.set_external_flow("f", -(1.0 - split) * supply).unwrap();
    net
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn solved_networks_satisfy_every_check(
        supply in 20.0f64..120.0,
        split in 0.1f64..0.9,
    ) {
        let mut net = ladder(supply, split);
        let solution = find_flow_rates(&mut net, &SolveOptions::default()).unwrap();
        prop_assert!(solution.converged);

        for q in net.node_flow_rates() {
            prop_assert!(q.abs() < 1e-6, "node imbalance {}", q);
        }
        for hl in net.loop_head_losses().unwrap() {
            prop_assert!(hl.abs() < 1e-6, "loop head loss {}", hl);
        }
    }
}
