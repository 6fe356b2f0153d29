//! Property tests for routing and decomposition.

use lccfq_compile::{
    Decomposer, IdentityPlacement, InteractionPlacement, Mapper, Mapping, PlacementPolicy, Router,
    Topology,
};
use lccfq_ir::{Circuit, CircuitBuilder, Instruction, Opcode, QubitId};
use proptest::prelude::*;

/// Connected topologies with at least four qubits.
fn arb_topology() -> impl Strategy<Value = Topology> {
    prop_oneof![
        (4_u32..9).prop_map(Topology::linear),
        (4_u32..9).prop_map(Topology::ring),
        (4_u32..9).prop_map(Topology::star),
        (2_u32..4, 2_u32..4).prop_map(|(r, c)| Topology::grid(r, c)),
        (4_u32..7).prop_map(Topology::full),
    ]
}

/// Circuits over four virtual qubits mixing one- and two-qubit gates.
fn arb_circuit() -> impl Strategy<Value = Circuit> {
    let gate = prop_oneof![
        3 => (0_u32..4, 1_u32..4).prop_map(|(a, d)| (Opcode::Cx, a, (a + d) % 4)),
        2 => (0_u32..4, 1_u32..4).prop_map(|(a, d)| (Opcode::Cz, a, (a + d) % 4)),
        1 => (0_u32..4, 1_u32..4).prop_map(|(a, d)| (Opcode::Swap, a, (a + d) % 4)),
        2 => (0_u32..4).prop_map(|a| (Opcode::H, a, a)),
    ];
    prop::collection::vec(gate, 1..24).prop_map(|gates| {
        let mut b = CircuitBuilder::new("prop", 4, 4);
        for (op, a, t) in gates {
            let (a, t) = (QubitId(a), QubitId(t));
            let inst = match op {
                Opcode::H => Instruction::single(op, a),
                Opcode::Swap => Instruction::swap(a, t),
                _ => Instruction::controlled(op, a, t),
            };
            b.append(inst).expect("generated instruction is valid");
        }
        b.measure_all().expect("measure fits");
        b.build()
    })
}

fn policy(interaction: bool) -> Box<dyn PlacementPolicy> {
    if interaction {
        Box::new(InteractionPlacement)
    } else {
        Box::new(IdentityPlacement)
    }
}

proptest! {
    /// Replaying the routed circuit from the initial mapping: every
    /// two-qubit instruction sits on an edge, the mapping stays a bijection
    /// after every swap, the original instructions reappear in order and the
    /// replay ends on the router's final mapping.
    #[test]
    fn routing_preserves_adjacency_and_bijectivity(
        topology in arb_topology(),
        circuit in arb_circuit(),
        interaction in any::<bool>(),
    ) {
        let initial = Mapper::with_policy(policy(interaction)).map(&circuit, &topology).unwrap();
        let mut mapping = initial.clone();
        let (routed, swaps) = Router.route(&circuit, &mut mapping, &topology).unwrap();

        let mut replay: Mapping = initial;
        let mut originals = circuit.instructions().iter();
        let mut inserted = 0;
        for inst in routed.instructions() {
            if let Some((a, b)) = inst.qubit_pair() {
                prop_assert!(topology.is_adjacent(a.0, b.0), "{} on ({}, {})", inst.opcode, a, b);
            }
            // Free physical qubits never match an authored operand.
            let unbound = inst.map_qubits(|p| replay.virtual_at(p.0).unwrap_or(QubitId(u32::MAX)));
            match originals.clone().next() {
                Some(original) if *original == unbound => {
                    originals.next();
                }
                _ => {
                    prop_assert_eq!(inst.opcode, Opcode::Swap);
                    let (a, b) = inst.qubit_pair().unwrap();
                    replay.swap_physical(a.0, b.0);
                    inserted += 1;
                    prop_assert!(replay.is_bijective());
                }
            }
        }
        prop_assert!(originals.next().is_none());
        prop_assert_eq!(inserted, swaps);
        prop_assert_eq!(replay, mapping);
    }

    /// Composite rules have a fixed length whatever the angles.
    #[test]
    fn decomposition_length_is_fixed(
        theta in -20.0_f64..20.0,
        phi in -20.0_f64..20.0,
        lambda in -20.0_f64..20.0,
        gamma in -20.0_f64..20.0,
    ) {
        let d = Decomposer::new();
        let u3 = Instruction::single_with_params(Opcode::U3, QubitId(0), [theta, phi, lambda]);
        let u2 = Instruction::single_with_params(Opcode::U2, QubitId(0), [phi, lambda]);
        let cu = Instruction::controlled_with_params(
            Opcode::Cu, QubitId(0), QubitId(1), [theta, phi, lambda, gamma],
        );
        prop_assert_eq!(d.expand(0, &u3).unwrap().len(), 3);
        prop_assert_eq!(d.expand(0, &u2).unwrap().len(), 3);
        prop_assert_eq!(d.expand(0, &cu).unwrap().len(), 8);
        prop_assert_eq!(d.expand(0, &cu).unwrap(), d.expand(0, &cu).unwrap());
    }
}
