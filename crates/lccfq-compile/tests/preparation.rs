//! Prepared states must match their requested amplitudes, before and after
//! compilation.

use std::f64::consts::FRAC_1_SQRT_2;

use num_complex::Complex64;

use lccfq_compile::unitary::circuit_unitary;
use lccfq_compile::{Pipeline, Stage, Topology};
use lccfq_ir::{Basis, Circuit, CircuitBuilder, Endianness, QubitId};

const TOL: f64 = 1e-9;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// Column 0 of the circuit's unitary: the state reached from |0...0>.
/// Qubit 0 is the most significant bit of the index.
fn final_state(circuit: &Circuit) -> Vec<Complex64> {
    let u = circuit_unitary(circuit).unwrap();
    (0..1_usize << circuit.num_qubits()).map(|row| u.get(row, 0)).collect()
}

fn assert_same_state(actual: &[Complex64], expected: &[Complex64], what: &str) {
    assert_eq!(actual.len(), expected.len(), "{what}: dimension");
    let norm = expected.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt();
    let expected: Vec<Complex64> = expected.iter().map(|a| *a / norm).collect();

    // Fix the global phase on the largest expected amplitude.
    let pivot = (0..expected.len())
        .max_by(|&a, &b| expected[a].norm().total_cmp(&expected[b].norm()))
        .unwrap();
    let phase = actual[pivot] / expected[pivot];
    assert!((phase.norm() - 1.0).abs() < TOL, "{what}: magnitude at pivot {pivot}");
    for (i, (a, e)) in actual.iter().zip(&expected).enumerate() {
        assert!(
            (*a - phase * *e).norm() < TOL,
            "{what}: amplitude {i} is {a}, expected {}",
            phase * *e
        );
    }
}

fn reverse_bits(index: usize, width: u32) -> usize {
    (0..width).fold(0, |acc, bit| acc | (((index >> bit) & 1) << (width - 1 - bit)))
}

fn prepared(num_qubits: u32, targets: &[u32], amps: &[Complex64], endianness: Endianness) -> Circuit {
    let targets: Vec<QubitId> = targets.iter().copied().map(QubitId).collect();
    let mut b = CircuitBuilder::new("state", num_qubits, 0);
    b.prepare_state(&targets, amps, endianness).unwrap();
    b.build()
}

fn samples() -> Vec<(&'static str, Vec<Complex64>)> {
    vec![
        ("bell", vec![c(FRAC_1_SQRT_2, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(FRAC_1_SQRT_2, 0.0)]),
        ("phased bell", vec![c(0.0, 0.0), c(0.6, 0.0), Complex64::from_polar(0.8, 2.1), c(0.0, 0.0)]),
        (
            "sparse phases",
            vec![
                Complex64::from_polar(0.5, 0.9),
                c(0.0, 0.0),
                c(0.0, 0.0),
                c(0.0, 0.0),
                c(0.0, 0.0),
                Complex64::from_polar(0.5, -1.3),
                Complex64::from_polar(0.5, 2.8),
                c(0.0, 0.0),
            ],
        ),
        (
            "dense",
            (0..8)
                .map(|i| Complex64::from_polar(1.0 + 0.25 * i as f64, 0.7 * i as f64 - 1.0))
                .collect(),
        ),
        (
            "real signed",
            vec![c(0.1, 0.0), c(-0.4, 0.0), c(0.3, 0.0), c(0.0, 0.0), c(-0.2, 0.0), c(0.5, 0.0), c(0.6, 0.0), c(-0.3, 0.0)],
        ),
        ("basis state", vec![c(0.0, 0.0), c(0.0, 0.0), c(0.0, -1.0), c(0.0, 0.0)]),
    ]
}

// ============================================================================
// Arbitrary states
// ============================================================================

#[test]
fn test_big_endian_matches_register_order() {
    for (what, amps) in samples() {
        let n = amps.len().trailing_zeros();
        let targets: Vec<u32> = (0..n).collect();
        let circuit = prepared(n, &targets, &amps, Endianness::Big);
        assert_same_state(&final_state(&circuit), &amps, what);
    }
}

#[test]
fn test_little_endian_reverses_register_order() {
    for (what, amps) in samples() {
        let n = amps.len().trailing_zeros();
        let targets: Vec<u32> = (0..n).collect();
        let circuit = prepared(n, &targets, &amps, Endianness::Little);
        let expected: Vec<Complex64> = (0..amps.len()).map(|row| amps[reverse_bits(row, n)]).collect();
        assert_same_state(&final_state(&circuit), &expected, what);
    }
}

#[test]
fn test_unnormalized_amplitudes() {
    let amps = [c(3.0, 0.0), c(0.0, 4.0)];
    let circuit = prepared(1, &[0], &amps, Endianness::Little);
    assert_same_state(&final_state(&circuit), &amps, "unnormalized");
}

#[test]
fn test_state_on_a_subset_of_the_register() {
    // Targets (2, 0) on a 3-qubit register; qubit 1 stays in |0>.
    let amps = [c(0.5, 0.0), c(0.0, 0.5), c(-0.5, 0.0), Complex64::from_polar(0.5, 0.4)];
    let circuit = prepared(3, &[2, 0], &amps, Endianness::Little);

    // Amplitude index bit 0 is qubit 2, bit 1 is qubit 0.
    let mut expected = vec![c(0.0, 0.0); 8];
    for (index, amp) in amps.iter().enumerate() {
        let q2 = index & 1;
        let q0 = (index >> 1) & 1;
        expected[(q0 << 2) | q2] = *amp;
    }
    assert_same_state(&final_state(&circuit), &expected, "subset");
}

#[test]
fn test_prepared_state_survives_compilation() {
    let amps: Vec<Complex64> = (0..8)
        .map(|i| Complex64::from_polar(1.0 + i as f64, 0.45 * i as f64))
        .collect();
    let circuit = prepared(3, &[0, 1, 2], &amps, Endianness::Big);
    let pipeline = Pipeline::builder()
        .topology(Topology::full(3))
        .architecture("neutral_atom")
        .build()
        .unwrap();
    let program = pipeline.run(&circuit, Stage::Transpiled).unwrap();
    assert_eq!(program.swaps_inserted, 0);
    assert!(program.initial_mapping.unwrap().iter().all(|(v, p)| v.0 == p));
    assert_same_state(&final_state(&program.circuit), &amps, "transpiled");
}

// ============================================================================
// Basis and uniform blocks
// ============================================================================

#[test]
fn test_basis_states() {
    let h = FRAC_1_SQRT_2;
    let cases = [
        // Little endian: the first character belongs to qubit 0.
        ("10", Basis::Z, Endianness::Little, vec![c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)]),
        ("10", Basis::Z, Endianness::Big, vec![c(0.0, 0.0), c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)]),
        // |-> on qubit 0, |+> on qubit 1.
        ("10", Basis::X, Endianness::Little, vec![c(0.5, 0.0), c(0.5, 0.0), c(-0.5, 0.0), c(-0.5, 0.0)]),
        // |+i> on qubit 0, |-i> on qubit 1.
        (
            "01",
            Basis::Y,
            Endianness::Little,
            vec![c(0.5, 0.0), c(0.0, -0.5), c(0.0, 0.5), c(0.5, 0.0)],
        ),
    ];
    for (bits, basis, endianness, expected) in cases {
        let mut b = CircuitBuilder::new("basis", 2, 0);
        b.prepare_basis(&[QubitId(0), QubitId(1)], bits, basis, endianness)
            .unwrap();
        let what = format!("{bits} in {basis}");
        assert_same_state(&final_state(&b.build()), &expected, &what);
    }

    let mut b = CircuitBuilder::new("minus i", 1, 0);
    b.prepare_basis(&[QubitId(0)], "1", Basis::Y, Endianness::Little)
        .unwrap();
    assert_same_state(&final_state(&b.build()), &[c(h, 0.0), c(0.0, -h)], "|-i>");
}

#[test]
fn test_uniform_over_subset() {
    let targets = [QubitId(0), QubitId(1), QubitId(2)];
    let mut b = CircuitBuilder::new("uniform", 3, 0);
    b.prepare_uniform(&targets, Some(&[QubitId(0), QubitId(2)]))
        .unwrap();
    let state = final_state(&b.build());
    // Rows with qubit 1 (the middle bit) set stay empty.
    let expected: Vec<Complex64> = (0..8)
        .map(|row| if row & 0b010 == 0 { c(0.5, 0.0) } else { c(0.0, 0.0) })
        .collect();
    assert_same_state(&state, &expected, "uniform subset");
}
