//! State-preparation blocks.
//!
//! Each block expands in place into ordinary instructions, so the result
//! flows through validation and compilation like hand-written gates.
//!
//! Bit order follows [`Endianness`]: with [`Endianness::Little`] character
//! (or amplitude-index bit) `i` belongs to `targets[i]`; with
//! [`Endianness::Big`] the order is reversed.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrResult, PreparationFault};
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::qubit::QubitId;

/// Magnitudes and angles below this are treated as zero.
const EPSILON: f64 = 1e-15;

/// Measurement basis of a prepared product state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Basis {
    /// `|0>` / `|1>`.
    #[default]
    Z,
    /// `|+>` / `|->`.
    X,
    /// `|+i>` / `|-i>`.
    Y,
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Basis::Z => "Z",
            Basis::X => "X",
            Basis::Y => "Y",
        };
        f.write_str(name)
    }
}

impl FromStr for Basis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "Z" => Ok(Basis::Z),
            "X" => Ok(Basis::X),
            "Y" => Ok(Basis::Y),
            _ => Err(format!("unknown basis '{s}', expected Z, X or Y")),
        }
    }
}

/// Which target owns the least significant position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// Position `i` belongs to `targets[i]`.
    #[default]
    Little,
    /// Position `i` belongs to `targets[len - 1 - i]`.
    Big,
}

fn ordered(targets: &[QubitId], endianness: Endianness) -> Vec<QubitId> {
    match endianness {
        Endianness::Little => targets.to_vec(),
        Endianness::Big => targets.iter().rev().copied().collect(),
    }
}

fn distinct(qubits: &[QubitId]) -> IrResult<()> {
    let mut seen = BTreeSet::new();
    for &q in qubits {
        if !seen.insert(q) {
            return Err(PreparationFault::DuplicateQubit(q).into());
        }
    }
    Ok(())
}

/// Prepare a basis state on `targets`.
///
/// Qubits whose bit is `1` get an X. In the X basis every target is then
/// rotated by H, in the Y basis by H followed by S.
pub fn prepare_basis(
    targets: &[QubitId],
    bits: &str,
    basis: Basis,
    endianness: Endianness,
) -> IrResult<Vec<Instruction>> {
    distinct(targets)?;
    let bits: Vec<char> = bits.chars().collect();
    if bits.len() != targets.len() {
        return Err(PreparationFault::LengthMismatch {
            expected: targets.len(),
            got: bits.len(),
        }
        .into());
    }
    if let Some(&bad) = bits.iter().find(|&&b| !matches!(b, '0' | '1')) {
        return Err(PreparationFault::InvalidBit(bad).into());
    }

    // Reversing the string is the same as reversing the targets.
    let mut out: Vec<Instruction> = ordered(targets, endianness)
        .iter()
        .zip(&bits)
        .filter(|&(_, &b)| b == '1')
        .map(|(&q, _)| Instruction::single(Opcode::X, q))
        .collect();

    match basis {
        Basis::Z => {}
        Basis::X => out.extend(targets.iter().map(|&q| Instruction::single(Opcode::H, q))),
        Basis::Y => {
            for &q in targets {
                out.push(Instruction::single(Opcode::H, q));
                out.push(Instruction::single(Opcode::S, q));
            }
        }
    }
    Ok(out)
}

/// Put `qubits` (all of `targets` when `None`) into uniform superposition.
///
/// Every listed qubit must be one of `targets`; the others stay in `|0>`.
pub fn prepare_uniform(targets: &[QubitId], qubits: Option<&[QubitId]>) -> IrResult<Vec<Instruction>> {
    let qubits = qubits.unwrap_or(targets);
    distinct(qubits)?;
    if let Some(&q) = qubits.iter().find(|q| !targets.contains(q)) {
        return Err(PreparationFault::NotATarget(q).into());
    }
    Ok(qubits.iter().map(|&q| Instruction::single(Opcode::H, q)).collect())
}

/// Prepare the state with the given amplitudes on `targets`, up to a
/// global phase.
///
/// `amplitudes` needs `2^n` entries for `n` targets and is normalized
/// first. The circuit is the inverse of a disentangling sequence: level by
/// level, starting from the most significant position, uniformly controlled
/// Ry and Rz rotations fold each pair of amplitudes that differ in one bit
/// into the entry where that bit is zero. Reading the levels backwards
/// yields the preparation, built only from `ry`, `rz` and `cx`.
pub fn prepare_state(
    targets: &[QubitId],
    amplitudes: &[Complex64],
    endianness: Endianness,
) -> IrResult<Vec<Instruction>> {
    distinct(targets)?;
    let n = targets.len();
    let dim = u32::try_from(n)
        .ok()
        .and_then(|n| 1_usize.checked_shl(n))
        .ok_or(PreparationFault::TooManyQubits(n))?;
    if amplitudes.len() != dim {
        return Err(PreparationFault::LengthMismatch {
            expected: dim,
            got: amplitudes.len(),
        }
        .into());
    }
    let norm = amplitudes.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
    if !norm.is_finite() || norm < EPSILON {
        return Err(PreparationFault::ZeroNorm.into());
    }

    let mut omega: Vec<Complex64> = amplitudes.iter().map(|a| *a / norm).collect();
    let mut levels = Vec::with_capacity(n);
    for k in (0..n).rev() {
        let half = 1_usize << k;
        let mut ry = Vec::with_capacity(half);
        let mut rz = Vec::with_capacity(half);
        for c in 0..half {
            let (a0, a1) = (omega[c], omega[c + half]);
            let (r0, r1) = (a0.norm(), a1.norm());
            let r = r0.hypot(r1);

            // The folded entry keeps the phase the preparation must restore;
            // with one side empty that is the other side's full phase.
            let (phi, gamma) = match (r0 > EPSILON, r1 > EPSILON) {
                (true, true) => (a1.arg() - a0.arg(), (a0.arg() + a1.arg()) / 2.0),
                (true, false) => (0.0, a0.arg()),
                (false, true) => (0.0, a1.arg()),
                (false, false) => (0.0, 0.0),
            };
            ry.push(if r > EPSILON { 2.0 * r1.atan2(r0) } else { 0.0 });
            rz.push(phi);

            omega[c] = Complex64::from_polar(r, gamma);
            omega[c + half] = Complex64::new(0.0, 0.0);
        }
        levels.push((k, ry, rz));
    }

    let order = ordered(targets, endianness);
    let mut out = Vec::new();
    for (k, ry, rz) in levels.into_iter().rev() {
        let target = order[k];
        let controls = &order[..k];
        multiplexed_rotation(Opcode::Ry, target, controls, &ry, &mut out);
        multiplexed_rotation(Opcode::Rz, target, controls, &rz, &mut out);
    }
    Ok(out)
}

/// Emit a rotation on `target` whose angle is selected by the basis state of
/// `controls`: `angles[c]` applies when control `j` holds bit `j` of `c`.
///
/// Splitting on the last control gives two half-size multiplexors of the
/// half-sum and half-difference angles, separated by CX gates that flip the
/// sign of the second one.
fn multiplexed_rotation(
    opcode: Opcode,
    target: QubitId,
    controls: &[QubitId],
    angles: &[f64],
    out: &mut Vec<Instruction>,
) {
    if angles.iter().all(|a| a.abs() < EPSILON) {
        return;
    }
    let Some((&last, rest)) = controls.split_last() else {
        out.push(Instruction::rotation(opcode, target, angles[0]));
        return;
    };

    let half = angles.len() / 2;
    let (low, high) = angles.split_at(half);
    let sum: Vec<f64> = low.iter().zip(high).map(|(a, b)| (a + b) / 2.0).collect();
    let diff: Vec<f64> = low.iter().zip(high).map(|(a, b)| (a - b) / 2.0).collect();

    multiplexed_rotation(opcode, target, rest, &sum, out);
    out.push(Instruction::controlled(Opcode::Cx, last, target));
    multiplexed_rotation(opcode, target, rest, &diff, out);
    out.push(Instruction::controlled(Opcode::Cx, last, target));
}
