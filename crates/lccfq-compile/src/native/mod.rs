//! Native gate sets of target architectures.
//!
//! A target is any implementation of [`NativeGateSet`]. The transpiler asks
//! it which opcodes run directly and how to rewrite the rest; targets are
//! looked up by architecture name through an [`ArchitectureRegistry`].
//!
//! | Architecture | Native unitaries | Non-unitary support |
//! |--------------|------------------|---------------------|
//! | `pfaff_v1` (`xyisw`) | `rx`, `ry`, `sqiswap` | measure, reset, nop, satspect |
//! | `neutral_atom` | `rx`, `ry`, `rz`, `cz` | measure, reset, nop |
//! | `ideal` | every primitive opcode | all |

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fmt;

use lccfq_ir::{Instruction, Opcode, QubitId};

mod ideal;
mod neutral_atom;
mod registry;
mod xyisw;

pub use ideal::Ideal;
pub use neutral_atom::NeutralAtom;
pub use registry::ArchitectureRegistry;
pub use xyisw::XyiSwap;

/// The operation vocabulary of one architecture.
///
/// Implementations are read-only after construction and shared across
/// compilations, hence `Send + Sync`.
pub trait NativeGateSet: Send + Sync + fmt::Debug {
    /// Architecture name this set is registered under.
    fn name(&self) -> &str;

    /// Whether `opcode` executes directly on the hardware.
    fn supports(&self, opcode: Opcode) -> bool;

    /// Whether the hardware can run a non-unitary opcode (measure, reset,
    /// nop, characterization). Unitary opcodes are governed by `supports`.
    fn runs(&self, opcode: Opcode) -> bool {
        !opcode.is_unitary()
    }

    /// Rewrite an unsupported instruction into an equivalent sequence over
    /// the same qubits.
    ///
    /// The result may still contain unsupported opcodes; the transpiler
    /// rewrites those in turn. `None` means no rewrite exists.
    fn rewrite(&self, instruction: &Instruction) -> Option<Vec<Instruction>>;

    /// Directly supported unitary opcodes, in declaration order.
    fn native_opcodes(&self) -> Vec<Opcode> {
        Opcode::ALL
            .into_iter()
            .filter(|op| op.is_unitary() && self.supports(*op))
            .collect()
    }
}

pub(crate) fn rx(q: QubitId, theta: f64) -> Instruction {
    Instruction::rotation(Opcode::Rx, q, theta)
}

pub(crate) fn ry(q: QubitId, theta: f64) -> Instruction {
    Instruction::rotation(Opcode::Ry, q, theta)
}

pub(crate) fn rz(q: QubitId, theta: f64) -> Instruction {
    Instruction::rotation(Opcode::Rz, q, theta)
}

pub(crate) fn gate(opcode: Opcode, q: QubitId) -> Instruction {
    Instruction::single(opcode, q)
}

pub(crate) fn cx(c: QubitId, t: QubitId) -> Instruction {
    Instruction::controlled(Opcode::Cx, c, t)
}

/// Angle of a diagonal single-qubit gate, as an equivalent Z rotation.
pub(crate) fn z_angle(instruction: &Instruction) -> Option<f64> {
    match instruction.opcode {
        Opcode::Z => Some(std::f64::consts::PI),
        Opcode::S => Some(FRAC_PI_2),
        Opcode::Sdg => Some(-FRAC_PI_2),
        Opcode::T => Some(FRAC_PI_4),
        Opcode::Tdg => Some(-FRAC_PI_4),
        Opcode::Rz | Opcode::P | Opcode::Phase => instruction.params.first().copied(),
        _ => None,
    }
}

/// Controlled gates expressed through CX and single-qubit gates.
///
/// All identities hold up to global phase.
pub(crate) fn controlled_via_cx(instruction: &Instruction) -> Option<Vec<Instruction>> {
    let (c, t) = instruction.qubit_pair()?;
    let theta = instruction.params.first().copied();
    let seq = match instruction.opcode {
        Opcode::Cz => vec![gate(Opcode::H, t), cx(c, t), gate(Opcode::H, t)],
        Opcode::Cy => vec![gate(Opcode::Sdg, t), cx(c, t), gate(Opcode::S, t)],
        Opcode::Ch => vec![ry(t, FRAC_PI_4), cx(c, t), ry(t, -FRAC_PI_4)],
        Opcode::Cp | Opcode::CPhase => {
            let theta = theta?;
            vec![
                rz(c, theta / 2.0),
                cx(c, t),
                rz(t, -theta / 2.0),
                cx(c, t),
                rz(t, theta / 2.0),
            ]
        }
        Opcode::Crz => {
            let theta = theta?;
            vec![rz(t, theta / 2.0), cx(c, t), rz(t, -theta / 2.0), cx(c, t)]
        }
        Opcode::Cry => {
            let theta = theta?;
            vec![ry(t, theta / 2.0), cx(c, t), ry(t, -theta / 2.0), cx(c, t)]
        }
        Opcode::Crx => {
            let theta = theta?;
            vec![
                gate(Opcode::H, t),
                Instruction::controlled_with_params(Opcode::Crz, c, t, [theta]),
                gate(Opcode::H, t),
            ]
        }
        _ => return None,
    };
    Some(seq)
}
