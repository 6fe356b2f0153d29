//! Global Raman rotations plus Rydberg CZ.

use std::f64::consts::{FRAC_PI_2, PI};

use lccfq_ir::{Instruction, Opcode};

use super::{NativeGateSet, controlled_via_cx, cx, gate, rx, ry, rz, z_angle};

/// Native set of a neutral-atom array: `rx`, `ry`, `rz` and `cz`.
///
/// There is no `sqiswap` and no spectroscopy primitive on this hardware.
#[derive(Debug, Clone, Default)]
pub struct NeutralAtom;

impl NativeGateSet for NeutralAtom {
    fn name(&self) -> &str {
        "neutral_atom"
    }

    fn supports(&self, opcode: Opcode) -> bool {
        matches!(opcode, Opcode::Rx | Opcode::Ry | Opcode::Rz | Opcode::Cz)
    }

    fn runs(&self, opcode: Opcode) -> bool {
        matches!(opcode, Opcode::Measure | Opcode::Reset | Opcode::Nop)
    }

    fn rewrite(&self, instruction: &Instruction) -> Option<Vec<Instruction>> {
        let seq = match instruction.opcode {
            Opcode::X => vec![rx(*instruction.targets.first()?, PI)],
            Opcode::Y => vec![ry(*instruction.targets.first()?, PI)],
            Opcode::H => {
                let q = *instruction.targets.first()?;
                vec![rz(q, PI), ry(q, FRAC_PI_2)]
            }
            Opcode::Z | Opcode::S | Opcode::Sdg | Opcode::T | Opcode::Tdg | Opcode::P | Opcode::Phase => {
                vec![rz(*instruction.targets.first()?, z_angle(instruction)?)]
            }
            Opcode::Cx => {
                let (c, t) = instruction.qubit_pair()?;
                vec![
                    gate(Opcode::H, t),
                    Instruction::controlled(Opcode::Cz, c, t),
                    gate(Opcode::H, t),
                ]
            }
            Opcode::Swap => {
                let (a, b) = instruction.qubit_pair()?;
                vec![cx(a, b), cx(b, a), cx(a, b)]
            }
            Opcode::SqiSwap => return None,
            _ => return controlled_via_cx(instruction),
        };
        Some(seq)
    }
}
