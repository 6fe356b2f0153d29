//! XY rotations plus square-root-of-iSWAP, the `pfaff_v1` architecture.

use std::f64::consts::{FRAC_PI_2, PI};

use lccfq_ir::{Instruction, Opcode, QubitId};

use super::{NativeGateSet, controlled_via_cx, rx, ry, z_angle};

/// Native set of the `pfaff_v1` superconducting processor.
///
/// Z rotations are realized as X rotations conjugated by ±π/2 Y rotations;
/// every entangling gate goes through CX, which takes two `sqiswap`s.
#[derive(Debug, Clone, Default)]
pub struct XyiSwap;

fn sqiswap(a: QubitId, b: QubitId) -> Instruction {
    Instruction::symmetric(Opcode::SqiSwap, a, b)
}

impl NativeGateSet for XyiSwap {
    fn name(&self) -> &str {
        "pfaff_v1"
    }

    fn supports(&self, opcode: Opcode) -> bool {
        matches!(opcode, Opcode::Rx | Opcode::Ry | Opcode::SqiSwap)
    }

    fn rewrite(&self, instruction: &Instruction) -> Option<Vec<Instruction>> {
        let seq = match instruction.opcode {
            Opcode::X => vec![rx(*instruction.targets.first()?, PI)],
            Opcode::Y => vec![ry(*instruction.targets.first()?, PI)],
            Opcode::Z => {
                let q = *instruction.targets.first()?;
                vec![ry(q, PI), rx(q, PI)]
            }
            Opcode::H => {
                let q = *instruction.targets.first()?;
                vec![ry(q, FRAC_PI_2), rx(q, PI)]
            }
            Opcode::S | Opcode::Sdg | Opcode::T | Opcode::Tdg | Opcode::Rz | Opcode::P | Opcode::Phase => {
                let q = *instruction.targets.first()?;
                let theta = z_angle(instruction)?;
                vec![ry(q, FRAC_PI_2), rx(q, theta), ry(q, -FRAC_PI_2)]
            }
            Opcode::Cx => {
                let (c, t) = instruction.qubit_pair()?;
                vec![
                    ry(c, FRAC_PI_2),
                    sqiswap(c, t),
                    rx(t, PI),
                    sqiswap(c, t),
                    rx(c, FRAC_PI_2),
                    ry(c, -FRAC_PI_2),
                    rx(t, -FRAC_PI_2),
                ]
            }
            Opcode::Swap => {
                let (a, b) = instruction.qubit_pair()?;
                vec![
                    sqiswap(a, b),
                    rx(a, FRAC_PI_2),
                    rx(b, FRAC_PI_2),
                    sqiswap(a, b),
                    ry(a, FRAC_PI_2),
                    ry(b, FRAC_PI_2),
                    sqiswap(a, b),
                    ry(a, -FRAC_PI_2),
                    rx(a, -FRAC_PI_2),
                    ry(b, -FRAC_PI_2),
                    rx(b, -FRAC_PI_2),
                ]
            }
            _ => return controlled_via_cx(instruction),
        };
        Some(seq)
    }
}
