//! Every primitive opcode is native. Used for simulators.

use lccfq_ir::{Instruction, Opcode};

use super::NativeGateSet;

/// A target without gate restrictions.
#[derive(Debug, Clone, Default)]
pub struct Ideal;

impl NativeGateSet for Ideal {
    fn name(&self) -> &str {
        "ideal"
    }

    fn supports(&self, opcode: Opcode) -> bool {
        opcode.is_unitary() && !opcode.is_composite()
    }

    fn runs(&self, _opcode: Opcode) -> bool {
        true
    }

    fn rewrite(&self, _instruction: &Instruction) -> Option<Vec<Instruction>> {
        None
    }
}
