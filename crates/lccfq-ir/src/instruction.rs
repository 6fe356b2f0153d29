//! Instructions: one opcode applied to its operands.

use serde::{Deserialize, Serialize};

use crate::error::InstructionFault;
use crate::opcode::{Opcode, OpcodeShape};
use crate::qubit::{ClbitId, QubitId};

/// A single operation in a circuit.
///
/// A deserialized `measure` without `clbits` measures each target into the
/// classical bit of the same index, as [`Instruction::measure`] does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "InstructionRecord")]
pub struct Instruction {
    /// The operation.
    pub opcode: Opcode,
    /// Target qubits, in operand order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<QubitId>,
    /// Control qubit for controlled two-qubit opcodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<QubitId>,
    /// Angle parameters in radians.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
    /// Classical destinations, one per measured target.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clbits: Vec<ClbitId>,
    /// Per-instruction repetition count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots: Option<u32>,
}

/// Wire form of [`Instruction`], before defaults are filled in.
#[derive(Deserialize)]
struct InstructionRecord {
    opcode: Opcode,
    #[serde(default)]
    targets: Vec<QubitId>,
    #[serde(default)]
    control: Option<QubitId>,
    #[serde(default)]
    params: Vec<f64>,
    #[serde(default)]
    clbits: Vec<ClbitId>,
    #[serde(default)]
    shots: Option<u32>,
}

impl From<InstructionRecord> for Instruction {
    fn from(record: InstructionRecord) -> Self {
        let clbits = if record.opcode == Opcode::Measure && record.clbits.is_empty() {
            record.targets.iter().map(|q| ClbitId(q.0)).collect()
        } else {
            record.clbits
        };
        Self {
            opcode: record.opcode,
            targets: record.targets,
            control: record.control,
            params: record.params,
            clbits,
            shots: record.shots,
        }
    }
}

impl Instruction {
    fn bare(opcode: Opcode) -> Self {
        Self {
            opcode,
            targets: vec![],
            control: None,
            params: vec![],
            clbits: vec![],
            shots: None,
        }
    }

    /// A parameterless single-qubit gate.
    pub fn single(opcode: Opcode, qubit: QubitId) -> Self {
        Self {
            targets: vec![qubit],
            ..Self::bare(opcode)
        }
    }

    /// A single-qubit gate with parameters.
    pub fn single_with_params(
        opcode: Opcode,
        qubit: QubitId,
        params: impl IntoIterator<Item = f64>,
    ) -> Self {
        Self {
            targets: vec![qubit],
            params: params.into_iter().collect(),
            ..Self::bare(opcode)
        }
    }

    /// A one-angle rotation.
    pub fn rotation(opcode: Opcode, qubit: QubitId, theta: f64) -> Self {
        Self::single_with_params(opcode, qubit, [theta])
    }

    /// A parameterless controlled gate.
    pub fn controlled(opcode: Opcode, control: QubitId, target: QubitId) -> Self {
        Self {
            targets: vec![target],
            control: Some(control),
            ..Self::bare(opcode)
        }
    }

    /// A controlled gate with parameters.
    pub fn controlled_with_params(
        opcode: Opcode,
        control: QubitId,
        target: QubitId,
        params: impl IntoIterator<Item = f64>,
    ) -> Self {
        Self {
            targets: vec![target],
            control: Some(control),
            params: params.into_iter().collect(),
            ..Self::bare(opcode)
        }
    }

    /// A symmetric two-qubit gate (swap, sqiswap).
    pub fn symmetric(opcode: Opcode, a: QubitId, b: QubitId) -> Self {
        Self {
            targets: vec![a, b],
            ..Self::bare(opcode)
        }
    }

    /// Exchange the states of two qubits.
    pub fn swap(a: QubitId, b: QubitId) -> Self {
        Self::symmetric(Opcode::Swap, a, b)
    }

    /// Measure qubits into the classical bits with the same indices.
    pub fn measure(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        let targets: Vec<QubitId> = qubits.into_iter().collect();
        let clbits = targets.iter().map(|q| ClbitId(q.0)).collect();
        Self {
            targets,
            clbits,
            ..Self::bare(Opcode::Measure)
        }
    }

    /// Measure qubits into explicit classical bits.
    pub fn measure_into(
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> Self {
        Self {
            targets: qubits.into_iter().collect(),
            clbits: clbits.into_iter().collect(),
            ..Self::bare(Opcode::Measure)
        }
    }

    /// Reset qubits to |0>.
    pub fn reset(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            targets: qubits.into_iter().collect(),
            ..Self::bare(Opcode::Reset)
        }
    }

    /// An operation that does nothing.
    pub fn nop() -> Self {
        Self::bare(Opcode::Nop)
    }

    /// Saturation spectroscopy on the given qubits.
    pub fn satspect(qubits: impl IntoIterator<Item = QubitId>, shots: u32) -> Self {
        Self {
            targets: qubits.into_iter().collect(),
            shots: Some(shots),
            ..Self::bare(Opcode::SatSpect)
        }
    }

    /// Attach a per-instruction shot count.
    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = Some(shots);
        self
    }

    /// All qubits touched, control first.
    pub fn operands(&self) -> Vec<QubitId> {
        self.control.iter().chain(&self.targets).copied().collect()
    }

    /// The `(first, second)` operand pair of a two-qubit instruction.
    ///
    /// Controlled gates yield `(control, target)`; symmetric gates yield
    /// their two targets in order.
    pub fn qubit_pair(&self) -> Option<(QubitId, QubitId)> {
        if !self.opcode.is_two_qubit() {
            return None;
        }
        match (self.control, self.targets.as_slice()) {
            (Some(c), [t]) => Some((c, *t)),
            (None, [a, b]) => Some((*a, *b)),
            _ => None,
        }
    }

    /// Copy of this instruction with every qubit operand passed through `f`.
    #[must_use]
    pub fn map_qubits(&self, mut f: impl FnMut(QubitId) -> QubitId) -> Self {
        Self {
            opcode: self.opcode,
            targets: self.targets.iter().map(|&q| f(q)).collect(),
            control: self.control.map(&mut f),
            params: self.params.clone(),
            clbits: self.clbits.clone(),
            shots: self.shots,
        }
    }

    /// Structural validation against register sizes.
    pub fn validate(&self, num_qubits: u32, num_clbits: u32) -> Result<(), InstructionFault> {
        let controls = usize::from(self.control.is_some());
        let shape_fault = |expected| InstructionFault::OperandShape {
            expected,
            targets: self.targets.len(),
            controls,
        };
        match self.opcode.shape() {
            OpcodeShape::SingleQubit if self.targets.len() != 1 || controls != 0 => {
                return Err(shape_fault("one target"));
            }
            OpcodeShape::Controlled if self.targets.len() != 1 || controls != 1 => {
                return Err(shape_fault("one control and one target"));
            }
            OpcodeShape::Symmetric if self.targets.len() != 2 || controls != 0 => {
                return Err(shape_fault("two targets"));
            }
            OpcodeShape::MultiTarget if self.targets.is_empty() || controls != 0 => {
                return Err(shape_fault("at least one target"));
            }
            OpcodeShape::Nullary if !self.targets.is_empty() || controls != 0 => {
                return Err(shape_fault("no operands"));
            }
            _ => {}
        }

        for qubit in self.operands() {
            if qubit.0 >= num_qubits {
                return Err(InstructionFault::QubitOutOfRange { qubit, num_qubits });
            }
        }
        for (i, q) in self.targets.iter().enumerate() {
            if self.targets[..i].contains(q) {
                return Err(InstructionFault::DuplicateTarget(*q));
            }
        }
        if let Some(c) = self.control {
            if self.targets.contains(&c) {
                return Err(InstructionFault::ControlTargetOverlap(c));
            }
        }

        let expected = self.opcode.num_params();
        if self.params.len() != expected {
            return Err(InstructionFault::ParameterArity {
                expected,
                got: self.params.len(),
            });
        }
        if let Some(i) = self.params.iter().position(|p| !p.is_finite()) {
            return Err(InstructionFault::NonFiniteParameter(i));
        }

        if self.opcode == Opcode::Measure {
            if self.clbits.len() != self.targets.len() {
                return Err(InstructionFault::ClbitArity {
                    qubits: self.targets.len(),
                    clbits: self.clbits.len(),
                });
            }
            if let Some(&clbit) = self.clbits.iter().find(|c| c.0 >= num_clbits) {
                return Err(InstructionFault::ClbitOutOfRange { clbit, num_clbits });
            }
        } else if !self.clbits.is_empty() {
            return Err(InstructionFault::UnexpectedClbits);
        }

        match self.shots {
            Some(0) => Err(InstructionFault::ZeroShots),
            None if self.opcode.requires_shots() => Err(InstructionFault::MissingShots),
            _ => Ok(()),
        }
    }
}
