//! Circuits: an ordered program over fixed-size registers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::builder::CircuitBuilder;
use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::qubit::QubitId;

/// Default number of repetitions when none is given.
pub const DEFAULT_SHOTS: u32 = 1000;

fn default_shots() -> u32 {
    DEFAULT_SHOTS
}

/// A quantum circuit.
///
/// A circuit never changes once built. Compilation passes read one circuit
/// and produce a new one with [`Circuit::with_instructions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    #[serde(default)]
    num_clbits: u32,
    #[serde(default = "default_shots")]
    shots: u32,
    #[serde(default)]
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// An empty circuit over the given registers.
    pub fn new(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            shots: DEFAULT_SHOTS,
            instructions: vec![],
        }
    }

    /// Build a circuit from instructions, validating each one.
    pub fn from_instructions(
        name: impl Into<String>,
        num_qubits: u32,
        num_clbits: u32,
        instructions: Vec<Instruction>,
    ) -> IrResult<Self> {
        let circuit = Self {
            instructions,
            ..Self::new(name, num_qubits, num_clbits)
        };
        circuit.validate()?;
        Ok(circuit)
    }

    /// Set the repetition count.
    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// A new circuit with the same name, classical register and shots.
    ///
    /// Used by compilation passes; the result is not re-validated.
    #[must_use]
    pub fn with_instructions(&self, num_qubits: u32, instructions: Vec<Instruction>) -> Self {
        Self {
            name: self.name.clone(),
            num_qubits,
            num_clbits: self.num_clbits,
            shots: self.shots,
            instructions,
        }
    }

    /// Check every instruction against the register sizes.
    pub fn validate(&self) -> IrResult<()> {
        for (position, inst) in self.instructions.iter().enumerate() {
            inst.validate(self.num_qubits, self.num_clbits)
                .map_err(|fault| IrError::InvalidInstruction {
                    position,
                    opcode: inst.opcode,
                    fault,
                })?;
        }
        Ok(())
    }

    /// Circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the quantum register.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Size of the classical register.
    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }

    /// Repetition count.
    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Count instructions per opcode.
    pub fn count_ops(&self) -> BTreeMap<Opcode, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.opcode).or_insert(0) += 1;
        }
        counts
    }

    /// Number of two-qubit instructions.
    pub fn num_two_qubit_ops(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| i.opcode.is_two_qubit())
            .count()
    }

    // =========================================================================
    // Common circuits
    // =========================================================================

    /// Bell state preparation with measurement.
    pub fn bell() -> IrResult<Self> {
        let mut builder = CircuitBuilder::new("bell", 2, 2);
        builder
            .h(QubitId(0))?
            .cx(QubitId(0), QubitId(1))?
            .measure_all()?;
        Ok(builder.build())
    }

    /// GHZ state over `n` qubits with measurement.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut builder = CircuitBuilder::new(format!("ghz_{n}"), n, n);
        if n > 0 {
            builder.h(QubitId(0))?;
            for i in 1..n {
                builder.cx(QubitId(i - 1), QubitId(i))?;
            }
            builder.measure_all()?;
        }
        Ok(builder.build())
    }
}
