//! Incremental circuit construction.

use num_complex::Complex64;
use tracing::warn;

use crate::circuit::{Circuit, DEFAULT_SHOTS};
use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::prepare::{self, Basis, Endianness};
use crate::qubit::QubitId;

/// Appends instructions one at a time and produces a [`Circuit`].
///
/// Every instruction is validated when appended, so [`build`](Self::build)
/// cannot fail. The builder must be finalized with either `build` or
/// [`discard`](Self::discard); dropping one that still holds instructions
/// logs a warning.
#[derive(Debug)]
pub struct CircuitBuilder {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    shots: u32,
    instructions: Vec<Instruction>,
}

macro_rules! fixed_gate {
    ($($(#[$doc:meta])* $method:ident => $opcode:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $method(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
                self.append(Instruction::single(Opcode::$opcode, qubit))
            }
        )*
    };
}

macro_rules! rotation_gate {
    ($($(#[$doc:meta])* $method:ident => $opcode:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $method(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
                self.append(Instruction::rotation(Opcode::$opcode, qubit, theta))
            }
        )*
    };
}

macro_rules! controlled_rotation_gate {
    ($($(#[$doc:meta])* $method:ident => $opcode:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $method(
                &mut self,
                theta: f64,
                control: QubitId,
                target: QubitId,
            ) -> IrResult<&mut Self> {
                self.append(Instruction::controlled_with_params(
                    Opcode::$opcode,
                    control,
                    target,
                    [theta],
                ))
            }
        )*
    };
}

impl CircuitBuilder {
    /// Start a circuit over the given registers.
    pub fn new(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            shots: DEFAULT_SHOTS,
            instructions: vec![],
        }
    }

    /// Set the circuit repetition count.
    pub fn shots(&mut self, shots: u32) -> &mut Self {
        self.shots = shots;
        self
    }

    /// Validate and append one instruction.
    pub fn append(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        instruction
            .validate(self.num_qubits, self.num_clbits)
            .map_err(|fault| IrError::InvalidInstruction {
                position: self.instructions.len(),
                opcode: instruction.opcode,
                fault,
            })?;
        self.instructions.push(instruction);
        Ok(self)
    }

    /// Validate and append a sequence of instructions. Nothing is appended
    /// unless every instruction is valid.
    pub fn extend(&mut self, instructions: impl IntoIterator<Item = Instruction>) -> IrResult<&mut Self> {
        let instructions: Vec<Instruction> = instructions.into_iter().collect();
        for (offset, instruction) in instructions.iter().enumerate() {
            instruction
                .validate(self.num_qubits, self.num_clbits)
                .map_err(|fault| IrError::InvalidInstruction {
                    position: self.instructions.len() + offset,
                    opcode: instruction.opcode,
                    fault,
                })?;
        }
        self.instructions.extend(instructions);
        Ok(self)
    }

    /// Number of instructions appended so far.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Finalize into a circuit holding every appended instruction in order.
    pub fn build(mut self) -> Circuit {
        let instructions = std::mem::take(&mut self.instructions);
        Circuit::new(std::mem::take(&mut self.name), self.num_qubits, self.num_clbits)
            .with_shots(self.shots)
            .with_instructions(self.num_qubits, instructions)
    }

    /// Finalize without producing a circuit. Returns how many instructions
    /// were dropped.
    pub fn discard(mut self) -> usize {
        std::mem::take(&mut self.instructions).len()
    }

    fixed_gate! {
        /// Pauli-X.
        x => X;
        /// Pauli-Y.
        y => Y;
        /// Pauli-Z.
        z => Z;
        /// Hadamard.
        h => H;
        /// S gate.
        s => S;
        /// S-dagger.
        sdg => Sdg;
        /// T gate.
        t => T;
        /// T-dagger.
        tdg => Tdg;
    }

    rotation_gate! {
        /// Rotation about X.
        rx => Rx;
        /// Rotation about Y.
        ry => Ry;
        /// Rotation about Z.
        rz => Rz;
        /// Phase gate.
        p => P;
        /// Phase gate, alternative mnemonic.
        phase => Phase;
    }

    /// U2(φ, λ).
    pub fn u2(&mut self, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_with_params(
            Opcode::U2,
            qubit,
            [phi, lambda],
        ))
    }

    /// U3(θ, φ, λ).
    pub fn u3(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_with_params(
            Opcode::U3,
            qubit,
            [theta, phi, lambda],
        ))
    }

    /// Controlled-X.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::controlled(Opcode::Cx, control, target))
    }

    /// Controlled-Y.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::controlled(Opcode::Cy, control, target))
    }

    /// Controlled-Z.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::controlled(Opcode::Cz, control, target))
    }

    /// Controlled-Hadamard.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::controlled(Opcode::Ch, control, target))
    }

    /// Exchange two qubits.
    pub fn swap(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::swap(a, b))
    }

    /// Square root of iSWAP.
    pub fn sqiswap(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::symmetric(Opcode::SqiSwap, a, b))
    }

    controlled_rotation_gate! {
        /// Controlled phase.
        cp => Cp;
        /// Controlled phase, alternative mnemonic.
        cphase => CPhase;
        /// Controlled X rotation.
        crx => Crx;
        /// Controlled Y rotation.
        cry => Cry;
        /// Controlled Z rotation.
        crz => Crz;
    }

    /// Controlled U(θ, φ, λ) with an extra phase γ on the controlled branch.
    pub fn cu(
        &mut self,
        params: [f64; 4],
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::controlled_with_params(
            Opcode::Cu,
            control,
            target,
            params,
        ))
    }

    /// Measure qubits into classical bits with matching indices.
    pub fn measure(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.append(Instruction::measure(qubits))
    }

    /// Measure every qubit that has a matching classical bit.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let n = self.num_qubits.min(self.num_clbits);
        self.measure((0..n).map(QubitId))
    }

    /// Reset qubits to |0>.
    pub fn reset(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.append(Instruction::reset(qubits))
    }

    /// No operation.
    pub fn nop(&mut self) -> IrResult<&mut Self> {
        self.append(Instruction::nop())
    }

    /// Saturation spectroscopy.
    pub fn satspect(
        &mut self,
        qubits: impl IntoIterator<Item = QubitId>,
        shots: u32,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::satspect(qubits, shots))
    }

    /// Append [`prepare::prepare_basis`].
    pub fn prepare_basis(
        &mut self,
        targets: &[QubitId],
        bits: &str,
        basis: Basis,
        endianness: Endianness,
    ) -> IrResult<&mut Self> {
        self.extend(prepare::prepare_basis(targets, bits, basis, endianness)?)
    }

    /// Append [`prepare::prepare_uniform`].
    pub fn prepare_uniform(
        &mut self,
        targets: &[QubitId],
        qubits: Option<&[QubitId]>,
    ) -> IrResult<&mut Self> {
        self.extend(prepare::prepare_uniform(targets, qubits)?)
    }

    /// Append [`prepare::prepare_state`].
    pub fn prepare_state(
        &mut self,
        targets: &[QubitId],
        amplitudes: &[Complex64],
        endianness: Endianness,
    ) -> IrResult<&mut Self> {
        self.extend(prepare::prepare_state(targets, amplitudes, endianness)?)
    }
}

impl Drop for CircuitBuilder {
    fn drop(&mut self) {
        if !self.instructions.is_empty() {
            warn!(
                circuit = %self.name,
                pending = self.instructions.len(),
                "circuit builder dropped without being finalized"
            );
        }
    }
}
