//! Error types for the IR crate.

use thiserror::Error;

use crate::opcode::Opcode;
use crate::qubit::{ClbitId, QubitId};

/// A structural defect in a single instruction.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum InstructionFault {
    /// Qubit index outside the quantum register.
    #[error("qubit {qubit} out of range for a {num_qubits}-qubit register")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Register size.
        num_qubits: u32,
    },

    /// Classical bit index outside the classical register.
    #[error("classical bit {clbit} out of range for a {num_clbits}-bit register")]
    ClbitOutOfRange {
        /// The offending bit.
        clbit: ClbitId,
        /// Register size.
        num_clbits: u32,
    },

    /// The control qubit also appears among the targets.
    #[error("control {0} is also a target")]
    ControlTargetOverlap(QubitId),

    /// The same target appears twice.
    #[error("target {0} appears more than once")]
    DuplicateTarget(QubitId),

    /// Operands do not match the opcode's shape.
    #[error("expected {expected}, got {targets} target(s) and {controls} control(s)")]
    OperandShape {
        /// Human readable shape description.
        expected: &'static str,
        /// Number of targets supplied.
        targets: usize,
        /// Number of controls supplied (0 or 1).
        controls: usize,
    },

    /// Wrong number of parameters.
    #[error("expected {expected} parameter(s), got {got}")]
    ParameterArity {
        /// Arity of the opcode.
        expected: usize,
        /// Parameters supplied.
        got: usize,
    },

    /// A parameter is NaN or infinite.
    #[error("parameter {0} is not a finite number")]
    NonFiniteParameter(usize),

    /// Measurement destinations do not pair up with measured qubits.
    #[error("{qubits} measured qubit(s) but {clbits} classical destination(s)")]
    ClbitArity {
        /// Number of measured qubits.
        qubits: usize,
        /// Number of classical destinations.
        clbits: usize,
    },

    /// Classical destinations given on a non-measurement opcode.
    #[error("only measurements write classical bits")]
    UnexpectedClbits,

    /// Characterization instruction without a shot count.
    #[error("a shot count is required")]
    MissingShots,

    /// A shot count of zero.
    #[error("shot count must be positive")]
    ZeroShots,
}

/// Inconsistent input to a state-preparation block.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum PreparationFault {
    /// A bitstring or amplitude vector has the wrong length.
    #[error("expected {expected} entries, got {got}")]
    LengthMismatch {
        /// Length implied by the targets.
        expected: usize,
        /// Length supplied.
        got: usize,
    },

    /// A bitstring character other than `0` or `1`.
    #[error("bitstring may only contain '0' and '1', found {0:?}")]
    InvalidBit(char),

    /// The same qubit listed twice.
    #[error("qubit {0} listed more than once")]
    DuplicateQubit(QubitId),

    /// A qubit outside the block's targets.
    #[error("qubit {0} is not among the targets")]
    NotATarget(QubitId),

    /// An amplitude vector with (numerically) zero norm.
    #[error("state vector has zero norm")]
    ZeroNorm,

    /// Too many targets to index a state vector.
    #[error("{0} qubits is too many for a dense state vector")]
    TooManyQubits(usize),
}

/// Errors that can occur in IR operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// An instruction failed structural validation.
    #[error("Invalid instruction #{position} ({opcode}): {fault}")]
    InvalidInstruction {
        /// Position of the instruction in the circuit.
        position: usize,
        /// Its opcode.
        opcode: Opcode,
        /// What is wrong with it.
        fault: InstructionFault,
    },

    /// A state-preparation block rejected its inputs.
    #[error("Invalid state preparation: {0}")]
    InvalidPreparation(#[from] PreparationFault),

    /// Unknown opcode mnemonic.
    #[error("Unknown opcode '{0}'")]
    UnknownOpcode(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
