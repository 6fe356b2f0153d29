//! Error types for the compilation crate.

use lccfq_ir::{InstructionFault, IrError, Opcode, QubitId};
use thiserror::Error;

/// Errors that can occur during compilation.
///
/// Every pass fails fast with one of these; no partially compiled circuit
/// is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Structural validation failed before mapping.
    #[error("Invalid instruction #{position} ({opcode}): {fault}")]
    InvalidInstruction {
        position: usize,
        opcode: Opcode,
        fault: InstructionFault,
    },

    /// Other error from the IR crate.
    #[error("IR error: {0}")]
    Ir(IrError),

    /// More virtual qubits than the topology offers.
    #[error("Circuit requires {required} qubits but topology only has {available}")]
    InsufficientQubits { required: u32, available: u32 },

    /// The operands of a two-qubit instruction lie in different components.
    #[error(
        "Cannot route instruction #{position} ({opcode}): physical qubits {from} and {to} are not connected"
    )]
    UnroutablePath {
        position: usize,
        opcode: Opcode,
        from: u32,
        to: u32,
    },

    /// A composite opcode without a decomposition rule.
    #[error("No decomposition registered for instruction #{position} ({opcode})")]
    UnsupportedOpcode { position: usize, opcode: Opcode },

    /// No rewrite path into the target's native set.
    #[error("Instruction #{position} ({opcode}) cannot be expressed on target '{target}'")]
    UntranspilableOpcode {
        position: usize,
        opcode: Opcode,
        target: String,
    },

    /// A rewrite produced a two-qubit instruction on non-adjacent qubits.
    #[error(
        "Instruction #{position} ({opcode}) acts on non-adjacent physical qubits {a} and {b}"
    )]
    AdjacencyViolation {
        position: usize,
        opcode: Opcode,
        a: u32,
        b: u32,
    },

    /// No native gate set registered under this name.
    #[error("Unknown architecture '{0}'")]
    UnknownArchitecture(String),

    /// No placement policy registered under this name.
    #[error("Unknown placement policy '{0}'")]
    UnknownPlacement(String),

    /// Unrecognized stage name.
    #[error("Unknown compiler stage '{0}'")]
    UnknownStage(String),

    /// Malformed topology description.
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// Malformed or non-bijective mapping.
    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    /// A virtual qubit has no physical binding.
    #[error("Virtual qubit {0} is not mapped")]
    UnmappedQubit(QubitId),

    /// A pass ran without a property it depends on.
    #[error("Missing {0} for compilation")]
    MissingProperty(&'static str),
}

impl From<IrError> for CompileError {
    fn from(err: IrError) -> Self {
        match err {
            IrError::InvalidInstruction {
                position,
                opcode,
                fault,
            } => CompileError::InvalidInstruction {
                position,
                opcode,
                fault,
            },
            other => CompileError::Ir(other),
        }
    }
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
