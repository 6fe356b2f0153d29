//! Error types for QASM export.

use thiserror::Error;

/// Errors that can occur while emitting QASM.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QasmError {
    /// The circuit failed structural validation.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(#[from] lccfq_ir::IrError),

    /// Writing to the output buffer failed.
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Result type for export operations.
pub type QasmResult<T> = Result<T, QasmError>;
