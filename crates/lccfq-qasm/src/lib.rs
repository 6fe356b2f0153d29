//! `OpenQASM` 3 Export for LCCFQ
//!
//! Renders a circuit, usually a transpiled one, as an `OpenQASM` 3.0
//! program that other toolchains can read.
//!
//! | Instruction | Output |
//! |-------------|--------|
//! | Gates | `rx(pi/2) q[0];`, `cx q[0], q[1];` |
//! | `sqiswap` | `sqiswap q[0], q[1];` plus an inline `gate` definition |
//! | Measurement | `c[0] = measure q[0];`, one line per qubit |
//! | Reset | `reset q[0];`, one line per qubit |
//! | No-op | `// nop` |
//! | `satspect` | `#pragma lccfq satspect shots=500 q[0]` |
//!
//! # Example
//!
//! ```rust
//! use lccfq_ir::Circuit;
//! use lccfq_qasm::emit;
//!
//! let qasm = emit(&Circuit::bell().unwrap()).unwrap();
//! assert!(qasm.contains("OPENQASM 3.0;"));
//! assert!(qasm.contains("h q[0];"));
//! assert!(qasm.contains("cx q[0], q[1];"));
//! ```

mod emitter;
mod error;

pub use emitter::{PARAM_DIGITS, emit, format_param};
pub use error::{QasmError, QasmResult};
