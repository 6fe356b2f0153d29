//! LCCFQ Circuit Intermediate Representation
//!
//! This crate defines the instruction set and the circuit value that every
//! compilation stage consumes and produces.
//!
//! # Core Components
//!
//! - [`Opcode`]: the closed set of operations, each with a fixed operand
//!   shape and parameter arity
//! - [`Instruction`]: one opcode applied to targets, an optional control,
//!   parameters, classical destinations and an optional shot count
//! - [`Circuit`]: an immutable ordered program over quantum and classical
//!   registers
//! - [`CircuitBuilder`]: validated, append-only construction
//! - [`prepare`]: basis, uniform and arbitrary state-preparation blocks
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use lccfq_ir::{CircuitBuilder, Opcode, QubitId};
//!
//! let mut builder = CircuitBuilder::new("bell", 2, 2);
//! builder
//!     .h(QubitId(0))?
//!     .cx(QubitId(0), QubitId(1))?
//!     .measure_all()?;
//! let circuit = builder.build();
//!
//! assert_eq!(circuit.len(), 3);
//! assert_eq!(circuit.instructions()[1].opcode, Opcode::Cx);
//! # Ok::<(), lccfq_ir::IrError>(())
//! ```
//!
//! # Supported Opcodes
//!
//! | Opcode | Qubits | Params |
//! |--------|--------|--------|
//! | `x` `y` `z` `h` `s` `sdg` `t` `tdg` | 1 | 0 |
//! | `rx` `ry` `rz` `p` `phase` | 1 | 1 |
//! | `u2` / `u3` | 1 | 2 / 3 |
//! | `cx` `cy` `cz` `ch` | control + target | 0 |
//! | `swap` `sqiswap` | 2 targets | 0 |
//! | `cp` `crx` `cry` `crz` `cphase` | control + target | 1 |
//! | `cu` | control + target | 4 |
//! | `measure` `reset` | 1+ | 0 |
//! | `nop` | 0 | 0 |
//! | `satspect` | 1+ (shots required) | 0 |

pub mod builder;
pub mod circuit;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod prepare;
pub mod qubit;

pub use builder::CircuitBuilder;
pub use circuit::{Circuit, DEFAULT_SHOTS};
pub use error::{InstructionFault, IrError, IrResult, PreparationFault};
pub use instruction::Instruction;
pub use opcode::{Opcode, OpcodeKind, OpcodeShape};
pub use prepare::{Basis, Endianness};
pub use qubit::{ClbitId, QubitId};
