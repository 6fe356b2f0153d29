//! LCCFQ Compilation Pipeline
//!
//! This crate lowers abstract circuits onto a concrete device: a fixed qubit
//! [`Topology`] and a [`NativeGateSet`]. Compilation is a chain of stages,
//! each a [`Pass`] that can be stopped after:
//!
//! ```text
//! raw ──Mapper──▶ mapped ──Router──▶ swapped ──Decomposer──▶ expanded
//!                                                              │
//!                                 transpiled ◀──Transpiler─────┘
//! ```
//!
//! 1. **Mapper**: choose an initial placement of virtual onto physical qubits
//! 2. **Router**: insert `swap`s so every two-qubit gate acts on coupled qubits
//! 3. **Decomposer**: expand composite gates (`u2`, `u3`, `cu`)
//! 4. **Transpiler**: rewrite everything into the target's native opcodes
//!
//! After the router, instructions refer to *physical* qubits and the circuit
//! register is as wide as the topology.
//!
//! # Example
//!
//! ```rust
//! use lccfq_compile::{Pipeline, Stage, Topology};
//! use lccfq_ir::Circuit;
//!
//! let pipeline = Pipeline::builder()
//!     .topology(Topology::linear(3))
//!     .architecture("pfaff_v1")
//!     .build()?;
//!
//! let program = pipeline.run(&Circuit::ghz(3)?, Stage::Transpiled)?;
//! assert!(program
//!     .circuit
//!     .instructions()
//!     .iter()
//!     .all(|i| pipeline.target().supports(i.opcode) || !i.opcode.is_unitary()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Targets
//!
//! Architectures are created by name through the [`ArchitectureRegistry`];
//! see [`native`] for the built-in ones. New targets implement
//! [`NativeGateSet`] and are registered with a factory closure.

pub mod error;
pub mod mapping;
pub mod native;
pub mod pass;
pub mod passes;
pub mod pipeline;
pub mod property;
pub mod topology;
pub mod unitary;

pub use error::{CompileError, CompileResult};
pub use mapping::Mapping;
pub use native::{ArchitectureRegistry, Ideal, NativeGateSet, NeutralAtom, XyiSwap};
pub use pass::Pass;
pub use passes::{
    Decomposer, IdentityPlacement, InteractionPlacement, Mapper, PlacementPolicy, Router,
    Transpiler, placement_by_name,
};
pub use pipeline::{CompiledProgram, Pipeline, PipelineBuilder, Stage};
pub use property::PropertySet;
pub use topology::{Topology, TopologySpec};
