//! Rewriting into a target's native gate set.

use std::sync::Arc;

use tracing::{debug, instrument};

use lccfq_ir::{Circuit, Instruction, Opcode};

use crate::error::{CompileError, CompileResult};
use crate::native::NativeGateSet;
use crate::pass::Pass;
use crate::pipeline::Stage;
use crate::property::PropertySet;
use crate::topology::Topology;

/// Rewrites may reference other non-native opcodes; this bounds the chain.
pub const MAX_REWRITE_DEPTH: usize = 8;

/// The transpilation stage.
///
/// Unitary instructions the target supports are kept as they are; the rest
/// are rewritten with the target's rules, recursively, until only native
/// opcodes remain. Non-unitary instructions pass through when the target
/// runs them. With a topology available, the output is checked once more
/// so that no rewrite put a two-qubit gate on an uncoupled pair.
#[derive(Debug, Clone)]
pub struct Transpiler {
    target: Arc<dyn NativeGateSet>,
}

impl Transpiler {
    /// A transpiler for `target`.
    pub fn new(target: Arc<dyn NativeGateSet>) -> Self {
        Self { target }
    }

    /// The target gate set.
    pub fn target(&self) -> &dyn NativeGateSet {
        self.target.as_ref()
    }

    /// Rewrite `circuit` into native opcodes, then verify adjacency when
    /// `topology` is given.
    pub fn transpile(&self, circuit: &Circuit, topology: Option<&Topology>) -> CompileResult<Circuit> {
        let mut out = Vec::with_capacity(circuit.len());
        for (position, inst) in circuit.instructions().iter().enumerate() {
            self.lower(position, inst.opcode, inst, 0, &mut out)?;
        }
        if let Some(topology) = topology {
            verify_adjacency(&out, topology)?;
        }
        Ok(circuit.with_instructions(circuit.num_qubits(), out))
    }

    fn lower(
        &self,
        position: usize,
        origin: Opcode,
        inst: &Instruction,
        depth: usize,
        out: &mut Vec<Instruction>,
    ) -> CompileResult<()> {
        let untranspilable = || CompileError::UntranspilableOpcode {
            position,
            opcode: origin,
            target: self.target.name().to_string(),
        };

        if !inst.opcode.is_unitary() {
            if !self.target.runs(inst.opcode) {
                return Err(untranspilable());
            }
            out.push(inst.clone());
            return Ok(());
        }
        if self.target.supports(inst.opcode) {
            out.push(inst.clone());
            return Ok(());
        }
        if depth >= MAX_REWRITE_DEPTH {
            return Err(untranspilable());
        }
        let rewritten = self.target.rewrite(inst).ok_or_else(untranspilable)?;
        for step in &rewritten {
            self.lower(position, origin, step, depth + 1, out)?;
        }
        Ok(())
    }
}

/// Every two-qubit instruction must act on a coupled pair.
fn verify_adjacency(instructions: &[Instruction], topology: &Topology) -> CompileResult<()> {
    for (position, inst) in instructions.iter().enumerate() {
        if let Some((a, b)) = inst.qubit_pair() {
            if !topology.is_adjacent(a.0, b.0) {
                return Err(CompileError::AdjacencyViolation {
                    position,
                    opcode: inst.opcode,
                    a: a.0,
                    b: b.0,
                });
            }
        }
    }
    Ok(())
}

impl Pass for Transpiler {
    fn name(&self) -> &str {
        "Transpiler"
    }

    fn stage(&self) -> Stage {
        Stage::Transpiled
    }

    #[instrument(skip_all, fields(target = self.target.name()))]
    fn run(&self, circuit: &Circuit, properties: &mut PropertySet) -> CompileResult<Circuit> {
        let out = self.transpile(circuit, properties.topology.as_deref())?;
        debug!(
            "Transpiled {} instructions into {} native instructions",
            circuit.len(),
            out.len()
        );
        Ok(out)
    }
}
