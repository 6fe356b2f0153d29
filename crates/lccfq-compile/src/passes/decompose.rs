//! Expansion of composite gates into primitives.

use std::f64::consts::FRAC_PI_2;

use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use lccfq_ir::{Circuit, Instruction, Opcode};

use crate::error::{CompileError, CompileResult};
use crate::native::{cx, ry, rz};
use crate::pass::Pass;
use crate::pipeline::Stage;
use crate::property::PropertySet;

/// A decomposition rule.
///
/// Pure: the output depends only on the instruction's parameters and acts
/// on the instruction's own qubits. Returns `None` only when the operands do
/// not fit the opcode, which validation rules out.
pub type DecompositionRule = fn(&Instruction) -> Option<Vec<Instruction>>;

/// U3(θ, φ, λ) = Rz(φ)·Ry(θ)·Rz(λ) up to global phase.
fn u3_rule(inst: &Instruction) -> Option<Vec<Instruction>> {
    let q = *inst.targets.first()?;
    let [theta, phi, lambda] = inst.params.as_slice() else {
        return None;
    };
    Some(vec![rz(q, *lambda), ry(q, *theta), rz(q, *phi)])
}

/// U2(φ, λ) = U3(π/2, φ, λ).
fn u2_rule(inst: &Instruction) -> Option<Vec<Instruction>> {
    let q = *inst.targets.first()?;
    let [phi, lambda] = inst.params.as_slice() else {
        return None;
    };
    Some(vec![rz(q, *lambda), ry(q, FRAC_PI_2), rz(q, *phi)])
}

/// Controlled e^{iγ}·U3(θ, φ, λ), via two CX.
fn cu_rule(inst: &Instruction) -> Option<Vec<Instruction>> {
    let (c, t) = inst.qubit_pair()?;
    let &[theta, phi, lambda, gamma] = inst.params.as_slice() else {
        return None;
    };
    Some(vec![
        rz(c, gamma + (lambda + phi) / 2.0),
        rz(t, (lambda - phi) / 2.0),
        cx(c, t),
        rz(t, -(phi + lambda) / 2.0),
        ry(t, -theta / 2.0),
        cx(c, t),
        ry(t, theta / 2.0),
        rz(t, phi),
    ])
}

/// The expansion stage.
///
/// Every composite opcode is replaced by the output of its registered rule;
/// all other instructions pass through unchanged.
#[derive(Debug, Clone)]
pub struct Decomposer {
    rules: FxHashMap<Opcode, DecompositionRule>,
}

impl Decomposer {
    /// A decomposer with the built-in rules for `u2`, `u3` and `cu`.
    pub fn new() -> Self {
        let mut decomposer = Self::empty();
        decomposer.register(Opcode::U2, u2_rule);
        decomposer.register(Opcode::U3, u3_rule);
        decomposer.register(Opcode::Cu, cu_rule);
        decomposer
    }

    /// A decomposer without any rules.
    pub fn empty() -> Self {
        Self {
            rules: FxHashMap::default(),
        }
    }

    /// Register or replace the rule for `opcode`.
    pub fn register(&mut self, opcode: Opcode, rule: DecompositionRule) {
        self.rules.insert(opcode, rule);
    }

    /// Whether a rule is registered for `opcode`.
    pub fn has_rule(&self, opcode: Opcode) -> bool {
        self.rules.contains_key(&opcode)
    }

    /// Expand one instruction at `position`.
    pub fn expand(&self, position: usize, inst: &Instruction) -> CompileResult<Vec<Instruction>> {
        if !inst.opcode.is_composite() {
            return Ok(vec![inst.clone()]);
        }
        self.rules
            .get(&inst.opcode)
            .and_then(|rule| rule(inst))
            .ok_or(CompileError::UnsupportedOpcode {
                position,
                opcode: inst.opcode,
            })
    }

    /// Expand every composite instruction of `circuit`.
    pub fn decompose(&self, circuit: &Circuit) -> CompileResult<Circuit> {
        let mut out = Vec::with_capacity(circuit.len());
        for (position, inst) in circuit.instructions().iter().enumerate() {
            out.extend(self.expand(position, inst)?);
        }
        Ok(circuit.with_instructions(circuit.num_qubits(), out))
    }
}

impl Default for Decomposer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for Decomposer {
    fn name(&self) -> &str {
        "Decomposer"
    }

    fn stage(&self) -> Stage {
        Stage::Expanded
    }

    #[instrument(skip_all)]
    fn run(&self, circuit: &Circuit, _properties: &mut PropertySet) -> CompileResult<Circuit> {
        let out = self.decompose(circuit)?;
        debug!("Expanded {} instructions into {}", circuit.len(), out.len());
        Ok(out)
    }
}
