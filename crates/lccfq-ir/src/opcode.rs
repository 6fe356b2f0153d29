//! The closed opcode set of the instruction set architecture.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IrError;

/// Operand layout an opcode expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpcodeShape {
    /// Exactly one target, no control.
    SingleQubit,
    /// One control and one target.
    Controlled,
    /// Two targets, no control. The operation is symmetric in its operands.
    Symmetric,
    /// One or more distinct targets, no control.
    MultiTarget,
    /// No operands at all.
    Nullary,
}

/// Coarse classification of opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpcodeKind {
    /// Fixed single-qubit gate (X, H, S, ...).
    FixedSingle,
    /// Single-qubit rotation with one angle.
    ParametricSingle,
    /// Single-qubit gate that expands into primitive rotations.
    CompositeSingle,
    /// Fixed two-qubit gate.
    FixedTwo,
    /// Two-qubit gate with one angle.
    ParametricTwo,
    /// Two-qubit gate that expands into primitives.
    CompositeTwo,
    /// Measurement into classical bits.
    Measurement,
    /// Reset to |0>.
    Reset,
    /// No operation.
    NoOp,
    /// Hardware characterization primitive.
    Characterization,
}

/// An operation code.
///
/// Every instruction names exactly one opcode; the opcode determines the
/// operand shape and the parameter arity the instruction must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Opcode {
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
    Rx,
    Ry,
    Rz,
    P,
    Phase,
    U2,
    U3,
    Cx,
    Cy,
    Cz,
    Ch,
    Swap,
    SqiSwap,
    Cp,
    Crx,
    Cry,
    Crz,
    CPhase,
    Cu,
    Measure,
    Reset,
    Nop,
    SatSpect,
}

impl Opcode {
    /// All opcodes, in declaration order.
    pub const ALL: [Opcode; 31] = [
        Opcode::X,
        Opcode::Y,
        Opcode::Z,
        Opcode::H,
        Opcode::S,
        Opcode::Sdg,
        Opcode::T,
        Opcode::Tdg,
        Opcode::Rx,
        Opcode::Ry,
        Opcode::Rz,
        Opcode::P,
        Opcode::Phase,
        Opcode::U2,
        Opcode::U3,
        Opcode::Cx,
        Opcode::Cy,
        Opcode::Cz,
        Opcode::Ch,
        Opcode::Swap,
        Opcode::SqiSwap,
        Opcode::Cp,
        Opcode::Crx,
        Opcode::Cry,
        Opcode::Crz,
        Opcode::CPhase,
        Opcode::Cu,
        Opcode::Measure,
        Opcode::Reset,
        Opcode::Nop,
        Opcode::SatSpect,
    ];

    /// Lower-case mnemonic.
    pub fn name(&self) -> &'static str {
        match self {
            Opcode::X => "x",
            Opcode::Y => "y",
            Opcode::Z => "z",
            Opcode::H => "h",
            Opcode::S => "s",
            Opcode::Sdg => "sdg",
            Opcode::T => "t",
            Opcode::Tdg => "tdg",
            Opcode::Rx => "rx",
            Opcode::Ry => "ry",
            Opcode::Rz => "rz",
            Opcode::P => "p",
            Opcode::Phase => "phase",
            Opcode::U2 => "u2",
            Opcode::U3 => "u3",
            Opcode::Cx => "cx",
            Opcode::Cy => "cy",
            Opcode::Cz => "cz",
            Opcode::Ch => "ch",
            Opcode::Swap => "swap",
            Opcode::SqiSwap => "sqiswap",
            Opcode::Cp => "cp",
            Opcode::Crx => "crx",
            Opcode::Cry => "cry",
            Opcode::Crz => "crz",
            Opcode::CPhase => "cphase",
            Opcode::Cu => "cu",
            Opcode::Measure => "measure",
            Opcode::Reset => "reset",
            Opcode::Nop => "nop",
            Opcode::SatSpect => "satspect",
        }
    }

    /// Look up an opcode by mnemonic. `cnot` is accepted for `cx`.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower == "cnot" {
            return Some(Opcode::Cx);
        }
        Self::ALL.into_iter().find(|op| op.name() == lower)
    }

    /// Classification of this opcode.
    pub fn kind(&self) -> OpcodeKind {
        match self {
            Opcode::X
            | Opcode::Y
            | Opcode::Z
            | Opcode::H
            | Opcode::S
            | Opcode::Sdg
            | Opcode::T
            | Opcode::Tdg => OpcodeKind::FixedSingle,
            Opcode::Rx | Opcode::Ry | Opcode::Rz | Opcode::P | Opcode::Phase => {
                OpcodeKind::ParametricSingle
            }
            Opcode::U2 | Opcode::U3 => OpcodeKind::CompositeSingle,
            Opcode::Cx | Opcode::Cy | Opcode::Cz | Opcode::Ch | Opcode::Swap | Opcode::SqiSwap => {
                OpcodeKind::FixedTwo
            }
            Opcode::Cp | Opcode::Crx | Opcode::Cry | Opcode::Crz | Opcode::CPhase => {
                OpcodeKind::ParametricTwo
            }
            Opcode::Cu => OpcodeKind::CompositeTwo,
            Opcode::Measure => OpcodeKind::Measurement,
            Opcode::Reset => OpcodeKind::Reset,
            Opcode::Nop => OpcodeKind::NoOp,
            Opcode::SatSpect => OpcodeKind::Characterization,
        }
    }

    /// Operand layout this opcode requires.
    pub fn shape(&self) -> OpcodeShape {
        match self.kind() {
            OpcodeKind::FixedSingle | OpcodeKind::ParametricSingle | OpcodeKind::CompositeSingle => {
                OpcodeShape::SingleQubit
            }
            OpcodeKind::FixedTwo if matches!(self, Opcode::Swap | Opcode::SqiSwap) => {
                OpcodeShape::Symmetric
            }
            OpcodeKind::FixedTwo | OpcodeKind::ParametricTwo | OpcodeKind::CompositeTwo => {
                OpcodeShape::Controlled
            }
            OpcodeKind::Measurement | OpcodeKind::Reset | OpcodeKind::Characterization => {
                OpcodeShape::MultiTarget
            }
            OpcodeKind::NoOp => OpcodeShape::Nullary,
        }
    }

    /// Number of angle parameters this opcode takes.
    pub fn num_params(&self) -> usize {
        match self {
            Opcode::Rx
            | Opcode::Ry
            | Opcode::Rz
            | Opcode::P
            | Opcode::Phase
            | Opcode::Cp
            | Opcode::Crx
            | Opcode::Cry
            | Opcode::Crz
            | Opcode::CPhase => 1,
            Opcode::U2 => 2,
            Opcode::U3 => 3,
            Opcode::Cu => 4,
            _ => 0,
        }
    }

    /// Whether this opcode acts on exactly two qubits that must be adjacent.
    pub fn is_two_qubit(&self) -> bool {
        matches!(
            self.shape(),
            OpcodeShape::Controlled | OpcodeShape::Symmetric
        )
    }

    /// Whether this opcode must be expanded before transpilation.
    pub fn is_composite(&self) -> bool {
        matches!(
            self.kind(),
            OpcodeKind::CompositeSingle | OpcodeKind::CompositeTwo
        )
    }

    /// Whether this opcode is a unitary gate.
    ///
    /// Measurement, reset, no-op and characterization are not, and every
    /// target treats them as native.
    pub fn is_unitary(&self) -> bool {
        !matches!(
            self.kind(),
            OpcodeKind::Measurement
                | OpcodeKind::Reset
                | OpcodeKind::NoOp
                | OpcodeKind::Characterization
        )
    }

    /// Whether instructions with this opcode must carry a shot count.
    pub fn requires_shots(&self) -> bool {
        self.kind() == OpcodeKind::Characterization
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Opcode {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Opcode::from_name(s).ok_or_else(|| IrError::UnknownOpcode(s.to_string()))
    }
}
