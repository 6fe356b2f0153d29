//! Dense unitary simulation for checking rewrites.
//!
//! Only meant for a handful of qubits: matrices are stored densely, so a
//! circuit over `n` qubits costs `4^n` complex numbers. Qubit 0 is the most
//! significant bit of a basis index, and within a gate the first operand is
//! the most significant bit of the local matrix.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

use num_complex::Complex64;

use lccfq_ir::{Circuit, Instruction, Opcode, QubitId};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Default tolerance for [`Unitary::equiv_up_to_global_phase`].
pub const TOLERANCE: f64 = 1e-9;

/// A square complex matrix over `num_qubits` qubits, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Unitary {
    num_qubits: u32,
    dim: usize,
    data: Vec<Complex64>,
}

impl Unitary {
    /// The identity on `num_qubits` qubits.
    pub fn identity(num_qubits: u32) -> Self {
        let dim = 1_usize << num_qubits;
        let mut data = vec![ZERO; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = ONE;
        }
        Self {
            num_qubits,
            dim,
            data,
        }
    }

    fn from_rows<const D: usize>(num_qubits: u32, rows: [[Complex64; D]; D]) -> Self {
        Self {
            num_qubits,
            dim: D,
            data: rows.into_iter().flatten().collect(),
        }
    }

    /// Permutation moving the state of qubit `v` onto qubit `perm[v]`.
    ///
    /// Returns `None` if `perm` is not a permutation of `0..perm.len()`.
    pub fn permutation(perm: &[u32]) -> Option<Self> {
        let n = u32::try_from(perm.len()).ok()?;
        let mut seen = vec![false; perm.len()];
        for &p in perm {
            let slot = seen.get_mut(p as usize)?;
            if *slot {
                return None;
            }
            *slot = true;
        }
        let dim = 1_usize << n;
        let mut data = vec![ZERO; dim * dim];
        for col in 0..dim {
            let mut row = 0;
            for (v, &p) in perm.iter().enumerate() {
                if bit(col, v as u32, n) {
                    row |= 1_usize << (n - 1 - p);
                }
            }
            data[row * dim + col] = ONE;
        }
        Some(Self {
            num_qubits: n,
            dim,
            data,
        })
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dim + col]
    }

    /// Matrix product `self · rhs`.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions differ.
    pub fn mul(&self, rhs: &Unitary) -> Unitary {
        assert_eq!(self.dim, rhs.dim, "dimension mismatch");
        let dim = self.dim;
        let mut data = vec![ZERO; dim * dim];
        for i in 0..dim {
            for k in 0..dim {
                let a = self.data[i * dim + k];
                if a == ZERO {
                    continue;
                }
                for j in 0..dim {
                    data[i * dim + j] += a * rhs.data[k * dim + j];
                }
            }
        }
        Unitary {
            num_qubits: self.num_qubits,
            dim,
            data,
        }
    }

    /// Conjugate transpose.
    pub fn dagger(&self) -> Unitary {
        let dim = self.dim;
        let mut data = vec![ZERO; dim * dim];
        for i in 0..dim {
            for j in 0..dim {
                data[j * dim + i] = self.data[i * dim + j].conj();
            }
        }
        Unitary {
            num_qubits: self.num_qubits,
            dim,
            data,
        }
    }

    /// Whether `self = e^{iα} · other` for some α, within `tol`.
    pub fn equiv_up_to_global_phase(&self, other: &Unitary, tol: f64) -> bool {
        if self.dim != other.dim {
            return false;
        }
        let Some((k, _)) = other
            .data
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm().total_cmp(&b.norm()))
        else {
            return true;
        };
        if other.data[k].norm() < tol {
            return self.data.iter().all(|z| z.norm() < tol);
        }
        let phase = self.data[k] / other.data[k];
        if (phase.norm() - 1.0).abs() > tol {
            return false;
        }
        self.data
            .iter()
            .zip(&other.data)
            .all(|(a, b)| (a - phase * b).norm() < tol)
    }

    /// Place a gate acting on `operands` into an `n`-qubit identity.
    fn embed(&self, operands: &[QubitId], n: u32) -> Unitary {
        let k = operands.len() as u32;
        let dim = 1_usize << n;
        let mask: usize = operands.iter().map(|q| 1_usize << (n - 1 - q.0)).sum();
        let local = |index: usize| {
            operands
                .iter()
                .enumerate()
                .filter(|(_, q)| bit(index, q.0, n))
                .map(|(i, _)| 1_usize << (k - 1 - i as u32))
                .sum::<usize>()
        };
        let mut data = vec![ZERO; dim * dim];
        for row in 0..dim {
            for col in 0..dim {
                if row & !mask == col & !mask {
                    data[row * dim + col] = self.get(local(row), local(col));
                }
            }
        }
        Unitary {
            num_qubits: n,
            dim,
            data,
        }
    }
}

fn bit(index: usize, qubit: u32, n: u32) -> bool {
    index >> (n - 1 - qubit) & 1 == 1
}

fn cis(theta: f64) -> Complex64 {
    Complex64::from_polar(1.0, theta)
}

fn real(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

fn u3(theta: f64, phi: f64, lambda: f64) -> [[Complex64; 2]; 2] {
    let (s, c) = (theta / 2.0).sin_cos();
    [
        [real(c), -cis(lambda) * s],
        [cis(phi) * s, cis(phi + lambda) * c],
    ]
}

fn rx(theta: f64) -> [[Complex64; 2]; 2] {
    let (s, c) = (theta / 2.0).sin_cos();
    [[real(c), -I * s], [-I * s, real(c)]]
}

fn ry(theta: f64) -> [[Complex64; 2]; 2] {
    let (s, c) = (theta / 2.0).sin_cos();
    [[real(c), real(-s)], [real(s), real(c)]]
}

fn diag(a: Complex64, b: Complex64) -> [[Complex64; 2]; 2] {
    [[a, ZERO], [ZERO, b]]
}

fn single_matrix(opcode: Opcode, params: &[f64]) -> Option<[[Complex64; 2]; 2]> {
    let theta = params.first().copied().unwrap_or_default();
    let h = real(FRAC_1_SQRT_2);
    Some(match opcode {
        Opcode::X | Opcode::Cx => [[ZERO, ONE], [ONE, ZERO]],
        Opcode::Y | Opcode::Cy => [[ZERO, -I], [I, ZERO]],
        Opcode::Z | Opcode::Cz => diag(ONE, -ONE),
        Opcode::H | Opcode::Ch => [[h, h], [h, -h]],
        Opcode::S => diag(ONE, I),
        Opcode::Sdg => diag(ONE, -I),
        Opcode::T => diag(ONE, cis(FRAC_PI_4)),
        Opcode::Tdg => diag(ONE, cis(-FRAC_PI_4)),
        Opcode::Rx | Opcode::Crx => rx(theta),
        Opcode::Ry | Opcode::Cry => ry(theta),
        Opcode::Rz | Opcode::Crz => diag(cis(-theta / 2.0), cis(theta / 2.0)),
        Opcode::P | Opcode::Phase | Opcode::Cp | Opcode::CPhase => diag(ONE, cis(theta)),
        Opcode::U2 => match params {
            [phi, lambda] => u3(FRAC_PI_2, *phi, *lambda),
            _ => return None,
        },
        Opcode::U3 => match params {
            [theta, phi, lambda] => u3(*theta, *phi, *lambda),
            _ => return None,
        },
        Opcode::Cu => match params {
            [theta, phi, lambda, gamma] => {
                let m = u3(*theta, *phi, *lambda);
                let g = cis(*gamma);
                [[g * m[0][0], g * m[0][1]], [g * m[1][0], g * m[1][1]]]
            }
            _ => return None,
        },
        _ => return None,
    })
}

fn controlled(u: [[Complex64; 2]; 2]) -> Unitary {
    Unitary::from_rows(
        2,
        [
            [ONE, ZERO, ZERO, ZERO],
            [ZERO, ONE, ZERO, ZERO],
            [ZERO, ZERO, u[0][0], u[0][1]],
            [ZERO, ZERO, u[1][0], u[1][1]],
        ],
    )
}

/// Local matrix of a unitary instruction together with its operand order.
///
/// `None` for non-unitary instructions. `nop` is the empty identity.
pub fn instruction_unitary(inst: &Instruction) -> Option<(Vec<QubitId>, Unitary)> {
    let s = real(FRAC_1_SQRT_2);
    let is = I * FRAC_1_SQRT_2;
    match inst.opcode {
        Opcode::Measure | Opcode::Reset | Opcode::SatSpect => None,
        Opcode::Nop => Some((Vec::new(), Unitary::identity(0))),
        Opcode::Swap => Some((
            inst.operands(),
            Unitary::from_rows(
                2,
                [
                    [ONE, ZERO, ZERO, ZERO],
                    [ZERO, ZERO, ONE, ZERO],
                    [ZERO, ONE, ZERO, ZERO],
                    [ZERO, ZERO, ZERO, ONE],
                ],
            ),
        )),
        Opcode::SqiSwap => Some((
            inst.operands(),
            Unitary::from_rows(
                2,
                [
                    [ONE, ZERO, ZERO, ZERO],
                    [ZERO, s, is, ZERO],
                    [ZERO, is, s, ZERO],
                    [ZERO, ZERO, ZERO, ONE],
                ],
            ),
        )),
        op if op.is_two_qubit() => {
            let u = single_matrix(op, &inst.params)?;
            Some((inst.operands(), controlled(u)))
        }
        op => {
            let u = single_matrix(op, &inst.params)?;
            let q = *inst.targets.first()?;
            Some((vec![q], Unitary::from_rows(1, u)))
        }
    }
}

/// Unitary of the whole circuit, `None` if it contains a non-unitary
/// instruction.
pub fn circuit_unitary(circuit: &Circuit) -> Option<Unitary> {
    instructions_unitary(circuit.instructions(), circuit.num_qubits())
}

/// Unitary of an instruction sequence over `num_qubits` qubits.
pub fn instructions_unitary(instructions: &[Instruction], num_qubits: u32) -> Option<Unitary> {
    let mut acc = Unitary::identity(num_qubits);
    for inst in instructions {
        let (operands, local) = instruction_unitary(inst)?;
        if operands.is_empty() {
            continue;
        }
        if operands.iter().any(|q| q.0 >= num_qubits) {
            return None;
        }
        acc = local.embed(&operands, num_qubits).mul(&acc);
    }
    Some(acc)
}
