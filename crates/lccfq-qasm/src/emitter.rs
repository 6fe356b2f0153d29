//! QASM3 emitter for compiled circuits.

use std::f64::consts::PI;
use std::fmt::Write;

use lccfq_ir::{Circuit, Instruction, Opcode, OpcodeShape, QubitId};

use crate::error::QasmResult;

/// Significant digits kept for numeric parameters.
pub const PARAM_DIGITS: usize = 10;

/// `sqiswap` is not in `stdgates.inc`; it is emitted as
/// `rxx(-pi/4) · ryy(-pi/4)` over standard gates.
const SQISWAP_DEFINITION: &str = "gate sqiswap a, b { \
    h a; h b; cx a, b; rz(-pi/4) b; cx a, b; h a; h b; \
    rx(pi/2) a; rx(pi/2) b; cx a, b; rz(-pi/4) b; cx a, b; rx(-pi/2) a; rx(-pi/2) b; }";

/// Emit a circuit as QASM3 source code.
///
/// The circuit is validated first; qubit indices are emitted as they are,
/// so a circuit past the routing stage addresses physical qubits.
pub fn emit(circuit: &Circuit) -> QasmResult<String> {
    circuit.validate()?;
    let mut emitter = Emitter::default();
    emitter.emit_circuit(circuit)?;
    Ok(emitter.output)
}

#[derive(Default)]
struct Emitter {
    output: String,
}

impl Emitter {
    fn emit_circuit(&mut self, circuit: &Circuit) -> QasmResult<()> {
        writeln!(self.output, "OPENQASM 3.0;")?;
        writeln!(self.output, "include \"stdgates.inc\";")?;

        if circuit
            .instructions()
            .iter()
            .any(|i| i.opcode == Opcode::SqiSwap)
        {
            writeln!(self.output, "{SQISWAP_DEFINITION}")?;
        }
        writeln!(self.output)?;

        writeln!(self.output, "qubit[{}] q;", circuit.num_qubits())?;
        if circuit.num_clbits() > 0 {
            writeln!(self.output, "bit[{}] c;", circuit.num_clbits())?;
        }
        writeln!(self.output)?;

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction)?;
        }
        Ok(())
    }

    fn emit_instruction(&mut self, inst: &Instruction) -> QasmResult<()> {
        match inst.opcode {
            Opcode::Measure => {
                for (q, c) in inst.targets.iter().zip(&inst.clbits) {
                    writeln!(self.output, "c[{}] = measure q[{}];", c.0, q.0)?;
                }
            }
            Opcode::Reset => {
                for q in &inst.targets {
                    writeln!(self.output, "reset q[{}];", q.0)?;
                }
            }
            Opcode::Nop => writeln!(self.output, "// nop")?,
            Opcode::SatSpect => {
                let shots = inst.shots.unwrap_or_default();
                let qubits = inst
                    .targets
                    .iter()
                    .map(|q| format!("q[{}]", q.0))
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(self.output, "#pragma lccfq satspect shots={shots} {qubits}")?;
            }
            op => {
                let operands = match op.shape() {
                    OpcodeShape::SingleQubit => inst.targets.clone(),
                    _ => inst.operands(),
                };
                let qubits = emit_qubits(&operands);
                if inst.params.is_empty() {
                    writeln!(self.output, "{} {qubits};", op.name())?;
                } else {
                    let params = inst
                        .params
                        .iter()
                        .map(|p| format_param(*p))
                        .collect::<Vec<_>>()
                        .join(", ");
                    writeln!(self.output, "{}({params}) {qubits};", op.name())?;
                }
            }
        }
        Ok(())
    }
}

fn emit_qubits(qubits: &[QubitId]) -> String {
    qubits
        .iter()
        .map(|q| format!("q[{}]", q.0))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render an angle: common multiples of pi symbolically, everything else
/// with [`PARAM_DIGITS`] significant digits.
pub fn format_param(v: f64) -> String {
    const NAMED: [(f64, &str); 7] = [
        (PI, "pi"),
        (-PI, "-pi"),
        (PI / 2.0, "pi/2"),
        (-PI / 2.0, "-pi/2"),
        (PI / 4.0, "pi/4"),
        (-PI / 4.0, "-pi/4"),
        (2.0 * PI, "2*pi"),
    ];
    if let Some((_, name)) = NAMED.iter().find(|(x, _)| (v - x).abs() < 1e-12) {
        return (*name).to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let decimals = {
        let magnitude = v.abs().log10().floor() as i32;
        (PARAM_DIGITS as i32 - 1 - magnitude).clamp(0, 17) as usize
    };
    let fixed = format!("{v:.decimals$}");
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lccfq_ir::{CircuitBuilder, ClbitId};

    #[test]
    fn test_emit_bell_state() {
        let qasm = emit(&Circuit::bell().unwrap()).unwrap();
        assert!(qasm.starts_with("OPENQASM 3.0;\ninclude \"stdgates.inc\";\n"));
        assert!(qasm.contains("qubit[2] q;"));
        assert!(qasm.contains("bit[2] c;"));
        assert!(qasm.contains("h q[0];"));
        assert!(qasm.contains("cx q[0], q[1];"));
        assert!(qasm.contains("c[0] = measure q[0];"));
        assert!(qasm.contains("c[1] = measure q[1];"));
        assert!(!qasm.contains("gate sqiswap"));
    }

    #[test]
    fn test_emit_parameterized() {
        let mut b = CircuitBuilder::new("params", 2, 0);
        b.rx(PI / 2.0, QubitId(0))
            .unwrap()
            .crz(0.123_456_789_012_3, QubitId(1), QubitId(0))
            .unwrap()
            .u3(1.0, -PI, 2.5e-7, QubitId(1))
            .unwrap();
        let qasm = emit(&b.build()).unwrap();
        assert!(qasm.contains("rx(pi/2) q[0];"));
        assert!(qasm.contains("crz(0.123456789) q[1], q[0];"));
        assert!(qasm.contains("u3(1, -pi, 0.00000025) q[1];"));
        assert!(qasm.lines().any(|l| l == "qubit[2] q;"));
        assert!(!qasm.lines().any(|l| l.starts_with("bit[")));
    }

    #[test]
    fn test_sqiswap_gets_definition() {
        let mut b = CircuitBuilder::new("native", 2, 0);
        b.sqiswap(QubitId(0), QubitId(1)).unwrap();
        let qasm = emit(&b.build()).unwrap();
        assert!(qasm.contains("gate sqiswap a, b {"));
        assert!(qasm.contains("sqiswap q[0], q[1];"));
    }

    #[test]
    fn test_non_unitary_statements() {
        let mut b = CircuitBuilder::new("misc", 3, 1);
        b.reset([QubitId(0), QubitId(2)])
            .unwrap()
            .nop()
            .unwrap()
            .satspect([QubitId(1), QubitId(2)], 500)
            .unwrap()
            .append(Instruction::measure_into([QubitId(2)], [ClbitId(0)]))
            .unwrap();
        let qasm = emit(&b.build()).unwrap();
        assert!(qasm.contains("reset q[0];\nreset q[2];"));
        assert!(qasm.contains("// nop"));
        assert!(qasm.contains("#pragma lccfq satspect shots=500 q[1] q[2]"));
        assert!(qasm.contains("c[0] = measure q[2];"));
    }

    #[test]
    fn test_format_param() {
        assert_eq!(format_param(0.0), "0");
        assert_eq!(format_param(-PI / 4.0), "-pi/4");
        assert_eq!(format_param(1.5), "1.5");
        assert_eq!(format_param(123_456.789_012_34), "123456.789");
        assert_eq!(format_param(-0.000_012_345_678_901_2), "-0.0000123456789");
        assert_eq!(format_param(3.0e12), "3000000000000");
    }
}
