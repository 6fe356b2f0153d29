//! Compile command implementation.

use std::fs;

use anyhow::{Context, Result};
use console::style;

use crate::OutputFormat;

use super::common::{load_circuit, load_qpu};

/// Execute the compile command.
///
/// Progress goes to stderr so that stdout carries only the program.
pub fn execute(
    input: &str,
    config: &str,
    stage: Option<&str>,
    arch: Option<&str>,
    format: OutputFormat,
    output: Option<&str>,
) -> Result<()> {
    let qpu = load_qpu(config, stage, arch)?;
    eprintln!(
        "{} Compiling {} for {} ({}) up to {}",
        style("→").cyan().bold(),
        style(input).green(),
        style(&qpu.config().name).yellow(),
        qpu.pipeline().target().name(),
        style(qpu.stage()).yellow()
    );

    let circuit = load_circuit(input)?;
    eprintln!(
        "  Loaded: {} qubits, {} clbits, {} instructions",
        circuit.num_qubits(),
        circuit.num_clbits(),
        circuit.len()
    );

    let program = qpu
        .compile(&circuit)
        .with_context(|| format!("Failed to compile {input}"))?;

    eprintln!(
        "{} Reached {}: {} instructions, {} swaps inserted",
        style("✓").green().bold(),
        program.stage,
        program.circuit.len(),
        program.swaps_inserted
    );

    let content = match format {
        OutputFormat::Qasm => lccfq_qasm::emit(&program.circuit).context("Failed to emit QASM")?,
        OutputFormat::Json => {
            serde_json::to_string_pretty(&program).context("Failed to serialize program")?
        }
    };

    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write file: {path}"))?;
            eprintln!("  Output: {}", style(path).green());
        }
        None => println!("{content}"),
    }

    Ok(())
}
