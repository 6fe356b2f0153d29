//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use lccfq_compile::Stage;
use lccfq_hal::{ExecutionResult, Qpu, QpuConfig};
use lccfq_ir::Circuit;

/// Outcomes shown before the table is truncated.
const MAX_ROWS: usize = 16;

/// Load and validate a circuit from a JSON file.
pub fn load_circuit(path: &str) -> Result<Circuit> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    let circuit: Circuit = serde_json::from_str(&source)
        .with_context(|| format!("Failed to parse circuit JSON: {path}"))?;
    circuit
        .validate()
        .with_context(|| format!("Invalid circuit in {path}"))?;
    Ok(circuit)
}

/// Load a QPU configuration and apply command-line overrides.
pub fn load_qpu(config: &str, stage: Option<&str>, arch: Option<&str>) -> Result<Qpu> {
    let mut config = QpuConfig::load(config)
        .with_context(|| format!("Failed to load QPU configuration: {config}"))?;
    if let Some(stage) = stage {
        config.stage = stage
            .parse::<Stage>()
            .with_context(|| format!("Bad --stage '{stage}'"))?;
    }
    if let Some(arch) = arch {
        config.native_gateset = arch.to_string();
    }
    Qpu::new(config).context("Failed to set up QPU")
}

/// Print measurement counts as a table.
pub fn print_results(result: &ExecutionResult) {
    if result.is_sentinel() {
        println!(
            "\n{} Not executed ({} outcomes, all {}):",
            style("○").yellow().bold(),
            result.counts.len(),
            lccfq_hal::SENTINEL_COUNT
        );
        for bitstring in result.counts.keys().take(MAX_ROWS) {
            println!("  {}: {:>6}", style(bitstring).cyan(), lccfq_hal::SENTINEL_COUNT);
        }
    } else {
        println!(
            "\n{} Results ({} shots):",
            style("✓").green().bold(),
            result.shots
        );
        let mut sorted: Vec<_> = result.counts.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (bitstring, count) in sorted.iter().take(MAX_ROWS) {
            let prob = result.probability(bitstring).unwrap_or(0.0) * 100.0;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let bar = "█".repeat((prob / 2.0).round() as usize);
            println!(
                "  {}: {:>6} ({:>5.2}%) {}",
                style(bitstring).cyan(),
                count,
                prob,
                style(bar).green()
            );
        }
    }

    if result.counts.len() > MAX_ROWS {
        println!("  ... and {} more outcomes", result.counts.len() - MAX_ROWS);
    }
}
