//! Run command implementation.

use anyhow::{Context, Result};
use console::style;

use lccfq_hal::DryRunExecutor;

use super::common::{load_circuit, load_qpu, print_results};

/// Execute the run command with the dry-run executor.
pub async fn execute(input: &str, config: &str, shots: Option<u32>) -> Result<()> {
    let qpu = load_qpu(config, None, None)?;

    let mut circuit = load_circuit(input)?;
    if let Some(shots) = shots {
        circuit = circuit.with_shots(shots);
    }

    println!(
        "{} Running {} on {} ({} shots, stage {})",
        style("→").cyan().bold(),
        style(input).green(),
        style(&qpu.config().name).yellow(),
        circuit.shots(),
        qpu.stage()
    );

    let result = qpu
        .run(&circuit, &DryRunExecutor)
        .await
        .with_context(|| format!("Failed to run {input}"))?;

    print_results(&result);
    Ok(())
}
