//! LCCFQ command-line interface.
//!
//! ```text
//! lccfq compile bell.json --config qpu.yaml --stage swapped --format qasm
//! lccfq run bell.json --config qpu.yaml
//! lccfq targets
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{compile, run, targets};

/// LCCFQ - compile quantum circuits for a configured QPU
#[derive(Parser)]
#[command(name = "lccfq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Output format of `compile`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// OpenQASM 3 source
    Qasm,
    /// The compiled program with its mappings, as JSON
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a JSON circuit for a QPU
    Compile {
        /// Circuit file (JSON)
        input: String,

        /// QPU configuration (YAML)
        #[arg(short, long, env = "LCCFQ_CONFIG")]
        config: String,

        /// Last stage to run (raw, mapped, swapped, expanded, transpiled, executed)
        #[arg(short, long)]
        stage: Option<String>,

        /// Override the configured native gate set
        #[arg(short, long)]
        arch: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "qasm")]
        format: OutputFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Compile and execute a circuit, printing measurement counts
    Run {
        /// Circuit file (JSON)
        input: String,

        /// QPU configuration (YAML)
        #[arg(short, long, env = "LCCFQ_CONFIG")]
        config: String,

        /// Override the circuit's shot count
        #[arg(long)]
        shots: Option<u32>,
    },

    /// List registered architectures and their native gates
    Targets,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Compile {
            input,
            config,
            stage,
            arch,
            format,
            output,
        } => compile::execute(
            &input,
            &config,
            stage.as_deref(),
            arch.as_deref(),
            format,
            output.as_deref(),
        ),

        Commands::Run {
            input,
            config,
            shots,
        } => run::execute(&input, &config, shots).await,

        Commands::Targets => {
            targets::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
