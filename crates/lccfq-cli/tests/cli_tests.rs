//! CLI argument parsing and command-path tests.
//!
//! The CLI is a binary crate, so parsing is checked against a mirror of the
//! clap structs and the command bodies are replayed through the library
//! crates they call.

// ============================================================================
// Clap argument parsing
// ============================================================================

mod clap_parsing {
    use clap::{Parser, Subcommand, ValueEnum};

    #[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
    enum TestFormat {
        Qasm,
        Json,
    }

    #[derive(Parser)]
    #[command(name = "lccfq")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Compile {
            input: String,
            #[arg(short, long)]
            config: String,
            #[arg(short, long)]
            stage: Option<String>,
            #[arg(short, long)]
            arch: Option<String>,
            #[arg(short, long, value_enum, default_value = "qasm")]
            format: TestFormat,
            #[arg(short, long)]
            output: Option<String>,
        },
        Run {
            input: String,
            #[arg(short, long)]
            config: String,
            #[arg(long)]
            shots: Option<u32>,
        },
        Targets,
    }

    #[test]
    fn test_parse_compile_minimal() {
        let cli = TestCli::try_parse_from(["lccfq", "compile", "bell.json", "-c", "qpu.yaml"])
            .unwrap();
        match cli.command {
            TestCommands::Compile {
                input,
                config,
                stage,
                arch,
                format,
                output,
            } => {
                assert_eq!(input, "bell.json");
                assert_eq!(config, "qpu.yaml");
                assert!(stage.is_none());
                assert!(arch.is_none());
                assert_eq!(format, TestFormat::Qasm);
                assert!(output.is_none());
            }
            _ => panic!("Expected Compile command"),
        }
    }

    #[test]
    fn test_parse_compile_with_all_args() {
        let cli = TestCli::try_parse_from([
            "lccfq",
            "-vv",
            "compile",
            "ghz.json",
            "--config",
            "qpu.yaml",
            "--stage",
            "swapped",
            "--arch",
            "neutral_atom",
            "--format",
            "json",
            "-o",
            "out.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            TestCommands::Compile {
                stage,
                arch,
                format,
                output,
                ..
            } => {
                assert_eq!(stage.as_deref(), Some("swapped"));
                assert_eq!(arch.as_deref(), Some("neutral_atom"));
                assert_eq!(format, TestFormat::Json);
                assert_eq!(output.as_deref(), Some("out.json"));
            }
            _ => panic!("Expected Compile command"),
        }
    }

    #[test]
    fn test_parse_compile_rejects_unknown_format() {
        let result = TestCli::try_parse_from([
            "lccfq", "compile", "a.json", "-c", "q.yaml", "--format", "quil",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_compile_missing_config() {
        assert!(TestCli::try_parse_from(["lccfq", "compile", "a.json"]).is_err());
    }

    #[test]
    fn test_parse_run() {
        let cli =
            TestCli::try_parse_from(["lccfq", "run", "bell.json", "-c", "q.yaml", "--shots", "64"])
                .unwrap();
        match cli.command {
            TestCommands::Run { input, shots, .. } => {
                assert_eq!(input, "bell.json");
                assert_eq!(shots, Some(64));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_targets_and_global_verbose() {
        let cli = TestCli::try_parse_from(["lccfq", "targets", "-vvv"]).unwrap();
        assert_eq!(cli.verbose, 3);
        assert!(matches!(cli.command, TestCommands::Targets));
    }

    #[test]
    fn test_unknown_subcommand() {
        assert!(TestCli::try_parse_from(["lccfq", "submit"]).is_err());
    }
}

// ============================================================================
// Command paths
// ============================================================================

mod command_paths {
    use std::fs;

    use lccfq_compile::{ArchitectureRegistry, CompiledProgram, Stage};
    use lccfq_hal::{DryRunExecutor, Qpu, QpuConfig};
    use lccfq_ir::{Circuit, CircuitBuilder, QubitId};

    const QPU: &str = "name: line3\nqubit_count: 3\nstage: transpiled\ntopology:\n  shape: linear\n";

    fn far_cx() -> Circuit {
        let mut b = CircuitBuilder::new("far", 3, 3);
        b.h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(2))
            .unwrap()
            .measure_all()
            .unwrap();
        b.build()
    }

    /// Mirrors `commands::common::load_circuit` + `load_qpu`.
    fn load(dir: &std::path::Path, stage: Option<&str>) -> anyhow::Result<(Circuit, Qpu)> {
        let circuit_path = dir.join("far.json");
        let config_path = dir.join("qpu.yaml");
        fs::write(&circuit_path, serde_json::to_string(&far_cx())?)?;
        fs::write(&config_path, QPU)?;

        let circuit: Circuit = serde_json::from_str(&fs::read_to_string(&circuit_path)?)?;
        circuit.validate()?;
        let mut config = QpuConfig::from_file(&config_path)?;
        if let Some(stage) = stage {
            config.stage = stage.parse::<Stage>()?;
        }
        Ok((circuit, Qpu::new(config)?))
    }

    #[test]
    fn test_compile_to_qasm_file() {
        let dir = tempfile::tempdir().unwrap();
        let (circuit, qpu) = load(dir.path(), Some("swapped")).unwrap();
        let program = qpu.compile(&circuit).unwrap();
        assert_eq!(program.stage, Stage::Swapped);
        assert_eq!(program.swaps_inserted, 1);

        let qasm = lccfq_qasm::emit(&program.circuit).unwrap();
        let out = dir.path().join("far.qasm");
        fs::write(&out, &qasm).unwrap();
        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains("swap q[0], q[1];"));
        assert!(written.contains("cx q[1], q[2];"));
    }

    #[test]
    fn test_compile_to_json_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let (circuit, qpu) = load(dir.path(), None).unwrap();
        let first: CompiledProgram = qpu.compile(&circuit).unwrap();
        let second = qpu.compile(&circuit).unwrap();
        assert_eq!(
            serde_json::to_string_pretty(&first).unwrap(),
            serde_json::to_string_pretty(&second).unwrap()
        );
        let value: serde_json::Value = serde_json::to_value(&first).unwrap();
        assert_eq!(value["stage"], "transpiled");
        assert_eq!(value["swaps_inserted"], 1);
    }

    #[test]
    fn test_bad_stage_override() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path(), Some("optimized")).unwrap_err();
        assert!(err.to_string().contains("optimized"));
    }

    #[test]
    fn test_invalid_circuit_json() {
        let json = r#"{"name":"bad","num_qubits":1,"num_clbits":0,"shots":1000,
            "instructions":[{"opcode":"x","targets":[3]}]}"#;
        let circuit: Circuit = serde_json::from_str(json).unwrap();
        assert!(circuit.validate().is_err());
    }

    #[test]
    fn test_hand_written_measure_compiles() {
        let json = r#"{"name":"bell","num_qubits":2,"num_clbits":2,
            "instructions":[{"opcode":"h","targets":[0]},
                            {"opcode":"cx","control":0,"targets":[1]},
                            {"opcode":"measure","targets":[0,1]}]}"#;
        let circuit: Circuit = serde_json::from_str(json).unwrap();
        circuit.validate().unwrap();

        let config = QpuConfig::from_yaml_str(QPU).unwrap();
        let program = Qpu::new(config).unwrap().compile(&circuit).unwrap();
        let qasm = lccfq_qasm::emit(&program.circuit).unwrap();
        assert!(qasm.contains("c[0] = measure q[0];"));
        assert!(qasm.contains("c[1] = measure q[1];"));
    }

    #[tokio::test]
    async fn test_run_prints_sentinel_below_executed() {
        let dir = tempfile::tempdir().unwrap();
        let (circuit, qpu) = load(dir.path(), None).unwrap();
        let result = qpu.run(&circuit, &DryRunExecutor).await.unwrap();
        assert!(result.is_sentinel());
        assert_eq!(result.counts.len(), 8);
    }

    #[test]
    fn test_targets_listing() {
        let registry = ArchitectureRegistry::with_builtins();
        let names = registry.available_architectures();
        for name in ["ideal", "neutral_atom", "pfaff_v1"] {
            assert!(names.iter().any(|n| n == name), "missing {name}");
        }
        let pfaff = registry.create("pfaff_v1").unwrap();
        let gates: Vec<&str> = pfaff.native_opcodes().iter().map(|op| op.name()).collect();
        assert_eq!(gates, vec!["rx", "ry", "sqiswap"]);
    }
}
