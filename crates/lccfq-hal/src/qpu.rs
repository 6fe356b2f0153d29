//! A configured device: pipeline plus execution policy.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument};

use lccfq_compile::{
    ArchitectureRegistry, CompileError, CompiledProgram, Pipeline, Stage, placement_by_name,
};
use lccfq_ir::{Circuit, CircuitBuilder};

use crate::config::QpuConfig;
use crate::error::{HalError, HalResult};
use crate::executor::{ExecutionResult, Executor};

/// Why [`Qpu::run`] failed.
#[derive(Debug, Error)]
pub enum RunError<E: std::error::Error + 'static> {
    /// The circuit could not be compiled for the device.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The executor reported a failure.
    #[error("Execution failed: {0}")]
    Execute(#[source] E),

    /// Producing the result failed.
    #[error(transparent)]
    Hal(#[from] HalError),
}

/// A quantum processing unit described by a [`QpuConfig`].
#[derive(Debug)]
pub struct Qpu {
    config: QpuConfig,
    pipeline: Pipeline,
}

impl Qpu {
    /// Build the device with the built-in architectures.
    pub fn new(config: QpuConfig) -> HalResult<Self> {
        Self::with_registry(config, Arc::new(ArchitectureRegistry::with_builtins()))
    }

    /// Build the device, resolving its gate set through `registry`.
    pub fn with_registry(config: QpuConfig, registry: Arc<ArchitectureRegistry>) -> HalResult<Self> {
        config.validate()?;
        let pipeline = Pipeline::builder()
            .topology(config.topology()?)
            .architecture(config.native_gateset.clone())
            .registry(registry)
            .placement(placement_by_name(&config.placement)?)
            .build()?;
        info!(
            "QPU '{}' ready: {} qubits, {} native gates, stage {}",
            config.name, config.qubit_count, config.native_gateset, config.stage
        );
        Ok(Self { config, pipeline })
    }

    /// The validated configuration.
    pub fn config(&self) -> &QpuConfig {
        &self.config
    }

    /// The compilation pipeline built for this device.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// The configured last stage.
    pub fn stage(&self) -> Stage {
        self.config.stage
    }

    /// Compile up to the configured stage.
    pub fn compile(&self, circuit: &Circuit) -> Result<CompiledProgram, CompileError> {
        self.pipeline.run(circuit, self.config.stage)
    }

    /// Build a circuit in a scope and compile it to the configured stage.
    ///
    /// The builder starts with the device's default shot count. If `body`
    /// fails, the partial circuit is discarded and the error returned as is.
    pub fn circuit<F, E>(
        &self,
        name: &str,
        num_qubits: u32,
        num_clbits: u32,
        body: F,
    ) -> Result<CompiledProgram, E>
    where
        F: FnOnce(&mut CircuitBuilder) -> Result<(), E>,
        E: From<CompileError>,
    {
        let shots = self.config.shots;
        self.pipeline
            .compile_scoped(name, num_qubits, num_clbits, self.config.stage, |b| {
                b.shots(shots);
                body(b)
            })
    }

    /// Build a circuit in a scope, then [`run`](Self::run) it.
    ///
    /// A failing `body` leaves nothing for the executor: the partial
    /// circuit is discarded and the body's error returned as is.
    pub async fn run_scoped<X, F, E>(
        &self,
        name: &str,
        num_qubits: u32,
        num_clbits: u32,
        executor: &X,
        body: F,
    ) -> Result<ExecutionResult, E>
    where
        X: Executor,
        F: FnOnce(&mut CircuitBuilder) -> Result<(), E>,
        E: From<RunError<X::Error>>,
    {
        let mut builder = CircuitBuilder::new(name, num_qubits, num_clbits);
        builder.shots(self.config.shots);
        if let Err(err) = body(&mut builder) {
            let dropped = builder.discard();
            debug!("Circuit scope '{}' failed, discarded {} instructions", name, dropped);
            return Err(err);
        }
        let circuit = builder.build();
        self.run(&circuit, executor).await.map_err(E::from)
    }

    /// Compile `circuit` and, when the device is configured to execute,
    /// hand it to `executor`.
    ///
    /// Below the `executed` stage nothing runs and the sentinel result is
    /// returned.
    #[instrument(skip(self, circuit, executor), fields(circuit = %circuit.name(), executor = executor.name()))]
    pub async fn run<X: Executor>(
        &self,
        circuit: &Circuit,
        executor: &X,
    ) -> Result<ExecutionResult, RunError<X::Error>> {
        let program = self.compile(circuit)?;
        if self.config.stage != Stage::Executed {
            info!("Stopped at stage {}, nothing executed", program.stage);
            return Ok(ExecutionResult::sentinel(circuit.num_clbits(), circuit.shots())?);
        }

        info!(
            "Executing {} instructions for {} shots",
            program.circuit.len(),
            circuit.shots()
        );
        executor
            .execute(&program.circuit, circuit.shots())
            .await
            .map_err(RunError::Execute)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use lccfq_ir::{IrError, Opcode, QubitId};

    use super::*;
    use crate::executor::DryRunExecutor;

    fn config(stage: &str) -> QpuConfig {
        QpuConfig::from_yaml_str(&format!(
            "name: test\nqubit_count: 3\nstage: {stage}\nshots: 250\ntopology:\n  shape: linear\n"
        ))
        .unwrap()
    }

    /// Reports every shot as the all-zero outcome.
    #[derive(Default)]
    struct ZeroExecutor {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Executor for ZeroExecutor {
        type Error = std::io::Error;

        fn name(&self) -> &str {
            "zero"
        }

        async fn execute(&self, circuit: &Circuit, shots: u32) -> Result<ExecutionResult, Self::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let zeros = "0".repeat(circuit.num_clbits() as usize);
            Ok(ExecutionResult::new(BTreeMap::from([(zeros, i64::from(shots))]), shots))
        }
    }

    struct Offline;

    #[async_trait]
    impl Executor for Offline {
        type Error = std::io::Error;

        fn name(&self) -> &str {
            "offline"
        }

        async fn execute(&self, _: &Circuit, _: u32) -> Result<ExecutionResult, Self::Error> {
            Err(std::io::Error::new(std::io::ErrorKind::NotConnected, "control system offline"))
        }
    }

    #[derive(Debug)]
    enum ScopeError {
        Ir(IrError),
        Compile(CompileError),
        Run(RunError<std::io::Error>),
    }

    impl From<IrError> for ScopeError {
        fn from(e: IrError) -> Self {
            Self::Ir(e)
        }
    }

    impl From<CompileError> for ScopeError {
        fn from(e: CompileError) -> Self {
            Self::Compile(e)
        }
    }

    impl From<RunError<std::io::Error>> for ScopeError {
        fn from(e: RunError<std::io::Error>) -> Self {
            Self::Run(e)
        }
    }

    #[tokio::test]
    async fn test_below_executed_returns_sentinel() {
        let qpu = Qpu::new(config("transpiled")).unwrap();
        let executor = ZeroExecutor::default();
        let result = qpu.run(&Circuit::bell().unwrap(), &executor).await.unwrap();
        assert!(result.is_sentinel());
        assert_eq!(result.counts.len(), 4);
        assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_executed_stage_calls_executor() {
        let qpu = Qpu::new(config("executed")).unwrap();
        let executor = ZeroExecutor::default();
        let circuit = Circuit::bell().unwrap().with_shots(64);
        let result = qpu.run(&circuit, &executor).await.unwrap();
        assert_eq!(result.counts.get("00"), Some(&64));
        assert_eq!(executor.calls.load(Ordering::SeqCst), 1);

        let dry = qpu.run(&circuit, &DryRunExecutor).await.unwrap();
        assert!(dry.is_sentinel());
    }

    #[tokio::test]
    async fn test_executor_error_passes_through() {
        let qpu = Qpu::new(config("executed")).unwrap();
        let err = qpu.run(&Circuit::bell().unwrap(), &Offline).await.unwrap_err();
        match err {
            RunError::Execute(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotConnected),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_compile_error_before_execution() {
        let qpu = Qpu::new(config("executed")).unwrap();
        let executor = ZeroExecutor::default();
        let err = qpu
            .run(&Circuit::ghz(5).unwrap(), &executor)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RunError::Compile(CompileError::InsufficientQubits { .. })
        ));
        assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_scoped_circuit_uses_device_defaults() {
        let qpu = Qpu::new(config("transpiled")).unwrap();
        let program = qpu
            .circuit("scoped", 2, 2, |b| -> Result<(), ScopeError> {
                b.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?.measure_all()?;
                Ok(())
            })
            .unwrap();
        assert_eq!(program.stage, Stage::Transpiled);
        assert_eq!(program.circuit.shots(), 250);
        assert!(
            program
                .circuit
                .instructions()
                .iter()
                .all(|i| qpu.pipeline().target().supports(i.opcode) || i.opcode == Opcode::Measure)
        );

        let err = qpu
            .circuit("broken", 1, 0, |b| -> Result<(), ScopeError> {
                b.h(QubitId(0))?.x(QubitId(3))?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, ScopeError::Ir(_)));
    }

    #[tokio::test]
    async fn test_run_scoped() {
        let qpu = Qpu::new(config("executed")).unwrap();
        let executor = ZeroExecutor::default();
        let result = qpu
            .run_scoped("ghz", 3, 3, &executor, |b| -> Result<(), ScopeError> {
                b.h(QubitId(0))?
                    .cx(QubitId(0), QubitId(1))?
                    .cx(QubitId(1), QubitId(2))?
                    .measure_all()?;
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(result.counts.get("000"), Some(&250));

        let err = qpu
            .run_scoped("broken", 2, 0, &executor, |b| -> Result<(), ScopeError> {
                b.cx(QubitId(0), QubitId(0))?;
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ScopeError::Ir(_)));
        assert_eq!(executor.calls.load(Ordering::SeqCst), 1);

        let err = qpu
            .run_scoped("offline", 1, 1, &Offline, |b| -> Result<(), ScopeError> {
                b.x(QubitId(0))?.measure_all()?;
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ScopeError::Run(RunError::Execute(_))));
    }

    #[test]
    fn test_unknown_gateset_rejected() {
        let mut cfg = config("raw");
        cfg.native_gateset = "trapped_ion".into();
        assert!(matches!(
            Qpu::new(cfg),
            Err(HalError::Pipeline(CompileError::UnknownArchitecture(_)))
        ));
    }
}
