//! The pipeline driver: runs stage transitions up to a requested stage.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use lccfq_ir::{Circuit, CircuitBuilder};

use crate::error::{CompileError, CompileResult};
use crate::mapping::Mapping;
use crate::native::{ArchitectureRegistry, NativeGateSet};
use crate::pass::Pass;
use crate::passes::{Decomposer, IdentityPlacement, Mapper, PlacementPolicy, Router, Transpiler};
use crate::property::PropertySet;
use crate::topology::Topology;

/// Compilation stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// As authored, structurally validated.
    #[serde(alias = "parsed", alias = "dryrun")]
    Raw,
    /// Initial placement chosen.
    Mapped,
    /// Exchanges inserted; instructions bound to physical qubits.
    #[serde(alias = "swaps")]
    Swapped,
    /// Composite gates expanded.
    Expanded,
    /// Only native opcodes remain.
    Transpiled,
    /// Handed to an executor.
    Executed,
}

impl Stage {
    /// All stages, in order.
    pub const ALL: [Stage; 6] = [
        Stage::Raw,
        Stage::Mapped,
        Stage::Swapped,
        Stage::Expanded,
        Stage::Transpiled,
        Stage::Executed,
    ];

    /// Lower-case stage name.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Raw => "raw",
            Stage::Mapped => "mapped",
            Stage::Swapped => "swapped",
            Stage::Expanded => "expanded",
            Stage::Transpiled => "transpiled",
            Stage::Executed => "executed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" | "parsed" | "dryrun" => Ok(Stage::Raw),
            "mapped" => Ok(Stage::Mapped),
            "swapped" | "swaps" => Ok(Stage::Swapped),
            "expanded" => Ok(Stage::Expanded),
            "transpiled" => Ok(Stage::Transpiled),
            "executed" => Ok(Stage::Executed),
            _ => Err(CompileError::UnknownStage(s.to_string())),
        }
    }
}

/// The artifact of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledProgram {
    /// Circuit produced by the last stage that ran.
    pub circuit: Circuit,
    /// Stage reached.
    pub stage: Stage,
    /// Placement chosen by the mapper. `None` at `raw`.
    pub initial_mapping: Option<Mapping>,
    /// Placement after routing. `None` at `raw`.
    pub final_mapping: Option<Mapping>,
    /// Exchanges inserted by the router.
    pub swaps_inserted: usize,
}

/// Runs the mapping, routing, expansion and transpilation passes.
///
/// A pipeline is immutable and can be shared between threads; each
/// [`run`](Self::run) owns its own mapping.
pub struct Pipeline {
    topology: Arc<Topology>,
    target: Arc<dyn NativeGateSet>,
    passes: Vec<Box<dyn Pass>>,
}

impl Pipeline {
    /// Start configuring a pipeline.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Device topology.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Target gate set.
    pub fn target(&self) -> &dyn NativeGateSet {
        self.target.as_ref()
    }

    /// Pass names in execution order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Compile `circuit` up to and including `until`.
    ///
    /// The circuit is validated first (`raw`); passes whose stage lies
    /// beyond `until` are never invoked. `executed` runs every pass and
    /// reports `transpiled`, since execution happens outside the compiler.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn run(&self, circuit: &Circuit, until: Stage) -> CompileResult<CompiledProgram> {
        info!(
            "Compiling {} instructions over {} qubits up to stage '{}' for target '{}'",
            circuit.len(),
            circuit.num_qubits(),
            until,
            self.target.name()
        );

        circuit.validate()?;

        let mut properties = PropertySet::new().with_topology(self.topology.clone());
        let mut current = circuit.clone();
        let mut reached = Stage::Raw;

        for pass in &self.passes {
            if pass.stage() > until {
                debug!("Stopping before pass: {}", pass.name());
                break;
            }
            debug!("Running pass: {}", pass.name());
            current = pass.run(&current, &mut properties)?;
            reached = pass.stage();
            debug!("Pass {} completed, instructions: {}", pass.name(), current.len());
        }

        info!(
            "Compilation reached stage '{}' with {} instructions ({} swaps)",
            reached,
            current.len(),
            properties.swaps_inserted
        );

        Ok(CompiledProgram {
            circuit: current,
            stage: reached,
            initial_mapping: properties.initial_mapping,
            final_mapping: properties.mapping,
            swaps_inserted: properties.swaps_inserted,
        })
    }

    /// Build a circuit inside `body`, then compile it up to `until`.
    ///
    /// The builder is finalized on every exit path. If `body` succeeds every
    /// appended instruction reaches the pipeline once, in append order. If
    /// it fails, the pending instructions are discarded, nothing is compiled
    /// and the body's error is returned as is.
    pub fn compile_scoped<F, E>(
        &self,
        name: &str,
        num_qubits: u32,
        num_clbits: u32,
        until: Stage,
        body: F,
    ) -> Result<CompiledProgram, E>
    where
        F: FnOnce(&mut CircuitBuilder) -> Result<(), E>,
        E: From<CompileError>,
    {
        let mut builder = CircuitBuilder::new(name, num_qubits, num_clbits);
        match body(&mut builder) {
            Ok(()) => {
                let circuit = builder.build();
                self.run(&circuit, until).map_err(E::from)
            }
            Err(err) => {
                let dropped = builder.discard();
                debug!("Circuit scope '{}' failed, discarded {} instructions", name, dropped);
                Err(err)
            }
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("topology", &self.topology)
            .field("target", &self.target.name())
            .field("passes", &self.pass_names())
            .finish()
    }
}

/// Builder for [`Pipeline`].
pub struct PipelineBuilder {
    topology: Option<Arc<Topology>>,
    architecture: String,
    target: Option<Arc<dyn NativeGateSet>>,
    registry: Option<Arc<ArchitectureRegistry>>,
    placement: Box<dyn PlacementPolicy>,
    decomposer: Decomposer,
}

impl PipelineBuilder {
    /// Defaults: `pfaff_v1` target, identity placement, built-in rules.
    pub fn new() -> Self {
        Self {
            topology: None,
            architecture: "pfaff_v1".to_string(),
            target: None,
            registry: None,
            placement: Box::new(IdentityPlacement),
            decomposer: Decomposer::new(),
        }
    }

    /// Device topology (required).
    #[must_use]
    pub fn topology(mut self, topology: impl Into<Arc<Topology>>) -> Self {
        self.topology = Some(topology.into());
        self
    }

    /// Architecture name, resolved through the registry on `build`.
    #[must_use]
    pub fn architecture(mut self, name: impl Into<String>) -> Self {
        self.architecture = name.into();
        self
    }

    /// Use this gate set instead of a registry lookup.
    #[must_use]
    pub fn target(mut self, target: Arc<dyn NativeGateSet>) -> Self {
        self.target = Some(target);
        self
    }

    /// Registry used to resolve the architecture name.
    #[must_use]
    pub fn registry(mut self, registry: Arc<ArchitectureRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Placement policy for the mapper.
    #[must_use]
    pub fn placement(mut self, policy: Box<dyn PlacementPolicy>) -> Self {
        self.placement = policy;
        self
    }

    /// Decomposition rules.
    #[must_use]
    pub fn decomposer(mut self, decomposer: Decomposer) -> Self {
        self.decomposer = decomposer;
        self
    }

    /// Resolve the target and assemble the passes.
    ///
    /// Fails with `UnknownArchitecture` before anything is compiled.
    pub fn build(self) -> CompileResult<Pipeline> {
        let topology = self
            .topology
            .ok_or(CompileError::MissingProperty("topology"))?;
        let target = match self.target {
            Some(target) => target,
            None => match &self.registry {
                Some(registry) => registry.create(&self.architecture)?,
                None => ArchitectureRegistry::with_builtins().create(&self.architecture)?,
            },
        };
        debug!(
            "Pipeline for '{}' on {} qubits with {} placement",
            target.name(),
            topology.num_qubits(),
            self.placement.name()
        );

        let passes: Vec<Box<dyn Pass>> = vec![
            Box::new(Mapper::with_policy(self.placement)),
            Box::new(Router),
            Box::new(self.decomposer),
            Box::new(Transpiler::new(target.clone())),
        ];

        Ok(Pipeline {
            topology,
            target,
            passes,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
