//! QPU configuration documents.
//!
//! A QPU is described by a YAML document:
//!
//! ```yaml
//! name: pfaff-lab-qpu
//! location: Urbana, IL
//! qubit_count: 5
//! native_gateset: pfaff_v1
//! placement: interaction
//! stage: transpiled
//! shots: 2000
//! exclusions: [4]
//! topology:
//!   name: line5
//!   connections: [[0, 1], [1, 2], [2, 3], [3, 4]]
//! network:
//!   host: 10.0.0.12
//!   port: 5555
//! ```
//!
//! Instead of explicit `connections`, the topology may name a `shape`
//! (`linear`, `ring`, `star`, `full`) over `qubit_count` qubits.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use lccfq_compile::{Stage, Topology, placement_by_name};

use crate::error::{HalError, HalResult};

/// Environment variable overriding the configured stage.
pub const STAGE_ENV: &str = "LCCFQ_STAGE";

/// Environment variable overriding the configured shot count.
pub const SHOTS_ENV: &str = "LCCFQ_SHOTS";

/// Configuration of one QPU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QpuConfig {
    /// Device name.
    pub name: String,

    /// Where the device lives.
    #[serde(default)]
    pub location: String,

    /// Number of physical qubits.
    pub qubit_count: u32,

    /// Architecture name resolved through the registry.
    #[serde(default = "default_gateset")]
    pub native_gateset: String,

    /// Placement policy name.
    #[serde(default = "default_placement")]
    pub placement: String,

    /// Last stage to run.
    #[serde(default = "default_stage")]
    pub stage: Stage,

    /// Default shots for circuits built through the device.
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Physical qubits taken out of service.
    #[serde(default)]
    pub exclusions: Vec<u32>,

    /// Coupling graph.
    #[serde(default)]
    pub topology: TopologyConfig,

    /// Control system endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkConfig>,
}

/// Coupling graph section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Label for logs.
    #[serde(default)]
    pub name: String,

    /// A named shape over `qubit_count` qubits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<TopologyShape>,

    /// Explicit coupled pairs.
    #[serde(default)]
    pub connections: Vec<(u32, u32)>,
}

/// Built-in topology shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopologyShape {
    /// A chain `0 - 1 - ... - n-1`.
    Linear,
    /// A chain closed into a cycle.
    Ring,
    /// Qubit 0 coupled to every other qubit.
    Star,
    /// Every pair coupled.
    Full,
}

/// Control system endpoint. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Host name or address.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

fn default_gateset() -> String {
    "pfaff_v1".to_string()
}

fn default_placement() -> String {
    "identity".to_string()
}

fn default_stage() -> Stage {
    Stage::Transpiled
}

fn default_shots() -> u32 {
    lccfq_ir::DEFAULT_SHOTS
}

impl QpuConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> HalResult<Self> {
        let config: QpuConfig = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> HalResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| HalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded QPU configuration from {}", path.display());
        Self::from_yaml_str(&contents)
    }

    /// Load a file, then apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> HalResult<Self> {
        Self::from_file(path)?.merge_env(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup`, then validate again.
    ///
    /// Only variables that are set override the loaded values.
    pub fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> HalResult<Self> {
        if let Some(stage) = lookup(STAGE_ENV) {
            self.stage = stage
                .parse()
                .map_err(|_| HalError::InvalidConfig(format!("{STAGE_ENV}: unknown stage '{stage}'")))?;
        }
        if let Some(shots) = lookup(SHOTS_ENV) {
            self.shots = shots
                .parse()
                .map_err(|_| HalError::InvalidConfig(format!("{SHOTS_ENV}: not a count '{shots}'")))?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check the document describes a usable device.
    pub fn validate(&self) -> HalResult<()> {
        if self.qubit_count == 0 {
            return Err(HalError::InvalidConfig("qubit_count must be positive".into()));
        }
        if self.shots == 0 {
            return Err(HalError::InvalidConfig("shots must be positive".into()));
        }
        if let Some(&q) = self.exclusions.iter().find(|&&q| q >= self.qubit_count) {
            return Err(HalError::InvalidConfig(format!(
                "excluded qubit {q} is outside 0..{}",
                self.qubit_count
            )));
        }
        if self.topology.shape.is_some() && !self.topology.connections.is_empty() {
            return Err(HalError::InvalidConfig(
                "topology has both a shape and explicit connections".into(),
            ));
        }
        placement_by_name(&self.placement)
            .map_err(|e| HalError::InvalidConfig(e.to_string()))?;
        self.topology()?;
        Ok(())
    }

    /// The coupling graph with excluded qubits disconnected.
    pub fn topology(&self) -> HalResult<Topology> {
        let n = self.qubit_count;
        let base = match self.topology.shape {
            Some(TopologyShape::Linear) => Topology::linear(n),
            Some(TopologyShape::Ring) => Topology::ring(n),
            Some(TopologyShape::Star) => Topology::star(n),
            Some(TopologyShape::Full) => Topology::full(n),
            None => Topology::new(n, self.topology.connections.iter().copied())
                .map_err(|e| HalError::InvalidConfig(e.to_string()))?,
        };
        Ok(if self.exclusions.is_empty() {
            base
        } else {
            base.without_qubits(&self.exclusions)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LINE5: &str = r"
name: pfaff-lab
location: Urbana, IL
qubit_count: 5
native_gateset: pfaff_v1
exclusions: [4]
topology:
  name: line5
  connections: [[0, 1], [1, 2], [2, 3], [3, 4]]
network:
  host: 10.0.0.12
  port: 5555
";

    #[test]
    fn test_parse_with_defaults() {
        let config = QpuConfig::from_yaml_str(LINE5).unwrap();
        assert_eq!(config.qubit_count, 5);
        assert_eq!(config.placement, "identity");
        assert_eq!(config.stage, Stage::Transpiled);
        assert_eq!(config.shots, 1000);
        assert_eq!(config.network.as_ref().map(|n| n.port), Some(5555));

        let topology = config.topology().unwrap();
        assert!(topology.is_adjacent(2, 3));
        assert!(!topology.is_adjacent(3, 4));
        assert_eq!(topology.degree(4), 0);
    }

    #[test]
    fn test_named_shape_and_stage_alias() {
        let config = QpuConfig::from_yaml_str(
            "name: ring\nqubit_count: 4\nstage: swaps\ntopology:\n  shape: ring\n",
        )
        .unwrap();
        assert_eq!(config.stage, Stage::Swapped);
        assert!(config.topology().unwrap().is_adjacent(3, 0));
    }

    #[test]
    fn test_invalid_documents() {
        let cases = [
            "name: x\nqubit_count: 0\n",
            "name: x\nqubit_count: 2\nexclusions: [2]\n",
            "name: x\nqubit_count: 2\ntopology:\n  connections: [[0, 5]]\n",
            "name: x\nqubit_count: 2\nplacement: sabre\n",
            "name: x\nqubit_count: 2\ntopology:\n  shape: full\n  connections: [[0, 1]]\n",
        ];
        for yaml in cases {
            assert!(
                matches!(QpuConfig::from_yaml_str(yaml), Err(HalError::InvalidConfig(_))),
                "accepted: {yaml}"
            );
        }
        assert!(matches!(
            QpuConfig::from_yaml_str("name: x\nqubit_count: [1]\n"),
            Err(HalError::Parse(_))
        ));
        assert!(matches!(
            QpuConfig::from_yaml_str("name: x\nqubit_count: 2\nstage: optimized\n"),
            Err(HalError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let config = QpuConfig::from_yaml_str(LINE5).unwrap();
        let merged = config
            .clone()
            .merge_env(|key| match key {
                STAGE_ENV => Some("dryrun".into()),
                SHOTS_ENV => Some("42".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(merged.stage, Stage::Raw);
        assert_eq!(merged.shots, 42);

        let untouched = config.clone().merge_env(|_| None).unwrap();
        assert_eq!(untouched, config);

        assert!(matches!(
            config.merge_env(|key| (key == STAGE_ENV).then(|| "nowhere".into())),
            Err(HalError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LINE5.as_bytes()).unwrap();
        let config = QpuConfig::from_file(file.path()).unwrap();
        assert_eq!(config.name, "pfaff-lab");

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            QpuConfig::from_file(&missing),
            Err(HalError::Io { .. })
        ));
    }
}
