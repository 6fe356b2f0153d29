//! Device layer for LCCFQ.
//!
//! A [`Qpu`] is built from a YAML [`QpuConfig`]: the configuration names
//! the coupling graph, the native gate set and the last compilation stage
//! to run. Circuits are compiled through the device's pipeline and, when
//! the configured stage is `executed`, handed to an [`Executor`].
//!
//! ```no_run
//! use lccfq_hal::{DryRunExecutor, Qpu, QpuConfig};
//! use lccfq_ir::Circuit;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let qpu = Qpu::new(QpuConfig::load("qpu.yaml")?)?;
//! let result = qpu.run(&Circuit::bell()?, &DryRunExecutor).await?;
//! for (bits, count) in &result.counts {
//!     println!("{bits}: {count}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod qpu;

pub use config::{NetworkConfig, QpuConfig, SHOTS_ENV, STAGE_ENV, TopologyConfig, TopologyShape};
pub use error::{HalError, HalResult};
pub use executor::{
    DryRunExecutor, ExecutionResult, Executor, MAX_SENTINEL_CLBITS, SENTINEL_COUNT,
};
pub use qpu::{Qpu, RunError};
