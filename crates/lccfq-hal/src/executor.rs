//! The execution boundary.
//!
//! Compilation ends at `transpiled`; an [`Executor`] takes it from there.
//! Executors own their failure modes: whatever error type they return is
//! handed back to the caller without being wrapped in a compiler error.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use lccfq_ir::Circuit;

use crate::error::{HalError, HalResult};

/// Count recorded for every outcome when nothing was executed.
pub const SENTINEL_COUNT: i64 = -1;

/// Widest classical register the sentinel result enumerates.
pub const MAX_SENTINEL_CLBITS: u32 = 20;

/// Measurement outcomes of one execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Occurrences per bitstring, clbit 0 leftmost.
    pub counts: BTreeMap<String, i64>,
    /// Shots requested.
    pub shots: u32,
}

impl ExecutionResult {
    /// A result from explicit counts.
    pub fn new(counts: BTreeMap<String, i64>, shots: u32) -> Self {
        Self { counts, shots }
    }

    /// Every bitstring of width `num_clbits` mapped to [`SENTINEL_COUNT`].
    pub fn sentinel(num_clbits: u32, shots: u32) -> HalResult<Self> {
        if num_clbits > MAX_SENTINEL_CLBITS {
            return Err(HalError::TooManyClbits {
                num_clbits,
                max: MAX_SENTINEL_CLBITS,
            });
        }
        let width = num_clbits as usize;
        let counts = (0..1_u64 << num_clbits)
            .map(|i| {
                let key = if width == 0 {
                    String::new()
                } else {
                    format!("{i:0width$b}")
                };
                (key, SENTINEL_COUNT)
            })
            .collect();
        Ok(Self { counts, shots })
    }

    /// Whether this is a sentinel rather than measured data.
    pub fn is_sentinel(&self) -> bool {
        self.counts.values().all(|&c| c == SENTINEL_COUNT)
    }

    /// Total observed shots, ignoring sentinel entries.
    pub fn total(&self) -> i64 {
        self.counts.values().filter(|&&c| c > 0).sum()
    }

    /// Observed frequency of `bitstring`, if anything was measured.
    pub fn probability(&self, bitstring: &str) -> Option<f64> {
        let total = self.total();
        if total <= 0 {
            return None;
        }
        let count = self.counts.get(bitstring).copied().unwrap_or(0).max(0);
        #[allow(clippy::cast_precision_loss)]
        Some(count as f64 / total as f64)
    }
}

/// Something that runs transpiled circuits.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Failure type, passed through to callers untouched.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Executor name for logs.
    fn name(&self) -> &str;

    /// Run `circuit` for `shots` repetitions.
    async fn execute(&self, circuit: &Circuit, shots: u32) -> Result<ExecutionResult, Self::Error>;
}

/// An executor that runs nothing and returns the sentinel result.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunExecutor;

#[async_trait]
impl Executor for DryRunExecutor {
    type Error = HalError;

    fn name(&self) -> &str {
        "dryrun"
    }

    async fn execute(&self, circuit: &Circuit, shots: u32) -> Result<ExecutionResult, Self::Error> {
        ExecutionResult::sentinel(circuit.num_clbits(), shots)
    }
}
