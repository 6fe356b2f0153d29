//! `PropertySet`: state shared between the passes of one compilation.
//!
//! A fresh property set is created for every pipeline run, so each
//! compilation owns its own [`Mapping`] while the [`Topology`] is shared
//! read-only between runs.

use std::sync::Arc;

use crate::mapping::Mapping;
use crate::topology::Topology;

/// Properties written and read by compilation passes.
#[derive(Debug, Clone, Default)]
pub struct PropertySet {
    /// Device connectivity.
    pub topology: Option<Arc<Topology>>,
    /// Placement chosen by the mapper, before any exchange.
    pub initial_mapping: Option<Mapping>,
    /// Current placement; the router updates it as it inserts exchanges.
    pub mapping: Option<Mapping>,
    /// Number of exchange instructions the router inserted.
    pub swaps_inserted: usize,
}

impl PropertySet {
    /// An empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the device topology.
    #[must_use]
    pub fn with_topology(mut self, topology: Arc<Topology>) -> Self {
        self.topology = Some(topology);
        self
    }

    /// Set an initial placement directly, bypassing the mapper.
    #[must_use]
    pub fn with_mapping(mut self, mapping: Mapping) -> Self {
        self.initial_mapping = Some(mapping.clone());
        self.mapping = Some(mapping);
        self
    }
}
