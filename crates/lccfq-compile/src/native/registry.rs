//! Architecture registry: name → native gate set factory.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use super::{Ideal, NativeGateSet, NeutralAtom, XyiSwap};
use crate::error::{CompileError, CompileResult};

type Factory = Box<dyn Fn() -> Arc<dyn NativeGateSet> + Send + Sync>;

/// Central lookup of native gate sets by architecture name.
pub struct ArchitectureRegistry {
    factories: FxHashMap<String, Factory>,
}

impl ArchitectureRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    /// A registry holding every built-in architecture.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("pfaff_v1", || Arc::new(XyiSwap));
        registry.register("xyisw", || Arc::new(XyiSwap));
        registry.register("neutral_atom", || Arc::new(NeutralAtom));
        registry.register("ideal", || Arc::new(Ideal));
        registry
    }

    /// Register a factory. A later registration under the same name wins.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> Arc<dyn NativeGateSet> + Send + Sync + 'static,
    ) {
        let name = name.into();
        debug!("Registering architecture: {}", name);
        self.factories.insert(name, Box::new(factory));
    }

    /// Obtain the native gate set registered under `name`.
    pub fn create(&self, name: &str) -> CompileResult<Arc<dyn NativeGateSet>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| CompileError::UnknownArchitecture(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn available_architectures(&self) -> Vec<String> {
        let mut names: Vec<_> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether `name` is registered.
    pub fn has_architecture(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl Default for ArchitectureRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for ArchitectureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchitectureRegistry")
            .field("architectures", &self.available_architectures())
            .finish()
    }
}
