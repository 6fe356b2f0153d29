//! Built-in pipeline passes, one per stage transition.
//!
//! - [`Mapper`]: `raw` → `mapped`, chooses the initial placement
//! - [`Router`]: `mapped` → `swapped`, inserts exchanges
//! - [`Decomposer`]: `swapped` → `expanded`, expands composite gates
//! - [`Transpiler`]: `expanded` → `transpiled`, rewrites into native gates

mod decompose;
mod mapper;
mod router;
mod transpile;

pub use decompose::{Decomposer, DecompositionRule};
pub use mapper::{
    IdentityPlacement, InteractionPlacement, Mapper, PlacementPolicy, placement_by_name,
};
pub use router::Router;
pub use transpile::{MAX_REWRITE_DEPTH, Transpiler};
