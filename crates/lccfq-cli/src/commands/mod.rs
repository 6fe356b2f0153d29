//! CLI command implementations.

pub mod common;
pub mod compile;
pub mod run;
pub mod targets;
