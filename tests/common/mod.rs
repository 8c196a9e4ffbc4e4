//! Shared test fixtures: a toy arithmetic-loop IR implementing
//! `swpipeline::Rewriter`, plus loop builders for the transformation's core
//! end-to-end scenarios.

pub mod fixtures;

pub use fixtures::*;
pub use toy_ir::*;
