//! Capability trait the transformation is written against.

mod rewriter;

pub use rewriter::{LoopStructure, Rewriter};
