//! The five transformation phases (§4) plus the pattern-driver adapter.

mod cross_stage_analysis;
mod epilogue;
mod kernel;
mod pattern;
mod prologue;
mod support;
mod validation;

pub use cross_stage_analysis::analyze_cross_stage;
pub use epilogue::emit_epilogue;
pub use kernel::{build_kernel, KernelResult};
pub use pattern::{add_pipelining_pattern, PatternSet, PipeliningPattern, RewritePattern};
pub use prologue::emit_prologue;
pub use validation::validate;
