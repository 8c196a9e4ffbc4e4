/*
 * swpipeline - software pipelining transformation for counted loops
 *
 * Feature-First Hexagonal Architecture:
 * - features/pipelining/domain/         : value-version map, cross-stage table, schedule, loop view
 * - features/pipelining/ports/          : the Rewriter capability trait (IR abstraction)
 * - features/pipelining/application/    : pipeline_loop driver (use-case layer)
 * - features/pipelining/infrastructure/ : the five transformation phases + pattern-driver adapter
 *
 * Given a structured counted loop with a per-op pipeline stage assignment, rewrites it
 * into a prologue / steady-state kernel / epilogue (or a predicated trailing-tail kernel)
 * so that stage k of iteration i-k overlaps stage 0 of iteration i.
 */

#![allow(clippy::too_many_arguments)] // phase functions carry a lot of transformation state
#![allow(clippy::type_complexity)] // AHashMap<(Value, usize), usize> etc. are inherent to the model

/// Error types and transformation outcome.
pub mod errors;

/// Feature modules.
pub mod features;

pub use errors::{NotApplicableReason, PipelineError, PipelineOutcome};
pub use features::pipelining::application::pipeline_loop;
pub use features::pipelining::domain::{
    CrossStageEntry, CrossStageTable, LoopArgMap, LoopView, Part, PipeliningOptions, Schedule,
    VersionMap,
};
pub use features::pipelining::ports::{LoopStructure, Rewriter};
