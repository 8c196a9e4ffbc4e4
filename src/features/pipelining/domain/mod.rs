//! Pure data: the loop descriptor and the four core tables (V, X, L, plus the
//! schedule) the transformation threads through its phases.

mod cross_stage;
mod loop_arg_map;
mod loop_view;
mod options;
mod schedule;
#[cfg(test)]
mod testutil;
mod version_map;

pub use cross_stage::{CrossStageEntry, CrossStageTable};
pub use loop_arg_map::LoopArgMap;
pub use loop_view::LoopView;
pub use options::{Part, PipeliningOptions};
pub use schedule::Schedule;
pub use version_map::VersionMap;
