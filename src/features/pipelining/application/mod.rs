//! The `pipeline_loop` use-case: wires the five phases together.

mod pipeline_loop;

pub use pipeline_loop::pipeline_loop;
