//! External interface options (§6 "External Interfaces").

use crate::features::pipelining::ports::Rewriter;

/// Which part of the rewritten loop an emitted op belongs to, passed to
/// `annotate_fn` so callers can e.g. attach provenance metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Prologue,
    Kernel,
    Epilogue,
}

/// Caller-supplied collaborators and knobs for `pipeline_loop`.
pub struct PipeliningOptions<'a, R: Rewriter> {
    /// Returns the `(op, stage)` assignment for the loop's body ops. An
    /// empty result means "decline to pipeline this loop".
    pub get_schedule: Box<dyn Fn(&R, &R::Op) -> Vec<(R::Op, usize)> + 'a>,

    /// When `true`, emit a peeled prologue and epilogue (§4.2, §4.5).
    /// When `false`, the kernel itself predicates its trailing iterations
    /// (§4.4 "trailing-tail mode") and `predicate_fn` is required.
    pub peel_epilogue: bool,

    /// Wraps a cloned kernel op so it only executes under `predicate`.
    /// Returning `None` is a hard failure (§7 "predication refusal").
    /// Required when `peel_epilogue` is `false`.
    pub predicate_fn: Option<Box<dyn FnMut(&mut R, R::Op, R::Value) -> Option<R::Op> + 'a>>,

    /// Called after every clone emitted by any phase; purely observational.
    pub annotate_fn: Option<Box<dyn FnMut(&mut R, R::Op, Part, usize) + 'a>>,
}

impl<'a, R: Rewriter> PipeliningOptions<'a, R> {
    pub fn new(get_schedule: impl Fn(&R, &R::Op) -> Vec<(R::Op, usize)> + 'a) -> Self {
        Self {
            get_schedule: Box::new(get_schedule),
            peel_epilogue: false,
            predicate_fn: None,
            annotate_fn: None,
        }
    }

    pub fn with_peel_epilogue(mut self, peel: bool) -> Self {
        self.peel_epilogue = peel;
        self
    }

    pub fn with_predicate_fn(
        mut self,
        f: impl FnMut(&mut R, R::Op, R::Value) -> Option<R::Op> + 'a,
    ) -> Self {
        self.predicate_fn = Some(Box::new(f));
        self
    }

    pub fn with_annotate_fn(mut self, f: impl FnMut(&mut R, R::Op, Part, usize) + 'a) -> Self {
        self.annotate_fn = Some(Box::new(f));
        self
    }
}
