//! Pattern-driver integration (§6 "Pattern-driver integration").
//!
//! Wraps [`crate::features::pipelining::application::pipeline_loop`] behind
//! a generic rewrite-pattern abstraction so a surrounding pattern-rewrite
//! driver can register it alongside its other patterns, without this crate
//! depending on that driver's concrete type.

use crate::errors::PipelineOutcome;
use crate::features::pipelining::application::pipeline_loop;
use crate::features::pipelining::domain::PipeliningOptions;
use crate::features::pipelining::ports::Rewriter;

/// Minimal rewrite-pattern abstraction: "given a rewriter and a candidate
/// op, either rewrite it and report success, or decline."
pub trait RewritePattern<R: Rewriter> {
    fn try_apply(&mut self, rewriter: &mut R, op: &R::Op) -> bool;
}

/// Abstract collaborator a surrounding driver implements to collect
/// patterns; this crate only needs to be able to push one into it.
pub trait PatternSet<R: Rewriter> {
    fn add(&mut self, pattern: Box<dyn RewritePattern<R>>);
}

/// Adapts [`pipeline_loop`] to [`RewritePattern`].
pub struct PipeliningPattern<'a, R: Rewriter> {
    options: PipeliningOptions<'a, R>,
}

impl<'a, R: Rewriter> PipeliningPattern<'a, R> {
    pub fn new(options: PipeliningOptions<'a, R>) -> Self {
        Self { options }
    }
}

impl<'a, R: Rewriter> RewritePattern<R> for PipeliningPattern<'a, R> {
    fn try_apply(&mut self, rewriter: &mut R, op: &R::Op) -> bool {
        matches!(
            pipeline_loop(rewriter, op.clone(), &mut self.options),
            PipelineOutcome::Pipelined(_)
        )
    }
}

/// Registers a [`PipeliningPattern`] with an abstract pattern set, mirroring
/// how a surrounding driver would add it to its own pattern registry.
pub fn add_pipelining_pattern<R, P>(patterns: &mut P, options: PipeliningOptions<'static, R>)
where
    R: Rewriter + 'static,
    P: PatternSet<R>,
{
    patterns.add(Box::new(PipeliningPattern::new(options)));
}
