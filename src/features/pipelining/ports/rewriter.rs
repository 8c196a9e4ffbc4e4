/*
 * Rewriter capability trait
 *
 * Plays the same role for this crate that `CFGProvider` plays for Braun's SSA
 * builder: the algorithm never touches a concrete dialect, only this trait.
 * A real caller implements it once for its own IR; the test suite implements
 * it once for a toy arithmetic loop IR.
 */

use std::fmt::Debug;
use std::hash::Hash;

/// The structural shape of a counted loop, as read off the IR by
/// [`Rewriter::loop_structure`]. `lb`/`ub`/`step` are `None` when the
/// corresponding bound is not a compile-time constant - validation turns
/// that into a soft "not applicable" outcome rather than an error.
pub struct LoopStructure<V, B, O> {
    pub body_block: B,
    pub iv: V,
    /// Region arguments after `iv` (`a1 .. ak`).
    pub iter_args: Vec<V>,
    /// Operands of the body's `yield`, one per iter-arg.
    pub yield_operands: Vec<V>,
    /// Initial operand fed to the loop for each iter-arg.
    pub init_operands: Vec<V>,
    /// The loop's own result values, as seen by users outside the loop.
    pub results: Vec<V>,
    /// Non-terminator ops in the body, in their original textual order.
    pub body_ops: Vec<O>,
    pub lb: Option<i64>,
    pub ub: Option<i64>,
    pub step: Option<i64>,
}

/// Everything the pipelining transformation needs from the surrounding IR.
///
/// `Value`, `Op` and `Block` are opaque handles: cheap to clone, comparable,
/// hashable. They carry no data of their own — all data lives behind the
/// `Rewriter` methods.
pub trait Rewriter {
    type Value: Clone + Eq + Hash + Debug;
    type Op: Clone + Eq + Hash + Debug;
    type Block: Clone + Eq + Hash + Debug;

    // ---- introspection -----------------------------------------------

    /// Reads `loop_op`'s structure: induction variable, iter-args, body ops,
    /// bounds. Bounds that are not compile-time constants come back `None`.
    fn loop_structure(&self, loop_op: &Self::Op) -> LoopStructure<Self::Value, Self::Block, Self::Op>;

    /// Operands of `op` itself (not walking into nested regions).
    fn op_operands(&self, op: &Self::Op) -> Vec<Self::Value>;

    /// Results produced by `op`.
    fn op_results(&self, op: &Self::Op) -> Vec<Self::Value>;

    /// The block that lexically contains `op`.
    fn op_parent_block(&self, op: &Self::Op) -> Self::Block;

    /// Every operand reference reachable from `op`, including operands of
    /// ops nested in `op`'s regions, that refers to a value *not* defined
    /// by `op` or one of its own nested ops (i.e. an "escaping" use). Each
    /// entry is `(owner, operand_index, current_value)` so the caller can
    /// later call [`Rewriter::set_operand`] to replace it.
    fn escaping_operands(&self, op: &Self::Op) -> Vec<(Self::Op, usize, Self::Value)>;

    // ---- construction --------------------------------------------------

    /// Clone `op` (and any nested regions) into a new op at the current
    /// insertion point. Every operand present in `operand_map` is replaced
    /// by its mapped value; operands absent from the map are left as-is
    /// (loop-invariant values, constants defined outside the loop, ...).
    fn clone_op(&mut self, op: &Self::Op, operand_map: &ahash::AHashMap<Self::Value, Self::Value>) -> Self::Op;

    /// Overwrite operand `index` of `op` (used for the override rules in
    /// kernel construction: IV shifting, same-stage/forward carry, cross-
    /// stage `L` lookups).
    fn set_operand(&mut self, op: &Self::Op, index: usize, value: Self::Value);

    /// Materialize an index-typed constant at the current insertion point.
    fn materialize_index_const(&mut self, value: i64) -> Self::Value;

    /// Materialize `lhs + rhs` at the current insertion point.
    fn materialize_index_add(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;

    /// Materialize `lhs < rhs` (the predicate comparison) at the current
    /// insertion point.
    fn materialize_compare_lt(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;

    /// Materialize `if cond then if_true else if_false` at the current
    /// insertion point (used to preserve escaping values predicated off in
    /// trailing-tail mode).
    fn materialize_select(
        &mut self,
        cond: Self::Value,
        if_true: Self::Value,
        if_false: Self::Value,
    ) -> Self::Value;

    // ---- loop construction ---------------------------------------------

    /// Build a new counted loop `for iv in lb..ub step step iter_args(init_args)`
    /// at the current insertion point. Returns `(loop_op, body_block, iv_arg,
    /// iter_arg_block_args)`; the caller fills in the body and terminates it
    /// with [`Rewriter::set_yield`].
    fn build_counted_loop(
        &mut self,
        lb: i64,
        ub: i64,
        step: i64,
        init_args: Vec<Self::Value>,
    ) -> (Self::Op, Self::Block, Self::Value, Vec<Self::Value>);

    /// Terminate `block` with a yield of `operands`.
    fn set_yield(&mut self, block: &Self::Block, operands: Vec<Self::Value>);

    /// Results produced by a (counted) loop op, in iter-arg order.
    fn loop_results(&self, loop_op: &Self::Op) -> Vec<Self::Value>;

    // ---- diagnostics & cleanup ------------------------------------------

    /// Emit a diagnostic attached to `op` (used for the "invalid input"
    /// error kind; does not by itself abort the transformation).
    fn emit_diagnostic(&mut self, op: &Self::Op, message: &str);

    /// Replace every use of `old` in the surrounding module with `new`.
    fn replace_all_uses(&mut self, old: Self::Value, new: Self::Value);

    /// Erase `op` (and, transitively, ops it alone kept alive — left to the
    /// implementation). Called once, on the original loop, at the very end
    /// of a successful transformation.
    fn erase_op(&mut self, op: &Self::Op);
}
