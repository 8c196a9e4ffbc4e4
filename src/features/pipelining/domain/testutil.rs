//! Minimal `Rewriter` impl used only to instantiate the generic domain types
//! in unit tests below. Mirrors the `MockCFG` pattern the SSA builder uses
//! for the same purpose.

#![cfg(test)]

use crate::features::pipelining::ports::{LoopStructure, Rewriter};

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) struct OpId(pub u32);
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) struct BlockId(pub u32);
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) struct ValueId(pub u32);

pub(crate) struct NullRewriter;

impl Rewriter for NullRewriter {
    type Value = ValueId;
    type Op = OpId;
    type Block = BlockId;

    fn loop_structure(&self, _loop_op: &Self::Op) -> LoopStructure<Self::Value, Self::Block, Self::Op> {
        LoopStructure {
            body_block: BlockId(0),
            iv: ValueId(0),
            iter_args: vec![],
            yield_operands: vec![],
            init_operands: vec![],
            results: vec![],
            body_ops: vec![],
            lb: Some(0),
            ub: Some(0),
            step: Some(1),
        }
    }

    fn op_operands(&self, _op: &Self::Op) -> Vec<Self::Value> {
        vec![]
    }
    fn op_results(&self, _op: &Self::Op) -> Vec<Self::Value> {
        vec![]
    }
    fn op_parent_block(&self, _op: &Self::Op) -> Self::Block {
        BlockId(0)
    }
    fn escaping_operands(&self, _op: &Self::Op) -> Vec<(Self::Op, usize, Self::Value)> {
        vec![]
    }
    fn clone_op(
        &mut self,
        op: &Self::Op,
        _operand_map: &ahash::AHashMap<Self::Value, Self::Value>,
    ) -> Self::Op {
        op.clone()
    }
    fn set_operand(&mut self, _op: &Self::Op, _index: usize, _value: Self::Value) {}
    fn materialize_index_const(&mut self, _value: i64) -> Self::Value {
        ValueId(0)
    }
    fn materialize_index_add(&mut self, lhs: Self::Value, _rhs: Self::Value) -> Self::Value {
        lhs
    }
    fn materialize_compare_lt(&mut self, lhs: Self::Value, _rhs: Self::Value) -> Self::Value {
        lhs
    }
    fn materialize_select(
        &mut self,
        _cond: Self::Value,
        if_true: Self::Value,
        _if_false: Self::Value,
    ) -> Self::Value {
        if_true
    }
    fn build_counted_loop(
        &mut self,
        _lb: i64,
        _ub: i64,
        _step: i64,
        _init_args: Vec<Self::Value>,
    ) -> (Self::Op, Self::Block, Self::Value, Vec<Self::Value>) {
        (OpId(0), BlockId(0), ValueId(0), vec![])
    }
    fn set_yield(&mut self, _block: &Self::Block, _operands: Vec<Self::Value>) {}
    fn loop_results(&self, _loop_op: &Self::Op) -> Vec<Self::Value> {
        vec![]
    }
    fn emit_diagnostic(&mut self, _op: &Self::Op, _message: &str) {}
    fn replace_all_uses(&mut self, _old: Self::Value, _new: Self::Value) {}
    fn erase_op(&mut self, _op: &Self::Op) {}
}
