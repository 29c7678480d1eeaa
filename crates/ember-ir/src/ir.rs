//! IR data structures.

use crate::{IrError, IrResult};
use ember_effects::{Operation, SymbolRef, ValueId};
use smol_str::SmolStr;

// ============================================================================
// Operations
// ============================================================================

/// A single operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Op {
    name: SmolStr,
    operands: Vec<ValueId>,
    results: Vec<ValueId>,
    symbol: Option<SymbolRef>,
    regions: Vec<Region>,
}

impl Op {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operands(&self) -> &[ValueId] {
        &self.operands
    }

    pub fn results(&self) -> &[ValueId] {
        &self.results
    }

    pub fn result(&self, index: usize) -> IrResult<ValueId> {
        self.results
            .get(index)
            .copied()
            .ok_or_else(|| IrError::ResultOutOfRange {
                op: self.name.clone(),
                index,
            })
    }

    pub fn symbol(&self) -> Option<&SymbolRef> {
        self.symbol.as_ref()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, index: usize) -> IrResult<&Region> {
        self.regions.get(index).ok_or_else(|| IrError::RegionOutOfRange {
            op: self.name.clone(),
            index,
        })
    }

    pub fn region_mut(&mut self, index: usize) -> IrResult<&mut Region> {
        let name = self.name.clone();
        self.regions
            .get_mut(index)
            .ok_or(IrError::RegionOutOfRange { op: name, index })
    }

    /// Operations directly inside this operation's regions, in order.
    pub fn nested(&self) -> impl Iterator<Item = &Op> {
        self.regions.iter().flat_map(Region::ops)
    }

    /// Visit this operation and everything nested in it, pre-order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Op)) {
        f(self);
        for op in self.nested() {
            op.walk(f);
        }
    }
}

impl Operation for Op {
    fn name(&self) -> &str {
        &self.name
    }

    fn operands(&self) -> &[ValueId] {
        &self.operands
    }

    fn results(&self) -> &[ValueId] {
        &self.results
    }

    fn symbol(&self) -> Option<&SymbolRef> {
        self.symbol.as_ref()
    }

    fn nested_operations(&self) -> Vec<&dyn Operation> {
        self.nested().map(|op| op as &dyn Operation).collect()
    }
}

/// Builds one [`Op`], allocating its result values from the owning function.
pub struct OpBuilder<'f> {
    next_value: &'f mut u32,
    op: Op,
}

impl<'f> OpBuilder<'f> {
    pub fn operand(mut self, value: ValueId) -> Self {
        self.op.operands.push(value);
        self
    }

    pub fn operands(mut self, values: impl IntoIterator<Item = ValueId>) -> Self {
        self.op.operands.extend(values);
        self
    }

    /// Allocate `count` fresh result values.
    pub fn results(mut self, count: usize) -> Self {
        for _ in 0..count {
            let value = ValueId(*self.next_value);
            *self.next_value += 1;
            self.op.results.push(value);
        }
        self
    }

    pub fn symbol(mut self, name: impl Into<SmolStr>) -> Self {
        self.op.symbol = Some(SymbolRef::new(name));
        self
    }

    pub fn region(mut self, region: Region) -> Self {
        self.op.regions.push(region);
        self
    }

    pub fn build(self) -> Op {
        self.op
    }
}

// ============================================================================
// Blocks and Regions
// ============================================================================

/// A straight-line list of operations with optional block arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub args: Vec<ValueId>,
    pub ops: Vec<Op>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_args(args: Vec<ValueId>, ops: Vec<Op>) -> Self {
        Self { args, ops }
    }

    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }
}

/// A list of blocks owned by an operation or function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub blocks: Vec<Block>,
}

impl Region {
    pub fn new() -> Self {
        Self::default()
    }

    /// A region holding one block without arguments.
    pub fn from_ops(ops: Vec<Op>) -> Self {
        Self::from_block(Block::with_args(Vec::new(), ops))
    }

    pub fn from_block(block: Block) -> Self {
        Self { blocks: vec![block] }
    }

    pub fn ops(&self) -> impl Iterator<Item = &Op> {
        self.blocks.iter().flat_map(|block| block.ops.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|block| block.ops.is_empty())
    }
}

// ============================================================================
// Functions
// ============================================================================

/// A named function. Owns the value numbering for everything inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: SmolStr,
    pub params: Vec<ValueId>,
    pub body: Region,
    next_value: u32,
}

impl Function {
    /// A function with an empty entry block.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            body: Region::from_block(Block::new()),
            next_value: 0,
        }
    }

    pub fn add_param(&mut self) -> ValueId {
        let value = self.new_value();
        self.params.push(value);
        value
    }

    /// A fresh value, e.g. for a block argument.
    pub fn new_value(&mut self) -> ValueId {
        let value = ValueId(self.next_value);
        self.next_value += 1;
        value
    }

    /// Start building an operation. The result is detached until pushed.
    pub fn op(&mut self, name: impl Into<SmolStr>) -> OpBuilder<'_> {
        OpBuilder {
            next_value: &mut self.next_value,
            op: Op {
                name: name.into(),
                operands: Vec::new(),
                results: Vec::new(),
                symbol: None,
                regions: Vec::new(),
            },
        }
    }

    pub fn block_mut(&mut self, index: usize) -> IrResult<&mut Block> {
        let function = self.name.clone();
        self.body
            .blocks
            .get_mut(index)
            .ok_or(IrError::UnknownBlock { function, index })
    }

    /// Append `op` to the entry block.
    pub fn push(&mut self, op: Op) {
        if self.body.blocks.is_empty() {
            self.body.blocks.push(Block::new());
        }
        self.body.blocks[0].push(op);
    }

    /// Top-level operations in program order.
    pub fn ops(&self) -> impl Iterator<Item = &Op> {
        self.body.ops()
    }

    /// Visit every operation in the function, pre-order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Op)) {
        for op in self.body.ops() {
            op.walk(f);
        }
    }
}
