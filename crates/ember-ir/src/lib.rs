//! Region-based intermediate representation for the Ember compiler.
//!
//! Operations own their nested regions, regions own blocks and blocks own
//! operations, so the IR is a strict tree. Every operation is identified by
//! a dotted name (`mem.load`, `scf.for`) and its side effects are declared
//! through [`ember_effects`] rather than hard-coded in passes.
//!
//! # Architecture
//!
//! ```text
//! Function ─ Region ─ Block ─ Op ─ Region ─ ...
//!                              │
//!                              └── EffectRegistry (dialect::standard_registry)
//! ```
//!
//! # Example
//!
//! ```
//! use ember_effects::{kind, EffectAnalysis, EffectQuery, MemoryEffect};
//! use ember_ir::{dialect, Function};
//!
//! let registry = dialect::standard_registry().unwrap();
//! let mut func = Function::new("read_first");
//! let ptr = func.add_param();
//! let load = func.op(dialect::ops::LOAD).operand(ptr).results(1).build();
//!
//! let effects = registry.interface::<MemoryEffect>(&load).unwrap();
//! assert!(effects.only_has_effect::<kind::Read>());
//! assert!(!EffectAnalysis::new(&registry).has_no_effect::<MemoryEffect>(&load));
//! ```

use smol_str::SmolStr;
use thiserror::Error;

pub mod dialect;
pub mod ir;
mod pretty;

pub use ir::{Block, Function, Op, OpBuilder, Region};
pub use pretty::{pretty_print_function, pretty_print_op};

/// Errors from navigating or editing the IR
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    #[error("`{op}` has no result #{index}")]
    ResultOutOfRange { op: SmolStr, index: usize },

    #[error("`{op}` has no region #{index}")]
    RegionOutOfRange { op: SmolStr, index: usize },

    #[error("function `{function}` has no block #{index}")]
    UnknownBlock { function: SmolStr, index: usize },
}

/// Result type for IR navigation
pub type IrResult<T> = Result<T, IrError>;
