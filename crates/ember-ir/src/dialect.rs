//! Standard operations and their declared effects.
//!
//! | Operation | Memory | I/O |
//! |-----------|--------|-----|
//! | `mem.alloc` | allocate result in `<Default>` | none |
//! | `mem.alloca` | allocate result in the automatic allocation scope | none |
//! | `mem.dealloc` | free operand 0 | none |
//! | `mem.load` | read operand 0 | none |
//! | `mem.store` | write operand 1 | none |
//! | `mem.copy` | read operand 0, write operand 1 | none |
//! | `mem.zero` | write every operand | none |
//! | `mem.global_load` / `mem.global_store` | read / write the symbol | none |
//! | `arith.*`, `scf.yield`, `func.return` | none | none |
//! | `io.print` / `io.read` | none | write stdout / read stdin |
//! | `scf.for`, `scf.if`, `scf.execute_region` | recursive | recursive |
//! | `func.call` | unknown | unknown |

use ember_effects::{
    Effect, EffectInstance, EffectRegistry, EffectResult, EffectSpec, MemoryEffect, OpEffects,
    Operation, Resource, ValueSelector,
};
use std::fmt;

/// Operation names.
pub mod ops {
    pub const ALLOC: &str = "mem.alloc";
    pub const ALLOCA: &str = "mem.alloca";
    pub const DEALLOC: &str = "mem.dealloc";
    pub const LOAD: &str = "mem.load";
    pub const STORE: &str = "mem.store";
    pub const COPY: &str = "mem.copy";
    pub const ZERO: &str = "mem.zero";
    pub const GLOBAL_LOAD: &str = "mem.global_load";
    pub const GLOBAL_STORE: &str = "mem.global_store";

    pub const CONST: &str = "arith.const";
    pub const ADD: &str = "arith.add";
    pub const MUL: &str = "arith.mul";
    pub const CMP: &str = "arith.cmp";

    pub const PRINT: &str = "io.print";
    pub const READ: &str = "io.read";

    pub const FOR: &str = "scf.for";
    pub const IF: &str = "scf.if";
    pub const EXECUTE_REGION: &str = "scf.execute_region";
    pub const YIELD: &str = "scf.yield";

    pub const CALL: &str = "func.call";
    pub const RETURN: &str = "func.return";
}

const MEMORY_OPS: &[&str] = &[
    ops::ALLOC,
    ops::ALLOCA,
    ops::DEALLOC,
    ops::LOAD,
    ops::STORE,
    ops::COPY,
    ops::ZERO,
    ops::GLOBAL_LOAD,
    ops::GLOBAL_STORE,
];

const PURE_OPS: &[&str] = &[
    ops::CONST,
    ops::ADD,
    ops::MUL,
    ops::CMP,
    ops::YIELD,
    ops::RETURN,
];

const IO_OPS: &[&str] = &[ops::PRINT, ops::READ];

const REGION_OPS: &[&str] = &[ops::FOR, ops::IF, ops::EXECUTE_REGION];

// ============================================================================
// I/O Effects
// ============================================================================

/// Effects on the outside world. A separate family from [`MemoryEffect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoEffect {
    Read,
    Write,
}

impl Effect for IoEffect {
    const FAMILY: &'static str = "io";
}

impl fmt::Display for IoEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoEffect::Read => write!(f, "io-read"),
            IoEffect::Write => write!(f, "io-write"),
        }
    }
}

/// Type-level selectors for [`IoEffect`] kinds.
pub mod io_kind {
    ember_effects::effect_kinds!(super::IoEffect { Read, Write });
}

pub fn stdout() -> Resource {
    Resource::new("io.stdout")
}

pub fn stdin() -> Resource {
    Resource::new("io.stdin")
}

// ============================================================================
// Registration
// ============================================================================

/// A registry with every standard operation declared.
pub fn standard_registry() -> EffectResult<EffectRegistry> {
    let mut registry = EffectRegistry::new();
    register_memory_effects(&mut registry)?;
    register_io_effects(&mut registry)?;
    Ok(registry)
}

/// Declare each operation in `names` as having no effect of family `E`.
fn declare_none<E: Effect>(registry: &mut EffectRegistry, names: &[&str]) -> EffectResult<()> {
    for name in names {
        registry.declare(name, OpEffects::<E>::new())?;
    }
    Ok(())
}

pub fn register_memory_effects(registry: &mut EffectRegistry) -> EffectResult<()> {
    let default = Resource::default_resource();

    registry.declare(
        ops::ALLOC,
        OpEffects::new().effect(MemoryEffect::Allocate, default, ValueSelector::Result(0)),
    )?;
    registry.declare(
        ops::ALLOCA,
        OpEffects::new().effect(
            MemoryEffect::Allocate,
            Resource::automatic_allocation_scope(),
            ValueSelector::Result(0),
        ),
    )?;
    registry.declare(
        ops::DEALLOC,
        OpEffects::new().effect(MemoryEffect::Free, default, ValueSelector::Operand(0)),
    )?;
    registry.declare(
        ops::LOAD,
        OpEffects::new().effect(MemoryEffect::Read, default, ValueSelector::Operand(0)),
    )?;
    registry.declare(
        ops::STORE,
        OpEffects::new().effect(MemoryEffect::Write, default, ValueSelector::Operand(1)),
    )?;
    // The source is fully read before the destination is written.
    registry.declare(
        ops::COPY,
        OpEffects::new()
            .spec(
                EffectSpec::new(MemoryEffect::Read, default)
                    .on(ValueSelector::Operand(0))
                    .full_region(),
            )
            .spec(
                EffectSpec::new(MemoryEffect::Write, default)
                    .on(ValueSelector::Operand(1))
                    .stage(1)
                    .full_region(),
            ),
    )?;
    registry.declare_with(ops::ZERO, |op: &dyn Operation| {
        op.operands()
            .iter()
            .map(|&value| {
                EffectInstance::new(MemoryEffect::Write, Resource::default_resource())
                    .on_value(value)
                    .on_full_region()
            })
            .collect()
    })?;
    registry.declare(
        ops::GLOBAL_LOAD,
        OpEffects::new().effect(MemoryEffect::Read, default, ValueSelector::Symbol),
    )?;
    registry.declare(
        ops::GLOBAL_STORE,
        OpEffects::new().effect(MemoryEffect::Write, default, ValueSelector::Symbol),
    )?;

    declare_none::<MemoryEffect>(registry, PURE_OPS)?;
    declare_none::<MemoryEffect>(registry, IO_OPS)?;
    for name in REGION_OPS {
        registry.mark_recursive::<MemoryEffect>(name)?;
    }
    tracing::debug!(declarations = registry.len(), "registered memory effects");
    Ok(())
}

pub fn register_io_effects(registry: &mut EffectRegistry) -> EffectResult<()> {
    registry.declare(
        ops::PRINT,
        OpEffects::new().effect(IoEffect::Write, stdout(), ValueSelector::None),
    )?;
    registry.declare(
        ops::READ,
        OpEffects::new().effect(IoEffect::Read, stdin(), ValueSelector::None),
    )?;

    declare_none::<IoEffect>(registry, PURE_OPS)?;
    declare_none::<IoEffect>(registry, MEMORY_OPS)?;
    for name in REGION_OPS {
        registry.mark_recursive::<IoEffect>(name)?;
    }
    Ok(())
}
