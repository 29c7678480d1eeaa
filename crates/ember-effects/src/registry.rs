//! Capability registry: which operations implement the effect contract.
//!
//! Operation kinds declare their effects once, when a dialect is set up,
//! either as a fixed list of `(kind, resource, value selector)` tuples or as
//! a function evaluated at query time. Asking the registry for an
//! operation's interface is the explicit "does this operation implement the
//! contract?" check; a `None` answer is a real, testable outcome rather than
//! an empty effect list.

use crate::effect::Effect;
use crate::error::{EffectError, EffectResult};
use crate::instance::{EffectInstance, EffectTarget};
use crate::interface::EffectOpInterface;
use crate::operation::Operation;
use crate::resource::Resource;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Declarations
// ============================================================================

/// Picks the value an effect applies to from the operation it is declared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueSelector {
    /// The effect has no specific target.
    #[default]
    None,
    Operand(usize),
    Result(usize),
    /// The operation's global symbol.
    Symbol,
}

impl ValueSelector {
    /// Resolve against `op`. A selector naming a missing operand, result or
    /// symbol yields no target; the effect itself is still reported.
    fn select(&self, op: &dyn Operation) -> Option<EffectTarget> {
        match self {
            ValueSelector::None => None,
            ValueSelector::Operand(index) => op.operands().get(*index).copied().map(EffectTarget::Value),
            ValueSelector::Result(index) => op.results().get(*index).copied().map(EffectTarget::Value),
            ValueSelector::Symbol => op.symbol().cloned().map(EffectTarget::Symbol),
        }
    }
}

/// One statically declared effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectSpec<E: Effect> {
    effect: E,
    resource: Resource,
    selector: ValueSelector,
    stage: u32,
    on_full_region: bool,
}

impl<E: Effect> EffectSpec<E> {
    pub fn new(effect: E, resource: Resource) -> Self {
        Self {
            effect,
            resource,
            selector: ValueSelector::None,
            stage: 0,
            on_full_region: false,
        }
    }

    pub fn on(mut self, selector: ValueSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn stage(mut self, stage: u32) -> Self {
        self.stage = stage;
        self
    }

    pub fn full_region(mut self) -> Self {
        self.on_full_region = true;
        self
    }

    fn instantiate(&self, op: &dyn Operation) -> EffectInstance<E> {
        let instance = EffectInstance::new(self.effect, self.resource)
            .with_target(self.selector.select(op))
            .with_stage(self.stage);
        if self.on_full_region {
            instance.on_full_region()
        } else {
            instance
        }
    }
}

/// The fixed effect list of one operation kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpEffects<E: Effect> {
    specs: Vec<EffectSpec<E>>,
}

impl<E: Effect> OpEffects<E> {
    /// No effects: the operation is known to be effect-free for `E`.
    pub fn new() -> Self {
        Self { specs: Vec::new() }
    }

    pub fn effect(self, effect: E, resource: Resource, selector: ValueSelector) -> Self {
        self.spec(EffectSpec::new(effect, resource).on(selector))
    }

    pub fn spec(mut self, spec: EffectSpec<E>) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl<E: Effect> Default for OpEffects<E> {
    fn default() -> Self {
        Self::new()
    }
}

type EffectFn<E> = Arc<dyn Fn(&dyn Operation) -> Vec<EffectInstance<E>> + Send + Sync>;

enum Declaration<E: Effect> {
    Static(OpEffects<E>),
    Computed(EffectFn<E>),
}

impl<E: Effect> Declaration<E> {
    fn effects(&self, op: &dyn Operation) -> Vec<EffectInstance<E>> {
        match self {
            Declaration::Static(effects) => effects.specs.iter().map(|spec| spec.instantiate(op)).collect(),
            Declaration::Computed(compute) => compute(op),
        }
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Declarations and recursive markers of one effect family.
#[derive(Default)]
struct FamilyTable {
    family: &'static str,
    /// Boxed `Declaration<E>` for the family's `E`.
    declarations: FxHashMap<SmolStr, Box<dyn Any + Send + Sync>>,
    recursive: FxHashSet<SmolStr>,
}

/// Maps (operation name, effect family) to declared effects and markers.
///
/// Built once while dialects are registered, then shared read-only by
/// analyses, possibly across threads.
#[derive(Default)]
pub struct EffectRegistry {
    families: FxHashMap<TypeId, FamilyTable>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn family_mut<E: Effect>(&mut self) -> &mut FamilyTable {
        let table = self.families.entry(TypeId::of::<E>()).or_default();
        table.family = E::FAMILY;
        table
    }

    fn family<E: Effect>(&self) -> Option<&FamilyTable> {
        self.families.get(&TypeId::of::<E>())
    }

    fn insert<E: Effect>(&mut self, op: &str, declaration: Declaration<E>) -> EffectResult<()> {
        let table = self.family_mut::<E>();
        if table.declarations.contains_key(op) {
            return Err(EffectError::DuplicateDeclaration {
                op: op.into(),
                family: E::FAMILY,
            });
        }
        table.declarations.insert(op.into(), Box::new(declaration));
        tracing::debug!(op, family = E::FAMILY, "declared effects");
        Ok(())
    }

    /// Declare a fixed effect list for every operation named `op`.
    pub fn declare<E: Effect>(&mut self, op: &str, effects: OpEffects<E>) -> EffectResult<()> {
        self.insert(op, Declaration::Static(effects))
    }

    /// Declare effects computed from the operation when queried.
    ///
    /// `compute` must be deterministic for a given operation.
    pub fn declare_with<E, F>(&mut self, op: &str, compute: F) -> EffectResult<()>
    where
        E: Effect,
        F: Fn(&dyn Operation) -> Vec<EffectInstance<E>> + Send + Sync + 'static,
    {
        self.insert(op, Declaration::Computed(Arc::new(compute)))
    }

    /// Mark `op` as having the effects of every operation nested in it.
    pub fn mark_recursive<E: Effect>(&mut self, op: &str) -> EffectResult<()> {
        let table = self.family_mut::<E>();
        if !table.recursive.insert(op.into()) {
            return Err(EffectError::DuplicateRecursiveMarker {
                op: op.into(),
                family: E::FAMILY,
            });
        }
        tracing::debug!(op, family = E::FAMILY, "marked recursive effects");
        Ok(())
    }

    /// The effect contract of `op` for family `E`, if it implements one.
    pub fn interface<'a, E: Effect>(&'a self, op: &'a dyn Operation) -> Option<OpEffectsView<'a, E>> {
        let declaration = self
            .family::<E>()?
            .declarations
            .get(op.name())?
            .downcast_ref::<Declaration<E>>()?;
        Some(OpEffectsView { declaration, op })
    }

    pub fn has_recursive_effects<E: Effect>(&self, op: &dyn Operation) -> bool {
        self.family::<E>()
            .is_some_and(|table| table.recursive.contains(op.name()))
    }

    pub fn is_declared<E: Effect>(&self, op: &str) -> bool {
        self.family::<E>()
            .is_some_and(|table| table.declarations.contains_key(op))
    }

    /// Total number of declarations across all families.
    pub fn len(&self) -> usize {
        self.families.values().map(|table| table.declarations.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for table in self.families.values() {
            let mut ops: Vec<&str> = table.declarations.keys().map(SmolStr::as_str).collect();
            ops.sort_unstable();
            map.entry(&table.family, &ops);
        }
        map.finish()
    }
}

/// An operation paired with its declaration: the operation's implementation
/// of [`EffectOpInterface`].
pub struct OpEffectsView<'a, E: Effect> {
    declaration: &'a Declaration<E>,
    op: &'a dyn Operation,
}

impl<'a, E: Effect> OpEffectsView<'a, E> {
    pub fn operation(&self) -> &'a dyn Operation {
        self.op
    }
}

impl<E: Effect> EffectOpInterface<E> for OpEffectsView<'_, E> {
    fn effects(&self) -> Vec<EffectInstance<E>> {
        self.declaration.effects(self.op)
    }
}
