//! The effect query contract and the query engine layered over it.

use crate::effect::{Effect, EffectFilter};
use crate::instance::{EffectInstance, SymbolRef, ValueId};
use crate::resource::Resource;
use indexmap::IndexSet;

/// Implemented by every operation that can enumerate its effects of
/// family `E`.
///
/// `effects` must be a pure function of the operation's static shape: calling
/// it twice on an unmodified operation yields equal lists in the same order.
/// An empty list is a promise that the operation has no effect of this
/// family, so implementors must list every effect they have.
pub trait EffectOpInterface<E: Effect> {
    fn effects(&self) -> Vec<EffectInstance<E>>;
}

/// A precomputed effect list, e.g. the recursive union of a region.
impl<E: Effect> EffectOpInterface<E> for Vec<EffectInstance<E>> {
    fn effects(&self) -> Vec<EffectInstance<E>> {
        self.clone()
    }
}

impl<E: Effect> EffectOpInterface<E> for [EffectInstance<E>] {
    fn effects(&self) -> Vec<EffectInstance<E>> {
        self.to_vec()
    }
}

/// Queries available on every [`EffectOpInterface`] implementor.
///
/// Every query re-derives the full list through `effects()` and filters it
/// in order. Nothing is cached, so a filtered view always agrees with the
/// full list at call time.
pub trait EffectQuery<E: Effect>: EffectOpInterface<E> {
    /// All effects whose kind matches `F`, in declaration order.
    fn effects_of<F>(&self) -> Vec<EffectInstance<E>>
    where
        F: EffectFilter<Family = E>,
    {
        self.effects()
            .into_iter()
            .filter(|instance| F::matches(&instance.effect()))
            .collect()
    }

    fn has_effect<F>(&self) -> bool
    where
        F: EffectFilter<Family = E>,
    {
        self.effects()
            .iter()
            .any(|instance| F::matches(&instance.effect()))
    }

    /// True if there is at least one effect and every effect matches `F`.
    ///
    /// An operation without effects does not "only have" any effect; use
    /// [`EffectQuery::has_no_effect`] for that.
    fn only_has_effect<F>(&self) -> bool
    where
        F: EffectFilter<Family = E>,
    {
        let effects = self.effects();
        !effects.is_empty() && effects.iter().all(|instance| F::matches(&instance.effect()))
    }

    fn has_no_effect(&self) -> bool {
        self.effects().is_empty()
    }

    /// Effects targeting `value`. Untargeted effects are never included.
    fn effects_on_value(&self, value: ValueId) -> Vec<EffectInstance<E>> {
        self.effects()
            .into_iter()
            .filter(|instance| instance.value() == Some(value))
            .collect()
    }

    fn effects_on_resource(&self, resource: Resource) -> Vec<EffectInstance<E>> {
        self.effects()
            .into_iter()
            .filter(|instance| instance.resource() == resource)
            .collect()
    }

    fn effects_on_symbol(&self, symbol: &SymbolRef) -> Vec<EffectInstance<E>> {
        self.effects()
            .into_iter()
            .filter(|instance| instance.symbol() == Some(symbol))
            .collect()
    }

    /// True if some effect of kind `F` targets `value`.
    fn has_effect_on_value<F>(&self, value: ValueId) -> bool
    where
        F: EffectFilter<Family = E>,
    {
        self.effects()
            .iter()
            .any(|instance| instance.value() == Some(value) && F::matches(&instance.effect()))
    }

    /// The effects with duplicates removed, keeping first occurrences.
    fn effect_set(&self) -> IndexSet<EffectInstance<E>> {
        self.effects().into_iter().collect()
    }
}

impl<E: Effect, T: EffectOpInterface<E> + ?Sized> EffectQuery<E> for T {}
