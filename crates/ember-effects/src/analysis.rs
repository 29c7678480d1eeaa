//! Conservative effect queries over arbitrary operations.
//!
//! [`EffectQuery`] answers questions for an operation that is known to
//! implement the contract. [`EffectAnalysis`] answers them for any
//! [`Operation`], falling back to the conservative answer whenever the
//! registry cannot vouch for the operation:
//!
//! - no contract and no recursive marker: not analyzable, assume effects
//! - recursive marker: assume effects, or (under
//!   [`RecursionPolicy::Recursive`]) union the nested operations' effects

use crate::config::{AnalysisConfig, RecursionPolicy};
use crate::effect::{Effect, EffectFilter};
use crate::error::{EffectError, EffectResult};
use crate::instance::EffectInstance;
use crate::interface::{EffectOpInterface, EffectQuery};
use crate::operation::Operation;
use crate::registry::EffectRegistry;
use indexmap::IndexSet;

/// Registry-backed analysis entry point for passes.
#[derive(Debug, Clone)]
pub struct EffectAnalysis<'r> {
    registry: &'r EffectRegistry,
    config: AnalysisConfig,
}

impl<'r> EffectAnalysis<'r> {
    pub fn new(registry: &'r EffectRegistry) -> Self {
        Self {
            registry,
            config: AnalysisConfig::default(),
        }
    }

    /// Fails if `config` does not pass [`AnalysisConfig::validate`].
    pub fn with_config(registry: &'r EffectRegistry, config: AnalysisConfig) -> EffectResult<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    pub fn registry(&self) -> &'r EffectRegistry {
        self.registry
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// True only if `op` is known to have no effect of family `E`.
    ///
    /// The recursive marker overrides an empty contract: it is answered
    /// conservatively, or under [`RecursionPolicy::Recursive`] by requiring
    /// the whole recursive union to be empty.
    pub fn has_no_effect<E: Effect>(&self, op: &dyn Operation) -> bool {
        if self.registry.has_recursive_effects::<E>(op) {
            return match self.config.recursion {
                RecursionPolicy::Conservative => {
                    tracing::debug!(op = op.name(), family = E::FAMILY, "recursive effects, assuming effects");
                    false
                }
                RecursionPolicy::Recursive => self.is_effect_free::<E>(op),
            };
        }
        match self.registry.interface::<E>(op) {
            Some(interface) => interface.has_no_effect(),
            None => {
                tracing::debug!(op = op.name(), family = E::FAMILY, "no effect contract, assuming effects");
                false
            }
        }
    }

    /// True only if the recursive union of `op`'s effects is known to be
    /// empty, regardless of the configured policy.
    pub fn is_effect_free<E: Effect>(&self, op: &dyn Operation) -> bool {
        self.effects_recursively::<E>(op)
            .map(|effects| effects.is_empty())
            .unwrap_or(false)
    }

    /// Conservative test for whether `op` may have an effect matching `F`.
    pub fn might_have_effect<F: EffectFilter>(&self, op: &dyn Operation) -> bool {
        if self.registry.has_recursive_effects::<F::Family>(op) {
            return match self.config.recursion {
                RecursionPolicy::Conservative => true,
                RecursionPolicy::Recursive => self
                    .effects_recursively::<F::Family>(op)
                    .map(|effects| effects.has_effect::<F>())
                    .unwrap_or(true),
            };
        }
        match self.registry.interface::<F::Family>(op) {
            Some(interface) => interface.has_effect::<F>(),
            None => true,
        }
    }

    /// The effects of `op` and, if it carries the recursive marker, of
    /// every operation nested within it.
    ///
    /// The result is de-duplicated and ordered pre-order: an operation's own
    /// effects come before those of its nested operations. Fails if any
    /// visited operation is not analyzable or nesting exceeds the configured
    /// depth.
    pub fn effects_recursively<E: Effect>(&self, op: &dyn Operation) -> EffectResult<Vec<EffectInstance<E>>> {
        let mut effects = IndexSet::new();
        self.collect(op, 0, &mut effects)?;
        Ok(effects.into_iter().collect())
    }

    fn collect<E: Effect>(
        &self,
        op: &dyn Operation,
        depth: usize,
        effects: &mut IndexSet<EffectInstance<E>>,
    ) -> EffectResult<()> {
        if depth > self.config.max_depth {
            tracing::warn!(op = op.name(), limit = self.config.max_depth, "nesting limit reached");
            return Err(EffectError::NestingTooDeep {
                op: op.name().into(),
                limit: self.config.max_depth,
            });
        }

        let recursive = self.registry.has_recursive_effects::<E>(op);
        match self.registry.interface::<E>(op) {
            Some(interface) => effects.extend(interface.effects()),
            None if recursive => {}
            None => {
                return Err(EffectError::Unanalyzable {
                    op: op.name().into(),
                    family: E::FAMILY,
                })
            }
        }

        if recursive {
            for nested in op.nested_operations() {
                tracing::trace!(parent = op.name(), op = nested.name(), depth, "visiting nested operation");
                self.collect(nested, depth + 1, effects)?;
            }
        }
        Ok(())
    }
}
