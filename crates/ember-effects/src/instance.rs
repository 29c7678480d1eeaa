//! Effect instances: one declared effect of one operation.

use crate::effect::Effect;
use crate::resource::Resource;
use smol_str::SmolStr;
use std::fmt;

/// SSA value identity, owned by the surrounding IR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub u32);

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Reference to a named global entity, such as a global variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolRef(SmolStr);

impl SymbolRef {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// What an effect is applied to, when it can be determined.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EffectTarget {
    /// An operand, result or block argument.
    Value(ValueId),
    /// A global symbol.
    Symbol(SymbolRef),
}

impl fmt::Display for EffectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectTarget::Value(value) => write!(f, "{}", value),
            EffectTarget::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

/// A single effect of family `E` applied to a resource.
///
/// Instances are plain descriptive records. They are built by an
/// operation's effect declaration on demand and dropped once the query
/// consuming them returns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EffectInstance<E: Effect> {
    effect: E,
    resource: Resource,
    target: Option<EffectTarget>,
    /// Relative point within the operation at which the effect happens.
    stage: u32,
    /// The effect covers every byte of the target, not just part of it.
    on_full_region: bool,
}

impl<E: Effect> EffectInstance<E> {
    /// An effect with no known target.
    pub fn new(effect: E, resource: Resource) -> Self {
        Self {
            effect,
            resource,
            target: None,
            stage: 0,
            on_full_region: false,
        }
    }

    pub fn on_value(self, value: ValueId) -> Self {
        self.with_target(Some(EffectTarget::Value(value)))
    }

    pub fn on_symbol(self, symbol: SymbolRef) -> Self {
        self.with_target(Some(EffectTarget::Symbol(symbol)))
    }

    pub fn with_target(mut self, target: Option<EffectTarget>) -> Self {
        self.target = target;
        self
    }

    pub fn with_stage(mut self, stage: u32) -> Self {
        self.stage = stage;
        self
    }

    pub fn on_full_region(mut self) -> Self {
        self.on_full_region = true;
        self
    }

    pub fn effect(&self) -> E {
        self.effect
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn target(&self) -> Option<&EffectTarget> {
        self.target.as_ref()
    }

    /// The value this effect applies to. `None` for untargeted and
    /// symbol-targeted effects.
    pub fn value(&self) -> Option<ValueId> {
        match self.target {
            Some(EffectTarget::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub fn symbol(&self) -> Option<&SymbolRef> {
        match &self.target {
            Some(EffectTarget::Symbol(symbol)) => Some(symbol),
            _ => None,
        }
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn is_on_full_region(&self) -> bool {
        self.on_full_region
    }
}

impl<E: Effect> fmt::Display for EffectInstance<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.effect)?;
        if let Some(target) = &self.target {
            write!(f, "({})", target)?;
        }
        write!(f, " @ {}", self.resource)?;
        if self.stage != 0 {
            write!(f, ", stage {}", self.stage)?;
        }
        if self.on_full_region {
            write!(f, ", full-region")?;
        }
        Ok(())
    }
}
