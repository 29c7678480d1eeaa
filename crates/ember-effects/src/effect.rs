//! Effect families and type-level kind selectors.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

// ============================================================================
// Effect Families
// ============================================================================

/// A closed family of effect kinds.
///
/// Each family is its own enum. Families are never mixed: an operation
/// declares memory effects and, say, I/O effects through separate contracts,
/// and every query is scoped to exactly one family.
pub trait Effect: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Human-readable family name used in diagnostics.
    const FAMILY: &'static str;
}

/// Effects on memory-like resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MemoryEffect {
    /// A new value is allocated in the resource. Implies no visible read or
    /// write of existing state.
    Allocate,
    /// A previously allocated value is released.
    Free,
    /// The resource is dereferenced without visible mutation.
    Read,
    /// The resource is mutated without a visible read.
    Write,
}

impl MemoryEffect {
    pub const ALL: [MemoryEffect; 4] = [
        MemoryEffect::Allocate,
        MemoryEffect::Free,
        MemoryEffect::Read,
        MemoryEffect::Write,
    ];

    pub fn is_allocate(&self) -> bool {
        matches!(self, MemoryEffect::Allocate)
    }

    pub fn is_free(&self) -> bool {
        matches!(self, MemoryEffect::Free)
    }

    pub fn is_read(&self) -> bool {
        matches!(self, MemoryEffect::Read)
    }

    pub fn is_write(&self) -> bool {
        matches!(self, MemoryEffect::Write)
    }
}

impl Effect for MemoryEffect {
    const FAMILY: &'static str = "memory";
}

impl fmt::Display for MemoryEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MemoryEffect::Allocate => "allocate",
            MemoryEffect::Free => "free",
            MemoryEffect::Read => "read",
            MemoryEffect::Write => "write",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// Kind Filters
// ============================================================================

/// A type-level predicate over the kinds of one family.
///
/// Selectors are zero-sized types, so `op.effects_of::<kind::Read>()` picks
/// the filter at compile time and the returned instances are typed by the
/// selector's family. Tuples of selectors from the same family match any of
/// their members.
pub trait EffectFilter: 'static {
    type Family: Effect;

    fn matches(effect: &Self::Family) -> bool;
}

/// Matches every kind of family `E`.
pub struct AnyKind<E>(PhantomData<E>);

impl<E: Effect> EffectFilter for AnyKind<E> {
    type Family = E;

    fn matches(_effect: &E) -> bool {
        true
    }
}

/// Declare one zero-sized [`EffectFilter`] selector per variant of a family.
///
/// ```
/// use ember_effects::Effect;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// pub enum Io { Input, Output }
///
/// impl std::fmt::Display for Io {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "{:?}", self)
///     }
/// }
///
/// impl Effect for Io {
///     const FAMILY: &'static str = "io";
/// }
///
/// pub mod io_kind {
///     ember_effects::effect_kinds!(super::Io { Input, Output });
/// }
///
/// fn main() {
///     use ember_effects::EffectFilter;
///     assert!(io_kind::Output::matches(&Io::Output));
/// }
/// ```
#[macro_export]
macro_rules! effect_kinds {
    ($family:ty { $($variant:ident),+ $(,)? }) => {
        $(
            #[doc = concat!("Selects `", stringify!($variant), "` effects.")]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $variant;

            impl $crate::EffectFilter for $variant {
                type Family = $family;

                fn matches(effect: &$family) -> bool {
                    *effect == <$family>::$variant
                }
            }
        )+
    };
}

/// Type-level selectors for [`MemoryEffect`] kinds.
pub mod kind {
    crate::effect_kinds!(crate::MemoryEffect { Allocate, Free, Read, Write });
}

macro_rules! impl_filter_tuple {
    ($first:ident $(, $rest:ident)+) => {
        impl<$first, $($rest),+> EffectFilter for ($first, $($rest),+)
        where
            $first: EffectFilter,
            $($rest: EffectFilter<Family = <$first as EffectFilter>::Family>,)+
        {
            type Family = <$first as EffectFilter>::Family;

            fn matches(effect: &Self::Family) -> bool {
                $first::matches(effect) $(|| $rest::matches(effect))+
            }
        }
    };
}

impl_filter_tuple!(A, B);
impl_filter_tuple!(A, B, C);
impl_filter_tuple!(A, B, C, D);
