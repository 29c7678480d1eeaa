//! Ember Side-Effect Model
//!
//! This crate lets every IR operation declare which side effects it has
//! (allocation, deallocation, read, write, or effects of any user-defined
//! family) against which resources, and lets analysis passes query those
//! effects uniformly without knowing which concrete operation they inspect.
//!
//! ## Architecture
//!
//! The model is layered:
//!
//! 1. **Taxonomy**: [`Resource`] identity tags and effect families such as
//!    [`MemoryEffect`]. Kinds are also available as type-level selectors in
//!    [`kind`] so queries can filter statically.
//! 2. **Instances**: an [`EffectInstance`] ties one kind to one resource and
//!    optionally to the value or symbol it touches.
//! 3. **Contract**: [`EffectOpInterface`] is the single method an
//!    effect-bearing operation implements. [`EffectQuery`] layers the query
//!    engine on top of it for every implementor.
//! 4. **Capabilities**: [`EffectRegistry`] records, per operation name and
//!    family, the declared effects and the recursive-effects marker.
//! 5. **Analysis**: [`EffectAnalysis`] answers conservative questions about
//!    arbitrary [`Operation`]s, recursing into nested operations when allowed.
//!
//! ## Conservative answers
//!
//! | Operation has | `has_no_effect` |
//! |---------------|-----------------|
//! | contract, empty list | `true` |
//! | contract, non-empty list | `false` |
//! | recursive marker, with or without a contract | `false`, or the recursive union under [`RecursionPolicy::Recursive`] |
//! | neither | `false` |
//!
//! ## Example
//!
//! ```
//! use ember_effects::{kind, EffectInstance, EffectOpInterface, EffectQuery, MemoryEffect, Resource, ValueId};
//!
//! struct Load { address: ValueId }
//!
//! impl EffectOpInterface<MemoryEffect> for Load {
//!     fn effects(&self) -> Vec<EffectInstance<MemoryEffect>> {
//!         vec![EffectInstance::new(MemoryEffect::Read, Resource::default_resource()).on_value(self.address)]
//!     }
//! }
//!
//! let load = Load { address: ValueId(0) };
//! assert!(load.only_has_effect::<kind::Read>());
//! assert!(!load.has_effect::<kind::Write>());
//! ```

mod analysis;
mod config;
mod effect;
mod error;
mod instance;
mod interface;
mod operation;
mod registry;
mod resource;

pub use analysis::EffectAnalysis;
pub use config::{AnalysisConfig, RecursionPolicy, DEFAULT_MAX_DEPTH};
pub use effect::{kind, AnyKind, Effect, EffectFilter, MemoryEffect};
pub use error::{EffectError, EffectResult};
pub use instance::{EffectInstance, EffectTarget, SymbolRef, ValueId};
pub use interface::{EffectOpInterface, EffectQuery};
pub use operation::Operation;
pub use registry::{EffectRegistry, EffectSpec, OpEffects, OpEffectsView, ValueSelector};
pub use resource::Resource;
