use smol_str::SmolStr;
use thiserror::Error;

/// Errors raised while declaring or collecting effects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectError {
    #[error("effects of `{op}` are already declared for the {family} family")]
    DuplicateDeclaration { op: SmolStr, family: &'static str },

    #[error("`{op}` is already marked as having recursive {family} effects")]
    DuplicateRecursiveMarker { op: SmolStr, family: &'static str },

    #[error("`{op}` declares no {family} effects and is not marked recursive")]
    Unanalyzable { op: SmolStr, family: &'static str },

    #[error("operation nesting exceeds the limit of {limit} at `{op}`")]
    NestingTooDeep { op: SmolStr, limit: usize },

    #[error("resource table is full, cannot intern `{name}`")]
    ResourceTableFull { name: SmolStr },

    #[error("invalid analysis configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for effect operations
pub type EffectResult<T> = Result<T, EffectError>;
