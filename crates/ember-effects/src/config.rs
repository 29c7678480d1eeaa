//! Analysis configuration.

use crate::error::{EffectError, EffectResult};
use serde::{Deserialize, Serialize};

/// Nesting bound used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// How free-function queries treat operations marked as having recursive
/// effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecursionPolicy {
    /// Report a marked operation as having effects without looking inside.
    #[default]
    Conservative,
    /// Union the effects of every nested operation.
    Recursive,
}

/// Settings for [`EffectAnalysis`](crate::EffectAnalysis).
///
/// ```toml
/// recursion = "recursive"
/// max-depth = 64
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AnalysisConfig {
    pub recursion: RecursionPolicy,
    /// Deepest nesting level visited before giving up.
    pub max_depth: usize,
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recursion(mut self, recursion: RecursionPolicy) -> Self {
        self.recursion = recursion;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn from_toml_str(source: &str) -> EffectResult<Self> {
        let config: AnalysisConfig =
            toml::from_str(source).map_err(|e| EffectError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EffectResult<()> {
        if self.max_depth == 0 {
            return Err(EffectError::InvalidConfig(
                "max-depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            recursion: RecursionPolicy::Conservative,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
