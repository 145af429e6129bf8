//! Engine configuration.
//!
//! Loaded from JSON; every field is optional and falls back to its default.
//!
//! ```json
//! { "id_strategy": "numeric", "strategies": { "fold_ids_into_source": false } }
//! ```

use crate::ids::{IdCanonicalizer, NativeIds, NumericIds, TextualIds};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Which identifier canonicalizer filters and plans use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Whatever the graph provider supplies.
    #[default]
    Store,
    Native,
    Numeric,
    Textual,
}

impl IdStrategy {
    pub fn resolve(self, store: Arc<dyn IdCanonicalizer>) -> Arc<dyn IdCanonicalizer> {
        match self {
            IdStrategy::Store => store,
            IdStrategy::Native => Arc::new(NativeIds),
            IdStrategy::Numeric => Arc::new(NumericIds),
            IdStrategy::Textual => Arc::new(TextualIds),
        }
    }
}

/// Optimizer strategy toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Rewrite `has(key, is(p))` to `has(key, p)`.
    pub inline_value_predicates: bool,
    /// Fold adjacent has-steps into one multi-container step.
    pub merge_has_steps: bool,
    /// Move an `eq`/`within` id filter into an id-less source step.
    pub fold_ids_into_source: bool,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            inline_value_predicates: true,
            merge_has_steps: true,
            fold_ids_into_source: true,
        }
    }
}

impl StrategyConfig {
    /// All strategies off: compiled plans mirror the builder calls 1:1.
    pub fn disabled() -> Self {
        Self {
            inline_value_predicates: false,
            merge_has_steps: false,
            fold_ids_into_source: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub id_strategy: IdStrategy,
    pub strategies: StrategyConfig,
}

impl EngineConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid engine config")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("failed to load engine config {}", path.display()))
    }
}
