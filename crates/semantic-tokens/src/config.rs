//! Semantic tokens configuration

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::legend::{SemanticTokenModifier, SemanticTokenType, SemanticTokensLegend};

/// Semantic tokens configuration
///
/// ```toml
/// enabled = true
/// delta = false
/// token_types = ["keyword", "function"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticTokensConfig {
    /// Enable semantic highlighting
    pub enabled: bool,
    /// Serve full requests
    pub full: bool,
    /// Serve delta requests (answered in full when disabled)
    pub delta: bool,
    /// Serve range requests
    pub range: bool,
    /// Token types overriding the standard legend
    pub token_types: Option<Vec<String>>,
    /// Token modifiers overriding the standard legend
    pub token_modifiers: Option<Vec<String>>,
}

impl Default for SemanticTokensConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            full: true,
            delta: true,
            range: true,
            token_types: None,
            token_modifiers: None,
        }
    }
}

impl SemanticTokensConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid semantic tokens configuration")
    }

    /// Load from `path`, falling back to defaults when the file is missing
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No semantic tokens config, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Legend from the configured overrides or the standard catalog
    pub fn legend(&self) -> SemanticTokensLegend {
        let token_types = match &self.token_types {
            Some(names) => names.iter().cloned().map(SemanticTokenType::new).collect(),
            None => SemanticTokenType::defaults(),
        };
        let token_modifiers = match &self.token_modifiers {
            Some(names) => names.iter().cloned().map(SemanticTokenModifier::new).collect(),
            None => SemanticTokenModifier::defaults(),
        };
        SemanticTokensLegend::new(token_types, token_modifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SemanticTokensConfig::from_toml_str("delta = false").unwrap();

        assert!(config.enabled);
        assert!(config.full);
        assert!(!config.delta);
        assert!(config.range);
        assert_eq!(config.legend(), SemanticTokensLegend::default());
    }

    #[test]
    fn test_legend_overrides() {
        let config = SemanticTokensConfig::from_toml_str(
            r#"
            token_types = ["keyword", "function"]
            token_modifiers = ["static"]
            "#,
        )
        .unwrap();
        let legend = config.legend();

        assert_eq!(legend.type_id("function"), 1);
        assert_eq!(legend.type_id("namespace"), 0);
        assert_eq!(legend.modifier_mask(["static"]), 1);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(SemanticTokensConfig::from_toml_str("enabled = \"yes\"").is_err());
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("semantic-tokens.toml");

        assert_eq!(
            SemanticTokensConfig::load_or_default(&path).unwrap(),
            SemanticTokensConfig::default()
        );

        std::fs::write(&path, "range = false\n").unwrap();
        let config = SemanticTokensConfig::load_or_default(&path).unwrap();
        assert!(!config.range);
    }
}
