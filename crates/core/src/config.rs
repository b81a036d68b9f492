//! Runtime configuration for parsing and resolution.
//!
//! Every field has a default, so an empty JSON object is a valid config file.

use crate::error::{GroovyscopeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Overrides [`ParseConfig::mode`] when set to `strict` or `lenient`.
pub const PARSE_MODE_ENV: &str = "GROOVYSCOPE_PARSE_MODE";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMode {
    /// Abort the whole conversion on the first sub-tree that cannot be converted.
    Strict,
    /// Record a problem, substitute a placeholder node and keep going.
    #[default]
    Lenient,
}

impl FromStr for ConversionMode {
    type Err = GroovyscopeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ConversionMode::Strict),
            "lenient" => Ok(ConversionMode::Lenient),
            other => Err(GroovyscopeError::Config(format!(
                "unknown conversion mode '{}'",
                other
            ))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ParseConfig {
    pub mode: ConversionMode,
    /// Copy source ranges onto canonical nodes.
    pub attribute_positions: bool,
    /// Attach leading and orphan comments to canonical nodes.
    pub attribute_comments: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            mode: ConversionMode::Lenient,
            attribute_positions: true,
            attribute_comments: true,
        }
    }
}

impl ParseConfig {
    pub fn strict() -> Self {
        Self {
            mode: ConversionMode::Strict,
            ..Self::default()
        }
    }

    pub fn lenient() -> Self {
        Self::default()
    }

    pub fn is_strict(&self) -> bool {
        self.mode == ConversionMode::Strict
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Packages (ending in `.`) or fully qualified classes imported into every file,
    /// on top of the language's own default imports.
    pub extra_default_imports: Vec<String>,
    /// Remember misses in the combined solver cache as well as hits.
    pub cache_unsolved: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            extra_default_imports: Vec::new(),
            cache_unsolved: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct CoreConfig {
    pub parse: ParseConfig,
    pub resolver: ResolverConfig,
}

impl CoreConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut config: CoreConfig = serde_json::from_str(json)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), mode = ?config.parse.mode, "loaded configuration");
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(mode) = std::env::var(PARSE_MODE_ENV) {
            self.parse.mode = mode.parse()?;
        }
        Ok(())
    }
}
