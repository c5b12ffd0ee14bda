//! # Skin Configuration
//!
//! Chooses which [Skin] an application starts with.
//!
//! The `STRATA_SKIN` environment variable names either a built-in skin
//! (`slate`, `paper`) or a path to a `.toml` skin file:
//!
//! ```bash
//! export STRATA_SKIN=paper
//! export STRATA_SKIN=./skins/contrast.toml
//! ```
//!
//! ```rust
//! use strata_skin::config::SkinConfig;
//!
//! let skin = SkinConfig::from_env_or_default().resolve_or_default();
//! ```

use std::env;
use std::path::PathBuf;

use crate::error::SkinResult;
use crate::skin::Skin;

/// Environment variable read by [SkinConfig::from_env_or_default].
pub const SKIN_ENV: &str = "STRATA_SKIN";

/// Where a skin comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkinSource {
    /// A built-in skin by name.
    Builtin(String),
    /// A TOML skin file.
    File(PathBuf),
    /// TOML text held in memory.
    Inline(String),
}

impl SkinSource {
    /// Interpret a user supplied string: anything ending in `.toml` is a path.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.ends_with(".toml") {
            Self::File(PathBuf::from(value))
        } else {
            Self::Builtin(value.to_string())
        }
    }
}

/// Skin selection with a fallback.
#[derive(Debug, Clone)]
pub struct SkinConfig {
    /// The preferred skin.
    pub source: SkinSource,
    /// Used when the preferred skin cannot be loaded.
    pub fallback: SkinSource,
}

impl Default for SkinConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SkinConfig {
    /// The default configuration: `slate` with `slate` as fallback.
    pub fn new() -> Self {
        Self {
            source: SkinSource::Builtin("slate".to_string()),
            fallback: SkinSource::Builtin("slate".to_string()),
        }
    }

    /// Read `STRATA_SKIN`, or use the defaults when it is unset.
    pub fn from_env_or_default() -> Self {
        let mut config = Self::new();
        if let Ok(value) = env::var(SKIN_ENV) {
            log::debug!("{} = {}", SKIN_ENV, value);
            config.source = SkinSource::parse(&value);
        }
        config
    }

    /// Use the given source.
    pub fn with_source(mut self, source: SkinSource) -> Self {
        self.source = source;
        self
    }

    /// Use the given fallback.
    pub fn with_fallback(mut self, fallback: SkinSource) -> Self {
        self.fallback = fallback;
        self
    }

    /// Load the configured skin.
    pub fn resolve(&self) -> SkinResult<Skin> {
        Self::load(&self.source)
    }

    /// Load the configured skin, falling back on failure, then to [Skin::default].
    pub fn resolve_or_default(&self) -> Skin {
        match Self::load(&self.source) {
            Ok(skin) => skin,
            Err(err) => {
                log::warn!("Failed to load skin {:?}: {}", self.source, err);
                Self::load(&self.fallback).unwrap_or_else(|err| {
                    log::warn!("Failed to load fallback skin {:?}: {}", self.fallback, err);
                    Skin::default()
                })
            },
        }
    }

    fn load(source: &SkinSource) -> SkinResult<Skin> {
        match source {
            SkinSource::Builtin(name) => Skin::builtin(name),
            SkinSource::File(path) => Skin::from_file(path),
            SkinSource::Inline(content) => Skin::from_toml(content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkinError;

    #[test]
    fn parse_source() {
        assert_eq!(
            SkinSource::parse(" skins/a.toml "),
            SkinSource::File(PathBuf::from("skins/a.toml"))
        );
        assert_eq!(
            SkinSource::parse("paper"),
            SkinSource::Builtin("paper".to_string())
        );
    }

    #[test]
    fn missing_file_falls_back() {
        let config = SkinConfig::new()
            .with_source(SkinSource::File(PathBuf::from("/nonexistent/skin.toml")))
            .with_fallback(SkinSource::Builtin("paper".to_string()));

        assert!(matches!(
            config.resolve(),
            Err(SkinError::FileNotFound { .. })
        ));
        assert_eq!(config.resolve_or_default().name, "paper");
    }

    #[test]
    fn wrong_extension_is_rejected() {
        assert!(matches!(
            Skin::from_file("skin.json"),
            Err(SkinError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn inline_source() {
        let config = SkinConfig::new().with_source(SkinSource::Inline("padding = 9.0".into()));
        assert_eq!(config.resolve().unwrap().padding, 9.0);
    }
}
