//! Editor configuration.

use crate::resolver::DEFAULT_MAX_ROUNDS;
use crate::theme::{DEFAULT_MATCH_THRESHOLD, DEFAULT_THEME};
use crate::vfs::USAGE_PATH;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Tailwind CDN build with the forms and typography plugins.
pub const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com?plugins=forms,typography";

/// Web fonts referenced by the built-in themes.
pub const THEME_FONTS: &str = "https://fonts.googleapis.com/css2?family=Inter:wght@100..900&family=JetBrains+Mono:wght@100..800&family=Poppins:wght@100..900&family=Fira+Code:wght@300..700&family=Space+Grotesk:wght@300..700&family=DM+Sans:wght@100..900&family=Lora:wght@400..700&family=IBM+Plex+Mono:wght@100..700&display=swap";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Tunables of the editing core. Every field has a default, so a config file
/// only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub autosave_interval_secs: u64,
    pub saved_indicator_secs: u64,
    pub theme_match_threshold: f64,
    pub max_resolve_rounds: usize,
    pub default_theme: String,
    pub default_active_file: String,
    pub external_resources: Vec<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_interval_secs: 30,
            saved_indicator_secs: 2,
            theme_match_threshold: DEFAULT_MATCH_THRESHOLD,
            max_resolve_rounds: DEFAULT_MAX_ROUNDS,
            default_theme: DEFAULT_THEME.to_string(),
            default_active_file: USAGE_PATH.to_string(),
            external_resources: vec![TAILWIND_CDN.to_string(), THEME_FONTS.to_string()],
        }
    }
}

impl EditorConfig {
    /// Reads a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    pub fn saved_indicator_delay(&self) -> Duration {
        Duration::from_secs(self.saved_indicator_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.autosave_interval(), Duration::from_secs(30));
        assert_eq!(config.saved_indicator_delay(), Duration::from_secs(2));
        assert_eq!(config.default_active_file, "/Preview.tsx");
        assert_eq!(config.external_resources[0], TAILWIND_CDN);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{"autosave_interval_secs": 5}"#).unwrap();
        assert_eq!(config.autosave_interval_secs, 5);
        assert_eq!(config.default_theme, "default");
        assert_eq!(config.max_resolve_rounds, 10);
    }

    #[test]
    fn test_load_missing_file() {
        let err = EditorConfig::load(Path::new("/nonexistent/uiforge.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
