//! Theme support for previewed components.
//!
//! A theme is a named set of CSS custom properties split into shared, light and
//! dark groups. The [`ThemeEngine`] turns a theme name into a complete
//! stylesheet and, in the other direction, recognizes which built-in theme an
//! arbitrary stylesheet was generated from.
//!
//! # Examples
//!
//! ```
//! use uiforge::theme::{ThemeEngine, ThemeChoice};
//!
//! let engine = ThemeEngine::builtin();
//! let css = engine.render("slate");
//! assert_eq!(engine.detect(&css), ThemeChoice::Named("slate".to_string()));
//! ```

mod css;
mod detect;
mod render;
mod swatch;

pub use css::{custom_properties, normalize_stylesheet, VarDecl};
pub use swatch::{parse_color, stylesheet_palette, theme_font, ThemeSwatch, Rgb};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name reported by detection when a stylesheet matches no built-in theme.
pub const CUSTOM_THEME: &str = "custom";

/// Theme used whenever a requested name is unknown.
pub const DEFAULT_THEME: &str = "default";

/// Share of extracted palette declarations that must agree for a fuzzy match.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.9;

/// Palette variables every theme must define in its light group.
pub const CORE_PALETTE: [&str; 8] = [
    "background",
    "foreground",
    "primary",
    "secondary",
    "accent",
    "destructive",
    "border",
    "ring",
];

/// Ordered CSS custom properties (name without `--`, value).
pub type CssVars = Vec<(String, String)>;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("invalid theme registry: {0}")]
    Registry(#[from] serde_json::Error),
    #[error("theme '{theme}' does not define core variable '--{variable}'")]
    MissingCoreVariable { theme: String, variable: String },
    #[error("default theme '{0}' is not in the registry")]
    MissingDefault(String),
}

/// A complete theme definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeDefinition {
    pub name: String,
    pub label: String,
    pub shared: CssVars,
    pub light: CssVars,
    pub dark: CssVars,
}

impl ThemeDefinition {
    /// Looks up a light-mode variable.
    pub fn light_var(&self, name: &str) -> Option<&str> {
        lookup(&self.light, name)
    }

    /// Looks up a dark-mode variable, falling back to the light value.
    pub fn dark_var(&self, name: &str) -> Option<&str> {
        lookup(&self.dark, name).or_else(|| self.light_var(name))
    }

    pub fn shared_var(&self, name: &str) -> Option<&str> {
        lookup(&self.shared, name)
    }

    fn validate(&self) -> Result<(), ThemeError> {
        for variable in CORE_PALETTE {
            if self.light_var(variable).is_none() {
                return Err(ThemeError::MissingCoreVariable {
                    theme: self.name.clone(),
                    variable: variable.to_string(),
                });
            }
        }
        Ok(())
    }
}

pub(crate) fn lookup<'a>(vars: &'a CssVars, name: &str) -> Option<&'a str> {
    vars.iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Result of matching a stylesheet against the known themes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeChoice {
    Named(String),
    Custom,
}

impl ThemeChoice {
    pub fn as_str(&self) -> &str {
        match self {
            ThemeChoice::Named(name) => name,
            ThemeChoice::Custom => CUSTOM_THEME,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ThemeChoice::Custom)
    }
}

// ===== Registry file format =====

#[derive(Deserialize)]
struct RegistryFile {
    items: Vec<RegistryItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryItem {
    name: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    css_vars: RegistryVars,
}

#[derive(Deserialize, Default)]
struct RegistryVars {
    #[serde(default)]
    theme: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    light: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    dark: serde_json::Map<String, serde_json::Value>,
}

fn to_vars(map: serde_json::Map<String, serde_json::Value>) -> CssVars {
    map.into_iter()
        .map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, text)
        })
        .collect()
}

/// Parses a style registry document (`{"items": [...]}`) into theme definitions.
///
/// Items whose `type` is present and is not `registry:style` are ignored.
pub fn parse_registry(json: &str) -> Result<Vec<ThemeDefinition>, ThemeError> {
    let file: RegistryFile = serde_json::from_str(json)?;
    Ok(file
        .items
        .into_iter()
        .filter(|item| item.kind.as_deref().map_or(true, |k| k == "registry:style"))
        .map(|item| ThemeDefinition {
            label: item.label.unwrap_or_else(|| item.name.clone()),
            name: item.name,
            shared: to_vars(item.css_vars.theme),
            light: to_vars(item.css_vars.light),
            dark: to_vars(item.css_vars.dark),
        })
        .collect())
}

static BUILTIN_THEMES: Lazy<Vec<ThemeDefinition>> = Lazy::new(|| {
    match parse_registry(include_str!("registry.json")) {
        Ok(themes) => themes,
        Err(e) => {
            log::error!("Built-in theme registry is unreadable: {}", e);
            vec![fallback_default()]
        }
    }
});

/// Neutral palette used only if the embedded registry cannot be read.
fn fallback_default() -> ThemeDefinition {
    let light = [
        ("background", "0 0% 100%"),
        ("foreground", "0 0% 4%"),
        ("primary", "0 0% 9%"),
        ("secondary", "0 0% 96%"),
        ("accent", "0 0% 96%"),
        ("destructive", "0 84% 60%"),
        ("border", "0 0% 90%"),
        ("ring", "0 0% 4%"),
    ];
    ThemeDefinition {
        name: DEFAULT_THEME.to_string(),
        label: "Default".to_string(),
        shared: vec![("radius".to_string(), "0.5rem".to_string())],
        light: light
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        dark: Vec::new(),
    }
}

/// Renders and recognizes theme stylesheets.
///
/// Constructed explicitly and passed to whoever needs it; there is no global
/// "current theme".
#[derive(Debug, Clone)]
pub struct ThemeEngine {
    themes: Vec<ThemeDefinition>,
    default_index: usize,
    match_threshold: f64,
}

impl ThemeEngine {
    /// Creates an engine over the given themes. Every theme must carry the core
    /// palette and `default_theme` must be one of them.
    pub fn new(themes: Vec<ThemeDefinition>, default_theme: &str) -> Result<Self, ThemeError> {
        for theme in &themes {
            theme.validate()?;
        }
        let default_index = themes
            .iter()
            .position(|t| t.name == default_theme)
            .ok_or_else(|| ThemeError::MissingDefault(default_theme.to_string()))?;
        Ok(Self {
            themes,
            default_index,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
        })
    }

    /// Engine over the themes embedded in the crate.
    pub fn builtin() -> Self {
        let themes = BUILTIN_THEMES.clone();
        let default_index = themes
            .iter()
            .position(|t| t.name == DEFAULT_THEME)
            .unwrap_or(0);
        Self {
            themes,
            default_index,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    /// Engine over a registry document.
    pub fn from_registry_json(json: &str, default_theme: &str) -> Result<Self, ThemeError> {
        Self::new(parse_registry(json)?, default_theme)
    }

    /// Overrides the fuzzy-match threshold (clamped to `0.0..=1.0`).
    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Selects a different default among the loaded themes. Unknown names are ignored.
    pub fn with_default_theme(mut self, name: &str) -> Self {
        match self.themes.iter().position(|t| t.name == name) {
            Some(index) => self.default_index = index,
            None => log::warn!("Default theme '{}' not found, keeping '{}'", name, self.default_theme()),
        }
        self
    }

    pub fn match_threshold(&self) -> f64 {
        self.match_threshold
    }

    pub fn default_theme(&self) -> &str {
        &self.themes[self.default_index].name
    }

    pub fn get(&self, name: &str) -> Option<&ThemeDefinition> {
        self.themes.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Themes in registry order.
    pub fn themes(&self) -> &[ThemeDefinition] {
        &self.themes
    }

    /// Theme names in registry order.
    pub fn names(&self) -> Vec<&str> {
        self.themes.iter().map(|t| t.name.as_str()).collect()
    }

    /// Resolves a name to a definition, substituting the default for unknown names.
    pub fn resolve(&self, name: &str) -> &ThemeDefinition {
        match self.get(name) {
            Some(theme) => theme,
            None => {
                log::warn!(
                    "Theme '{}' not found in registry. Using '{}'.",
                    name,
                    self.default_theme()
                );
                &self.themes[self.default_index]
            }
        }
    }

    /// Full stylesheet for a theme. Never fails: unknown names render the default.
    pub fn render(&self, name: &str) -> String {
        render::render_stylesheet(self.resolve(name))
    }

    /// Stylesheet of the default theme.
    pub fn default_stylesheet(&self) -> String {
        render::render_stylesheet(&self.themes[self.default_index])
    }

    /// Identifies the theme a stylesheet was generated from.
    ///
    /// Blank input maps to the default theme.
    pub fn detect(&self, stylesheet: &str) -> ThemeChoice {
        detect::detect_theme(self, stylesheet)
    }

    /// Colour preview for a theme, or the fixed custom swatch for unknown names.
    pub fn swatch(&self, name: &str) -> ThemeSwatch {
        match self.get(name) {
            Some(theme) => ThemeSwatch::from_theme(theme),
            None => ThemeSwatch::custom(),
        }
    }
}

impl Default for ThemeEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_is_valid() {
        let themes = parse_registry(include_str!("registry.json")).unwrap();
        assert!(themes.len() >= 5);
        let engine = ThemeEngine::new(themes, DEFAULT_THEME).unwrap();
        assert_eq!(engine.default_theme(), DEFAULT_THEME);
    }

    #[test]
    fn test_registry_preserves_variable_order() {
        let engine = ThemeEngine::builtin();
        let theme = engine.get("default").unwrap();
        assert_eq!(theme.light[0].0, "background");
        assert_eq!(theme.light[1].0, "foreground");
        assert_eq!(theme.shared[0].0, "radius");
    }

    #[test]
    fn test_rejects_theme_without_core_palette() {
        let mut theme = fallback_default();
        theme.light.retain(|(k, _)| k != "ring");
        let err = ThemeEngine::new(vec![theme], DEFAULT_THEME).unwrap_err();
        assert!(matches!(err, ThemeError::MissingCoreVariable { .. }));
    }

    #[test]
    fn test_rejects_missing_default() {
        let err = ThemeEngine::new(vec![fallback_default()], "ocean").unwrap_err();
        assert!(matches!(err, ThemeError::MissingDefault(_)));
    }

    #[test]
    fn test_dark_var_falls_back_to_light() {
        let engine = ThemeEngine::builtin();
        let mono = engine.get("mono").unwrap();
        assert_eq!(mono.dark_var("background"), Some("#0a0a0a"));
        assert_eq!(mono.dark_var("accent"), Some("#d4d4d4"));
    }

    #[test]
    fn test_unknown_theme_renders_default() {
        let engine = ThemeEngine::builtin();
        assert_eq!(engine.render("nonexistent-theme"), engine.render("default"));
    }

    #[test]
    fn test_threshold_is_clamped() {
        let engine = ThemeEngine::builtin().with_match_threshold(1.7);
        assert_eq!(engine.match_threshold(), 1.0);
    }
}
