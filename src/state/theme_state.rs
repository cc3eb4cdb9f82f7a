//! Theme preferences of the studio.
//!
//! Two separate choices live here: the dark-mode flag, which drives both the
//! egui visuals and the preview, and the theme most recently picked in the
//! toolbar, which is offered again when the next component opens.

use uiforge::theme::DEFAULT_THEME;

/// Theme state persisted across sessions.
#[derive(Debug, Clone)]
pub struct ThemeState {
    /// Last theme chosen in the toolbar
    preferred_theme: String,
    /// Dark mode for the studio and the preview
    dark: bool,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeState {
    pub fn new() -> Self {
        Self {
            preferred_theme: DEFAULT_THEME.to_string(),
            dark: true,
        }
    }

    /// Creates a theme state with values restored from storage.
    ///
    /// # Arguments
    /// * `preferred_theme` - Theme name last picked in the toolbar
    /// * `dark` - Whether dark mode was on
    pub fn with_preferences(preferred_theme: String, dark: bool) -> Self {
        Self { preferred_theme, dark }
    }

    // ===== Theme Queries =====

    pub fn preferred_theme(&self) -> &str {
        &self.preferred_theme
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    // ===== Theme Mutations =====

    pub fn set_preferred_theme(&mut self, name: &str) {
        self.preferred_theme = name.to_string();
    }

    pub fn set_dark(&mut self, dark: bool) {
        self.dark = dark;
    }
}
