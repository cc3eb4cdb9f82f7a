//! Theme management and persistence coordination.
//!
//! Restores the theme preferences at startup, writes them back on shutdown and
//! tints the studio's own visuals with the colors of the preferred theme.

use crate::app::{AppState, SettingsCoordinator};
use crate::state::ThemeState;
use egui::Color32;

const THEME_KEY: &str = "preview_theme";
const DARK_MODE_KEY: &str = "dark_mode";

/// Coordinates theme persistence and application.
pub struct ThemeCoordinator;

impl ThemeCoordinator {
    /// Loads theme preferences during startup. Unknown theme names fall back to
    /// the engine's default theme.
    pub fn load_theme_from_storage(
        storage: Option<&dyn eframe::Storage>,
        engine: &uiforge::ThemeEngine,
    ) -> ThemeState {
        let default = ThemeState::new();
        let name: String =
            SettingsCoordinator::load_setting_or(storage, THEME_KEY, default.preferred_theme().to_string());
        let dark = SettingsCoordinator::load_setting_or(storage, DARK_MODE_KEY, default.is_dark());
        let name = if engine.contains(&name) {
            name
        } else {
            engine.default_theme().to_string()
        };
        ThemeState::with_preferences(name, dark)
    }

    /// Saves theme preferences. Called on shutdown and periodically by eframe.
    pub fn save_theme_to_storage(storage: &mut dyn eframe::Storage, theme: &ThemeState) {
        SettingsCoordinator::save_setting(storage, THEME_KEY, theme.preferred_theme());
        SettingsCoordinator::save_setting(storage, DARK_MODE_KEY, &theme.is_dark());
    }

    /// Applies the current theme to the egui context. Called every frame.
    pub fn apply_current_theme(ctx: &egui::Context, state: &AppState) {
        let mut visuals = if state.theme.is_dark() {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };

        let swatch = state.engine.swatch(state.theme.preferred_theme());
        let [r, g, b] = swatch.primary;
        visuals.selection.bg_fill = Color32::from_rgb(r, g, b);
        let [r, g, b] = swatch.accent;
        visuals.hyperlink_color = Color32::from_rgb(r, g, b);

        ctx.set_visuals(visuals);
    }
}
