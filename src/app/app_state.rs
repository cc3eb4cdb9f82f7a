//! Centralized application state for the studio.
//!
//! Composed of focused state components so panels can borrow one aspect
//! mutably while reading another.

use crate::state::{CatalogState, EditorState, LayoutState, ThemeState};
use uiforge::{EditorConfig, ThemeEngine};

/// Main application state composed of focused state components.
pub struct AppState {
    // ===== Shared Services =====
    /// Theme registry used by every editor the studio opens
    pub engine: ThemeEngine,

    /// Editing-core tunables
    pub config: EditorConfig,

    // ===== Focused State Components =====
    /// The open component editor
    pub editor: EditorState,

    /// Catalog listing, trash and publish form
    pub catalog: CatalogState,

    /// Theme preferences
    pub theme: ThemeState,

    /// Panel sizes and visibility
    pub layout: LayoutState,

    // ===== Top-Level State =====
    /// Current error message to display (if any)
    pub error_message: Option<String>,

    /// Last informational message (export path, publish slug)
    pub info_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl AppState {
    /// Creates a state whose theme engine follows `config`.
    pub fn new(config: EditorConfig) -> Self {
        let engine = ThemeEngine::builtin()
            .with_match_threshold(config.theme_match_threshold)
            .with_default_theme(&config.default_theme);
        Self {
            engine,
            config,
            editor: EditorState::new(),
            catalog: CatalogState::new(),
            theme: ThemeState::new(),
            layout: LayoutState::new(),
            error_message: None,
            info_message: None,
        }
    }

    /// Creates a state with theme and layout restored from storage.
    pub fn with_preferences(config: EditorConfig, theme: ThemeState, layout: LayoutState) -> Self {
        Self {
            theme,
            layout,
            ..Self::new(config)
        }
    }

    // ===== High-Level Coordination Methods =====

    pub fn set_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("{}", message);
        self.error_message = Some(message);
        self.info_message = None;
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);
        self.info_message = Some(message);
        self.error_message = None;
    }

    pub fn clear_messages(&mut self) {
        self.error_message = None;
        self.info_message = None;
    }
}
