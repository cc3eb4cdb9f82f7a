//! Panel orchestration and layout management.
//!
//! Lays out the toolbar, catalog, code editor, preview summary, status bar
//! and the publish dialog, and funnels their interactions into a single
//! [`PanelInteraction`] for the coordinator.

use crate::app::AppState;
use crate::io::AsyncSaver;
use crate::ui::{catalog_panel, code_panel, preview_panel, publish_dialog, status_bar, toolbar};
use std::path::PathBuf;

/// Result of panel interactions that need to be handled by the studio coordinator.
pub enum PanelInteraction {
    NewComponent,
    OpenRequested(String),
    ForkRequested(String),
    RestoreRequested(String),
    RefreshRequested,
    FileSelected(String),
    TextEdited(String),
    SaveRequested,
    ResetRequested,
    UndoRequested,
    ReloadRequested,
    ExportRequested(PathBuf),
    ThemeSelected(String),
    DarkModeToggled(bool),
    PublishRequested,
    PublishConfirmed,
    PublishCancelled,
    TrashRequested,
}

impl From<toolbar::ToolbarInteraction> for PanelInteraction {
    fn from(interaction: toolbar::ToolbarInteraction) -> Self {
        use toolbar::ToolbarInteraction as T;
        match interaction {
            T::NewComponent => PanelInteraction::NewComponent,
            T::SaveRequested => PanelInteraction::SaveRequested,
            T::ResetRequested => PanelInteraction::ResetRequested,
            T::UndoRequested => PanelInteraction::UndoRequested,
            T::ReloadRequested => PanelInteraction::ReloadRequested,
            T::ExportRequested(dir) => PanelInteraction::ExportRequested(dir),
            T::ThemeSelected(name) => PanelInteraction::ThemeSelected(name),
            T::DarkModeToggled(dark) => PanelInteraction::DarkModeToggled(dark),
            T::PublishRequested => PanelInteraction::PublishRequested,
            T::TrashRequested => PanelInteraction::TrashRequested,
        }
    }
}

impl From<catalog_panel::CatalogInteraction> for PanelInteraction {
    fn from(interaction: catalog_panel::CatalogInteraction) -> Self {
        use catalog_panel::CatalogInteraction as C;
        match interaction {
            C::OpenRequested(id) => PanelInteraction::OpenRequested(id),
            C::ForkRequested(id) => PanelInteraction::ForkRequested(id),
            C::RestoreRequested(id) => PanelInteraction::RestoreRequested(id),
            C::RefreshRequested => PanelInteraction::RefreshRequested,
        }
    }
}

impl From<code_panel::CodePanelInteraction> for PanelInteraction {
    fn from(interaction: code_panel::CodePanelInteraction) -> Self {
        match interaction {
            code_panel::CodePanelInteraction::FileSelected(path) => PanelInteraction::FileSelected(path),
            code_panel::CodePanelInteraction::TextEdited(text) => PanelInteraction::TextEdited(text),
        }
    }
}

impl From<publish_dialog::PublishInteraction> for PanelInteraction {
    fn from(interaction: publish_dialog::PublishInteraction) -> Self {
        match interaction {
            publish_dialog::PublishInteraction::Confirmed => PanelInteraction::PublishConfirmed,
            publish_dialog::PublishInteraction::Cancelled => PanelInteraction::PublishCancelled,
        }
    }
}

/// Manages the layout and rendering of all UI panels.
pub struct PanelManager;

impl PanelManager {
    /// Renders all panels in the application window.
    ///
    /// Called from `eframe::App::update()`. At most one interaction is
    /// reported per frame; the last panel to produce one wins.
    pub fn render_all_panels(
        ctx: &egui::Context,
        state: &mut AppState,
        saver: &AsyncSaver,
    ) -> Option<PanelInteraction> {
        let mut interaction: Option<PanelInteraction> = None;

        let save_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
        if ctx.input_mut(|i| i.consume_shortcut(&save_shortcut)) {
            interaction = Some(PanelInteraction::SaveRequested);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            if let Some(toolbar_interaction) = toolbar::render_toolbar(ui, state) {
                interaction = Some(toolbar_interaction.into());
            }
        });

        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            status_bar::render_status_bar(ui, state, saver);
        });

        if state.layout.show_catalog() {
            let response = egui::SidePanel::left("catalog_panel")
                .default_width(state.layout.catalog_width())
                .resizable(true)
                .show(ctx, |ui| catalog_panel::render_catalog_panel(ui, state));
            state.layout.set_catalog_width(response.response.rect.width());
            if let Some(catalog_interaction) = response.inner {
                interaction = Some(catalog_interaction.into());
            }
        }

        let content_width = ctx.content_rect().width();
        let preview = egui::SidePanel::right("preview_panel")
            .default_width(content_width * (1.0 - state.layout.code_split_ratio()))
            .resizable(true)
            .show(ctx, |ui| preview_panel::render_preview_panel(ui, state));
        if content_width > 0.0 {
            state
                .layout
                .set_code_split_ratio(1.0 - preview.response.rect.width() / content_width);
        }

        let code_frame = egui::Frame::default()
            .inner_margin(egui::Margin::same(4))
            .fill(ctx.style().visuals.panel_fill);
        egui::CentralPanel::default().frame(code_frame).show(ctx, |ui| {
            if let Some(code_interaction) = code_panel::render_code_panel(ui, state) {
                interaction = Some(code_interaction.into());
            }
        });

        if let Some(dialog_interaction) = publish_dialog::render_publish_dialog(ctx, state) {
            interaction = Some(dialog_interaction.into());
        }

        interaction
    }
}
