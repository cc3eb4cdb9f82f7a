//! Toolbar UI rendering
//!
//! Top bar with the component actions, the theme selector and the save
//! status indicator.

use crate::app::AppState;
use crate::ui::swatch;
use egui::{Color32, RichText};
use std::path::PathBuf;
use uiforge::theme::theme_font;
use uiforge::{SaveStatus, ThemeChoice};

/// Result of user interaction with the toolbar
pub enum ToolbarInteraction {
    NewComponent,
    SaveRequested,
    ResetRequested,
    UndoRequested,
    ReloadRequested,
    ExportRequested(PathBuf),
    ThemeSelected(String),
    DarkModeToggled(bool),
    PublishRequested,
    TrashRequested,
}

/// Renders the toolbar.
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Application state (catalog visibility is toggled in place)
///
/// # Returns
/// * `Option<ToolbarInteraction>` - User interaction result
pub fn render_toolbar(ui: &mut egui::Ui, state: &mut AppState) -> Option<ToolbarInteraction> {
    let mut interaction = None;

    ui.horizontal(|ui| {
        ui.toggle_value(state.layout.show_catalog_mut(), "☰ Catalog");
        ui.separator();

        if ui.button("➕ New").clicked() {
            interaction = Some(ToolbarInteraction::NewComponent);
        }

        let Some(editor) = state.editor.editor() else {
            ui.label(RichText::new("Open a component from the catalog").weak());
            return;
        };
        let writable = !editor.is_read_only();
        let dirty = editor.has_unsaved_changes();

        if ui
            .add_enabled(writable && !editor.reconciler().is_saving(), egui::Button::new("💾 Save"))
            .on_hover_text("Ctrl+S")
            .clicked()
        {
            interaction = Some(ToolbarInteraction::SaveRequested);
        }
        if ui.add_enabled(dirty, egui::Button::new("↺ Reset")).clicked() {
            interaction = Some(ToolbarInteraction::ResetRequested);
        }
        let active = editor.session().active_file();
        if ui
            .add_enabled(editor.session().can_undo(active), egui::Button::new("↶ Undo"))
            .clicked()
        {
            interaction = Some(ToolbarInteraction::UndoRequested);
        }
        if ui
            .button("⟳ Reload")
            .on_hover_text("Re-read the stored component")
            .clicked()
        {
            interaction = Some(ToolbarInteraction::ReloadRequested);
        }
        if ui.button("📦 Export").clicked() {
            if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                interaction = Some(ToolbarInteraction::ExportRequested(dir));
            }
        }
        if ui.add_enabled(writable, egui::Button::new("🌐 Publish")).clicked() {
            interaction = Some(ToolbarInteraction::PublishRequested);
        }
        if ui.add_enabled(writable, egui::Button::new("🗑 Trash")).clicked() {
            interaction = Some(ToolbarInteraction::TrashRequested);
        }

        ui.separator();
        render_save_indicator(ui, editor.status(), dirty, editor.is_read_only());

        // Push theme controls to the right
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let mut dark = state.theme.is_dark();
            if ui.checkbox(&mut dark, "Dark").changed() {
                interaction = Some(ToolbarInteraction::DarkModeToggled(dark));
            }

            let selected = editor.theme().clone();
            let selected_text = match &selected {
                ThemeChoice::Named(name) => state
                    .engine
                    .get(name)
                    .map_or(name.clone(), |t| t.label.clone()),
                ThemeChoice::Custom => "Custom".to_string(),
            };
            egui::ComboBox::from_id_salt("theme_selector")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for theme in state.engine.themes() {
                        ui.horizontal(|ui| {
                            swatch::chip_row(ui, &state.engine.swatch(&theme.name).colors(), 10.0);
                            let is_selected = selected.as_str() == theme.name;
                            let response = ui.selectable_label(is_selected, theme.label.as_str());
                            let response = match theme_font(theme) {
                                Some(font) => response.on_hover_text(font),
                                None => response,
                            };
                            if response.clicked() && !is_selected {
                                interaction = Some(ToolbarInteraction::ThemeSelected(theme.name.clone()));
                            }
                        });
                    }
                    if selected.is_custom() {
                        ui.horizontal(|ui| {
                            swatch::chip_row(ui, &uiforge::ThemeSwatch::custom().colors(), 10.0);
                            let _ = ui.selectable_label(true, "Custom");
                        });
                    }
                });
            ui.label("Theme:");
        });
    });

    interaction
}

fn render_save_indicator(ui: &mut egui::Ui, status: SaveStatus, dirty: bool, read_only: bool) {
    if read_only {
        ui.label(RichText::new("Read-only").weak());
        return;
    }
    match status {
        SaveStatus::Saving => {
            ui.spinner();
            ui.label(status.label());
        }
        SaveStatus::Saved => {
            ui.colored_label(Color32::from_rgb(0x22, 0xc5, 0x5e), format!("✔ {}", status.label()));
        }
        SaveStatus::Error => {
            ui.colored_label(Color32::from_rgb(0xef, 0x44, 0x44), status.label());
        }
        SaveStatus::Idle if dirty => {
            ui.label(RichText::new("● Unsaved changes").color(Color32::from_rgb(0xf5, 0x9e, 0x0b)));
        }
        SaveStatus::Idle => {}
    }
}
