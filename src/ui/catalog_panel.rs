//! Catalog side panel UI rendering
//!
//! Lists the public catalog, the user's own components and the trash.

use crate::app::AppState;
use crate::ui::swatch;
use egui::{Color32, RichText, ScrollArea};
use uiforge::ComponentRecord;

/// Result of user interaction with the catalog panel
pub enum CatalogInteraction {
    OpenRequested(String),
    ForkRequested(String),
    RestoreRequested(String),
    RefreshRequested,
}

/// Renders the catalog side panel.
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Application state (the filter text is edited in place)
pub fn render_catalog_panel(ui: &mut egui::Ui, state: &mut AppState) -> Option<CatalogInteraction> {
    let mut interaction = None;

    ui.horizontal(|ui| {
        ui.heading("Catalog");
        if ui.small_button("⟳").on_hover_text("Refresh").clicked() {
            interaction = Some(CatalogInteraction::RefreshRequested);
        }
    });
    ui.add(egui::TextEdit::singleline(state.catalog.filter_mut()).hint_text("Filter..."));
    ui.separator();

    let open_id = state.editor.component_id().map(str::to_string);

    ScrollArea::vertical()
        .id_salt("catalog_scroll_area")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let mut category: Option<&str> = None;
            for record in state.catalog.filtered() {
                let this_category = record.category.as_deref().unwrap_or("Other");
                if category != Some(this_category) {
                    ui.label(RichText::new(this_category).small().weak());
                    category = Some(this_category);
                }
                ui.horizontal(|ui| {
                    let selected = open_id.as_deref() == Some(record.id.as_str());
                    if entry_label(ui, state, record, selected).clicked() {
                        interaction = Some(CatalogInteraction::OpenRequested(record.id.clone()));
                    }
                    if ui.small_button("Fork").clicked() {
                        interaction = Some(CatalogInteraction::ForkRequested(record.id.clone()));
                    }
                });
            }

            ui.add_space(8.0);
            ui.label(RichText::new("My components").strong());
            if state.catalog.owned().is_empty() {
                ui.colored_label(Color32::GRAY, "(none yet, fork an entry or create one)");
            }
            for record in state.catalog.owned() {
                let selected = open_id.as_deref() == Some(record.id.as_str());
                if entry_label(ui, state, record, selected).clicked() {
                    interaction = Some(CatalogInteraction::OpenRequested(record.id.clone()));
                }
            }

            if !state.catalog.trash().is_empty() {
                ui.add_space(8.0);
                ui.collapsing(format!("Trash ({})", state.catalog.trash().len()), |ui| {
                    for record in state.catalog.trash() {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(&record.name).strikethrough());
                            if ui.small_button("Restore").clicked() {
                                interaction = Some(CatalogInteraction::RestoreRequested(record.id.clone()));
                            }
                        });
                    }
                });
            }
        });

    interaction
}

/// One clickable row: palette chips of the record's detected theme and its name.
fn entry_label(ui: &mut egui::Ui, state: &AppState, record: &ComponentRecord, selected: bool) -> egui::Response {
    ui.horizontal(|ui| {
        let theme = match record.stylesheet.as_deref() {
            Some(css) if !css.trim().is_empty() => state.engine.detect(css),
            _ => uiforge::ThemeChoice::Named(state.engine.default_theme().to_string()),
        };
        let swatch = state.engine.swatch(theme.as_str());
        swatch::chip(ui, swatch.primary, 8.0);
        let response = ui.selectable_label(selected, record.name.as_str());
        if record.description.is_empty() {
            response
        } else {
            response.on_hover_text(record.description.as_str())
        }
    })
    .inner
}
