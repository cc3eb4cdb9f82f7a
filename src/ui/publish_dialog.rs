//! Publish dialog UI rendering

use crate::app::AppState;

/// Result of user interaction with the publish dialog
pub enum PublishInteraction {
    Confirmed,
    Cancelled,
}

/// Renders the publish form as a floating window while it is open.
pub fn render_publish_dialog(ctx: &egui::Context, state: &mut AppState) -> Option<PublishInteraction> {
    if !state.catalog.publish_open() {
        return None;
    }
    let mut interaction = None;

    egui::Window::new("Publish to catalog")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            let request = state.catalog.publish_request_mut();
            egui::Grid::new("publish_form").num_columns(2).show(ui, |ui| {
                ui.label("Name");
                ui.text_edit_singleline(&mut request.name);
                ui.end_row();
                ui.label("Category");
                ui.text_edit_singleline(&mut request.category);
                ui.end_row();
                ui.label("Description");
                ui.text_edit_multiline(&mut request.description);
                ui.end_row();
            });
            let slug = uiforge::catalog::slugify(&request.name);
            ui.label(egui::RichText::new(format!("Slug: {}", slug)).monospace().weak());

            ui.horizontal(|ui| {
                if ui.button("Publish").clicked() {
                    interaction = Some(PublishInteraction::Confirmed);
                }
                if ui.button("Cancel").clicked() {
                    interaction = Some(PublishInteraction::Cancelled);
                }
            });
        });

    interaction
}
