//! Status bar UI rendering

use crate::app::AppState;
use crate::io::AsyncSaver;
use egui::{Color32, RichText};

/// Renders the bottom status bar: messages, the open file and save state.
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Reference to application state
/// * `saver` - Background saver, queried for an in-flight write
pub fn render_status_bar(ui: &mut egui::Ui, state: &AppState, saver: &AsyncSaver) {
    ui.horizontal(|ui| {
        if let Some(err) = &state.error_message {
            ui.colored_label(Color32::from_rgb(0xef, 0x44, 0x44), err);
            ui.label(RichText::new("|").strong());
        } else if let Some(info) = &state.info_message {
            ui.label(info);
            ui.label(RichText::new("|").strong());
        }

        match state.editor.editor() {
            Some(editor) => {
                let session = editor.session();
                ui.label(RichText::new(session.active_file()).monospace());
                ui.label(RichText::new("|").strong());
                ui.label(format!(
                    "Theme: {} | {} files | {} dependencies",
                    editor.theme().as_str(),
                    session.files().len(),
                    session.dependencies().len()
                ));
                let unsaved = editor.reconciler().unsaved_paths(session);
                if !unsaved.is_empty() {
                    ui.label(RichText::new("|").strong());
                    ui.label(
                        RichText::new(format!("Unsaved: {}", unsaved.join(", ")))
                            .color(Color32::from_rgb(0xf5, 0x9e, 0x0b)),
                    );
                }
                if let Some(message) = editor.status_message() {
                    ui.label(RichText::new("|").strong());
                    ui.colored_label(Color32::from_rgb(0xef, 0x44, 0x44), message);
                }
            }
            None => {
                ui.label(RichText::new("No component open").strong());
            }
        }

        if saver.is_saving() {
            let ticket = saver.current_ticket().unwrap_or_default();
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.spinner();
                ui.label(RichText::new(format!("writing (ticket {})", ticket)).small().weak());
            });
        }
    });
}
