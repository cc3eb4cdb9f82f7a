//! Code editor UI rendering
//!
//! File tabs for the user-facing files and a text editor over the active one.

use crate::app::AppState;
use egui::{Color32, RichText, ScrollArea};

/// Result of user interaction with the code panel
pub enum CodePanelInteraction {
    FileSelected(String),
    TextEdited(String),
}

/// Renders the tab strip and the editor for the active file.
pub fn render_code_panel(ui: &mut egui::Ui, state: &AppState) -> Option<CodePanelInteraction> {
    let mut interaction = None;
    let Some(editor) = state.editor.editor() else {
        return None;
    };
    let session = editor.session();
    let unsaved = editor.reconciler().unsaved_paths(session);

    ui.horizontal_wrapped(|ui| {
        for path in session.files().visible_paths() {
            let name = path.rsplit('/').next().unwrap_or(path);
            let mut text = RichText::new(name).monospace();
            if unsaved.contains(path) {
                text = text.color(Color32::from_rgb(0xf5, 0x9e, 0x0b));
            }
            let selected = session.active_file() == path;
            if ui.selectable_label(selected, text).on_hover_text(path.as_str()).clicked() && !selected {
                interaction = Some(CodePanelInteraction::FileSelected(path.clone()));
            }
        }
    });
    ui.separator();

    let mut text = session.active_text().unwrap_or_default().to_string();
    ScrollArea::both()
        .id_salt("code_scroll_area")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let response = ui.add(
                egui::TextEdit::multiline(&mut text)
                    .code_editor()
                    .interactive(!editor.is_read_only())
                    .desired_width(f32::INFINITY)
                    .desired_rows(32),
            );
            if response.changed() {
                interaction = Some(CodePanelInteraction::TextEdited(text.clone()));
            }
        });

    interaction
}
