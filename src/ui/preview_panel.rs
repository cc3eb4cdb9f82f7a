//! Preview panel UI rendering
//!
//! Summarizes what the embedded preview is running: the stylesheet palette,
//! the mounted files and the dependencies handed to the bundler.

use crate::app::AppState;
use crate::ui::swatch;
use egui::{Color32, RichText, ScrollArea};
use uiforge::theme::stylesheet_palette;

/// Renders the preview summary. Read-only; produces no interactions.
pub fn render_preview_panel(ui: &mut egui::Ui, state: &mut AppState) {
    let Some(editor) = state.editor.editor() else {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new("Nothing mounted").weak());
        });
        return;
    };
    let surface = editor.session().surface();
    let Some(mounted) = surface.mounted() else {
        ui.label(RichText::new("Preview is not mounted").weak());
        return;
    };
    let dark = editor.is_dark();

    ui.horizontal(|ui| {
        ui.heading(&editor.props().display_name);
        ui.label(
            RichText::new(format!(
                "generation {} · {} mounts",
                mounted.generation,
                surface.mount_count()
            ))
            .small()
            .weak(),
        );
    });
    if !editor.props().description.is_empty() {
        ui.label(&editor.props().description);
    }
    ui.separator();

    let mut show_hidden = state.layout.show_hidden_files();
    ScrollArea::vertical()
        .id_salt("preview_scroll_area")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.label(RichText::new(format!("Palette ({})", if dark { "dark" } else { "light" })).strong());
            let palette = surface
                .stylesheet()
                .map(|css| stylesheet_palette(css, dark))
                .unwrap_or_default();
            if palette.is_empty() {
                ui.colored_label(Color32::GRAY, "(stylesheet defines no colours)");
            }
            egui::Grid::new("palette_grid").num_columns(2).show(ui, |ui| {
                for (name, rgb) in &palette {
                    swatch::chip(ui, *rgb, 14.0);
                    ui.label(RichText::new(format!("--{}", name)).monospace());
                    ui.end_row();
                }
            });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new("Files").strong());
                ui.checkbox(&mut show_hidden, "show hidden");
            });
            for (path, file) in mounted.files.iter() {
                if file.hidden && !show_hidden {
                    continue;
                }
                let mut text = RichText::new(path).monospace();
                if file.hidden {
                    text = text.weak();
                }
                if path == mounted.active_file {
                    text = text.strong();
                }
                ui.label(text);
            }

            let recent: Vec<&str> = surface.recent_changes().collect();
            if !recent.is_empty() {
                ui.add_space(8.0);
                let ago = surface
                    .last_change_at()
                    .map(|at| format!(" ({:.0}s ago)", at.elapsed().as_secs_f32()))
                    .unwrap_or_default();
                ui.label(RichText::new(format!("Recently updated{}", ago)).strong());
                for path in recent {
                    ui.label(RichText::new(path).monospace().small());
                }
            }

            ui.add_space(8.0);
            ui.label(RichText::new("Dependencies").strong());
            egui::Grid::new("deps_grid").num_columns(2).show(ui, |ui| {
                for (name, version) in &mounted.dependencies {
                    ui.label(RichText::new(name).monospace());
                    ui.label(RichText::new(version).monospace().weak());
                    ui.end_row();
                }
            });

            if !editor.registry().is_empty() {
                ui.add_space(8.0);
                ui.label(RichText::new("Registry components").strong());
                for entry in editor.registry().iter() {
                    ui.label(RichText::new(&entry.id).monospace());
                }
            }
        });

    *state.layout.show_hidden_files_mut() = show_hidden;
}
