//! Small colour chips used to preview palettes.

use egui::{Color32, Sense, Vec2};
use uiforge::theme::Rgb;

pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Paints one round chip of `diameter` points.
pub fn chip(ui: &mut egui::Ui, rgb: Rgb, diameter: f32) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(Vec2::splat(diameter), Sense::hover());
    ui.painter()
        .circle_filled(rect.center(), diameter / 2.0, to_color32(rgb));
    response
}

/// Paints a row of chips without spacing between them.
pub fn chip_row(ui: &mut egui::Ui, colors: &[Rgb], diameter: f32) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 2.0;
        for rgb in colors {
            chip(ui, *rgb, diameter);
        }
    });
}
