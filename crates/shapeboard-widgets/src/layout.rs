//! Layout helpers: separators, section labels, key hints.

use egui::{Color32, CornerRadius, Frame, Margin, RichText, Stroke, Ui};

use crate::{sizing, theme};

/// Draw a horizontal separator line.
pub fn separator(ui: &mut Ui) {
    let rect = ui.available_rect_before_wrap();
    let y = rect.top() + 4.0;
    ui.painter().line_segment(
        [
            egui::Pos2::new(rect.left(), y),
            egui::Pos2::new(rect.right(), y),
        ],
        Stroke::new(1.0, Color32::from_gray(230)),
    );
    ui.add_space(8.0);
}

/// Draw a section label (small, muted text).
pub fn section_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(10.0).color(theme::TEXT_MUTED));
}

/// One row of the shortcut list: a key badge followed by a description.
pub fn key_hint(ui: &mut Ui, keys: &str, description: &str) {
    ui.horizontal(|ui| {
        Frame::new()
            .fill(theme::HOVER_BG)
            .stroke(Stroke::new(1.0, theme::BORDER))
            .corner_radius(CornerRadius::same(sizing::CORNER_RADIUS))
            .inner_margin(Margin::symmetric(4, 1))
            .show(ui, |ui| {
                ui.label(RichText::new(keys).monospace().size(10.0).color(theme::TEXT));
            });
        ui.label(RichText::new(description).size(11.0).color(theme::TEXT_MUTED));
    });
}
