//! Panel components: side panel frame and header.

use egui::{Color32, CornerRadius, Frame, Margin, RichText, Stroke, Ui};

use crate::{sizing, theme};

/// Create a standard floating panel frame.
pub fn panel_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(sizing::PANEL_PADDING))
}

/// Panel title with an optional muted status on the right.
pub fn panel_header(ui: &mut Ui, title: &str, status: Option<&str>) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(title).strong().size(13.0).color(theme::TEXT));
        if let Some(status) = status {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(status).size(11.0).color(theme::TEXT_MUTED));
            });
        }
    });
    ui.add_space(4.0);
}
