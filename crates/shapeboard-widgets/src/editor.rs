//! Multi-line text input styled for the side panel.

use egui::{Response, RichText, TextEdit, Ui, vec2};

use crate::{sizing, theme};

/// Multi-line text field. When `enabled` is false the field is greyed out
/// and shows `hint` instead of accepting input.
pub fn text_area(ui: &mut Ui, buffer: &mut String, enabled: bool, hint: &str) -> Response {
    let width = ui.available_width();
    ui.add_enabled(
        enabled,
        TextEdit::multiline(buffer)
            .hint_text(RichText::new(hint).color(theme::TEXT_MUTED))
            .desired_rows(sizing::TEXT_AREA_ROWS)
            .min_size(vec2(width, 0.0))
            .desired_width(width),
    )
}
