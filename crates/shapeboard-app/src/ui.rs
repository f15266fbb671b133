//! egui side panel: text editing for the edited shape plus a shortcut list.

use egui::{Align2, Context, Vec2};
use shapeboard_core::text_panel::TextEditPanel;
use shapeboard_widgets::{key_hint, panel_frame, panel_header, section_label, separator, text_area};

use crate::shortcuts::ShortcutRegistry;

/// Actions the side panel asks the application to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// The text field changed; carries the full new text.
    EditText(String),
}

/// UI state that persists across frames.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Text-edit panel bound to the edited shape.
    pub panel: TextEditPanel,
    /// Panel width in logical pixels.
    pub panel_width: f32,
    /// Whether the shortcut list is expanded.
    pub show_shortcuts: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            panel: TextEditPanel::new(),
            panel_width: 240.0,
            show_shortcuts: true,
        }
    }
}

/// Whether a pointer press belongs to egui rather than the canvas.
///
/// Keyboard focus is ignored; the text field keeps it while editing.
pub fn pointer_blocked(ctx: &Context, consumed: bool) -> bool {
    consumed || ctx.is_pointer_over_area()
}

/// Render the UI and return any triggered action.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("text_panel"))
        .anchor(Align2::RIGHT_TOP, Vec2::new(-12.0, 12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(ui_state.panel_width);

                let enabled = ui_state.panel.is_enabled();
                let status = if enabled { "editing" } else { "idle" };
                panel_header(ui, "Text", Some(status));

                let hint = if enabled {
                    "Type to change the text"
                } else {
                    "Double-click a text shape to edit it"
                };
                let response = text_area(ui, ui_state.panel.buffer_mut(), enabled, hint);
                if enabled && response.changed() {
                    action = Some(UiAction::EditText(ui_state.panel.text().to_owned()));
                }

                separator(ui);
                ui.horizontal(|ui| {
                    section_label(ui, "SHORTCUTS");
                    let toggle = if ui_state.show_shortcuts { "hide" } else { "show" };
                    if ui.small_button(toggle).clicked() {
                        ui_state.show_shortcuts = !ui_state.show_shortcuts;
                    }
                });
                if ui_state.show_shortcuts {
                    for shortcut in ShortcutRegistry::all() {
                        key_hint(ui, &shortcut.format(), shortcut.description);
                    }
                }
            });
        });

    action
}
