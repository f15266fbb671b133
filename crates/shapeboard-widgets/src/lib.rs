//! Reusable egui widget components for the Shapeboard side panel.
//!
//! - **Panel**: floating panel frame and header
//! - **Editor**: styled multi-line text field
//! - **Layout**: section labels, separators, key hints

pub mod editor;
pub mod layout;
pub mod panel;

pub use editor::text_area;
pub use layout::{key_hint, section_label, separator};
pub use panel::{panel_frame, panel_header};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
    /// Panel inner margin
    pub const PANEL_PADDING: i8 = 10;
    /// Visible rows of the text area
    pub const TEXT_AREA_ROWS: usize = 6;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(245, 245, 245);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
}
