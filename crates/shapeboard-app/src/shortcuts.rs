//! Keyboard shortcut registry and documentation.

/// A keyboard or pointer shortcut definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub key: &'static str,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, shift: bool, description: &'static str) -> Self {
        Self {
            key,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Shift+Rotate").
    pub fn format(&self) -> String {
        if self.shift {
            format!("Shift+{}", self.key)
        } else {
            self.key.to_string()
        }
    }
}

/// Registry of all shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Escape", false, "Clear selection"),
            Shortcut::new("Double-click", false, "Edit text"),
            Shortcut::new("Resize", true, "Keep aspect ratio"),
            Shortcut::new("Rotate", true, "Snap to 15°"),
        ]
    }

    /// Log all shortcuts.
    pub fn log_all() {
        for shortcut in Self::all() {
            log::info!("  {:16} {}", shortcut.format(), shortcut.description);
        }
    }
}
