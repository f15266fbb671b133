//! Pointer and modifier state for canvas gestures.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Pointer event for unified mouse/touch handling, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

/// How a left-button press was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    Single,
    Double,
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME: Duration = Duration::from_millis(500);
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Tracks pointer state between events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position.
    pub pointer_position: Point,
    /// Position before the last move, for delta calculations.
    pub previous_pointer_position: Point,
    pressed_buttons: HashSet<MouseButton>,
    /// Current modifier keys state.
    pub modifiers: Modifiers,
    /// Start position of the current left-button drag.
    pub drag_start: Option<Point>,
    last_click: Option<(Instant, Point)>,
    last_press: Option<Click>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event stamped with the current time.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        self.handle_pointer_event_at(event, Instant::now());
    }

    /// Process a pointer event that happened at `now`.
    pub fn handle_pointer_event_at(&mut self, event: PointerEvent, now: Instant) {
        match event {
            PointerEvent::Down { position, button } => {
                self.move_to(position);
                self.pressed_buttons.insert(button);
                if button == MouseButton::Left {
                    self.last_press = Some(self.classify_click(position, now));
                    self.drag_start = Some(position);
                }
            }
            PointerEvent::Up { position, button } => {
                self.move_to(position);
                self.pressed_buttons.remove(&button);
                if button == MouseButton::Left {
                    self.drag_start = None;
                }
            }
            PointerEvent::Move { position } => self.move_to(position),
        }
    }

    fn move_to(&mut self, position: Point) {
        self.previous_pointer_position = self.pointer_position;
        self.pointer_position = position;
    }

    fn classify_click(&mut self, position: Point, now: Instant) -> Click {
        let is_double = self.last_click.is_some_and(|(time, last)| {
            now.saturating_duration_since(time) < DOUBLE_CLICK_TIME
                && (position - last).hypot() < DOUBLE_CLICK_DISTANCE
        });
        if is_double {
            // Reset to prevent triple-click being detected as another double-click
            self.last_click = None;
            Click::Double
        } else {
            self.last_click = Some((now, position));
            Click::Single
        }
    }

    /// Update modifier keys state.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Check if a button is currently pressed.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Classification of the most recent left press.
    pub fn last_press(&self) -> Option<Click> {
        self.last_press
    }

    pub fn is_double_click(&self) -> bool {
        self.last_press == Some(Click::Double)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    /// Get the pointer movement delta since the previous event.
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_position - self.previous_pointer_position
    }

    /// Get the drag delta from start position, if dragging.
    pub fn drag_delta(&self) -> Option<Vec2> {
        self.drag_start.map(|start| self.pointer_position - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_button_press_and_release() {
        let mut input = InputState::new();

        input.handle_pointer_event(down(100.0, 100.0));
        assert!(input.is_button_pressed(MouseButton::Left));
        assert!(!input.is_button_pressed(MouseButton::Right));

        input.handle_pointer_event(up(100.0, 100.0));
        assert!(!input.is_button_pressed(MouseButton::Left));
        assert!(!input.is_dragging());
    }

    #[test]
    fn test_drag_tracking() {
        let mut input = InputState::new();

        input.handle_pointer_event(down(100.0, 100.0));
        assert!(input.is_dragging());
        assert_eq!(input.drag_start, Some(Point::new(100.0, 100.0)));

        input.handle_pointer_event(PointerEvent::Move {
            position: Point::new(150.0, 120.0),
        });

        let delta = input.drag_delta().unwrap();
        assert!((delta.x - 50.0).abs() < f64::EPSILON);
        assert!((delta.y - 20.0).abs() < f64::EPSILON);
        assert_eq!(input.pointer_delta(), Vec2::new(50.0, 20.0));
    }

    #[test]
    fn test_double_click_detection() {
        let mut input = InputState::new();
        let start = Instant::now();

        input.handle_pointer_event_at(down(100.0, 100.0), start);
        assert_eq!(input.last_press(), Some(Click::Single));
        input.handle_pointer_event_at(up(100.0, 100.0), start);

        input.handle_pointer_event_at(down(101.0, 101.0), start + Duration::from_millis(200));
        assert!(input.is_double_click());

        // A third click starts a new sequence.
        input.handle_pointer_event_at(down(101.0, 101.0), start + Duration::from_millis(300));
        assert_eq!(input.last_press(), Some(Click::Single));
    }

    #[test]
    fn test_double_click_too_slow() {
        let mut input = InputState::new();
        let start = Instant::now();

        input.handle_pointer_event_at(down(100.0, 100.0), start);
        input.handle_pointer_event_at(down(100.0, 100.0), start + Duration::from_millis(600));
        assert!(!input.is_double_click());
    }

    #[test]
    fn test_double_click_too_far() {
        let mut input = InputState::new();
        let start = Instant::now();

        input.handle_pointer_event_at(down(100.0, 100.0), start);
        input.handle_pointer_event_at(down(200.0, 200.0), start + Duration::from_millis(100));
        assert!(!input.is_double_click());
    }
}
