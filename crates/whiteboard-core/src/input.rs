//! Pointer state for canvas interaction.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

// Use web_time for WASM compatibility
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer events in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

/// Tracks the primary pointer across frames.
#[derive(Debug, Clone)]
pub struct InputState {
    pub pointer_position: Point,
    previous_pointer_position: Point,
    primary_down: bool,
    just_pressed: bool,
    just_released: bool,
    pub drag_start: Option<Point>,
    last_click: Option<(Instant, Point)>,
    double_click: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            pointer_position: Point::ZERO,
            previous_pointer_position: Point::ZERO,
            primary_down: false,
            just_pressed: false,
            just_released: false,
            drag_start: None,
            last_click: None,
            double_click: false,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset per-frame state. Call once the frame's events are handled.
    pub fn begin_frame(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
        self.double_click = false;
        self.previous_pointer_position = self.pointer_position;
    }

    /// Feed one event. Only the left button drives drawing.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                if button != MouseButton::Left {
                    return;
                }
                self.primary_down = true;
                self.just_pressed = true;
                self.drag_start = Some(position);
                self.register_click(position, Instant::now());
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                if button == MouseButton::Left && self.primary_down {
                    self.primary_down = false;
                    self.just_released = true;
                    self.drag_start = None;
                }
            }
            PointerEvent::Move { position } => self.pointer_position = position,
        }
    }

    fn register_click(&mut self, position: Point, now: Instant) {
        let is_double = self.last_click.is_some_and(|(time, last)| {
            now.duration_since(time).as_millis() < DOUBLE_CLICK_TIME_MS
                && last.distance(position) < DOUBLE_CLICK_DISTANCE
        });
        if is_double {
            self.double_click = true;
            // A third click starts a new pair
            self.last_click = None;
        } else {
            self.last_click = Some((now, position));
        }
    }

    pub fn is_primary_down(&self) -> bool {
        self.primary_down
    }

    pub fn is_just_pressed(&self) -> bool {
        self.just_pressed
    }

    pub fn is_just_released(&self) -> bool {
        self.just_released
    }

    pub fn is_double_click(&self) -> bool {
        self.double_click
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    /// Movement since the previous frame.
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_position - self.previous_pointer_position
    }

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
    fn test_press_and_release() {
        let mut input = InputState::new();
        input.handle_pointer_event(down(10.0, 10.0));
        assert!(input.is_primary_down());
        assert!(input.is_just_pressed());

        input.begin_frame();
        assert!(!input.is_just_pressed());
        assert!(input.is_primary_down());

        input.handle_pointer_event(up(10.0, 10.0));
        assert!(!input.is_primary_down());
        assert!(input.is_just_released());
    }

    #[test]
    fn test_secondary_buttons_ignored() {
        let mut input = InputState::new();
        input.handle_pointer_event(PointerEvent::Down {
            position: Point::new(5.0, 5.0),
            button: MouseButton::Right,
        });
        assert!(!input.is_primary_down());
        assert!(!input.is_dragging());
        assert_eq!(input.pointer_position, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_drag_tracking() {
        let mut input = InputState::new();
        input.handle_pointer_event(down(100.0, 100.0));
        input.begin_frame();
        input.handle_pointer_event(PointerEvent::Move {
            position: Point::new(150.0, 120.0),
        });

        assert_eq!(input.drag_delta(), Some(Vec2::new(50.0, 20.0)));
        assert_eq!(input.pointer_delta(), Vec2::new(50.0, 20.0));

        input.handle_pointer_event(up(150.0, 120.0));
        assert!(input.drag_delta().is_none());
    }

    #[test]
    fn test_double_click_detection() {
        let mut input = InputState::new();
        input.handle_pointer_event(down(100.0, 100.0));
        assert!(!input.is_double_click());
        input.handle_pointer_event(up(100.0, 100.0));
        input.begin_frame();

        input.handle_pointer_event(down(101.0, 100.0));
        assert!(input.is_double_click());

        input.begin_frame();
        assert!(!input.is_double_click());
    }

    #[test]
    fn test_double_click_too_far() {
        let mut input = InputState::new();
        input.handle_pointer_event(down(100.0, 100.0));
        input.handle_pointer_event(up(100.0, 100.0));
        input.begin_frame();

        input.handle_pointer_event(down(200.0, 200.0));
        assert!(!input.is_double_click());
    }
}
