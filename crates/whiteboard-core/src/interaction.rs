//! Pointer interaction on the in-memory canvas.
//!
//! Routes pointer events according to the store's tool: freehand strokes in
//! drawing mode, drag-to-create for rectangles and circles, and selection,
//! moving and text editing for the select tool. Unrecognized tools do nothing.

use crate::canvas::Canvas;
use crate::input::{InputState, MouseButton, PointerEvent};
use crate::shapes::{Shape, ShapeStyle};
use crate::store::WhiteboardStore;
use crate::surface::CanvasSurface;
use crate::tools::{ToolKind, ToolManager};
use kurbo::Point;

/// What the canvas is doing with the primary pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum Gesture {
    #[default]
    None,
    Stroke,
    Shape,
    /// Moving the active object; holds the last pointer position.
    Move(Point),
}

/// Pointer state machine over a [`WhiteboardStore`] holding a [`Canvas`].
#[derive(Debug, Default)]
pub struct CanvasInteraction {
    input: InputState,
    tools: ToolManager,
    gesture: Gesture,
}

impl CanvasInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Shape the current drag would create.
    pub fn preview_shape(&self) -> Option<Shape> {
        self.tools.preview_shape()
    }

    /// Call at the end of each frame.
    pub fn end_frame(&mut self) {
        self.input.begin_frame();
    }

    /// Abandon any gesture in progress.
    pub fn cancel(&mut self) {
        self.tools.cancel();
        self.gesture = Gesture::None;
    }

    /// Feed a pointer event. Returns true when the canvas changed.
    pub fn handle_pointer(
        &mut self,
        store: &mut WhiteboardStore<Canvas>,
        event: PointerEvent,
    ) -> bool {
        self.input.handle_pointer_event(event);
        let point = self.input.pointer_position;

        match event {
            PointerEvent::Down {
                button: MouseButton::Left,
                ..
            } => self.pointer_down(store, point),
            PointerEvent::Move { .. } => self.pointer_move(store, point),
            PointerEvent::Up {
                button: MouseButton::Left,
                ..
            } if self.input.is_just_released() => self.pointer_up(store, point),
            _ => false,
        }
    }

    fn pointer_down(&mut self, store: &mut WhiteboardStore<Canvas>, point: Point) -> bool {
        let tool = store.current_tool().kind();
        let style = ShapeStyle::stroked(store.current_color().clone(), store.brush_size());
        let Some(canvas) = store.canvas_mut() else {
            return false;
        };

        if canvas.is_drawing_mode() {
            if canvas.begin_stroke(point) {
                self.gesture = Gesture::Stroke;
            }
            return true;
        }

        match tool {
            Some(ToolKind::Select) => {
                let hit = canvas.select_at(point);
                if let Some(id) = hit {
                    if self.input.is_double_click() && canvas.begin_text_edit(id) {
                        log::debug!("Editing text {}", id);
                    }
                    self.gesture = Gesture::Move(point);
                }
                canvas.render_all();
                true
            }
            Some(kind @ (ToolKind::Rectangle | ToolKind::Circle)) => {
                canvas.discard_active_object();
                if self.tools.begin(kind, point, style) {
                    self.gesture = Gesture::Shape;
                }
                true
            }
            _ => false,
        }
    }

    fn pointer_move(&mut self, store: &mut WhiteboardStore<Canvas>, point: Point) -> bool {
        let Some(canvas) = store.canvas_mut() else {
            return false;
        };
        match self.gesture {
            Gesture::None => false,
            Gesture::Stroke => {
                canvas.extend_stroke(point);
                true
            }
            Gesture::Shape => {
                self.tools.update(point);
                true
            }
            Gesture::Move(last) => {
                self.gesture = Gesture::Move(point);
                if canvas.move_active(point - last) {
                    canvas.render_all();
                    true
                } else {
                    false
                }
            }
        }
    }

    fn pointer_up(&mut self, store: &mut WhiteboardStore<Canvas>, point: Point) -> bool {
        let gesture = std::mem::take(&mut self.gesture);
        let Some(canvas) = store.canvas_mut() else {
            self.tools.cancel();
            return false;
        };
        match gesture {
            Gesture::None => false,
            Gesture::Stroke => {
                canvas.extend_stroke(point);
                canvas.finish_stroke().is_some()
            }
            Gesture::Shape => {
                let Some(shape) = self.tools.end(point) else {
                    return true;
                };
                let id = canvas.add(shape);
                canvas.set_active_object(id);
                canvas.render_all();
                true
            }
            Gesture::Move(_) => true,
        }
    }
}
