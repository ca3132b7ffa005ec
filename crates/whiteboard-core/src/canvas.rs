//! In-memory canvas surface.

use crate::color::CssColor;
use crate::export;
use crate::shapes::{Freehand, Shape, ShapeId, ShapeStyle};
use crate::surface::{Brush, CanvasSurface, ExportOptions, SurfaceResult};
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pick tolerance in canvas pixels.
pub const HIT_TOLERANCE: f64 = 4.0;

/// Freehand strokes are decimated by this distance when finished.
const STROKE_SIMPLIFY_TOLERANCE: f64 = 0.4;

/// Objects on the canvas and their stacking order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanvasDocument {
    /// All shapes in the document, keyed by ID.
    pub shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    pub z_order: Vec<ShapeId>,
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape on top.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.z_order.push(id);
        self.shapes.insert(id, shape);
        id
    }

    /// Remove a shape from the document.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        self.z_order.retain(|&shape_id| shape_id != id);
        self.shapes.remove(&id)
    }

    /// Clear all shapes from the document.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.z_order.clear();
    }

    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    /// Get shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Find shapes at a point, front to back.
    pub fn shapes_at_point(&self, point: Point, tolerance: f64) -> Vec<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|&id| {
                self.shapes
                    .get(&id)
                    .filter(|s| s.hit_test(point, tolerance))
                    .map(|_| id)
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}

/// The whiteboard surface: objects, selection, free drawing and export.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub document: CanvasDocument,
    active: Option<ShapeId>,
    drawing_mode: bool,
    brush: Brush,
    background: CssColor,
    size: Size,
    /// In-progress freehand stroke.
    stroke: Option<Freehand>,
    /// Text object receiving keyboard input.
    editing: Option<ShapeId>,
    revision: u64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(Size::new(800.0, 600.0))
    }
}

impl Canvas {
    /// Create an empty white canvas of the given size.
    pub fn new(size: Size) -> Self {
        Self {
            document: CanvasDocument::new(),
            active: None,
            drawing_mode: false,
            brush: Brush::default(),
            background: CssColor::white(),
            size,
            stroke: None,
            editing: None,
            revision: 0,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Resize the drawable area. Objects are not moved.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.render_all();
    }

    /// Incremented on every redraw request.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Get shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.document.shapes_ordered()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.document.get_shape(id)
    }

    /// The active object itself.
    pub fn active_shape(&self) -> Option<&Shape> {
        self.active.and_then(|id| self.document.get_shape(id))
    }

    /// Remove one object, dropping selection and editing that pointed at it.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let removed = self.document.remove_shape(id);
        if self.active == Some(id) {
            self.active = None;
        }
        if self.editing == Some(id) {
            self.editing = None;
        }
        removed
    }

    /// Deselect, ending any text edit.
    pub fn discard_active_object(&mut self) {
        self.end_text_edit();
        self.active = None;
    }

    /// Activate the topmost object under `point`, or deselect if none.
    pub fn select_at(&mut self, point: Point) -> Option<ShapeId> {
        let hit = self
            .document
            .shapes_at_point(point, HIT_TOLERANCE)
            .first()
            .copied();
        match hit {
            Some(id) => {
                if self.editing.is_some_and(|editing| editing != id) {
                    self.end_text_edit();
                }
                self.active = Some(id);
            }
            None => self.discard_active_object(),
        }
        hit
    }

    /// Translate the active object.
    pub fn move_active(&mut self, delta: Vec2) -> bool {
        let Some(shape) = self.active.and_then(|id| self.document.get_shape_mut(id)) else {
            return false;
        };
        shape.transform(Affine::translate(delta));
        true
    }

    /// Start a freehand stroke with the live brush. Ignored outside drawing mode.
    pub fn begin_stroke(&mut self, point: Point) -> bool {
        if !self.drawing_mode {
            return false;
        }
        let mut stroke = Freehand::new(ShapeStyle::stroked(
            self.brush.color.clone(),
            self.brush.width,
        ));
        stroke.add_point(point);
        self.stroke = Some(stroke);
        true
    }

    pub fn extend_stroke(&mut self, point: Point) {
        if let Some(stroke) = self.stroke.as_mut() {
            stroke.add_point(point);
        }
    }

    /// Commit the stroke as an object. Strokes under two points are dropped.
    pub fn finish_stroke(&mut self) -> Option<ShapeId> {
        let mut stroke = self.stroke.take()?;
        if stroke.len() < 2 {
            return None;
        }
        stroke.simplify(STROKE_SIMPLIFY_TOLERANCE);
        let id = self.document.add_shape(Shape::Freehand(stroke));
        self.render_all();
        Some(id)
    }

    /// The stroke being drawn, for live preview.
    pub fn current_stroke(&self) -> Option<&Freehand> {
        self.stroke.as_ref()
    }

    /// Start editing a text object, making it active.
    pub fn begin_text_edit(&mut self, id: ShapeId) -> bool {
        if self.document.get_shape(id).and_then(Shape::as_text).is_none() {
            return false;
        }
        self.active = Some(id);
        self.editing = Some(id);
        true
    }

    /// The text object being edited.
    pub fn editing_text(&self) -> Option<ShapeId> {
        self.editing
    }

    /// Append typed characters to the edited text.
    pub fn type_text(&mut self, input: &str) -> bool {
        let Some(text) = self
            .editing
            .and_then(|id| self.document.get_shape_mut(id))
            .and_then(Shape::as_text_mut)
        else {
            return false;
        };
        text.insert_str(input);
        true
    }

    /// Delete the last character of the edited text.
    pub fn backspace_text(&mut self) -> bool {
        self.editing
            .and_then(|id| self.document.get_shape_mut(id))
            .and_then(Shape::as_text_mut)
            .is_some_and(|text| text.backspace())
    }

    pub fn end_text_edit(&mut self) {
        self.editing = None;
    }
}

impl CanvasSurface for Canvas {
    fn is_drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    fn set_drawing_mode(&mut self, enabled: bool) {
        self.drawing_mode = enabled;
        if !enabled {
            self.stroke = None;
        }
    }

    fn brush(&self) -> &Brush {
        &self.brush
    }

    fn brush_mut(&mut self) -> &mut Brush {
        &mut self.brush
    }

    fn add(&mut self, object: Shape) -> ShapeId {
        self.document.add_shape(object)
    }

    fn clear(&mut self) {
        self.document.clear();
        self.active = None;
        self.editing = None;
        self.stroke = None;
        self.background = CssColor::transparent();
    }

    fn set_active_object(&mut self, id: ShapeId) -> bool {
        if self.document.get_shape(id).is_none() {
            return false;
        }
        if self.editing.is_some_and(|editing| editing != id) {
            self.end_text_edit();
        }
        self.active = Some(id);
        true
    }

    fn active_object(&self) -> Option<ShapeId> {
        self.active
    }

    fn object_count(&self) -> usize {
        self.document.len()
    }

    fn render_all(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn background(&self) -> &CssColor {
        &self.background
    }

    fn set_background(&mut self, color: CssColor) {
        self.background = color;
    }

    fn to_data_url(&self, options: &ExportOptions) -> SurfaceResult<String> {
        export::to_data_url(self, options)
    }
}
