//! Tool system for the whiteboard.

use crate::shapes::{Ellipse, Rectangle, Shape, ShapeStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Drags shorter than this on either axis do not create a shape.
const MIN_SHAPE_EXTENT: f64 = 2.0;

/// The recognized tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Select,
    #[default]
    Pen,
    Rectangle,
    Circle,
    Eraser,
}

impl ToolKind {
    /// Every tool in toolbar order.
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Select,
        ToolKind::Pen,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Eraser,
    ];

    /// Identifier used by the store.
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Pen => "pen",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Eraser => "eraser",
        }
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Pen => "Pen Tool",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Circle => "Circle",
            ToolKind::Eraser => "Eraser",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Tools that paint with the live brush.
    pub fn uses_brush(&self) -> bool {
        matches!(self, ToolKind::Pen | ToolKind::Eraser)
    }
}

/// A tool identifier as held by the store.
///
/// Any name is accepted. Names outside [`ToolKind`] are kept verbatim and
/// have no effect on the surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tool {
    Known(ToolKind),
    Other(String),
}

impl Tool {
    /// The recognized tool, if any.
    pub fn kind(&self) -> Option<ToolKind> {
        match self {
            Tool::Known(kind) => Some(*kind),
            Tool::Other(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Tool::Known(kind) => kind.name(),
            Tool::Other(name) => name,
        }
    }

    pub fn is(&self, kind: ToolKind) -> bool {
        self.kind() == Some(kind)
    }
}

impl Default for Tool {
    fn default() -> Self {
        Tool::Known(ToolKind::default())
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ToolKind> for Tool {
    fn from(kind: ToolKind) -> Self {
        Tool::Known(kind)
    }
}

impl From<&str> for Tool {
    fn from(name: &str) -> Self {
        ToolKind::from_name(name).map_or_else(|| Tool::Other(name.to_string()), Tool::Known)
    }
}

impl From<String> for Tool {
    fn from(name: String) -> Self {
        match ToolKind::from_name(&name) {
            Some(kind) => Tool::Known(kind),
            None => Tool::Other(name),
        }
    }
}

impl From<Tool> for String {
    fn from(tool: Tool) -> Self {
        tool.name().to_string()
    }
}

/// State of a drag-to-create interaction.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    #[default]
    Idle,
    Active {
        kind: ToolKind,
        start: Point,
        current: Point,
        style: ShapeStyle,
    },
}

/// Drives drag-to-create for the rectangle and circle tools.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    pub state: ToolState,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a drag. Returns false for tools that do not create shapes.
    pub fn begin(&mut self, kind: ToolKind, point: Point, style: ShapeStyle) -> bool {
        if !matches!(kind, ToolKind::Rectangle | ToolKind::Circle) {
            return false;
        }
        self.state = ToolState::Active {
            kind,
            start: point,
            current: point,
            style,
        };
        true
    }

    pub fn update(&mut self, point: Point) {
        if let ToolState::Active { current, .. } = &mut self.state {
            *current = point;
        }
    }

    /// End the drag and return the created shape, if it has any extent.
    pub fn end(&mut self, point: Point) -> Option<Shape> {
        self.update(point);
        let shape = self.preview_shape();
        self.state = ToolState::Idle;
        let shape = shape?;
        let bounds = shape.bounds();
        (bounds.width() >= MIN_SHAPE_EXTENT || bounds.height() >= MIN_SHAPE_EXTENT).then_some(shape)
    }

    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Active { .. })
    }

    /// The shape the current drag would create.
    pub fn preview_shape(&self) -> Option<Shape> {
        let ToolState::Active {
            kind,
            start,
            current,
            style,
        } = &self.state
        else {
            return None;
        };
        match kind {
            ToolKind::Rectangle => Some(Shape::Rectangle(
                Rectangle::from_corners(*start, *current).with_style(style.clone()),
            )),
            ToolKind::Circle => Some(Shape::Ellipse(
                Ellipse::from_rect(Rect::from_points(*start, *current)).with_style(style.clone()),
            )),
            _ => None,
        }
    }
}
