//! Shape definitions for the arena.

use kurbo::{Point, Rect, Size};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Alpha applied to the stroke color to derive the fill color.
pub const FILL_ALPHA: u8 = 195;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// A circle placed on the arena.
///
/// The position is the top-left corner of the bounding box; the diameter is
/// fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ShapeId,
    /// Top-left corner of the bounding box.
    pub position: Point,
    /// Width and height of the bounding box.
    pub(crate) diameter: f64,
    /// Outline color.
    pub stroke: SerializableColor,
    /// Translucent fill derived from the outline color.
    pub fill: SerializableColor,
}

impl Circle {
    /// Create a new circle with a fresh ID.
    pub fn new(position: Point, diameter: f64, color: Color) -> Self {
        let stroke = SerializableColor::from(color).with_alpha(u8::MAX);
        Self {
            id: Uuid::new_v4(),
            position,
            diameter,
            stroke,
            fill: stroke.with_alpha(FILL_ALPHA),
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    /// Outline thickness, proportional to the diameter.
    pub fn stroke_width(&self) -> f64 {
        self.diameter / 20.0
    }

    pub fn size(&self) -> Size {
        Size::new(self.diameter, self.diameter)
    }

    /// Get the bounding box in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size())
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Check if a point lies on the circle (edge inclusive).
    pub fn hit_test(&self, point: Point) -> bool {
        let radius = self.diameter / 2.0;
        (point - self.center()).hypot2() <= radius * radius
    }
}
