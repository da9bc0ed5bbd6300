//! Annotation shapes drawn on screenshots
//!
//! All shape coordinates are stored in backing pixel space, the pixel grid of
//! the background bitmap, independent of how large the canvas is displayed.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use super::geometry::{Bounds, Point};

/// Estimated glyph advance as a fraction of the font size (no real metrics)
pub const TEXT_WIDTH_FACTOR: f32 = 0.6;

/// RGB stroke/fill color, serialized as a `#RRGGBB` hex string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShapeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ShapeColor {
    pub const RED: ShapeColor = ShapeColor::rgb(0xFF, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to image crate RGBA format (0-255), always opaque
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl Default for ShapeColor {
    fn default() -> Self {
        Self::RED
    }
}

impl FromStr for ShapeColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .with_context(|| format!("color {s:?} must start with '#'"))?;
        if !hex.is_ascii() {
            bail!("color {s:?} is not a hex color");
        }
        let channel = |digits: &str| {
            u8::from_str_radix(digits, 16).with_context(|| format!("invalid hex color {s:?}"))
        };
        match hex.len() {
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            // #RGB shorthand, each digit doubled
            3 => Ok(Self::rgb(
                channel(&hex[0..1])? * 0x11,
                channel(&hex[1..2])? * 0x11,
                channel(&hex[2..3])? * 0x11,
            )),
            _ => bail!("color {s:?} must be #RGB or #RRGGBB"),
        }
    }
}

impl TryFrom<String> for ShapeColor {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShapeColor> for String {
    fn from(c: ShapeColor) -> Self {
        c.to_string()
    }
}

impl fmt::Display for ShapeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Two-point stroked shape (arrow, rectangle outline, ellipse outline)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeShape {
    /// First corner (the pointer-down point)
    pub start: Point,
    /// Second corner (the pointer-up point); the arrow tip for arrows
    pub end: Point,
    pub color: ShapeColor,
    /// Stroke width in backing pixels
    pub width: f32,
}

impl StrokeShape {
    pub fn new(start: Point, end: Point, color: ShapeColor, width: f32) -> Self {
        Self {
            start,
            end,
            color,
            width,
        }
    }

    /// Normalized bounding box of the two corners
    pub fn bounds(&self) -> Bounds {
        Bounds::from_corners(self.start, self.end)
    }
}

/// Text annotation anchored at its baseline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextShape {
    /// Left edge of the text, y is the baseline
    pub anchor: Point,
    pub content: String,
    pub color: ShapeColor,
    /// Font size in backing pixels
    pub font_size: f32,
}

impl TextShape {
    /// Approximate rendered width from the character count
    pub fn estimated_width(&self) -> f32 {
        self.content.chars().count() as f32 * self.font_size * TEXT_WIDTH_FACTOR
    }
}

/// Unified shape type, stored in history in z-order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Arrow(StrokeShape),
    Rectangle(StrokeShape),
    Ellipse(StrokeShape),
    Text(TextShape),
}

impl Shape {
    /// Point used as the drag handle: first corner, or the text anchor
    pub fn anchor(&self) -> Point {
        match self {
            Shape::Arrow(s) | Shape::Rectangle(s) | Shape::Ellipse(s) => s.start,
            Shape::Text(t) => t.anchor,
        }
    }

    /// Move every stored coordinate by `delta`
    pub fn translate(&mut self, delta: Point) {
        match self {
            Shape::Arrow(s) | Shape::Rectangle(s) | Shape::Ellipse(s) => {
                s.start = s.start.offset(delta);
                s.end = s.end.offset(delta);
            }
            Shape::Text(t) => t.anchor = t.anchor.offset(delta),
        }
    }

    /// A shape with nothing meaningful to show: coincident corners or blank text
    pub fn is_degenerate(&self) -> bool {
        match self {
            Shape::Arrow(s) | Shape::Rectangle(s) | Shape::Ellipse(s) => s.start == s.end,
            Shape::Text(t) => t.content.trim().is_empty(),
        }
    }

    /// Short name for log output
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Arrow(_) => "arrow",
            Shape::Rectangle(_) => "rectangle",
            Shape::Ellipse(_) => "ellipse",
            Shape::Text(_) => "text",
        }
    }
}
