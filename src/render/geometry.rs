//! Shared geometry calculations for annotation rendering
//!
//! Constants and math used by the raster renderer and the hit-tester.

use crate::domain::{Bounds, Point, Shape};

/// Arrow geometry constants
pub mod arrow {
    use crate::domain::Point;

    /// Head length per unit of stroke width
    pub const HEAD_LENGTH_FACTOR: f32 = 4.0;
    /// Head half-width per unit of stroke width
    pub const HEAD_WIDTH_FACTOR: f32 = 2.5;
    /// Head length floor so thin arrows keep a visible head
    pub const MIN_HEAD_LENGTH: f32 = 15.0;
    /// Head half-width floor
    pub const MIN_HEAD_WIDTH: f32 = 10.0;
    /// Fraction of the head length the shaft stops short of the tip
    pub const SHAFT_INSET: f32 = 0.6;

    /// Head length and half-width for a stroke width
    pub fn head_size(stroke_width: f32) -> (f32, f32) {
        (
            (stroke_width * HEAD_LENGTH_FACTOR).max(MIN_HEAD_LENGTH),
            (stroke_width * HEAD_WIDTH_FACTOR).max(MIN_HEAD_WIDTH),
        )
    }

    /// End of the visible shaft, pulled back so it does not poke through the head
    pub fn shaft_end(start: Point, end: Point, head_length: f32) -> Point {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let length = (dx * dx + dy * dy).sqrt();
        if length == 0.0 {
            return start;
        }
        let ratio = ((length - head_length * SHAFT_INSET) / length).max(0.0);
        Point::new(start.x + dx * ratio, start.y + dy * ratio)
    }

    /// Filled head triangle: tip followed by the two back corners
    pub fn head_triangle(start: Point, end: Point, head_length: f32, head_width: f32) -> [Point; 3] {
        let angle = (end.y - start.y).atan2(end.x - start.x);
        let (sin, cos) = angle.sin_cos();
        let back_x = end.x - head_length * cos;
        let back_y = end.y - head_length * sin;
        [
            end,
            Point::new(back_x + head_width * sin, back_y - head_width * cos),
            Point::new(back_x - head_width * sin, back_y + head_width * cos),
        ]
    }
}

/// Shape (rectangle/ellipse) constants
pub mod shape {
    /// Ellipse bezier approximation constant: 4/3 * (sqrt(2) - 1)
    pub const BEZIER_K: f32 = 0.552_284_8;
}

/// Selection indicator constants
pub mod selection {
    /// Indicator stroke width in backing pixels
    pub const STROKE_WIDTH: f32 = 2.0;
    /// Dash and gap length
    pub const DASH: [f32; 2] = [5.0, 5.0];
    /// Margin around two-point shapes
    pub const SHAPE_MARGIN: f32 = 10.0;
    /// Margin around text
    pub const TEXT_MARGIN: f32 = 5.0;
}

/// Text layout constants
pub mod text {
    /// Distance between baselines of consecutive lines, per unit of font size
    pub const LINE_HEIGHT: f32 = 1.2;
}

/// Calculate ellipse center and radii from bounds
#[inline]
pub fn ellipse_radii(bounds: &Bounds) -> (f32, f32, f32, f32) {
    let cx = (bounds.min_x + bounds.max_x) * 0.5;
    let cy = (bounds.min_y + bounds.max_y) * 0.5;
    (cx, cy, bounds.width() * 0.5, bounds.height() * 0.5)
}

/// Box drawn around a selected shape
pub fn selection_bounds(shape: &Shape) -> Bounds {
    match shape {
        Shape::Arrow(s) | Shape::Rectangle(s) | Shape::Ellipse(s) => {
            s.bounds().expand(selection::SHAPE_MARGIN)
        }
        Shape::Text(t) => Bounds {
            min_x: t.anchor.x,
            min_y: t.anchor.y - t.font_size,
            max_x: t.anchor.x + t.estimated_width(),
            max_y: t.anchor.y,
        }
        .expand(selection::TEXT_MARGIN),
    }
}

/// Baseline positions of each line of a text shape
pub fn text_line_origins(anchor: Point, font_size: f32, line_count: usize) -> Vec<Point> {
    (0..line_count)
        .map(|i| Point::new(anchor.x, anchor.y + i as f32 * font_size * text::LINE_HEIGHT))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ShapeColor, StrokeShape, TextShape};

    #[test]
    fn test_head_size_floors() {
        assert_eq!(arrow::head_size(1.0), (15.0, 10.0));
        assert_eq!(arrow::head_size(10.0), (40.0, 25.0));
    }

    #[test]
    fn test_shaft_end_shortened() {
        let end = arrow::shaft_end(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 15.0);
        assert!((end.x - 91.0).abs() < 1e-4);
        assert_eq!(end.y, 0.0);
    }

    #[test]
    fn test_shaft_end_short_arrow_collapses_to_start() {
        let end = arrow::shaft_end(Point::new(0.0, 0.0), Point::new(5.0, 0.0), 15.0);
        assert_eq!(end, Point::new(0.0, 0.0));
        let zero = arrow::shaft_end(Point::new(3.0, 3.0), Point::new(3.0, 3.0), 15.0);
        assert_eq!(zero, Point::new(3.0, 3.0));
    }

    #[test]
    fn test_head_triangle_horizontal() {
        let [tip, a, b] =
            arrow::head_triangle(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 15.0, 10.0);
        assert_eq!(tip, Point::new(100.0, 0.0));
        assert!((a.x - 85.0).abs() < 1e-4 && (a.y + 10.0).abs() < 1e-4);
        assert!((b.x - 85.0).abs() < 1e-4 && (b.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_head_triangle_vertical() {
        let [_, a, b] =
            arrow::head_triangle(Point::new(0.0, 0.0), Point::new(0.0, 50.0), 20.0, 10.0);
        assert!((a.x - 10.0).abs() < 1e-4 && (a.y - 30.0).abs() < 1e-4);
        assert!((b.x + 10.0).abs() < 1e-4 && (b.y - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_selection_bounds() {
        let rect = Shape::Rectangle(StrokeShape::new(
            Point::new(50.0, 50.0),
            Point::new(10.0, 20.0),
            ShapeColor::RED,
            3.0,
        ));
        let b = selection_bounds(&rect);
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (0.0, 10.0, 60.0, 60.0));

        let text = Shape::Text(TextShape {
            anchor: Point::new(10.0, 40.0),
            content: "ab".into(),
            color: ShapeColor::RED,
            font_size: 20.0,
        });
        let b = selection_bounds(&text);
        let expected = [5.0, 15.0, 39.0, 45.0];
        for (got, want) in [b.min_x, b.min_y, b.max_x, b.max_y].iter().zip(expected) {
            assert!((got - want).abs() < 1e-3, "{got} != {want}");
        }
    }

    #[test]
    fn test_text_line_origins() {
        let lines = text_line_origins(Point::new(5.0, 10.0), 10.0, 3);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].x, 5.0);
        assert!((lines[2].y - 34.0).abs() < 1e-3);
    }
}
