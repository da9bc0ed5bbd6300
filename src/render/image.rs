//! Raster canvas surface using tiny-skia
//!
//! The surface has the background bitmap's native size and is recomposed
//! from scratch on every render: background, committed shapes in order, the
//! draft shape, then the selection indicator.

use anyhow::Context;
use image::RgbaImage;
use tiny_skia::{
    ColorU8, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke,
    StrokeDash, Transform,
};

use super::geometry::{self, arrow, selection, shape};
use super::text::TextRasterizer;
use crate::domain::{Point, Shape, ShapeColor, StrokeShape};

/// Everything one frame is composed from
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
    pub background: Option<&'a Pixmap>,
    pub shapes: &'a [Shape],
    pub draft: Option<&'a Shape>,
    pub selection: Option<usize>,
}

/// Backing raster the editor draws into
#[derive(Debug)]
pub struct CanvasSurface {
    pixmap: Pixmap,
    text: TextRasterizer,
    selection_color: ShapeColor,
}

impl CanvasSurface {
    pub fn new(
        width: u32,
        height: u32,
        text: TextRasterizer,
        selection_color: ShapeColor,
    ) -> anyhow::Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .with_context(|| format!("Invalid canvas size {width}x{height}"))?;
        Ok(Self {
            pixmap,
            text,
            selection_color,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Recompose the whole frame
    pub fn render(&mut self, scene: &Scene<'_>) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);

        if let Some(background) = scene.background {
            self.pixmap.draw_pixmap(
                0,
                0,
                background.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }

        for shape in scene.shapes {
            draw_shape(&mut self.pixmap, &self.text, shape);
        }

        if let Some(draft) = scene.draft {
            draw_shape(&mut self.pixmap, &self.text, draft);
        }

        if let Some(selected) = scene.selection.and_then(|i| scene.shapes.get(i)) {
            draw_selection_box(&mut self.pixmap, selected, self.selection_color);
        }
    }

    /// Copy the current frame out as straight-alpha RGBA
    pub fn to_rgba_image(&self) -> RgbaImage {
        pixmap_to_image(&self.pixmap)
    }
}

/// Convert straight-alpha RGBA into a premultiplied pixmap
pub fn pixmap_from_image(img: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(img.width(), img.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Convert a premultiplied pixmap back into straight-alpha RGBA
pub fn pixmap_to_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

fn solid_paint(color: ShapeColor) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

/// Draw one shape with its own style
pub fn draw_shape(pixmap: &mut Pixmap, text: &TextRasterizer, shape: &Shape) {
    match shape {
        Shape::Arrow(s) => draw_arrow(pixmap, s),
        Shape::Rectangle(s) => draw_rect_outline(pixmap, s),
        Shape::Ellipse(s) => draw_ellipse_outline(pixmap, s),
        Shape::Text(t) => text.draw(pixmap, t),
    }
}

fn draw_rect_outline(pixmap: &mut Pixmap, s: &StrokeShape) {
    let b = s.bounds();

    let mut pb = PathBuilder::new();
    pb.move_to(b.min_x, b.min_y);
    pb.line_to(b.max_x, b.min_y);
    pb.line_to(b.max_x, b.max_y);
    pb.line_to(b.min_x, b.max_y);
    pb.close();
    let Some(path) = pb.finish() else {
        return;
    };

    pixmap.stroke_path(
        &path,
        &solid_paint(s.color),
        &round_stroke(s.width),
        Transform::identity(),
        None,
    );
}

/// Build an ellipse path using cubic bezier curves
fn build_ellipse_path(cx: f32, cy: f32, rx: f32, ry: f32) -> Option<tiny_skia::Path> {
    let kx = rx * shape::BEZIER_K;
    let ky = ry * shape::BEZIER_K;

    let mut pb = PathBuilder::new();

    // Start at top
    pb.move_to(cx, cy - ry);
    pb.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);
    pb.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);
    pb.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);
    pb.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);

    pb.close();
    pb.finish()
}

fn draw_ellipse_outline(pixmap: &mut Pixmap, s: &StrokeShape) {
    let (cx, cy, rx, ry) = geometry::ellipse_radii(&s.bounds());
    // Flat ellipses still need a drawable path
    let Some(path) = build_ellipse_path(cx, cy, rx.max(0.5), ry.max(0.5)) else {
        return;
    };
    pixmap.stroke_path(
        &path,
        &solid_paint(s.color),
        &round_stroke(s.width),
        Transform::identity(),
        None,
    );
}

fn draw_arrow(pixmap: &mut Pixmap, s: &StrokeShape) {
    let (head_length, head_width) = arrow::head_size(s.width);
    let paint = solid_paint(s.color);

    let shaft_end = arrow::shaft_end(s.start, s.end, head_length);
    if shaft_end != s.start {
        let mut pb = PathBuilder::new();
        pb.move_to(s.start.x, s.start.y);
        pb.line_to(shaft_end.x, shaft_end.y);
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(
                &path,
                &paint,
                &round_stroke(s.width),
                Transform::identity(),
                None,
            );
        }
    }

    let [tip, left, right] = arrow::head_triangle(s.start, s.end, head_length, head_width);
    if let Some(path) = triangle_path(tip, left, right) {
        pixmap.fill_path(
            &path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
}

fn triangle_path(a: Point, b: Point, c: Point) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(a.x, a.y);
    pb.line_to(b.x, b.y);
    pb.line_to(c.x, c.y);
    pb.close();
    pb.finish()
}

/// Dashed box around the selected shape
fn draw_selection_box(pixmap: &mut Pixmap, shape: &Shape, color: ShapeColor) {
    let b = geometry::selection_bounds(shape);
    let Some(rect) = tiny_skia::Rect::from_ltrb(b.min_x, b.min_y, b.max_x, b.max_y) else {
        return;
    };
    let path = PathBuilder::from_rect(rect);

    let stroke = Stroke {
        width: selection::STROKE_WIDTH,
        dash: StrokeDash::new(selection::DASH.to_vec(), 0.0),
        ..Default::default()
    };
    pixmap.stroke_path(
        &path,
        &solid_paint(color),
        &stroke,
        Transform::identity(),
        None,
    );
}
