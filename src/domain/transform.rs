//! Display (CSS) pixel <-> backing (bitmap) pixel conversion
//!
//! The canvas backing store has the bitmap's native size while it is shown at
//! `native / device_pixel_ratio`. Every pointer coordinate entering the editor
//! and every shape coordinate leaving it for display passes through here.

use super::geometry::Point;

/// Scale and origin mapping display coordinates onto backing pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenTransform {
    /// Canvas top-left in display (viewport) coordinates
    pub origin: Point,
    /// Backing pixels per display pixel
    pub scale: f32,
}

impl Default for ScreenTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ScreenTransform {
    pub fn identity() -> Self {
        Self {
            origin: Point::default(),
            scale: 1.0,
        }
    }

    /// Transform for a canvas displayed at its native size divided by the ratio
    pub fn from_device_pixel_ratio(device_pixel_ratio: f32) -> Self {
        Self {
            origin: Point::default(),
            scale: sanitize_scale(device_pixel_ratio),
        }
    }

    /// Transform from the actual backing width and displayed width
    pub fn from_sizes(backing_width: u32, display_width: f32) -> Self {
        let scale = if display_width > 0.0 {
            backing_width as f32 / display_width
        } else {
            1.0
        };
        Self {
            origin: Point::default(),
            scale: sanitize_scale(scale),
        }
    }

    /// Same scale, canvas placed at `origin` within the viewport
    pub fn with_origin(self, origin: Point) -> Self {
        Self { origin, ..self }
    }

    /// Viewport pointer position to backing pixel position
    pub fn to_backing(&self, display: Point) -> Point {
        Point::new(
            (display.x - self.origin.x) * self.scale,
            (display.y - self.origin.y) * self.scale,
        )
    }

    /// Backing pixel position to viewport position
    pub fn to_display(&self, backing: Point) -> Point {
        Point::new(
            backing.x / self.scale + self.origin.x,
            backing.y / self.scale + self.origin.y,
        )
    }

    /// Scale a display length (font size, stroke width) into backing pixels
    pub fn length_to_backing(&self, display_length: f32) -> f32 {
        display_length * self.scale
    }

    /// Displayed size of a bitmap with the given native size
    pub fn display_size(&self, backing_width: u32, backing_height: u32) -> (f32, f32) {
        (
            backing_width as f32 / self.scale,
            backing_height as f32 / self.scale,
        )
    }
}

fn sanitize_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}
