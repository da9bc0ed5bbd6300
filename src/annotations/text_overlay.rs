//! Transient text entry that becomes a Text shape when confirmed

use crate::domain::{Point, ScreenTransform, Shape, ShapeColor, TextShape};
use crate::session::messages::{Key, Modifiers};

/// Baseline offset below the click point, as a fraction of the font size
pub const BASELINE_FACTOR: f32 = 0.8;

/// What a key press did to the open overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKeyResult {
    /// Confirm and commit the content
    Commit,
    /// Close without committing
    Cancel,
    /// Content changed
    Edited,
    /// Key has no meaning for the overlay
    Ignored,
}

/// Open text input anchored on the canvas
#[derive(Clone, Debug, PartialEq)]
pub struct TextOverlay {
    /// Click position in display coordinates, where the host places its input
    pub display_anchor: Point,
    /// Left edge and baseline in backing pixels
    pub anchor: Point,
    /// Backing pixels per display pixel when the overlay was opened
    pub scale: f32,
    /// Font size as shown in the overlay (display pixels)
    pub font_size: f32,
    pub color: ShapeColor,
    content: String,
}

impl TextOverlay {
    /// Open an empty overlay at a display-space click point
    pub fn open(
        display_anchor: Point,
        transform: &ScreenTransform,
        font_size: f32,
        color: ShapeColor,
    ) -> Self {
        let click = transform.to_backing(display_anchor);
        let anchor = Point::new(
            click.x,
            click.y + transform.length_to_backing(font_size * BASELINE_FACTOR),
        );
        Self {
            display_anchor,
            anchor,
            scale: transform.scale,
            font_size,
            color,
            content: String::new(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn insert_str(&mut self, text: &str) {
        self.content.push_str(text);
    }

    /// Remove the last character, if any
    pub fn backspace(&mut self) -> bool {
        self.content.pop().is_some()
    }

    /// Editing keys while the overlay holds focus
    pub fn handle_key(&mut self, key: &Key, modifiers: Modifiers) -> OverlayKeyResult {
        match key {
            Key::Enter if modifiers.shift => {
                self.content.push('\n');
                OverlayKeyResult::Edited
            }
            Key::Enter => OverlayKeyResult::Commit,
            Key::Escape => OverlayKeyResult::Cancel,
            Key::Backspace => {
                if self.backspace() {
                    OverlayKeyResult::Edited
                } else {
                    OverlayKeyResult::Ignored
                }
            }
            _ => OverlayKeyResult::Ignored,
        }
    }

    /// Close the overlay. Blank content yields no shape.
    pub fn finish(self) -> Option<Shape> {
        if self.content.trim().is_empty() {
            return None;
        }
        Some(Shape::Text(TextShape {
            anchor: self.anchor,
            font_size: self.font_size * self.scale,
            content: self.content,
            color: self.color,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_computes_backing_baseline() {
        let t = ScreenTransform::from_device_pixel_ratio(2.0);
        let overlay = TextOverlay::open(Point::new(10.0, 20.0), &t, 24.0, ShapeColor::RED);
        assert_eq!(overlay.anchor.x, 20.0);
        // 40 + 24 * 0.8 * 2
        assert!((overlay.anchor.y - 78.4).abs() < 1e-4);
    }

    #[test]
    fn test_finish_scales_font_size() {
        let t = ScreenTransform::from_device_pixel_ratio(2.0);
        let mut overlay = TextOverlay::open(Point::new(0.0, 0.0), &t, 24.0, ShapeColor::RED);
        overlay.insert_str("hello");
        let Some(Shape::Text(text)) = overlay.finish() else {
            panic!("expected a text shape");
        };
        assert_eq!(text.font_size, 48.0);
        assert_eq!(text.content, "hello");
    }

    #[test]
    fn test_blank_content_is_discarded() {
        let t = ScreenTransform::identity();
        let mut overlay = TextOverlay::open(Point::new(0.0, 0.0), &t, 24.0, ShapeColor::RED);
        overlay.insert_str("  \t ");
        assert_eq!(overlay.finish(), None);
    }

    #[test]
    fn test_editing_keys() {
        let t = ScreenTransform::identity();
        let mut overlay = TextOverlay::open(Point::new(0.0, 0.0), &t, 24.0, ShapeColor::RED);
        overlay.insert_str("ab");
        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        assert_eq!(
            overlay.handle_key(&Key::Enter, shift),
            OverlayKeyResult::Edited
        );
        assert_eq!(
            overlay.handle_key(&Key::Backspace, Modifiers::default()),
            OverlayKeyResult::Edited
        );
        assert_eq!(overlay.content(), "ab");
        assert_eq!(
            overlay.handle_key(&Key::Enter, Modifiers::default()),
            OverlayKeyResult::Commit
        );
        assert_eq!(
            overlay.handle_key(&Key::Escape, Modifiers::default()),
            OverlayKeyResult::Cancel
        );
        assert_eq!(
            overlay.handle_key(&Key::Character("z".into()), Modifiers::default()),
            OverlayKeyResult::Ignored
        );
    }
}
