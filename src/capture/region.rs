//! Page-region selection and cropping of the captured viewport
//!
//! The selection is dragged in CSS pixels over the page; the captured bitmap
//! is at device resolution, so the crop multiplies by the device pixel ratio.

use image::RgbaImage;

use crate::domain::{Bounds, Point, Rect};

/// Selections must be strictly larger than this in both dimensions (CSS px)
pub const MIN_REGION_SIZE: f32 = 5.0;

/// Selected page area in CSS pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CaptureArea {
    /// Pixel rectangle of this area in a bitmap captured at `dpr`
    pub fn to_pixel_rect(&self, dpr: f32) -> Rect {
        // float to int casts saturate; the sums must too
        let left = (self.x * dpr).round() as i32;
        let top = (self.y * dpr).round() as i32;
        Rect::new(
            left,
            top,
            left.saturating_add((self.width * dpr).round() as i32),
            top.saturating_add((self.height * dpr).round() as i32),
        )
    }
}

/// Drag-to-select state for the region capture step
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RegionSelector {
    start: Option<Point>,
    current: Option<Point>,
}

impl RegionSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selecting(&self) -> bool {
        self.start.is_some()
    }

    pub fn begin(&mut self, at: Point) {
        self.start = Some(at);
        self.current = Some(at);
    }

    pub fn update(&mut self, at: Point) {
        if self.start.is_some() {
            self.current = Some(at);
        }
    }

    /// Rectangle being dragged, normalized
    pub fn current_area(&self) -> Option<CaptureArea> {
        let bounds = Bounds::from_corners(self.start?, self.current?);
        Some(CaptureArea {
            x: bounds.min_x,
            y: bounds.min_y,
            width: bounds.width(),
            height: bounds.height(),
        })
    }

    /// End the drag; yields an area only when it is larger than the minimum
    pub fn finish(&mut self, at: Point) -> Option<CaptureArea> {
        self.update(at);
        let area = self.current_area();
        self.cancel();
        let area = area?;
        if area.width > MIN_REGION_SIZE && area.height > MIN_REGION_SIZE {
            Some(area)
        } else {
            log::debug!(
                "Ignoring region {}x{} below minimum size",
                area.width,
                area.height
            );
            None
        }
    }

    /// Abandon the selection (Escape)
    pub fn cancel(&mut self) {
        self.start = None;
        self.current = None;
    }
}

/// Crop a captured viewport bitmap to `area`, clamped to the bitmap bounds
pub fn crop_to_area(img: &RgbaImage, area: &CaptureArea, dpr: f32) -> Option<RgbaImage> {
    let rect = area
        .to_pixel_rect(dpr)
        .intersect(Rect::from_size(img.width(), img.height()))?;
    let dims = rect.dimensions()?;
    Some(
        image::imageops::crop_imm(
            img,
            rect.left as u32,
            rect.top as u32,
            dims.width(),
            dims.height(),
        )
        .to_image(),
    )
}
