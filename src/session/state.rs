use image::RgbaImage;

use crate::annotations::handlers;
use crate::annotations::history::ShapeHistory;
use crate::annotations::text_overlay::TextOverlay;
use crate::capture::image::{BackgroundImage, encode_png, encode_png_data_uri};
use crate::config::EditorConfig;
use crate::domain::{Point, ScreenTransform, Shape, ShapeColor, Tool};
use crate::render::image::{CanvasSurface, Scene};
use crate::render::text::TextRasterizer;
use crate::session::messages::{Effect, InputEvent};

/// Pointer interaction in progress
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    /// Drawable tool held down; `draft` appears after the first move
    Drawing { anchor: Point, draft: Option<Shape> },
    /// Selected shape follows the pointer, keeping `offset` from its anchor
    Dragging {
        index: usize,
        offset: Point,
        moved: bool,
    },
    /// Text overlay open and holding input focus
    EditingText(TextOverlay),
}

/// Style applied to newly created shapes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToolStyle {
    pub color: ShapeColor,
    /// Stroke width in backing pixels
    pub line_width: f32,
    /// Text size in display pixels, scaled to backing pixels on commit
    pub font_size: f32,
}

impl From<&EditorConfig> for ToolStyle {
    fn from(config: &EditorConfig) -> Self {
        Self {
            color: config.stroke_color,
            line_width: config.line_width,
            font_size: config.font_size,
        }
    }
}

/// One annotation session over a single screenshot
///
/// Owns the background, the shape history, the selection and the canvas
/// surface. All mutation happens through `&mut self`; the surface is
/// recomposed after every change so `frame()` is always current.
#[derive(Debug)]
pub struct EditorSession {
    pub(crate) background: BackgroundImage,
    pub(crate) transform: ScreenTransform,
    pub(crate) history: ShapeHistory,
    pub(crate) selection: Option<usize>,
    pub(crate) tool: Tool,
    pub(crate) interaction: Interaction,
    pub(crate) style: ToolStyle,
    surface: CanvasSurface,
}

impl EditorSession {
    /// Start a session, loading the configured (or a system) font for text
    pub fn new(
        background: BackgroundImage,
        device_pixel_ratio: f32,
        config: &EditorConfig,
    ) -> anyhow::Result<Self> {
        let text = TextRasterizer::load(config.font_path.as_deref());
        Self::with_text_rasterizer(background, device_pixel_ratio, config, text)
    }

    /// Start a session with an explicit text rasterizer
    pub fn with_text_rasterizer(
        background: BackgroundImage,
        device_pixel_ratio: f32,
        config: &EditorConfig,
        text: TextRasterizer,
    ) -> anyhow::Result<Self> {
        let surface = CanvasSurface::new(
            background.width(),
            background.height(),
            text,
            config.selection_color,
        )?;
        let transform = ScreenTransform::from_device_pixel_ratio(device_pixel_ratio);
        let (display_w, display_h) = transform.display_size(background.width(), background.height());
        log::info!(
            "Editor session {}x{} px, displayed at {}x{} (ratio {})",
            background.width(),
            background.height(),
            display_w,
            display_h,
            transform.scale
        );

        let mut session = Self {
            background,
            transform,
            history: ShapeHistory::new(),
            selection: None,
            tool: Tool::default(),
            interaction: Interaction::Idle,
            style: ToolStyle::from(config),
            surface,
        };
        session.redraw();
        Ok(session)
    }

    /// Decode a bitmap payload and start a session. Decode failure is an
    /// error: there is no editor without a background.
    pub fn load(
        payload: &[u8],
        device_pixel_ratio: f32,
        config: &EditorConfig,
    ) -> anyhow::Result<Self> {
        let background = BackgroundImage::decode(payload)?;
        Self::new(background, device_pixel_ratio, config)
    }

    pub fn shapes(&self) -> &[Shape] {
        self.history.shapes()
    }

    pub fn history(&self) -> &ShapeHistory {
        &self.history
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn style(&self) -> ToolStyle {
        self.style
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn transform(&self) -> ScreenTransform {
        self.transform
    }

    /// Shape being drawn, not yet committed
    pub fn draft(&self) -> Option<&Shape> {
        match &self.interaction {
            Interaction::Drawing { draft, .. } => draft.as_ref(),
            _ => None,
        }
    }

    pub fn text_overlay(&self) -> Option<&TextOverlay> {
        match &self.interaction {
            Interaction::EditingText(overlay) => Some(overlay),
            _ => None,
        }
    }

    /// Size of the canvas in backing pixels
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.surface.width(), self.surface.height())
    }

    /// Size the canvas should be displayed at
    pub fn display_size(&self) -> (f32, f32) {
        self.transform
            .display_size(self.surface.width(), self.surface.height())
    }

    /// Canvas moved within the host viewport
    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.transform = self.transform.with_origin(origin);
    }

    /// Canvas displayed at a different width than the ratio implies
    pub fn set_display_width(&mut self, display_width: f32) {
        self.transform =
            ScreenTransform::from_sizes(self.surface.width(), display_width).with_origin(self.transform.origin);
    }

    /// Feed one input event and collect what the host has to mirror
    pub fn handle(&mut self, event: InputEvent) -> Vec<Effect> {
        handlers::handle_input(self, event)
    }

    /// Activate a tool, committing any open text overlay
    pub fn select_tool(&mut self, tool: Tool) -> Vec<Effect> {
        handlers::select_tool(self, tool)
    }

    /// Append a shape on top and invalidate redo
    pub fn commit(&mut self, shape: Shape) {
        self.history.commit(shape);
        self.redraw();
    }

    /// Returns whether anything was undone
    pub fn undo(&mut self) -> bool {
        if !self.history.undo() {
            return false;
        }
        if self
            .selection
            .is_some_and(|index| index >= self.history.len())
        {
            self.selection = None;
        }
        self.redraw();
        true
    }

    /// Returns whether anything was redone
    pub fn redo(&mut self) -> bool {
        if !self.history.redo() {
            return false;
        }
        self.redraw();
        true
    }

    /// Remove the shape at `index`; clears the selection and redo buffer
    pub fn delete_at(&mut self, index: usize) -> Option<Shape> {
        let removed = self.history.delete_at(index)?;
        log::debug!("deleted {} at {}", removed.kind(), index);
        self.selection = None;
        if matches!(self.interaction, Interaction::Dragging { .. }) {
            self.interaction = Interaction::Idle;
        }
        self.redraw();
        Some(removed)
    }

    /// Remove the selected shape, if any
    pub fn delete_selected(&mut self) -> Option<Shape> {
        let index = self.selection?;
        self.delete_at(index)
    }

    /// Recompose the on-screen frame
    pub(crate) fn redraw(&mut self) {
        self.compose(true);
    }

    fn compose(&mut self, include_transient: bool) {
        let draft = match &self.interaction {
            Interaction::Drawing { draft, .. } if include_transient => draft.as_ref(),
            _ => None,
        };
        let scene = Scene {
            background: Some(&self.background.pixmap),
            shapes: self.history.shapes(),
            draft,
            selection: self.selection.filter(|_| include_transient),
        };
        self.surface.render(&scene);
    }

    /// Current on-screen frame, including draft and selection indicator
    pub fn frame(&self) -> RgbaImage {
        self.surface.to_rgba_image()
    }

    /// Flattened background plus committed shapes.
    ///
    /// An open text overlay is committed first, as if it lost focus. The draft
    /// and the selection indicator are left out.
    pub fn export_image(&mut self) -> RgbaImage {
        if let Interaction::EditingText(_) = self.interaction {
            handlers::close_text_overlay(self, true);
        }
        self.compose(false);
        let image = self.surface.to_rgba_image();
        self.compose(true);
        log::info!(
            "Exported {}x{} image with {} shapes",
            image.width(),
            image.height(),
            self.history.len()
        );
        image
    }

    /// Export as PNG bytes
    pub fn export_png(&mut self) -> anyhow::Result<Vec<u8>> {
        encode_png(&self.export_image())
    }

    /// Export as a `data:image/png;base64,` URI
    pub fn export_data_uri(&mut self) -> anyhow::Result<String> {
        encode_png_data_uri(&self.export_image())
    }
}
