//! Screenshot annotation editor core
//!
//! An [`EditorSession`] holds a captured bitmap and the shapes drawn over it
//! (arrows, rectangles, ellipses, text). Hosts feed it [`InputEvent`]s in
//! display coordinates and present the recomposed frame; the flattened result
//! is exported as PNG.

pub mod annotations;
pub mod capture;
pub mod config;
pub mod domain;
pub mod render;
pub mod session;

pub use config::EditorConfig;
pub use domain::{Point, Shape, ShapeColor, Tool};
pub use session::EditorSession;
pub use session::messages::{Effect, InputEvent};
