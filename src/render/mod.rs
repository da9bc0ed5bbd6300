//! Annotation rendering module
//!
//! This module contains:
//! - Geometry calculations shared by rendering and hit testing
//! - Canvas composition using tiny-skia
//! - Glyph rasterization for text shapes

pub mod geometry;
pub mod image;
pub mod text;
