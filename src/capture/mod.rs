//! Boundary with the capture layer
//!
//! This module consolidates:
//! - Background bitmap decoding and PNG export (image.rs)
//! - Page-region selection and cropping (region.rs)

pub mod image;
pub mod region;
