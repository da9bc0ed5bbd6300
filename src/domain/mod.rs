//! Pure domain types with minimal dependencies
//!
//! Shapes, geometry, tools and the display/backing transform. Nothing here
//! knows about rendering or input handling.

pub mod annotation;
pub mod geometry;
pub mod selection;
pub mod transform;

pub use annotation::*;
pub use geometry::*;
pub use selection::*;
pub use transform::*;
