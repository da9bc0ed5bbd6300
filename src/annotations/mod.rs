//! Shape history, hit testing, text entry, and input handlers
//!
//! This module provides:
//! - Ordered shape history with undo/redo (history.rs)
//! - Point-in-shape tests for selection (hit_test.rs)
//! - The transient text overlay (text_overlay.rs)
//! - Per-tool input handlers (handlers.rs)

pub mod handlers;
pub mod history;
pub mod text_overlay;
