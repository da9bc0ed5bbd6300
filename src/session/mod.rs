//! Editor session management
//!
//! This module contains:
//! - The editor session and its interaction state
//! - Input event and effect types
//! - Keyboard shortcut mapping

pub mod messages;
pub mod shortcuts;
pub mod state;

pub use state::EditorSession;
