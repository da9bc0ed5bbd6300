//! Input handlers
//!
//! Routes InputEvent to the active tool and reports the Effects a host must
//! mirror. Pointer positions arrive in display coordinates and are mapped to
//! backing pixels here.

use crate::annotations::hit_test::topmost_hit;
use crate::annotations::text_overlay::{OverlayKeyResult, TextOverlay};
use crate::domain::{Point, Shape, ShapeColor, StrokeShape, Tool};
use crate::session::messages::{Command, Effect, InputEvent, Key, Modifiers};
use crate::session::shortcuts::handle_key_event;
use crate::session::state::{EditorSession, Interaction, ToolStyle};

/// Handle one input event, modifying the session
pub fn handle_input(session: &mut EditorSession, event: InputEvent) -> Vec<Effect> {
    match event {
        InputEvent::PointerDown { x, y } => handle_pointer_down(session, Point::new(x, y)),
        InputEvent::PointerMove { x, y } => handle_pointer_move(session, Point::new(x, y)),
        InputEvent::PointerUp { x, y } => handle_pointer_up(session, Point::new(x, y)),
        InputEvent::Key { key, modifiers } => handle_key(session, &key, modifiers),
        InputEvent::Text { text } => handle_text(session, &text),
        InputEvent::Blur => close_text_overlay(session, true),
        InputEvent::SelectTool { tool } => select_tool(session, tool),
        InputEvent::SetColor { color } => set_color(session, color),
        InputEvent::SetLineWidth { width } => set_line_width(session, width),
        InputEvent::SetFontSize { size } => set_font_size(session, size),
    }
}

// ============================================================================
// Pointer handlers
// ============================================================================

fn handle_pointer_down(session: &mut EditorSession, display: Point) -> Vec<Effect> {
    let point = session.transform.to_backing(display);
    match session.tool {
        Tool::Text => {
            // a click outside the open overlay confirms it; the next click opens a new one
            if matches!(session.interaction, Interaction::EditingText(_)) {
                return close_text_overlay(session, true);
            }
            let overlay = TextOverlay::open(
                display,
                &session.transform,
                session.style.font_size,
                session.style.color,
            );
            let effect = Effect::TextOverlayOpened {
                position: overlay.display_anchor,
                font_size: overlay.font_size,
                color: overlay.color,
            };
            session.interaction = Interaction::EditingText(overlay);
            vec![effect]
        }
        Tool::Select => {
            let hit = topmost_hit(point, session.history.shapes());
            session.selection = hit;
            let target = hit.and_then(|index| Some((index, session.history.get(index)?)));
            session.interaction = match target {
                Some((index, shape)) => {
                    log::debug!("selected {} at {}", shape.kind(), index);
                    Interaction::Dragging {
                        index,
                        offset: point.delta_from(shape.anchor()),
                        moved: false,
                    }
                }
                None => Interaction::Idle,
            };
            session.redraw();
            vec![Effect::Redraw]
        }
        Tool::Arrow | Tool::Rectangle | Tool::Ellipse => {
            session.interaction = Interaction::Drawing {
                anchor: point,
                draft: None,
            };
            Vec::new()
        }
    }
}

fn handle_pointer_move(session: &mut EditorSession, display: Point) -> Vec<Effect> {
    let point = session.transform.to_backing(display);
    match session.interaction {
        Interaction::Drawing { anchor, .. } => {
            let draft = build_shape(session.tool, anchor, point, &session.style);
            session.interaction = Interaction::Drawing { anchor, draft };
            session.redraw();
            vec![Effect::Redraw]
        }
        Interaction::Dragging { index, offset, .. } => {
            let Some(shape) = session.history.get(index) else {
                session.interaction = Interaction::Idle;
                return Vec::new();
            };
            let target = point.delta_from(offset);
            let delta = target.delta_from(shape.anchor());
            if delta == Point::default() || !session.history.translate_at(index, delta) {
                return Vec::new();
            }
            session.interaction = Interaction::Dragging {
                index,
                offset,
                moved: true,
            };
            session.redraw();
            vec![Effect::Redraw]
        }
        _ => Vec::new(),
    }
}

fn handle_pointer_up(session: &mut EditorSession, display: Point) -> Vec<Effect> {
    let point = session.transform.to_backing(display);
    match std::mem::take(&mut session.interaction) {
        Interaction::Drawing { anchor, .. } => {
            // release position is the final end point, even without a prior move
            match build_shape(session.tool, anchor, point, &session.style) {
                Some(shape) if !shape.is_degenerate() => {
                    log::debug!("committing {}", shape.kind());
                    session.commit(shape);
                }
                _ => {
                    log::debug!("discarding zero-size draft");
                    session.redraw();
                }
            }
            vec![Effect::Redraw]
        }
        Interaction::Dragging { moved, .. } => {
            // a move is an edit in place; stale redo entries no longer apply
            session.history.clear_redo();
            if !moved {
                return Vec::new();
            }
            session.selection = None;
            session.redraw();
            vec![Effect::Redraw]
        }
        other => {
            session.interaction = other;
            Vec::new()
        }
    }
}

/// Shape a drawable tool produces between two backing-space points
fn build_shape(tool: Tool, start: Point, end: Point, style: &ToolStyle) -> Option<Shape> {
    let stroke = StrokeShape::new(start, end, style.color, style.line_width);
    match tool {
        Tool::Arrow => Some(Shape::Arrow(stroke)),
        Tool::Rectangle => Some(Shape::Rectangle(stroke)),
        Tool::Ellipse => Some(Shape::Ellipse(stroke)),
        Tool::Text | Tool::Select => None,
    }
}

// ============================================================================
// Keyboard and text handlers
// ============================================================================

fn handle_key(session: &mut EditorSession, key: &Key, modifiers: Modifiers) -> Vec<Effect> {
    if let Interaction::EditingText(overlay) = &mut session.interaction {
        // the overlay owns the keyboard; shortcuts stay suppressed
        let result = overlay.handle_key(key, modifiers);
        return match result {
            OverlayKeyResult::Commit => close_text_overlay(session, true),
            OverlayKeyResult::Cancel => close_text_overlay(session, false),
            OverlayKeyResult::Edited | OverlayKeyResult::Ignored => Vec::new(),
        };
    }

    let Some(command) = handle_key_event(key, modifiers, session.selection.is_some()) else {
        return Vec::new();
    };
    log::debug!("shortcut {:?}", command);
    let changed = match command {
        Command::Undo => session.undo(),
        Command::Redo => session.redo(),
        Command::DeleteSelected => session.delete_selected().is_some(),
    };
    if changed {
        vec![Effect::Redraw]
    } else {
        Vec::new()
    }
}

fn handle_text(session: &mut EditorSession, text: &str) -> Vec<Effect> {
    if let Interaction::EditingText(overlay) = &mut session.interaction {
        overlay.insert_str(text);
    }
    Vec::new()
}

/// Close the open text overlay, committing its content when `commit` is set
pub fn close_text_overlay(session: &mut EditorSession, commit: bool) -> Vec<Effect> {
    let overlay = match std::mem::take(&mut session.interaction) {
        Interaction::EditingText(overlay) => overlay,
        other => {
            session.interaction = other;
            return Vec::new();
        }
    };

    let shape = if commit { overlay.finish() } else { None };
    match shape {
        Some(shape) => {
            log::debug!("committing text");
            session.commit(shape);
            vec![
                Effect::TextOverlayClosed { committed: true },
                Effect::Redraw,
            ]
        }
        None => vec![Effect::TextOverlayClosed { committed: false }],
    }
}

// ============================================================================
// Tool and style handlers
// ============================================================================

/// Activate a tool. Any open overlay is committed and the selection cleared.
pub fn select_tool(session: &mut EditorSession, tool: Tool) -> Vec<Effect> {
    let mut effects = close_text_overlay(session, true);
    log::debug!("tool {:?} -> {:?}", session.tool, tool);
    session.tool = tool;
    session.selection = None;
    session.interaction = Interaction::Idle;
    session.redraw();
    if !effects.contains(&Effect::Redraw) {
        effects.push(Effect::Redraw);
    }
    effects
}

fn set_color(session: &mut EditorSession, color: ShapeColor) -> Vec<Effect> {
    session.style.color = color;
    if let Interaction::EditingText(overlay) = &mut session.interaction {
        overlay.color = color;
    }
    Vec::new()
}

fn set_line_width(session: &mut EditorSession, width: f32) -> Vec<Effect> {
    if width.is_finite() && width > 0.0 {
        session.style.line_width = width;
    } else {
        log::warn!("ignoring line width {}", width);
    }
    Vec::new()
}

fn set_font_size(session: &mut EditorSession, size: f32) -> Vec<Effect> {
    if !(size.is_finite() && size > 0.0) {
        log::warn!("ignoring font size {}", size);
        return Vec::new();
    }
    session.style.font_size = size;
    if let Interaction::EditingText(overlay) = &mut session.interaction {
        overlay.font_size = size;
    }
    Vec::new()
}
