use crate::session::messages::{Command, Key, Modifiers};

/// Map a key press to an editor command.
///
/// Callers must not route keys here while the text overlay holds focus; the
/// overlay's own editing keys take precedence there.
pub fn handle_key_event(key: &Key, modifiers: Modifiers, has_selection: bool) -> Option<Command> {
    match key {
        // Undo/redo shortcuts
        Key::Character(c)
            if c.eq_ignore_ascii_case("z") && modifiers.command() && !modifiers.shift =>
        {
            Some(Command::Undo)
        }
        Key::Character(c)
            if (c.eq_ignore_ascii_case("y") && modifiers.command())
                || (c.eq_ignore_ascii_case("z") && modifiers.command() && modifiers.shift) =>
        {
            Some(Command::Redo)
        }
        // Delete selected shape
        Key::Delete | Key::Backspace if has_selection => Some(Command::DeleteSelected),
        _ => None,
    }
}
