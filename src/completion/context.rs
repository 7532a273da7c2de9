//! Cursor context detection.
//!
//! Given the input line and the cursor position, work out what kind of
//! thing sits under the cursor: a command name, an argument of a known
//! command, or free chat text. All positions are byte offsets; the
//! cursor is expected to sit on a character boundary (the line editor
//! indexes by characters).

use crate::commands::dispatcher::is_command;

/// What the cursor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// Nothing to complete.
    None,
    /// Nickname in chat text (or an argument that fell back to nicks).
    Nick,
    /// The command name itself, right after the marker.
    Command,
    /// An argument of a command.
    CommandArg,
    /// Free chat text; resolved to nick or filename completion later.
    Auto,
}

/// Parsed completion context for one (line, cursor) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// What the cursor is on.
    pub kind: ContextKind,
    /// Command name for [`ContextKind::CommandArg`].
    pub base_command: Option<String>,
    /// Which argument the cursor is in (0 = the command name itself).
    pub arg_index: usize,
    /// Everything after the first space run, if any.
    pub args: Option<String>,
    /// The word being completed. Includes the marker in Command context.
    pub base_word: String,
    /// Byte offset where the base word starts.
    pub base_word_start: usize,
    /// Byte offset where replacement text goes (past the marker in
    /// Command context).
    pub replace_position: usize,
}

impl Default for Context {
    fn default() -> Self {
        Self::none()
    }
}

impl Context {
    fn none() -> Self {
        Self {
            kind: ContextKind::None,
            base_command: None,
            arg_index: 0,
            args: None,
            base_word: String::new(),
            base_word_start: 0,
            replace_position: 0,
        }
    }
}

/// Determines the completion context at `cursor` in `line`.
///
/// The argument index is the number of space runs left of the cursor.
/// The base word is the run of non-spaces around the cursor; a cursor
/// sitting on the space right after a word still belongs to that word.
/// Auto context with an empty base word is demoted to
/// [`ContextKind::None`] so pasting text that happens to contain tab
/// characters never triggers completion.
pub fn find_context(line: &str, cursor: usize) -> Context {
    if line.is_empty() {
        return Context::none();
    }
    let bytes = line.as_bytes();
    let cursor = cursor.min(line.len());
    let command_line = is_command(line);

    let mut arg_index = 0;
    let mut args_start = None;
    let mut i = 0;
    while i < cursor {
        if bytes[i] == b' ' {
            arg_index += 1;
            while i < cursor && bytes[i] == b' ' {
                i += 1;
            }
            if args_start.is_none() {
                args_start = Some(i);
            }
        } else {
            i += 1;
        }
    }

    let mut kind = if command_line && arg_index == 0 {
        ContextKind::Command
    } else if command_line {
        ContextKind::CommandArg
    } else {
        ContextKind::Auto
    };

    let (start, end) = base_word_bounds(bytes, cursor);
    let base_word = line[start..end].to_string();

    if kind == ContextKind::Auto && base_word.is_empty() {
        kind = ContextKind::None;
    }

    let base_command = if kind == ContextKind::CommandArg {
        line[1..].split(' ').next().map(str::to_string)
    } else {
        None
    };

    let replace_position = if kind == ContextKind::Command {
        start + 1
    } else {
        start
    };

    Context {
        kind,
        base_command,
        arg_index,
        args: args_start.map(|s| line[s..].to_string()),
        base_word,
        base_word_start: start,
        replace_position,
    }
}

/// Bounds of the word the cursor belongs to, as a half-open byte range.
fn base_word_bounds(bytes: &[u8], cursor: usize) -> (usize, usize) {
    if cursor < bytes.len() && bytes[cursor] == b' ' {
        if cursor > 0 && bytes[cursor - 1] != b' ' {
            // cursor on the space right after a word
            let mut start = cursor;
            while start > 0 && bytes[start - 1] != b' ' {
                start -= 1;
            }
            (start, cursor)
        } else {
            (cursor, cursor)
        }
    } else {
        let mut start = cursor;
        while start > 0 && bytes[start - 1] != b' ' {
            start -= 1;
        }
        let mut end = cursor;
        while end < bytes.len() && bytes[end] != b' ' {
            end += 1;
        }
        (start, end)
    }
}
