//! Input text splitting.
//!
//! Two low-level scanners used throughout the engine: [`split_top_level`]
//! breaks a line into sub-commands at unescaped separators (alias
//! expansions use `;`), and [`tokenize`] breaks an argument string into
//! words on runs of separator characters.

/// Splits `input` into segments at unescaped occurrences of `sep`.
///
/// A backslash immediately before `sep` escapes it: the backslash is
/// dropped and the separator kept as literal text. Any other backslash
/// passes through unchanged. Leading spaces of each segment are
/// stripped and empty segments are dropped, so `"; ;a"` yields `["a"]`.
pub fn split_top_level(input: &str, sep: char) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&sep) {
            current.push(sep);
            chars.next();
        } else if c == sep {
            push_segment(&mut segments, &mut current);
        } else {
            current.push(c);
        }
    }
    push_segment(&mut segments, &mut current);

    segments
}

fn push_segment(segments: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim_start_matches(' ');
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
    current.clear();
}

/// Splits `input` into tokens on runs of any character in `separators`.
///
/// `max_tokens == 0` means unlimited. With a positive `max_tokens`, the
/// final token absorbs all remaining text, embedded separators included.
/// Scanning stops at the first literal CR or LF in either mode.
pub fn tokenize(input: &str, separators: &str, max_tokens: usize) -> Vec<String> {
    let end = input
        .find(|c| c == '\r' || c == '\n')
        .unwrap_or(input.len());
    let input = &input[..end];

    let is_sep = |c: char| separators.contains(c);
    let mut tokens = Vec::new();
    let mut rest = input.trim_start_matches(is_sep);

    while !rest.is_empty() {
        if max_tokens > 0 && tokens.len() == max_tokens - 1 {
            tokens.push(rest.to_string());
            break;
        }
        match rest.find(is_sep) {
            Some(pos) => {
                tokens.push(rest[..pos].to_string());
                rest = rest[pos..].trim_start_matches(is_sep);
            }
            None => {
                tokens.push(rest.to_string());
                break;
            }
        }
    }

    tokens
}
