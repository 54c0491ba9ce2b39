//! Placeholder scanning for the positional `?` markers the statement builder
//! emits.
//!
//! Both clause assembly and the SQLite backend speak bare `?` markers; the
//! Postgres wire protocol wants `$1..$n`. The scanner walks the statement text
//! once, skipping string literals and comments, so markers inside quoted text
//! are left alone.

use std::borrow::Cow;

#[derive(Clone)]
enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
}

fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'-') && bytes.get(idx + 1) == Some(&b'-')
}

fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'/') && bytes.get(idx + 1) == Some(&b'*')
}

fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'*') && bytes.get(idx + 1) == Some(&b'/')
}

/// Walk `sql` once, invoking `on_marker` for each bare `?` outside literals
/// and comments. `on_marker` receives the running 1-based marker ordinal and
/// returns replacement text, or `None` to keep the marker as-is.
fn scan_markers(sql: &str, mut on_marker: impl FnMut(usize) -> Option<String>) -> Cow<'_, str> {
    let bytes = sql.as_bytes();
    let mut out: Option<Vec<u8>> = None;
    let mut state = State::Normal;
    let mut ordinal = 0usize;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        let mut replaced = false;
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => state = State::BlockComment(1),
                b'?' => {
                    ordinal += 1;
                    if let Some(replacement) = on_marker(ordinal) {
                        let buf = out.get_or_insert_with(|| bytes[..idx].to_vec());
                        buf.extend_from_slice(replacement.as_bytes());
                        replaced = true;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                } else if is_block_comment_end(bytes, idx) {
                    if depth == 1 {
                        state = State::Normal;
                    } else {
                        state = State::BlockComment(depth - 1);
                    }
                }
            }
        }

        if let Some(ref mut buf) = out
            && !replaced
        {
            buf.push(b);
        }

        idx += 1;
    }

    match out {
        // Only ASCII was spliced in, so the buffer is still valid UTF-8.
        Some(buf) => Cow::Owned(String::from_utf8_lossy(&buf).into_owned()),
        None => Cow::Borrowed(sql),
    }
}

/// Rewrite bare `?` markers to Postgres-style `$1..$n`, numbered
/// left-to-right. Returns a borrowed `Cow` when the text carries no markers.
#[must_use]
pub fn to_numbered_placeholders(sql: &str) -> Cow<'_, str> {
    scan_markers(sql, |ordinal| Some(format!("${ordinal}")))
}

/// Count the bare `?` markers in `sql`, ignoring literals and comments.
///
/// The executor compares this count against the flattened parameter list
/// before dispatch; marker *i* must line up with parameter *i*.
#[must_use]
pub fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    let _ = scan_markers(sql, |ordinal| {
        count = ordinal;
        None
    });
    count
}
