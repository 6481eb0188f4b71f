//! Report key derivation for grouping repeated faults.
//!
//! The key combines the message, the source file and line, and the first
//! stack frame, so that the same fault raised from the same place collapses
//! into one group while identical messages from different places stay apart.

use super::record::ErrorRecord;

/// Derive the grouping key for a record: message, filename, line, and first
/// stack frame joined with `|`. Missing components are left empty so the key
/// shape stays stable.
pub fn report_key(record: &ErrorRecord) -> String {
    let first_frame = record
        .stack
        .as_deref()
        .and_then(first_frame)
        .unwrap_or_default();

    let (file, line) = frame_location(first_frame).unwrap_or_default();

    format!(
        "{}|{}|{}|{}",
        record.message,
        file,
        line.map(|l| l.to_string()).unwrap_or_default(),
        first_frame
    )
}

/// First non-empty line of the stack text.
fn first_frame(stack: &str) -> Option<&str> {
    stack.lines().map(str::trim).find(|line| !line.is_empty())
}

/// Extract a `file:line` location from a stack frame.
///
/// Handles the synthesized panic frames (`at src/view.rs:42`) as well as
/// backtrace-style frames with a trailing column (`at ./src/view.rs:42:17`).
fn frame_location(frame: &str) -> Option<(String, Option<u32>)> {
    // Scan tokens for something that looks like path:line[:column].
    for token in frame.split_whitespace() {
        let token = token.trim_matches(|c| matches!(c, '(' | ')' | ',' | '<' | '>'));
        let mut parts = token.rsplitn(3, ':');

        let last = parts.next()?;
        let middle = parts.next();
        let rest = parts.next();

        match (rest, middle) {
            // path:line:column
            (Some(path), Some(line)) if is_line_number(line) && is_line_number(last) => {
                return Some((path.to_string(), line.parse().ok()));
            },
            // path:line
            (None, Some(path)) if !path.is_empty() && is_line_number(last) => {
                return Some((path.to_string(), last.parse().ok()));
            },
            _ => {},
        }
    }
    None
}

fn is_line_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
