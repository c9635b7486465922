//! Line framing for the completion event stream.
//!
//! The endpoint sends newline-delimited records:
//!
//! ```text
//! : keep-alive comment
//!
//! data: {"choices":[{"delta":{"content":"Hi"}}]}
//!
//! data: [DONE]
//! ```
//!
//! Only `data: ` lines carry payloads. Blank lines, `:` comments and any
//! other field are skipped.
//!
//! # Examples
//!
//! ```
//! use tutor_chat::chat::frames::{classify_line, Frame};
//!
//! assert_eq!(classify_line("data: [DONE]"), Frame::Done);
//! assert_eq!(classify_line(": ping"), Frame::Skip);
//! assert_eq!(classify_line("data: {\"a\":1}\r"), Frame::Data("{\"a\":1}"));
//! ```

/// Prefix that marks a data frame.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that terminates the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Classification of one stream line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
    /// Blank, comment, or non-data line.
    Skip,
    /// The terminal sentinel.
    Done,
    /// A data payload with the prefix and surrounding whitespace removed.
    Data(&'a str),
}

/// Classify a single line (without its `\n`). A trailing `\r` is ignored.
pub fn classify_line(line: &str) -> Frame<'_> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() || line.starts_with(':') {
        return Frame::Skip;
    }
    let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
        return Frame::Skip;
    };
    let payload = rest.trim();
    if payload == DONE_SENTINEL {
        Frame::Done
    } else {
        Frame::Data(payload)
    }
}

/// Find the next complete line in `buffer` starting at byte `start`.
///
/// Returns the line (without its `\n`) and the offset just past the
/// delimiter, or `None` when no delimiter remains.
pub fn next_line(buffer: &str, start: usize) -> Option<(&str, usize)> {
    let rest = buffer.get(start..)?;
    let newline = rest.find('\n')?;
    Some((&rest[..newline], start + newline + 1))
}
