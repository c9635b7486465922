//! Stream session: decoding and reassembly of one in-flight response.
//!
//! Bytes are decoded as UTF-8 and appended to a raw buffer. Complete lines
//! are consumed in order; a data frame whose JSON does not parse is left at
//! the front of the buffer and retried when the next chunk arrives. Partial
//! frames are deferred, never dropped.
//!
//! # Examples
//!
//! ```
//! use tutor_chat::chat::session::StreamSession;
//!
//! let mut session = StreamSession::new();
//! let first = session.feed(b"data: {\"choices\":[{\"delta\":{\"content\":\"Hel");
//! assert!(first.deltas.is_empty());
//! let second = session.feed(b"lo\"}}]}\n\ndata: [DONE]\n");
//! assert_eq!(second.deltas, vec!["Hello".to_string()]);
//! assert!(second.done);
//! assert_eq!(session.assembled_text(), "Hello");
//! ```

use uuid::Uuid;

use super::completions::extract_delta;
use super::frames::{Frame, classify_line, next_line};
use super::utf8::Utf8Decoder;
use crate::error::ChatError;

/// Result of feeding one chunk into a [`StreamSession`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedResult {
    /// Text deltas extracted from this chunk, in stream order.
    pub deltas: Vec<String>,
    /// Whether the terminal sentinel has been seen.
    pub done: bool,
    /// Whether line consumption stopped at an unparseable data frame.
    pub deferred: bool,
}

/// Transient state for one in-flight request.
#[derive(Debug)]
pub struct StreamSession {
    id: Uuid,
    decoder: Utf8Decoder,
    raw_buffer: String,
    assembled_text: String,
    is_done: bool,
}

impl Default for StreamSession {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamSession {
    /// Create a fresh session with a random ID.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            decoder: Utf8Decoder::new(),
            raw_buffer: String::new(),
            assembled_text: String::new(),
            is_done: false,
        }
    }

    /// Session identifier, used for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Concatenation of every delta received so far.
    pub fn assembled_text(&self) -> &str {
        &self.assembled_text
    }

    /// Whether the terminal sentinel has been observed.
    pub fn is_done(&self) -> bool {
        self.is_done
    }

    /// Bytes of decoded text not yet consumed as complete lines.
    pub fn buffered_len(&self) -> usize {
        self.raw_buffer.len()
    }

    /// Feed one chunk of raw bytes.
    ///
    /// Chunks arriving after the sentinel are ignored.
    pub fn feed(&mut self, chunk: &[u8]) -> FeedResult {
        if self.is_done {
            return FeedResult {
                done: true,
                ..FeedResult::default()
            };
        }

        let text = self.decoder.decode(chunk);
        self.raw_buffer.push_str(&text);

        let mut result = FeedResult::default();
        let consumed = self.consume_lines(&mut result);
        if self.is_done {
            self.raw_buffer.clear();
        } else {
            self.raw_buffer.drain(..consumed);
        }
        result.done = self.is_done;
        result
    }

    /// Flush at end of stream.
    ///
    /// Processes held-back bytes and a final line without a trailing newline.
    /// Fails if a data frame is still incomplete.
    pub fn finish(&mut self) -> Result<Vec<String>, ChatError> {
        if self.is_done {
            return Ok(Vec::new());
        }

        let tail = self.decoder.finish();
        self.raw_buffer.push_str(&tail);

        let mut result = FeedResult::default();
        let consumed = self.consume_lines(&mut result);
        if result.deferred {
            return Err(ChatError::StreamError(
                "stream ended inside an incomplete data frame".into(),
            ));
        }

        let last_line = self.raw_buffer.split_off(consumed);
        self.raw_buffer.clear();
        if self.is_done {
            return Ok(result.deltas);
        }

        match classify_line(&last_line) {
            Frame::Skip => {}
            Frame::Done => self.is_done = true,
            Frame::Data(payload) => match extract_delta(payload) {
                Ok(Some(delta)) => {
                    self.assembled_text.push_str(&delta);
                    result.deltas.push(delta);
                }
                Ok(None) => {}
                Err(e) => {
                    return Err(ChatError::StreamError(format!(
                        "stream ended inside an incomplete data frame: {e}"
                    )));
                }
            },
        }
        Ok(result.deltas)
    }

    /// Consume complete lines from the buffer, returning the byte offset of
    /// the first unconsumed line.
    fn consume_lines(&mut self, result: &mut FeedResult) -> usize {
        let mut cursor = 0;
        while let Some((line, next)) = next_line(&self.raw_buffer, cursor) {
            match classify_line(line) {
                Frame::Skip => {}
                Frame::Done => {
                    self.is_done = true;
                    return next;
                }
                Frame::Data(payload) => match extract_delta(payload) {
                    Ok(Some(delta)) => {
                        self.assembled_text.push_str(&delta);
                        result.deltas.push(delta);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::debug!(
                            session_id = %self.id,
                            error = %e,
                            "deferring unparseable data frame until more bytes arrive"
                        );
                        result.deferred = true;
                        return cursor;
                    }
                },
            }
            cursor = next;
        }
        cursor
    }
}
