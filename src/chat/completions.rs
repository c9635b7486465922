//! Completion endpoint wire format.
//!
//! Builds the outbound request body and extracts text deltas from
//! streamed chunk payloads (`choices[0].delta.content`).

use serde::Serialize;

use super::context::TutorMode;
use super::message::Turn;

/// Outbound request body.
///
/// ```json
/// {"messages": [{"role": "user", "content": "..."}], "mode": "explain"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    /// Full transcript including the new user turn.
    pub messages: Vec<Turn>,
    /// Requested tutoring style.
    pub mode: TutorMode,
    /// Problem being discussed, if any.
    #[serde(rename = "problemId", skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<String>,
}

/// Extract the incremental text from one data payload.
///
/// Returns `Err` when the payload is not valid JSON (typically a frame cut
/// by a chunk boundary). Valid JSON without a non-empty
/// `choices[0].delta.content` yields `Ok(None)`.
pub fn extract_delta(payload: &str) -> Result<Option<String>, serde_json::Error> {
    let parsed: serde_json::Value = serde_json::from_str(payload)?;
    let content = parsed
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|choice| choice.get("delta"))
        .and_then(|delta| delta.get("content"))
        .and_then(|content| content.as_str())
        .filter(|content| !content.is_empty())
        .map(String::from);
    Ok(content)
}

/// Extract an error message from an error response body.
pub fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message").or(Some(e)))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}
