//! Tutoring mode and per-submission context.
//!
//! The tutor can answer in several styles, and the learner may select text
//! on the page to attach to their next question.

use serde::{Deserialize, Serialize};

/// Number of characters of selected context shown in the preview.
pub const CONTEXT_PREVIEW_CHARS: usize = 100;

/// How the tutor should respond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TutorMode {
    /// Explain the concept directly.
    #[default]
    Explain,
    /// Give a hint without the full answer.
    Hint,
    /// Guide with questions.
    Socratic,
    /// Discuss time and space complexity.
    Complexity,
    /// Answer in pseudocode.
    Pseudocode,
}

impl TutorMode {
    /// All modes in display order.
    pub const ALL: [TutorMode; 5] = [
        Self::Explain,
        Self::Hint,
        Self::Socratic,
        Self::Complexity,
        Self::Pseudocode,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Explain => "Explain",
            Self::Hint => "Hint",
            Self::Socratic => "Socratic",
            Self::Complexity => "Complexity",
            Self::Pseudocode => "Pseudocode",
        }
    }
}

impl std::fmt::Display for TutorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Context carried into the next submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatContext {
    /// Current tutoring mode. Persists across submissions.
    pub mode: TutorMode,
    /// Problem the learner is looking at, forwarded as `problemId`.
    pub problem_id: Option<String>,
    selected: Option<String>,
}

impl ChatContext {
    /// Create a context in the default mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach selected page text to the next submission.
    ///
    /// Blank selections clear any existing one.
    pub fn select(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.selected = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };
    }

    /// The full selected text, if any.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Display preview: the first 100 characters, with `...` when longer.
    pub fn preview(&self) -> Option<String> {
        let selected = self.selected.as_deref()?;
        let mut preview: String = selected.chars().take(CONTEXT_PREVIEW_CHARS).collect();
        if selected.chars().count() > CONTEXT_PREVIEW_CHARS {
            preview.push_str("...");
        }
        Some(preview)
    }

    /// Build the user turn text for `input`, consuming the selection.
    ///
    /// The full selection is appended; the preview limit never applies here.
    pub(crate) fn compose_user_text(&mut self, input: &str) -> String {
        match self.selected.take() {
            Some(selected) => format!("{input}\n\nContext: \"{selected}\""),
            None => input.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_explain() {
        assert_eq!(ChatContext::new().mode, TutorMode::Explain);
        assert_eq!(TutorMode::default().to_string(), "Explain");
    }

    #[test]
    fn mode_serializes_lowercase() {
        let json = serde_json::to_string(&TutorMode::Socratic).unwrap_or_default();
        assert_eq!(json, "\"socratic\"");
    }

    #[test]
    fn preview_truncates_at_100_chars() {
        let mut ctx = ChatContext::new();
        ctx.select("x".repeat(150));
        let preview = ctx.preview().unwrap_or_default();
        assert_eq!(preview.len(), 103);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn short_preview_has_no_ellipsis() {
        let mut ctx = ChatContext::new();
        ctx.select("binary search");
        assert_eq!(ctx.preview().as_deref(), Some("binary search"));
    }

    #[test]
    fn preview_counts_chars_not_bytes() {
        let mut ctx = ChatContext::new();
        ctx.select("é".repeat(100));
        assert_eq!(ctx.preview().map(|p| p.chars().count()), Some(100));
    }

    #[test]
    fn compose_appends_full_selection_once() {
        let mut ctx = ChatContext::new();
        let long = "y".repeat(250);
        ctx.select(long.clone());
        let text = ctx.compose_user_text("why?");
        assert_eq!(text, format!("why?\n\nContext: \"{long}\""));
        assert!(ctx.selected().is_none());
        assert_eq!(ctx.compose_user_text("again"), "again");
    }

    #[test]
    fn blank_selection_clears() {
        let mut ctx = ChatContext::new();
        ctx.select("abc");
        ctx.select("  ");
        assert!(ctx.selected().is_none());
        assert!(ctx.preview().is_none());
    }
}
