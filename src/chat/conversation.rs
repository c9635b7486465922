//! Synchronous transcript state machine.
//!
//! [`Conversation`] owns the transcript and at most one live
//! [`StreamSession`]. It performs no I/O: the async driver in
//! [`client`](super::client) hands it chunks as they arrive.
//!
//! ```text
//! Idle → Sending → Streaming → {Completed | Failed} → (next submit)
//! ```

use super::completions::ChatRequest;
use super::context::ChatContext;
use super::message::{Role, Transcript, Turn};
use super::session::StreamSession;
use crate::error::ChatError;

/// The single user-visible message shown when a session fails.
pub const FALLBACK_MESSAGE: &str =
    "Sorry, I couldn't reach the tutor right now. Please try again in a moment.";

/// Lifecycle state of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatState {
    /// No request has been made yet.
    #[default]
    Idle,
    /// Request issued, response not yet open.
    Sending,
    /// Response open, chunks being consumed.
    Streaming,
    /// Last session finished normally.
    Completed,
    /// Last session failed and the fallback turn was shown.
    Failed,
}

impl ChatState {
    /// Whether a session is live and `submit` must be rejected.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Sending | Self::Streaming)
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Sentinel or end of stream reached with a well-formed stream.
    Completed,
    /// Transport or decode failure; the fallback turn was written.
    Failed,
}

/// Outcome of applying one chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkUpdate {
    /// Content of the trailing assistant turn after each delta, in order.
    pub snapshots: Vec<String>,
    /// Whether the session completed with this chunk.
    pub done: bool,
}

#[derive(Debug)]
struct LiveSession {
    stream: StreamSession,
    assistant_index: Option<usize>,
}

/// Transcript plus the live stream session, if any.
#[derive(Debug, Default)]
pub struct Conversation {
    transcript: Transcript,
    state: ChatState,
    context: ChatContext,
    live: Option<LiveSession>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChatState {
        self.state
    }

    /// Submission context (mode, problem, selection).
    pub fn context(&self) -> &ChatContext {
        &self.context
    }

    /// Mutable submission context.
    pub fn context_mut(&mut self) -> &mut ChatContext {
        &mut self.context
    }

    /// ID of the live stream session, if any.
    pub fn session_id(&self) -> Option<uuid::Uuid> {
        self.live.as_ref().map(|live| live.stream.id())
    }

    /// Start a new exchange.
    ///
    /// Appends the user turn immediately and returns the request to send.
    /// Rejects blank input and overlapping sends without touching the
    /// transcript.
    pub fn begin(&mut self, input: &str) -> Result<ChatRequest, ChatError> {
        if self.state.is_busy() {
            return Err(ChatError::SessionBusy);
        }
        let input = input.trim();
        if input.is_empty() {
            return Err(ChatError::EmptyInput);
        }

        let text = self.context.compose_user_text(input);
        self.transcript.push(Turn::user(text));
        self.live = Some(LiveSession {
            stream: StreamSession::new(),
            assistant_index: None,
        });
        self.state = ChatState::Sending;

        Ok(ChatRequest {
            messages: self.transcript.turns().to_vec(),
            mode: self.context.mode,
            problem_id: self.context.problem_id.clone(),
        })
    }

    /// Record that the response is open and streaming.
    pub fn mark_streaming(&mut self) {
        if self.state == ChatState::Sending {
            self.state = ChatState::Streaming;
        }
    }

    /// Apply one inbound chunk.
    ///
    /// Every delta re-synchronizes the trailing assistant turn to the full
    /// assembled text. Chunks with no live session are ignored.
    pub fn apply_chunk(&mut self, chunk: &[u8]) -> ChunkUpdate {
        let Some(live) = self.live.as_mut() else {
            return ChunkUpdate::default();
        };
        self.state = ChatState::Streaming;

        let fed = live.stream.feed(chunk);
        let snapshots = Self::sync_assistant(&mut self.transcript, live, &fed.deltas);

        if fed.done {
            self.complete();
        }
        ChunkUpdate {
            snapshots,
            done: fed.done,
        }
    }

    /// The transport reported no more bytes.
    ///
    /// Flushes the session; an incomplete trailing frame fails the session.
    pub fn end_of_stream(&mut self) -> (ChunkUpdate, SessionOutcome) {
        let Some(live) = self.live.as_mut() else {
            return (ChunkUpdate::default(), self.last_outcome());
        };

        match live.stream.finish() {
            Ok(deltas) => {
                let snapshots = Self::sync_assistant(&mut self.transcript, live, &deltas);
                self.complete();
                (
                    ChunkUpdate {
                        snapshots,
                        done: true,
                    },
                    SessionOutcome::Completed,
                )
            }
            Err(e) => {
                self.fail(&e);
                (ChunkUpdate::default(), SessionOutcome::Failed)
            }
        }
    }

    /// Abort the live session and show the fallback message.
    ///
    /// Any partial assistant content from this session is replaced, so the
    /// transcript ends with exactly one fallback turn.
    pub fn fail(&mut self, error: &ChatError) -> SessionOutcome {
        let Some(live) = self.live.take() else {
            return self.last_outcome();
        };
        tracing::warn!(
            session_id = %live.stream.id(),
            code = error.code(),
            error = %error,
            discarded_chars = live.stream.assembled_text().len(),
            "chat session failed, showing fallback message"
        );

        let replaced = live
            .assistant_index
            .is_some_and(|idx| self.transcript.replace_last(idx, FALLBACK_MESSAGE));
        if !replaced {
            self.transcript.push(Turn::assistant(FALLBACK_MESSAGE));
        }
        self.state = ChatState::Failed;
        SessionOutcome::Failed
    }

    fn complete(&mut self) {
        if let Some(live) = self.live.take() {
            tracing::info!(
                session_id = %live.stream.id(),
                chars = live.stream.assembled_text().len(),
                "chat session completed"
            );
        }
        self.state = ChatState::Completed;
    }

    fn last_outcome(&self) -> SessionOutcome {
        match self.state {
            ChatState::Failed => SessionOutcome::Failed,
            _ => SessionOutcome::Completed,
        }
    }

    /// Bring the trailing assistant turn up to date after each delta.
    fn sync_assistant(
        transcript: &mut Transcript,
        live: &mut LiveSession,
        deltas: &[String],
    ) -> Vec<String> {
        if deltas.is_empty() {
            return Vec::new();
        }
        let assembled = live.stream.assembled_text();
        let total: usize = deltas.iter().map(String::len).sum();
        let mut end = assembled.len() - total;
        let mut snapshots = Vec::with_capacity(deltas.len());

        for delta in deltas {
            end += delta.len();
            let content = &assembled[..end];
            let owned = live.assistant_index.is_some_and(|idx| {
                transcript.last().map(|t| t.role) == Some(Role::Assistant)
                    && transcript.replace_last(idx, content)
            });
            if !owned {
                live.assistant_index = Some(transcript.push(Turn::assistant(content)));
            }
            snapshots.push(content.to_string());
        }
        snapshots
    }
}
