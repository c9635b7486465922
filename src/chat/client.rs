//! Async chat client: drives a [`Conversation`] from a transport.
//!
//! `submit` appends the user turn, opens the request, and folds each chunk
//! into the transcript as it arrives. Transport and decode failures never
//! escape: they become the single fallback assistant turn. Only caller
//! misuse (blank input, overlapping submit) is returned as an error.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tutor_chat::chat::client::ChatClient;
//! use tutor_chat::chat::transport::HttpTransport;
//!
//! # async fn example() -> Result<(), tutor_chat::ChatError> {
//! let mut client = ChatClient::new(HttpTransport::new("http://localhost:8787/chat"));
//! client.submit("How does quicksort partition?").await?;
//! println!("{}", client.transcript().last().map(|t| t.content.as_str()).unwrap_or(""));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::Instrument;

use super::context::{ChatContext, TutorMode};
use super::conversation::{ChatState, Conversation, SessionOutcome};
use super::message::{Role, Transcript};
use super::transport::CompletionTransport;
use crate::error::ChatError;

/// Notification published to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A user turn was appended.
    UserTurn {
        /// The turn text as stored.
        content: String,
    },
    /// The trailing assistant turn now holds `content`.
    AssistantUpdated {
        /// Full assistant text so far.
        content: String,
    },
    /// The session finished normally.
    Completed,
    /// The session failed. Preceded by an `AssistantUpdated` carrying the
    /// fallback text when the surface is open.
    Failed,
}

/// Shared open/closed flag for the chat surface.
///
/// Cloned handles can close the surface while a `submit` is in flight.
#[derive(Debug, Clone)]
pub struct PanelVisibility {
    open: Arc<AtomicBool>,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            open: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl PanelVisibility {
    /// Hide the surface. Updates stop being published; the transcript
    /// keeps recording.
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    /// Show the surface again.
    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
    }

    /// Whether the surface is visible.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

/// Streaming chat client over a [`CompletionTransport`].
pub struct ChatClient<T> {
    transport: T,
    conversation: Conversation,
    events: Option<mpsc::UnboundedSender<ChatEvent>>,
    visibility: PanelVisibility,
    // an update was withheld while the surface was closed
    stale: bool,
}

impl<T: std::fmt::Debug> std::fmt::Debug for ChatClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("transport", &self.transport)
            .field("state", &self.conversation.state())
            .field("turns", &self.conversation.transcript().len())
            .finish()
    }
}

impl<T: CompletionTransport> ChatClient<T> {
    /// Create a client with an empty transcript.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            conversation: Conversation::new(),
            events: None,
            visibility: PanelVisibility::default(),
            stale: false,
        }
    }

    /// Publish [`ChatEvent`]s to `sender`.
    pub fn with_events(mut self, sender: mpsc::UnboundedSender<ChatEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Share an existing open/closed flag with this client.
    pub fn with_visibility(mut self, visibility: PanelVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// The transcript as it stands.
    pub fn transcript(&self) -> &Transcript {
        self.conversation.transcript()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChatState {
        self.conversation.state()
    }

    /// Submission context.
    pub fn context(&self) -> &ChatContext {
        self.conversation.context()
    }

    /// Change the tutoring mode for subsequent submissions.
    pub fn set_mode(&mut self, mode: TutorMode) {
        self.conversation.context_mut().mode = mode;
    }

    /// Set the problem forwarded with subsequent submissions.
    pub fn set_problem(&mut self, problem_id: Option<String>) {
        self.conversation.context_mut().problem_id = problem_id;
    }

    /// Attach selected page text to the next submission.
    pub fn select_context(&mut self, text: impl Into<String>) {
        self.conversation.context_mut().select(text);
    }

    /// Handle for opening and closing the chat surface.
    pub fn visibility(&self) -> PanelVisibility {
        self.visibility.clone()
    }

    /// Hide the chat surface.
    pub fn close(&self) {
        self.visibility.close();
    }

    /// Show the chat surface and re-publish the trailing assistant turn.
    pub fn open(&mut self) {
        self.visibility.open();
        self.stale = false;
        self.publish_trailing();
    }

    /// Submit user input and consume the response to completion.
    ///
    /// Returns `Err` only for caller misuse; the transcript is untouched in
    /// that case. Network and decode failures resolve to
    /// `Ok(SessionOutcome::Failed)` with the fallback turn appended.
    pub async fn submit(&mut self, input: &str) -> Result<SessionOutcome, ChatError> {
        let request = self.conversation.begin(input)?;
        let session_id = self
            .conversation
            .session_id()
            .map(|id| id.to_string())
            .unwrap_or_default();

        if let Some(turn) = self.conversation.transcript().last() {
            let content = turn.content.clone();
            self.emit(ChatEvent::UserTurn { content });
        }

        let span = tracing::info_span!("chat_submit", session_id = %session_id);
        let outcome = self.drive(&request).instrument(span).await;
        Ok(outcome)
    }

    async fn drive(&mut self, request: &super::completions::ChatRequest) -> SessionOutcome {
        tracing::info!(turns = request.messages.len(), mode = %request.mode, "sending chat request");

        let mut stream = match self.transport.open(request).await {
            Ok(stream) => stream,
            Err(e) => return self.finish_failed(&e),
        };
        self.conversation.mark_streaming();

        loop {
            match stream.next().await {
                Some(Ok(chunk)) => {
                    tracing::debug!(bytes = chunk.len(), "received chunk");
                    let update = self.conversation.apply_chunk(&chunk);
                    self.publish(update.snapshots);
                    if update.done {
                        return self.finish_completed();
                    }
                }
                Some(Err(e)) => return self.finish_failed(&e),
                None => {
                    let (update, outcome) = self.conversation.end_of_stream();
                    self.publish(update.snapshots);
                    return match outcome {
                        SessionOutcome::Completed => self.finish_completed(),
                        SessionOutcome::Failed => {
                            self.publish_trailing();
                            self.emit(ChatEvent::Failed);
                            SessionOutcome::Failed
                        }
                    };
                }
            }
        }
    }

    fn finish_completed(&mut self) -> SessionOutcome {
        // reopened mid-stream with no delta since: catch the surface up
        if self.stale {
            self.publish_trailing();
        }
        self.emit(ChatEvent::Completed);
        SessionOutcome::Completed
    }

    fn finish_failed(&mut self, error: &ChatError) -> SessionOutcome {
        let outcome = self.conversation.fail(error);
        self.publish_trailing();
        self.emit(ChatEvent::Failed);
        outcome
    }

    /// Publish each snapshot, or mark the surface stale while it is closed.
    fn publish(&mut self, snapshots: Vec<String>) {
        if snapshots.is_empty() {
            return;
        }
        if !self.visibility.is_open() {
            self.stale = true;
            return;
        }
        self.stale = false;
        for content in snapshots {
            self.emit(ChatEvent::AssistantUpdated { content });
        }
    }

    fn publish_trailing(&mut self) {
        let content = match self.conversation.transcript().last() {
            Some(turn) if turn.role == Role::Assistant => turn.content.clone(),
            _ => return,
        };
        self.publish(vec![content]);
    }

    fn emit(&self, event: ChatEvent) {
        if let Some(events) = &self.events
            && events.send(event).is_err()
        {
            tracing::debug!("chat event receiver dropped");
        }
    }
}
