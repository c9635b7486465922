//! Streaming tutor chat.
//!
//! # Submodules
//!
//! - [`message`] — Turns and the transcript
//! - [`utf8`] — Incremental UTF-8 decoding across chunk boundaries
//! - [`frames`] — `data: ` line classification
//! - [`completions`] — Request body and delta extraction
//! - [`session`] — Per-request stream reassembly
//! - [`conversation`] — Synchronous transcript state machine
//! - [`context`] — Tutoring mode and selected page context
//! - [`transport`] — Completion transport trait and HTTP implementation
//! - [`client`] — Async driver publishing [`client::ChatEvent`]s

pub mod client;
pub mod completions;
pub mod context;
pub mod conversation;
pub mod frames;
pub mod message;
pub mod session;
pub mod transport;
pub mod utf8;

pub use client::{ChatClient, ChatEvent, PanelVisibility};
pub use completions::ChatRequest;
pub use context::{ChatContext, TutorMode};
pub use conversation::{ChatState, Conversation, FALLBACK_MESSAGE, SessionOutcome};
pub use message::{Role, Transcript, Turn};
pub use session::{FeedResult, StreamSession};
pub use transport::{ByteStream, CompletionTransport, HttpTransport};
