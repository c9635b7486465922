//! Tutor chat: streaming completion client and draggable chat surfaces.
//!
//! # Architecture
//!
//! Two independent components, composed only by the rendering layer:
//! - **Chat** ([`chat`]): sends the transcript to a completion endpoint,
//!   reassembles the `data: ` event stream into text deltas, and keeps the
//!   trailing assistant turn in sync as deltas arrive.
//! - **Drag** ([`drag`]): tracks the anchor icon position, derives the chat
//!   panel placement from it, and persists the anchor through a
//!   [`drag::PositionStore`].
//!
//! Ambient pieces: [`config`] (TOML), [`error`] (stable error codes),
//! [`logging`] (tracing subscriber setup).

pub mod chat;
pub mod config;
pub mod drag;
pub mod error;
pub mod logging;

pub use chat::{ChatClient, ChatEvent, ChatState, SessionOutcome, Transcript, Turn};
pub use config::TutorConfig;
pub use drag::{DragAnchorCoordinator, DragOutcome, Position, Size, Surface};
pub use error::{ChatError, Result};
