//! Error types for the tutor chat crate.
//!
//! Each error variant carries a stable error code (SCREAMING_SNAKE_CASE)
//! that is included in the Display output and accessible via [`ChatError::code()`].
//! Codes are part of the public API contract and will not change.

/// Stable error codes for programmatic error handling.
pub mod error_codes {
    /// Invalid or missing configuration.
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

    /// The request to the completion endpoint could not be sent.
    pub const REQUEST_FAILED: &str = "REQUEST_FAILED";

    /// The response stream failed or ended with an incomplete frame.
    pub const STREAM_FAILED: &str = "STREAM_FAILED";

    /// The completion endpoint answered with a non-success status or no body.
    pub const PROVIDER_ERROR: &str = "PROVIDER_ERROR";

    /// A submit was attempted while a stream session is still live.
    pub const SESSION_BUSY: &str = "SESSION_BUSY";

    /// A submit was attempted with blank input.
    pub const EMPTY_INPUT: &str = "EMPTY_INPUT";

    /// Position persistence failed.
    pub const STORE_ERROR: &str = "STORE_ERROR";
}

/// Errors produced by the tutor chat crate.
///
/// The Display impl formats as `[CODE] message`.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Invalid or missing configuration.
    #[error("[{}] {}", error_codes::CONFIG_INVALID, .0)]
    ConfigError(String),

    /// The request to the completion endpoint could not be sent.
    #[error("[{}] {}", error_codes::REQUEST_FAILED, .0)]
    RequestError(String),

    /// The response stream failed or ended with an incomplete frame.
    #[error("[{}] {}", error_codes::STREAM_FAILED, .0)]
    StreamError(String),

    /// Non-success HTTP status or missing body.
    #[error("[{}] {}", error_codes::PROVIDER_ERROR, .0)]
    ProviderError(String),

    /// A stream session is already live for this transcript.
    #[error("[{}] a response is still streaming", error_codes::SESSION_BUSY)]
    SessionBusy,

    /// The submitted text was empty after trimming.
    #[error("[{}] message is empty", error_codes::EMPTY_INPUT)]
    EmptyInput,

    /// Position persistence failed.
    #[error("[{}] {}", error_codes::STORE_ERROR, .0)]
    StoreError(String),
}

impl ChatError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => error_codes::CONFIG_INVALID,
            Self::RequestError(_) => error_codes::REQUEST_FAILED,
            Self::StreamError(_) => error_codes::STREAM_FAILED,
            Self::ProviderError(_) => error_codes::PROVIDER_ERROR,
            Self::SessionBusy => error_codes::SESSION_BUSY,
            Self::EmptyInput => error_codes::EMPTY_INPUT,
            Self::StoreError(_) => error_codes::STORE_ERROR,
        }
    }
}

/// Convenience alias for tutor chat results.
pub type Result<T> = std::result::Result<T, ChatError>;
