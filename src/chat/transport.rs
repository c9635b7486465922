//! Transport to the completion endpoint.
//!
//! [`CompletionTransport`] opens one request and yields the response body
//! as a stream of byte chunks. [`HttpTransport`] is the reqwest-backed
//! implementation; tests substitute scripted transports.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};

use super::completions::{ChatRequest, extract_error_message};
use crate::config::ChatConfig;
use crate::error::ChatError;

/// A boxed stream of response body chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ChatError>> + Send>>;

/// Opens requests to the completion service.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    /// Send `request` and return the response body stream.
    ///
    /// Fails if the request cannot be sent, the status is not a success, or
    /// there is no readable body.
    async fn open(&self, request: &ChatRequest) -> Result<ByteStream, ChatError>;
}

/// HTTP POST transport built on reqwest.
pub struct HttpTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl HttpTransport {
    /// Create a transport posting to `endpoint` with default client settings.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a transport from the `[chat]` config section.
    ///
    /// Only connection setup is bounded; the response stream has no timeout.
    pub fn from_config(config: &ChatConfig) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ChatError::ConfigError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
        })
    }

    /// The URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn open(&self, request: &ChatRequest) -> Result<ByteStream, ChatError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            messages = request.messages.len(),
            mode = %request.mode,
            "opening completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::RequestError(format!("completion request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::ProviderError(format!(
                "HTTP {}: {}",
                status.as_u16(),
                extract_error_message(&body)
            )));
        }
        if status == reqwest::StatusCode::NO_CONTENT {
            return Err(ChatError::ProviderError("response has no body".into()));
        }

        let stream = response.bytes_stream().map(|chunk| {
            chunk.map_err(|e| ChatError::StreamError(format!("stream read error: {e}")))
        });
        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_client_internals() {
        let t = HttpTransport::new("http://localhost:9/chat");
        let dbg = format!("{t:?}");
        assert!(dbg.contains("localhost:9/chat"));
        assert_eq!(t.endpoint(), "http://localhost:9/chat");
    }

    #[test]
    fn from_config_uses_endpoint() {
        let config = ChatConfig::default();
        let t = HttpTransport::from_config(&config);
        assert!(matches!(t, Ok(ref t) if t.endpoint() == config.endpoint));
    }
}
