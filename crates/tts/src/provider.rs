pub mod chat_completions;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::payload::UpstreamPayload;

/// Successful upstream answer, body fully buffered
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Speech provider the proxy delegates synthesis to
#[async_trait]
pub trait SpeechUpstream: Send + Sync {
    /// Send the synthesis call
    ///
    /// Non-success statuses and transport failures are returned as
    /// [`crate::TtsError::UpstreamError`].
    async fn synthesize(&self, payload: &UpstreamPayload) -> crate::error::Result<UpstreamResponse>;

    /// Fetch audio from a URL returned by the provider
    async fn fetch_audio(&self, url: &Url) -> crate::error::Result<UpstreamResponse>;

    /// Get the provider name
    fn name(&self) -> &str;
}
