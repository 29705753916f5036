use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{
    error::TtsError,
    http_client::{audio_fetch_client, synthesis_client},
    payload::UpstreamPayload,
    url_guard,
};

use super::{SpeechUpstream, UpstreamResponse};

/// Header carrying the account identifier expected by the provider
const CUSTOMER_ID_HEADER: &str = "CustomerId";

/// Settings for [`ChatCompletionsUpstream`]
#[derive(Debug)]
pub struct ChatCompletionsSettings {
    pub url: Url,
    pub api_key: SecretString,
    pub customer_id: String,
    pub timeout: Duration,
    pub fetch_timeout: Duration,
    pub block_private_addresses: bool,
    pub max_fetch_bytes: usize,
}

/// Provider reached through a chat-completions endpoint that returns audio
pub struct ChatCompletionsUpstream {
    client: Client,
    fetch_client: Client,
    settings: ChatCompletionsSettings,
    name: String,
}

impl ChatCompletionsUpstream {
    pub fn new(name: String, settings: ChatCompletionsSettings) -> reqwest::Result<Self> {
        Ok(Self {
            client: synthesis_client()?,
            fetch_client: audio_fetch_client(settings.block_private_addresses)?,
            settings,
            name,
        })
    }
}

fn content_type(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[async_trait]
impl SpeechUpstream for ChatCompletionsUpstream {
    async fn synthesize(&self, payload: &UpstreamPayload) -> crate::error::Result<UpstreamResponse> {
        tracing::debug!(
            "Synthesis request: upstream={}, model={}, content_len={}",
            self.name,
            payload.model,
            payload.messages.first().map_or(0, |m| m.content.len()),
        );

        let response = self
            .client
            .post(self.settings.url.clone())
            .bearer_auth(self.settings.api_key.expose_secret())
            .header(CUSTOMER_ID_HEADER, &self.settings.customer_id)
            .timeout(self.settings.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Synthesis request to {} failed: {e}", self.name);
                TtsError::upstream_transport(&e)
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("Synthesis API error ({status}): {error_text}");

            return Err(TtsError::upstream_status(status));
        }

        let content_type = content_type(&response);

        let body = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read synthesis response body: {e}");
            TtsError::upstream_transport(&e)
        })?;

        tracing::debug!(
            "Synthesis response received: content_type={:?}, {} bytes",
            content_type,
            body.len()
        );

        Ok(UpstreamResponse { content_type, body })
    }

    async fn fetch_audio(&self, url: &Url) -> crate::error::Result<UpstreamResponse> {
        if self.settings.block_private_addresses
            && let Err(e) = url_guard::check_destination(url)
        {
            tracing::warn!("Refusing to fetch provider audio URL: {e}");
            return Err(TtsError::UnexpectedFormat);
        }

        let mut response = self
            .fetch_client
            .get(url.clone())
            .timeout(self.settings.fetch_timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Audio fetch failed: {e}");
                TtsError::upstream_transport(&e)
            })?;

        let status = response.status();

        if !status.is_success() {
            tracing::error!("Audio fetch returned {status}");
            return Err(TtsError::upstream_status(status));
        }

        let limit = self.settings.max_fetch_bytes;

        if response
            .content_length()
            .is_some_and(|len| len > u64::try_from(limit).unwrap_or(u64::MAX))
        {
            tracing::error!("Audio fetch declared a body larger than {limit} bytes");
            return Err(TtsError::UnexpectedFormat);
        }

        let content_type = content_type(&response);
        let mut body = BytesMut::new();

        while let Some(chunk) = response.chunk().await.map_err(|e| {
            tracing::error!("Failed to read fetched audio: {e}");
            TtsError::upstream_transport(&e)
        })? {
            if body.len() + chunk.len() > limit {
                tracing::error!("Audio fetch exceeded {limit} bytes");
                return Err(TtsError::UnexpectedFormat);
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!("Fetched {} bytes of provider audio", body.len());

        Ok(UpstreamResponse {
            content_type,
            body: body.freeze(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
