use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Speech provider endpoint and its static credentials
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Chat-completions style endpoint that produces audio
    pub url: Url,
    /// Bearer token sent in `Authorization`
    pub api_key: SecretString,
    /// Value for the `CustomerId` header
    pub customer_id: String,
    /// Model identifier placed in the completion envelope
    #[serde(default = "default_model")]
    pub model: String,
    /// Voice model requested inside the synthesis instruction
    #[serde(default = "default_voice_model")]
    pub voice_model: String,
    /// Upper bound for the synthesis call
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Secondary fetch used when the provider answers with an audio URL
    #[serde(default)]
    pub audio_fetch: AudioFetchConfig,
}

impl UpstreamConfig {
    /// Synthesis call timeout
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout` is not a valid duration string
    pub fn timeout_duration(&self) -> anyhow::Result<Duration> {
        crate::parse_duration("upstream.timeout", &self.timeout)
    }
}

/// Controls for fetching audio from a provider-returned URL
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AudioFetchConfig {
    /// Upper bound for the secondary fetch
    #[serde(default = "default_fetch_timeout")]
    pub timeout: String,
    /// Refuse URLs pointing at loopback, private, or link-local addresses
    #[serde(default = "default_block_private")]
    pub block_private_addresses: bool,
    /// Largest audio body accepted from the secondary fetch
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl Default for AudioFetchConfig {
    fn default() -> Self {
        Self {
            timeout: default_fetch_timeout(),
            block_private_addresses: default_block_private(),
            max_bytes: default_max_bytes(),
        }
    }
}

impl AudioFetchConfig {
    /// Secondary fetch timeout
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout` is not a valid duration string
    pub fn timeout_duration(&self) -> anyhow::Result<Duration> {
        crate::parse_duration("upstream.audio_fetch.timeout", &self.timeout)
    }
}

fn default_model() -> String {
    "elevenlabs/eleven-multilingual-v2".to_string()
}

fn default_voice_model() -> String {
    "eleven_multilingual_v2".to_string()
}

fn default_timeout() -> String {
    "60s".to_string()
}

fn default_fetch_timeout() -> String {
    "30s".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_block_private() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_bytes() -> usize {
    50 * 1024 * 1024
}
