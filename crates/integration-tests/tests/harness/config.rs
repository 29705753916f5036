//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use secrecy::SecretString;
use voxgate_config::{
    AudioFetchConfig, Config, CorsConfig, HealthConfig, ServerConfig, SynthesisConfig, UpstreamConfig,
};

pub const TEST_API_KEY: &str = "test-key";
pub const TEST_CUSTOMER_ID: &str = "customer-123";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder whose upstream is the given mock completion URL
    ///
    /// The mock listens on loopback, so private-address blocking starts off.
    pub fn new(upstream_url: &str) -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    ..ServerConfig::default()
                },
                upstream: UpstreamConfig {
                    url: upstream_url.parse().expect("valid URL"),
                    api_key: SecretString::from(TEST_API_KEY),
                    customer_id: TEST_CUSTOMER_ID.to_owned(),
                    model: "elevenlabs/eleven-multilingual-v2".to_owned(),
                    voice_model: "eleven_multilingual_v2".to_owned(),
                    timeout: "5s".to_owned(),
                    audio_fetch: AudioFetchConfig {
                        block_private_addresses: false,
                        ..AudioFetchConfig::default()
                    },
                },
                synthesis: SynthesisConfig::default(),
                telemetry: None,
            },
        }
    }

    /// Set the synthesis call timeout
    pub fn with_timeout(mut self, timeout: &str) -> Self {
        timeout.clone_into(&mut self.config.upstream.timeout);
        self
    }

    /// Set the audio file download timeout
    pub fn with_fetch_timeout(mut self, timeout: &str) -> Self {
        timeout.clone_into(&mut self.config.upstream.audio_fetch.timeout);
        self
    }

    /// Refuse audio URLs that point at private addresses
    pub fn blocking_private_addresses(mut self) -> Self {
        self.config.upstream.audio_fetch.block_private_addresses = true;
        self
    }

    /// Cap the size of fetched audio files
    pub fn with_max_fetch_bytes(mut self, max_bytes: usize) -> Self {
        self.config.upstream.audio_fetch.max_bytes = max_bytes;
        self
    }

    /// Treat zero stability and clarity as unset
    pub fn with_zero_means_default(mut self) -> Self {
        self.config.synthesis.zero_means_default = true;
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
