#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod synthesis;
pub mod telemetry;
pub mod upstream;

use std::time::Duration;

use serde::Deserialize;

pub use cors::*;
pub use health::*;
pub use server::*;
pub use synthesis::*;
pub use telemetry::TelemetryConfig;
pub use upstream::*;

/// Top-level voxgate configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Speech provider the proxy forwards to
    pub upstream: UpstreamConfig,
    /// Request shaping rules
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

/// Parse a human-readable duration such as `30s` or `1m 30s`
pub(crate) fn parse_duration(field: &str, value: &str) -> anyhow::Result<Duration> {
    duration_str::parse(value).map_err(|e| anyhow::anyhow!("invalid duration for {field} '{value}': {e}"))
}
