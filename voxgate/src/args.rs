use std::path::PathBuf;

use clap::Parser;
use voxgate_telemetry::LogFormat;

/// Voxgate speech synthesis proxy
#[derive(Debug, Parser)]
#[command(name = "voxgate", about = "Speech synthesis proxy that normalizes provider audio responses")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "voxgate.toml", env = "VOXGATE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "VOXGATE_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,

    /// Log filter directives, e.g. `info,tts=debug`
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log: String,

    /// Log line format: `text` or `json`
    #[arg(long, default_value = "text", env = "VOXGATE_LOG_FORMAT")]
    pub log_format: LogFormat,
}
