#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod classify;
mod error;
mod http_client;
mod metrics;
mod payload;
mod provider;
mod request;
mod server;
mod types;
mod url_guard;
mod validate;
pub mod voices;

use std::sync::Arc;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};

pub use error::{Result, TtsError};
pub use payload::{PayloadOptions, UpstreamPayload};
pub use provider::{SpeechUpstream, UpstreamResponse};
pub use server::{SynthesisProxy, SynthesisProxyBuilder};
pub use types::{AudioSource, NormalizedAudio, ServiceDescription, SynthesisRequest, VoiceSettings};
use request::ExtractPayload;

/// Build the synthesis proxy from configuration
pub fn build_server(config: &voxgate_config::Config) -> anyhow::Result<Arc<SynthesisProxy>> {
    let server = Arc::new(
        SynthesisProxyBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize synthesis proxy: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for voice generation
pub fn endpoint_router() -> Router<Arc<SynthesisProxy>> {
    Router::new()
        .route("/api/generate-voice", get(describe).post(synthesize))
        .route("/api/voices", get(list_voices))
}

/// Handle speech synthesis requests
async fn synthesize(
    State(server): State<Arc<SynthesisProxy>>,
    ExtractPayload(request): ExtractPayload<SynthesisRequest>,
) -> Result<axum::response::Response> {
    tracing::debug!("Voice generation handler called, preview={}", request.preview);

    let audio = server.synthesize(&request).await?;

    Ok(audio.into_response())
}

/// Report readiness and the supported voice identifiers
async fn describe() -> Json<ServiceDescription> {
    Json(ServiceDescription {
        message: "Voice Generation API",
        status: "ready",
        supported_voices: voices::supported_voice_ids(),
    })
}

#[derive(serde::Serialize)]
struct VoiceList {
    voices: &'static [voices::Voice],
}

async fn list_voices() -> Json<VoiceList> {
    Json(VoiceList { voices: &voices::VOICES })
}
