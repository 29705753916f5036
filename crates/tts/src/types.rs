use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http::{HeaderValue, header};
use serde::{Deserialize, Serialize};

/// MIME type used whenever the provider does not declare one
pub const DEFAULT_AUDIO_MIME: &str = "audio/mpeg";

/// Speech synthesis request as sent by the voice UI
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SynthesisRequest {
    /// Text to speak
    #[serde(default)]
    pub text: String,
    /// Voice and tuning options; every field may be omitted
    #[serde(default)]
    pub settings: VoiceSettings,
    /// Short voice sample rather than a full synthesis
    #[serde(default)]
    pub preview: bool,
}

/// Voice options as sent by the voice UI
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceSettings {
    /// Voice identifier from the catalog
    #[serde(default)]
    pub voice: Option<String>,
    /// Playback speed; accepted but not forwarded
    #[serde(default)]
    pub speed: Option<f64>,
    /// Pitch shift; accepted but not forwarded
    #[serde(default)]
    pub pitch: Option<f64>,
    /// Voice stability (0.0 to 1.0)
    #[serde(default)]
    pub stability: Option<f64>,
    /// Similarity boost (0.0 to 1.0)
    #[serde(default)]
    pub clarity: Option<f64>,
}

/// Which upstream response shape produced the audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSource {
    /// Response declared an audio content type
    Binary,
    /// JSON envelope carrying a base64 data URI
    DataUri,
    /// JSON envelope pointing at a remote audio file
    RemoteUrl,
    /// Unlabeled body taken as audio
    Unlabeled,
}

impl AudioSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::DataUri => "data_uri",
            Self::RemoteUrl => "remote_url",
            Self::Unlabeled => "unlabeled",
        }
    }
}

/// Playable audio produced by a successful synthesis
#[derive(Debug, Clone)]
pub struct NormalizedAudio {
    pub bytes: Bytes,
    pub mime_type: String,
    pub source: AudioSource,
}

impl NormalizedAudio {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl IntoResponse for NormalizedAudio {
    fn into_response(self) -> Response {
        let content_type =
            HeaderValue::from_str(&self.mime_type).unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_AUDIO_MIME));

        (
            [
                (header::CONTENT_TYPE, content_type),
                (header::CONTENT_LENGTH, HeaderValue::from(self.bytes.len())),
                (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
            ],
            self.bytes,
        )
            .into_response()
    }
}

/// Readiness answer for `GET /api/generate-voice`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescription {
    pub message: &'static str,
    pub status: &'static str,
    pub supported_voices: Vec<&'static str>,
}
