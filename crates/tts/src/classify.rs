use base64::{
    Engine,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use bytes::Bytes;
use serde::Deserialize;
use url::Url;

use crate::provider::UpstreamResponse;

/// Standard alphabet, padding optional, as browsers' `atob` accepts
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const DATA_URI_AUDIO_PREFIX: &str = "data:audio";

/// What an upstream response turned out to contain
#[derive(Debug, PartialEq, Eq)]
pub enum Classified {
    /// Declared audio content type; body is the audio
    Audio { bytes: Bytes, content_type: String },
    /// JSON envelope with inline base64 audio, already decoded
    DataUri(Bytes),
    /// JSON envelope pointing at audio to fetch
    RemoteUrl(Url),
    /// No usable content type; body may still be audio
    Unlabeled(Bytes),
    /// JSON that carries no recognizable audio; the reason is for logs only
    Unrecognized(String),
}

#[derive(Debug, Deserialize)]
struct CompletionEnvelope {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<serde_json::Value>,
}

/// Decide which response shape the provider used
///
/// JSON is checked before audio so an `application/json` body is never
/// streamed to the client as sound.
pub fn classify(response: UpstreamResponse) -> Classified {
    let content_type = response.content_type.unwrap_or_default();
    let lowered = content_type.to_ascii_lowercase();

    if is_json(&lowered) {
        classify_envelope(&response.body)
    } else if lowered.contains("audio") {
        Classified::Audio {
            bytes: response.body,
            content_type,
        }
    } else {
        Classified::Unlabeled(response.body)
    }
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    content_type.contains("application/json") || essence.ends_with("+json")
}

fn classify_envelope(body: &[u8]) -> Classified {
    let envelope: CompletionEnvelope = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(e) => return Classified::Unrecognized(format!("body is not a completion envelope: {e}")),
    };

    let content = envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content);

    match content {
        Some(serde_json::Value::String(text)) => classify_content(text.trim()),
        Some(other) => Classified::Unrecognized(format!("message content is not a string: {other}")),
        None => Classified::Unrecognized("envelope has no message content".to_string()),
    }
}

fn classify_content(content: &str) -> Classified {
    if content.starts_with(DATA_URI_AUDIO_PREFIX) {
        return decode_data_uri(content);
    }

    if content.starts_with("http") {
        return match Url::parse(content) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Classified::RemoteUrl(url),
            Ok(url) => Classified::Unrecognized(format!("unsupported audio URL scheme '{}'", url.scheme())),
            Err(e) => Classified::Unrecognized(format!("message content is not a valid URL: {e}")),
        };
    }

    let preview: String = content.chars().take(64).collect();
    Classified::Unrecognized(format!("message content is neither audio nor a URL: {preview:?}"))
}

fn decode_data_uri(uri: &str) -> Classified {
    let Some((_, encoded)) = uri.split_once(',') else {
        return Classified::Unrecognized("data URI has no payload".to_string());
    };

    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    match LENIENT_BASE64.decode(compact) {
        Ok(bytes) => Classified::DataUri(Bytes::from(bytes)),
        Err(e) => Classified::Unrecognized(format!("data URI payload is not valid base64: {e}")),
    }
}
