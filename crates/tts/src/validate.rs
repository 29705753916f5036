use std::num::FpCategory;

use voxgate_config::SynthesisConfig;

use crate::{
    error::{Result, TtsError},
    types::SynthesisRequest,
    voices::DEFAULT_VOICE,
};

/// Longest text accepted for a full synthesis, in characters
pub const MAX_TEXT_CHARS: usize = 5000;

/// Previews are cut to this many characters before reaching the provider
pub const PREVIEW_CHARS: usize = 100;

/// Stability and similarity boost used when the client sends none
pub const DEFAULT_VOICE_SETTING: f64 = 0.75;

/// A request that passed validation, with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisParams {
    pub text: String,
    pub voice: String,
    pub stability: f64,
    pub similarity_boost: f64,
}

/// Validate a request and resolve the values sent upstream
///
/// Character counts are Unicode scalar values. Previews are never rejected
/// for length; they are silently cut to [`PREVIEW_CHARS`].
pub fn prepare(request: &SynthesisRequest, policy: &SynthesisConfig) -> Result<SynthesisParams> {
    if request.text.trim().is_empty() {
        return Err(TtsError::InvalidInput("Text is required".to_string()));
    }

    let text = if request.preview {
        request.text.chars().take(PREVIEW_CHARS).collect()
    } else {
        if request.text.chars().count() > MAX_TEXT_CHARS {
            return Err(TtsError::InvalidInput(format!(
                "Text too long. Maximum {MAX_TEXT_CHARS} characters allowed."
            )));
        }
        request.text.clone()
    };

    let settings = &request.settings;

    let voice = settings
        .voice
        .as_deref()
        .map(str::trim)
        .filter(|voice| !voice.is_empty())
        .unwrap_or(DEFAULT_VOICE)
        .to_string();

    if settings.speed.is_some() || settings.pitch.is_some() {
        tracing::debug!(
            speed = ?settings.speed,
            pitch = ?settings.pitch,
            "speed and pitch are not supported by the provider and are ignored"
        );
    }

    Ok(SynthesisParams {
        text,
        voice,
        stability: resolve_setting(settings.stability, policy),
        similarity_boost: resolve_setting(settings.clarity, policy),
    })
}

fn resolve_setting(value: Option<f64>, policy: &SynthesisConfig) -> f64 {
    match value {
        None => DEFAULT_VOICE_SETTING,
        Some(v) if v.is_nan() => DEFAULT_VOICE_SETTING,
        Some(v) if policy.zero_means_default && v.classify() == FpCategory::Zero => DEFAULT_VOICE_SETTING,
        Some(v) => v.clamp(0.0, 1.0),
    }
}
