use serde::Serialize;

use crate::{
    error::{Result, TtsError},
    validate::SynthesisParams,
};

/// Model names placed in the upstream request
#[derive(Debug, Clone)]
pub struct PayloadOptions {
    /// Completion-level model identifier
    pub model: String,
    /// Voice model requested inside the synthesis instruction
    pub voice_model: String,
}

/// Body of the synthesis call
///
/// The provider exposes a chat-completions interface, so synthesis
/// parameters travel as the JSON-encoded content of a single user message.
/// Generation is kept near-deterministic.
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamPayload {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct SynthesisInstruction<'a> {
    text: &'a str,
    voice: &'a str,
    model_id: &'a str,
    voice_settings: InstructionVoiceSettings,
    pronunciation_dictionary_locators: [(); 0],
    seed: Option<u64>,
    previous_text: Option<&'a str>,
    next_text: Option<&'a str>,
    previous_request_ids: [(); 0],
    next_request_ids: [(); 0],
}

#[derive(Debug, Serialize)]
struct InstructionVoiceSettings {
    stability: f64,
    similarity_boost: f64,
    style: f64,
    use_speaker_boost: bool,
}

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f64 = 0.1;

impl UpstreamPayload {
    pub fn build(params: &SynthesisParams, options: &PayloadOptions) -> Result<Self> {
        let instruction = SynthesisInstruction {
            text: &params.text,
            voice: &params.voice,
            model_id: &options.voice_model,
            voice_settings: InstructionVoiceSettings {
                stability: params.stability,
                similarity_boost: params.similarity_boost,
                style: 0.0,
                use_speaker_boost: true,
            },
            pronunciation_dictionary_locators: [],
            seed: None,
            previous_text: None,
            next_text: None,
            previous_request_ids: [],
            next_request_ids: [],
        };

        let content = serde_json::to_string(&instruction).map_err(|e| {
            tracing::error!("Failed to encode synthesis instruction: {e}");
            TtsError::InternalError
        })?;

        Ok(Self {
            model: options.model.clone(),
            messages: vec![Message { role: "user", content }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        })
    }
}
