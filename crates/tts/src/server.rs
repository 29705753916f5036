use std::time::Instant;

use voxgate_config::SynthesisConfig;

use crate::{
    classify::{Classified, classify},
    error::{Result, TtsError},
    metrics::SynthesisMetrics,
    payload::{PayloadOptions, UpstreamPayload},
    provider::{
        SpeechUpstream,
        chat_completions::{ChatCompletionsSettings, ChatCompletionsUpstream},
    },
    types::{AudioSource, DEFAULT_AUDIO_MIME, NormalizedAudio, SynthesisRequest},
    validate::prepare,
    voices,
};

/// Turns client synthesis requests into playable audio
///
/// Each call makes one synthesis request and, when the provider answers with
/// an audio URL, one follow-up fetch. Nothing is retried.
pub struct SynthesisProxy {
    upstream: Box<dyn SpeechUpstream>,
    payload: PayloadOptions,
    policy: SynthesisConfig,
    metrics: SynthesisMetrics,
}

impl SynthesisProxy {
    pub fn new(upstream: Box<dyn SpeechUpstream>, payload: PayloadOptions, policy: SynthesisConfig) -> Self {
        Self {
            upstream,
            payload,
            policy,
            metrics: SynthesisMetrics::new(),
        }
    }

    /// Synthesize speech and normalize whatever shape the provider returns
    pub async fn synthesize(&self, request: &SynthesisRequest) -> Result<NormalizedAudio> {
        let started = Instant::now();
        let result = self.run(request).await;

        match &result {
            Ok(audio) => tracing::debug!(
                "Synthesis complete: source={}, mime={}, {} bytes",
                audio.source.as_str(),
                audio.mime_type,
                audio.len()
            ),
            Err(e) => tracing::debug!("Synthesis failed: kind={}, {e}", e.kind()),
        }

        self.metrics.record(&result, started.elapsed());
        result
    }

    async fn run(&self, request: &SynthesisRequest) -> Result<NormalizedAudio> {
        let params = prepare(request, &self.policy)?;

        if voices::find(&params.voice).is_none() {
            tracing::debug!("Voice '{}' is not in the catalog, forwarding as-is", params.voice);
        }

        tracing::debug!(
            "Synthesizing via {}: voice={}, preview={}, chars={}",
            self.upstream.name(),
            params.voice,
            request.preview,
            params.text.chars().count()
        );

        let payload = UpstreamPayload::build(&params, &self.payload)?;
        let response = self.upstream.synthesize(&payload).await?;

        let audio = match classify(response) {
            Classified::Audio { bytes, content_type } => NormalizedAudio {
                bytes,
                mime_type: content_type,
                source: AudioSource::Binary,
            },
            Classified::DataUri(bytes) => NormalizedAudio {
                bytes,
                mime_type: DEFAULT_AUDIO_MIME.to_string(),
                source: AudioSource::DataUri,
            },
            Classified::RemoteUrl(url) => {
                tracing::debug!("Provider returned an audio URL, fetching {url}");

                let fetched = self.upstream.fetch_audio(&url).await.map_err(|e| {
                    tracing::error!("Fetching provider audio URL failed: {e}");
                    TtsError::UnexpectedFormat
                })?;

                NormalizedAudio {
                    bytes: fetched.body,
                    mime_type: fetched.content_type.unwrap_or_else(|| DEFAULT_AUDIO_MIME.to_string()),
                    source: AudioSource::RemoteUrl,
                }
            }
            Classified::Unlabeled(bytes) => NormalizedAudio {
                bytes,
                mime_type: DEFAULT_AUDIO_MIME.to_string(),
                source: AudioSource::Unlabeled,
            },
            Classified::Unrecognized(reason) => {
                tracing::error!("Unexpected response from voice API: {reason}");
                return Err(TtsError::UnexpectedFormat);
            }
        };

        if audio.is_empty() {
            tracing::error!("Voice API returned no audio ({})", audio.source.as_str());
            return Err(TtsError::EmptyAudio);
        }

        Ok(audio)
    }
}

/// Builder for constructing the proxy from configuration
pub struct SynthesisProxyBuilder<'a> {
    config: &'a voxgate_config::Config,
}

impl<'a> SynthesisProxyBuilder<'a> {
    pub const fn new(config: &'a voxgate_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> anyhow::Result<SynthesisProxy> {
        let upstream = &self.config.upstream;

        let settings = ChatCompletionsSettings {
            url: upstream.url.clone(),
            api_key: upstream.api_key.clone(),
            customer_id: upstream.customer_id.clone(),
            timeout: upstream.timeout_duration()?,
            fetch_timeout: upstream.audio_fetch.timeout_duration()?,
            block_private_addresses: upstream.audio_fetch.block_private_addresses,
            max_fetch_bytes: upstream.audio_fetch.max_bytes,
        };

        let name = upstream.url.host_str().unwrap_or("upstream").to_string();
        let provider = ChatCompletionsUpstream::new(name, settings)
            .map_err(|e| anyhow::anyhow!("failed to build upstream HTTP client: {e}"))?;

        tracing::debug!("Synthesis proxy initialized with upstream {}", provider.name());

        Ok(SynthesisProxy::new(
            Box::new(provider),
            PayloadOptions {
                model: upstream.model.clone(),
                voice_model: upstream.voice_model.clone(),
            },
            self.config.synthesis.clone(),
        ))
    }
}
