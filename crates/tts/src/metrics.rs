use std::time::Duration;

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};

use crate::{error::Result, types::NormalizedAudio};

const SYNTHESIS_COUNT: &str = "tts.synthesis.count";
const SYNTHESIS_DURATION: &str = "tts.synthesis.duration";
const AUDIO_BYTES: &str = "tts.audio.bytes";

/// Per-call synthesis instruments
///
/// Backed by the global meter provider, so recording is a no-op until
/// telemetry installs an exporter.
pub struct SynthesisMetrics {
    count: Counter<u64>,
    duration: Histogram<f64>,
    audio_bytes: Histogram<u64>,
}

impl SynthesisMetrics {
    pub fn new() -> Self {
        let meter = global::meter("voxgate");

        Self {
            count: meter
                .u64_counter(SYNTHESIS_COUNT)
                .with_description("Synthesis calls by outcome and response shape")
                .build(),
            duration: meter
                .f64_histogram(SYNTHESIS_DURATION)
                .with_unit("s")
                .with_description("End-to-end synthesis latency")
                .build(),
            audio_bytes: meter
                .u64_histogram(AUDIO_BYTES)
                .with_unit("By")
                .with_description("Size of audio returned to clients")
                .build(),
        }
    }

    pub fn record(&self, result: &Result<NormalizedAudio>, elapsed: Duration) {
        let attributes = match result {
            Ok(audio) => {
                self.audio_bytes
                    .record(u64::try_from(audio.len()).unwrap_or(u64::MAX), &[]);
                [
                    KeyValue::new("outcome", "success"),
                    KeyValue::new("shape", audio.source.as_str()),
                ]
            }
            Err(e) => [KeyValue::new("outcome", e.kind()), KeyValue::new("shape", "none")],
        };

        self.count.add(1, &attributes);
        self.duration.record(elapsed.as_secs_f64(), &attributes);
    }
}

impl Default for SynthesisMetrics {
    fn default() -> Self {
        Self::new()
    }
}
