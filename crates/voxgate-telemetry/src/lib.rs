//! Telemetry for voxgate
//!
//! Provides logging through the `tracing` ecosystem with optional
//! OpenTelemetry export of traces and synthesis metrics

mod metadata;

use std::{str::FromStr, time::Duration};

use opentelemetry::{global, trace::TracerProvider};
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    metrics::{PeriodicReader, SdkMeterProvider},
    trace::{Sampler, SdkTracerProvider},
};
use tracing_subscriber::{Layer, registry::LookupSpan};
use voxgate_config::{
    TelemetryConfig,
    telemetry::exporters::{ExportProtocol, ExporterConfig},
};

/// Shape of log lines written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}', expected 'text' or 'json'")),
        }
    }
}

/// Keeps the OTLP providers alive; flushes and shuts them down on drop
#[derive(Default)]
pub struct TelemetryGuard {
    meter_provider: Option<SdkMeterProvider>,
    tracer_provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Push buffered metrics to the exporter now
    ///
    /// # Errors
    ///
    /// Returns an error if the meter provider fails to flush
    pub fn force_flush(&self) -> anyhow::Result<()> {
        self.meter_provider
            .as_ref()
            .map_or(Ok(()), SdkMeterProvider::force_flush)
            .map_err(|e| anyhow::anyhow!("failed to flush metrics: {e}"))
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        let metrics = self.meter_provider.take().map(|p| ("meter", p.shutdown()));
        let traces = self.tracer_provider.take().map(|p| ("tracer", p.shutdown()));

        for (provider, result) in [metrics, traces].into_iter().flatten() {
            if let Err(e) = result {
                eprintln!("failed to shutdown {provider} provider: {e}");
            }
        }
    }
}

fn fmt_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    match format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .boxed(),
    }
}

/// Initialize telemetry from configuration
///
/// Logs always go to stdout. When `[telemetry.exporter]` is present, spans
/// and synthesis metrics are also exported over OTLP. The returned guard
/// must be held for the lifetime of the application.
///
/// # Errors
///
/// Returns an error if an OTLP exporter cannot be built
pub fn init(config: Option<&TelemetryConfig>, log_filter: &str, format: LogFormat) -> anyhow::Result<TelemetryGuard> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_new(log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter).with(fmt_layer(format));

    let Some((telemetry_config, exporter_config)) =
        config.and_then(|c| c.exporter.as_ref().map(|exporter| (c, exporter)))
    else {
        registry.init();
        return Ok(TelemetryGuard::default());
    };

    let resource = metadata::build_resource(telemetry_config);

    let meter_provider = SdkMeterProvider::builder()
        .with_resource(resource.clone())
        .with_reader(
            PeriodicReader::builder(metric_exporter(exporter_config)?)
                .with_interval(Duration::from_secs(exporter_config.export_interval))
                .build(),
        )
        .build();

    let tracer_provider = SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(sampler(telemetry_config))
        .with_batch_exporter(span_exporter(exporter_config)?)
        .build();

    global::set_meter_provider(meter_provider.clone());
    global::set_tracer_provider(tracer_provider.clone());

    registry
        .with(tracing_opentelemetry::layer().with_tracer(tracer_provider.tracer("voxgate")))
        .init();

    tracing::debug!(
        endpoint = %exporter_config.endpoint,
        protocol = ?exporter_config.protocol,
        "OTLP export enabled"
    );

    Ok(TelemetryGuard {
        meter_provider: Some(meter_provider),
        tracer_provider: Some(tracer_provider),
    })
}

fn metric_exporter(config: &ExporterConfig) -> anyhow::Result<MetricExporter> {
    let endpoint = config.endpoint.as_str();

    match config.protocol {
        ExportProtocol::Grpc => MetricExporter::builder().with_tonic().with_endpoint(endpoint).build(),
        ExportProtocol::HttpProto => MetricExporter::builder().with_http().with_endpoint(endpoint).build(),
    }
    .map_err(|e| anyhow::anyhow!("failed to build {:?} metrics exporter: {e}", config.protocol))
}

fn span_exporter(config: &ExporterConfig) -> anyhow::Result<SpanExporter> {
    let endpoint = config.endpoint.as_str();

    match config.protocol {
        ExportProtocol::Grpc => SpanExporter::builder().with_tonic().with_endpoint(endpoint).build(),
        ExportProtocol::HttpProto => SpanExporter::builder().with_http().with_endpoint(endpoint).build(),
    }
    .map_err(|e| anyhow::anyhow!("failed to build {:?} span exporter: {e}", config.protocol))
}

/// Sampler derived from the optional `[telemetry.tracing]` section
fn sampler(config: &TelemetryConfig) -> Sampler {
    let (rate, parent_based) = config
        .tracing
        .as_ref()
        .map_or((1.0, true), |t| (t.sampling_rate, t.parent_based));

    let sampler = if rate >= 1.0 {
        Sampler::AlwaysOn
    } else if rate <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(rate)
    };

    if parent_based {
        Sampler::ParentBased(Box::new(sampler))
    } else {
        sampler
    }
}
