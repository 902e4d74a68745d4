//! Tracing subscriber setup
//!
//! Installs an `EnvFilter` (a set `RUST_LOG` wins over the configured level),
//! a pretty or JSON formatter writing to stderr, and, when an OTLP endpoint
//! is configured, a span exporter over OTLP/HTTP.

use anyhow::{Context, Result};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

const SERVICE_NAME: &str = "disasterwatch";
const TRACES_PATH: &str = "/v1/traces";

/// Flushes exported spans on drop
pub struct LoggingGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for LoggingGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("Failed to flush trace exporter: {e}");
            }
        }
    }
}

/// Install the global subscriber. `verbose` raises the default level to debug.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<LoggingGuard> {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = env_filter(level);

    let fmt_layer = match config.format.as_str() {
        "json" => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        _ => fmt::layer().with_target(false).with_writer(std::io::stderr).boxed(),
    };

    let provider = config
        .otlp_endpoint
        .as_deref()
        .map(tracer_provider)
        .transpose()?;
    let otel_layer = provider
        .as_ref()
        .map(|provider| tracing_opentelemetry::layer().with_tracer(provider.tracer(SERVICE_NAME)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(endpoint) = &config.otlp_endpoint {
        tracing::info!("Exporting spans to {}", traces_endpoint(endpoint));
    }

    Ok(LoggingGuard { provider })
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn tracer_provider(endpoint: &str) -> Result<SdkTracerProvider> {
    let exporter = SpanExporter::builder()
        .with_http()
        .with_endpoint(traces_endpoint(endpoint))
        .build()
        .with_context(|| format!("Failed to build OTLP exporter for {endpoint}"))?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(Resource::builder().with_service_name(SERVICE_NAME).build())
        .build())
}

/// Collector base URL to the OTLP/HTTP traces URL
fn traces_endpoint(endpoint: &str) -> String {
    let base = endpoint.trim_end_matches('/');
    if base.ends_with(TRACES_PATH) {
        base.to_string()
    } else {
        format!("{base}{TRACES_PATH}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:4318", "http://localhost:4318/v1/traces")]
    #[case("http://localhost:4318/", "http://localhost:4318/v1/traces")]
    #[case("https://otel.example.org/v1/traces", "https://otel.example.org/v1/traces")]
    fn test_traces_endpoint(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(traces_endpoint(input), expected);
    }

    #[test]
    fn test_guard_without_exporter_drops_cleanly() {
        drop(LoggingGuard { provider: None });
    }
}
