use crate::app_env;
use anyhow::Context;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use opentelemetry::trace::TracerProvider;
use opentelemetry::{KeyValue, global};
use opentelemetry_http::HeaderExtractor;
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::Tracer;
use opentelemetry_sdk::{Resource, runtime};
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing::{Span, debug, debug_span, field};
use tracing_opentelemetry::{MetricsLayer, OpenTelemetryLayer, OpenTelemetrySpanExt};
use tracing_subscriber::{EnvFilter, prelude::*, registry};

const SERVICE_NAME: &str = "todo-rest";

/// Span and metric pipelines feeding an OTLP collector
pub struct OtelExporters {
    pub tracer: Tracer,
    pub meter: SdkMeterProvider,
}

/// Opens a "request" span for an incoming request, continuing whatever W3C trace the
/// caller propagated in its headers
fn request_span(request: &Request<Body>) -> Span {
    let span = debug_span!(
        "request",
        method = request.method().as_str(),
        path = request.uri().path(),
        response_status = field::Empty,
    );
    let caller_context = global::get_text_map_propagator(|propagator| {
        propagator.extract(&HeaderExtractor(request.headers()))
    });
    span.set_parent(caller_context);

    span
}

/// Records the outcome of a request on its span. The duration is emitted as a histogram
/// sample, which only goes anywhere when metric export is configured.
fn record_response(response: &Response<Body>, latency: Duration, span: &Span) {
    span.record("response_status", field::display(response.status()));

    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
    debug!(
        histogram.http_server_request_duration_ms = latency_ms,
        "request processing complete"
    );
}

/// Wraps every route of [router] in a request span
pub fn attach_tracing_http<T>(router: Router<T>) -> Router<T>
where
    T: Clone + Send + Sync + 'static,
{
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(request_span)
            .on_response(record_response),
    )
}

/// Builds OTLP/gRPC exporters for spans and metrics. Both ship data in the background on
/// the Tokio runtime, so this has to be called from inside it.
pub fn init_exporters(
    otlp_traces_endpoint: &str,
    otlp_metrics_endpoint: &str,
) -> Result<OtelExporters, anyhow::Error> {
    let service = Resource::new([KeyValue::new("service.name", SERVICE_NAME)]);

    let span_export = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(otlp_traces_endpoint)
        .build()
        .context("building the span exporter")?;
    let tracer = opentelemetry_sdk::trace::TracerProvider::builder()
        .with_batch_exporter(span_export, runtime::Tokio)
        .with_resource(service.clone())
        .build()
        .tracer(SERVICE_NAME);

    let metric_export = MetricExporter::builder()
        .with_tonic()
        .with_endpoint(otlp_metrics_endpoint)
        .build()
        .context("building the metric exporter")?;
    let meter = SdkMeterProvider::builder()
        .with_reader(PeriodicReader::builder(metric_export, runtime::Tokio).build())
        .with_resource(service)
        .build();

    Ok(OtelExporters { tracer, meter })
}

/// Reads per-module log directives from [app_env::LOG_LEVEL], defaulting to "info"
pub fn init_env_filter() -> Result<EnvFilter, anyhow::Error> {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(app_env::LOG_LEVEL)
        .from_env()
        .with_context(|| format!("parsing the {} filter directives", app_env::LOG_LEVEL))
}

/// Installs the global subscriber. JSON logs on stdout are filtered by [env_filter]; when
/// [otel_exporters] is given, spans and metrics at "debug" and above are exported too.
pub fn setup_logging_and_tracing(env_filter: EnvFilter, otel_exporters: Option<OtelExporters>) {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let (tracer, meter) = match otel_exporters {
        Some(OtelExporters { tracer, meter }) => (Some(tracer), Some(meter)),
        None => (None, None),
    };

    registry()
        .with(LevelFilter::DEBUG)
        .with(tracer.map(OpenTelemetryLayer::new))
        .with(meter.map(MetricsLayer::new))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_filter(env_filter),
        )
        .init();
}
