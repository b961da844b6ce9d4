use crate::config::MetricsConfig;
use metrics_exporter_statsd::{StatsdBuilder, StatsdError};
use shared::metrics_defs::{MetricDef, MetricType};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const METRICS_PREFIX: &str = "relay";
const DEFAULT_FILTER: &str = "info";

/// Must run before the tokio runtime starts so the Sentry transport thread is
/// not tied to it.
pub fn init_sentry(dsn: Option<&str>) -> Option<sentry::ClientInitGuard> {
    let dsn = dsn?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

pub fn init_logging(with_sentry: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(with_sentry.then(sentry::integrations::tracing::layer))
        .init();
}

pub fn init_metrics(config: &MetricsConfig, metrics: &[&[MetricDef]]) -> Result<(), StatsdError> {
    let recorder = StatsdBuilder::from(config.statsd_host.as_str(), config.statsd_port)
        .build(Some(METRICS_PREFIX))?;

    if metrics::set_global_recorder(recorder).is_err() {
        tracing::warn!("A metrics recorder is already installed");
        return Ok(());
    }

    for def in metrics.iter().flat_map(|defs| defs.iter()) {
        match def.metric_type {
            MetricType::Counter => metrics::describe_counter!(def.name, def.description),
            MetricType::Gauge => metrics::describe_gauge!(def.name, def.description),
            MetricType::Histogram => metrics::describe_histogram!(def.name, def.description),
        }
    }

    tracing::info!(
        host = %config.statsd_host,
        port = config.statsd_port,
        "Sending metrics to statsd"
    );
    Ok(())
}
