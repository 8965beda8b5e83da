//! Tracing subscriber setup.

use super::tracer;
use crate::infrastructure::paths::trace_file;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service and scope name stamped on exported spans.
pub const SERVICE_NAME: &str = "BinderBuilder";

/// Installs the global subscriber: an `EnvFilter` plus an OpenTelemetry layer
/// exporting to `binderbuilder-traces.json` in the data directory.
///
/// `RUST_LOG` overrides `config.trace_level` when set. Observability is
/// optional: if the data directory cannot be created, nothing is installed.
/// Only the first call takes effect.
///
/// # Example
///
/// ```rust
/// use binderbuilder::observability::init_tracing;
/// use binderbuilder::Config;
///
/// let dir = std::env::temp_dir().join("binderbuilder-doc");
/// let config = Config {
///     data_dir: dir,
///     trace_level: "debug".to_string(),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    if std::fs::create_dir_all(&config.data_dir).is_err() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.trace_level));

    let provider = tracer::file_tracer_provider(trace_file(&config.data_dir), SERVICE_NAME);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init();
}
