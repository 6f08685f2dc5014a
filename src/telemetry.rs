use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directives applied when `RUST_LOG` is unset; sqlx logs every statement at info
pub const DEFAULT_DIRECTIVES: &str = "info,sqlx=warn";

fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// Initialise structured JSON logging on stdout
///
/// `log` records (the request logger) are bridged into the same subscriber.
/// Must be called once per process.
pub fn init_telemetry() {
    let formatting_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .json();

    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_DIRECTIVES))
        .with(formatting_layer)
        .init();
}
