use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

/// Installs the log subscriber for the current thread.
///
/// Records emitted through the `log` macros are forwarded to it. Logging stays
/// active for as long as the returned guard is held. `RUST_LOG` replaces the
/// default filter.
pub fn init(debug: bool) -> DefaultGuard {
    // Only fails when a logger is already installed.
    let _ = tracing_log::LogTracer::init();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(debug)));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_default(subscriber)
}

fn directive(debug: bool) -> String {
    let level = if debug { "debug" } else { "info" };
    format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level)
}
