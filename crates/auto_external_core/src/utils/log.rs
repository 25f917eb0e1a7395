use std::sync::atomic::{AtomicBool, Ordering};

static IS_TRACING_ENABLED: AtomicBool = AtomicBool::new(false);

/// Installs a `tracing` subscriber when `TRACE` is set, using it as the
/// filter, e.g. `TRACE=auto_external_core=trace`. Safe to call repeatedly.
pub fn enable_tracing_by_env() {
    let filter = match std::env::var("TRACE") {
        Ok(filter) if !filter.is_empty() => filter,
        _ => return,
    };
    if IS_TRACING_ENABLED.swap(true, Ordering::SeqCst) {
        return;
    }

    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    let installed = tracing_subscriber::registry()
        .with(fmt::layer().with_file(true).with_line_number(true))
        .with(EnvFilter::new(filter))
        .try_init();
    if installed.is_err() {
        tracing::trace!("a global subscriber was already installed");
    }
}
