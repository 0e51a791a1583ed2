use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::SystemTime;

/// Filter used when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_FILTER: &str = "info";

/// Install the process-wide subscriber with [`DEFAULT_FILTER`].
pub fn init() {
    init_with(DEFAULT_FILTER);
}

/// JSON lines to stdout, one object per event, with the enclosing span's fields.
///
/// `RUST_LOG` takes precedence over `fallback`. Returns `false` when a global
/// subscriber was already installed; later calls are no-ops.
pub fn init_with(fallback: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_timer(SystemTime)
        .with_target(false)
        .try_init()
        .is_ok()
}
