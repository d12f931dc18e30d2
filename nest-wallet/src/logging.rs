//! Tracing subscriber setup for hosts embedding the session manager

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global subscriber reading `RUST_LOG` (default `info`).
///
/// Set `NEST_LOG_JSON=1` for JSON lines. Calling this more than once is harmless.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let use_json = std::env::var("NEST_LOG_JSON")
        .map(|value| value == "1")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let _ = if use_json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
}
