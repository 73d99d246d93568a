//! Tracing subscriber setup
//!
//! Events carry `domain`, `method`, `url`, `status` and `error_kind` fields.
//! Token values and credential material are never recorded.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "mailroute_core=info,mailroute_infra=info";

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install a human-readable fmt subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. Returns `false` when a
/// global subscriber was already installed, in which case nothing changes.
pub fn init_tracing(default_filter: &str) -> bool {
    tracing_subscriber::fmt().with_env_filter(env_filter(default_filter)).with_target(true).try_init().is_ok()
}

/// Same as [`init_tracing`] but emits one JSON object per event.
pub fn init_json_tracing(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter(default_filter))
        .with_current_span(true)
        .try_init()
        .is_ok()
}
