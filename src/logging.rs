//! Logging setup
//!
//! Installs the global tracing subscriber from [`LoggingConfig`].
//! `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::config::LoggingConfig;

/// Build the filter: `RUST_LOG` if set, else the configured level for this crate
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "growthdash={level},tower_http={level}",
            level = config.level
        ))
    })
}

/// Install the global subscriber
///
/// `format = "json"` emits one JSON object per event; anything else is the
/// human-readable format.
pub fn init(config: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Run `f` under a temporary stderr subscriber
///
/// Config has to be loaded before [`init`] can run; this keeps the loader's
/// warnings visible. `RUST_LOG` applies here as well.
pub fn with_bootstrap<T>(default_level: &str, f: impl FnOnce() -> T) -> T {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("growthdash={}", default_level)));
    with_bootstrap_writer(filter, std::io::stderr, f)
}

pub(crate) fn with_bootstrap_writer<W, T>(filter: EnvFilter, writer: W, f: impl FnOnce() -> T) -> T
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false),
    );
    tracing::subscriber::with_default(subscriber, f)
}
