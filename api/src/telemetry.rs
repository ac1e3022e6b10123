use crate::config::LogFormat;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber. Level comes from `RUST_LOG`, defaulting to `info`.
/// Fails if a global subscriber is already set.
pub fn init(format: LogFormat) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter);

    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}
