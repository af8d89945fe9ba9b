use crate::utils::Result;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize the tracing subscriber with default settings
pub fn init_tracing() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| crate::utils::Error::Logging(e.to_string()))
}

/// Initialize the tracing subscriber honoring the configured log level
pub fn init_tracing_with_config(settings: &crate::config::Settings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log.level.clone()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| crate::utils::Error::Logging(e.to_string()))
}
