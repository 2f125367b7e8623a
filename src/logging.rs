use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "DX_INTEROP_LOG";

/// Install a fmt subscriber. Later calls are ignored.
pub fn init(filter: Option<&str>) {
    let config = crate::config::current();
    let directive = filter.unwrap_or(&config.log_filter);
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(directive));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
    {
        tracing::debug!("Logging initialized");
    }
}
