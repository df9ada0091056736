use tracing_subscriber::EnvFilter;

use crate::config::ConfigError;

pub fn init_tracing(level: &str) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_new(level.trim()).map_err(|e| ConfigError::Invalid {
        name: "LOG_LEVEL",
        reason: e.to_string(),
    })?;

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}
