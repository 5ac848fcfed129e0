pub mod app;
pub mod config;
pub mod error;

pub use app::App;
pub use config::{
    AutocompleteConfig, Config, Language, LocationConfig, ServiceConfig, UiConfig,
    ValidationResult,
};
pub use error::{AppError, ConfigError, EnvironmentError, LocationError, NetworkError};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Logs go to stderr; stdout belongs to the dashboard
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    tracing::info!("EcoMonitor core initialized");
    Ok(())
}
