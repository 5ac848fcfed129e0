use anyhow::Result;
use std::sync::Arc;

use crate::config::{Config, ValidationResult};
use crate::error::ConfigError;

/// Application configuration and lifecycle
pub struct App {
    config: Arc<Config>,
    validation: ValidationResult,
}

impl App {
    /// Create a new application instance from the on-disk configuration
    pub fn new() -> Result<Self> {
        Ok(Self::with_config(Config::load()?))
    }

    /// Create an application instance from an already-built configuration
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            validation: ValidationResult::default(),
        }
    }

    /// Validate configuration; fails on errors, logs warnings.
    pub fn initialize(&mut self) -> Result<()> {
        self.validation = self.config.validate();

        if !self.validation.is_valid() {
            return Err(ConfigError::Invalid(self.validation.error_summary()).into());
        }

        for warning in &self.validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        tracing::info!(
            "Application initialized (backend: {})",
            self.config.services.api_base_url
        );
        Ok(())
    }

    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the configuration
    pub fn shared_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Warnings collected by the last `initialize`
    pub fn warnings(&self) -> &[crate::config::ConfigValidationError] {
        &self.validation.warnings
    }
}
