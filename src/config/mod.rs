//! Application configuration
//!
//! Configuration is loaded from environment variables with the
//! `JURIS_ACADEMY` prefix. Nested fields use `__` as the separator,
//! e.g. `JURIS_ACADEMY__SERVER__PORT=3000`.
//!
//! A `.env` file in the working directory is honored in development.

mod ai;
mod auth;
mod database;
mod error;
mod server;

pub use ai::AiConfig;
pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Supabase Auth settings
    #[serde(default)]
    pub auth: AuthConfig,

    /// Gemini model provider settings
    #[serde(default)]
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Reads a `.env` file first if one exists, then overlays process
    /// environment variables prefixed with `JURIS_ACADEMY`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("JURIS_ACADEMY")
                    .separator("__"),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        Ok(app_config)
    }

    /// Validate the full configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.ai.validate()?;
        Ok(())
    }

    /// Whether the server runs in production mode
    pub fn is_production(&self) -> bool {
        self.server.environment == Environment::Production
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            ai: AiConfig::default(),
        }
    }
}
