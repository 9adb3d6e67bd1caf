//! Authentication configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration (Supabase Auth)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Supabase project base URL
    #[serde(default)]
    pub supabase_url: String,

    /// Supabase anonymous API key
    #[serde(default)]
    pub supabase_anon_key: String,

    /// Token introspection timeout in seconds
    #[serde(default = "default_introspection_timeout")]
    pub introspection_timeout_secs: u64,
}

impl AuthConfig {
    /// Get introspection timeout as Duration
    pub fn introspection_timeout(&self) -> Duration {
        Duration::from_secs(self.introspection_timeout_secs)
    }

    /// Validate authentication configuration
    ///
    /// In production, requires HTTPS for the project URL.
    /// In development, allows localhost with HTTP/HTTPS.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.supabase_url.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__SUPABASE_URL"));
        }
        if self.supabase_anon_key.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__SUPABASE_ANON_KEY"));
        }

        if *environment == Environment::Production && !self.supabase_url.starts_with("https://") {
            return Err(ValidationError::ProjectUrlMustBeHttps);
        }

        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            introspection_timeout_secs: default_introspection_timeout(),
        }
    }
}

fn default_introspection_timeout() -> u64 {
    10
}
