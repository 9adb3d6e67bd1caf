//! Supabase Auth adapter for bearer token validation.
//!
//! This adapter implements the `SessionValidator` port using Supabase as the
//! identity provider. It resolves a token by:
//!
//! 1. Calling Supabase's `/auth/v1/user` endpoint with the token
//! 2. Letting Supabase verify signature, expiry, and revocation
//! 3. Mapping the returned profile to the domain `AuthenticatedUser` type
//!
//! # Example
//!
//! ```ignore
//! use juris_academy_chat::adapters::auth::{SupabaseConfig, SupabaseSessionValidator};
//! use juris_academy_chat::ports::SessionValidator;
//!
//! let config = SupabaseConfig::new("https://xyzcompany.supabase.co", anon_key);
//! let validator = SupabaseSessionValidator::new(config);
//! let user = validator.validate("eyJ...").await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Configuration for the Supabase Auth adapter.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL (e.g., "https://xyzcompany.supabase.co").
    pub project_url: String,

    /// Public API key sent as the `apikey` header on every call.
    anon_key: Secret<String>,

    /// Request timeout.
    pub timeout: Duration,
}

impl SupabaseConfig {
    /// Create a new configuration with required fields.
    pub fn new(project_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            project_url: project_url.into(),
            anon_key: Secret::new(anon_key.into()),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set a custom request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the user-introspection URL for this project.
    fn user_url(&self) -> String {
        format!("{}/auth/v1/user", self.project_url.trim_end_matches('/'))
    }

    /// Exposes the API key (for making requests).
    fn anon_key(&self) -> &str {
        self.anon_key.expose_secret()
    }
}

/// User profile returned by Supabase's user endpoint.
#[derive(Debug, Deserialize)]
struct SupabaseUser {
    /// Subject - the user ID.
    id: String,

    /// User's email address.
    #[serde(default)]
    email: Option<String>,

    /// Set once the email has been confirmed.
    #[serde(default)]
    email_confirmed_at: Option<String>,

    /// Free-form profile metadata.
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,

    #[serde(default)]
    name: Option<String>,
}

/// Error body returned by Supabase on a rejected token.
#[derive(Debug, Default, Deserialize)]
struct SupabaseAuthFailure {
    #[serde(default)]
    msg: Option<String>,
}

/// Supabase session validator.
///
/// Delegates token verification to Supabase and extracts user information.
/// This is the production implementation of `SessionValidator`.
pub struct SupabaseSessionValidator {
    config: SupabaseConfig,
    http_client: reqwest::Client,
}

impl SupabaseSessionValidator {
    /// Create a new Supabase validator.
    pub fn new(config: SupabaseConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Map a rejected-token response body to the auth error taxonomy.
    fn rejection_error(body: &str) -> AuthError {
        let failure: SupabaseAuthFailure = serde_json::from_str(body).unwrap_or_default();
        match failure.msg {
            Some(msg) if msg.to_lowercase().contains("expired") => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }

    /// Map the Supabase profile to the domain user.
    fn map_user(user: SupabaseUser) -> Result<AuthenticatedUser, AuthError> {
        let email = user.email.ok_or_else(|| {
            tracing::warn!("Supabase user missing email");
            AuthError::InvalidToken
        })?;

        let user_id = UserId::new(&user.id).map_err(|_| {
            tracing::warn!("Invalid user ID from Supabase: {}", user.id);
            AuthError::InvalidToken
        })?;

        let display_name = user.user_metadata.full_name.or(user.user_metadata.name);
        let email_verified = user.email_confirmed_at.is_some();

        Ok(AuthenticatedUser::new(
            user_id,
            email,
            display_name,
            email_verified,
        ))
    }
}

#[async_trait]
impl SessionValidator for SupabaseSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let response = self
            .http_client
            .get(self.config.user_url())
            .header("Authorization", format!("Bearer {}", token))
            .header("apikey", self.config.anon_key())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach Supabase Auth: {}", e);
                AuthError::ServiceUnavailable(format!("Failed to reach Supabase Auth: {}", e))
            })?;

        let status = response.status();

        if status.is_success() {
            let user: SupabaseUser = response.json().await.map_err(|e| {
                tracing::error!("Failed to parse Supabase user: {}", e);
                AuthError::ServiceUnavailable(format!("Failed to parse Supabase user: {}", e))
            })?;
            return Self::map_user(user);
        }

        if status.is_server_error() {
            tracing::error!("Supabase Auth returned {}", status);
            return Err(AuthError::ServiceUnavailable(format!(
                "Supabase Auth returned {}",
                status
            )));
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Token rejected by Supabase ({}): {}", status, body);
        Err(Self::rejection_error(&body))
    }
}

impl std::fmt::Debug for SupabaseSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseSessionValidator")
            .field("project_url", &self.config.project_url)
            .finish_non_exhaustive()
    }
}
