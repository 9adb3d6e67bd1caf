//! Authentication middleware and extractor for axum.
//!
//! This module provides:
//! - `resolve_session` - Layer that resolves Bearer tokens against the
//!   `SessionValidator` port and injects the outcome into extensions
//! - `AuthAttempt` - Extractor that reads the resolved outcome
//!
//! # Architecture
//!
//! Resolution happens in the middleware; enforcement happens in handlers.
//! Failed attempts are not short-circuited here: they flow on to the route
//! so every request, authenticated or not, reaches the audit trail.
//!
//! ```text
//! Request → resolve_session → injects AuthAttempt into extensions
//!                                      ↓
//!                              Handler → AuthAttempt extractor decides 401
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Auth middleware state - wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

/// Outcome of bearer-token resolution for one request.
///
/// A missing header resolves to `Failed(MissingToken)` so handlers can treat
/// "no credential" and "bad credential" uniformly.
#[derive(Debug, Clone)]
pub enum AuthAttempt {
    /// The token resolved to a user.
    Authenticated(AuthenticatedUser),
    /// No usable credential; carries the failure for status mapping.
    Failed(AuthError),
}

impl AuthAttempt {
    /// Returns the authenticated user, if resolution succeeded.
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            AuthAttempt::Authenticated(user) => Some(user),
            AuthAttempt::Failed(_) => None,
        }
    }
}

/// Middleware that resolves the Bearer token on every request.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the `SessionValidator` port
/// 3. Injects an `AuthAttempt` into request extensions
/// 4. Always continues to the route; rejection is the handler's call
///
/// # Token Extraction
///
/// Expects the token in the `Authorization` header with `Bearer` prefix:
/// ```text
/// Authorization: Bearer <token>
/// ```
pub async fn resolve_session(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let attempt = match bearer_token(request.headers()) {
        Some(token) => match validator.validate(token).await {
            Ok(user) => AuthAttempt::Authenticated(user),
            Err(e) => {
                tracing::warn!(error = %e, "Bearer token rejected");
                AuthAttempt::Failed(e)
            }
        },
        None => AuthAttempt::Failed(AuthError::MissingToken),
    };

    request.extensions_mut().insert(attempt);
    next.run(request).await
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl<S> axum::extract::FromRequestParts<S> for AuthAttempt
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // A missing extension means the middleware is not installed on
            // this route; treat the request as unauthenticated.
            let attempt = parts
                .extensions
                .get::<AuthAttempt>()
                .cloned()
                .unwrap_or(AuthAttempt::Failed(AuthError::MissingToken));
            Ok(attempt)
        })
    }
}
