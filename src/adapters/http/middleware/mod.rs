//! HTTP middleware.

pub mod auth;

pub use auth::{resolve_session, AuthAttempt, AuthState};
