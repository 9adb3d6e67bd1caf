//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Supabase session validation (plus a mock for tests)
//! - `ai` - Gemini model provider (plus a mock for tests)
//! - `postgres` - sqlx-backed store implementations
//! - `http` - axum routes, DTOs, and middleware
//! - `retry` - tokio-backed retry delay

pub mod ai;
pub mod auth;
pub mod http;
pub mod postgres;
pub mod retry;

pub use retry::TokioRetryDelay;
