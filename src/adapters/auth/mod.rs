//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `supabase` - Production Supabase Auth implementation
//! - `mock` - Test implementation that doesn't require external services

mod mock;
mod supabase;

pub use mock::MockSessionValidator;
pub use supabase::{SupabaseConfig, SupabaseSessionValidator};
