//! AI adapters - Implementations of the ModelProvider port.
//!
//! - `gemini_provider` - Production Google Gemini implementation
//! - `mock_provider` - Configurable test implementation

mod gemini_provider;
mod mock_provider;

pub use gemini_provider::{GeminiConfig, GeminiProvider};
pub use mock_provider::{MockModelError, MockModelProvider};
