//! Privacy-preserving hash of the caller's network origin.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Marker stored when no request context is available to hash.
const ERROR_MARKER: &str = "error";

/// Value recorded when the request carried no forwarding header.
const UNKNOWN_ORIGIN: &str = "unknown";

/// SHA-256 digest of the caller's network origin, hex encoded.
///
/// The raw address never reaches the audit trail; only the digest is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OriginHash(String);

impl OriginHash {
    /// Hashes the `x-forwarded-for` header value, or a fixed placeholder
    /// when the header is absent.
    pub fn from_forwarded(forwarded_for: Option<&str>) -> Self {
        let origin = forwarded_for.unwrap_or(UNKNOWN_ORIGIN);
        let digest = Sha256::digest(origin.as_bytes());
        Self(format!("{:x}", digest))
    }

    /// Marker used on the catch-all error path where no request context
    /// is available.
    pub fn error_marker() -> Self {
        Self(ERROR_MARKER.to_string())
    }

    /// Returns the stored representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
