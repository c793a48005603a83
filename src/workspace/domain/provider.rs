//! Generation provider identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque token identifying which generation backend answered a call.
///
/// The workspace never interprets the token beyond display and equality; a
/// gateway may switch providers mid-session (e.g. a fallback path), and the
/// stage tracker simply adopts whatever identity the result carried.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    /// Creates a provider identity from an arbitrary token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
