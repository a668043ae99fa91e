//! Caller identity.

use serde::{Deserialize, Serialize};

/// A resolved principal. Just an opaque subject id: no roles, scopes, or
/// session state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub sub: String,
}

impl Identity {
    pub fn new(sub: impl Into<String>) -> Self {
        Self { sub: sub.into() }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sub)
    }
}
