//! Typed user identifier.
//!
//! Wraps a UUID. New ids are UUIDv7 (time-ordered); ids handed to us by the
//! auth provider are parsed from standard UUID text. The `short()` form is for
//! human-facing output only, never a lookup key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A user identifier.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(uuid::Uuid);

/// Fixed namespace for deriving deterministic UserIds from a handle.
const STUDYSPHERE_USER_NS: uuid::Uuid = uuid::uuid!("3f6d1c2a-9b8e-4d57-8a21-5c0e7f4b9d13");

impl UserId {
    /// Create a new time-ordered ID (UUIDv7).
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Deterministic id for a handle (UUIDv5).
    ///
    /// Used by fixed-identity auth providers so the same handle always maps
    /// to the same id across runs.
    pub fn from_handle(handle: &str) -> Self {
        Self(uuid::Uuid::new_v5(&STUDYSPHERE_USER_NS, handle.as_bytes()))
    }

    /// Parse from hex or standard UUID text.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        uuid::Uuid::parse_str(s).map(Self)
    }

    /// First 8 hex characters, for display only.
    pub fn short(&self) -> String {
        self.0.as_simple().to_string()[..8].to_string()
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<uuid::Uuid> for UserId {
    fn from(u: uuid::Uuid) -> Self {
        Self(u)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.short())
    }
}
