//! Object store error types.

use std::io;
use thiserror::Error;

/// What went wrong, independent of the backend's wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// The backend's access policy rejected the call.
    PolicyViolation,
    /// Target key already exists and overwrite was not requested.
    Duplicate,
    /// Object exceeds the backend's size ceiling.
    PayloadTooLarge,
    /// Key (or signed URL target) does not exist.
    NotFound,
    /// Key is not a valid slash-delimited object key.
    InvalidKey,
    /// Signed URL is past its expiry or was never issued.
    Expired,
    /// Transport or filesystem failure.
    Io,
    /// Anything else.
    Other,
}

impl StoreErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreErrorKind::PolicyViolation => "policy",
            StoreErrorKind::Duplicate => "duplicate",
            StoreErrorKind::PayloadTooLarge => "size",
            StoreErrorKind::NotFound => "not_found",
            StoreErrorKind::InvalidKey => "invalid_key",
            StoreErrorKind::Expired => "expired",
            StoreErrorKind::Io => "io",
            StoreErrorKind::Other => "other",
        }
    }

    /// Best-effort kind for a backend that only hands back a message.
    ///
    /// Backends in this crate construct kinds directly; this exists for
    /// adapters over clients that report errors as bare strings.
    pub fn classify(message: &str) -> Self {
        let m = message.to_ascii_lowercase();
        if m.contains("policy") {
            StoreErrorKind::PolicyViolation
        } else if m.contains("duplicate") || m.contains("already exists") {
            StoreErrorKind::Duplicate
        } else if m.contains("size") || m.contains("too large") {
            StoreErrorKind::PayloadTooLarge
        } else if m.contains("not found") {
            StoreErrorKind::NotFound
        } else if m.contains("expired") {
            StoreErrorKind::Expired
        } else {
            StoreErrorKind::Other
        }
    }
}

impl std::fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object store error: a structured kind plus the backend's message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Build from a bare message, inferring the kind.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: StoreErrorKind::classify(&message),
            message,
        }
    }

    pub fn policy(key: &str) -> Self {
        Self::new(
            StoreErrorKind::PolicyViolation,
            format!("new row violates row-level security policy for {key}"),
        )
    }

    pub fn duplicate(key: &str) -> Self {
        Self::new(StoreErrorKind::Duplicate, format!("the resource already exists: {key}"))
    }

    pub fn too_large(size: u64, max: u64) -> Self {
        Self::new(
            StoreErrorKind::PayloadTooLarge,
            format!("object size {size} exceeds the maximum allowed size {max}"),
        )
    }

    pub fn not_found(key: &str) -> Self {
        Self::new(StoreErrorKind::NotFound, format!("object not found: {key}"))
    }

    pub fn invalid_key(key: &str) -> Self {
        Self::new(StoreErrorKind::InvalidKey, format!("invalid key: {key:?}"))
    }

    pub fn expired(url: &str) -> Self {
        Self::new(StoreErrorKind::Expired, format!("signed url expired or unknown: {url}"))
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Other, msg)
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        let kind = match e.kind() {
            io::ErrorKind::NotFound => StoreErrorKind::NotFound,
            io::ErrorKind::AlreadyExists => StoreErrorKind::Duplicate,
            io::ErrorKind::PermissionDenied => StoreErrorKind::PolicyViolation,
            io::ErrorKind::InvalidInput => StoreErrorKind::InvalidKey,
            _ => StoreErrorKind::Io,
        };
        Self::new(kind, e.to_string())
    }
}

/// Object store result type.
pub type StoreResult<T> = Result<T, StoreError>;
