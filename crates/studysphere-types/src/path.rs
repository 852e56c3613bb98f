//! Virtual paths over a flat key space.
//!
//! The object store has no directories, only slash-delimited keys. A
//! [`VirtualPath`] is the browser's position in the hierarchy we pretend the
//! keys form. It is always normalized:
//!
//! - the root renders as `"."` and maps to the empty key prefix
//! - no leading `./` or `/`, no trailing slash
//! - `.` and empty segments are dropped, `..` pops (never above root)

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Root sentinel.
pub const ROOT: &str = ".";

/// A single segment was not a usable name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("name is empty")]
    Empty,
    #[error("name contains a path separator: {0}")]
    ContainsSeparator(String),
    #[error("name is reserved: {0}")]
    Reserved(String),
}

/// Normalized browsing position.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct VirtualPath {
    segments: Vec<String>,
}

impl VirtualPath {
    /// The root (`"."`).
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse and normalize any slash-delimited path or storage key.
    pub fn parse(s: &str) -> Self {
        let mut segments: Vec<String> = Vec::new();
        for part in s.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                name => segments.push(name.to_string()),
            }
        }
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The `n`th segment, if present.
    pub fn segment(&self, n: usize) -> Option<&str> {
        self.segments.get(n).map(String::as_str)
    }

    /// Last segment, or `None` at root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Descend into `name`, which must be a single valid segment.
    pub fn child(&self, name: &str) -> Result<Self, PathError> {
        validate_segment(name)?;
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self { segments })
    }

    /// One level up. The parent of root is root.
    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    /// Whether `self` is `other` or lies beneath it.
    pub fn starts_with(&self, other: &VirtualPath) -> bool {
        self.segments.starts_with(&other.segments)
    }

    /// Storage key prefix: root sentinel stripped, so root is `""`.
    pub fn key(&self) -> String {
        self.segments.join("/")
    }

    /// Storage key for `name` directly under this path.
    pub fn key_for(&self, name: &str) -> String {
        if self.is_root() {
            name.to_string()
        } else {
            format!("{}/{}", self.key(), name)
        }
    }
}

/// Reject names that would change the shape of the path they are joined to.
pub fn validate_segment(name: &str) -> Result<(), PathError> {
    if name.is_empty() {
        return Err(PathError::Empty);
    }
    if name.contains('/') {
        return Err(PathError::ContainsSeparator(name.to_string()));
    }
    if name == "." || name == ".." {
        return Err(PathError::Reserved(name.to_string()));
    }
    Ok(())
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str(ROOT)
        } else {
            f.write_str(&self.key())
        }
    }
}

impl fmt::Debug for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VirtualPath({})", self)
    }
}

impl From<String> for VirtualPath {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&str> for VirtualPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<VirtualPath> for String {
    fn from(p: VirtualPath) -> String {
        p.to_string()
    }
}
