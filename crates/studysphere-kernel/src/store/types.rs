//! Core object store types.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// One row of a store listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Entry name (not full key).
    pub name: String,
    /// Native blob identifier. `None` means a synthesized folder.
    pub id: Option<String>,
    /// Size in bytes (files only).
    pub size: Option<u64>,
    /// Content type recorded at upload (files only).
    pub content_type: Option<String>,
    /// Last write time (files only).
    pub updated_at: Option<SystemTime>,
}

impl ObjectInfo {
    /// A stored object.
    pub fn file(
        name: impl Into<String>,
        id: impl Into<String>,
        size: u64,
        content_type: Option<String>,
        updated_at: SystemTime,
    ) -> Self {
        Self {
            name: name.into(),
            id: Some(id.into()),
            size: Some(size),
            content_type,
            updated_at: Some(updated_at),
        }
    }

    /// A folder synthesized from a key prefix.
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            size: None,
            content_type: None,
            updated_at: None,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.id.is_none()
    }

    pub fn is_file(&self) -> bool {
        self.id.is_some()
    }
}

/// Upload options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Content type to record with the object.
    pub content_type: Option<String>,
    /// Overwrite an existing object instead of failing.
    pub upsert: bool,
}

impl UploadOptions {
    /// Overwrite if present.
    pub fn upsert() -> Self {
        Self {
            content_type: None,
            upsert: true,
        }
    }

    /// Fail if present.
    pub fn create_new() -> Self {
        Self::default()
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// A time-limited read URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: SystemTime,
}

impl SignedUrl {
    pub fn is_expired(&self) -> bool {
        SystemTime::now() >= self.expires_at
    }
}

/// Pull the `token` query parameter out of a signed URL.
pub(crate) fn token_of(url: &str) -> Option<&str> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("token="))
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_info_kinds() {
        let f = ObjectInfo::file("a.txt", "id-1", 3, None, SystemTime::now());
        assert!(f.is_file());
        assert!(!f.is_folder());
        assert!(ObjectInfo::folder("docs").is_folder());
    }

    #[test]
    fn test_upload_options() {
        let o = UploadOptions::upsert().with_content_type("text/plain");
        assert!(o.upsert);
        assert_eq!(o.content_type.as_deref(), Some("text/plain"));
        assert!(!UploadOptions::create_new().upsert);
    }

    #[test]
    fn test_token_of() {
        assert_eq!(token_of("memory://r/a.txt?token=abc"), Some("abc"));
        assert_eq!(token_of("file:///x?expires=1&token=t2"), Some("t2"));
        assert_eq!(token_of("memory://r/a.txt"), None);
        assert_eq!(token_of("memory://r/a.txt?token="), None);
    }
}
