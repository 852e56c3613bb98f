//! Object store operations trait.
//!
//! The store is flat: keys are slash-delimited strings and there are no
//! directory objects. Listing synthesizes folders from key prefixes.

use async_trait::async_trait;
use std::time::Duration;

use super::types::{ObjectInfo, SignedUrl, UploadOptions};
use super::StoreResult;

/// Core object store operations.
///
/// Keys are always relative to the bucket root, with no leading slash.
/// Implementations must be safe to share between browsers.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Bucket name, for logging and URLs.
    fn bucket(&self) -> &str;

    // ========================================================================
    // Reading
    // ========================================================================

    /// List the direct children of `prefix` (`""` for the bucket root).
    ///
    /// Files carry an `id`; folders, synthesized from deeper keys, do not.
    /// A prefix with nothing under it lists as empty, not as an error.
    async fn list(&self, prefix: &str) -> StoreResult<Vec<ObjectInfo>>;

    /// Issue a URL that grants read access to `key` until `ttl` elapses.
    async fn create_signed_url(&self, key: &str, ttl: Duration) -> StoreResult<SignedUrl>;

    /// Fetch the object a signed URL points at.
    async fn read_signed(&self, url: &str) -> StoreResult<Vec<u8>>;

    // ========================================================================
    // Writing
    // ========================================================================

    /// Write an object. Fails with `Duplicate` if it exists and
    /// `opts.upsert` is false.
    async fn upload(&self, key: &str, data: &[u8], opts: UploadOptions) -> StoreResult<()>;

    /// Remove objects. Keys that do not exist are skipped.
    async fn remove(&self, keys: &[String]) -> StoreResult<()>;

    /// Copy one object to a new key. The destination must not exist.
    async fn copy(&self, from: &str, to: &str) -> StoreResult<()>;

    // ========================================================================
    // Convenience methods (default implementations)
    // ========================================================================

    /// Every object key beneath `prefix`, descending into folders.
    ///
    /// Sorted, so callers get a stable plan.
    async fn walk(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut pending = vec![prefix.trim_matches('/').to_string()];

        while let Some(dir) = pending.pop() {
            for info in self.list(&dir).await? {
                let key = if dir.is_empty() {
                    info.name.clone()
                } else {
                    format!("{}/{}", dir, info.name)
                };
                if info.is_folder() {
                    pending.push(key);
                } else {
                    keys.push(key);
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}

/// Validate an object key: non-empty, relative, no empty/`.`/`..` segments.
pub fn validate_key(key: &str) -> StoreResult<()> {
    if key.is_empty() || key.starts_with('/') || key.ends_with('/') {
        return Err(super::StoreError::invalid_key(key));
    }
    for segment in key.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(super::StoreError::invalid_key(key));
        }
    }
    Ok(())
}
