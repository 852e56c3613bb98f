//! Local filesystem backend.
//!
//! Keeps a bucket in a directory: each key is a file under `root`, and key
//! prefixes are real directories. Directories left empty by a removal are
//! pruned so the bucket keeps object-store semantics (no empty folders).

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::TokenTable;
use crate::store::error::{StoreError, StoreErrorKind, StoreResult};
use crate::store::ops::{ObjectStore, validate_key};
use crate::store::types::{ObjectInfo, SignedUrl, UploadOptions, token_of};
use crate::upload::mime_for_name;

/// Namespace for deterministic blob ids (UUIDv5 of the key).
const LOCAL_BLOB_NS: uuid::Uuid = uuid::uuid!("b1f0a7d2-4c3e-4e8b-9d61-2a7f5c8e0b94");

/// Bucket backed by a local directory.
///
/// All operations are relative to `root`. For example, if `root` is
/// `/srv/studysphere/resources`, then key `admin/syllabus.pdf` lives at
/// `/srv/studysphere/resources/admin/syllabus.pdf`.
#[derive(Debug)]
pub struct LocalStore {
    bucket: String,
    root: PathBuf,
    tokens: TokenTable,
    max_object_size: Option<u64>,
}

impl LocalStore {
    /// Create a bucket rooted at `root`.
    ///
    /// The root is canonicalized when it exists, to handle symlinked
    /// directories (e.g. macOS `/tmp` → `/private/tmp`).
    pub fn new(bucket: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        let root: PathBuf = root.into();
        let root = root.canonicalize().unwrap_or(root);
        Self {
            bucket: bucket.into(),
            root,
            tokens: TokenTable::default(),
            max_object_size: None,
        }
    }

    /// Reject objects larger than `max` bytes.
    pub fn with_max_object_size(mut self, max: u64) -> Self {
        self.max_object_size = Some(max);
        self
    }

    /// Get the root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to a path under the root.
    ///
    /// Keys are validated first, so `..` never reaches the filesystem. The
    /// deepest existing ancestor of the path (the path itself if it exists)
    /// is canonicalized and checked against the root, so a symlinked folder
    /// can't carry new keys outside it.
    fn resolve(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        let full = self.root.join(key);

        let existing = full
            .ancestors()
            .find(|p| p.exists())
            .unwrap_or(self.root.as_path());
        let canonical = existing.canonicalize()?;
        if !canonical.starts_with(&self.root) {
            return Err(StoreError::new(
                StoreErrorKind::PolicyViolation,
                format!(
                    "{} is not under {}",
                    canonical.display(),
                    self.root.display()
                ),
            ));
        }
        Ok(full)
    }

    /// Directory for a listing prefix; `""` is the root.
    fn resolve_dir(&self, prefix: &str) -> StoreResult<PathBuf> {
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            Ok(self.root.clone())
        } else {
            self.resolve(prefix)
        }
    }

    fn blob_id(key: &str) -> String {
        uuid::Uuid::new_v5(&LOCAL_BLOB_NS, key.as_bytes()).to_string()
    }

    fn check_size(&self, size: usize) -> StoreResult<()> {
        match self.max_object_size {
            Some(max) if size as u64 > max => Err(StoreError::too_large(size as u64, max)),
            _ => Ok(()),
        }
    }

    async fn ensure_parent(path: &Path) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Remove now-empty directories from `path`'s parent up to the root.
    async fn prune_empty_parents(&self, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir == self.root || !dir.starts_with(&self.root) {
                break;
            }
            // remove_dir fails on non-empty directories, which ends the walk
            if fs::remove_dir(dir).await.is_err() {
                break;
            }
            current = dir.parent();
        }
    }

    async fn is_file(path: &Path) -> bool {
        fs::metadata(path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list(&self, prefix: &str) -> StoreResult<Vec<ObjectInfo>> {
        let dir = self.resolve_dir(prefix)?;
        let prefix = prefix.trim_matches('/');

        let meta = match fs::metadata(&dir).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if !meta.is_dir() {
            return Ok(Vec::new());
        }

        let mut result = Vec::new();
        let mut read_dir = fs::read_dir(&dir).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let meta = entry.metadata().await?;
            if meta.is_dir() {
                result.push(ObjectInfo::folder(name));
            } else if meta.is_file() {
                let key = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{}/{}", prefix, name)
                };
                let content_type = mime_for_name(&name).map(str::to_string);
                result.push(ObjectInfo::file(
                    name,
                    Self::blob_id(&key),
                    meta.len(),
                    content_type,
                    meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                ));
            }
        }

        // Sort for consistent ordering
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn create_signed_url(&self, key: &str, ttl: Duration) -> StoreResult<SignedUrl> {
        let path = self.resolve(key)?;
        if !Self::is_file(&path).await {
            return Err(StoreError::not_found(key));
        }
        let (token, expires_at) = self.tokens.issue(key, ttl);
        Ok(SignedUrl {
            url: format!("file://{}?token={}", path.display(), token),
            expires_at,
        })
    }

    async fn read_signed(&self, url: &str) -> StoreResult<Vec<u8>> {
        let key = token_of(url)
            .and_then(|t| self.tokens.redeem(t))
            .ok_or_else(|| StoreError::expired(url))?;
        let path = self.resolve(&key)?;
        Ok(fs::read(&path).await?)
    }

    async fn upload(&self, key: &str, data: &[u8], opts: UploadOptions) -> StoreResult<()> {
        let path = self.resolve(key)?;
        self.check_size(data.len())?;
        if fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Err(StoreError::duplicate(key));
        }
        Self::ensure_parent(&path).await?;

        if opts.upsert {
            fs::write(&path, data).await?;
        } else {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
                .map_err(|e| match e.kind() {
                    std::io::ErrorKind::AlreadyExists => StoreError::duplicate(key),
                    _ => e.into(),
                })?;
            file.write_all(data).await?;
            file.flush().await?;
        }
        Ok(())
    }

    async fn remove(&self, keys: &[String]) -> StoreResult<()> {
        for key in keys {
            let path = self.resolve(key)?;
            match fs::remove_file(&path).await {
                Ok(()) => self.prune_empty_parents(&path).await,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    async fn copy(&self, from: &str, to: &str) -> StoreResult<()> {
        let src = self.resolve(from)?;
        let dst = self.resolve(to)?;
        if !Self::is_file(&src).await {
            return Err(StoreError::not_found(from));
        }
        if fs::metadata(&dst).await.is_ok() {
            return Err(StoreError::duplicate(to));
        }
        Self::ensure_parent(&dst).await?;
        fs::copy(&src, &dst).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, LocalStore) {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new("resources", dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_upload_list_and_ids() {
        let (_dir, store) = setup();
        store
            .upload("admin/syllabus.pdf", b"%PDF", UploadOptions::upsert())
            .await
            .unwrap();
        store
            .upload("readme.txt", b"hello", UploadOptions::upsert())
            .await
            .unwrap();

        let root = store.list("").await.unwrap();
        let names: Vec<_> = root.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["admin", "readme.txt"]);
        assert!(root[0].is_folder());
        assert_eq!(root[1].content_type.as_deref(), Some("text/plain"));

        let admin = store.list("admin").await.unwrap();
        let id = LocalStore::blob_id("admin/syllabus.pdf");
        assert_eq!(admin[0].id.as_deref(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn test_create_new_collides() {
        let (_dir, store) = setup();
        store
            .upload("x/.keep", b"", UploadOptions::create_new())
            .await
            .unwrap();
        let err = store
            .upload("x/.keep", b"", UploadOptions::create_new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Duplicate);
    }

    #[tokio::test]
    async fn test_remove_prunes_empty_folders() {
        let (dir, store) = setup();
        store
            .upload("a/b/c.txt", b"x", UploadOptions::upsert())
            .await
            .unwrap();
        store.remove(&["a/b/c.txt".to_string()]).await.unwrap();
        assert!(!dir.path().join("a").exists());
        assert!(store.list("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_copy() {
        let (_dir, store) = setup();
        store
            .upload("a.txt", b"content", UploadOptions::upsert())
            .await
            .unwrap();
        store.copy("a.txt", "sub/b.txt").await.unwrap();
        let signed = store
            .create_signed_url("sub/b.txt", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(signed.url.starts_with("file://"));
        assert_eq!(store.read_signed(&signed.url).await.unwrap(), b"content");

        let err = store.copy("a.txt", "sub/b.txt").await.unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Duplicate);
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let (_dir, store) = setup();
        let err = store
            .upload("../escape.txt", b"x", UploadOptions::upsert())
            .await
            .unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::InvalidKey);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_rejects_keys_through_symlinked_folder() {
        let (dir, store) = setup();
        let outside = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

        for key in ["link/pwned.txt", "link/deeper/pwned.txt"] {
            let err = store
                .upload(key, b"x", UploadOptions::upsert())
                .await
                .unwrap_err();
            assert_eq!(err.kind, StoreErrorKind::PolicyViolation, "{}", key);
        }
        assert!(!outside.path().join("pwned.txt").exists());
        assert!(!outside.path().join("deeper").exists());

        let err = store.copy("link/a.txt", "b.txt").await.unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::PolicyViolation);
        assert!(store.list("link").await.is_err());
    }

    #[tokio::test]
    async fn test_missing_prefix_lists_empty() {
        let (_dir, store) = setup();
        assert!(store.list("nope/deeper").await.unwrap().is_empty());
    }
}
