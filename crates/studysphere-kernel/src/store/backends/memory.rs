//! In-memory object store backend.
//!
//! Used for tests and demos. All data is ephemeral. Listing behaves like a
//! hosted bucket: direct children only, folders synthesized from deeper keys.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, SystemTime};

use super::TokenTable;
use crate::store::error::{StoreError, StoreResult};
use crate::store::ops::{ObjectStore, validate_key};
use crate::store::types::{ObjectInfo, SignedUrl, UploadOptions, token_of};

#[derive(Debug, Clone)]
struct Blob {
    id: uuid::Uuid,
    data: Vec<u8>,
    content_type: Option<String>,
    updated_at: SystemTime,
}

impl Blob {
    fn new(data: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::now_v7(),
            data,
            content_type,
            updated_at: SystemTime::now(),
        }
    }
}

/// In-memory bucket.
///
/// Thread-safe via internal locks. Optional knobs mimic server-side bucket
/// configuration: a per-object size ceiling and key prefixes the access
/// policy refuses to write.
#[derive(Debug)]
pub struct MemoryStore {
    bucket: String,
    objects: RwLock<BTreeMap<String, Blob>>,
    tokens: TokenTable,
    max_object_size: Option<u64>,
    denied_prefixes: RwLock<Vec<String>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("resources")
    }
}

impl MemoryStore {
    /// Create an empty bucket.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(BTreeMap::new()),
            tokens: TokenTable::default(),
            max_object_size: None,
            denied_prefixes: RwLock::new(Vec::new()),
        }
    }

    /// Reject objects larger than `max` bytes.
    pub fn with_max_object_size(mut self, max: u64) -> Self {
        self.max_object_size = Some(max);
        self
    }

    /// Refuse writes and removals at or beneath `prefix`.
    pub fn deny_prefix(&self, prefix: impl Into<String>) {
        self.denied_prefixes
            .write()
            .push(prefix.into().trim_matches('/').to_string());
    }

    /// Raw object contents, bypassing signed URLs.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().get(key).map(|b| b.data.clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.read().contains_key(key)
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.objects.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    fn check_policy(&self, key: &str) -> StoreResult<()> {
        let denied = self.denied_prefixes.read();
        let hit = denied
            .iter()
            .any(|p| key == p || key.starts_with(&format!("{}/", p)));
        if hit {
            Err(StoreError::policy(key))
        } else {
            Ok(())
        }
    }

    fn check_size(&self, size: usize) -> StoreResult<()> {
        match self.max_object_size {
            Some(max) if size as u64 > max => Err(StoreError::too_large(size as u64, max)),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list(&self, prefix: &str) -> StoreResult<Vec<ObjectInfo>> {
        let prefix = prefix.trim_matches('/');
        let objects = self.objects.read();

        let mut folders = BTreeSet::new();
        let mut files = Vec::new();

        for (key, blob) in objects.iter() {
            let rest = if prefix.is_empty() {
                key.as_str()
            } else {
                match key.strip_prefix(prefix).and_then(|r| r.strip_prefix('/')) {
                    Some(rest) => rest,
                    None => continue,
                }
            };

            match rest.split_once('/') {
                Some((folder, _)) => {
                    folders.insert(folder.to_string());
                }
                None => files.push(ObjectInfo::file(
                    rest,
                    blob.id.to_string(),
                    blob.data.len() as u64,
                    blob.content_type.clone(),
                    blob.updated_at,
                )),
            }
        }

        let mut result: Vec<ObjectInfo> = folders.into_iter().map(ObjectInfo::folder).collect();
        result.extend(files);
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn create_signed_url(&self, key: &str, ttl: Duration) -> StoreResult<SignedUrl> {
        validate_key(key)?;
        if !self.contains(key) {
            return Err(StoreError::not_found(key));
        }
        let (token, expires_at) = self.tokens.issue(key, ttl);
        Ok(SignedUrl {
            url: format!("memory://{}/{}?token={}", self.bucket, key, token),
            expires_at,
        })
    }

    async fn read_signed(&self, url: &str) -> StoreResult<Vec<u8>> {
        let key = token_of(url)
            .and_then(|t| self.tokens.redeem(t))
            .ok_or_else(|| StoreError::expired(url))?;
        self.get(&key).ok_or_else(|| StoreError::not_found(&key))
    }

    async fn upload(&self, key: &str, data: &[u8], opts: UploadOptions) -> StoreResult<()> {
        validate_key(key)?;
        self.check_policy(key)?;
        self.check_size(data.len())?;

        let mut objects = self.objects.write();
        if !opts.upsert && objects.contains_key(key) {
            return Err(StoreError::duplicate(key));
        }
        objects.insert(key.to_string(), Blob::new(data.to_vec(), opts.content_type));
        Ok(())
    }

    async fn remove(&self, keys: &[String]) -> StoreResult<()> {
        for key in keys {
            self.check_policy(key)?;
        }
        let mut objects = self.objects.write();
        for key in keys {
            objects.remove(key);
        }
        Ok(())
    }

    async fn copy(&self, from: &str, to: &str) -> StoreResult<()> {
        validate_key(from)?;
        validate_key(to)?;
        self.check_policy(to)?;

        let mut objects = self.objects.write();
        let source = objects
            .get(from)
            .ok_or_else(|| StoreError::not_found(from))?;
        if objects.contains_key(to) {
            return Err(StoreError::duplicate(to));
        }
        let copy = Blob::new(source.data.clone(), source.content_type.clone());
        objects.insert(to.to_string(), copy);
        Ok(())
    }
}
