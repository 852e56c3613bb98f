//! Shared fixtures for browser integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use studysphere_kernel::{
    Browser, MemoryStore, ObjectInfo, ObjectStore, RecordingNotifier, ResourcesConfig, SignedUrl,
    StoreError, StoreResult, UploadOptions,
};
use studysphere_types::{Role, Session, User, UserId};

/// Store call, as recorded by [`ScriptedStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(String),
    SignedUrl(String),
    ReadSigned,
    Upload { key: String, upsert: bool, content_type: Option<String> },
    Remove(Vec<String>),
    Copy { from: String, to: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    List,
    ReadSigned,
    Upload,
    Remove,
    Copy,
}

/// A [`MemoryStore`] that logs every call and fails on demand.
#[derive(Default)]
pub struct ScriptedStore {
    pub inner: MemoryStore,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<Method, Vec<StoreError>>>,
}

impl ScriptedStore {
    pub async fn seeded(keys: &[&str]) -> Arc<Self> {
        let store = Self::default();
        for key in keys {
            store
                .inner
                .upload(key, key.as_bytes(), UploadOptions::upsert())
                .await
                .unwrap();
        }
        Arc::new(store)
    }

    /// Fail the next call to `method` with `error`.
    pub fn fail_next(&self, method: Method, error: StoreError) {
        self.failures.lock().entry(method).or_default().push(error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Calls that change the bucket.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Upload { .. } | Call::Remove(_) | Call::Copy { .. }))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn injected(&self, method: Method) -> StoreResult<()> {
        let mut failures = self.failures.lock();
        match failures.get_mut(&method) {
            Some(queue) if !queue.is_empty() => Err(queue.remove(0)),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ObjectStore for ScriptedStore {
    fn bucket(&self) -> &str {
        self.inner.bucket()
    }

    async fn list(&self, prefix: &str) -> StoreResult<Vec<ObjectInfo>> {
        self.record(Call::List(prefix.to_string()));
        self.injected(Method::List)?;
        self.inner.list(prefix).await
    }

    async fn create_signed_url(&self, key: &str, ttl: Duration) -> StoreResult<SignedUrl> {
        self.record(Call::SignedUrl(key.to_string()));
        self.inner.create_signed_url(key, ttl).await
    }

    async fn read_signed(&self, url: &str) -> StoreResult<Vec<u8>> {
        self.record(Call::ReadSigned);
        self.injected(Method::ReadSigned)?;
        self.inner.read_signed(url).await
    }

    async fn upload(&self, key: &str, data: &[u8], opts: UploadOptions) -> StoreResult<()> {
        self.record(Call::Upload {
            key: key.to_string(),
            upsert: opts.upsert,
            content_type: opts.content_type.clone(),
        });
        self.injected(Method::Upload)?;
        self.inner.upload(key, data, opts).await
    }

    async fn remove(&self, keys: &[String]) -> StoreResult<()> {
        self.record(Call::Remove(keys.to_vec()));
        self.injected(Method::Remove)?;
        self.inner.remove(keys).await
    }

    async fn copy(&self, from: &str, to: &str) -> StoreResult<()> {
        self.record(Call::Copy {
            from: from.to_string(),
            to: to.to_string(),
        });
        self.injected(Method::Copy)?;
        self.inner.copy(from, to).await
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn admin() -> Option<User> {
    Some(User::new(UserId::from_handle("principal"), "principal", Role::Admin))
}

pub fn teacher(name: &str) -> Option<User> {
    Some(User::new(UserId::from_handle(name), name, Role::Teacher))
}

pub fn student() -> Option<User> {
    Some(User::new(UserId::from_handle("kid"), "kid", Role::Student))
}

pub fn pending() -> Option<User> {
    Some(User::new(UserId::from_handle("newcomer"), "newcomer", Role::Pending))
}

pub struct Harness {
    pub browser: Browser,
    pub store: Arc<ScriptedStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub async fn new(user: Option<User>, keys: &[&str]) -> Self {
        init_tracing();
        let store = ScriptedStore::seeded(keys).await;
        let notifier = Arc::new(RecordingNotifier::new());
        let browser = Browser::new(
            Session::from(user),
            store.clone(),
            notifier.clone(),
            ResourcesConfig::default(),
        );
        Self {
            browser,
            store,
            notifier,
        }
    }

    /// Open `path`, then forget the calls it made.
    pub async fn at(mut self, path: &str) -> Self {
        self.browser.open(path.into()).await.unwrap();
        self.store.clear_calls();
        self
    }

    pub fn names(&self) -> Vec<String> {
        self.browser.entries().iter().map(|e| e.name.clone()).collect()
    }
}
