//! The resources browser.
//!
//! A [`Browser`] is one user's view of the bucket: where they are, what is
//! listed there, and the transient UI state around it (open preview, open
//! context menu, an operation in flight). Every mutation goes through the
//! same gate:
//!
//! ```text
//! action → can_manage(user, current) → resolve key(s) → store call(s) → re-list
//! ```
//!
//! Methods take `&mut self`, so operations on one browser never overlap.
//! Failures are reported to the [`Notifier`] and returned; nothing retries.

use std::sync::Arc;

use studysphere_types::{
    ResourceEntry, Role, SENTINEL, Session, VirtualPath, validate_segment,
};

use crate::access::can_manage;
use crate::auth::{AuthProvider, AuthResult, load_session};
use crate::config::ResourcesConfig;
use crate::error::{BrowserError, BrowserResult, Op};
use crate::notify::{Confirm, Notifier};
use crate::preview::{DownloadLink, Preview, PreviewKind, TEXT_LOAD_ERROR};
use crate::resolver::resolve_target;
use crate::saga::{Saga, SagaReport};
use crate::store::{ObjectStore, StoreError, UploadOptions};
use crate::upload::{UploadRequest, ValidationError};

pub struct Browser {
    session: Session,
    store: Arc<dyn ObjectStore>,
    notifier: Arc<dyn Notifier>,
    config: ResourcesConfig,

    current: VirtualPath,
    entries: Vec<ResourceEntry>,
    loading: bool,
    uploading: bool,
    /// Rename or delete in flight.
    busy: Option<Op>,
    context_menu: Option<ResourceEntry>,
    preview: Option<Preview>,
}

impl std::fmt::Debug for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Browser")
            .field("session", &self.session)
            .field("bucket", &self.store.bucket())
            .field("current", &self.current)
            .field("entries", &self.entries.len())
            .field("loading", &self.loading)
            .field("busy", &self.busy)
            .finish()
    }
}

impl Browser {
    /// Create a browser at the root. Nothing is listed until the first
    /// navigation or [`refresh`](Self::refresh).
    pub fn new(
        session: Session,
        store: Arc<dyn ObjectStore>,
        notifier: Arc<dyn Notifier>,
        config: ResourcesConfig,
    ) -> Self {
        Self {
            session,
            store,
            notifier,
            config,
            current: VirtualPath::root(),
            entries: Vec::new(),
            loading: false,
            uploading: false,
            busy: None,
            context_menu: None,
            preview: None,
        }
    }

    /// Load the signed-in user's session and open the root.
    pub async fn open_for(
        auth: &dyn AuthProvider,
        store: Arc<dyn ObjectStore>,
        notifier: Arc<dyn Notifier>,
        config: ResourcesConfig,
    ) -> AuthResult<Self> {
        let session = match load_session(auth).await {
            Ok(session) => session,
            Err(e) => {
                notifier.error("Failed to load user profile");
                return Err(e);
            }
        };
        let mut browser = Self::new(session, store, notifier, config);
        // A failed first listing is already reported; the browser is still usable.
        let _ = browser.refresh().await;
        Ok(browser)
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &ResourcesConfig {
        &self.config
    }

    pub fn current_path(&self) -> &VirtualPath {
        &self.current
    }

    pub fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    /// Listed entry by name.
    pub fn entry(&self, name: &str) -> Option<&ResourceEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn busy(&self) -> Option<Op> {
        self.busy
    }

    /// The open preview, if any.
    pub fn current_preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn context_menu(&self) -> Option<&ResourceEntry> {
        self.context_menu.as_ref()
    }

    /// Whether the current user may mutate the current directory.
    ///
    /// Evaluated fresh on every call.
    pub fn can_manage(&self) -> bool {
        can_manage(&self.config.zones, self.session.user(), &self.current)
    }

    /// Label to render for a listed entry.
    pub fn display_name(&self, entry: &ResourceEntry) -> String {
        self.config
            .zones
            .display_name(self.session.user(), &self.current, &entry.name)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Re-list the current directory.
    pub async fn refresh(&mut self) -> BrowserResult<()> {
        let path = self.current.clone();
        self.loading = true;
        let result = self.list(&path).await;
        self.loading = false;

        match result {
            Ok(entries) => {
                self.entries = entries;
                Ok(())
            }
            Err(e) => {
                self.entries.clear();
                Err(self.report(e))
            }
        }
    }

    /// Jump to `path` and list it.
    pub async fn open(&mut self, path: VirtualPath) -> BrowserResult<()> {
        tracing::debug!(from = %self.current, to = %path, "open");
        self.current = path;
        self.context_menu = None;
        self.refresh().await
    }

    /// Folders open; files preview.
    pub async fn navigate(&mut self, entry: &ResourceEntry) -> BrowserResult<()> {
        if entry.is_folder() {
            self.open(entry.virtual_path()).await
        } else {
            self.preview(entry).await.map(|_| ())
        }
    }

    /// Up one level; the root stays at the root.
    pub async fn go_back(&mut self) -> BrowserResult<()> {
        let parent = self.current.parent();
        self.open(parent).await
    }

    /// The user's own zone, or the root for roles without one.
    pub async fn go_home(&mut self) -> BrowserResult<()> {
        let home = self
            .session
            .user()
            .and_then(|u| self.config.zones.home_for(u))
            .unwrap_or_default();
        self.open(home).await
    }

    /// Map a store listing to entries.
    ///
    /// Sentinels are dropped. A teacher at the root only discovers the zone
    /// roots. Folders sort before files, then by name.
    async fn list(&self, path: &VirtualPath) -> BrowserResult<Vec<ResourceEntry>> {
        let prefix = path.key();
        let listing = self
            .store
            .list(&prefix)
            .await
            .map_err(|e| BrowserError::store(Op::List, e))?;

        let mut entries: Vec<ResourceEntry> = listing
            .into_iter()
            .filter(|info| info.name != SENTINEL)
            .map(|info| match info.id {
                Some(id) => ResourceEntry::file(path, info.name, id),
                None => ResourceEntry::folder(path, info.name),
            })
            .collect();

        if path.is_root() && self.session.role() == Some(Role::Teacher) {
            entries.retain(|e| self.config.zones.is_zone_root(&e.name));
        }

        entries.sort_by(|a, b| {
            b.is_folder()
                .cmp(&a.is_folder())
                .then_with(|| a.name.cmp(&b.name))
        });

        tracing::debug!(
            bucket = self.store.bucket(),
            path = %path,
            count = entries.len(),
            "listed"
        );
        Ok(entries)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Upload a file into the current directory (or the user's zone, at root).
    ///
    /// Returns the key written.
    pub async fn upload(&mut self, req: UploadRequest) -> BrowserResult<String> {
        if let Err(e) = self.config.upload.validate(&req) {
            return Err(self.report(e.into()));
        }
        self.ensure_can_manage(Op::Upload)?;

        let key = resolve_target(
            &self.config.zones,
            self.session.user(),
            &self.current,
            Some(&req.file_name),
        );
        let opts = UploadOptions::upsert().with_content_type(req.content_type.clone());

        self.uploading = true;
        let result = self.store.upload(&key, &req.data, opts).await;
        self.uploading = false;

        if let Err(e) = result {
            return Err(self.report(BrowserError::store(Op::Upload, e)));
        }

        tracing::info!(bucket = self.store.bucket(), key = %key, size = req.size(), "uploaded");
        self.notifier.success("File uploaded successfully!");
        self.relist().await;
        Ok(key)
    }

    /// Create `name` in the current directory by writing its sentinel.
    ///
    /// The sentinel is written without overwrite, so an existing folder of
    /// the same name fails as a duplicate.
    pub async fn create_folder(&mut self, name: &str) -> BrowserResult<VirtualPath> {
        self.ensure_can_manage(Op::CreateFolder)?;

        let folder = match self.current.child(name) {
            Ok(folder) => folder,
            Err(e) => return Err(self.report(ValidationError::from(e).into())),
        };
        let key = folder.key_for(SENTINEL);
        let opts = UploadOptions::create_new().with_content_type("text/plain");

        if let Err(e) = self.store.upload(&key, &[], opts).await {
            return Err(self.report(BrowserError::store(Op::CreateFolder, e)));
        }

        tracing::info!(bucket = self.store.bucket(), folder = %folder, "folder created");
        self.notifier.success("Folder created successfully!");
        self.relist().await;
        Ok(folder)
    }

    /// Rename a listed entry in place.
    ///
    /// Files are copied then removed. Folders have every blob beneath them
    /// copied, then all originals removed in one call. Neither is atomic: a
    /// failure part-way leaves old and new keys side by side, and comes back
    /// as [`BrowserError::PartialFailure`] with the full report.
    pub async fn rename(
        &mut self,
        entry: &ResourceEntry,
        new_name: &str,
    ) -> BrowserResult<SagaReport> {
        self.context_menu = None;
        if new_name == entry.name {
            return Err(self.report(ValidationError::Unchanged(new_name.to_string()).into()));
        }
        if let Err(e) = validate_segment(new_name) {
            return Err(self.report(ValidationError::from(e).into()));
        }
        self.ensure_can_manage(Op::Rename)?;

        let new_key = entry.virtual_path().parent().key_for(new_name);
        self.busy = Some(Op::Rename);

        let saga = if entry.is_file() {
            Saga::rename_file(&entry.path, &new_key)
        } else {
            match self.store.walk(&entry.path).await {
                Ok(keys) => Saga::rename_folder(&entry.path, &new_key, &keys),
                Err(e) => {
                    self.busy = None;
                    return Err(self.report(BrowserError::store(Op::Rename, e)));
                }
            }
        };

        tracing::info!(from = %entry.path, to = %new_key, steps = saga.ops().len(), "rename");
        let report = saga.execute(self.store.as_ref()).await;
        self.busy = None;
        self.finish(Op::Rename, report, "Renamed successfully!").await
    }

    /// Delete a listed entry after the user confirms.
    ///
    /// A folder's removal set is every blob beneath it, sentinel included,
    /// removed in one call; there is no folder object to remove separately.
    /// A folder with nothing beneath it still issues an empty removal.
    pub async fn delete(
        &mut self,
        entry: &ResourceEntry,
        confirm: &dyn Confirm,
    ) -> BrowserResult<SagaReport> {
        self.context_menu = None;
        let question = if entry.is_folder() {
            format!(
                "Are you sure you want to delete the folder \"{}\" and all its contents?",
                entry.name
            )
        } else {
            format!("Are you sure you want to delete \"{}\"?", entry.name)
        };
        if !confirm.confirm(&question) {
            return Err(BrowserError::Declined);
        }
        self.ensure_can_manage(Op::Delete)?;

        self.busy = Some(Op::Delete);
        let keys = if entry.is_file() {
            vec![entry.path.clone()]
        } else {
            match self.store.walk(&entry.path).await {
                Ok(keys) => keys,
                Err(e) => {
                    self.busy = None;
                    return Err(self.report(BrowserError::store(Op::Delete, e)));
                }
            }
        };

        tracing::info!(path = %entry.path, keys = keys.len(), "delete");
        let report = Saga::delete(keys).execute(self.store.as_ref()).await;
        self.busy = None;

        let done = if entry.is_folder() {
            "Folder deleted successfully!"
        } else {
            "File deleted successfully!"
        };
        self.finish(Op::Delete, report, done).await
    }

    // ========================================================================
    // Reading
    // ========================================================================

    /// A signed link for the client to download from.
    pub async fn download(&mut self, entry: &ResourceEntry) -> BrowserResult<DownloadLink> {
        if entry.is_folder() {
            return Err(self.report(BrowserError::NotAFile(entry.name.clone())));
        }
        let signed = match self
            .store
            .create_signed_url(&entry.path, self.config.signed_url_ttl())
            .await
        {
            Ok(signed) => signed,
            Err(e) => return Err(self.report(BrowserError::store(Op::Download, e))),
        };

        tracing::debug!(key = %entry.path, "download link issued");
        Ok(DownloadLink {
            file_name: entry.name.clone(),
            url: signed.url,
            expires_at: signed.expires_at,
        })
    }

    /// Open an inline preview.
    ///
    /// Text is fetched through the signed URL; a failed fetch shows
    /// [`TEXT_LOAD_ERROR`] instead of failing the preview. PDFs and images
    /// only carry the URL.
    pub async fn preview(&mut self, entry: &ResourceEntry) -> BrowserResult<&Preview> {
        if entry.is_folder() {
            return Err(self.report(BrowserError::NotAFile(entry.name.clone())));
        }
        let Some(kind) = PreviewKind::for_name(&entry.name) else {
            return Err(self.report(BrowserError::UnsupportedPreview(entry.name.clone())));
        };

        let signed = match self
            .store
            .create_signed_url(&entry.path, self.config.signed_url_ttl())
            .await
        {
            Ok(signed) => signed,
            Err(e) => return Err(self.report(BrowserError::store(Op::Preview, e))),
        };

        let text = match kind {
            PreviewKind::Text => Some(match self.store.read_signed(&signed.url).await {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    tracing::warn!(key = %entry.path, "failed to load preview text: {}", e);
                    TEXT_LOAD_ERROR.to_string()
                }
            }),
            PreviewKind::Pdf | PreviewKind::Image => None,
        };

        Ok(&*self.preview.insert(Preview {
            name: entry.name.clone(),
            path: entry.path.clone(),
            kind,
            url: signed.url,
            expires_at: signed.expires_at,
            text,
        }))
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }

    // ========================================================================
    // Context menu
    // ========================================================================

    /// Open the rename/delete menu on `entry`. Only opens where the user
    /// may manage; returns whether it opened.
    pub fn open_context_menu(&mut self, entry: &ResourceEntry) -> bool {
        if !self.can_manage() {
            return false;
        }
        self.context_menu = Some(entry.clone());
        true
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn ensure_can_manage(&self, op: Op) -> BrowserResult<()> {
        if self.can_manage() {
            Ok(())
        } else {
            Err(self.report(BrowserError::PermissionDenied {
                op,
                path: self.current.clone(),
            }))
        }
    }

    /// Send `err` to the notifier (unless silent) and hand it back.
    fn report(&self, err: BrowserError) -> BrowserError {
        if !err.is_silent() {
            let message = err.user_message();
            if err.is_notice() {
                self.notifier.info(&message);
            } else {
                tracing::warn!(path = %self.current, "{}", err);
                self.notifier.error(&message);
            }
        }
        err
    }

    /// Re-list after a successful mutation. A listing failure is reported by
    /// `refresh` itself and does not undo the mutation.
    async fn relist(&mut self) {
        if let Err(e) = self.refresh().await {
            tracing::debug!("re-list after mutation failed: {}", e);
        }
    }

    async fn finish(
        &mut self,
        op: Op,
        report: SagaReport,
        success: &str,
    ) -> BrowserResult<SagaReport> {
        if report.is_success() {
            self.notifier.success(success);
            self.relist().await;
            return Ok(report);
        }
        if report.is_partial() {
            // Show the mixed state the failure left behind
            self.relist().await;
            return Err(self.report(BrowserError::PartialFailure { op, report }));
        }
        let error = match report.failed {
            Some(failure) => failure.error,
            None => StoreError::other("operation failed"),
        };
        Err(self.report(BrowserError::store(op, error)))
    }
}
