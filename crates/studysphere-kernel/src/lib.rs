//! # studysphere-kernel
//!
//! Role-scoped virtual filesystem over a flat object store.
//!
//! The bucket is one shared namespace; the kernel carves it into ownership
//! zones and presents each user a browsable tree:
//! - `admin/` belongs to admins
//! - `teachers/<name>/` belongs to that teacher (and admins)
//! - everything is readable by every signed-in user
//!
//! Three pieces do the work. The [`resolver`] decides where a write lands,
//! [`access::can_manage`] decides whether it may happen, and the [`Browser`]
//! drives listing, navigation, and mutations through the [`ObjectStore`]
//! trait. Multi-step mutations (rename, recursive delete) run as a [`Saga`]
//! and report exactly how far they got.

pub mod access;
pub mod auth;
pub mod browser;
pub mod config;
pub mod error;
pub mod notify;
pub mod preview;
pub mod resolver;
pub mod saga;
pub mod store;
pub mod upload;
pub mod zones;

pub use access::can_manage;
pub use auth::{AuthError, AuthProvider, AuthResult, Profile, StaticAuth, load_session};
pub use browser::Browser;
pub use config::{ConfigError, ResourcesConfig, config_file_path, load_config};
pub use error::{BrowserError, BrowserResult, Op};
pub use notify::{Confirm, Level, Notification, Notifier, RecordingNotifier, TracingNotifier};
pub use preview::{DownloadLink, Preview, PreviewKind, TEXT_LOAD_ERROR};
pub use resolver::{resolve_target, target_dir};
pub use saga::{PlannedOp, Saga, SagaReport, StepFailure};
pub use store::{
    LocalStore, MemoryStore, ObjectInfo, ObjectStore, SignedUrl, StoreError, StoreErrorKind,
    StoreResult, UploadOptions, validate_key,
};
pub use upload::{
    FileCategory, UploadPolicy, UploadRequest, ValidationError, format_file_size, mime_for_name,
};
pub use zones::{Zone, ZoneTable};
