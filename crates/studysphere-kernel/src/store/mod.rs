//! Object store abstraction.
//!
//! The backend service exposes a flat blob store. Key components:
//!
//! - [`ObjectStore`] - Core trait: list, upload, remove, copy, sign
//! - [`MemoryStore`] - In-memory bucket (tests, demos)
//! - [`LocalStore`] - Bucket backed by a directory on disk
//!
//! ## Design Decisions
//!
//! - **No folder objects**: folders exist only as key prefixes. Listing
//!   synthesizes them and reports them without an id.
//! - **Structured errors**: every failure carries a [`StoreErrorKind`] so
//!   callers never match on message text.

pub mod backends;
mod error;
mod ops;
mod types;

pub use backends::{LocalStore, MemoryStore};
pub use error::{StoreError, StoreErrorKind, StoreResult};
pub use ops::{ObjectStore, validate_key};
pub use types::{ObjectInfo, SignedUrl, UploadOptions};
