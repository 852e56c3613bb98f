//! Shared identity, session, and resource types for StudySphere.
//!
//! This crate is the leaf of the workspace: it has **no internal studysphere
//! dependencies**. The kernel and the CLI both build on it.
//!
//! # Key Types
//!
//! |-------------------|----------------------------------------------|
//! | Type              | Purpose                                      |
//! |-------------------|----------------------------------------------|
//! | [`UserId`]        | Who (opaque, from the auth provider)         |
//! | [`Role`]          | Closed set: student, teacher, admin, pending |
//! | [`User`]          | Profile snapshot (id + name + role)          |
//! | [`Session`]       | Who is browsing, passed in explicitly        |
//! | [`VirtualPath`]   | Browsing position, rooted at `.`             |
//! | [`ResourceEntry`] | One row of a directory listing               |
//! |-------------------|----------------------------------------------|

pub mod entry;
pub mod ids;
pub mod path;
pub mod session;
pub mod user;

pub use entry::{EntryKind, ResourceEntry, SENTINEL, extension_of};
pub use ids::UserId;
pub use path::{PathError, ROOT, VirtualPath, validate_segment};
pub use session::Session;
pub use user::{Role, UNKNOWN_NAME, User};
