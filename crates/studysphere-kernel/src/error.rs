//! Browser error types.

use studysphere_types::VirtualPath;
use thiserror::Error;

use crate::saga::SagaReport;
use crate::store::{StoreError, StoreErrorKind};
use crate::upload::ValidationError;

/// Browser operation, for error context and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Upload,
    CreateFolder,
    Rename,
    Delete,
    Download,
    Preview,
}

impl Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::List => "list",
            Op::Upload => "upload",
            Op::CreateFolder => "create folder",
            Op::Rename => "rename",
            Op::Delete => "delete",
            Op::Download => "download",
            Op::Preview => "preview",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum BrowserError {
    /// Rejected client-side before any store call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The access predicate refused the current path.
    #[error("permission denied: cannot {op} in {path}")]
    PermissionDenied { op: Op, path: VirtualPath },

    /// A single store call failed; nothing changed.
    #[error("{op} failed: {source}")]
    Store {
        op: Op,
        #[source]
        source: StoreError,
    },

    /// A multi-step mutation failed after changing the store.
    #[error("{op} partially failed: {report}")]
    PartialFailure { op: Op, report: SagaReport },

    #[error("preview not supported for {0}")]
    UnsupportedPreview(String),

    #[error("not a file: {0}")]
    NotAFile(String),

    /// The user answered no to a confirmation.
    #[error("declined by user")]
    Declined,
}

pub type BrowserResult<T> = Result<T, BrowserError>;

impl BrowserError {
    pub fn store(op: Op, source: StoreError) -> Self {
        Self::Store { op, source }
    }

    /// Whether this should reach the user at all. Declined confirmations and
    /// no-op renames are silent.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            BrowserError::Declined | BrowserError::Validation(ValidationError::Unchanged(_))
        )
    }

    /// Whether the notification is informational rather than a failure.
    pub fn is_notice(&self) -> bool {
        matches!(self, BrowserError::UnsupportedPreview(_))
    }

    /// Message for the notification surface.
    pub fn user_message(&self) -> String {
        match self {
            BrowserError::Validation(v) => match v {
                ValidationError::FileType { .. } => {
                    "Invalid file type. Allowed types: PDF, DOC, DOCX, images, text files.".into()
                }
                ValidationError::TooLarge { max, .. } => {
                    format!("File is too large. Max size is {}MB.", max / (1024 * 1024))
                }
                ValidationError::InvalidName(_) => "Invalid name.".into(),
                ValidationError::Unchanged(_) => String::new(),
            },
            BrowserError::PermissionDenied { op, .. } => match op {
                Op::Upload => "You do not have permission to upload files in this location.".into(),
                Op::CreateFolder => {
                    "You do not have permission to create folders in this location.".into()
                }
                other => format!("You do not have permission to {} in this location.", other),
            },
            BrowserError::Store { op, source } => store_message(*op, source),
            BrowserError::PartialFailure { op, report } => match op {
                Op::Rename => format!(
                    "Rename only partly completed; both old and new copies may exist ({}).",
                    report
                ),
                other => format!("Failed to {} completely ({}).", other, report),
            },
            BrowserError::UnsupportedPreview(_) => "File type not supported for preview".into(),
            BrowserError::NotAFile(name) => format!("{} is a folder.", name),
            BrowserError::Declined => String::new(),
        }
    }
}

fn store_message(op: Op, e: &StoreError) -> String {
    match (e.kind, op) {
        (StoreErrorKind::PolicyViolation, Op::Upload) => {
            "You do not have permission to upload files.".into()
        }
        (StoreErrorKind::PolicyViolation, Op::CreateFolder) => {
            "You do not have permission to create folders.".into()
        }
        (StoreErrorKind::PolicyViolation, Op::Delete) => {
            "You do not have permission to delete this item.".into()
        }
        (StoreErrorKind::PolicyViolation, _) => {
            format!("You do not have permission to {} this item.", op)
        }
        (StoreErrorKind::Duplicate, Op::Upload) => "A file with this name already exists.".into(),
        (StoreErrorKind::Duplicate, Op::CreateFolder) => {
            "Folder with this name already exists.".into()
        }
        (StoreErrorKind::Duplicate, _) => "An item with this name already exists.".into(),
        (StoreErrorKind::PayloadTooLarge, _) => "File is too large.".into(),
        (_, Op::List) => format!("Could not fetch resources: {}", e.message),
        (_, Op::Upload) => format!("Failed to upload file: {}", e.message),
        (_, Op::CreateFolder) => format!("Failed to create folder: {}", e.message),
        (_, Op::Rename) => format!("Failed to rename: {}", e.message),
        (_, Op::Delete) => format!("Failed to delete: {}", e.message),
        (_, Op::Download) => format!("Failed to generate download link: {}", e.message),
        (_, Op::Preview) => format!("Failed to generate view link: {}", e.message),
    }
}
