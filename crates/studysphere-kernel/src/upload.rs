//! Upload validation and file-type helpers.
//!
//! Validation happens before any store call: a rejected file never touches
//! the network.

use serde::{Deserialize, Serialize};
use studysphere_types::{PathError, extension_of, validate_segment};
use thiserror::Error;

/// Default upload ceiling: 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// MIME types accepted by default.
pub const ALLOWED_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/jpeg",
    "image/png",
    "text/plain",
];

/// Extensions accepted by default (with the leading dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx", ".jpg", ".jpeg", ".png", ".txt"];

/// A client-side rejection, raised before any store call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("file type not allowed: {file_name} ({content_type})")]
    FileType {
        file_name: String,
        content_type: String,
    },

    #[error("file is too large: {size} bytes exceeds {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("invalid name: {0}")]
    InvalidName(#[from] PathError),

    #[error("new name is the same as the old one: {0}")]
    Unchanged(String),
}

/// Which files may be uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadPolicy {
    pub allowed_types: Vec<String>,
    /// Lowercase, with the leading dot.
    pub allowed_extensions: Vec<String>,
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_types: ALLOWED_TYPES.iter().map(|s| s.to_string()).collect(),
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    /// Check type, then extension, then size, then the name itself.
    ///
    /// Both the declared content type and the extension must be on the
    /// allow-list; either one alone is not enough.
    pub fn validate(&self, req: &UploadRequest) -> Result<(), ValidationError> {
        let type_ok = self.allowed_types.iter().any(|t| t == &req.content_type);
        let lower = req.file_name.to_ascii_lowercase();
        let ext_ok = self
            .allowed_extensions
            .iter()
            .any(|ext| lower.ends_with(&ext.to_ascii_lowercase()));
        if !type_ok || !ext_ok {
            return Err(ValidationError::FileType {
                file_name: req.file_name.clone(),
                content_type: req.content_type.clone(),
            });
        }

        let size = req.size();
        if size > self.max_bytes {
            return Err(ValidationError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }

        validate_segment(&req.file_name)?;
        Ok(())
    }
}

/// A file the user picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file_name: String,
    /// Content type as declared by the client.
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadRequest {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Declare the content type from the file extension.
    ///
    /// Unknown extensions are declared `application/octet-stream`, which the
    /// default policy rejects.
    pub fn guess(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_for_name(&file_name).unwrap_or("application/octet-stream");
        Self::new(file_name.clone(), content_type, data)
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// MIME type for a file name, by extension.
pub fn mime_for_name(name: &str) -> Option<&'static str> {
    match extension_of(name)?.as_str() {
        "pdf" => Some("application/pdf"),
        "doc" => Some("application/msword"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

/// Icon family for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Pdf,
    Word,
    Image,
    Text,
    Other,
}

impl FileCategory {
    pub fn of(name: &str) -> Self {
        match extension_of(name).as_deref() {
            Some("pdf") => FileCategory::Pdf,
            Some("doc" | "docx") => FileCategory::Word,
            Some("jpg" | "jpeg" | "png") => FileCategory::Image,
            Some("txt") => FileCategory::Text,
            _ => FileCategory::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Pdf => "pdf",
            FileCategory::Word => "word",
            FileCategory::Image => "image",
            FileCategory::Text => "text",
            FileCategory::Other => "other",
        }
    }
}

/// Human-readable size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `10 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
