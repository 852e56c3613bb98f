//! Inline file previews.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use studysphere_types::extension_of;

/// Shown in place of text that could not be fetched.
pub const TEXT_LOAD_ERROR: &str = "Error loading file content";

/// How a previewable file is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    /// Embedded document viewer on the signed URL.
    Pdf,
    /// Image tag on the signed URL.
    Image,
    /// Content fetched through the signed URL and shown verbatim.
    Text,
}

impl PreviewKind {
    /// Previewable subset of the upload allow-list; `None` for the rest.
    pub fn for_name(name: &str) -> Option<Self> {
        match extension_of(name)?.as_str() {
            "pdf" => Some(PreviewKind::Pdf),
            "jpg" | "jpeg" | "png" => Some(PreviewKind::Image),
            "txt" => Some(PreviewKind::Text),
            _ => None,
        }
    }
}

/// An open preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    pub name: String,
    /// Storage key of the previewed file.
    pub path: String,
    pub kind: PreviewKind,
    pub url: String,
    pub expires_at: SystemTime,
    /// Fetched content, for [`PreviewKind::Text`] only.
    pub text: Option<String>,
}

/// A signed link the client downloads from directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLink {
    /// Name to save the file as.
    pub file_name: String,
    pub url: String,
    pub expires_at: SystemTime,
}
