//! Directory listing entries.
//!
//! These are ephemeral: recomputed on every listing, never persisted.

use serde::{Deserialize, Serialize};

use crate::path::VirtualPath;

/// Name of the zero-byte blob that keeps an otherwise-empty folder listed.
pub const SENTINEL: &str = ".keep";

/// Entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

impl EntryKind {
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File)
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, EntryKind::Folder)
    }
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Blob id for files; the name for folders (which have no blob).
    pub id: String,
    /// Entry name (not full path).
    pub name: String,
    pub kind: EntryKind,
    /// Full storage key, root-relative.
    pub path: String,
}

impl ResourceEntry {
    /// A file entry under `dir`.
    pub fn file(dir: &VirtualPath, name: impl Into<String>, id: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            path: dir.key_for(&name),
            name,
            kind: EntryKind::File,
        }
    }

    /// A folder entry under `dir`.
    pub fn folder(dir: &VirtualPath, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            path: dir.key_for(&name),
            name,
            kind: EntryKind::Folder,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }

    /// Where navigating into this entry lands.
    pub fn virtual_path(&self) -> VirtualPath {
        VirtualPath::parse(&self.path)
    }

    /// Lowercased extension without the dot, if the name has one.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }
}

/// Lowercased extension of a file name, without the dot.
///
/// Dotfiles with no further dot (`.keep`) have no extension.
pub fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let dir = VirtualPath::parse("admin");
        let f = ResourceEntry::file(&dir, "syllabus.pdf", "abc");
        assert_eq!(f.path, "admin/syllabus.pdf");
        assert!(f.is_file());

        let d = ResourceEntry::folder(&VirtualPath::root(), "teachers");
        assert_eq!(d.path, "teachers");
        assert_eq!(d.id, "teachers");
        assert!(d.is_folder());
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension_of("Report.PDF").as_deref(), Some("pdf"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension_of(".keep"), None);
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of("trailing."), None);
    }
}
