//! Ownership zones.
//!
//! A key's leading segments decide who may write beneath it:
//!
//! ```text
//! .                       Root       (mixed; nobody but admins writes here)
//! ├── admin/              Admin      (admins only)
//! └── teachers/           Teachers   (index of teacher zones)
//!     └── <teacher name>/ Teacher    (that teacher, and admins)
//! ```
//!
//! Anything else at the top level is `Shared`. The resolver and the access
//! predicate both classify through the same [`ZoneTable`], so they can never
//! disagree about where a zone starts.

use serde::{Deserialize, Serialize};
use studysphere_types::{Role, User, VirtualPath};

/// Label shown for the teachers zone root.
pub const TEACHERS_LABEL: &str = "Teachers";
/// Label an admin sees for their own zone root.
pub const MY_FOLDER_LABEL: &str = "My Folder";

/// Where a path falls in the ownership hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone<'a> {
    Root,
    Admin,
    /// `teachers` itself, above any one teacher's zone.
    TeachersIndex,
    /// Inside `teachers/<name>`.
    Teacher(&'a str),
    /// Top-level entries outside both zones.
    Shared,
}

/// Zone root names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneTable {
    /// First segment of the admin zone.
    pub admin: String,
    /// First segment under which each teacher gets `<name>/`.
    pub teachers: String,
}

impl Default for ZoneTable {
    fn default() -> Self {
        Self {
            admin: "admin".into(),
            teachers: "teachers".into(),
        }
    }
}

impl ZoneTable {
    /// Classify a path by its first one or two segments.
    pub fn classify<'p>(&self, path: &'p VirtualPath) -> Zone<'p> {
        match path.segment(0) {
            None => Zone::Root,
            Some(first) if first == self.admin => Zone::Admin,
            Some(first) if first == self.teachers => match path.segment(1) {
                Some(name) => Zone::Teacher(name),
                None => Zone::TeachersIndex,
            },
            Some(_) => Zone::Shared,
        }
    }

    pub fn admin_root(&self) -> VirtualPath {
        VirtualPath::parse(&self.admin)
    }

    pub fn teachers_root(&self) -> VirtualPath {
        VirtualPath::parse(&self.teachers)
    }

    /// `teachers/<name>`.
    pub fn teacher_root(&self, name: &str) -> VirtualPath {
        VirtualPath::parse(&format!("{}/{}", self.teachers, name))
    }

    /// A user's own zone, if their role has one.
    pub fn home_for(&self, user: &User) -> Option<VirtualPath> {
        match user.role {
            Role::Admin => Some(self.admin_root()),
            Role::Teacher => Some(self.teacher_root(user.zone_name())),
            Role::Student | Role::Pending => None,
        }
    }

    /// Whether `name` at root is one of the zone roots.
    pub fn is_zone_root(&self, name: &str) -> bool {
        name == self.admin || name == self.teachers
    }

    /// Label for an entry named `name` listed in `dir`.
    ///
    /// Zone roots get friendly labels at the top level; everything else
    /// shows its own name.
    pub fn display_name(&self, user: Option<&User>, dir: &VirtualPath, name: &str) -> String {
        if dir.is_root() {
            if user.is_some() && name == self.teachers {
                return TEACHERS_LABEL.to_string();
            }
            if user.is_some_and(User::is_admin) && name == self.admin {
                return MY_FOLDER_LABEL.to_string();
            }
        }
        name.to_string()
    }
}
