//! Users and roles.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::ids::UserId;

/// Name used for a teacher zone when the profile carries no name.
pub const UNKNOWN_NAME: &str = "unknown";

/// Role assigned to a profile by an administrator.
///
/// New sign-ups start as `Pending` until an admin assigns a real role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Role {
    /// Read-only access to every resource.
    Student,
    /// Full access inside their own zone, read-only elsewhere.
    Teacher,
    /// Full access everywhere.
    Admin,
    /// Registered but not yet approved.
    #[default]
    Pending,
}

impl Role {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
            Role::Pending => "pending",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Profile snapshot for the signed-in user.
///
/// Fetched once per session; never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Display name. Teachers' zones are keyed by it.
    pub name: String,
    pub role: Role,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
        }
    }

    /// The name used as a zone key; falls back to [`UNKNOWN_NAME`].
    pub fn zone_name(&self) -> &str {
        if self.name.is_empty() {
            UNKNOWN_NAME
        } else {
            &self.name
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.zone_name(), self.role)
    }
}
