//! Browsing session.
//!
//! A `Session` is who is looking at the resources. It is built once from the
//! auth provider and handed to the browser at construction; there is no
//! global "current user".

use serde::{Deserialize, Serialize};

use crate::user::{Role, User};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    /// Session for a signed-in user.
    pub fn new(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// Session with nobody signed in.
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

impl From<Option<User>> for Session {
    fn from(user: Option<User>) -> Self {
        Self { user }
    }
}
