//! Auth and profile lookup.
//!
//! The backend owns sign-in; we only ask who is signed in and what their
//! profile says, once, and freeze the answer into a [`Session`].

use async_trait::async_trait;
use studysphere_types::{Role, Session, User, UserId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("profile not found for user {0}")]
    ProfileNotFound(UserId),

    #[error("auth backend error: {0}")]
    Backend(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Profile row for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub role: Role,
}

/// Auth/profile collaborator.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The signed-in user's id, or `None` when nobody is signed in.
    async fn current_user_id(&self) -> AuthResult<Option<UserId>>;

    /// Profile for `id`.
    async fn profile(&self, id: UserId) -> AuthResult<Profile>;
}

/// Build the session for whoever is signed in.
///
/// Nobody signed in is an anonymous session, not an error. A signed-in user
/// without a readable profile is an error.
pub async fn load_session(auth: &dyn AuthProvider) -> AuthResult<Session> {
    let Some(id) = auth.current_user_id().await? else {
        tracing::debug!("no signed-in user, anonymous session");
        return Ok(Session::anonymous());
    };

    let profile = auth.profile(id).await.inspect_err(|e| {
        tracing::warn!(user = %id.short(), "failed to load user profile: {}", e);
    })?;

    tracing::info!(user = %id.short(), role = %profile.role, "user profile loaded");
    Ok(Session::new(User::new(id, profile.name, profile.role)))
}

/// Fixed identity: always the same user (or nobody).
///
/// Backs the CLI, where the acting user comes from flags, and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user: Option<User>,
}

impl StaticAuth {
    pub fn new(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// User with a deterministic id derived from `name`.
    pub fn named(name: impl Into<String>, role: Role) -> Self {
        let name = name.into();
        Self::new(User::new(UserId::from_handle(&name), name, role))
    }

    pub fn signed_out() -> Self {
        Self { user: None }
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn current_user_id(&self) -> AuthResult<Option<UserId>> {
        Ok(self.user.as_ref().map(|u| u.id))
    }

    async fn profile(&self, id: UserId) -> AuthResult<Profile> {
        match &self.user {
            Some(u) if u.id == id => Ok(Profile {
                name: u.name.clone(),
                role: u.role,
            }),
            _ => Err(AuthError::ProfileNotFound(id)),
        }
    }
}
