//! Per-request identity. Handlers receive it as an explicit [`RequestContext`] value and hand
//! the contained [`AuthenticatedUser`] (if any) down to the model layer.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::web::{WebResult, error::WebError};

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    user_id: Uuid,
    username: String,
    user_role: UserRole,
}

impl AuthenticatedUser {
    pub fn new<S: Into<String>>(user_id: Uuid, username: S, user_role: UserRole) -> Self {
        Self {
            user_id,
            username: username.into(),
            user_role,
        }
    }

    /// Identity used by seeding tools and by lookups made before anyone is signed in.
    pub fn admin() -> Self {
        Self {
            user_id: Uuid::max(), // admin ID
            username: String::from("admin"),
            user_role: UserRole::Admin,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn user_role(&self) -> UserRole {
        self.user_role
    }

    pub fn is_admin(&self) -> bool {
        self.user_role == UserRole::Admin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    User,
}

impl From<&str> for UserRole {
    fn from(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    maybe_user: Option<AuthenticatedUser>,
}

impl RequestContext {
    pub fn new(maybe_user: Option<AuthenticatedUser>) -> Self {
        Self { maybe_user }
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }

    pub fn maybe_user(&self) -> Option<&AuthenticatedUser> {
        self.maybe_user.as_ref()
    }

    pub fn user(&self) -> WebResult<&AuthenticatedUser> {
        self.maybe_user.as_ref().ok_or(WebError::auth_required())
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default())
    }
}
