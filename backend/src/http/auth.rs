//! Bearer-token authentication for handlers.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::error::AppError;
use super::state::AppState;
use crate::models::{RoleType, User};
use crate::services::auth::authenticate;

/// Admin plus both manager roles.
pub const MANAGERS: &[RoleType] = &[RoleType::Admin, RoleType::Dean, RoleType::ViceDean];

/// The signed-in user behind an `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub token: String,
}

impl AuthUser {
    /// Refuse the request unless the user holds one of `roles`.
    pub fn require(&self, roles: &[RoleType]) -> Result<(), AppError> {
        if roles.contains(&self.user.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Role {} may not access this resource",
                self.user.role
            )))
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?
            .to_string();
        let user = authenticate(state.repository.as_ref(), &state.sessions, &token).await?;
        Ok(AuthUser { user, token })
    }
}
