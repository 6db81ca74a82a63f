//! Login sessions backed by opaque bearer tokens.
//!
//! Tokens are random UUIDs kept in an in-memory [`SessionStore`]; every
//! authenticated request resolves its token back to the stored user so that
//! deletions and deactivations take effect immediately.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use super::password::verify_password;
use crate::db::repository::FullRepository;
use crate::models::{RoleType, User, UserId};

/// A live login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub username: String,
    pub role: RoleType,
    pub created_at: DateTime<Utc>,
}

/// In-memory session store.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `user` and return its token.
    pub fn create(&self, user: &User) -> String {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            user_id: user.user_id(),
            username: user.username.clone(),
            role: user.role,
            created_at: Utc::now(),
        };
        self.sessions.write().insert(token.clone(), session);
        token
    }

    pub fn get(&self, token: &str) -> Option<Session> {
        self.sessions.read().get(token).cloned()
    }

    /// Drop a session. Returns whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.write().remove(token).is_some()
    }

    /// Drop every session of one user.
    pub fn revoke_user(&self, user_id: UserId) {
        self.sessions.write().retain(|_, s| s.user_id != user_id);
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
    pub role: RoleType,
    pub name: String,
}

/// Check credentials and open a session.
pub async fn login<R: FullRepository + ?Sized>(
    repo: &R,
    sessions: &SessionStore,
    request: &LoginRequest,
) -> ServiceResult<AuthResponse> {
    let user = repo
        .find_user_by_username(&request.username)
        .await?
        .filter(|u| verify_password(&request.password, &u.password_hash))
        .ok_or_else(|| {
            warn!("Failed login for username '{}'", request.username);
            ServiceError::unauthorized("Invalid username or password")
        })?;

    if !user.is_active {
        return Err(ServiceError::forbidden("User account is not active"));
    }

    let token = sessions.create(&user);
    info!("User '{}' logged in as {}", user.username, user.role);

    Ok(AuthResponse {
        token,
        username: user.username.clone(),
        role: user.role,
        name: user.full_name(),
    })
}

/// Resolve a bearer token to the current state of its user.
pub async fn authenticate<R: FullRepository + ?Sized>(
    repo: &R,
    sessions: &SessionStore,
    token: &str,
) -> ServiceResult<User> {
    let session = sessions
        .get(token)
        .ok_or_else(|| ServiceError::unauthorized("Invalid or expired token"))?;

    let user = match repo.get_user(session.user_id).await {
        Ok(user) => user,
        Err(e) if e.is_not_found() => {
            sessions.revoke(token);
            return Err(ServiceError::unauthorized("Invalid or expired token"));
        }
        Err(e) => return Err(e.into()),
    };

    if !user.is_active {
        sessions.revoke(token);
        return Err(ServiceError::unauthorized("User account is not active"));
    }
    Ok(user)
}

pub fn logout(sessions: &SessionStore, token: &str) -> bool {
    sessions.revoke(token)
}
