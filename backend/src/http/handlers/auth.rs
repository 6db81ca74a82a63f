use axum::{extract::State, Json};

use super::HandlerResult;
use crate::http::auth::AuthUser;
use crate::http::dto::{ResponseMessage, UserResponse};
use crate::http::state::AppState;
use crate::services::auth::{self, AuthResponse, LoginRequest};
use crate::services::messages;

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> HandlerResult<AuthResponse> {
    let response = auth::login(state.repository.as_ref(), &state.sessions, &request).await?;
    Ok(Json(response))
}

/// POST /auth/logout
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> HandlerResult<ResponseMessage<()>> {
    auth::logout(&state.sessions, &auth.token);
    Ok(Json(ResponseMessage::message(messages::LOGGED_OUT)))
}

/// GET /auth/me
pub async fn me(auth: AuthUser) -> HandlerResult<UserResponse> {
    Ok(Json(auth.user.into()))
}
