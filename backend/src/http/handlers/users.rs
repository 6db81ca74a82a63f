use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{created, ok, CreatedResult, HandlerResult};
use crate::http::auth::{AuthUser, MANAGERS};
use crate::http::dto::{self, NameQuery, ResponseMessage, UserResponse};
use crate::http::state::AppState;
use crate::models::{RoleType, UserId};
use crate::services::pagination::{Page, PageRequest};
use crate::services::users::{self, ProfileRequest, UserRequest};
use crate::services::messages;

/// POST /user/save/{user_role}
pub async fn save_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_role): Path<String>,
    Json(request): Json<UserRequest>,
) -> CreatedResult<UserResponse> {
    auth.require(&[RoleType::Admin])?;
    let user = users::save_user(state.repository.as_ref(), &user_role, &request).await?;
    created(messages::USER_CREATED, user.into())
}

/// GET /user/getAllUserByPage/{user_role}
pub async fn page_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_role): Path<String>,
    Query(page): Query<PageRequest>,
) -> HandlerResult<Page<UserResponse>> {
    auth.require(&[RoleType::Admin])?;
    let page = users::page_users(state.repository.as_ref(), &user_role, &page).await?;
    Ok(Json(page.map(UserResponse::from)))
}

/// GET /user/getUserById/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<UserId>,
) -> HandlerResult<ResponseMessage<UserResponse>> {
    auth.require(&[RoleType::Admin, RoleType::Dean])?;
    let user = users::get_user(state.repository.as_ref(), user_id).await?;
    ok(messages::USER_FOUND, user.into())
}

/// DELETE /user/delete/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<UserId>,
) -> HandlerResult<ResponseMessage<()>> {
    auth.require(MANAGERS)?;
    users::delete_user(state.repository.as_ref(), &auth.user, user_id).await?;
    state.sessions.revoke_user(user_id);
    Ok(Json(ResponseMessage::message(messages::USER_DELETED)))
}

/// PUT /user/update/{user_id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<UserId>,
    Json(request): Json<UserRequest>,
) -> HandlerResult<ResponseMessage<UserResponse>> {
    auth.require(&[RoleType::Admin])?;
    let user = users::update_user(state.repository.as_ref(), user_id, &request).await?;
    ok(messages::USER_UPDATED, user.into())
}

/// PATCH /user/updateUser
pub async fn update_own_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ProfileRequest>,
) -> HandlerResult<ResponseMessage<UserResponse>> {
    auth.require(&[
        RoleType::Admin,
        RoleType::Dean,
        RoleType::ViceDean,
        RoleType::Teacher,
    ])?;
    let user = users::update_own_profile(state.repository.as_ref(), &auth.user, &request).await?;
    ok(messages::USER_UPDATED, user.into())
}

/// GET /user/getUserByName?name=
pub async fn search_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<NameQuery>,
) -> HandlerResult<Vec<UserResponse>> {
    auth.require(MANAGERS)?;
    let found = users::search_users_by_name(state.repository.as_ref(), &query.name).await?;
    Ok(Json(dto::users(found)))
}
