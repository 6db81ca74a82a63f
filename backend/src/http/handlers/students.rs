use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{created, ok, CreatedResult, HandlerResult};
use crate::http::auth::{AuthUser, MANAGERS};
use crate::http::dto::{self, ChangeStatusQuery, ResponseMessage, UserResponse};
use crate::http::state::AppState;
use crate::models::{RoleType, UserId};
use crate::services::messages;
use crate::services::students::{
    self, ChooseLessonProgramRequest, StudentProfileRequest, StudentRequest,
};

/// POST /student/save
pub async fn save_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<StudentRequest>,
) -> CreatedResult<UserResponse> {
    auth.require(MANAGERS)?;
    let student = students::save_student(state.repository.as_ref(), &request).await?;
    created(messages::STUDENT_SAVED, student.into())
}

/// PATCH /student/update
pub async fn update_own_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<StudentProfileRequest>,
) -> HandlerResult<ResponseMessage<UserResponse>> {
    auth.require(&[RoleType::Student])?;
    let student = students::update_own_profile(state.repository.as_ref(), &auth.user, &request).await?;
    ok(messages::STUDENT_UPDATED, student.into())
}

/// PUT /student/update/{user_id}
pub async fn update_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<UserId>,
    Json(request): Json<StudentRequest>,
) -> HandlerResult<ResponseMessage<UserResponse>> {
    auth.require(MANAGERS)?;
    let student = students::update_student(state.repository.as_ref(), user_id, &request).await?;
    ok(messages::STUDENT_UPDATED, student.into())
}

/// GET /student/getAll
pub async fn list_students(
    State(state): State<AppState>,
    auth: AuthUser,
) -> HandlerResult<Vec<UserResponse>> {
    auth.require(MANAGERS)?;
    let found = students::list_students(state.repository.as_ref()).await?;
    Ok(Json(dto::users(found)))
}

/// GET /student/changeStatus?id=&status=
pub async fn change_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ChangeStatusQuery>,
) -> HandlerResult<ResponseMessage<()>> {
    auth.require(MANAGERS)?;
    let message = students::change_status(state.repository.as_ref(), query.id, query.status).await?;
    if !query.status {
        state.sessions.revoke_user(query.id);
    }
    Ok(Json(ResponseMessage::message(message)))
}

/// POST /student/addLessonProgramToStudent
pub async fn add_lesson_programs(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ChooseLessonProgramRequest>,
) -> HandlerResult<ResponseMessage<UserResponse>> {
    auth.require(&[RoleType::Student])?;
    let student = students::add_lesson_programs(state.repository.as_ref(), &auth.user, &request).await?;
    ok(messages::LESSON_PROGRAM_ADDED_TO_STUDENT, student.into())
}
