use axum::{
    extract::{Path, State},
    Json,
};

use super::{created, ok, CreatedResult, HandlerResult};
use crate::http::auth::{AuthUser, MANAGERS};
use crate::http::dto::{self, ResponseMessage, UserResponse};
use crate::http::state::AppState;
use crate::models::{RoleType, UserId};
use crate::services::messages;
use crate::services::teachers::{self, ChooseLessonTeacherRequest, TeacherRequest};

/// POST /teacher/save
pub async fn save_teacher(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<TeacherRequest>,
) -> CreatedResult<UserResponse> {
    auth.require(MANAGERS)?;
    let teacher = teachers::save_teacher(state.repository.as_ref(), &request).await?;
    created(messages::TEACHER_SAVED, teacher.into())
}

/// PUT /teacher/update/{user_id}
pub async fn update_teacher(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<UserId>,
    Json(request): Json<TeacherRequest>,
) -> HandlerResult<ResponseMessage<UserResponse>> {
    auth.require(MANAGERS)?;
    let teacher = teachers::update_teacher(state.repository.as_ref(), user_id, &request).await?;
    ok(messages::TEACHER_UPDATED, teacher.into())
}

/// GET /teacher/getAll
pub async fn list_teachers(
    State(state): State<AppState>,
    auth: AuthUser,
) -> HandlerResult<Vec<UserResponse>> {
    auth.require(MANAGERS)?;
    let found = teachers::list_teachers(state.repository.as_ref()).await?;
    Ok(Json(dto::users(found)))
}

/// PATCH /teacher/saveAdvisorTeacher/{user_id}
pub async fn set_advisor(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<UserId>,
) -> HandlerResult<ResponseMessage<UserResponse>> {
    auth.require(MANAGERS)?;
    let teacher = teachers::set_advisor(state.repository.as_ref(), user_id).await?;
    ok(messages::ADVISOR_TEACHER_SAVED, teacher.into())
}

/// DELETE /teacher/deleteAdvisorTeacherById/{user_id}
pub async fn unset_advisor(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<UserId>,
) -> HandlerResult<ResponseMessage<UserResponse>> {
    auth.require(MANAGERS)?;
    let teacher = teachers::unset_advisor(state.repository.as_ref(), user_id).await?;
    ok(messages::ADVISOR_TEACHER_DELETED, teacher.into())
}

/// GET /teacher/getAllAdvisorTeacher
pub async fn list_advisors(
    State(state): State<AppState>,
    auth: AuthUser,
) -> HandlerResult<Vec<UserResponse>> {
    auth.require(MANAGERS)?;
    let found = teachers::list_advisors(state.repository.as_ref()).await?;
    Ok(Json(dto::users(found)))
}

/// GET /teacher/getAllStudentByAdvisorTeacher
pub async fn students_of_advisor(
    State(state): State<AppState>,
    auth: AuthUser,
) -> HandlerResult<Vec<UserResponse>> {
    auth.require(&[RoleType::Teacher])?;
    let found = teachers::students_of_advisor(state.repository.as_ref(), &auth.user).await?;
    Ok(Json(dto::users(found)))
}

/// POST /teacher/addLessonProgram
pub async fn add_lesson_programs(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ChooseLessonTeacherRequest>,
) -> HandlerResult<ResponseMessage<UserResponse>> {
    auth.require(MANAGERS)?;
    let teacher = teachers::add_lesson_programs(state.repository.as_ref(), &request).await?;
    ok(messages::LESSON_PROGRAM_ADDED_TO_TEACHER, teacher.into())
}
