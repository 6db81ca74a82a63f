use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{created, CreatedResult, HandlerResult};
use crate::http::auth::{AuthUser, MANAGERS};
use crate::http::dto::ResponseMessage;
use crate::http::state::AppState;
use crate::models::{LessonProgram, LessonProgramId, RoleType, UserId};
use crate::services::lesson_programs::{self, LessonProgramRequest};
use crate::services::messages;
use crate::services::pagination::{Page, PageRequest};

const EVERYONE: &[RoleType] = &[
    RoleType::Admin,
    RoleType::Dean,
    RoleType::ViceDean,
    RoleType::Teacher,
    RoleType::Student,
];

/// POST /lessonPrograms/save
pub async fn save_lesson_program(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<LessonProgramRequest>,
) -> CreatedResult<LessonProgram> {
    auth.require(MANAGERS)?;
    let program = lesson_programs::save_lesson_program(state.repository.as_ref(), &request).await?;
    created(messages::LESSON_PROGRAM_SAVED, program)
}

/// GET /lessonPrograms/getAll
pub async fn list_lesson_programs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> HandlerResult<Vec<LessonProgram>> {
    auth.require(EVERYONE)?;
    Ok(Json(lesson_programs::list_lesson_programs(state.repository.as_ref()).await?))
}

/// GET /lessonPrograms/getById/{id}
pub async fn get_lesson_program(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<LessonProgramId>,
) -> HandlerResult<LessonProgram> {
    auth.require(MANAGERS)?;
    Ok(Json(lesson_programs::get_lesson_program(state.repository.as_ref(), id).await?))
}

/// GET /lessonPrograms/getAllUnassigned
pub async fn list_unassigned(
    State(state): State<AppState>,
    auth: AuthUser,
) -> HandlerResult<Vec<LessonProgram>> {
    auth.require(EVERYONE)?;
    Ok(Json(lesson_programs::list_unassigned(state.repository.as_ref()).await?))
}

/// GET /lessonPrograms/getAllAssigned
pub async fn list_assigned(
    State(state): State<AppState>,
    auth: AuthUser,
) -> HandlerResult<Vec<LessonProgram>> {
    auth.require(EVERYONE)?;
    Ok(Json(lesson_programs::list_assigned(state.repository.as_ref()).await?))
}

/// GET /lessonPrograms/getAllLessonProgramByUser
pub async fn list_for_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> HandlerResult<Vec<LessonProgram>> {
    auth.require(&[RoleType::Teacher, RoleType::Student])?;
    Ok(Json(
        lesson_programs::list_for_user(state.repository.as_ref(), &auth.user).await?,
    ))
}

/// GET /lessonPrograms/getAllLessonProgramByTeacherId/{user_id}
pub async fn list_for_teacher(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<UserId>,
) -> HandlerResult<Vec<LessonProgram>> {
    auth.require(MANAGERS)?;
    Ok(Json(
        lesson_programs::list_for_teacher(state.repository.as_ref(), user_id).await?,
    ))
}

/// GET /lessonPrograms/getAllLessonProgramByStudentId/{user_id}
pub async fn list_for_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<UserId>,
) -> HandlerResult<Vec<LessonProgram>> {
    auth.require(MANAGERS)?;
    Ok(Json(
        lesson_programs::list_for_student(state.repository.as_ref(), user_id).await?,
    ))
}

/// DELETE /lessonPrograms/delete/{id}
pub async fn delete_lesson_program(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<LessonProgramId>,
) -> HandlerResult<ResponseMessage<()>> {
    auth.require(MANAGERS)?;
    lesson_programs::delete_lesson_program(state.repository.as_ref(), id).await?;
    Ok(Json(ResponseMessage::message(messages::LESSON_PROGRAM_DELETED)))
}

/// GET /lessonPrograms/getAllLessonProgramByPage
pub async fn page_lesson_programs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> HandlerResult<Page<LessonProgram>> {
    auth.require(EVERYONE)?;
    Ok(Json(
        lesson_programs::page_lesson_programs(state.repository.as_ref(), &page).await?,
    ))
}
