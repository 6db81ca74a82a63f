use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{created, ok, CreatedResult, HandlerResult};
use crate::http::auth::{AuthUser, MANAGERS};
use crate::http::dto::ResponseMessage;
use crate::http::state::AppState;
use crate::models::{RoleType, StudentInfo, StudentInfoId, UserId};
use crate::services::messages;
use crate::services::pagination::{Page, PageRequest};
use crate::services::student_infos::{self, GradesRequest, StudentInfoRequest};

/// POST /studentInfo/save
pub async fn save_student_info(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<StudentInfoRequest>,
) -> CreatedResult<StudentInfo> {
    auth.require(&[RoleType::Teacher])?;
    let info = student_infos::save_student_info(
        state.repository.as_ref(),
        &auth.user,
        &state.grading,
        &request,
    )
    .await?;
    created(messages::STUDENT_INFO_SAVED, info)
}

/// DELETE /studentInfo/delete/{id}
pub async fn delete_student_info(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StudentInfoId>,
) -> HandlerResult<ResponseMessage<()>> {
    auth.require(&[RoleType::Admin, RoleType::Teacher])?;
    student_infos::delete_student_info(state.repository.as_ref(), id).await?;
    Ok(Json(ResponseMessage::message(messages::STUDENT_INFO_DELETED)))
}

/// GET /studentInfo/getAllStudentInfoByPage
pub async fn page_student_infos(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> HandlerResult<Page<StudentInfo>> {
    auth.require(MANAGERS)?;
    Ok(Json(
        student_infos::page_student_infos(state.repository.as_ref(), &page).await?,
    ))
}

/// GET /studentInfo/getByStudentId/{student_id}
pub async fn list_by_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(student_id): Path<UserId>,
) -> HandlerResult<Vec<StudentInfo>> {
    auth.require(MANAGERS)?;
    Ok(Json(
        student_infos::list_by_student(state.repository.as_ref(), student_id).await?,
    ))
}

/// GET /studentInfo/get/{id}
pub async fn get_student_info(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StudentInfoId>,
) -> HandlerResult<StudentInfo> {
    auth.require(MANAGERS)?;
    Ok(Json(
        student_infos::get_student_info(state.repository.as_ref(), id).await?,
    ))
}

/// PUT /studentInfo/update/{id}
pub async fn update_student_info(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StudentInfoId>,
    Json(request): Json<GradesRequest>,
) -> HandlerResult<ResponseMessage<StudentInfo>> {
    auth.require(&[RoleType::Admin, RoleType::Teacher])?;
    let info = student_infos::update_student_info(
        state.repository.as_ref(),
        &state.grading,
        id,
        &request,
    )
    .await?;
    ok(messages::STUDENT_INFO_UPDATED, info)
}

/// GET /studentInfo/getAllForTeacher
pub async fn page_for_teacher(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> HandlerResult<Page<StudentInfo>> {
    auth.require(&[RoleType::Teacher])?;
    Ok(Json(
        student_infos::page_for_teacher(state.repository.as_ref(), &auth.user, &page).await?,
    ))
}

/// GET /studentInfo/getAllForStudent
pub async fn page_for_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> HandlerResult<Page<StudentInfo>> {
    auth.require(&[RoleType::Student])?;
    Ok(Json(
        student_infos::page_for_student(state.repository.as_ref(), &auth.user, &page).await?,
    ))
}
