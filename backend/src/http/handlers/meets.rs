use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{created, ok, CreatedResult, HandlerResult};
use crate::http::auth::AuthUser;
use crate::http::dto::ResponseMessage;
use crate::http::state::AppState;
use crate::models::{Meet, MeetId, RoleType};
use crate::services::meets::{self, MeetRequest};
use crate::services::messages;
use crate::services::pagination::{Page, PageRequest};

/// POST /meet/save
pub async fn save_meet(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<MeetRequest>,
) -> CreatedResult<Meet> {
    auth.require(&[RoleType::Teacher])?;
    let meet = meets::save_meet(state.repository.as_ref(), &auth.user, &request).await?;
    created(messages::MEET_SAVED, meet)
}

/// GET /meet/getAll
pub async fn list_meets(State(state): State<AppState>, auth: AuthUser) -> HandlerResult<Vec<Meet>> {
    auth.require(&[RoleType::Admin])?;
    Ok(Json(meets::list_meets(state.repository.as_ref()).await?))
}

/// GET /meet/getMeetById/{meet_id}
pub async fn get_meet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(meet_id): Path<MeetId>,
) -> HandlerResult<ResponseMessage<Meet>> {
    auth.require(&[RoleType::Admin])?;
    let meet = meets::get_meet(state.repository.as_ref(), meet_id).await?;
    ok(messages::MEET_FOUND, meet)
}

/// DELETE /meet/delete/{meet_id}
pub async fn delete_meet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(meet_id): Path<MeetId>,
) -> HandlerResult<ResponseMessage<()>> {
    auth.require(&[RoleType::Admin, RoleType::Teacher])?;
    meets::delete_meet(state.repository.as_ref(), &auth.user, meet_id).await?;
    Ok(Json(ResponseMessage::message(messages::MEET_DELETED)))
}

/// GET /meet/getAllMeetByPage
pub async fn page_meets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> HandlerResult<Page<Meet>> {
    auth.require(&[RoleType::Admin])?;
    Ok(Json(meets::page_meets(state.repository.as_ref(), &page).await?))
}

/// PUT /meet/update/{meet_id}
pub async fn update_meet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(meet_id): Path<MeetId>,
    Json(request): Json<MeetRequest>,
) -> HandlerResult<ResponseMessage<Meet>> {
    auth.require(&[RoleType::Admin, RoleType::Teacher])?;
    let meet = meets::update_meet(state.repository.as_ref(), &auth.user, meet_id, &request).await?;
    ok(messages::MEET_UPDATED, meet)
}

/// GET /meet/getAllMeetByAdvisorTeacherAsList
pub async fn list_for_advisor(
    State(state): State<AppState>,
    auth: AuthUser,
) -> HandlerResult<Vec<Meet>> {
    auth.require(&[RoleType::Teacher])?;
    Ok(Json(
        meets::list_for_advisor(state.repository.as_ref(), &auth.user).await?,
    ))
}

/// GET /meet/getAllMeetByAdvisorAsPage
pub async fn page_for_advisor(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> HandlerResult<Page<Meet>> {
    auth.require(&[RoleType::Teacher])?;
    Ok(Json(
        meets::page_for_advisor(state.repository.as_ref(), &auth.user, &page).await?,
    ))
}

/// GET /meet/getAllMeetByStudent
pub async fn list_for_student(
    State(state): State<AppState>,
    auth: AuthUser,
) -> HandlerResult<Vec<Meet>> {
    auth.require(&[RoleType::Student])?;
    Ok(Json(
        meets::list_for_student(state.repository.as_ref(), &auth.user).await?,
    ))
}
