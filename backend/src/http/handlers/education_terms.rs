use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{created, ok, CreatedResult, HandlerResult};
use crate::http::auth::AuthUser;
use crate::http::dto::ResponseMessage;
use crate::http::state::AppState;
use crate::models::{EducationTerm, EducationTermId, RoleType};
use crate::services::education_terms::{self, EducationTermRequest};
use crate::services::messages;
use crate::services::pagination::{Page, PageRequest};

const EDITORS: &[RoleType] = &[RoleType::Admin, RoleType::Dean];
const READERS: &[RoleType] = &[
    RoleType::Admin,
    RoleType::Dean,
    RoleType::ViceDean,
    RoleType::Teacher,
];

/// POST /educationTerms/save
pub async fn save_education_term(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<EducationTermRequest>,
) -> CreatedResult<EducationTerm> {
    auth.require(EDITORS)?;
    let term = education_terms::save_education_term(state.repository.as_ref(), &request).await?;
    created(messages::EDUCATION_TERM_SAVED, term)
}

/// GET /educationTerms/{id}
pub async fn get_education_term(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<EducationTermId>,
) -> HandlerResult<EducationTerm> {
    auth.require(READERS)?;
    Ok(Json(
        education_terms::get_education_term(state.repository.as_ref(), id).await?,
    ))
}

/// GET /educationTerms/getAll
pub async fn list_education_terms(
    State(state): State<AppState>,
    auth: AuthUser,
) -> HandlerResult<Vec<EducationTerm>> {
    auth.require(READERS)?;
    Ok(Json(
        education_terms::list_education_terms(state.repository.as_ref()).await?,
    ))
}

/// GET /educationTerms/getAllEducationTermsByPage
pub async fn page_education_terms(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> HandlerResult<Page<EducationTerm>> {
    auth.require(READERS)?;
    Ok(Json(
        education_terms::page_education_terms(state.repository.as_ref(), &page).await?,
    ))
}

/// DELETE /educationTerms/delete/{id}
pub async fn delete_education_term(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<EducationTermId>,
) -> HandlerResult<ResponseMessage<()>> {
    auth.require(EDITORS)?;
    education_terms::delete_education_term(state.repository.as_ref(), id).await?;
    Ok(Json(ResponseMessage::message(messages::EDUCATION_TERM_DELETED)))
}

/// PUT /educationTerms/update/{id}
pub async fn update_education_term(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<EducationTermId>,
    Json(request): Json<EducationTermRequest>,
) -> HandlerResult<ResponseMessage<EducationTerm>> {
    auth.require(EDITORS)?;
    let term = education_terms::update_education_term(state.repository.as_ref(), id, &request).await?;
    ok(messages::EDUCATION_TERM_UPDATED, term)
}
