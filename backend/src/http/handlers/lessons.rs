use std::collections::BTreeSet;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{created, ok, CreatedResult, HandlerResult};
use crate::http::auth::{AuthUser, MANAGERS};
use crate::http::dto::{LessonIdsQuery, LessonNameQuery, ResponseMessage};
use crate::http::error::AppError;
use crate::http::state::AppState;
use crate::models::{Lesson, LessonId};
use crate::services::lessons::{self, LessonRequest};
use crate::services::messages;
use crate::services::pagination::{Page, PageRequest};

/// Parse `1,2,3` into lesson ids.
fn parse_ids(raw: &str) -> Result<BTreeSet<LessonId>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<LessonId>()
                .map_err(|_| AppError::BadRequest(format!("Invalid lesson id: {}", s)))
        })
        .collect()
}

/// POST /lessons/save
pub async fn save_lesson(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<LessonRequest>,
) -> CreatedResult<Lesson> {
    auth.require(MANAGERS)?;
    let lesson = lessons::save_lesson(state.repository.as_ref(), &request).await?;
    created(messages::LESSON_SAVED, lesson)
}

/// DELETE /lessons/delete/{id}
pub async fn delete_lesson(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<LessonId>,
) -> HandlerResult<ResponseMessage<()>> {
    auth.require(MANAGERS)?;
    lessons::delete_lesson(state.repository.as_ref(), id).await?;
    Ok(Json(ResponseMessage::message(messages::LESSON_DELETED)))
}

/// GET /lessons/getLessonByName?lesson_name=
pub async fn get_lesson_by_name(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LessonNameQuery>,
) -> HandlerResult<ResponseMessage<Lesson>> {
    auth.require(MANAGERS)?;
    let lesson = lessons::get_lesson_by_name(state.repository.as_ref(), &query.lesson_name).await?;
    ok(messages::LESSON_FOUND, lesson)
}

/// GET /lessons/findLessonByPage
pub async fn page_lessons(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> HandlerResult<Page<Lesson>> {
    auth.require(MANAGERS)?;
    Ok(Json(lessons::page_lessons(state.repository.as_ref(), &page).await?))
}

/// PUT /lessons/update/{id}
pub async fn update_lesson(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<LessonId>,
    Json(request): Json<LessonRequest>,
) -> HandlerResult<ResponseMessage<Lesson>> {
    auth.require(MANAGERS)?;
    let lesson = lessons::update_lesson(state.repository.as_ref(), id, &request).await?;
    ok(messages::LESSON_UPDATED, lesson)
}

/// GET /lessons/getAllLessonByLessonIds?lesson_ids=1,2
pub async fn get_lessons(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LessonIdsQuery>,
) -> HandlerResult<Vec<Lesson>> {
    auth.require(MANAGERS)?;
    let ids = parse_ids(&query.lesson_ids)?;
    Ok(Json(lessons::get_lessons(state.repository.as_ref(), &ids).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids() {
        let ids = parse_ids("3, 1,,2").unwrap();
        assert_eq!(ids.into_iter().map(|i| i.value()).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(parse_ids("1,x").is_err());
    }
}
