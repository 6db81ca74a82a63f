//! Lesson catalog.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use log::info;
use serde::Deserialize;

use super::checks::require_text;
use super::error::{ServiceError, ServiceResult};
use super::pagination::{paginate, Page, PageRequest, Sortable};
use crate::db::repository::FullRepository;
use crate::models::{Lesson, LessonId};

#[derive(Debug, Clone, Deserialize)]
pub struct LessonRequest {
    pub lesson_name: String,
    pub credit_score: u32,
    #[serde(default)]
    pub is_compulsory: bool,
}

impl Sortable for Lesson {
    const SORT_FIELDS: &'static [&'static str] = &["id", "lesson_name", "credit_score"];

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "lesson_name" => self.lesson_name.cmp(&other.lesson_name),
            "credit_score" => self.credit_score.cmp(&other.credit_score),
            _ => self.id.cmp(&other.id),
        }
    }
}

async fn ensure_name_free<R: FullRepository + ?Sized>(
    repo: &R,
    name: &str,
    owner: Option<LessonId>,
) -> ServiceResult<()> {
    match repo.find_lesson_by_name(name).await? {
        Some(existing) if owner.is_none() || existing.id != owner => Err(ServiceError::conflict(
            format!("Lesson with lesson name {} already exists", name),
        )),
        _ => Ok(()),
    }
}

pub async fn save_lesson<R: FullRepository + ?Sized>(
    repo: &R,
    request: &LessonRequest,
) -> ServiceResult<Lesson> {
    require_text("Lesson name", &request.lesson_name)?;
    ensure_name_free(repo, &request.lesson_name, None).await?;

    let saved = repo
        .save_lesson(&Lesson {
            id: None,
            lesson_name: request.lesson_name.clone(),
            credit_score: request.credit_score,
            is_compulsory: request.is_compulsory,
        })
        .await?;
    info!("Saved lesson '{}'", saved.lesson_name);
    Ok(saved)
}

pub async fn update_lesson<R: FullRepository + ?Sized>(
    repo: &R,
    id: LessonId,
    request: &LessonRequest,
) -> ServiceResult<Lesson> {
    let mut lesson = repo.get_lesson(id).await?;
    require_text("Lesson name", &request.lesson_name)?;
    ensure_name_free(repo, &request.lesson_name, lesson.id).await?;

    lesson.lesson_name = request.lesson_name.clone();
    lesson.credit_score = request.credit_score;
    lesson.is_compulsory = request.is_compulsory;
    Ok(repo.save_lesson(&lesson).await?)
}

pub async fn delete_lesson<R: FullRepository + ?Sized>(repo: &R, id: LessonId) -> ServiceResult<()> {
    repo.delete_lesson(id).await?;
    info!("Deleted lesson {}", id);
    Ok(())
}

pub async fn get_lesson_by_name<R: FullRepository + ?Sized>(
    repo: &R,
    name: &str,
) -> ServiceResult<Lesson> {
    repo.find_lesson_by_name(name)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("Lesson with lesson name {} not found", name)))
}

pub async fn page_lessons<R: FullRepository + ?Sized>(
    repo: &R,
    page: &PageRequest,
) -> ServiceResult<Page<Lesson>> {
    paginate(repo.list_lessons().await?, page, "lesson_name")
}

/// Resolve a set of ids, failing on the first unknown one.
pub async fn get_lessons<R: FullRepository + ?Sized>(
    repo: &R,
    ids: &BTreeSet<LessonId>,
) -> ServiceResult<Vec<Lesson>> {
    let ids: Vec<LessonId> = ids.iter().copied().collect();
    Ok(repo.get_lessons(&ids).await?)
}
