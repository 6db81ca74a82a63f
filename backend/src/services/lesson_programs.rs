//! Weekly lesson programs and their assignment to teachers and students.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use chrono::NaiveTime;
use log::{debug, info};
use serde::Deserialize;

use super::checks::require_role;
use super::error::{ServiceError, ServiceResult};
use super::pagination::{paginate, Page, PageRequest, Sortable};
use crate::db::repository::FullRepository;
use crate::models::{
    clock_time, Day, EducationTermId, LessonId, LessonProgram, LessonProgramId, RoleType, User,
    UserId,
};
use crate::scheduling::{check_assignment, validate_interval, TimeInterval};

#[derive(Debug, Clone, Deserialize)]
pub struct LessonProgramRequest {
    pub day: Day,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub stop_time: NaiveTime,
    pub lesson_ids: BTreeSet<LessonId>,
    pub education_term_id: EducationTermId,
}

impl Sortable for LessonProgram {
    const SORT_FIELDS: &'static [&'static str] = &["id", "day", "start_time", "stop_time"];

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "day" => self.day.cmp(&other.day),
            "start_time" => self.start_time.cmp(&other.start_time),
            "stop_time" => self.stop_time.cmp(&other.stop_time),
            _ => self.id.cmp(&other.id),
        }
    }
}

fn intervals(programs: &[LessonProgram]) -> Vec<TimeInterval<Day>> {
    programs.iter().map(LessonProgram::interval).collect()
}

/// Assign lesson programs to a teacher or student.
///
/// The subject is reloaded under its schedule lock, so the committed programs
/// compared against are the ones current at commit time. Requested programs
/// must not overlap each other nor anything the subject already holds.
pub(crate) async fn assign_to_user<R: FullRepository + ?Sized>(
    repo: &R,
    subject: UserId,
    program_ids: &BTreeSet<LessonProgramId>,
) -> ServiceResult<User> {
    if program_ids.is_empty() {
        return Err(ServiceError::bad_request("Lesson program ids must not be empty"));
    }

    let _lock = repo.lock_subjects(&[subject]).await;
    let mut user = repo.get_user(subject).await?;

    let held: Vec<LessonProgramId> = user.lesson_program_ids.iter().copied().collect();
    let requested: Vec<LessonProgramId> = program_ids.iter().copied().collect();
    let existing = repo.get_lesson_programs(&held).await?;
    let candidates = repo.get_lesson_programs(&requested).await?;

    check_assignment(&intervals(&existing), &intervals(&candidates))?;

    user.lesson_program_ids.extend(requested);
    let saved = repo.save_user(&user).await?;
    info!(
        "Assigned {} lesson program(s) to {} '{}'",
        program_ids.len(),
        saved.role,
        saved.username
    );
    Ok(saved)
}

/// Check a set of programs among themselves, before any of them is held.
pub(crate) async fn check_initial_programs<R: FullRepository + ?Sized>(
    repo: &R,
    program_ids: &BTreeSet<LessonProgramId>,
) -> ServiceResult<()> {
    let ids: Vec<LessonProgramId> = program_ids.iter().copied().collect();
    let programs = repo.get_lesson_programs(&ids).await?;
    check_assignment(&[], &intervals(&programs))?;
    Ok(())
}

pub async fn save_lesson_program<R: FullRepository + ?Sized>(
    repo: &R,
    request: &LessonProgramRequest,
) -> ServiceResult<LessonProgram> {
    if request.lesson_ids.is_empty() {
        return Err(ServiceError::bad_request("Lesson ids must not be empty"));
    }
    let lesson_ids: Vec<LessonId> = request.lesson_ids.iter().copied().collect();
    repo.get_lessons(&lesson_ids).await?;
    repo.get_education_term(request.education_term_id).await?;
    validate_interval(request.start_time, request.stop_time)?;

    let program = LessonProgram {
        id: None,
        day: request.day,
        start_time: request.start_time,
        stop_time: request.stop_time,
        lesson_ids: request.lesson_ids.clone(),
        education_term_id: request.education_term_id,
    };
    let saved = repo.save_lesson_program(&program).await?;
    info!(
        "Saved lesson program {} on {} {}",
        saved.id.map(|id| id.to_string()).unwrap_or_default(),
        saved.day,
        saved.interval().span
    );
    Ok(saved)
}

pub async fn list_lesson_programs<R: FullRepository + ?Sized>(
    repo: &R,
) -> ServiceResult<Vec<LessonProgram>> {
    Ok(repo.list_lesson_programs().await?)
}

pub async fn get_lesson_program<R: FullRepository + ?Sized>(
    repo: &R,
    id: LessonProgramId,
) -> ServiceResult<LessonProgram> {
    Ok(repo.get_lesson_program(id).await?)
}

async fn assigned_ids<R: FullRepository + ?Sized>(
    repo: &R,
) -> ServiceResult<HashSet<LessonProgramId>> {
    Ok(repo
        .list_users()
        .await?
        .into_iter()
        .flat_map(|u| u.lesson_program_ids)
        .collect())
}

/// Programs no teacher or student holds.
pub async fn list_unassigned<R: FullRepository + ?Sized>(
    repo: &R,
) -> ServiceResult<Vec<LessonProgram>> {
    let assigned = assigned_ids(repo).await?;
    let programs = repo.list_lesson_programs().await?;
    Ok(programs
        .into_iter()
        .filter(|p| p.id.is_some_and(|id| !assigned.contains(&id)))
        .collect())
}

/// Programs held by at least one teacher or student.
pub async fn list_assigned<R: FullRepository + ?Sized>(
    repo: &R,
) -> ServiceResult<Vec<LessonProgram>> {
    let assigned = assigned_ids(repo).await?;
    let programs = repo.list_lesson_programs().await?;
    Ok(programs
        .into_iter()
        .filter(|p| p.id.is_some_and(|id| assigned.contains(&id)))
        .collect())
}

async fn programs_of<R: FullRepository + ?Sized>(
    repo: &R,
    user: &User,
) -> ServiceResult<Vec<LessonProgram>> {
    let ids: Vec<LessonProgramId> = user.lesson_program_ids.iter().copied().collect();
    Ok(repo.get_lesson_programs(&ids).await?)
}

/// Programs of the signed-in teacher or student.
pub async fn list_for_user<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
) -> ServiceResult<Vec<LessonProgram>> {
    let user = repo.get_user(actor.user_id()).await?;
    programs_of(repo, &user).await
}

pub async fn list_for_teacher<R: FullRepository + ?Sized>(
    repo: &R,
    teacher: UserId,
) -> ServiceResult<Vec<LessonProgram>> {
    let user = repo.get_user(teacher).await?;
    require_role(&user, RoleType::Teacher)?;
    programs_of(repo, &user).await
}

pub async fn list_for_student<R: FullRepository + ?Sized>(
    repo: &R,
    student: UserId,
) -> ServiceResult<Vec<LessonProgram>> {
    let user = repo.get_user(student).await?;
    require_role(&user, RoleType::Student)?;
    programs_of(repo, &user).await
}

pub async fn delete_lesson_program<R: FullRepository + ?Sized>(
    repo: &R,
    id: LessonProgramId,
) -> ServiceResult<()> {
    repo.delete_lesson_program(id).await?;
    debug!("Deleted lesson program {}", id);
    Ok(())
}

pub async fn page_lesson_programs<R: FullRepository + ?Sized>(
    repo: &R,
    page: &PageRequest,
) -> ServiceResult<Page<LessonProgram>> {
    paginate(repo.list_lesson_programs().await?, page, "day")
}
