//! Teacher accounts, advisor status and teaching assignments.

use std::collections::BTreeSet;

use log::info;
use serde::Deserialize;

use super::checks::{ensure_unique_identity, require_advisor, require_role};
use super::error::{ServiceError, ServiceResult};
use super::lesson_programs::{assign_to_user, check_initial_programs};
use super::password::hash_password;
use super::users::UserRequest;
use crate::db::repository::FullRepository;
use crate::models::{LessonProgramId, RoleType, User, UserId};

#[derive(Debug, Clone, Deserialize)]
pub struct TeacherRequest {
    #[serde(flatten)]
    pub user: UserRequest,
    #[serde(default)]
    pub lesson_program_ids: BTreeSet<LessonProgramId>,
    #[serde(default)]
    pub is_advisor_teacher: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChooseLessonTeacherRequest {
    pub teacher_id: UserId,
    pub lesson_program_ids: BTreeSet<LessonProgramId>,
}

async fn get_teacher<R: FullRepository + ?Sized>(repo: &R, id: UserId) -> ServiceResult<User> {
    let user = repo.get_user(id).await?;
    require_role(&user, RoleType::Teacher)?;
    Ok(user)
}

/// Detach every student of `advisor`, leaving them without an advisor.
///
/// Callers must not hold the advisor's lock: meeting bookings lock a student
/// before a higher-numbered advisor.
async fn release_students<R: FullRepository + ?Sized>(
    repo: &R,
    advisor: UserId,
) -> ServiceResult<usize> {
    let mut count = 0;
    for listed in repo.list_students_by_advisor(advisor).await? {
        let id = listed.user_id();
        let _lock = repo.lock_subjects(&[id]).await;
        let mut student = repo.get_user(id).await?;
        if student.advisor_teacher_id != Some(advisor) {
            continue;
        }
        student.advisor_teacher_id = None;
        repo.save_user(&student).await?;
        count += 1;
    }
    Ok(count)
}

/// Create a teacher. Initial lesson programs must exist and must not
/// overlap one another.
pub async fn save_teacher<R: FullRepository + ?Sized>(
    repo: &R,
    request: &TeacherRequest,
) -> ServiceResult<User> {
    request.user.validate()?;
    ensure_unique_identity(repo, request.user.profile.identity(), None).await?;
    check_initial_programs(repo, &request.lesson_program_ids).await?;

    let mut teacher = User::new(RoleType::Teacher, request.user.profile.username.clone());
    request.user.profile.apply_to(&mut teacher);
    teacher.password_hash = hash_password(&request.user.password);
    teacher.is_advisor = request.is_advisor_teacher;
    teacher.lesson_program_ids = request.lesson_program_ids.clone();

    let saved = repo.save_user(&teacher).await?;
    info!(
        "Saved teacher '{}' (id {}, advisor: {})",
        saved.username,
        saved.user_id(),
        saved.is_advisor
    );
    Ok(saved)
}

/// Manager update of a teacher. The program set is replaced and checked as
/// a whole, under the teacher's schedule lock.
pub async fn update_teacher<R: FullRepository + ?Sized>(
    repo: &R,
    id: UserId,
    request: &TeacherRequest,
) -> ServiceResult<User> {
    request.user.validate()?;
    let lock = repo.lock_subjects(&[id]).await;
    let mut teacher = get_teacher(repo, id).await?;
    ensure_unique_identity(repo, request.user.profile.identity(), teacher.id).await?;
    check_initial_programs(repo, &request.lesson_program_ids).await?;

    let was_advisor = teacher.is_advisor;
    request.user.profile.apply_to(&mut teacher);
    teacher.password_hash = hash_password(&request.user.password);
    teacher.is_advisor = request.is_advisor_teacher;
    teacher.lesson_program_ids = request.lesson_program_ids.clone();

    let saved = repo.save_user(&teacher).await?;
    drop(lock);
    if was_advisor && !saved.is_advisor {
        let released = release_students(repo, id).await?;
        info!("Teacher {} is no longer an advisor, released {} student(s)", id, released);
    }
    Ok(saved)
}

pub async fn set_advisor<R: FullRepository + ?Sized>(repo: &R, id: UserId) -> ServiceResult<User> {
    let _lock = repo.lock_subjects(&[id]).await;
    let mut teacher = get_teacher(repo, id).await?;
    if teacher.is_advisor {
        return Err(ServiceError::conflict(format!(
            "Teacher with id {} is already an advisor teacher",
            id
        )));
    }
    teacher.is_advisor = true;
    let saved = repo.save_user(&teacher).await?;
    info!("Teacher '{}' is now an advisor", saved.username);
    Ok(saved)
}

/// Remove advisor status. The advisor's students are left without an advisor.
pub async fn unset_advisor<R: FullRepository + ?Sized>(
    repo: &R,
    id: UserId,
) -> ServiceResult<User> {
    let lock = repo.lock_subjects(&[id]).await;
    let mut teacher = get_teacher(repo, id).await?;
    require_advisor(&teacher)?;

    teacher.is_advisor = false;
    let saved = repo.save_user(&teacher).await?;
    drop(lock);
    let released = release_students(repo, id).await?;
    info!(
        "Teacher '{}' is no longer an advisor, released {} student(s)",
        saved.username, released
    );
    Ok(saved)
}

pub async fn list_teachers<R: FullRepository + ?Sized>(repo: &R) -> ServiceResult<Vec<User>> {
    Ok(repo.list_users_by_role(RoleType::Teacher).await?)
}

pub async fn list_advisors<R: FullRepository + ?Sized>(repo: &R) -> ServiceResult<Vec<User>> {
    Ok(repo
        .list_users_by_role(RoleType::Teacher)
        .await?
        .into_iter()
        .filter(|t| t.is_advisor)
        .collect())
}

/// Students advised by the signed-in teacher.
pub async fn students_of_advisor<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
) -> ServiceResult<Vec<User>> {
    require_advisor(actor)?;
    Ok(repo.list_students_by_advisor(actor.user_id()).await?)
}

pub async fn add_lesson_programs<R: FullRepository + ?Sized>(
    repo: &R,
    request: &ChooseLessonTeacherRequest,
) -> ServiceResult<User> {
    get_teacher(repo, request.teacher_id).await?;
    assign_to_user(repo, request.teacher_id, &request.lesson_program_ids).await
}
