//! Student accounts.

use std::collections::BTreeSet;

use log::info;
use serde::Deserialize;

use super::checks::{ensure_unique_identity, require_advisor, require_role, require_text};
use super::error::ServiceResult;
use super::lesson_programs::assign_to_user;
use super::password::hash_password;
use super::users::{ProfileRequest, UserRequest};
use crate::db::repository::FullRepository;
use crate::models::{LessonProgramId, RoleType, User, UserId};

/// First number handed out on an empty store.
pub const FIRST_STUDENT_NUMBER: u32 = 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct StudentRequest {
    #[serde(flatten)]
    pub user: UserRequest,
    pub mother_name: String,
    pub father_name: String,
    pub advisor_teacher_id: UserId,
}

impl StudentRequest {
    pub fn validate(&self) -> ServiceResult<()> {
        self.user.validate()?;
        require_text("Mother name", &self.mother_name)?;
        require_text("Father name", &self.father_name)
    }
}

/// What a student may change about themselves.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentProfileRequest {
    #[serde(flatten)]
    pub profile: ProfileRequest,
    pub mother_name: String,
    pub father_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChooseLessonProgramRequest {
    pub lesson_program_ids: BTreeSet<LessonProgramId>,
}

async fn get_student<R: FullRepository + ?Sized>(repo: &R, id: UserId) -> ServiceResult<User> {
    let user = repo.get_user(id).await?;
    require_role(&user, RoleType::Student)?;
    Ok(user)
}

async fn check_advisor<R: FullRepository + ?Sized>(repo: &R, id: UserId) -> ServiceResult<()> {
    let advisor = repo.get_user(id).await?;
    require_advisor(&advisor)
}

async fn next_student_number<R: FullRepository + ?Sized>(repo: &R) -> ServiceResult<u32> {
    Ok(repo
        .max_student_number()
        .await?
        .map_or(FIRST_STUDENT_NUMBER, |n| n + 1))
}

pub async fn save_student<R: FullRepository + ?Sized>(
    repo: &R,
    request: &StudentRequest,
) -> ServiceResult<User> {
    request.validate()?;
    check_advisor(repo, request.advisor_teacher_id).await?;
    ensure_unique_identity(repo, request.user.profile.identity(), None).await?;

    let mut student = User::new(RoleType::Student, request.user.profile.username.clone());
    request.user.profile.apply_to(&mut student);
    student.password_hash = hash_password(&request.user.password);
    student.mother_name = Some(request.mother_name.clone());
    student.father_name = Some(request.father_name.clone());
    student.advisor_teacher_id = Some(request.advisor_teacher_id);
    student.student_number = Some(next_student_number(repo).await?);

    let saved = repo.save_user(&student).await?;
    info!(
        "Saved student '{}' with number {}",
        saved.username,
        saved.student_number.unwrap_or_default()
    );
    Ok(saved)
}

pub async fn update_own_profile<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    request: &StudentProfileRequest,
) -> ServiceResult<User> {
    let _lock = repo.lock_subjects(&[actor.user_id()]).await;
    let mut student = get_student(repo, actor.user_id()).await?;
    request.profile.validate()?;
    require_text("Mother name", &request.mother_name)?;
    require_text("Father name", &request.father_name)?;
    ensure_unique_identity(repo, request.profile.identity(), student.id).await?;

    request.profile.apply_to(&mut student);
    student.mother_name = Some(request.mother_name.clone());
    student.father_name = Some(request.father_name.clone());
    Ok(repo.save_user(&student).await?)
}

/// Manager update. Student number, activity and programs are kept.
pub async fn update_student<R: FullRepository + ?Sized>(
    repo: &R,
    id: UserId,
    request: &StudentRequest,
) -> ServiceResult<User> {
    request.validate()?;
    let _lock = repo.lock_subjects(&[id]).await;
    let mut student = get_student(repo, id).await?;
    check_advisor(repo, request.advisor_teacher_id).await?;
    ensure_unique_identity(repo, request.user.profile.identity(), student.id).await?;

    request.user.profile.apply_to(&mut student);
    student.password_hash = hash_password(&request.user.password);
    student.mother_name = Some(request.mother_name.clone());
    student.father_name = Some(request.father_name.clone());
    student.advisor_teacher_id = Some(request.advisor_teacher_id);
    Ok(repo.save_user(&student).await?)
}

/// Activate or deactivate a student. Returns the confirmation message.
pub async fn change_status<R: FullRepository + ?Sized>(
    repo: &R,
    id: UserId,
    active: bool,
) -> ServiceResult<String> {
    let _lock = repo.lock_subjects(&[id]).await;
    let mut student = get_student(repo, id).await?;
    student.is_active = active;
    repo.save_user(&student).await?;
    let state = if active { "active" } else { "passive" };
    info!("Student '{}' is now {}", student.username, state);
    Ok(format!("Student is {}", state))
}

pub async fn list_students<R: FullRepository + ?Sized>(repo: &R) -> ServiceResult<Vec<User>> {
    Ok(repo.list_users_by_role(RoleType::Student).await?)
}

/// The signed-in student picks lesson programs for themselves.
pub async fn add_lesson_programs<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    request: &ChooseLessonProgramRequest,
) -> ServiceResult<User> {
    require_role(actor, RoleType::Student)?;
    assign_to_user(repo, actor.user_id(), &request.lesson_program_ids).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::UserRepository;
    use crate::services::error::ServiceError;

    async fn advisor(repo: &LocalRepository) -> User {
        let mut teacher = User::new(RoleType::Teacher, "advisor");
        teacher.is_advisor = true;
        repo.save_user(&teacher).await.unwrap()
    }

    fn request(username: &str, n: u32, advisor: UserId) -> StudentRequest {
        StudentRequest {
            user: UserRequest {
                profile: ProfileRequest {
                    username: username.into(),
                    name: "Sam".into(),
                    surname: "Student".into(),
                    birth_day: None,
                    birth_place: None,
                    phone_number: format!("555-200-{:04}", n),
                    gender: None,
                    ssn: format!("999-00-{:04}", n),
                    email: format!("{}@school.io", username),
                },
                password: "password123".into(),
            },
            mother_name: "Mum".into(),
            father_name: "Dad".into(),
            advisor_teacher_id: advisor,
        }
    }

    #[tokio::test]
    async fn test_student_numbers_start_at_1000() {
        let repo = LocalRepository::new();
        let adv = advisor(&repo).await.user_id();
        let first = save_student(&repo, &request("s1", 1, adv)).await.unwrap();
        let second = save_student(&repo, &request("s2", 2, adv)).await.unwrap();
        assert_eq!(first.student_number, Some(1000));
        assert_eq!(second.student_number, Some(1001));
    }

    #[tokio::test]
    async fn test_advisor_must_be_advisor_teacher() {
        let repo = LocalRepository::new();
        let plain = repo
            .save_user(&User::new(RoleType::Teacher, "plain"))
            .await
            .unwrap();
        let err = save_student(&repo, &request("s1", 1, plain.user_id()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));

        let err = save_student(&repo, &request("s1", 1, UserId(404)))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_change_status_messages() {
        let repo = LocalRepository::new();
        let adv = advisor(&repo).await.user_id();
        let student = save_student(&repo, &request("s1", 1, adv)).await.unwrap();

        let message = change_status(&repo, student.user_id(), false).await.unwrap();
        assert_eq!(message, "Student is passive");
        assert!(!repo.get_user(student.user_id()).await.unwrap().is_active);
        let message = change_status(&repo, student.user_id(), true).await.unwrap();
        assert_eq!(message, "Student is active");
    }

    #[tokio::test]
    async fn test_update_keeps_student_number() {
        let repo = LocalRepository::new();
        let adv = advisor(&repo).await.user_id();
        let student = save_student(&repo, &request("s1", 1, adv)).await.unwrap();
        let mut req = request("renamed", 1, adv);
        req.mother_name = "Mother".into();

        let updated = update_student(&repo, student.user_id(), &req).await.unwrap();
        assert_eq!(updated.username, "renamed");
        assert_eq!(updated.student_number, student.student_number);
        assert_eq!(updated.mother_name.as_deref(), Some("Mother"));
    }

    #[tokio::test]
    async fn test_teacher_cannot_use_student_self_assignment() {
        let repo = LocalRepository::new();
        let teacher = advisor(&repo).await;
        let request = ChooseLessonProgramRequest {
            lesson_program_ids: [LessonProgramId(1)].into_iter().collect(),
        };
        assert!(add_lesson_programs(&repo, &teacher, &request).await.is_err());
    }
}
