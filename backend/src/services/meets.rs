//! Advisor meetings.
//!
//! A meeting occupies its advisor and every listed student. Saving or moving a
//! meeting checks each of them for an overlapping meeting on the same date,
//! with all of them locked until the write lands.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveTime};
use log::{debug, info, warn};
use serde::Deserialize;

use super::checks::{require_advisor, require_role, require_text};
use super::error::{ServiceError, ServiceResult};
use super::pagination::{paginate, Page, PageRequest, Sortable};
use crate::db::repository::FullRepository;
use crate::models::{clock_time, Meet, MeetId, RoleType, User, UserId};
use crate::scheduling::{check_subject_on_date, validate_interval, TimeInterval};

#[derive(Debug, Clone, Deserialize)]
pub struct MeetRequest {
    pub description: String,
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub stop_time: NaiveTime,
    pub student_ids: Vec<UserId>,
}

impl MeetRequest {
    pub fn validate(&self) -> ServiceResult<()> {
        require_text("Description", &self.description)?;
        if self.student_ids.is_empty() {
            return Err(ServiceError::bad_request("A meet needs at least one student"));
        }
        validate_interval(self.start_time, self.stop_time)?;
        Ok(())
    }

    fn student_ids(&self) -> Vec<UserId> {
        let mut ids = self.student_ids.clone();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

impl Sortable for Meet {
    const SORT_FIELDS: &'static [&'static str] = &["id", "date", "start_time", "stop_time"];

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "date" => (self.date, self.start_time).cmp(&(other.date, other.start_time)),
            "start_time" => self.start_time.cmp(&other.start_time),
            "stop_time" => self.stop_time.cmp(&other.stop_time),
            _ => self.id.cmp(&other.id),
        }
    }
}

async fn load_students<R: FullRepository + ?Sized>(
    repo: &R,
    ids: &[UserId],
) -> ServiceResult<Vec<User>> {
    let students = repo.get_users(ids).await?;
    for student in &students {
        require_role(student, RoleType::Student)?;
    }
    Ok(students)
}

/// Meetings that occupy `subject`: the ones a teacher advises, the ones a
/// student attends.
async fn meetings_of<R: FullRepository + ?Sized>(
    repo: &R,
    subject: &User,
) -> ServiceResult<Vec<Meet>> {
    let meets = match subject.role {
        RoleType::Teacher => repo.list_meets_by_advisor(subject.user_id()).await?,
        _ => repo.list_meets_by_student(subject.user_id()).await?,
    };
    Ok(meets)
}

/// Check every subject for an overlapping meeting on `request.date`.
/// `exclude` is the meeting being updated, which never collides with itself.
async fn check_subjects<R: FullRepository + ?Sized>(
    repo: &R,
    subjects: &[&User],
    request: &MeetRequest,
    exclude: Option<MeetId>,
) -> ServiceResult<()> {
    for subject in subjects {
        let committed: Vec<TimeInterval<NaiveDate>> = meetings_of(repo, subject)
            .await?
            .iter()
            .filter(|m| m.id != exclude)
            .map(Meet::interval)
            .collect();
        debug!(
            "Checking {} '{}' against {} meeting(s)",
            subject.role,
            subject.username,
            committed.len()
        );
        check_subject_on_date(
            &subject.user_id(),
            request.date,
            request.start_time,
            request.stop_time,
            |_| committed,
        )
        .inspect_err(|e| warn!("Meeting rejected for '{}': {}", subject.username, e))?;
    }
    Ok(())
}

/// An advisor teacher schedules a meeting with some of their students.
pub async fn save_meet<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    request: &MeetRequest,
) -> ServiceResult<Meet> {
    require_advisor(actor)?;
    request.validate()?;
    let student_ids = request.student_ids();
    let students = load_students(repo, &student_ids).await?;

    let mut subjects = student_ids.clone();
    subjects.push(actor.user_id());
    let _lock = repo.lock_subjects(&subjects).await;

    let advisor = repo.get_user(actor.user_id()).await?;
    let occupied: Vec<&User> = std::iter::once(&advisor).chain(students.iter()).collect();
    check_subjects(repo, &occupied, request, None).await?;

    let saved = repo
        .save_meet(&Meet {
            id: None,
            description: request.description.clone(),
            date: request.date,
            start_time: request.start_time,
            stop_time: request.stop_time,
            advisor_teacher_id: advisor.user_id(),
            student_ids,
        })
        .await?;
    info!(
        "Saved meet {} on {} {} for advisor '{}' and {} student(s)",
        saved.id.map(|id| id.to_string()).unwrap_or_default(),
        saved.date,
        saved.interval().span,
        advisor.username,
        saved.student_ids.len()
    );
    Ok(saved)
}

/// Teachers may only touch their own meetings.
fn check_owner(actor: &User, meet: &Meet) -> ServiceResult<()> {
    if actor.role == RoleType::Teacher && meet.advisor_teacher_id != actor.user_id() {
        return Err(ServiceError::forbidden(
            "Meet does not belong to the current teacher",
        ));
    }
    Ok(())
}

/// Move or re-staff a meeting.
///
/// When the date or times change, the advisor and every student are checked.
/// Otherwise only newly added students are. The meeting itself is ignored in
/// either case.
pub async fn update_meet<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    id: MeetId,
    request: &MeetRequest,
) -> ServiceResult<Meet> {
    let current = repo.get_meet(id).await?;
    check_owner(actor, &current)?;
    request.validate()?;
    let student_ids = request.student_ids();
    let students = load_students(repo, &student_ids).await?;

    let mut subjects = student_ids.clone();
    subjects.extend(current.student_ids.iter().copied());
    subjects.push(current.advisor_teacher_id);
    let _lock = repo.lock_subjects(&subjects).await;

    let current = repo.get_meet(id).await?;
    let moved = current.date != request.date
        || current.start_time != request.start_time
        || current.stop_time != request.stop_time;

    let advisor = repo.get_user(current.advisor_teacher_id).await?;
    let occupied: Vec<&User> = if moved {
        std::iter::once(&advisor).chain(students.iter()).collect()
    } else {
        students
            .iter()
            .filter(|s| !current.student_ids.contains(&s.user_id()))
            .collect()
    };
    check_subjects(repo, &occupied, request, Some(id)).await?;

    let saved = repo
        .save_meet(&Meet {
            id: Some(id),
            description: request.description.clone(),
            date: request.date,
            start_time: request.start_time,
            stop_time: request.stop_time,
            advisor_teacher_id: current.advisor_teacher_id,
            student_ids,
        })
        .await?;
    info!("Updated meet {} (moved: {})", id, moved);
    Ok(saved)
}

pub async fn delete_meet<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    id: MeetId,
) -> ServiceResult<()> {
    let meet = repo.get_meet(id).await?;
    check_owner(actor, &meet)?;
    repo.delete_meet(id).await?;
    info!("Deleted meet {}", id);
    Ok(())
}

pub async fn get_meet<R: FullRepository + ?Sized>(repo: &R, id: MeetId) -> ServiceResult<Meet> {
    Ok(repo.get_meet(id).await?)
}

pub async fn list_meets<R: FullRepository + ?Sized>(repo: &R) -> ServiceResult<Vec<Meet>> {
    Ok(repo.list_meets().await?)
}

pub async fn page_meets<R: FullRepository + ?Sized>(
    repo: &R,
    page: &PageRequest,
) -> ServiceResult<Page<Meet>> {
    paginate(repo.list_meets().await?, page, "date")
}

/// Meetings the signed-in teacher advises.
pub async fn list_for_advisor<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
) -> ServiceResult<Vec<Meet>> {
    require_advisor(actor)?;
    Ok(repo.list_meets_by_advisor(actor.user_id()).await?)
}

pub async fn page_for_advisor<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    page: &PageRequest,
) -> ServiceResult<Page<Meet>> {
    paginate(list_for_advisor(repo, actor).await?, page, "date")
}

/// Meetings the signed-in student attends.
pub async fn list_for_student<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
) -> ServiceResult<Vec<Meet>> {
    require_role(actor, RoleType::Student)?;
    Ok(repo.list_meets_by_student(actor.user_id()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::{MeetRepository, UserRepository};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    async fn teacher(repo: &LocalRepository, name: &str) -> User {
        let mut user = User::new(RoleType::Teacher, name);
        user.is_advisor = true;
        repo.save_user(&user).await.unwrap()
    }

    async fn student(repo: &LocalRepository, name: &str) -> User {
        repo.save_user(&User::new(RoleType::Student, name)).await.unwrap()
    }

    fn request(date: NaiveDate, start: NaiveTime, stop: NaiveTime, students: &[&User]) -> MeetRequest {
        MeetRequest {
            description: "Progress review".into(),
            date,
            start_time: start,
            stop_time: stop,
            student_ids: students.iter().map(|s| s.user_id()).collect(),
        }
    }

    #[tokio::test]
    async fn test_advisor_double_booking_is_rejected() {
        let repo = LocalRepository::new();
        let advisor = teacher(&repo, "adv").await;
        let a = student(&repo, "a").await;
        let b = student(&repo, "b").await;

        save_meet(&repo, &advisor, &request(day(1), t(10, 0), t(11, 0), &[&a]))
            .await
            .unwrap();
        let err = save_meet(&repo, &advisor, &request(day(1), t(10, 30), t(11, 30), &[&b]))
            .await
            .unwrap_err();
        assert!(err.is_schedule_conflict());
        assert_eq!(repo.meet_count(), 1);
    }

    #[tokio::test]
    async fn test_student_booked_by_two_advisors_is_rejected() {
        let repo = LocalRepository::new();
        let first = teacher(&repo, "first").await;
        let second = teacher(&repo, "second").await;
        let shared = student(&repo, "shared").await;

        save_meet(&repo, &first, &request(day(2), t(9, 0), t(10, 0), &[&shared]))
            .await
            .unwrap();
        let err = save_meet(&repo, &second, &request(day(2), t(9, 0), t(9, 30), &[&shared]))
            .await
            .unwrap_err();
        assert!(err.is_schedule_conflict());
    }

    #[tokio::test]
    async fn test_back_to_back_and_other_dates_pass() {
        let repo = LocalRepository::new();
        let advisor = teacher(&repo, "adv").await;
        let a = student(&repo, "a").await;

        save_meet(&repo, &advisor, &request(day(3), t(10, 0), t(11, 0), &[&a]))
            .await
            .unwrap();
        save_meet(&repo, &advisor, &request(day(3), t(11, 0), t(12, 0), &[&a]))
            .await
            .unwrap();
        save_meet(&repo, &advisor, &request(day(4), t(10, 0), t(11, 0), &[&a]))
            .await
            .unwrap();
        assert_eq!(repo.meet_count(), 3);
    }

    #[tokio::test]
    async fn test_invalid_range_and_non_advisor() {
        let repo = LocalRepository::new();
        let advisor = teacher(&repo, "adv").await;
        let a = student(&repo, "a").await;

        let err = save_meet(&repo, &advisor, &request(day(1), t(11, 0), t(11, 0), &[&a]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Schedule(_)) && !err.is_schedule_conflict());

        let plain = repo.save_user(&User::new(RoleType::Teacher, "plain")).await.unwrap();
        assert!(matches!(
            save_meet(&repo, &plain, &request(day(1), t(9, 0), t(10, 0), &[&a])).await,
            Err(ServiceError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_update_without_moving_ignores_itself() {
        let repo = LocalRepository::new();
        let advisor = teacher(&repo, "adv").await;
        let a = student(&repo, "a").await;
        let b = student(&repo, "b").await;

        let meet = save_meet(&repo, &advisor, &request(day(1), t(10, 0), t(11, 0), &[&a]))
            .await
            .unwrap();
        let mut req = request(day(1), t(10, 0), t(11, 0), &[&a, &b]);
        req.description = "Now with b".into();
        let updated = update_meet(&repo, &advisor, meet.id.unwrap(), &req).await.unwrap();
        assert_eq!(updated.student_ids.len(), 2);
    }

    #[tokio::test]
    async fn test_update_checks_newly_added_student() {
        let repo = LocalRepository::new();
        let advisor = teacher(&repo, "adv").await;
        let other = teacher(&repo, "other").await;
        let a = student(&repo, "a").await;
        let busy = student(&repo, "busy").await;

        save_meet(&repo, &other, &request(day(1), t(10, 0), t(11, 0), &[&busy]))
            .await
            .unwrap();
        let meet = save_meet(&repo, &advisor, &request(day(1), t(10, 0), t(11, 0), &[&a]))
            .await
            .unwrap();

        let err = update_meet(
            &repo,
            &advisor,
            meet.id.unwrap(),
            &request(day(1), t(10, 0), t(11, 0), &[&a, &busy]),
        )
        .await
        .unwrap_err();
        assert!(err.is_schedule_conflict());
        assert_eq!(repo.get_meet(meet.id.unwrap()).await.unwrap().student_ids.len(), 1);
    }

    #[tokio::test]
    async fn test_moving_meet_checks_advisor() {
        let repo = LocalRepository::new();
        let advisor = teacher(&repo, "adv").await;
        let a = student(&repo, "a").await;
        let b = student(&repo, "b").await;

        save_meet(&repo, &advisor, &request(day(1), t(9, 0), t(10, 0), &[&a]))
            .await
            .unwrap();
        let second = save_meet(&repo, &advisor, &request(day(1), t(13, 0), t(14, 0), &[&b]))
            .await
            .unwrap();

        let err = update_meet(
            &repo,
            &advisor,
            second.id.unwrap(),
            &request(day(1), t(9, 30), t(10, 30), &[&b]),
        )
        .await
        .unwrap_err();
        assert!(err.is_schedule_conflict());

        update_meet(
            &repo,
            &advisor,
            second.id.unwrap(),
            &request(day(1), t(13, 30), t(14, 30), &[&b]),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_teacher_cannot_touch_foreign_meet() {
        let repo = LocalRepository::new();
        let owner = teacher(&repo, "owner").await;
        let intruder = teacher(&repo, "intruder").await;
        let a = student(&repo, "a").await;
        let meet = save_meet(&repo, &owner, &request(day(1), t(9, 0), t(10, 0), &[&a]))
            .await
            .unwrap();
        let id = meet.id.unwrap();

        assert!(matches!(
            delete_meet(&repo, &intruder, id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            update_meet(&repo, &intruder, id, &request(day(2), t(9, 0), t(10, 0), &[&a])).await,
            Err(ServiceError::Forbidden(_))
        ));

        let admin = User::new(RoleType::Admin, "root");
        delete_meet(&repo, &admin, id).await.unwrap();
    }

    #[tokio::test]
    async fn test_student_listing_sees_own_meets() {
        let repo = LocalRepository::new();
        let advisor = teacher(&repo, "adv").await;
        let a = student(&repo, "a").await;
        let b = student(&repo, "b").await;
        save_meet(&repo, &advisor, &request(day(1), t(9, 0), t(10, 0), &[&a]))
            .await
            .unwrap();

        assert_eq!(list_for_student(&repo, &a).await.unwrap().len(), 1);
        assert!(list_for_student(&repo, &b).await.unwrap().is_empty());
        assert_eq!(list_for_advisor(&repo, &advisor).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_advisor_listing_requires_advisor() {
        let repo = LocalRepository::new();
        let plain = repo.save_user(&User::new(RoleType::Teacher, "plain")).await.unwrap();
        assert!(matches!(
            list_for_advisor(&repo, &plain).await,
            Err(ServiceError::BadRequest(_))
        ));
        assert!(matches!(
            page_for_advisor(&repo, &plain, &PageRequest::default()).await,
            Err(ServiceError::BadRequest(_))
        ));
    }
}
