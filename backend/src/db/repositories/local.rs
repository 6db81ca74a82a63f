//! In-memory local repository implementation.
//!
//! All data lives in hash maps behind a single `parking_lot::RwLock`. Ids are
//! handed out from per-entity counters that only ever grow, so a deleted id is
//! never reused.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::db::repository::*;
use crate::models::*;

/// In-memory repository.
///
/// # Example
/// ```
/// use school_backend::db::repositories::LocalRepository;
/// use school_backend::db::repository::UserRepository;
/// use school_backend::models::{RoleType, User};
///
/// # tokio_test_block(async {
/// let repo = LocalRepository::new();
/// let saved = repo.save_user(&User::new(RoleType::Teacher, "t1")).await.unwrap();
/// assert!(saved.id.is_some());
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
    locks: Arc<SubjectLocks>,
}

struct LocalData {
    users: HashMap<UserId, User>,
    lessons: HashMap<LessonId, Lesson>,
    lesson_programs: HashMap<LessonProgramId, LessonProgram>,
    education_terms: HashMap<EducationTermId, EducationTerm>,
    meets: HashMap<MeetId, Meet>,
    student_infos: HashMap<StudentInfoId, StudentInfo>,

    // ID counters
    next_user_id: UserId,
    next_lesson_id: LessonId,
    next_lesson_program_id: LessonProgramId,
    next_education_term_id: EducationTermId,
    next_meet_id: MeetId,
    next_student_info_id: StudentInfoId,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            users: HashMap::new(),
            lessons: HashMap::new(),
            lesson_programs: HashMap::new(),
            education_terms: HashMap::new(),
            meets: HashMap::new(),
            student_infos: HashMap::new(),
            next_user_id: UserId(1),
            next_lesson_id: LessonId(1),
            next_lesson_program_id: LessonProgramId(1),
            next_education_term_id: EducationTermId(1),
            next_meet_id: MeetId(1),
            next_student_info_id: StudentInfoId(1),
            is_healthy: true,
        }
    }
}

/// Entities kept in an id-keyed map.
trait Stored: Clone {
    type Id: Copy + Eq + Hash + Ord + Display;
    const ENTITY: &'static str;

    fn stored_id(&self) -> Option<Self::Id>;
    fn assign_id(&mut self, id: Self::Id);
    fn following(id: Self::Id) -> Self::Id;
}

macro_rules! impl_stored {
    ($ty:ty, $id:ty, $entity:literal) => {
        impl Stored for $ty {
            type Id = $id;
            const ENTITY: &'static str = $entity;

            fn stored_id(&self) -> Option<$id> {
                self.id
            }

            fn assign_id(&mut self, id: $id) {
                self.id = Some(id);
            }

            fn following(id: $id) -> $id {
                id.next()
            }
        }
    };
}

impl_stored!(User, UserId, "user");
impl_stored!(Lesson, LessonId, "lesson");
impl_stored!(LessonProgram, LessonProgramId, "lesson_program");
impl_stored!(EducationTerm, EducationTermId, "education_term");
impl_stored!(Meet, MeetId, "meet");
impl_stored!(StudentInfo, StudentInfoId, "student_info");

/// Insert when the value carries no id, replace otherwise.
fn upsert<T: Stored>(
    map: &mut HashMap<T::Id, T>,
    next_id: &mut T::Id,
    value: &T,
) -> RepositoryResult<T> {
    let id = match value.stored_id() {
        Some(id) if map.contains_key(&id) => id,
        Some(id) => return Err(RepositoryError::missing(T::ENTITY, id)),
        None => {
            let id = *next_id;
            *next_id = T::following(id);
            id
        }
    };
    let mut stored = value.clone();
    stored.assign_id(id);
    map.insert(id, stored.clone());
    Ok(stored)
}

fn fetch<T: Stored>(map: &HashMap<T::Id, T>, id: T::Id) -> RepositoryResult<T> {
    map.get(&id)
        .cloned()
        .ok_or_else(|| RepositoryError::missing(T::ENTITY, id))
}

fn fetch_many<T: Stored>(map: &HashMap<T::Id, T>, ids: &[T::Id]) -> RepositoryResult<Vec<T>> {
    ids.iter().map(|id| fetch(map, *id)).collect()
}

fn sorted<'a, T: Stored + 'a>(values: impl Iterator<Item = &'a T>) -> Vec<T> {
    let mut out: Vec<T> = values.cloned().collect();
    out.sort_by_key(|v| v.stored_id());
    out
}

fn remove<T: Stored>(map: &mut HashMap<T::Id, T>, id: T::Id) -> RepositoryResult<T> {
    map.remove(&id)
        .ok_or_else(|| RepositoryError::missing(T::ENTITY, id))
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            locks: Arc::new(SubjectLocks::new()),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    pub fn user_count(&self) -> usize {
        self.data.read().users.len()
    }

    pub fn meet_count(&self) -> usize {
        self.data.read().meets.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&LocalData) -> RepositoryResult<T>) -> RepositoryResult<T> {
        self.check_health()?;
        f(&self.data.read())
    }

    fn write<T>(
        &self,
        f: impl FnOnce(&mut LocalData) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        self.check_health()?;
        f(&mut self.data.write())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== User Repository ====================

#[async_trait]
impl UserRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn save_user(&self, user: &User) -> RepositoryResult<User> {
        self.write(|data| upsert(&mut data.users, &mut data.next_user_id, user))
            .map_err(|e| e.with_operation("save_user"))
    }

    async fn get_user(&self, id: UserId) -> RepositoryResult<User> {
        self.read(|data| fetch(&data.users, id))
    }

    async fn get_users(&self, ids: &[UserId]) -> RepositoryResult<Vec<User>> {
        self.read(|data| fetch_many(&data.users, ids))
    }

    async fn find_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        self.read(|data| {
            Ok(data
                .users
                .values()
                .find(|u| u.username == username)
                .cloned())
        })
    }

    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        self.read(|data| Ok(sorted(data.users.values())))
    }

    async fn list_users_by_role(&self, role: RoleType) -> RepositoryResult<Vec<User>> {
        self.read(|data| Ok(sorted(data.users.values().filter(|u| u.role == role))))
    }

    async fn search_users_by_name(&self, fragment: &str) -> RepositoryResult<Vec<User>> {
        let needle = fragment.to_lowercase();
        self.read(|data| {
            Ok(sorted(data.users.values().filter(|u| {
                u.name.to_lowercase().contains(&needle)
                    || u.surname.to_lowercase().contains(&needle)
            })))
        })
    }

    async fn list_students_by_advisor(&self, advisor: UserId) -> RepositoryResult<Vec<User>> {
        self.read(|data| {
            Ok(sorted(data.users.values().filter(|u| {
                u.role == RoleType::Student && u.advisor_teacher_id == Some(advisor)
            })))
        })
    }

    async fn count_users_by_role(&self, role: RoleType) -> RepositoryResult<usize> {
        self.read(|data| Ok(data.users.values().filter(|u| u.role == role).count()))
    }

    async fn max_student_number(&self) -> RepositoryResult<Option<u32>> {
        self.read(|data| Ok(data.users.values().filter_map(|u| u.student_number).max()))
    }

    async fn delete_user(&self, id: UserId) -> RepositoryResult<()> {
        self.write(|data| {
            remove(&mut data.users, id)?;
            data.meets.retain(|_, m| m.advisor_teacher_id != id);
            for meet in data.meets.values_mut() {
                meet.student_ids.retain(|s| *s != id);
            }
            data.student_infos
                .retain(|_, i| i.student_id != id && i.teacher_id != id);
            for user in data.users.values_mut() {
                if user.advisor_teacher_id == Some(id) {
                    user.advisor_teacher_id = None;
                }
            }
            Ok(())
        })
        .map_err(|e| e.with_operation("delete_user"))
    }
}

// ==================== Catalog Repository ====================

#[async_trait]
impl CatalogRepository for LocalRepository {
    async fn save_lesson(&self, lesson: &Lesson) -> RepositoryResult<Lesson> {
        self.write(|data| upsert(&mut data.lessons, &mut data.next_lesson_id, lesson))
    }

    async fn get_lesson(&self, id: LessonId) -> RepositoryResult<Lesson> {
        self.read(|data| fetch(&data.lessons, id))
    }

    async fn get_lessons(&self, ids: &[LessonId]) -> RepositoryResult<Vec<Lesson>> {
        self.read(|data| fetch_many(&data.lessons, ids))
    }

    async fn find_lesson_by_name(&self, name: &str) -> RepositoryResult<Option<Lesson>> {
        self.read(|data| {
            Ok(data
                .lessons
                .values()
                .find(|l| l.lesson_name.eq_ignore_ascii_case(name))
                .cloned())
        })
    }

    async fn list_lessons(&self) -> RepositoryResult<Vec<Lesson>> {
        self.read(|data| Ok(sorted(data.lessons.values())))
    }

    async fn delete_lesson(&self, id: LessonId) -> RepositoryResult<()> {
        self.write(|data| {
            remove(&mut data.lessons, id)?;
            for program in data.lesson_programs.values_mut() {
                program.lesson_ids.remove(&id);
            }
            data.student_infos.retain(|_, i| i.lesson_id != id);
            Ok(())
        })
    }

    async fn save_lesson_program(&self, program: &LessonProgram) -> RepositoryResult<LessonProgram> {
        self.write(|data| {
            upsert(
                &mut data.lesson_programs,
                &mut data.next_lesson_program_id,
                program,
            )
        })
    }

    async fn get_lesson_program(&self, id: LessonProgramId) -> RepositoryResult<LessonProgram> {
        self.read(|data| fetch(&data.lesson_programs, id))
    }

    async fn get_lesson_programs(
        &self,
        ids: &[LessonProgramId],
    ) -> RepositoryResult<Vec<LessonProgram>> {
        self.read(|data| fetch_many(&data.lesson_programs, ids))
    }

    async fn list_lesson_programs(&self) -> RepositoryResult<Vec<LessonProgram>> {
        self.read(|data| Ok(sorted(data.lesson_programs.values())))
    }

    async fn delete_lesson_program(&self, id: LessonProgramId) -> RepositoryResult<()> {
        self.write(|data| {
            remove(&mut data.lesson_programs, id)?;
            for user in data.users.values_mut() {
                user.lesson_program_ids.remove(&id);
            }
            Ok(())
        })
    }

    async fn save_education_term(&self, term: &EducationTerm) -> RepositoryResult<EducationTerm> {
        self.write(|data| {
            upsert(
                &mut data.education_terms,
                &mut data.next_education_term_id,
                term,
            )
        })
    }

    async fn get_education_term(&self, id: EducationTermId) -> RepositoryResult<EducationTerm> {
        self.read(|data| fetch(&data.education_terms, id))
    }

    async fn list_education_terms(&self) -> RepositoryResult<Vec<EducationTerm>> {
        self.read(|data| Ok(sorted(data.education_terms.values())))
    }

    async fn delete_education_term(&self, id: EducationTermId) -> RepositoryResult<()> {
        self.write(|data| {
            remove(&mut data.education_terms, id)?;
            let dropped: Vec<LessonProgramId> = data
                .lesson_programs
                .values()
                .filter(|p| p.education_term_id == id)
                .filter_map(|p| p.id)
                .collect();
            for program_id in &dropped {
                data.lesson_programs.remove(program_id);
            }
            for user in data.users.values_mut() {
                for program_id in &dropped {
                    user.lesson_program_ids.remove(program_id);
                }
            }
            data.student_infos.retain(|_, i| i.education_term_id != id);
            Ok(())
        })
    }
}

// ==================== Meet Repository ====================

#[async_trait]
impl MeetRepository for LocalRepository {
    async fn save_meet(&self, meet: &Meet) -> RepositoryResult<Meet> {
        self.write(|data| upsert(&mut data.meets, &mut data.next_meet_id, meet))
            .map_err(|e| e.with_operation("save_meet"))
    }

    async fn get_meet(&self, id: MeetId) -> RepositoryResult<Meet> {
        self.read(|data| fetch(&data.meets, id))
    }

    async fn list_meets(&self) -> RepositoryResult<Vec<Meet>> {
        self.read(|data| Ok(sorted(data.meets.values())))
    }

    async fn list_meets_by_advisor(&self, advisor: UserId) -> RepositoryResult<Vec<Meet>> {
        self.read(|data| {
            Ok(sorted(
                data.meets
                    .values()
                    .filter(|m| m.advisor_teacher_id == advisor),
            ))
        })
    }

    async fn list_meets_by_student(&self, student: UserId) -> RepositoryResult<Vec<Meet>> {
        self.read(|data| {
            Ok(sorted(
                data.meets
                    .values()
                    .filter(|m| m.student_ids.contains(&student)),
            ))
        })
    }

    async fn delete_meet(&self, id: MeetId) -> RepositoryResult<()> {
        self.write(|data| remove(&mut data.meets, id).map(|_| ()))
    }
}

// ==================== Student Info Repository ====================

#[async_trait]
impl StudentInfoRepository for LocalRepository {
    async fn save_student_info(&self, info: &StudentInfo) -> RepositoryResult<StudentInfo> {
        self.write(|data| {
            upsert(
                &mut data.student_infos,
                &mut data.next_student_info_id,
                info,
            )
        })
    }

    async fn get_student_info(&self, id: StudentInfoId) -> RepositoryResult<StudentInfo> {
        self.read(|data| fetch(&data.student_infos, id))
    }

    async fn list_student_infos(&self) -> RepositoryResult<Vec<StudentInfo>> {
        self.read(|data| Ok(sorted(data.student_infos.values())))
    }

    async fn list_student_infos_by_student(
        &self,
        student: UserId,
    ) -> RepositoryResult<Vec<StudentInfo>> {
        self.read(|data| {
            Ok(sorted(
                data.student_infos
                    .values()
                    .filter(|i| i.student_id == student),
            ))
        })
    }

    async fn list_student_infos_by_teacher(
        &self,
        teacher: UserId,
    ) -> RepositoryResult<Vec<StudentInfo>> {
        self.read(|data| {
            Ok(sorted(
                data.student_infos
                    .values()
                    .filter(|i| i.teacher_id == teacher),
            ))
        })
    }

    async fn delete_student_info(&self, id: StudentInfoId) -> RepositoryResult<()> {
        self.write(|data| remove(&mut data.student_infos, id).map(|_| ()))
    }
}

// ==================== Schedule Locking ====================

#[async_trait]
impl ScheduleLocking for LocalRepository {
    async fn lock_subjects(&self, subjects: &[UserId]) -> ScheduleLock {
        self.locks.acquire(subjects).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{NaiveDate, NaiveTime};

    use super::*;

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    fn term() -> EducationTerm {
        EducationTerm {
            id: None,
            term: Term::FallSemester,
            start_date: date(1),
            end_date: date(30),
            last_registration_date: date(1),
        }
    }

    fn program(term_id: EducationTermId) -> LessonProgram {
        LessonProgram {
            id: None,
            day: Day::Monday,
            start_time: t(9),
            stop_time: t(10),
            lesson_ids: BTreeSet::new(),
            education_term_id: term_id,
        }
    }

    #[tokio::test]
    async fn test_save_assigns_increasing_ids() {
        let repo = LocalRepository::new();
        let a = repo.save_user(&User::new(RoleType::Teacher, "a")).await.unwrap();
        let b = repo.save_user(&User::new(RoleType::Teacher, "b")).await.unwrap();
        assert_eq!(a.id, Some(UserId(1)));
        assert_eq!(b.id, Some(UserId(2)));

        repo.delete_user(UserId(2)).await.unwrap();
        let c = repo.save_user(&User::new(RoleType::Teacher, "c")).await.unwrap();
        assert_eq!(c.id, Some(UserId(3)));
    }

    #[tokio::test]
    async fn test_update_of_unknown_id_is_not_found() {
        let repo = LocalRepository::new();
        let mut user = User::new(RoleType::Admin, "ghost");
        user.id = Some(UserId(99));
        let err = repo.save_user(&user).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.context().operation.as_deref(), Some("save_user"));
    }

    #[tokio::test]
    async fn test_unhealthy_repository_refuses_reads() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        let err = repo.list_users().await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_get_many_fails_on_unknown_id() {
        let repo = LocalRepository::new();
        let saved = repo.save_user(&User::new(RoleType::Student, "s")).await.unwrap();
        assert!(repo.get_users(&[saved.user_id(), UserId(42)]).await.is_err());
        assert_eq!(repo.get_users(&[saved.user_id()]).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_lesson_lookup_ignores_case() {
        let repo = LocalRepository::new();
        repo.save_lesson(&Lesson {
            id: None,
            lesson_name: "Physics".into(),
            credit_score: 5,
            is_compulsory: true,
        })
        .await
        .unwrap();
        assert!(repo.find_lesson_by_name("PHYSICS").await.unwrap().is_some());
        assert!(repo.find_lesson_by_name("Chemistry").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_program_detaches_it_from_users() {
        let repo = LocalRepository::new();
        let term = repo.save_education_term(&term()).await.unwrap();
        let program = repo
            .save_lesson_program(&program(term.id.unwrap()))
            .await
            .unwrap();
        let mut student = User::new(RoleType::Student, "s");
        student.lesson_program_ids.insert(program.id.unwrap());
        let student = repo.save_user(&student).await.unwrap();

        repo.delete_lesson_program(program.id.unwrap()).await.unwrap();
        let reloaded = repo.get_user(student.user_id()).await.unwrap();
        assert!(reloaded.lesson_program_ids.is_empty());
    }

    #[tokio::test]
    async fn test_deleting_term_drops_its_programs() {
        let repo = LocalRepository::new();
        let term = repo.save_education_term(&term()).await.unwrap();
        repo.save_lesson_program(&program(term.id.unwrap()))
            .await
            .unwrap();
        repo.delete_education_term(term.id.unwrap()).await.unwrap();
        assert!(repo.list_lesson_programs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_user_cascades_to_meets() {
        let repo = LocalRepository::new();
        let teacher = repo.save_user(&User::new(RoleType::Teacher, "t")).await.unwrap();
        let student = repo.save_user(&User::new(RoleType::Student, "s")).await.unwrap();
        let other = repo.save_user(&User::new(RoleType::Student, "o")).await.unwrap();
        let meet = Meet {
            id: None,
            description: "review".into(),
            date: date(2),
            start_time: t(9),
            stop_time: t(10),
            advisor_teacher_id: teacher.user_id(),
            student_ids: vec![student.user_id(), other.user_id()],
        };
        repo.save_meet(&meet).await.unwrap();

        repo.delete_user(student.user_id()).await.unwrap();
        let meets = repo.list_meets_by_advisor(teacher.user_id()).await.unwrap();
        assert_eq!(meets[0].student_ids, vec![other.user_id()]);

        repo.delete_user(teacher.user_id()).await.unwrap();
        assert_eq!(repo.meet_count(), 0);
    }

    #[tokio::test]
    async fn test_max_student_number() {
        let repo = LocalRepository::new();
        assert_eq!(repo.max_student_number().await.unwrap(), None);
        let mut student = User::new(RoleType::Student, "s");
        student.student_number = Some(1004);
        repo.save_user(&student).await.unwrap();
        assert_eq!(repo.max_student_number().await.unwrap(), Some(1004));
    }
}
