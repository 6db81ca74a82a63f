//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashSet};
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveTime};
use school_backend::db::LocalRepository;
use school_backend::models::{
    Day, EducationTerm, Lesson, LessonProgram, LessonProgramId, Term, User, UserId,
};
use school_backend::services::education_terms::{self, EducationTermRequest};
use school_backend::services::lesson_programs::{self, LessonProgramRequest};
use school_backend::services::lessons::{self, LessonRequest};
use school_backend::services::students::{self, StudentRequest};
use school_backend::services::teachers::{self, TeacherRequest};
use school_backend::services::users::{ProfileRequest, UserRequest};

pub const PASSWORD: &str = "correct-horse";

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A valid account request; `n` keeps ssn, phone and email unique.
pub fn user_request(username: &str, n: u32) -> UserRequest {
    UserRequest {
        profile: ProfileRequest {
            username: username.to_string(),
            name: format!("Name{}", n),
            surname: "Tester".to_string(),
            birth_day: Some(date(1990, 1, 1)),
            birth_place: Some("Ankara".to_string()),
            phone_number: format!("555-200-{:04}", n),
            gender: None,
            ssn: format!("123-45-{:04}", n),
            email: format!("{}@school.test", username),
        },
        password: PASSWORD.to_string(),
    }
}

pub async fn teacher(repo: &LocalRepository, username: &str, n: u32, advisor: bool) -> User {
    let request = TeacherRequest {
        user: user_request(username, n),
        lesson_program_ids: BTreeSet::new(),
        is_advisor_teacher: advisor,
    };
    teachers::save_teacher(repo, &request).await.unwrap()
}

pub async fn student(repo: &LocalRepository, username: &str, n: u32, advisor: UserId) -> User {
    let request = StudentRequest {
        user: user_request(username, n),
        mother_name: "Mother".to_string(),
        father_name: "Father".to_string(),
        advisor_teacher_id: advisor,
    };
    students::save_student(repo, &request).await.unwrap()
}

pub async fn lesson(repo: &LocalRepository, name: &str) -> Lesson {
    let request = LessonRequest {
        lesson_name: name.to_string(),
        credit_score: 5,
        is_compulsory: true,
    };
    lessons::save_lesson(repo, &request).await.unwrap()
}

pub async fn fall_term(repo: &LocalRepository, year: i32) -> EducationTerm {
    let request = EducationTermRequest {
        term: Term::FallSemester,
        start_date: date(year, 9, 1),
        end_date: date(year + 1, 1, 15),
        last_registration_date: date(year, 8, 20),
    };
    education_terms::save_education_term(repo, &request).await.unwrap()
}

pub async fn program(
    repo: &LocalRepository,
    lesson: &Lesson,
    term: &EducationTerm,
    day: Day,
    start: NaiveTime,
    stop: NaiveTime,
) -> LessonProgram {
    let request = LessonProgramRequest {
        day,
        start_time: start,
        stop_time: stop,
        lesson_ids: [lesson.id.unwrap()].into_iter().collect(),
        education_term_id: term.id.unwrap(),
    };
    lesson_programs::save_lesson_program(repo, &request)
        .await
        .unwrap()
}

pub fn ids(programs: &[&LessonProgram]) -> BTreeSet<LessonProgramId> {
    programs.iter().map(|p| p.id.unwrap()).collect()
}

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}
