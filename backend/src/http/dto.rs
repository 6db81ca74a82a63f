//! Data Transfer Objects for the HTTP API.
//!
//! Request bodies are the service request types; this module holds the
//! response envelopes and the public views of stored entities.

use std::collections::BTreeSet;

use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Gender, LessonProgramId, RoleType, User, UserId};

/// Envelope returned by mutating endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessage<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<T>,
    pub http_status: u16,
}

impl<T> ResponseMessage<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, object: Option<T>) -> Self {
        Self {
            message: message.into(),
            object,
            http_status: status.as_u16(),
        }
    }

    pub fn ok(message: impl Into<String>, object: T) -> Self {
        Self::new(StatusCode::OK, message, Some(object))
    }

    pub fn created(message: impl Into<String>, object: T) -> Self {
        Self::new(StatusCode::CREATED, message, Some(object))
    }
}

impl ResponseMessage<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, message, None)
    }
}

/// Teacher-only fields of [`UserResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherDetails {
    pub is_advisor_teacher: bool,
    pub lesson_program_ids: BTreeSet<LessonProgramId>,
}

/// Student-only fields of [`UserResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDetails {
    pub student_number: Option<u32>,
    pub mother_name: Option<String>,
    pub father_name: Option<String>,
    pub is_active: bool,
    pub advisor_teacher_id: Option<UserId>,
    pub lesson_program_ids: BTreeSet<LessonProgramId>,
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Option<UserId>,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub birth_day: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub phone_number: String,
    pub gender: Option<Gender>,
    pub ssn: String,
    pub email: String,
    pub role: RoleType,
    pub built_in: bool,
    #[serde(flatten)]
    pub teacher: Option<TeacherDetails>,
    #[serde(flatten)]
    pub student: Option<StudentDetails>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let teacher = (user.role == RoleType::Teacher).then(|| TeacherDetails {
            is_advisor_teacher: user.is_advisor,
            lesson_program_ids: user.lesson_program_ids.clone(),
        });
        let student = (user.role == RoleType::Student).then(|| StudentDetails {
            student_number: user.student_number,
            mother_name: user.mother_name.clone(),
            father_name: user.father_name.clone(),
            is_active: user.is_active,
            advisor_teacher_id: user.advisor_teacher_id,
            lesson_program_ids: user.lesson_program_ids.clone(),
        });
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            surname: user.surname,
            birth_day: user.birth_day,
            birth_place: user.birth_place,
            phone_number: user.phone_number,
            gender: user.gender,
            ssn: user.ssn,
            email: user.email,
            role: user.role,
            built_in: user.built_in,
            teacher,
            student,
        }
    }
}

pub fn users(users: Vec<User>) -> Vec<UserResponse> {
    users.into_iter().map(UserResponse::from).collect()
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LessonNameQuery {
    pub lesson_name: String,
}

/// `?lesson_ids=1,2,3`
#[derive(Debug, Clone, Deserialize)]
pub struct LessonIdsQuery {
    pub lesson_ids: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeStatusQuery {
    pub id: UserId,
    pub status: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_hides_password_and_role_fields() {
        let mut user = User::new(RoleType::Dean, "dean");
        user.password_hash = "salt$digest".into();
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("student_number").is_none());
        assert!(json.get("is_advisor_teacher").is_none());
        assert_eq!(json["role"], "DEAN");
    }

    #[test]
    fn test_student_fields_are_flattened() {
        let mut user = User::new(RoleType::Student, "s");
        user.student_number = Some(1000);
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert_eq!(json["student_number"], 1000);
        assert_eq!(json["is_active"], true);
    }

    #[test]
    fn test_message_without_object() {
        let json = serde_json::to_value(ResponseMessage::message("done")).unwrap();
        assert_eq!(json["http_status"], 200);
        assert!(json.get("object").is_none());
    }
}
