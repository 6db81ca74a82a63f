use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lesson::LessonProgramId;

crate::define_id_type!(i64, UserId);

/// Authority a user acts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleType {
    Admin,
    Dean,
    ViceDean,
    Teacher,
    Student,
}

impl RoleType {
    pub fn name(self) -> &'static str {
        match self {
            RoleType::Admin => "ADMIN",
            RoleType::Dean => "DEAN",
            RoleType::ViceDean => "VICE_DEAN",
            RoleType::Teacher => "TEACHER",
            RoleType::Student => "STUDENT",
        }
    }

    /// Whether a user with this role may delete a user holding `target`.
    /// Admins may delete anyone; built-in accounts are checked separately.
    pub fn can_delete(self, target: RoleType) -> bool {
        match self {
            RoleType::Admin => true,
            RoleType::Dean => matches!(
                target,
                RoleType::Teacher | RoleType::Student | RoleType::ViceDean
            ),
            RoleType::ViceDean => matches!(target, RoleType::Teacher | RoleType::Student),
            RoleType::Teacher | RoleType::Student => false,
        }
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoleType {
    type Err = String;

    /// Accepts the wire names as well as the path spellings used by the
    /// user endpoints (`Admin`, `Dean`, `ViceDean`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], "").as_str() {
            "admin" => Ok(RoleType::Admin),
            "dean" => Ok(RoleType::Dean),
            "vicedean" => Ok(RoleType::ViceDean),
            "teacher" => Ok(RoleType::Teacher),
            "student" => Ok(RoleType::Student),
            _ => Err(format!("Unknown user role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

/// Any account of the school: staff, teachers and students share one table.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Option<UserId>,
    pub username: String,
    pub ssn: String,
    pub name: String,
    pub surname: String,
    pub birth_day: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub password_hash: String,
    pub phone_number: String,
    pub email: String,
    pub built_in: bool,
    pub mother_name: Option<String>,
    pub father_name: Option<String>,
    pub student_number: Option<u32>,
    pub is_active: bool,
    pub is_advisor: bool,
    pub advisor_teacher_id: Option<UserId>,
    pub gender: Option<Gender>,
    pub role: RoleType,
    pub lesson_program_ids: BTreeSet<LessonProgramId>,
}

impl User {
    /// A fresh, unsaved account with the given identity fields.
    pub fn new(role: RoleType, username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            ssn: String::new(),
            name: String::new(),
            surname: String::new(),
            birth_day: None,
            birth_place: None,
            password_hash: String::new(),
            phone_number: String::new(),
            email: String::new(),
            built_in: false,
            mother_name: None,
            father_name: None,
            student_number: None,
            is_active: true,
            is_advisor: false,
            advisor_teacher_id: None,
            gender: None,
            role,
            lesson_program_ids: BTreeSet::new(),
        }
    }

    /// The id of a persisted user. Unsaved users report id 0.
    pub fn user_id(&self) -> UserId {
        self.id.unwrap_or(UserId(0))
    }

    pub fn has_role(&self, role: RoleType) -> bool {
        self.role == role
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }
}
