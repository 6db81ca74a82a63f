//! Service layer for business rules and orchestration.
//!
//! Services sit between the HTTP handlers and the repository traits. Every
//! operation is a free async function generic over
//! [`FullRepository`](crate::db::repository::FullRepository), so the same rules
//! run against any storage backend and are tested against
//! [`LocalRepository`](crate::db::repositories::LocalRepository).
//!
//! Schedule-changing operations (lesson program assignment, meetings) hold the
//! affected subjects' locks from the conflict check until the write commits.

pub mod auth;
pub mod checks;
pub mod education_terms;
pub mod error;
pub mod lesson_programs;
pub mod lessons;
pub mod meets;
pub mod messages;
pub mod pagination;
pub mod password;
pub mod student_infos;
pub mod students;
pub mod teachers;
pub mod users;

pub use auth::{AuthResponse, LoginRequest, Session, SessionStore};
pub use error::{ServiceError, ServiceResult};
pub use pagination::{Page, PageRequest, SortDirection};
