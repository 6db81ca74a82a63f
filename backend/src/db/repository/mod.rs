//! Repository trait definitions.
//!
//! Storage is split into focused traits, one per aggregate:
//!
//! - [`user`]: accounts of every role
//! - [`catalog`]: lessons, lesson programs and education terms
//! - [`meet`]: advisor meetings
//! - [`student_info`]: grading records
//! - [`locking`]: per-subject locks held across conflict check and commit
//!
//! Services take the composite [`FullRepository`] bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> ServiceResult<()> {
//!     let _lock = repo.lock_subjects(&[teacher_id]).await;
//!     let programs = repo.list_lesson_programs().await?;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod locking;
pub mod meet;
pub mod student_info;
pub mod user;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use catalog::CatalogRepository;
pub use locking::{ScheduleLock, ScheduleLocking, SubjectLocks};
pub use meet::MeetRepository;
pub use student_info::StudentInfoRepository;
pub use user::UserRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type implementing every repository trait.
pub trait FullRepository:
    UserRepository + CatalogRepository + MeetRepository + StudentInfoRepository + ScheduleLocking
{
}

impl<T> FullRepository for T where
    T: UserRepository
        + CatalogRepository
        + MeetRepository
        + StudentInfoRepository
        + ScheduleLocking
{
}
