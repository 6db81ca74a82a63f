//! Repository trait for advisor meetings.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Meet, MeetId, UserId};

#[async_trait]
pub trait MeetRepository: Send + Sync {
    async fn save_meet(&self, meet: &Meet) -> RepositoryResult<Meet>;

    async fn get_meet(&self, id: MeetId) -> RepositoryResult<Meet>;

    async fn list_meets(&self) -> RepositoryResult<Vec<Meet>>;

    /// Meetings the teacher runs as advisor.
    async fn list_meets_by_advisor(&self, advisor: UserId) -> RepositoryResult<Vec<Meet>>;

    /// Meetings the student attends.
    async fn list_meets_by_student(&self, student: UserId) -> RepositoryResult<Vec<Meet>>;

    async fn delete_meet(&self, id: MeetId) -> RepositoryResult<()>;
}
