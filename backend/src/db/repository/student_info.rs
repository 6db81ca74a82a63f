//! Repository trait for grading records.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{StudentInfo, StudentInfoId, UserId};

#[async_trait]
pub trait StudentInfoRepository: Send + Sync {
    async fn save_student_info(&self, info: &StudentInfo) -> RepositoryResult<StudentInfo>;

    async fn get_student_info(&self, id: StudentInfoId) -> RepositoryResult<StudentInfo>;

    async fn list_student_infos(&self) -> RepositoryResult<Vec<StudentInfo>>;

    async fn list_student_infos_by_student(&self, student: UserId) -> RepositoryResult<Vec<StudentInfo>>;

    async fn list_student_infos_by_teacher(&self, teacher: UserId) -> RepositoryResult<Vec<StudentInfo>>;

    async fn delete_student_info(&self, id: StudentInfoId) -> RepositoryResult<()>;
}
