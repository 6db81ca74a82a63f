//! Repository trait for user accounts.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{RoleType, User, UserId};

/// Storage operations over every account of the school.
///
/// Admins, deans, vice-deans, teachers and students live in one store and are
/// told apart by [`RoleType`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== User Operations ====================

    /// Insert the user when it has no id yet, otherwise replace the stored one.
    ///
    /// # Returns
    /// * `Ok(User)` - The stored user, with its id assigned
    /// * `Err(RepositoryError::NotFound)` - If an update targets an unknown id
    async fn save_user(&self, user: &User) -> RepositoryResult<User>;

    async fn get_user(&self, id: UserId) -> RepositoryResult<User>;

    /// Fetch several users at once. Fails with `NotFound` on the first
    /// unknown id.
    async fn get_users(&self, ids: &[UserId]) -> RepositoryResult<Vec<User>>;

    async fn find_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;

    /// All users, ordered by id.
    async fn list_users(&self) -> RepositoryResult<Vec<User>>;

    async fn list_users_by_role(&self, role: RoleType) -> RepositoryResult<Vec<User>>;

    /// Users whose name or surname contains `fragment`, case-insensitively.
    async fn search_users_by_name(&self, fragment: &str) -> RepositoryResult<Vec<User>>;

    async fn list_students_by_advisor(&self, advisor: UserId) -> RepositoryResult<Vec<User>>;

    async fn count_users_by_role(&self, role: RoleType) -> RepositoryResult<usize>;

    /// Highest student number handed out so far.
    async fn max_student_number(&self) -> RepositoryResult<Option<u32>>;

    /// Remove a user together with everything that points at it: meetings it
    /// advises, its seat in other meetings, its grading records and the
    /// advisor link of its students.
    async fn delete_user(&self, id: UserId) -> RepositoryResult<()>;
}
