//! Repository trait for the course catalog: lessons, weekly lesson programs
//! and the education terms they belong to.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{
    EducationTerm, EducationTermId, Lesson, LessonId, LessonProgram, LessonProgramId,
};

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // ==================== Lessons ====================

    async fn save_lesson(&self, lesson: &Lesson) -> RepositoryResult<Lesson>;

    async fn get_lesson(&self, id: LessonId) -> RepositoryResult<Lesson>;

    /// Fetch several lessons. Fails with `NotFound` on the first unknown id.
    async fn get_lessons(&self, ids: &[LessonId]) -> RepositoryResult<Vec<Lesson>>;

    /// Case-insensitive lookup by name.
    async fn find_lesson_by_name(&self, name: &str) -> RepositoryResult<Option<Lesson>>;

    async fn list_lessons(&self) -> RepositoryResult<Vec<Lesson>>;

    /// Delete a lesson and drop it from every lesson program.
    async fn delete_lesson(&self, id: LessonId) -> RepositoryResult<()>;

    // ==================== Lesson Programs ====================

    async fn save_lesson_program(&self, program: &LessonProgram) -> RepositoryResult<LessonProgram>;

    async fn get_lesson_program(&self, id: LessonProgramId) -> RepositoryResult<LessonProgram>;

    /// Fetch several programs. Fails with `NotFound` on the first unknown id.
    async fn get_lesson_programs(&self, ids: &[LessonProgramId]) -> RepositoryResult<Vec<LessonProgram>>;

    async fn list_lesson_programs(&self) -> RepositoryResult<Vec<LessonProgram>>;

    /// Delete a program and drop it from every user's schedule.
    async fn delete_lesson_program(&self, id: LessonProgramId) -> RepositoryResult<()>;

    // ==================== Education Terms ====================

    async fn save_education_term(&self, term: &EducationTerm) -> RepositoryResult<EducationTerm>;

    async fn get_education_term(&self, id: EducationTermId) -> RepositoryResult<EducationTerm>;

    async fn list_education_terms(&self) -> RepositoryResult<Vec<EducationTerm>>;

    /// Delete a term together with its lesson programs.
    async fn delete_education_term(&self, id: EducationTermId) -> RepositoryResult<()>;
}
