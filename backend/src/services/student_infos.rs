//! Grading records: exam scores, absences and the derived letter grade.

use std::cmp::Ordering;

use log::info;
use serde::Deserialize;

use super::checks::require_role;
use super::error::{ServiceError, ServiceResult};
use super::pagination::{cmp_f64, paginate, Page, PageRequest, Sortable};
use crate::config::GradingConfig;
use crate::db::repository::FullRepository;
use crate::models::{
    EducationTermId, Lesson, LessonId, Note, RoleType, StudentInfo, StudentInfoId, User, UserId,
};

/// Highest score either exam accepts.
pub const MAX_EXAM_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Deserialize)]
pub struct StudentInfoRequest {
    pub student_id: UserId,
    #[serde(flatten)]
    pub grades: GradesRequest,
}

/// Everything except the student, which never changes on update.
#[derive(Debug, Clone, Deserialize)]
pub struct GradesRequest {
    pub midterm_exam: f64,
    pub final_exam: f64,
    pub absentee: u32,
    #[serde(default)]
    pub info_note: String,
    pub lesson_id: LessonId,
    pub education_term_id: EducationTermId,
}

impl GradesRequest {
    pub fn validate(&self) -> ServiceResult<()> {
        for (name, score) in [("Midterm exam", self.midterm_exam), ("Final exam", self.final_exam)] {
            if !(0.0..=MAX_EXAM_SCORE).contains(&score) {
                return Err(ServiceError::bad_request(format!(
                    "{} must be between 0 and {}, got {}",
                    name, MAX_EXAM_SCORE, score
                )));
            }
        }
        Ok(())
    }

    fn apply_to(&self, info: &mut StudentInfo, grading: &GradingConfig) {
        info.midterm_exam = self.midterm_exam;
        info.final_exam = self.final_exam;
        info.absentee = self.absentee;
        info.info_note = self.info_note.clone();
        info.lesson_id = self.lesson_id;
        info.education_term_id = self.education_term_id;
        info.exam_average = grading.average(self.midterm_exam, self.final_exam);
        info.letter_grade = Note::from_average(info.exam_average);
    }
}

impl Sortable for StudentInfo {
    const SORT_FIELDS: &'static [&'static str] =
        &["id", "exam_average", "absentee", "midterm_exam", "final_exam"];

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "exam_average" => cmp_f64(self.exam_average, other.exam_average),
            "absentee" => self.absentee.cmp(&other.absentee),
            "midterm_exam" => cmp_f64(self.midterm_exam, other.midterm_exam),
            "final_exam" => cmp_f64(self.final_exam, other.final_exam),
            _ => self.id.cmp(&other.id),
        }
    }
}

/// A student holds at most one record per lesson name. `exclude` is the
/// record being updated.
async fn ensure_lesson_not_graded<R: FullRepository + ?Sized>(
    repo: &R,
    student: UserId,
    lesson: &Lesson,
    exclude: Option<StudentInfoId>,
) -> ServiceResult<()> {
    let infos = repo.list_student_infos_by_student(student).await?;
    let lesson_ids: Vec<LessonId> = infos
        .iter()
        .filter(|i| exclude.is_none() || i.id != exclude)
        .map(|i| i.lesson_id)
        .collect();
    let graded = repo.get_lessons(&lesson_ids).await?;
    if graded
        .iter()
        .any(|l| l.lesson_name.eq_ignore_ascii_case(&lesson.lesson_name))
    {
        return Err(ServiceError::conflict(format!(
            "Student with id {} already has a record for lesson {}",
            student, lesson.lesson_name
        )));
    }
    Ok(())
}

/// A teacher records grades for a student.
pub async fn save_student_info<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    grading: &GradingConfig,
    request: &StudentInfoRequest,
) -> ServiceResult<StudentInfo> {
    require_role(actor, RoleType::Teacher)?;
    request.grades.validate()?;
    let student = repo.get_user(request.student_id).await?;
    require_role(&student, RoleType::Student)?;
    let lesson = repo.get_lesson(request.grades.lesson_id).await?;
    repo.get_education_term(request.grades.education_term_id).await?;
    ensure_lesson_not_graded(repo, request.student_id, &lesson, None).await?;

    let mut info = StudentInfo {
        id: None,
        absentee: 0,
        midterm_exam: 0.0,
        final_exam: 0.0,
        exam_average: 0.0,
        info_note: String::new(),
        letter_grade: Note::FF,
        teacher_id: actor.user_id(),
        student_id: request.student_id,
        lesson_id: request.grades.lesson_id,
        education_term_id: request.grades.education_term_id,
    };
    request.grades.apply_to(&mut info, grading);

    let saved = repo.save_student_info(&info).await?;
    info!(
        "Recorded {} ({:.2}) in '{}' for student {}",
        saved.letter_grade, saved.exam_average, lesson.lesson_name, saved.student_id
    );
    Ok(saved)
}

/// Regrade a record. A change of lesson is checked against the student's
/// other records.
pub async fn update_student_info<R: FullRepository + ?Sized>(
    repo: &R,
    grading: &GradingConfig,
    id: StudentInfoId,
    request: &GradesRequest,
) -> ServiceResult<StudentInfo> {
    let mut info = repo.get_student_info(id).await?;
    request.validate()?;
    let lesson = repo.get_lesson(request.lesson_id).await?;
    repo.get_education_term(request.education_term_id).await?;
    if info.lesson_id != request.lesson_id {
        ensure_lesson_not_graded(repo, info.student_id, &lesson, info.id).await?;
    }

    request.apply_to(&mut info, grading);
    Ok(repo.save_student_info(&info).await?)
}

pub async fn delete_student_info<R: FullRepository + ?Sized>(
    repo: &R,
    id: StudentInfoId,
) -> ServiceResult<()> {
    repo.delete_student_info(id).await?;
    info!("Deleted student info {}", id);
    Ok(())
}

pub async fn get_student_info<R: FullRepository + ?Sized>(
    repo: &R,
    id: StudentInfoId,
) -> ServiceResult<StudentInfo> {
    Ok(repo.get_student_info(id).await?)
}

pub async fn page_student_infos<R: FullRepository + ?Sized>(
    repo: &R,
    page: &PageRequest,
) -> ServiceResult<Page<StudentInfo>> {
    paginate(repo.list_student_infos().await?, page, "id")
}

pub async fn list_by_student<R: FullRepository + ?Sized>(
    repo: &R,
    student: UserId,
) -> ServiceResult<Vec<StudentInfo>> {
    let infos = repo.list_student_infos_by_student(student).await?;
    if infos.is_empty() {
        return Err(ServiceError::not_found(format!(
            "Student info not found for student with id {}",
            student
        )));
    }
    Ok(infos)
}

/// Records written by the signed-in teacher.
pub async fn page_for_teacher<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    page: &PageRequest,
) -> ServiceResult<Page<StudentInfo>> {
    require_role(actor, RoleType::Teacher)?;
    let infos = repo.list_student_infos_by_teacher(actor.user_id()).await?;
    paginate(infos, page, "id")
}

/// Records of the signed-in student.
pub async fn page_for_student<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    page: &PageRequest,
) -> ServiceResult<Page<StudentInfo>> {
    require_role(actor, RoleType::Student)?;
    let infos = repo.list_student_infos_by_student(actor.user_id()).await?;
    paginate(infos, page, "id")
}
