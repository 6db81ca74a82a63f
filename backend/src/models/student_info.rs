use std::fmt;

use serde::{Deserialize, Serialize};

use super::lesson::LessonId;
use super::term::EducationTermId;
use super::user::UserId;

crate::define_id_type!(i64, StudentInfoId);

/// Letter grade derived from the weighted exam average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    AA,
    BA,
    BB,
    CB,
    CC,
    DD,
    FF,
}

impl Note {
    /// Grade bands: below 50 fails, then steps at 60, 65, 70, 75 and 80.
    pub fn from_average(average: f64) -> Self {
        if average < 50.0 {
            Note::FF
        } else if average < 60.0 {
            Note::DD
        } else if average < 65.0 {
            Note::CC
        } else if average < 70.0 {
            Note::CB
        } else if average < 75.0 {
            Note::BB
        } else if average < 80.0 {
            Note::BA
        } else {
            Note::AA
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A student's grading record for one lesson in one term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentInfo {
    pub id: Option<StudentInfoId>,
    pub absentee: u32,
    pub midterm_exam: f64,
    pub final_exam: f64,
    pub exam_average: f64,
    pub info_note: String,
    pub letter_grade: Note,
    pub teacher_id: UserId,
    pub student_id: UserId,
    pub lesson_id: LessonId,
    pub education_term_id: EducationTermId,
}

#[cfg(test)]
mod tests {
    use super::Note;

    #[test]
    fn test_grade_band_edges() {
        assert_eq!(Note::from_average(49.99), Note::FF);
        assert_eq!(Note::from_average(50.0), Note::DD);
        assert_eq!(Note::from_average(60.0), Note::CC);
        assert_eq!(Note::from_average(65.0), Note::CB);
        assert_eq!(Note::from_average(70.0), Note::BB);
        assert_eq!(Note::from_average(75.0), Note::BA);
        assert_eq!(Note::from_average(80.0), Note::AA);
        assert_eq!(Note::from_average(100.0), Note::AA);
    }
}
