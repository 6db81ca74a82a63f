use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::term::EducationTermId;
use super::time::{clock_time, Day};
use crate::scheduling::TimeInterval;

crate::define_id_type!(i64, LessonId);
crate::define_id_type!(i64, LessonProgramId);

/// A course in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Option<LessonId>,
    pub lesson_name: String,
    pub credit_score: u32,
    pub is_compulsory: bool,
}

/// A weekly slot in which one or more lessons are taught during a term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonProgram {
    pub id: Option<LessonProgramId>,
    pub day: Day,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub stop_time: NaiveTime,
    pub lesson_ids: BTreeSet<LessonId>,
    pub education_term_id: EducationTermId,
}

impl LessonProgram {
    /// The recurring slot this program occupies.
    pub fn interval(&self) -> TimeInterval<Day> {
        TimeInterval::unchecked(self.day, self.start_time, self.stop_time)
    }
}
