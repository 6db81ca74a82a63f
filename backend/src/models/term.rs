use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::scheduling::TimeSpan;

crate::define_id_type!(i64, EducationTermId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Term {
    FallSemester,
    SpringSemester,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationTerm {
    pub id: Option<EducationTermId>,
    pub term: Term,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub last_registration_date: NaiveDate,
}

impl EducationTerm {
    /// Calendar year the term belongs to (the year it starts in).
    pub fn year(&self) -> i32 {
        self.start_date.year()
    }

    pub fn span(&self) -> TimeSpan<NaiveDate> {
        TimeSpan::new(self.start_date, self.end_date)
    }
}
