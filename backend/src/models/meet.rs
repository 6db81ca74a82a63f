use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::time::clock_time;
use super::user::UserId;
use crate::scheduling::TimeInterval;

crate::define_id_type!(i64, MeetId);

/// A dated appointment between an advisor teacher and some of their students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meet {
    pub id: Option<MeetId>,
    pub description: String,
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub stop_time: NaiveTime,
    pub advisor_teacher_id: UserId,
    pub student_ids: Vec<UserId>,
}

impl Meet {
    pub fn interval(&self) -> TimeInterval<NaiveDate> {
        TimeInterval::unchecked(self.date, self.start_time, self.stop_time)
    }

    /// Whether `user` takes part, as advisor or as student.
    pub fn involves(&self, user: UserId) -> bool {
        self.advisor_teacher_id == user || self.student_ids.contains(&user)
    }
}
