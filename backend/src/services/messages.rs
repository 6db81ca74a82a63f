//! User-facing success messages returned alongside saved objects.

pub const USER_CREATED: &str = "User is saved";
pub const USER_FOUND: &str = "User is found successfully";
pub const USER_UPDATED: &str = "User is updated successfully";
pub const USER_DELETED: &str = "User is deleted successfully";

pub const TEACHER_SAVED: &str = "Teacher saved successfully";
pub const TEACHER_UPDATED: &str = "Teacher updated successfully";
pub const ADVISOR_TEACHER_SAVED: &str = "Advisor Teacher saved successfully";
pub const ADVISOR_TEACHER_DELETED: &str = "Advisor Teacher deleted successfully";
pub const LESSON_PROGRAM_ADDED_TO_TEACHER: &str = "Lesson Program added to Teacher";

pub const STUDENT_SAVED: &str = "Student saved Successfully";
pub const STUDENT_UPDATED: &str = "Student updated Successfully";
pub const LESSON_PROGRAM_ADDED_TO_STUDENT: &str = "Lesson Program added to Student";

pub const LESSON_SAVED: &str = "Lesson Saved";
pub const LESSON_FOUND: &str = "Lesson is Found";
pub const LESSON_UPDATED: &str = "Lesson is Updated";
pub const LESSON_DELETED: &str = "Lesson is Deleted";

pub const LESSON_PROGRAM_SAVED: &str = "Lesson Program Saved";
pub const LESSON_PROGRAM_DELETED: &str = "Lesson Program is Deleted";

pub const EDUCATION_TERM_SAVED: &str = "Education Term saved";
pub const EDUCATION_TERM_UPDATED: &str = "Education Term updated";
pub const EDUCATION_TERM_DELETED: &str = "Education Term deleted";

pub const MEET_SAVED: &str = "Meet Saved Successfully";
pub const MEET_FOUND: &str = "Meet is Found Successfully";
pub const MEET_UPDATED: &str = "Meet Updated Successfully";
pub const MEET_DELETED: &str = "Meet Deleted Successfully";

pub const STUDENT_INFO_SAVED: &str = "Student Info Saved Successfully";
pub const STUDENT_INFO_UPDATED: &str = "Student Info Updated Successfully";
pub const STUDENT_INFO_DELETED: &str = "Student Info Deleted Successfully";

pub const LOGGED_OUT: &str = "Logged out";
