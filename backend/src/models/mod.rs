pub mod lesson;
pub mod macros;
pub mod meet;
pub mod student_info;
pub mod term;
pub mod time;
pub mod user;

pub use lesson::*;
pub use meet::*;
pub use student_info::*;
pub use term::*;
pub use time::*;
pub use user::*;
