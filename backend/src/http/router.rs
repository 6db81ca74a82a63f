//! Router configuration for the HTTP API.
//!
//! Route paths keep the camelCase segments existing clients already call.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    self, auth, education_terms, lesson_programs, lessons, meets, student_infos, students,
    teachers, users,
};
use super::state::AppState;

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/save/{user_role}", post(users::save_user))
        .route("/getAllUserByPage/{user_role}", get(users::page_users))
        .route("/getUserById/{user_id}", get(users::get_user))
        .route("/delete/{user_id}", delete(users::delete_user))
        .route("/update/{user_id}", put(users::update_user))
        .route("/updateUser", patch(users::update_own_profile))
        .route("/getUserByName", get(users::search_users))
}

fn teacher_routes() -> Router<AppState> {
    Router::new()
        .route("/save", post(teachers::save_teacher))
        .route("/update/{user_id}", put(teachers::update_teacher))
        .route("/getAll", get(teachers::list_teachers))
        .route("/saveAdvisorTeacher/{user_id}", patch(teachers::set_advisor))
        .route(
            "/deleteAdvisorTeacherById/{user_id}",
            delete(teachers::unset_advisor),
        )
        .route("/getAllAdvisorTeacher", get(teachers::list_advisors))
        .route(
            "/getAllStudentByAdvisorTeacher",
            get(teachers::students_of_advisor),
        )
        .route("/addLessonProgram", post(teachers::add_lesson_programs))
}

fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/save", post(students::save_student))
        .route("/update", patch(students::update_own_profile))
        .route("/update/{user_id}", put(students::update_student))
        .route("/getAll", get(students::list_students))
        .route("/changeStatus", get(students::change_status))
        .route(
            "/addLessonProgramToStudent",
            post(students::add_lesson_programs),
        )
}

fn lesson_routes() -> Router<AppState> {
    Router::new()
        .route("/save", post(lessons::save_lesson))
        .route("/delete/{id}", delete(lessons::delete_lesson))
        .route("/getLessonByName", get(lessons::get_lesson_by_name))
        .route("/findLessonByPage", get(lessons::page_lessons))
        .route("/update/{id}", put(lessons::update_lesson))
        .route("/getAllLessonByLessonIds", get(lessons::get_lessons))
}

fn lesson_program_routes() -> Router<AppState> {
    Router::new()
        .route("/save", post(lesson_programs::save_lesson_program))
        .route("/getAll", get(lesson_programs::list_lesson_programs))
        .route("/getById/{id}", get(lesson_programs::get_lesson_program))
        .route("/getAllUnassigned", get(lesson_programs::list_unassigned))
        .route("/getAllAssigned", get(lesson_programs::list_assigned))
        .route(
            "/getAllLessonProgramByUser",
            get(lesson_programs::list_for_user),
        )
        .route(
            "/getAllLessonProgramByTeacherId/{user_id}",
            get(lesson_programs::list_for_teacher),
        )
        .route(
            "/getAllLessonProgramByStudentId/{user_id}",
            get(lesson_programs::list_for_student),
        )
        .route("/delete/{id}", delete(lesson_programs::delete_lesson_program))
        .route(
            "/getAllLessonProgramByPage",
            get(lesson_programs::page_lesson_programs),
        )
}

fn education_term_routes() -> Router<AppState> {
    Router::new()
        .route("/save", post(education_terms::save_education_term))
        .route("/getAll", get(education_terms::list_education_terms))
        .route(
            "/getAllEducationTermsByPage",
            get(education_terms::page_education_terms),
        )
        .route("/delete/{id}", delete(education_terms::delete_education_term))
        .route("/update/{id}", put(education_terms::update_education_term))
        .route("/{id}", get(education_terms::get_education_term))
}

fn meet_routes() -> Router<AppState> {
    Router::new()
        .route("/save", post(meets::save_meet))
        .route("/getAll", get(meets::list_meets))
        .route("/getMeetById/{meet_id}", get(meets::get_meet))
        .route("/delete/{meet_id}", delete(meets::delete_meet))
        .route("/getAllMeetByPage", get(meets::page_meets))
        .route("/update/{meet_id}", put(meets::update_meet))
        .route(
            "/getAllMeetByAdvisorTeacherAsList",
            get(meets::list_for_advisor),
        )
        .route("/getAllMeetByAdvisorAsPage", get(meets::page_for_advisor))
        .route("/getAllMeetByStudent", get(meets::list_for_student))
}

fn student_info_routes() -> Router<AppState> {
    Router::new()
        .route("/save", post(student_infos::save_student_info))
        .route("/delete/{id}", delete(student_infos::delete_student_info))
        .route(
            "/getAllStudentInfoByPage",
            get(student_infos::page_student_infos),
        )
        .route(
            "/getByStudentId/{student_id}",
            get(student_infos::list_by_student),
        )
        .route("/get/{id}", get(student_infos::get_student_info))
        .route("/update/{id}", put(student_infos::update_student_info))
        .route("/getAllForTeacher", get(student_infos::page_for_teacher))
        .route("/getAllForStudent", get(student_infos::page_for_student))
}

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/auth", auth_routes())
        .nest("/user", user_routes())
        .nest("/teacher", teacher_routes())
        .nest("/student", student_routes())
        .nest("/lessons", lesson_routes())
        .nest("/lessonPrograms", lesson_program_routes())
        .nest("/educationTerms", education_term_routes())
        .nest("/meet", meet_routes())
        .nest("/studentInfo", student_info_routes())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::FullRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
        let _router = create_router(AppState::new(repo));
    }
}
