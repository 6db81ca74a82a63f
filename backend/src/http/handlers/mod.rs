//! HTTP handlers for the REST API.
//!
//! Each handler authenticates the caller, checks the route's role allow-list
//! and delegates to the service layer.

pub mod auth;
pub mod education_terms;
pub mod lesson_programs;
pub mod lessons;
pub mod meets;
pub mod student_infos;
pub mod students;
pub mod teachers;
pub mod users;

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{HealthResponse, ResponseMessage};
use super::error::AppError;
use super::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Result type for handlers that create something.
pub type CreatedResult<T> = Result<(StatusCode, Json<ResponseMessage<T>>), AppError>;

pub(crate) fn created<T>(message: &str, object: T) -> CreatedResult<T> {
    Ok((
        StatusCode::CREATED,
        Json(ResponseMessage::created(message, object)),
    ))
}

pub(crate) fn ok<T>(message: &str, object: T) -> HandlerResult<ResponseMessage<T>> {
    Ok(Json(ResponseMessage::ok(message, object)))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}
