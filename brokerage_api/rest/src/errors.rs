use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ApiError;

pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";
pub const NOT_FOUND: &str = "Not found";
pub const INVALID_REQUEST_BODY: &str = "Invalid request body";
pub const INVALID_SUBMISSION: &str = "Please fix the errors in the form";
pub const SUBMISSION_FAILED: &str = "Error sending email";
pub const BLOG_POST_NOT_FOUND: &str = "Blog post not found";

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
}

pub fn error(code: StatusCode, message: &'static str) -> Response {
    (code, Json(ApiError::new(message))).into_response()
}
