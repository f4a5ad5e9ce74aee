use axum::extract::rejection::JsonRejection;
use axum::Json;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub mod advice;
pub mod analytics;
pub mod auth;
pub mod emotion_logs;
pub mod health;
pub mod users;

/// Ids arrive as raw path segments so a malformed one maps to our 400
/// envelope instead of axum's plain-text rejection.
pub fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::MalformedId)
}

/// Unwrap a JSON body, turning syntax and missing-field errors into 400s.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}
