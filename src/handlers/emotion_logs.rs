use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::db::{self, emotion_logs::CreatedRange};
use crate::dto::{EmotionLogRequest, LogListQuery, LogListResponse, Pagination};
use crate::error::{AppError, AppResult};
use crate::handlers::{json_body, parse_id};
use crate::models::emotion_log::EmotionLog;
use crate::AppState;

fn log_not_found() -> AppError {
    AppError::NotFound("Emotion log not found".into())
}

fn validated_entry(payload: Result<Json<EmotionLogRequest>, JsonRejection>) -> AppResult<EmotionLogRequest> {
    let entry = json_body(payload)?.normalized();
    entry.validate()?;
    Ok(entry)
}

pub async fn list_logs(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<LogListQuery>,
) -> AppResult<Json<LogListResponse>> {
    let range = CreatedRange {
        start: query.start().map_err(AppError::Validation)?,
        end: query.end().map_err(AppError::Validation)?,
    };
    let limit = query.limit();
    let page = query.page();

    let total = db::emotion_logs::count(&state.db, auth_user.id, range).await?;
    let logs =
        db::emotion_logs::list_page(&state.db, auth_user.id, range, limit, query.offset()).await?;

    let pagination = Pagination::new(page, limit, total, logs.len());
    Ok(Json(LogListResponse { logs, pagination }))
}

pub async fn get_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<EmotionLog>> {
    let id = parse_id(&raw_id)?;
    let log = db::emotion_logs::find(&state.db, auth_user.id, id)
        .await?
        .ok_or_else(log_not_found)?;
    Ok(Json(log))
}

pub async fn create_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<EmotionLogRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<EmotionLog>)> {
    let entry = validated_entry(payload)?;
    let log = db::emotion_logs::insert(&state.db, auth_user.id, &entry, Utc::now()).await?;

    tracing::info!(user_id = %auth_user.id, log_id = %log.id, emotion = %log.primary_emotion, "Emotion log created");
    Ok((StatusCode::CREATED, Json(log)))
}

pub async fn update_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(raw_id): Path<String>,
    payload: Result<Json<EmotionLogRequest>, JsonRejection>,
) -> AppResult<Json<EmotionLog>> {
    let id = parse_id(&raw_id)?;
    let entry = validated_entry(payload)?;
    let log = db::emotion_logs::update(&state.db, auth_user.id, id, &entry)
        .await?
        .ok_or_else(log_not_found)?;

    tracing::info!(user_id = %auth_user.id, log_id = %log.id, "Emotion log updated");
    Ok(Json(log))
}

pub async fn delete_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(raw_id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&raw_id)?;
    if !db::emotion_logs::delete(&state.db, auth_user.id, id).await? {
        return Err(log_not_found());
    }
    tracing::info!(user_id = %auth_user.id, log_id = %id, "Emotion log deleted");
    Ok(StatusCode::NO_CONTENT)
}
