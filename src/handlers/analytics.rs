//! Analytics endpoints. Each one fetches a snapshot of the caller's entries
//! and hands it to the pure reductions in `services::analytics`.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Duration, Utc};

use crate::auth::middleware::AuthUser;
use crate::db::{self, emotion_logs::CreatedRange};
use crate::dto::{AnalyticsQuery, MessageResponse};
use crate::error::{AppError, AppResult};
use crate::services::analytics::{
    compute_activity_analysis, compute_daily_patterns, compute_distribution,
    compute_trigger_analysis, compute_wellness_insights, ActivityAnalysis, DailyPatterns,
    EmotionDistribution, TriggerAnalysis, WellnessInsights,
};
use crate::services::seed;
use crate::AppState;

const PATTERN_WINDOW_DAYS: i64 = 7;

pub async fn distribution(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<Json<EmotionDistribution>> {
    let now = Utc::now();
    let range = CreatedRange {
        start: Some(query.time_range().start_from(now)),
        end: Some(now),
    };
    let logs = db::emotion_logs::list_in_range(&state.db, auth_user.id, range).await?;
    tracing::debug!(user_id = %auth_user.id, records = logs.len(), "Computing emotion distribution");
    Ok(Json(compute_distribution(&logs)))
}

pub async fn triggers(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<TriggerAnalysis>> {
    let logs = db::emotion_logs::list_all(&state.db, auth_user.id).await?;
    Ok(Json(compute_trigger_analysis(&logs)))
}

pub async fn patterns(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<DailyPatterns>> {
    let now = Utc::now();
    let range = CreatedRange {
        start: Some(now - Duration::days(PATTERN_WINDOW_DAYS)),
        end: Some(now),
    };
    let logs = db::emotion_logs::list_in_range(&state.db, auth_user.id, range).await?;
    Ok(Json(compute_daily_patterns(&logs)))
}

pub async fn wellness(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<WellnessInsights>> {
    let logs = db::emotion_logs::list_all(&state.db, auth_user.id).await?;
    Ok(Json(compute_wellness_insights(&logs)))
}

pub async fn activities(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<ActivityAnalysis>> {
    let logs = db::emotion_logs::list_all(&state.db, auth_user.id).await?;
    Ok(Json(compute_activity_analysis(&logs)))
}

/// Replaces the caller's journal with randomized entries. Hidden in
/// production.
pub async fn generate_test_data(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<MessageResponse>> {
    if !state.config.allows_test_data() {
        return Err(AppError::NotFound("Not found".into()));
    }

    let entries = {
        let mut rng = rand::thread_rng();
        seed::generate_entries(Utc::now(), &mut rng)
    };
    let inserted = db::emotion_logs::replace_all(&state.db, auth_user.id, &entries).await?;

    tracing::info!(user_id = %auth_user.id, username = %auth_user.username, inserted, "Generated test emotion logs");
    Ok(Json(MessageResponse {
        message: "Test data generated successfully".into(),
    }))
}
