use axum::{extract::State, Extension, Json};
use chrono::{Duration, Utc};

use crate::auth::middleware::AuthUser;
use crate::db::{self, emotion_logs::CreatedRange};
use crate::dto::{AdviceBasis, AdviceResponse, DateRange};
use crate::error::{AppError, AppResult};
use crate::services::advice::{build_prompt, fallback_advice, request_llm_advice};
use crate::AppState;

const ADVICE_WINDOW_DAYS: i64 = 3;

pub async fn get_advice(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<AdviceResponse>> {
    let now = Utc::now();
    let from = now - Duration::days(ADVICE_WINDOW_DAYS);
    let range = CreatedRange {
        start: Some(from),
        end: Some(now),
    };

    let mut logs = db::emotion_logs::list_in_range(&state.db, auth_user.id, range).await?;
    if logs.is_empty() {
        return Err(AppError::NotFound(
            "No recent emotion logs found. Log your emotions to get personalized advice.".into(),
        ));
    }
    logs.reverse();

    let prompt = build_prompt(&logs);
    let (advice, source) = match request_llm_advice(&state.config, &prompt).await {
        Ok(text) => (text, "llm"),
        Err(e) => {
            tracing::warn!(user_id = %auth_user.id, error = %e, "LLM advice unavailable, using fallback");
            (fallback_advice(&logs), "fallback")
        }
    };

    Ok(Json(AdviceResponse {
        advice,
        source: source.into(),
        based_on: AdviceBasis {
            logs_analyzed: logs.len(),
            date_range: DateRange { from, to: now },
        },
    }))
}
