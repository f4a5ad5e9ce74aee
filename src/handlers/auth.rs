use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::auth::{jwt::create_token, password::verify_password};
use crate::db;
use crate::dto::{LoginRequest, LoginResponse};
use crate::error::{AppError, AppResult};
use crate::handlers::json_body;
use crate::AppState;

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let body = json_body(payload)?;

    let user = db::users::find_by_username(&state.db, body.username.trim())
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&body.password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "Login rejected: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let token = create_token(user.id, &user.username, &state.config)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        username: user.username,
        name: user.name,
        id: user.id,
    }))
}
