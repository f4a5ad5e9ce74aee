use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{middleware::AuthUser, password::hash_password};
use crate::db::{
    self,
    users::{NewUser, UserChanges},
};
use crate::dto::{RegisterRequest, UpdateUserRequest};
use crate::error::{AppError, AppResult};
use crate::handlers::{json_body, parse_id};
use crate::models::user::{User, DEFAULT_PROFILE_PICTURE};
use crate::validation::{is_strong_password, WEAK_PASSWORD_MESSAGE};
use crate::AppState;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<User>)> {
    let body = json_body(payload)?.normalized();

    if !is_strong_password(&body.password) {
        return Err(AppError::Validation(WEAK_PASSWORD_MESSAGE.into()));
    }
    body.validate()?;

    if db::users::username_taken(&state.db, &body.username, None).await? {
        return Err(AppError::Conflict("Username already taken".into()));
    }

    let password_hash = hash_password(&body.password)?;
    let user = db::users::insert(
        &state.db,
        &NewUser {
            username: &body.username,
            name: &body.name,
            password_hash: &password_hash,
            profile_picture: body
                .profile_picture
                .as_deref()
                .unwrap_or(DEFAULT_PROFILE_PICTURE),
            bio: body.bio.as_deref(),
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Profiles are private: only the account owner may act on one.
fn own_account(auth_user: &AuthUser, raw_id: &str) -> AppResult<Uuid> {
    let id = parse_id(raw_id)?;
    if id != auth_user.id {
        return Err(AppError::Forbidden);
    }
    Ok(id)
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<User>> {
    let id = own_account(&auth_user, &raw_id)?;
    let user = db::users::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;
    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> AppResult<Json<User>> {
    let id = own_account(&auth_user, &raw_id)?;
    let body = json_body(payload)?.normalized();

    if let Some(password) = &body.password {
        if !is_strong_password(password) {
            return Err(AppError::Validation(WEAK_PASSWORD_MESSAGE.into()));
        }
    }
    body.validate()?;

    if let Some(username) = &body.username {
        if db::users::username_taken(&state.db, username, Some(id)).await? {
            return Err(AppError::Conflict("Username already taken".into()));
        }
    }

    let password_hash = body.password.as_deref().map(hash_password).transpose()?;
    let user = db::users::update(
        &state.db,
        id,
        &UserChanges {
            username: body.username.as_deref(),
            name: body.name.as_deref(),
            password_hash: password_hash.as_deref(),
            profile_picture: body.profile_picture.as_deref(),
            bio: body.bio.as_deref(),
        },
    )
    .await?
    .ok_or(AppError::NotFound("User not found".into()))?;

    tracing::info!(user_id = %user.id, password_changed = password_hash.is_some(), "User updated");
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(raw_id): Path<String>,
) -> AppResult<StatusCode> {
    let id = own_account(&auth_user, &raw_id)?;
    if !db::users::delete(&state.db, id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    tracing::info!(user_id = %id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_user() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            username: "alice".into(),
        }
    }

    #[test]
    fn test_own_account_allows_self() {
        let user = auth_user();
        assert_eq!(own_account(&user, &user.id.to_string()).unwrap(), user.id);
    }

    #[test]
    fn test_own_account_rejects_others() {
        let user = auth_user();
        let other = Uuid::new_v4().to_string();
        assert!(matches!(own_account(&user, &other), Err(AppError::Forbidden)));
    }

    #[test]
    fn test_own_account_rejects_malformed_id() {
        assert!(matches!(
            own_account(&auth_user(), "not-a-uuid"),
            Err(AppError::MalformedId)
        ));
    }
}
