use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::User;

pub struct NewUser<'a> {
    pub username: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub profile_picture: &'a str,
    pub bio: Option<&'a str>,
}

/// Partial profile update; `None` keeps the stored value.
#[derive(Default)]
pub struct UserChanges<'a> {
    pub username: Option<&'a str>,
    pub name: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub profile_picture: Option<&'a str>,
    pub bio: Option<&'a str>,
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_by_username(db: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(db)
        .await
}

/// Whether `username` belongs to anyone other than `except`.
pub async fn username_taken(
    db: &PgPool,
    username: &str,
    except: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE username = $1 AND ($2::uuid IS NULL OR id <> $2)",
    )
    .bind(username)
    .bind(except)
    .fetch_one(db)
    .await?;
    Ok(count > 0)
}

pub async fn insert(db: &PgPool, user: &NewUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, name, password_hash, profile_picture, bio)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.username)
    .bind(user.name)
    .bind(user.password_hash)
    .bind(user.profile_picture)
    .bind(user.bio)
    .fetch_one(db)
    .await
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    changes: &UserChanges<'_>,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            username = COALESCE($2, username),
            name = COALESCE($3, name),
            password_hash = COALESCE($4, password_hash),
            profile_picture = COALESCE($5, profile_picture),
            bio = COALESCE($6, bio),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(changes.username)
    .bind(changes.name)
    .bind(changes.password_hash)
    .bind(changes.profile_picture)
    .bind(changes.bio)
    .fetch_optional(db)
    .await
}

/// Removes the user; their journal entries go with them.
pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
