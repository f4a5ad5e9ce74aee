//! Journal entry storage. Every query is scoped by `user_id`, so an entry
//! owned by someone else behaves exactly like a missing one.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::EmotionLogRequest;
use crate::models::emotion_log::EmotionLog;

/// Optional inclusive bounds on `created_at`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreatedRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    entry: &EmotionLogRequest,
    created_at: DateTime<Utc>,
) -> Result<EmotionLog, sqlx::Error> {
    sqlx::query_as::<_, EmotionLog>(
        r#"
        INSERT INTO emotion_logs (
            id, user_id, primary_emotion, secondary_emotion, emotion_intensity,
            emotion_duration, triggers, physical_sensations, daily_activities,
            location, people_involved, overall_day_rating, reflection, gratitude,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&entry.primary_emotion)
    .bind(&entry.secondary_emotion)
    .bind(entry.emotion_intensity)
    .bind(entry.emotion_duration)
    .bind(&entry.triggers)
    .bind(&entry.physical_sensations)
    .bind(&entry.daily_activities)
    .bind(&entry.location)
    .bind(&entry.people_involved)
    .bind(entry.overall_day_rating)
    .bind(&entry.reflection)
    .bind(&entry.gratitude)
    .bind(created_at)
    .fetch_one(db)
    .await
}

pub async fn find(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<EmotionLog>, sqlx::Error> {
    sqlx::query_as::<_, EmotionLog>("SELECT * FROM emotion_logs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
}

/// One page of entries, newest first.
pub async fn list_page(
    db: &PgPool,
    user_id: Uuid,
    range: CreatedRange,
    limit: i64,
    offset: i64,
) -> Result<Vec<EmotionLog>, sqlx::Error> {
    sqlx::query_as::<_, EmotionLog>(
        r#"
        SELECT * FROM emotion_logs
        WHERE user_id = $1
          AND ($2::timestamptz IS NULL OR created_at >= $2)
          AND ($3::timestamptz IS NULL OR created_at <= $3)
        ORDER BY created_at DESC
        LIMIT $4 OFFSET $5
        "#,
    )
    .bind(user_id)
    .bind(range.start)
    .bind(range.end)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
}

pub async fn count(db: &PgPool, user_id: Uuid, range: CreatedRange) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM emotion_logs
        WHERE user_id = $1
          AND ($2::timestamptz IS NULL OR created_at >= $2)
          AND ($3::timestamptz IS NULL OR created_at <= $3)
        "#,
    )
    .bind(user_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_one(db)
    .await
}

/// Every matching entry, oldest first. This is the snapshot the analytics
/// reductions run over.
pub async fn list_in_range(
    db: &PgPool,
    user_id: Uuid,
    range: CreatedRange,
) -> Result<Vec<EmotionLog>, sqlx::Error> {
    sqlx::query_as::<_, EmotionLog>(
        r#"
        SELECT * FROM emotion_logs
        WHERE user_id = $1
          AND ($2::timestamptz IS NULL OR created_at >= $2)
          AND ($3::timestamptz IS NULL OR created_at <= $3)
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_all(db)
    .await
}

pub async fn list_all(db: &PgPool, user_id: Uuid) -> Result<Vec<EmotionLog>, sqlx::Error> {
    list_in_range(db, user_id, CreatedRange::default()).await
}

/// Replaces every mutable field; owner and `created_at` are kept.
pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    entry: &EmotionLogRequest,
) -> Result<Option<EmotionLog>, sqlx::Error> {
    sqlx::query_as::<_, EmotionLog>(
        r#"
        UPDATE emotion_logs SET
            primary_emotion = $3,
            secondary_emotion = $4,
            emotion_intensity = $5,
            emotion_duration = $6,
            triggers = $7,
            physical_sensations = $8,
            daily_activities = $9,
            location = $10,
            people_involved = $11,
            overall_day_rating = $12,
            reflection = $13,
            gratitude = $14,
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&entry.primary_emotion)
    .bind(&entry.secondary_emotion)
    .bind(entry.emotion_intensity)
    .bind(entry.emotion_duration)
    .bind(&entry.triggers)
    .bind(&entry.physical_sensations)
    .bind(&entry.daily_activities)
    .bind(&entry.location)
    .bind(&entry.people_involved)
    .bind(entry.overall_day_rating)
    .bind(&entry.reflection)
    .bind(&entry.gratitude)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM emotion_logs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Swap all of a user's entries for `entries` in one transaction.
pub async fn replace_all(
    db: &PgPool,
    user_id: Uuid,
    entries: &[(DateTime<Utc>, EmotionLogRequest)],
) -> Result<usize, sqlx::Error> {
    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM emotion_logs WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    for (created_at, entry) in entries {
        sqlx::query(
            r#"
            INSERT INTO emotion_logs (
                id, user_id, primary_emotion, secondary_emotion, emotion_intensity,
                emotion_duration, triggers, physical_sensations, daily_activities,
                location, people_involved, overall_day_rating, reflection, gratitude,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&entry.primary_emotion)
        .bind(&entry.secondary_emotion)
        .bind(entry.emotion_intensity)
        .bind(entry.emotion_duration)
        .bind(&entry.triggers)
        .bind(&entry.physical_sensations)
        .bind(&entry.daily_activities)
        .bind(&entry.location)
        .bind(&entry.people_involved)
        .bind(entry.overall_day_rating)
        .bind(&entry.reflection)
        .bind(&entry.gratitude)
        .bind(*created_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(entries.len())
}
