use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One journal entry as stored. Field names on the wire are camelCase; the
/// owner is exposed as `user`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmotionLog {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub primary_emotion: String,
    pub secondary_emotion: Option<String>,
    pub emotion_intensity: i32,
    pub emotion_duration: i32,
    pub triggers: Vec<String>,
    pub physical_sensations: Vec<String>,
    pub daily_activities: Vec<String>,
    pub location: String,
    pub people_involved: Vec<String>,
    pub overall_day_rating: i32,
    pub reflection: Option<String>,
    pub gratitude: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
impl EmotionLog {
    /// Minimal well-formed record for aggregation tests.
    pub fn fixture(primary_emotion: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            primary_emotion: primary_emotion.to_string(),
            secondary_emotion: None,
            emotion_intensity: 4,
            emotion_duration: 2,
            triggers: vec!["Work".into()],
            physical_sensations: vec![],
            daily_activities: vec![],
            location: "Home".into(),
            people_involved: vec![],
            overall_day_rating: 5,
            reflection: None,
            gratitude: None,
            created_at,
            updated_at: created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case_with_user_key() {
        let log = EmotionLog::fixture("Happy", Utc::now());
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["primaryEmotion"], "Happy");
        assert_eq!(json["overallDayRating"], 5);
        assert!(json.get("user").is_some());
        assert!(json.get("user_id").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
