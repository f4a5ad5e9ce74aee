//! Request/response DTOs for the journal API.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Query`    → deserialized from query params
//! - `*Response` → serialized to client JSON
//! - Wire names are camelCase to match the dashboard client

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::emotion_log::EmotionLog;
use crate::validation::{
    validate_activities, validate_display_name, validate_emotion, validate_location,
    validate_people, validate_picture_scheme, validate_sensations, validate_triggers,
    validate_username,
};

// ============================================================================
// Common
// ============================================================================

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn trimmed_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// ============================================================================
// Users & login
// ============================================================================

/// POST /api/users
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 20, message = "Username must be 3-20 characters"),
        custom = "validate_username"
    )]
    pub username: String,

    #[validate(
        length(min = 3, max = 20, message = "Name must be 3-20 characters"),
        custom = "validate_display_name"
    )]
    pub name: String,

    /// Strength is checked separately so the client gets one stable message.
    pub password: String,

    #[validate(
        url(message = "Profile picture must be a valid URL"),
        custom = "validate_picture_scheme"
    )]
    pub profile_picture: Option<String>,

    #[validate(length(max = 200, message = "Bio must be at most 200 characters long"))]
    pub bio: Option<String>,
}

impl RegisterRequest {
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            name: self.name.trim().to_string(),
            password: self.password,
            profile_picture: trimmed(self.profile_picture),
            bio: self.bio,
        }
    }
}

/// PUT /api/users/{id}: omitted fields keep their current value.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 3, max = 20, message = "Username must be 3-20 characters"),
        custom = "validate_username"
    )]
    pub username: Option<String>,

    #[validate(
        length(min = 3, max = 20, message = "Name must be 3-20 characters"),
        custom = "validate_display_name"
    )]
    pub name: Option<String>,

    #[validate(
        url(message = "Profile picture must be a valid URL"),
        custom = "validate_picture_scheme"
    )]
    pub profile_picture: Option<String>,

    #[validate(length(max = 200, message = "Bio must be at most 200 characters long"))]
    pub bio: Option<String>,

    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn normalized(self) -> Self {
        Self {
            username: trimmed(self.username),
            name: trimmed(self.name),
            profile_picture: trimmed(self.profile_picture),
            bio: self.bio,
            password: self.password.filter(|p| !p.is_empty()),
        }
    }
}

/// POST /api/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub name: String,
    pub id: Uuid,
}

// ============================================================================
// Emotion logs
// ============================================================================

/// POST /api/emotionlogs and PUT /api/emotionlogs/{id}
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmotionLogRequest {
    #[validate(custom = "validate_emotion")]
    pub primary_emotion: String,

    #[validate(custom = "validate_emotion")]
    pub secondary_emotion: Option<String>,

    #[validate(range(min = 1, max = 7, message = "Emotion intensity must be between 1 and 7"))]
    pub emotion_intensity: i32,

    #[validate(range(min = 1, max = 24, message = "Emotion duration must be between 1 and 24 hours"))]
    pub emotion_duration: i32,

    #[validate(
        length(min = 1, message = "At least one trigger is required"),
        custom = "validate_triggers"
    )]
    pub triggers: Vec<String>,

    #[serde(default)]
    #[validate(custom = "validate_sensations")]
    pub physical_sensations: Vec<String>,

    #[serde(default)]
    #[validate(custom = "validate_activities")]
    pub daily_activities: Vec<String>,

    #[validate(custom = "validate_location")]
    pub location: String,

    #[serde(default)]
    #[validate(custom = "validate_people")]
    pub people_involved: Vec<String>,

    #[validate(range(min = 1, max = 10, message = "Overall day rating must be between 1 and 10"))]
    pub overall_day_rating: i32,

    pub reflection: Option<String>,
    pub gratitude: Option<String>,
}

impl EmotionLogRequest {
    /// Trim text, drop blank list entries and treat empty optionals as absent.
    /// Run before `validate()`.
    pub fn normalized(self) -> Self {
        Self {
            primary_emotion: self.primary_emotion.trim().to_string(),
            secondary_emotion: trimmed(self.secondary_emotion),
            triggers: trimmed_list(self.triggers),
            physical_sensations: trimmed_list(self.physical_sensations),
            daily_activities: trimmed_list(self.daily_activities),
            location: self.location.trim().to_string(),
            people_involved: trimmed_list(self.people_involved),
            reflection: trimmed(self.reflection),
            gratitude: trimmed(self.gratitude),
            ..self
        }
    }
}

/// GET /api/emotionlogs query params. Numbers arrive as raw strings so
/// garbage falls back to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogListQuery {
    pub limit: Option<String>,
    pub page: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

impl LogListQuery {
    pub fn limit(&self) -> i64 {
        parse_positive(self.limit.as_deref())
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(MAX_PAGE_LIMIT)
    }

    pub fn page(&self) -> i64 {
        parse_positive(self.page.as_deref()).unwrap_or(1)
    }

    /// Rows to skip; saturates instead of overflowing for absurd pages.
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    pub fn start(&self) -> Result<Option<DateTime<Utc>>, String> {
        self.start_date.as_deref().map(parse_date_param).transpose()
    }

    pub fn end(&self) -> Result<Option<DateTime<Utc>>, String> {
        self.end_date.as_deref().map(parse_date_param).transpose()
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse::<i64>().ok().filter(|n| *n > 0)
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_date_param(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("Invalid date: {}", raw))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_logs: i64,
    pub has_more: bool,
    pub limit: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total_logs: i64, returned: usize) -> Self {
        let skip = (page - 1).saturating_mul(limit);
        Self {
            current_page: page,
            total_pages: (total_logs + limit - 1) / limit,
            total_logs,
            has_more: skip.saturating_add(returned as i64) < total_logs,
            limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogListResponse {
    pub logs: Vec<EmotionLog>,
    pub pagination: Pagination,
}

// ============================================================================
// Analytics
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    pub time_range: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Week,
    Month,
}

impl AnalyticsQuery {
    /// "week" or "month"; anything else means the default month.
    pub fn time_range(&self) -> TimeRange {
        match self.time_range.as_deref() {
            Some("week") => TimeRange::Week,
            _ => TimeRange::Month,
        }
    }
}

impl TimeRange {
    /// Start of the window ending at `now`: seven days back, or the same
    /// instant one calendar month earlier.
    pub fn start_from(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeRange::Week => now - chrono::Duration::days(7),
            TimeRange::Month => now
                .checked_sub_months(chrono::Months::new(1))
                .unwrap_or(now - chrono::Duration::days(30)),
        }
    }
}

// ============================================================================
// Advice
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceResponse {
    pub advice: String,
    /// "llm" or "fallback"
    pub source: String,
    pub based_on: AdviceBasis,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceBasis {
    pub logs_analyzed: usize,
    pub date_range: DateRange,
}

#[derive(Debug, Serialize)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

// ============================================================================
// System
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}
