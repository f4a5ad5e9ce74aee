//! # Journal analytics
//!
//! Pure reductions over a user's journal entries. Every function takes the
//! already-fetched records for one user and returns a serializable summary;
//! nothing here touches the database or mutates its input, and an empty
//! slice always produces empty maps.
//!
//! Maps are `BTreeMap` so the JSON output has a stable key order.
//! Repeated labels inside a single entry are counted as given.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Local, TimeZone, Utc, Weekday};
use serde::Serialize;

use crate::models::emotion_log::EmotionLog;

pub type Counts = BTreeMap<String, u32>;
pub type CountMatrix = BTreeMap<String, Counts>;

fn bump(counts: &mut Counts, key: &str) {
    *counts.entry(key.to_string()).or_insert(0) += 1;
}

fn bump_pair(matrix: &mut CountMatrix, outer: &str, inner: &str) {
    bump(matrix.entry(outer.to_string()).or_default(), inner);
}

/// Running sum/count pair; only ever read after at least one `add`.
#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    total: i64,
    count: u32,
}

impl Mean {
    fn add(&mut self, value: i32) {
        self.total += i64::from(value);
        self.count += 1;
    }

    fn value(self) -> f64 {
        self.total as f64 / f64::from(self.count)
    }
}

fn averages(buckets: BTreeMap<String, Mean>) -> BTreeMap<String, f64> {
    buckets
        .into_iter()
        .map(|(key, mean)| (key, mean.value()))
        .collect()
}

// ── Distribution ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub date: DateTime<Utc>,
    pub intensity: i32,
    pub emotion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmotionDistribution {
    pub distribution: Counts,
    pub timeline: Vec<TimelinePoint>,
}

/// Primary-emotion counts plus one intensity point per entry, in input order.
pub fn compute_distribution(records: &[EmotionLog]) -> EmotionDistribution {
    let mut result = EmotionDistribution::default();
    for record in records {
        bump(&mut result.distribution, &record.primary_emotion);
        result.timeline.push(TimelinePoint {
            date: record.created_at,
            intensity: record.emotion_intensity,
            emotion: record.primary_emotion.clone(),
        });
    }
    result
}

// ── Triggers ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerAnalysis {
    pub common_triggers: Counts,
    pub trigger_emotion_correlation: CountMatrix,
}

pub fn compute_trigger_analysis(records: &[EmotionLog]) -> TriggerAnalysis {
    let mut result = TriggerAnalysis::default();
    for record in records {
        for trigger in &record.triggers {
            bump(&mut result.common_triggers, trigger);
            bump_pair(
                &mut result.trigger_emotion_correlation,
                trigger,
                &record.primary_emotion,
            );
        }
    }
    result
}

// ── Daily patterns ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPatterns {
    pub daily_patterns: BTreeMap<String, f64>,
    pub activity_impact: BTreeMap<String, f64>,
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Average day rating per weekday and per activity, with weekdays taken
/// from the server's local calendar.
pub fn compute_daily_patterns(records: &[EmotionLog]) -> DailyPatterns {
    compute_daily_patterns_in(records, &Local)
}

/// Same as [`compute_daily_patterns`] with an explicit calendar.
pub fn compute_daily_patterns_in<Tz: TimeZone>(records: &[EmotionLog], tz: &Tz) -> DailyPatterns {
    let mut by_day: BTreeMap<String, Mean> = BTreeMap::new();
    let mut by_activity: BTreeMap<String, Mean> = BTreeMap::new();

    for record in records {
        let weekday = record.created_at.with_timezone(tz).weekday();
        by_day
            .entry(weekday_name(weekday).to_string())
            .or_default()
            .add(record.overall_day_rating);

        for activity in &record.daily_activities {
            by_activity
                .entry(activity.clone())
                .or_default()
                .add(record.overall_day_rating);
        }
    }

    DailyPatterns {
        daily_patterns: averages(by_day),
        activity_impact: averages(by_activity),
    }
}

// ── Wellness ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensationInsights {
    pub frequency: Counts,
    pub emotion_correlation: CountMatrix,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessInsights {
    pub physical_sensations: SensationInsights,
    pub location_impact: CountMatrix,
}

pub fn compute_wellness_insights(records: &[EmotionLog]) -> WellnessInsights {
    let mut result = WellnessInsights::default();
    for record in records {
        for sensation in &record.physical_sensations {
            bump(&mut result.physical_sensations.frequency, sensation);
            bump_pair(
                &mut result.physical_sensations.emotion_correlation,
                sensation,
                &record.primary_emotion,
            );
        }
        bump_pair(
            &mut result.location_impact,
            &record.location,
            &record.primary_emotion,
        );
    }
    result
}

// ── Activities ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub average_mood_rating: f64,
    pub average_intensity: f64,
    pub total_occurrences: u32,
    pub emotion_distribution: Counts,
}

pub type ActivityAnalysis = BTreeMap<String, ActivityStats>;

#[derive(Default)]
struct ActivityAccumulator {
    mood: Mean,
    intensity: Mean,
    emotions: Counts,
}

/// Per-activity mood and intensity averages with the emotions seen
/// alongside each activity.
pub fn compute_activity_analysis(records: &[EmotionLog]) -> ActivityAnalysis {
    let mut acc: BTreeMap<String, ActivityAccumulator> = BTreeMap::new();
    for record in records {
        for activity in &record.daily_activities {
            let entry = acc.entry(activity.clone()).or_default();
            entry.mood.add(record.overall_day_rating);
            entry.intensity.add(record.emotion_intensity);
            bump(&mut entry.emotions, &record.primary_emotion);
        }
    }

    acc.into_iter()
        .map(|(activity, a)| {
            let stats = ActivityStats {
                average_mood_rating: a.mood.value(),
                average_intensity: a.intensity.value(),
                total_occurrences: a.mood.count,
                emotion_distribution: a.emotions,
            };
            (activity, stats)
        })
        .collect()
}
