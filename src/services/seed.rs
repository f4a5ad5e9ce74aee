//! Synthetic journal entries for exercising the dashboard outside
//! production.

use chrono::{DateTime, Duration, Timelike, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::dto::EmotionLogRequest;

const EMOTIONS: &[&str] = &[
    "Happy",
    "Sad",
    "Angry",
    "Anxious",
    "Excited",
    "Fearful",
    "Disgusted",
    "Surprised",
    "Neutral",
];

const TRIGGERS: &[&str] = &[
    "Work Deadline",
    "Family Event",
    "Traffic",
    "Exercise",
    "Social Media",
    "Weather",
    "Sleep Quality",
];

const SENSATIONS: &[&str] = &[
    "Headache",
    "Tight Chest",
    "Fatigue",
    "Sweating",
    "Racing Heart",
    "None",
];

const ACTIVITIES: &[&str] = &[
    "Work",
    "Study",
    "Exercise",
    "Socializing",
    "Leisure",
    "Household Chores",
    "Sleep",
];

const LOCATIONS: &[&str] = &["Home", "Work", "School", "Outside"];

const PEOPLE: &[&str] = &["Family", "Friends", "Coworkers"];

pub const DAYS_BACK: i64 = 90;

fn pick<R: Rng>(rng: &mut R, from: &[&str]) -> String {
    from.choose(rng).copied().unwrap_or_default().to_string()
}

/// 1..=max distinct labels.
fn pick_several<R: Rng>(rng: &mut R, from: &[&str], max: usize) -> Vec<String> {
    let count = rng.gen_range(1..=max.min(from.len()));
    from.choose_multiple(rng, count)
        .map(|s| s.to_string())
        .collect()
}

fn generate_entry<R: Rng>(rng: &mut R) -> EmotionLogRequest {
    let people_count = rng.gen_range(1..=PEOPLE.len());
    EmotionLogRequest {
        primary_emotion: pick(rng, EMOTIONS),
        secondary_emotion: Some(pick(rng, EMOTIONS)),
        emotion_intensity: rng.gen_range(1..=7),
        emotion_duration: rng.gen_range(1..=24),
        triggers: pick_several(rng, TRIGGERS, 3),
        physical_sensations: pick_several(rng, SENSATIONS, 3),
        daily_activities: pick_several(rng, ACTIVITIES, 3),
        location: pick(rng, LOCATIONS),
        people_involved: PEOPLE[..people_count].iter().map(|s| s.to_string()).collect(),
        overall_day_rating: rng.gen_range(1..=10),
        reflection: Some("Test reflection".into()),
        gratitude: Some("Test gratitude".into()),
    }
}

/// One to three entries for each of the last `DAYS_BACK` days and today,
/// at random hours, never later than `now`. Oldest first.
pub fn generate_entries<R: Rng>(
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<(DateTime<Utc>, EmotionLogRequest)> {
    let mut entries = Vec::new();
    for days_ago in (0..=DAYS_BACK).rev() {
        let day = now - Duration::days(days_ago);
        let per_day = rng.gen_range(1..=3);
        for _ in 0..per_day {
            let hour = rng.gen_range(0..24);
            let created_at = day
                .with_hour(hour)
                .unwrap_or(day)
                .min(now);
            entries.push((created_at, generate_entry(rng)));
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::{rngs::StdRng, SeedableRng};
    use validator::Validate;

    #[test]
    fn test_generated_entries_pass_validation() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 8, 0, 0).unwrap();
        for (_, entry) in generate_entries(now, &mut rng) {
            assert!(entry.validate().is_ok(), "invalid generated entry: {:?}", entry);
        }
    }

    #[test]
    fn test_generated_entry_counts_and_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 8, 0, 0).unwrap();
        let entries = generate_entries(now, &mut rng);

        let days = (DAYS_BACK + 1) as usize;
        assert!(entries.len() >= days);
        assert!(entries.len() <= days * 3);

        let oldest = now - Duration::days(DAYS_BACK + 1);
        for (created_at, _) in &entries {
            assert!(*created_at <= now);
            assert!(*created_at > oldest);
        }
    }

    #[test]
    fn test_multi_pick_has_no_duplicates() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let picked = pick_several(&mut rng, TRIGGERS, 3);
            assert!(!picked.is_empty() && picked.len() <= 3);
            let mut deduped = picked.clone();
            deduped.sort();
            deduped.dedup();
            assert_eq!(deduped.len(), picked.len());
        }
    }
}
