//! Field rules for journal entries and user profiles.
//!
//! Most free-text fields accept either a label from a predefined set or any
//! text matching a character class. Each rule is a [`FieldRule`]; the
//! `validate_*` functions adapt them to `validator`'s `custom` hook.

use std::borrow::Cow;

use validator::ValidationError;

pub const EMOTIONS: &[&str] = &[
    "Happy",
    "Sad",
    "Angry",
    "Anxious",
    "Excited",
    "Fearful",
    "Disgusted",
    "Surprised",
    "Neutral",
    "Frustrated",
    "Lonely",
    "Content",
    "Confused",
];

pub const SENSATIONS: &[&str] = &[
    "Headache",
    "Tight Chest",
    "Fatigue",
    "Sweating",
    "Racing Heart",
    "Muscle Tension",
    "Dizziness",
    "Nausea",
    "Shortness of Breath",
    "Trembling",
    "Hot or Cold Flashes",
    "Stomach Pain",
    "Sleep Issues",
    "Loss of Appetite",
    "None",
    "Other",
];

pub const ACTIVITIES: &[&str] = &[
    "Work",
    "Study",
    "Exercise",
    "Socializing",
    "Leisure",
    "Hobbies",
    "Household Chores",
    "Sleep",
    "Self Care",
    "Meditation",
    "Eating",
    "Commuting",
    "Caregiving",
    "Shopping",
    "Healthcare",
    "Other",
];

pub const LOCATIONS: &[&str] = &[
    "Home",
    "Work",
    "School",
    "University",
    "Friend's Place",
    "Outside",
    "Gym",
    "Restaurant or Cafe",
    "Shopping Center",
    "Medical Facility",
    "Transit",
    "Nature",
    "Other",
];

/// Character classes accepted for free text. Every pattern requires at
/// least one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPattern {
    /// `[a-zA-Z\s]+`
    Letters,
    /// `[a-zA-Z0-9\s,.'-]+`
    Place,
    /// `[a-zA-Z\s,.'-]+`
    PersonName,
    /// `[a-zA-Z0-9]+`
    Alphanumeric,
    /// `[a-zA-Z\s'-]+`
    DisplayName,
}

impl TextPattern {
    pub fn matches(self, value: &str) -> bool {
        !value.is_empty() && value.chars().all(|c| self.allows(c))
    }

    fn allows(self, c: char) -> bool {
        let letter = c.is_ascii_alphabetic();
        let space = c.is_whitespace();
        match self {
            TextPattern::Letters => letter || space,
            TextPattern::Place => {
                letter || space || c.is_ascii_digit() || matches!(c, ',' | '.' | '\'' | '-')
            }
            TextPattern::PersonName => letter || space || matches!(c, ',' | '.' | '\'' | '-'),
            TextPattern::Alphanumeric => c.is_ascii_alphanumeric(),
            TextPattern::DisplayName => letter || space || matches!(c, '\'' | '-'),
        }
    }
}

/// A predefined label set plus the free-text pattern accepted otherwise.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub code: &'static str,
    pub message: &'static str,
    pub predefined: &'static [&'static str],
    pub pattern: TextPattern,
}

impl FieldRule {
    pub fn accepts(&self, value: &str) -> bool {
        self.predefined.contains(&value) || self.pattern.matches(value)
    }

    fn check(&self, value: &str) -> Result<(), ValidationError> {
        if self.accepts(value) {
            return Ok(());
        }
        let mut err = ValidationError::new(self.code);
        err.message = Some(Cow::Owned(format!("{} {}", value, self.message)));
        Err(err)
    }

    fn check_all(&self, values: &[String]) -> Result<(), ValidationError> {
        values.iter().try_for_each(|v| self.check(v))
    }
}

pub const EMOTION_RULE: FieldRule = FieldRule {
    code: "emotion",
    message: "is not a valid emotion.",
    predefined: EMOTIONS,
    pattern: TextPattern::Letters,
};

pub const SENSATION_RULE: FieldRule = FieldRule {
    code: "physical_sensation",
    message: "is not a valid physical sensation.",
    predefined: SENSATIONS,
    pattern: TextPattern::Letters,
};

pub const ACTIVITY_RULE: FieldRule = FieldRule {
    code: "activity",
    message: "is not a valid activity.",
    predefined: ACTIVITIES,
    pattern: TextPattern::Letters,
};

pub const LOCATION_RULE: FieldRule = FieldRule {
    code: "location",
    message: "is not a valid location. Please provide a valid place or select from predefined options.",
    predefined: LOCATIONS,
    pattern: TextPattern::Place,
};

pub const TRIGGER_RULE: FieldRule = FieldRule {
    code: "trigger",
    message: "is not a valid trigger.",
    predefined: &[],
    pattern: TextPattern::Place,
};

pub const PERSON_RULE: FieldRule = FieldRule {
    code: "person",
    message: "contains invalid characters. Only letters and common punctuation are allowed for names.",
    predefined: &[],
    pattern: TextPattern::PersonName,
};

pub fn validate_emotion(value: &str) -> Result<(), ValidationError> {
    EMOTION_RULE.check(value)
}

pub fn validate_location(value: &str) -> Result<(), ValidationError> {
    LOCATION_RULE.check(value)
}

pub fn validate_triggers(values: &[String]) -> Result<(), ValidationError> {
    TRIGGER_RULE.check_all(values)
}

pub fn validate_sensations(values: &[String]) -> Result<(), ValidationError> {
    SENSATION_RULE.check_all(values)
}

pub fn validate_activities(values: &[String]) -> Result<(), ValidationError> {
    ACTIVITY_RULE.check_all(values)
}

pub fn validate_people(values: &[String]) -> Result<(), ValidationError> {
    PERSON_RULE.check_all(values)
}

pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    if TextPattern::Alphanumeric.matches(value) {
        return Ok(());
    }
    let mut err = ValidationError::new("username");
    err.message = Some(Cow::Owned(format!(
        "{} contains invalid characters. Only letters and numbers are allowed.",
        value
    )));
    Err(err)
}

pub fn validate_display_name(value: &str) -> Result<(), ValidationError> {
    if TextPattern::DisplayName.matches(value) {
        return Ok(());
    }
    let mut err = ValidationError::new("name");
    err.message = Some(Cow::Owned(format!(
        "{} contains invalid characters. Name must contain only letters, spaces, hyphens, and apostrophes",
        value
    )));
    Err(err)
}

/// Well-formedness is checked by validator's `url`; this only restricts the
/// scheme.
pub fn validate_picture_scheme(value: &str) -> Result<(), ValidationError> {
    let lower = value.to_ascii_lowercase();
    if ["http://", "https://", "ftp://"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return Ok(());
    }
    let mut err = ValidationError::new("profile_picture");
    err.message = Some(Cow::Owned(format!(
        "{} is not a valid URL for a profile picture.",
        value
    )));
    Err(err)
}

pub const WEAK_PASSWORD_MESSAGE: &str = "Password is not strong enough. It must be at least 8 characters long and include one uppercase letter, one lowercase letter, one number, and one special character.";

/// At least 8 characters with a lowercase letter, an uppercase letter, a
/// digit and a non-alphanumeric character.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_rule_accepts_predefined_and_letters() {
        assert!(EMOTION_RULE.accepts("Happy"));
        assert!(EMOTION_RULE.accepts("Mildly amused"));
        assert!(!EMOTION_RULE.accepts("Happy!"));
        assert!(!EMOTION_RULE.accepts("Sad2"));
        assert!(!EMOTION_RULE.accepts(""));
    }

    #[test]
    fn test_location_rule_allows_predefined_apostrophe() {
        assert!(LOCATION_RULE.accepts("Friend's Place"));
        assert!(LOCATION_RULE.accepts("Room 101, Main St."));
        assert!(!LOCATION_RULE.accepts("home <script>"));
    }

    #[test]
    fn test_list_rules_reject_any_bad_entry() {
        let ok = vec!["Exercise".to_string(), "Gardening".to_string()];
        assert!(validate_activities(&ok).is_ok());
        let bad = vec!["Exercise".to_string(), "Work/Study".to_string()];
        let err = validate_activities(&bad).unwrap_err();
        assert_eq!(err.code, "activity");
        assert!(err.message.unwrap().contains("Work/Study"));
    }

    #[test]
    fn test_empty_lists_are_valid() {
        assert!(validate_sensations(&[]).is_ok());
        assert!(validate_people(&[]).is_ok());
    }

    #[test]
    fn test_people_names() {
        let people = vec!["Mary-Jane O'Neil".to_string(), "Dr. Who".to_string()];
        assert!(validate_people(&people).is_ok());
        assert!(validate_people(&["R2D2".to_string()]).is_err());
    }

    #[test]
    fn test_triggers_allow_digits_and_punctuation() {
        let triggers = vec!["Work deadline, 5pm".to_string()];
        assert!(validate_triggers(&triggers).is_ok());
        assert!(validate_triggers(&["Work/Life".to_string()]).is_err());
    }

    #[test]
    fn test_username_and_display_name() {
        assert!(validate_username("alice99").is_ok());
        assert!(validate_username("alice_99").is_err());
        assert!(validate_display_name("Anne-Marie O'Hara").is_ok());
        assert!(validate_display_name("Anne2").is_err());
    }

    #[test]
    fn test_picture_scheme() {
        assert!(validate_picture_scheme("https://example.com/a.png").is_ok());
        assert!(validate_picture_scheme("HTTP://example.com/a.png").is_ok());
        assert!(validate_picture_scheme("ftp://files.example.com/x").is_ok());
        assert!(validate_picture_scheme("example.com/a.png").is_err());
        assert!(validate_picture_scheme("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_password_strength() {
        assert!(is_strong_password("TestPass123!"));
        assert!(!is_strong_password("testpass123!"));
        assert!(!is_strong_password("TESTPASS123!"));
        assert!(!is_strong_password("TestPass!!!"));
        assert!(!is_strong_password("TestPass123"));
        assert!(!is_strong_password("Tp1!"));
    }
}
