use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::Config;
use crate::models::emotion_log::EmotionLog;

/// Minimal HTML escaping for user text embedded in the LLM prompt.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn build_prompt(logs: &[EmotionLog]) -> String {
    let entries: Vec<String> = logs
        .iter()
        .map(|log| {
            let mut lines = vec![
                format!("- Primary Emotion: {}", escape_html(&log.primary_emotion)),
                format!("- Intensity: {}/7", log.emotion_intensity),
                format!("- Day Rating: {}/10", log.overall_day_rating),
            ];
            if let Some(reflection) = log.reflection.as_deref().filter(|s| !s.is_empty()) {
                lines.push(format!("- Reflection: {}", escape_html(reflection)));
            }
            if let Some(gratitude) = log.gratitude.as_deref().filter(|s| !s.is_empty()) {
                lines.push(format!("- Gratitude: {}", escape_html(gratitude)));
            }
            lines.join("\n")
        })
        .collect();

    format!(
        r#"As an emotional well-being advisor, analyze the following emotional data and provide personalized advice (max 3 sentences):

Recent emotional patterns:
{}

Please provide concise, empathetic advice that:
1. Acknowledges their emotional state
2. Offers a specific, actionable suggestion
3. Ends with an encouraging note"#,
        entries.join("\n\n")
    )
}

pub async fn request_llm_advice(config: &Config, prompt: &str) -> Result<String, anyhow::Error> {
    if config.llm_api_key.is_empty() {
        anyhow::bail!("LLM API key not configured");
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let response = client
        .post(&config.llm_api_url)
        .header("x-api-key", &config.llm_api_key)
        .header("anthropic-version", "2023-06-01")
        .header("content-type", "application/json")
        .json(&serde_json::json!({
            "model": config.llm_model,
            "max_tokens": 300,
            "messages": [{
                "role": "user",
                "content": prompt
            }]
        }))
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("LLM API error {}: {}", status, body);
    }

    let body: serde_json::Value = response.json().await?;
    let text = body["content"][0]["text"].as_str().unwrap_or("").trim();
    if text.is_empty() {
        anyhow::bail!("LLM API returned no text");
    }
    Ok(text.to_string())
}

/// Deterministic advice built from the entries themselves, used when the
/// LLM is unavailable.
pub fn fallback_advice(logs: &[EmotionLog]) -> String {
    if logs.is_empty() {
        return "Log how you feel today to start getting personalized advice.".into();
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for log in logs {
        *counts.entry(log.primary_emotion.as_str()).or_insert(0) += 1;
    }
    // Ties resolve to the alphabetically first emotion.
    let (dominant, _) = counts
        .iter()
        .fold(("", 0usize), |best, (emotion, n)| {
            if *n > best.1 {
                (*emotion, *n)
            } else {
                best
            }
        });

    let n = logs.len() as f64;
    let avg_intensity = logs.iter().map(|l| f64::from(l.emotion_intensity)).sum::<f64>() / n;
    let avg_rating = logs.iter().map(|l| f64::from(l.overall_day_rating)).sum::<f64>() / n;

    let suggestion = if avg_rating < 5.0 || avg_intensity >= 5.5 {
        "Try setting aside ten quiet minutes today for a walk, some slow breathing, or writing down what is weighing on you."
    } else {
        "Notice what helped on your better days and plan one small moment of it for tomorrow."
    };

    format!(
        "You've mostly been feeling {} lately, with an average intensity of {:.1}/7 and days rated {:.1}/10 on average. {} Every entry you log is a step toward understanding yourself better.",
        dominant.to_lowercase(),
        avg_intensity,
        avg_rating,
        suggestion
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>hi</b> & 'yo'"), "&lt;b&gt;hi&lt;&#x2F;b&gt; &amp; &#x27;yo&#x27;");
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_prompt_includes_optional_fields_only_when_present() {
        let mut with_notes = EmotionLog::fixture("Happy", Utc::now());
        with_notes.reflection = Some("Went <well>".into());
        with_notes.gratitude = Some("Sunshine".into());
        let bare = EmotionLog::fixture("Sad", Utc::now());

        let prompt = build_prompt(&[with_notes, bare]);
        assert!(prompt.contains("- Primary Emotion: Happy"));
        assert!(prompt.contains("- Primary Emotion: Sad"));
        assert!(prompt.contains("- Intensity: 4/7"));
        assert!(prompt.contains("- Day Rating: 5/10"));
        assert!(prompt.contains("- Reflection: Went &lt;well&gt;"));
        assert!(prompt.contains("- Gratitude: Sunshine"));
        assert_eq!(prompt.matches("- Reflection:").count(), 1);
    }

    #[test]
    fn test_fallback_names_dominant_emotion() {
        let logs = vec![
            EmotionLog::fixture("Anxious", Utc::now()),
            EmotionLog::fixture("Anxious", Utc::now()),
            EmotionLog::fixture("Happy", Utc::now()),
        ];
        let advice = fallback_advice(&logs);
        assert!(advice.contains("feeling anxious"));
        assert!(advice.contains("4.0/7"));
        assert!(advice.contains("5.0/10"));
    }

    #[test]
    fn test_fallback_low_ratings_suggest_a_break() {
        let mut log = EmotionLog::fixture("Sad", Utc::now());
        log.overall_day_rating = 2;
        let advice = fallback_advice(&[log]);
        assert!(advice.contains("ten quiet minutes"));
    }

    #[tokio::test]
    async fn test_llm_call_requires_key() {
        let config = Config::for_tests();
        let result = request_llm_advice(&config, "prompt").await;
        assert!(result.is_err());
    }
}
