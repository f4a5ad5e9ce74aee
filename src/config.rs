use std::env;

use anyhow::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" => Self::Test,
            _ => Self::Development,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,
    pub environment: Environment,

    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,

    pub llm_api_key: String,
    pub llm_model: String,
    pub llm_api_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".into())
                .parse()
                .context("PORT must be a number")?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|raw| split_origins(&raw))
                .unwrap_or_default(),
            environment: Environment::parse(
                &env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            ),

            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_ttl_secs: env::var("JWT_TTL_SECS")
                .unwrap_or_else(|_| "86400".into()) // 24 hours
                .parse()
                .context("JWT_TTL_SECS must be a number")?,

            llm_api_key: env::var("LLM_API_KEY").unwrap_or_default(),
            llm_model: env::var("LLM_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-20250514".into()),
            llm_api_url: env::var("LLM_API_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com/v1/messages".into()),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Test-data generation is only exposed outside production.
    pub fn allows_test_data(&self) -> bool {
        self.environment != Environment::Production
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: "postgres://localhost/emotion_journal_test".into(),
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:5173".into(),
            cors_extra_origins: Vec::new(),
            environment: Environment::Test,
            jwt_secret: "test-secret-for-unit-tests".into(),
            jwt_ttl_secs: 3600,
            llm_api_key: String::new(),
            llm_model: "test-model".into(),
            llm_api_url: "http://127.0.0.1:9/unused".into(),
        }
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse("PROD"), Environment::Production);
        assert_eq!(Environment::parse("test"), Environment::Test);
        assert_eq!(Environment::parse("development"), Environment::Development);
        assert_eq!(Environment::parse("anything-else"), Environment::Development);
    }

    #[test]
    fn test_split_origins() {
        assert_eq!(
            split_origins("http://192.168.1.5:5173, ,http://laptop.local:5173"),
            vec!["http://192.168.1.5:5173", "http://laptop.local:5173"]
        );
        assert!(split_origins("").is_empty());
    }

    #[test]
    fn test_test_data_gated_in_production() {
        let mut config = Config::for_tests();
        assert!(config.allows_test_data());
        config.environment = Environment::Production;
        assert!(!config.allows_test_data());
    }
}
