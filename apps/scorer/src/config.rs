use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::scoring::ScoringWeights;

const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// `*` or a comma-separated list of allowed origins.
    pub cors_origins: Vec<String>,
    pub model_name: String,
    pub embedding_dimension: usize,
    /// Base URL of an OpenAI-compatible embeddings server. Unset means the
    /// deterministic fallback embedder is used for every request.
    pub embedding_url: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_timeout_secs: u64,
    pub weights: ScoringWeights,
    pub max_file_size: usize,
    /// Lowercase extensions with the leading dot, e.g. `.pdf`.
    pub supported_formats: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8001,
            rust_log: "info".to_string(),
            cors_origins: vec!["*".to_string()],
            model_name: "all-MiniLM-L6-v2".to_string(),
            embedding_dimension: 384,
            embedding_url: None,
            embedding_api_key: None,
            embedding_timeout_secs: 30,
            weights: ScoringWeights::default(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            supported_formats: vec![".pdf".into(), ".docx".into(), ".txt".into()],
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests need not touch
    /// the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        let defaults_weights = defaults.weights;

        let weights = ScoringWeights {
            keyword_match: parse_or(&lookup, "KEYWORD_MATCH_WEIGHT", defaults_weights.keyword_match)?,
            skills: parse_or(&lookup, "SKILLS_WEIGHT", defaults_weights.skills)?,
            experience: parse_or(&lookup, "EXPERIENCE_WEIGHT", defaults_weights.experience)?,
            education: parse_or(&lookup, "EDUCATION_WEIGHT", defaults_weights.education)?,
            formatting: parse_or(&lookup, "FORMATTING_WEIGHT", defaults_weights.formatting)?,
        };
        for (name, value) in weights.named() {
            if !value.is_finite() || value < 0.0 {
                bail!("Scoring weight '{name}' must be a non-negative number, got {value}");
            }
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.cors_origins),
            model_name: lookup("MODEL_NAME").unwrap_or(defaults.model_name),
            embedding_dimension: parse_or(&lookup, "EMBEDDING_DIMENSION", defaults.embedding_dimension)?,
            embedding_url: lookup("EMBEDDING_URL").filter(|v| !v.trim().is_empty()),
            embedding_api_key: lookup("EMBEDDING_API_KEY").filter(|v| !v.trim().is_empty()),
            embedding_timeout_secs: parse_or(
                &lookup,
                "EMBEDDING_TIMEOUT_SECS",
                defaults.embedding_timeout_secs,
            )?,
            weights,
            max_file_size: parse_or(&lookup, "MAX_FILE_SIZE", defaults.max_file_size)?,
            supported_formats: lookup("SUPPORTED_FORMATS")
                .map(|v| split_list(&v.to_lowercase()))
                .unwrap_or(defaults.supported_formats),
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
