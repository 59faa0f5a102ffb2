use crate::errors::AppError;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if the model credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub llm_model: String,
    pub llm_base_url: String,
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests never touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let google_api_key = lookup("GOOGLE_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::MissingCredential("GOOGLE_API_KEY".to_string()))?;

        Ok(Config {
            google_api_key,
            llm_model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_base_url: lookup("LLM_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            llm_timeout_secs: parse_or(&lookup, "LLM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::Config(format!("{key} must be a valid number, got '{raw}'"))),
        None => Ok(default),
    }
}
