use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_api_base_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Where the JSON / PDF / MP3 artifacts live.
    pub articles_dir: PathBuf,
    /// Static front-end root.
    pub public_dir: PathBuf,
    pub enable_scheduler: bool,
    /// Local hour (0-23) of the daily generation run.
    pub daily_generation_hour: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let daily_generation_hour = optional_env("DAILY_GENERATION_HOUR", "6")
            .parse::<u32>()
            .context("DAILY_GENERATION_HOUR must be a number")?;
        if daily_generation_hour > 23 {
            anyhow::bail!("DAILY_GENERATION_HOUR must be between 0 and 23");
        }

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_api_base_url: optional_env("OPENAI_API_BASE_URL", DEFAULT_API_BASE_URL),
            port: optional_env("PORT", "3000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
            articles_dir: PathBuf::from(optional_env("ARTICLES_DIR", "public/articles")),
            public_dir: PathBuf::from(optional_env("PUBLIC_DIR", "public")),
            enable_scheduler: parse_flag(&optional_env("ENABLE_SCHEDULER", "true"))
                .context("ENABLE_SCHEDULER must be true or false")?,
            daily_generation_hour,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised flag value '{other}'"),
    }
}
