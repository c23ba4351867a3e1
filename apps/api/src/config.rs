use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis::submission::DEFAULT_MAX_UPLOAD_BYTES;
use crate::llm_client::retry::{RetryPolicy, DEFAULT_BACKOFF_STEP, DEFAULT_MAX_ATTEMPTS};
use crate::llm_client::{
    GenerationConfig, DEFAULT_API_BASE, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub llm_temperature: f32,
    pub llm_max_output_tokens: u32,
    pub llm_timeout: Duration,
    pub llm_max_attempts: u32,
    pub llm_backoff_step: Duration,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: env_or("GEMINI_MODEL", DEFAULT_MODEL),
            gemini_api_base: env_or("GEMINI_API_BASE", DEFAULT_API_BASE),
            llm_temperature: parse_env("LLM_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            llm_max_output_tokens: parse_env("LLM_MAX_OUTPUT_TOKENS", DEFAULT_MAX_OUTPUT_TOKENS)?,
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 60u64)?),
            llm_max_attempts: parse_env("LLM_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
            llm_backoff_step: Duration::from_secs(parse_env(
                "LLM_BACKOFF_STEP_SECS",
                DEFAULT_BACKOFF_STEP.as_secs(),
            )?),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_env("PORT", 8080u16)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.llm_temperature,
            max_output_tokens: self.llm_max_output_tokens,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::linear(self.llm_max_attempts, self.llm_backoff_step)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has an invalid value: '{raw}'"))
}
