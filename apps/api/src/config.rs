use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

const DEFAULT_SECRETS_PATH: &str = ".streamlit/secrets.toml";
const DEFAULT_LLM_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_LLM_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
const API_KEY_NAME: &str = "GROQ_API_KEY";

/// Application configuration loaded from the secrets store and environment variables.
/// Startup fails if the completion credential cannot be resolved.
#[derive(Clone)]
pub struct Config {
    pub llm_api_key: String,
    pub llm_api_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    /// Attempts per action. 1 means a single call, no retry.
    pub llm_max_attempts: u32,
    pub session_idle_ttl_secs: u64,
    pub max_upload_bytes: usize,
    pub port: u16,
}

// Hand-written so the credential never reaches a log line.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("llm_api_key", &"<redacted>")
            .field("llm_api_url", &self.llm_api_url)
            .field("llm_model", &self.llm_model)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("llm_max_attempts", &self.llm_max_attempts)
            .field("session_idle_ttl_secs", &self.session_idle_ttl_secs)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let secrets_path = std::env::var("SECRETS_PATH")
            .unwrap_or_else(|_| DEFAULT_SECRETS_PATH.to_string());
        let from_secrets = read_secret(Path::new(&secrets_path), API_KEY_NAME);
        let from_env = std::env::var(API_KEY_NAME).ok();

        let llm_api_key = match resolve_api_key(from_secrets, from_env) {
            Some(key) => key,
            None => bail!(
                "{API_KEY_NAME} not found in secrets store '{secrets_path}' or environment variables"
            ),
        };

        let llm_max_attempts: u32 = parse_env("LLM_MAX_ATTEMPTS", 1)?;
        if llm_max_attempts == 0 {
            bail!("LLM_MAX_ATTEMPTS must be at least 1");
        }

        Ok(Config {
            llm_api_key,
            llm_api_url: std::env::var("LLM_API_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_API_URL.to_string()),
            llm_model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            llm_max_attempts,
            session_idle_ttl_secs: parse_env("SESSION_IDLE_TTL_SECS", 3600)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            port: parse_env("PORT", 8080)?,
        })
    }
}

/// The secrets store wins over the environment; blank values count as absent.
fn resolve_api_key(from_secrets: Option<String>, from_env: Option<String>) -> Option<String> {
    from_secrets
        .into_iter()
        .chain(from_env)
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

/// Reads a top-level string from a TOML secrets file.
/// A missing file yields `None`; an unreadable or malformed one is logged and ignored.
fn read_secret(path: &Path, key: &str) -> Option<String> {
    if !path.exists() {
        return None;
    }

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Could not read secrets file {}: {e}", path.display());
            return None;
        }
    };

    let table: toml::Table = match raw.parse() {
        Ok(table) => table,
        Err(e) => {
            warn!("Ignoring malformed secrets file {}: {e}", path.display());
            return None;
        }
    };

    let value = table.get(key)?.as_str()?.to_string();
    info!("{key} loaded from secrets store {}", path.display());
    Some(value)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
