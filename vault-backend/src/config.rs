use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const VAULT_DIR: &str = "VAULT_DIR";
    /// Comma-separated top-level directories that accept new or modified notes.
    /// Empty or unset means the whole vault is writable.
    pub const VAULT_WRITABLE_CATEGORIES: &str = "VAULT_WRITABLE_CATEGORIES";
    /// Base URL of an OpenAI-compatible chat completions API
    pub const CLASSIFIER_API_URL: &str = "CLASSIFIER_API_URL";
    pub const CLASSIFIER_MODEL: &str = "CLASSIFIER_MODEL";
    pub const CLASSIFIER_API_KEY: &str = "OPENAI_API_KEY";
    pub const CLASSIFIER_TIMEOUT_SECS: &str = "CLASSIFIER_TIMEOUT_SECS";
    pub const CLASSIFIER_BATCH_SIZE: &str = "CLASSIFIER_BATCH_SIZE";
    pub const CLASSIFIER_MAX_CONCURRENCY: &str = "CLASSIFIER_MAX_CONCURRENCY";
    pub const INLINK_MAX_CONCURRENCY: &str = "INLINK_MAX_CONCURRENCY";
}

/// Default values
pub mod defaults {
    pub const VAULT_DIR: &str = "vault";
    pub const CLASSIFIER_API_URL: &str = "https://api.openai.com/v1";
    pub const CLASSIFIER_MODEL: &str = "gpt-4o-mini";
    pub const CLASSIFIER_TIMEOUT_SECS: u64 = 60;
    /// Upper bound on note identifiers sent in one classification call
    pub const CLASSIFIER_BATCH_SIZE: usize = 30;
    /// Upper bound on simultaneous in-flight workers for any fan-out
    pub const MAX_CONCURRENCY: usize = 10;
}

/// Settings for the relevance classifier and its HTTP backend
#[derive(Clone, Debug)]
pub struct ClassifierConfig {
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub batch_size: usize,
    pub max_concurrency: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::CLASSIFIER_API_URL.to_string(),
            model: defaults::CLASSIFIER_MODEL.to_string(),
            api_key: None,
            timeout_secs: defaults::CLASSIFIER_TIMEOUT_SECS,
            batch_size: defaults::CLASSIFIER_BATCH_SIZE,
            max_concurrency: defaults::MAX_CONCURRENCY,
        }
    }
}

impl ClassifierConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var(env_vars::CLASSIFIER_API_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| defaults::CLASSIFIER_API_URL.to_string()),
            model: env::var(env_vars::CLASSIFIER_MODEL)
                .unwrap_or_else(|_| defaults::CLASSIFIER_MODEL.to_string()),
            api_key: env::var(env_vars::CLASSIFIER_API_KEY)
                .ok()
                .filter(|k| !k.trim().is_empty()),
            timeout_secs: parse_env_or(
                env_vars::CLASSIFIER_TIMEOUT_SECS,
                defaults::CLASSIFIER_TIMEOUT_SECS,
            ),
            batch_size: parse_env_or(env_vars::CLASSIFIER_BATCH_SIZE, defaults::CLASSIFIER_BATCH_SIZE)
                .clamp(1, defaults::CLASSIFIER_BATCH_SIZE),
            max_concurrency: parse_env_or(env_vars::CLASSIFIER_MAX_CONCURRENCY, defaults::MAX_CONCURRENCY)
                .clamp(1, defaults::MAX_CONCURRENCY),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub vault_dir: PathBuf,
    pub writable_categories: Vec<String>,
    pub inlink_max_concurrency: usize,
    pub classifier: ClassifierConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            vault_dir: PathBuf::from(
                env::var(env_vars::VAULT_DIR).unwrap_or_else(|_| defaults::VAULT_DIR.to_string()),
            ),
            writable_categories: env::var(env_vars::VAULT_WRITABLE_CATEGORIES)
                .map(|v| parse_csv(&v))
                .unwrap_or_default(),
            inlink_max_concurrency: parse_env_or(env_vars::INLINK_MAX_CONCURRENCY, defaults::MAX_CONCURRENCY)
                .clamp(1, defaults::MAX_CONCURRENCY),
            classifier: ClassifierConfig::from_env(),
        }
    }
}

/// Parse comma-separated list into Vec<String>
pub fn parse_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|t| t.trim().trim_matches('/').to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Read a numeric env var, falling back to the default (with a warning) when it is malformed
fn parse_env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("{} must be a number (got '{}'), using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv() {
        assert_eq!(parse_csv("proposition, concept/"), vec!["proposition", "concept"]);
        assert_eq!(parse_csv("single"), vec!["single"]);
        assert_eq!(parse_csv(" , "), Vec::<String>::new());
    }

    #[test]
    fn test_classifier_defaults_respect_bounds() {
        let cfg = ClassifierConfig::default();
        assert_eq!(cfg.batch_size, 30);
        assert_eq!(cfg.max_concurrency, 10);
        assert!(cfg.api_key.is_none());
    }
}
