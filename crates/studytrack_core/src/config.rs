//! Runtime configuration for core services.
//!
//! # Responsibility
//! - Hold storage key prefixes, the default syllabus and resource API settings.
//! - Read overrides from environment variables.
//!
//! # Invariants
//! - Invalid overrides never fail startup; they fall back to defaults with a warning.

use crate::model::seed::DefaultSyllabus;
use log::warn;
use std::time::Duration;

pub const ENV_KEY_PREFIX: &str = "STUDYTRACK_KEY_PREFIX";
pub const ENV_DEFAULT_SYLLABUS: &str = "STUDYTRACK_DEFAULT_SYLLABUS";
pub const ENV_API_BASE_URL: &str = "STUDYTRACK_API_BASE_URL";
pub const ENV_API_TIMEOUT_SECS: &str = "STUDYTRACK_API_TIMEOUT_SECS";

const DEFAULT_KEY_PREFIX: &str = "study-tracker";
const DEFAULT_API_BASE_URL: &str = "http://localhost:3030";
const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(15);

/// Configuration shared by the study store, session, course and resource services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Namespace for every storage key written by core services.
    pub key_prefix: String,
    /// Syllabus used for identities without persisted state.
    pub default_syllabus: DefaultSyllabus,
    /// Base URL of the remote `resources` collection, without trailing slash.
    pub api_base_url: String,
    pub api_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            default_syllabus: DefaultSyllabus::default(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout: DEFAULT_API_TIMEOUT,
        }
    }
}

impl AppConfig {
    /// Builds configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(prefix) = non_blank(lookup(ENV_KEY_PREFIX)) {
            config.key_prefix = prefix;
        }

        if let Some(raw) = non_blank(lookup(ENV_DEFAULT_SYLLABUS)) {
            match DefaultSyllabus::parse(&raw) {
                Some(syllabus) => config.default_syllabus = syllabus,
                None => warn!(
                    "event=config_invalid module=config key={ENV_DEFAULT_SYLLABUS} value={raw} fallback=empty"
                ),
            }
        }

        if let Some(url) = non_blank(lookup(ENV_API_BASE_URL)) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = non_blank(lookup(ENV_API_TIMEOUT_SECS)) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.api_timeout = Duration::from_secs(secs),
                _ => warn!(
                    "event=config_invalid module=config key={ENV_API_TIMEOUT_SECS} value={raw} fallback={}",
                    DEFAULT_API_TIMEOUT.as_secs()
                ),
            }
        }

        config
    }

    /// Prefix of per-identity study state keys.
    pub fn progress_key_prefix(&self) -> String {
        format!("{}-progress", self.key_prefix)
    }

    /// Prefix of per-identity course settings keys.
    pub fn course_key_prefix(&self) -> String {
        format!("{}-course", self.key_prefix)
    }

    /// Key of the single session slot.
    pub fn auth_key(&self) -> String {
        format!("{}-auth", self.key_prefix)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ENV_API_BASE_URL, ENV_API_TIMEOUT_SECS, ENV_DEFAULT_SYLLABUS};
    use crate::model::seed::DefaultSyllabus;
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_storage_layout() {
        let config = AppConfig::default();
        assert_eq!(config.progress_key_prefix(), "study-tracker-progress");
        assert_eq!(config.course_key_prefix(), "study-tracker-course");
        assert_eq!(config.auth_key(), "study-tracker-auth");
    }

    #[test]
    fn overrides_are_applied_and_normalized() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_DEFAULT_SYLLABUS, "Starter"),
            (ENV_API_BASE_URL, "https://api.example.com/"),
            (ENV_API_TIMEOUT_SECS, "3"),
        ]));
        assert_eq!(config.default_syllabus, DefaultSyllabus::Starter);
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.api_timeout, Duration::from_secs(3));
    }

    #[test]
    fn invalid_overrides_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_DEFAULT_SYLLABUS, "demo"),
            (ENV_API_TIMEOUT_SECS, "0"),
        ]));
        assert_eq!(config, AppConfig::default());
    }
}
