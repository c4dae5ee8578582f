//! Per-identity course branding settings.
//!
//! # Responsibility
//! - Load, edit and persist `{courseName, courseInstance}` per identity.
//! - Replace the retired legacy course pair with current defaults on load.
//! - Derive display strings for headers.
//!
//! # Invariants
//! - Every change is written immediately; loading never writes.

use crate::config::AppConfig;
use crate::model::session::identity_storage_key;
use crate::storage::KeyValueStore;
use log::warn;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COURSE_NAME: &str = "SoftUni Course";
pub const DEFAULT_COURSE_INSTANCE: &str = "";

const LEGACY_COURSE_NAME: &str = "ReactJS";
const LEGACY_COURSE_INSTANCE: &str = "October 2025";
const FALLBACK_INITIAL: char = 'S';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSettings {
    pub course_name: String,
    pub course_instance: String,
}

impl Default for CourseSettings {
    fn default() -> Self {
        Self {
            course_name: DEFAULT_COURSE_NAME.to_string(),
            course_instance: DEFAULT_COURSE_INSTANCE.to_string(),
        }
    }
}

impl CourseSettings {
    fn is_legacy(&self) -> bool {
        self.course_name == LEGACY_COURSE_NAME && self.course_instance == LEGACY_COURSE_INSTANCE
    }

    /// `"{name} – {instance}"`, or whichever part is set, or the default name.
    pub fn course_full(&self) -> String {
        match (self.course_name.is_empty(), self.course_instance.is_empty()) {
            (false, false) => format!("{} – {}", self.course_name, self.course_instance),
            (false, true) => self.course_name.clone(),
            (true, false) => self.course_instance.clone(),
            (true, true) => DEFAULT_COURSE_NAME.to_string(),
        }
    }

    /// Uppercased first letter of the name, else of the instance.
    pub fn course_initial(&self) -> char {
        self.course_name
            .chars()
            .next()
            .or_else(|| self.course_instance.chars().next())
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or(FALLBACK_INITIAL)
    }
}

/// Course settings holder for the active identity.
pub struct CourseService<S: KeyValueStore> {
    storage: S,
    key_prefix: String,
    storage_key: String,
    settings: CourseSettings,
}

impl<S: KeyValueStore> CourseService<S> {
    pub fn new(storage: S, config: &AppConfig, identity: Option<&str>) -> Self {
        let key_prefix = config.course_key_prefix();
        let storage_key = identity_storage_key(&key_prefix, identity);
        let settings = load_settings(&storage, &storage_key);
        Self {
            storage,
            key_prefix,
            storage_key,
            settings,
        }
    }

    /// Reloads settings for another identity.
    pub fn switch_identity(&mut self, identity: Option<&str>) {
        self.storage_key = identity_storage_key(&self.key_prefix, identity);
        self.settings = load_settings(&self.storage, &self.storage_key);
    }

    pub fn settings(&self) -> &CourseSettings {
        &self.settings
    }

    pub fn set_course_name(&mut self, value: &str) {
        self.settings.course_name = value.to_string();
        self.persist();
    }

    pub fn set_course_instance(&mut self, value: &str) {
        self.settings.course_instance = value.to_string();
        self.persist();
    }

    /// Restores default settings.
    pub fn reset(&mut self) {
        self.settings = CourseSettings::default();
        self.persist();
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.settings)
            .map_err(|err| err.to_string())
            .and_then(|payload| {
                self.storage
                    .set(&self.storage_key, &payload)
                    .map_err(|err| err.to_string())
            });
        if let Err(err) = result {
            warn!("event=course_persist module=course status=error error={err}");
        }
    }
}

fn load_settings<S: KeyValueStore>(storage: &S, key: &str) -> CourseSettings {
    let stored = match storage.get(key) {
        Ok(Some(stored)) => stored,
        Ok(None) => return CourseSettings::default(),
        Err(err) => {
            warn!("event=course_load module=course status=error error_code=read_failed error={err}");
            return CourseSettings::default();
        }
    };
    match serde_json::from_str::<CourseSettings>(&stored) {
        Ok(settings) if settings.is_legacy() => CourseSettings::default(),
        Ok(settings) => settings,
        Err(_) => CourseSettings::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::{CourseService, CourseSettings, DEFAULT_COURSE_NAME};
    use crate::config::AppConfig;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn settings(name: &str, instance: &str) -> CourseSettings {
        CourseSettings {
            course_name: name.to_string(),
            course_instance: instance.to_string(),
        }
    }

    #[test]
    fn display_strings_fall_back_in_order() {
        assert_eq!(settings("Rust", "Spring").course_full(), "Rust – Spring");
        assert_eq!(settings("", "Spring").course_full(), "Spring");
        assert_eq!(settings("", "").course_full(), DEFAULT_COURSE_NAME);
        assert_eq!(settings("rust", "").course_initial(), 'R');
        assert_eq!(settings("", "spring").course_initial(), 'S');
        assert_eq!(settings("", "").course_initial(), 'S');
    }

    #[test]
    fn legacy_pair_is_replaced_on_load() {
        let storage = MemoryStore::new();
        storage
            .set(
                "study-tracker-course-guest",
                r#"{"courseName":"ReactJS","courseInstance":"October 2025"}"#,
            )
            .unwrap();
        let service = CourseService::new(&storage, &AppConfig::default(), None);
        assert_eq!(service.settings(), &CourseSettings::default());
    }

    #[test]
    fn edits_persist_per_identity() {
        let storage = MemoryStore::new();
        let config = AppConfig::default();
        let mut service = CourseService::new(&storage, &config, Some("a@b.c"));
        service.set_course_name("Databases");
        service.set_course_instance("Fall 2026");

        service.switch_identity(None);
        assert_eq!(service.settings(), &CourseSettings::default());

        service.switch_identity(Some("a@b.c"));
        assert_eq!(service.settings().course_full(), "Databases – Fall 2026");

        service.reset();
        let reloaded = CourseService::new(&storage, &config, Some("a@b.c"));
        assert_eq!(reloaded.settings(), &CourseSettings::default());
    }
}
