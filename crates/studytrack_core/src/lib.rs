//! Core domain logic for StudyTrack.
//! This crate is the single source of truth for study progress invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::resource::{truncate_description, Resource, ResourceDraft};
pub use model::seed::{default_state, DefaultSyllabus, LEGACY_TOPIC_IDS};
pub use model::session::{AuthUser, IdentityProvider, StaticIdentity, GUEST_IDENTITY};
pub use model::study::{
    normalize_exercise_count, ChecklistItem, EntityId, Exercise, ExerciseStatus, StudyState,
    Topic, TopicChanges,
};
pub use repo::resource_api::{HttpResourceApi, ResourceApi, ResourceError, ResourceResult};
pub use service::auth_service::{AuthError, AuthService};
pub use service::course_service::{CourseService, CourseSettings};
pub use service::exam_prep::{exam_date_from_input, Countdown};
pub use service::progress::{clamp_percent, Progress, ProgressStage};
pub use service::resource_catalog::{can_edit, ResourceCatalog};
pub use service::study_store::StudyStore;
pub use storage::sqlite_kv::SqliteKeyValueStore;
pub use storage::{KeyValueStore, MemoryStore, StorageError, StorageResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
