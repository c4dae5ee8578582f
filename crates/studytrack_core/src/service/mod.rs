//! Core use-case services.
//!
//! # Responsibility
//! - Own live state for study progress, session and course settings.
//! - Keep callers decoupled from storage and HTTP details.

pub mod auth_service;
pub mod course_service;
pub mod exam_prep;
pub mod progress;
pub mod resource_catalog;
pub mod study_store;
