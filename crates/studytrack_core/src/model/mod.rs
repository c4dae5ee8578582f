//! Study tracker domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the persisted JSON shape in one place.
//!
//! # Invariants
//! - Model types are plain data; persistence and logging live in services.

pub mod resource;
pub mod seed;
pub mod session;
pub mod study;
