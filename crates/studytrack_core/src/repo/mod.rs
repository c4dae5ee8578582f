//! Remote collection contracts.
//!
//! # Responsibility
//! - Define the CRUD seam services use to reach the shared resource collection.
//! - Keep HTTP details out of service orchestration.

pub mod resource_api;
