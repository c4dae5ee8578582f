//! Shared resource catalog model.
//!
//! # Responsibility
//! - Define the record exchanged with the remote `resources` collection.
//! - Provide pure display/ownership helpers used by catalog callers.

use serde::{Deserialize, Serialize};

/// Default description preview length used by list views.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 140;

/// One external link shared through the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Assigned by the server; empty on create payloads.
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    /// Email of the creating user, empty when created anonymously.
    #[serde(default)]
    pub owner_email: String,
    /// ISO-8601 creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Resource {
    /// Returns whether `email` owns this resource.
    pub fn is_owned_by(&self, email: &str) -> bool {
        !email.is_empty() && self.owner_email == email
    }

    /// Applies server-returned fields on top of the local copy.
    ///
    /// Empty server fields do not erase local values; the id is never replaced.
    pub fn merge_from(&mut self, updated: &Resource) {
        self.title = updated.title.clone();
        self.description = updated.description.clone();
        self.url = updated.url.clone();
        if !updated.owner_email.is_empty() {
            self.owner_email = updated.owner_email.clone();
        }
        if updated.created_at.is_some() {
            self.created_at = updated.created_at.clone();
        }
    }
}

/// User-editable resource fields (create and update payload).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDraft {
    pub title: String,
    pub description: String,
    pub url: String,
}

impl ResourceDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: url.into(),
        }
    }
}

/// Shortens `text` to `max_chars` characters, appending `…` when cut.
pub fn truncate_description(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}…", head.trim_end())
}
