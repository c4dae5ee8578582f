//! Resource catalog use-case service.
//!
//! # Responsibility
//! - Keep the locally known resource list in sync with the remote collection.
//! - Record one displayable error string per failed operation.
//!
//! # Invariants
//! - `error` is cleared when an operation starts.
//! - Local state changes only after the remote call succeeded.
//! - Failures return a sentinel (`None` / `false`) and never panic.

use crate::model::resource::{Resource, ResourceDraft};
use crate::model::session::AuthUser;
use crate::repo::resource_api::ResourceApi;
use crate::service::exam_prep::to_iso_timestamp;
use chrono::Utc;
use log::warn;

pub const FETCH_FAILED: &str = "Failed to fetch resources";
pub const CREATE_FAILED: &str = "Failed to create resource";
pub const UPDATE_FAILED: &str = "Failed to update resource";
pub const DELETE_FAILED: &str = "Failed to delete resource";

/// Local view of the shared resource collection.
pub struct ResourceCatalog<A: ResourceApi> {
    api: A,
    resources: Vec<Resource>,
    loading: bool,
    error: Option<String>,
}

impl<A: ResourceApi> ResourceCatalog<A> {
    /// Creates an empty catalog; call [`ResourceCatalog::fetch`] to populate it.
    pub fn new(api: A) -> Self {
        Self {
            api,
            resources: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces the local list with the server's list.
    pub fn fetch(&mut self) -> bool {
        self.loading = true;
        self.error = None;
        let result = self.api.list();
        self.loading = false;
        match result {
            Ok(resources) => {
                self.resources = resources;
                true
            }
            Err(err) => self.fail(FETCH_FAILED, &err),
        }
    }

    /// Creates a resource owned by `owner` and prepends the server's record.
    pub fn create(&mut self, draft: &ResourceDraft, owner: Option<&AuthUser>) -> Option<Resource> {
        self.error = None;
        let payload = Resource {
            id: String::new(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            url: draft.url.clone(),
            owner_email: owner.map(|user| user.email.clone()).unwrap_or_default(),
            created_at: Some(to_iso_timestamp(Utc::now())),
        };
        match self.api.create(&payload) {
            Ok(created) => {
                self.resources.insert(0, created.clone());
                Some(created)
            }
            Err(err) => {
                self.fail(CREATE_FAILED, &err);
                None
            }
        }
    }

    /// Sends edited fields and merges the server's record into the local entry.
    pub fn update(&mut self, id: &str, draft: &ResourceDraft) -> Option<Resource> {
        self.error = None;
        match self.api.update(id, draft) {
            Ok(updated) => {
                if let Some(local) = self.resources.iter_mut().find(|item| item.id == id) {
                    local.merge_from(&updated);
                }
                Some(updated)
            }
            Err(err) => {
                self.fail(UPDATE_FAILED, &err);
                None
            }
        }
    }

    /// Deletes remotely, then drops the local entry.
    pub fn delete(&mut self, id: &str) -> bool {
        self.error = None;
        match self.api.delete(id) {
            Ok(()) => {
                self.resources.retain(|item| item.id != id);
                true
            }
            Err(err) => self.fail(DELETE_FAILED, &err),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|item| item.id == id)
    }

    /// Resources owned by `email`; the whole list when `email` is empty.
    pub fn owned_by(&self, email: &str) -> Vec<&Resource> {
        if email.is_empty() {
            return self.resources.iter().collect();
        }
        self.resources
            .iter()
            .filter(|item| item.is_owned_by(email))
            .collect()
    }

    fn fail(&mut self, message: &str, err: &dyn std::error::Error) -> bool {
        warn!("event=resource_sync module=resources status=error message=\"{message}\" error={err}");
        self.error = Some(message.to_string());
        false
    }
}

/// Only the logged-in owner may edit or delete a resource.
pub fn can_edit(resource: &Resource, user: Option<&AuthUser>) -> bool {
    user.is_some_and(|user| resource.is_owned_by(&user.email))
}
