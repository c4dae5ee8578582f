//! Remote resource collection contract and HTTP implementation.
//!
//! # Responsibility
//! - Map list/create/update/delete onto GET/POST/PUT/DELETE of `{base}/resources`.
//! - Surface non-2xx responses and transport failures as `ResourceError`.
//!
//! # Invariants
//! - Requests are never retried.
//! - One call issues exactly one HTTP request.

use crate::config::AppConfig;
use crate::model::resource::{Resource, ResourceDraft};
use log::debug;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, USER_AGENT};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ResourceResult<T> = Result<T, ResourceError>;

/// Failure talking to the resource collection.
#[derive(Debug)]
pub enum ResourceError {
    /// Connection, timeout or body decoding failure.
    Network(reqwest::Error),
    /// Server answered with a non-success status.
    Status(u16),
    /// Any other backend failure (used by non-HTTP implementations).
    Backend(String),
}

impl Display for ResourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(err) => write!(f, "resource request failed: {err}"),
            Self::Status(status) => write!(f, "resource request returned status {status}"),
            Self::Backend(message) => write!(f, "resource backend error: {message}"),
        }
    }
}

impl Error for ResourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Network(err) => Some(err),
            Self::Status(_) | Self::Backend(_) => None,
        }
    }
}

impl From<reqwest::Error> for ResourceError {
    fn from(value: reqwest::Error) -> Self {
        Self::Network(value)
    }
}

/// CRUD access to the shared resource collection.
pub trait ResourceApi {
    fn list(&self) -> ResourceResult<Vec<Resource>>;
    fn create(&self, payload: &Resource) -> ResourceResult<Resource>;
    fn update(&self, id: &str, draft: &ResourceDraft) -> ResourceResult<Resource>;
    fn delete(&self, id: &str) -> ResourceResult<()>;
}

impl<T: ResourceApi + ?Sized> ResourceApi for &T {
    fn list(&self) -> ResourceResult<Vec<Resource>> {
        (**self).list()
    }

    fn create(&self, payload: &Resource) -> ResourceResult<Resource> {
        (**self).create(payload)
    }

    fn update(&self, id: &str, draft: &ResourceDraft) -> ResourceResult<Resource> {
        (**self).update(id, draft)
    }

    fn delete(&self, id: &str) -> ResourceResult<()> {
        (**self).delete(id)
    }
}

/// Blocking HTTP client for `{base}/resources`.
pub struct HttpResourceApi {
    client: Client,
    base_url: String,
}

impl HttpResourceApi {
    /// Builds a client with the configured base URL and request timeout.
    pub fn new(config: &AppConfig) -> ResourceResult<Self> {
        let client = Client::builder().timeout(config.api_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/resources", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/resources/{id}", self.base_url)
    }

    fn user_agent() -> String {
        format!("studytrack/{}", env!("CARGO_PKG_VERSION"))
    }
}

fn ensure_success(response: Response) -> ResourceResult<Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(ResourceError::Status(status.as_u16()));
    }
    Ok(response)
}

impl ResourceApi for HttpResourceApi {
    fn list(&self) -> ResourceResult<Vec<Resource>> {
        debug!("event=resource_request module=resources method=GET");
        let response = self
            .client
            .get(self.collection_url())
            .header(USER_AGENT, Self::user_agent())
            .header(ACCEPT, "application/json")
            .send()?;
        Ok(ensure_success(response)?.json()?)
    }

    fn create(&self, payload: &Resource) -> ResourceResult<Resource> {
        debug!("event=resource_request module=resources method=POST");
        let response = self
            .client
            .post(self.collection_url())
            .header(USER_AGENT, Self::user_agent())
            .json(payload)
            .send()?;
        Ok(ensure_success(response)?.json()?)
    }

    fn update(&self, id: &str, draft: &ResourceDraft) -> ResourceResult<Resource> {
        debug!("event=resource_request module=resources method=PUT");
        let response = self
            .client
            .put(self.item_url(id))
            .header(USER_AGENT, Self::user_agent())
            .json(draft)
            .send()?;
        Ok(ensure_success(response)?.json()?)
    }

    fn delete(&self, id: &str) -> ResourceResult<()> {
        debug!("event=resource_request module=resources method=DELETE");
        let response = self
            .client
            .delete(self.item_url(id))
            .header(USER_AGENT, Self::user_agent())
            .send()?;
        ensure_success(response)?;
        Ok(())
    }
}
