//! Local session model.

use serde::{Deserialize, Serialize};

/// Identity segment used in storage keys when nobody is logged in.
pub const GUEST_IDENTITY: &str = "guest";

/// Logged-in user as persisted in the session slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub email: String,
}

/// Supplies the identifier of the currently active user.
///
/// `None` means guest. Only used to pick per-identity storage slots.
pub trait IdentityProvider {
    fn current_identity(&self) -> Option<String>;
}

/// Fixed identity, mostly useful for tests and one-shot tools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticIdentity(pub Option<String>);

impl IdentityProvider for StaticIdentity {
    fn current_identity(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Builds a per-identity storage key: `{prefix}-{identity|guest}`.
pub fn identity_storage_key(prefix: &str, identity: Option<&str>) -> String {
    format!("{prefix}-{}", identity.unwrap_or(GUEST_IDENTITY))
}
