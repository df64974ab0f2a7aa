//! Identity collaborator.
//!
//! The core never authenticates anyone. It asks an [`IdentityProvider`] for
//! the current user's stable id and refuses to run without one. Every service
//! operation takes an [`OwnerId`], which can only be obtained through
//! [`require_owner`].

use std::fmt;

use serde::Serialize;

use crate::errors::{Error, Result};

/// Source of the currently authenticated user.
pub trait IdentityProvider: Send + Sync {
    /// Stable owner id, or `None` when nobody is signed in.
    fn current_owner_id(&self) -> Option<String>;
}

/// An authenticated owner id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `other` names this owner.
    pub fn owns(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves the current owner, failing with [`Error::Unauthenticated`] when
/// the provider has none (or reports an empty id).
pub fn require_owner(provider: &dyn IdentityProvider) -> Result<OwnerId> {
    match provider.current_owner_id() {
        Some(id) if !id.trim().is_empty() => Ok(OwnerId(id)),
        _ => Err(Error::Unauthenticated),
    }
}

/// Fixed identity, used by adapters that already resolved the user and by tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<String>);

impl StaticIdentity {
    pub fn user(owner_id: impl Into<String>) -> Self {
        Self(Some(owner_id.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_owner_id(&self) -> Option<String> {
        self.0.clone()
    }
}
