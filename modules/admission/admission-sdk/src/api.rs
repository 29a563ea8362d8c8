//! Collaborator store interfaces consumed by the admission layer.
//!
//! The admission core performs key lookups only; storage, caching and
//! credential issuance live behind these traits. Implementations must
//! provide their own concurrency safety (`Send + Sync`).

use async_trait::async_trait;

use crate::models::{Community, Listing, Person};

/// Read-only store of communities (tenants).
#[async_trait]
pub trait CommunityStore: Send + Sync {
    /// Resolve a community by one of the host-names it owns.
    async fn find_by_host(&self, host: &str) -> Option<Community>;

    /// Resolve a community by its identifier.
    async fn find_by_id(&self, id: &str) -> Option<Community>;
}

/// Read-only store of listings (protected resources).
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Resolve a listing by its identifier.
    async fn find_by_id(&self, id: &str) -> Option<Listing>;
}

/// Store that exchanges an already-issued credential for its principal.
///
/// Resolution is a lookup, not a proof construction: an unknown or revoked
/// token simply resolves to `None`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Resolve an opaque API token to the person it was issued to.
    async fn resolve(&self, token: &str) -> Option<Person>;
}

/// Read-only directory of persons.
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// Resolve a person by their identifier.
    async fn find_by_id(&self, id: &str) -> Option<Person>;
}
