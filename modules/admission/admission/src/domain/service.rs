//! Admission decision procedures.
//!
//! The service is a pure decision pipeline over the collaborator stores:
//! it performs key lookups only and owns no cancellation, retry or timeout
//! logic. Each request drives it exactly once before resource logic runs.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use admission_sdk::{
    Community, CommunityStore, CredentialStore, Listing, ListingStore, Person, PersonStore,
    Visibility,
};

use crate::config::AdmissionConfig;
use crate::domain::error::AdmissionError;

/// Collaborator stores consumed by the admission layer.
#[derive(Clone)]
pub struct Stores {
    pub communities: Arc<dyn CommunityStore>,
    pub listings: Arc<dyn ListingStore>,
    pub credentials: Arc<dyn CredentialStore>,
    pub persons: Arc<dyn PersonStore>,
}

/// Result of community resolution.
///
/// `base_url` starts from the request scheme and host and is overridden by
/// the community's canonical URL once a community is bound.
#[derive(Debug, Clone)]
pub struct CommunityBinding {
    pub community: Option<Community>,
    pub base_url: String,
}

/// The admission service.
pub struct AdmissionService {
    stores: Stores,
    config: AdmissionConfig,
}

impl AdmissionService {
    #[must_use]
    pub fn new(stores: Stores, config: AdmissionConfig) -> Self {
        Self { stores, config }
    }

    #[must_use]
    pub fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    /// Binds the request to at most one community.
    ///
    /// `host` may carry a port; the port participates in the derived base
    /// URL but not in the host lookup. Host-based resolution runs first; an
    /// explicit `community_id` parameter overrides it but must agree with
    /// the host-resolved community when both are present. Id equality is
    /// canonical string comparison.
    ///
    /// # Errors
    ///
    /// - [`AdmissionError::CommunityConflict`] when the parameter disagrees
    ///   with the host-resolved community
    /// - [`AdmissionError::CommunityNotFound`] when the parameter does not
    ///   resolve to a community
    #[tracing::instrument(skip_all, fields(host = %host))]
    pub async fn resolve_community(
        &self,
        scheme: &str,
        host: &str,
        community_id: Option<&str>,
    ) -> Result<CommunityBinding, AdmissionError> {
        let mut base_url = format!("{scheme}://{host}");
        let mut community = self.stores.communities.find_by_host(strip_port(host)).await;

        if let (Some(bound), Some(param)) = (community.as_ref(), community_id) {
            if param != bound.id {
                tracing::debug!(community.id = %bound.id, param, "community binding conflict");
                return Err(AdmissionError::CommunityConflict);
            }
        }

        if let Some(param) = community_id {
            let by_id = self
                .stores
                .communities
                .find_by_id(param)
                .await
                .ok_or(AdmissionError::CommunityNotFound)?;
            community = Some(by_id);
        }

        if let Some(bound) = community.as_ref() {
            base_url.clone_from(&bound.full_url);
            tracing::debug!(community.id = %bound.id, "community bound");
        }

        Ok(CommunityBinding {
            community,
            base_url,
        })
    }

    /// Exchanges the canonical credential for a principal.
    ///
    /// An absent or unresolvable credential leaves the request anonymous;
    /// that is not an error here, only a precondition the visibility checks
    /// handle later.
    #[tracing::instrument(skip_all)]
    pub async fn authenticate(&self, token: Option<&SecretString>) -> Option<Person> {
        let token = token?;
        let person = self.stores.credentials.resolve(token.expose_secret()).await;
        match person.as_ref() {
            Some(p) => tracing::debug!(person.id = %p.id, "credential resolved"),
            None => tracing::debug!("credential did not resolve, request stays anonymous"),
        }
        person
    }

    /// Decides whether a listing may be disclosed to the caller.
    ///
    /// With `allow_nil` set and no id present the request is allowed with
    /// no listing bound (list endpoints that do not target one resource).
    /// The denial priority order is load-bearing: tenant mismatch on a
    /// public listing is reported before forbidden, which is reported
    /// before unauthenticated.
    ///
    /// # Errors
    ///
    /// - [`AdmissionError::ListingNotFound`] when no listing matches the id
    /// - [`AdmissionError::ListingTenantMismatch`] for a public listing in
    ///   the wrong community context
    /// - [`AdmissionError::ListingForbidden`] when the caller is
    ///   authenticated but not allowed to see the listing
    /// - [`AdmissionError::ListingUnauthenticated`] when the caller is
    ///   anonymous
    #[tracing::instrument(skip_all, fields(listing.id = tracing::field::Empty))]
    pub async fn authorize_listing(
        &self,
        id: Option<&str>,
        allow_nil: bool,
        person: Option<&Person>,
        community: Option<&Community>,
    ) -> Result<Option<Listing>, AdmissionError> {
        let Some(id) = id else {
            if allow_nil {
                return Ok(None);
            }
            return Err(AdmissionError::ListingNotFound);
        };
        tracing::Span::current().record("listing.id", id);

        let Some(listing) = self.stores.listings.find_by_id(id).await else {
            return Err(AdmissionError::ListingNotFound);
        };

        if listing.is_visible_to(person, community) {
            return Ok(Some(listing));
        }

        let denial = if listing.is_public() {
            AdmissionError::ListingTenantMismatch
        } else if person.is_some() {
            AdmissionError::ListingForbidden
        } else {
            AdmissionError::ListingUnauthenticated
        };
        tracing::debug!(%denial, "listing disclosure denied");
        Err(denial)
    }

    /// Resolves the optional target person of a request.
    ///
    /// # Errors
    ///
    /// - [`AdmissionError::PersonNotFound`] when `person_id` is present but
    ///   does not resolve to a person
    #[tracing::instrument(skip_all)]
    pub async fn find_target_person(
        &self,
        person_id: Option<&str>,
    ) -> Result<Option<Person>, AdmissionError> {
        let Some(id) = person_id else {
            return Ok(None);
        };
        self.stores
            .persons
            .find_by_id(id)
            .await
            .map(Some)
            .ok_or(AdmissionError::PersonNotFound)
    }
}

/// Strips a trailing `:port` from a request host, keeping IPv6 literals
/// intact.
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return host;
    }
    host.rsplit_once(':').map_or(host, |(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::static_directory::{
        CommunityConfig, DirectoryConfig, ListingConfig, PersonConfig, StaticDirectory,
        TokenConfig,
    };
    use admission_sdk::ListingVisibility;

    fn directory() -> DirectoryConfig {
        DirectoryConfig {
            communities: vec![
                CommunityConfig {
                    id: "c1".to_owned(),
                    domains: vec!["market.test".to_owned()],
                    service_name: "Market One".to_owned(),
                    full_url: Some("https://market.test".to_owned()),
                },
                CommunityConfig {
                    id: "c2".to_owned(),
                    domains: vec!["bazaar.test".to_owned()],
                    service_name: "Bazaar".to_owned(),
                    full_url: None,
                },
            ],
            people: vec![
                PersonConfig {
                    id: "p1".to_owned(),
                    community_ids: vec!["c1".to_owned()],
                },
                PersonConfig {
                    id: "p2".to_owned(),
                    community_ids: vec!["c2".to_owned()],
                },
            ],
            listings: vec![
                ListingConfig {
                    id: "l-public".to_owned(),
                    community_id: "c1".to_owned(),
                    visibility: ListingVisibility::Public,
                },
                ListingConfig {
                    id: "l-members".to_owned(),
                    community_id: "c1".to_owned(),
                    visibility: ListingVisibility::Members,
                },
            ],
            tokens: vec![TokenConfig {
                token: "tok-p1".to_owned(),
                person_id: "p1".to_owned(),
            }],
        }
    }

    fn service() -> AdmissionService {
        let dir = Arc::new(StaticDirectory::from_config(&directory()));
        AdmissionService::new(
            Stores {
                communities: dir.clone(),
                listings: dir.clone(),
                credentials: dir.clone(),
                persons: dir,
            },
            AdmissionConfig::default(),
        )
    }

    async fn person(svc: &AdmissionService, id: &str) -> Person {
        svc.stores.persons.find_by_id(id).await.unwrap()
    }

    async fn community(svc: &AdmissionService, id: &str) -> Community {
        svc.stores.communities.find_by_id(id).await.unwrap()
    }

    // ==================== resolve_community tests ====================

    #[tokio::test]
    async fn host_alone_binds_community_and_canonical_url() {
        let svc = service();

        let binding = svc
            .resolve_community("http", "market.test", None)
            .await
            .unwrap();

        assert_eq!(binding.community.unwrap().id, "c1");
        assert_eq!(binding.base_url, "https://market.test");
    }

    #[tokio::test]
    async fn ported_host_still_resolves_but_keeps_port_in_fallback_url() {
        let svc = service();

        let binding = svc
            .resolve_community("http", "market.test:8080", None)
            .await
            .unwrap();
        assert_eq!(binding.community.unwrap().id, "c1");

        let binding = svc
            .resolve_community("http", "nowhere.test:8080", None)
            .await
            .unwrap();
        assert_eq!(binding.base_url, "http://nowhere.test:8080");
    }

    #[tokio::test]
    async fn unknown_host_leaves_request_unbound() {
        let svc = service();

        let binding = svc
            .resolve_community("http", "nowhere.test", None)
            .await
            .unwrap();

        assert!(binding.community.is_none());
        assert_eq!(binding.base_url, "http://nowhere.test");
    }

    #[tokio::test]
    async fn matching_param_and_host_bind_idempotently() {
        let svc = service();

        let binding = svc
            .resolve_community("http", "market.test", Some("c1"))
            .await
            .unwrap();

        assert_eq!(binding.community.unwrap().id, "c1");
    }

    #[tokio::test]
    async fn conflicting_param_and_host_fail() {
        let svc = service();

        let err = svc
            .resolve_community("http", "market.test", Some("c2"))
            .await
            .unwrap_err();

        assert_eq!(err, AdmissionError::CommunityConflict);
    }

    #[tokio::test]
    async fn unknown_param_fails_regardless_of_host() {
        let svc = service();

        let err = svc
            .resolve_community("http", "nowhere.test", Some("missing"))
            .await
            .unwrap_err();
        assert_eq!(err, AdmissionError::CommunityNotFound);

        // Conflict wins over not-found when the host resolves a community.
        let err = svc
            .resolve_community("http", "market.test", Some("missing"))
            .await
            .unwrap_err();
        assert_eq!(err, AdmissionError::CommunityConflict);
    }

    #[tokio::test]
    async fn param_binds_community_without_host_match() {
        let svc = service();

        let binding = svc
            .resolve_community("https", "api.gateway.test", Some("c2"))
            .await
            .unwrap();

        assert_eq!(binding.community.unwrap().id, "c2");
        // full_url was not configured for c2, so it derives from the domain
        assert_eq!(binding.base_url, "https://bazaar.test");
    }

    // ==================== authenticate tests ====================

    #[tokio::test]
    async fn valid_token_resolves_principal() {
        let svc = service();
        let token = SecretString::from("tok-p1".to_owned());

        let person = svc.authenticate(Some(&token)).await.unwrap();

        assert_eq!(person.id, "p1");
    }

    #[tokio::test]
    async fn invalid_or_absent_token_leaves_anonymous() {
        let svc = service();
        let bogus = SecretString::from("bogus".to_owned());

        assert!(svc.authenticate(Some(&bogus)).await.is_none());
        assert!(svc.authenticate(None).await.is_none());
    }

    // ==================== authorize_listing tests ====================

    #[tokio::test]
    async fn visible_listing_is_disclosed() {
        let svc = service();
        let c1 = community(&svc, "c1").await;

        let listing = svc
            .authorize_listing(Some("l-public"), false, None, Some(&c1))
            .await
            .unwrap();

        assert_eq!(listing.unwrap().id, "l-public");
    }

    #[tokio::test]
    async fn member_sees_restricted_listing() {
        let svc = service();
        let c1 = community(&svc, "c1").await;
        let p1 = person(&svc, "p1").await;

        let listing = svc
            .authorize_listing(Some("l-members"), false, Some(&p1), Some(&c1))
            .await
            .unwrap();

        assert_eq!(listing.unwrap().id, "l-members");
    }

    #[tokio::test]
    async fn unknown_listing_is_not_found() {
        let svc = service();
        let c1 = community(&svc, "c1").await;

        let err = svc
            .authorize_listing(Some("missing"), false, None, Some(&c1))
            .await
            .unwrap_err();

        assert_eq!(err, AdmissionError::ListingNotFound);
    }

    #[tokio::test]
    async fn anonymous_caller_is_unauthenticated_on_restricted_listing() {
        let svc = service();
        let c1 = community(&svc, "c1").await;

        let err = svc
            .authorize_listing(Some("l-members"), false, None, Some(&c1))
            .await
            .unwrap_err();

        assert_eq!(err, AdmissionError::ListingUnauthenticated);
    }

    #[tokio::test]
    async fn non_member_is_forbidden_on_restricted_listing() {
        let svc = service();
        let c1 = community(&svc, "c1").await;
        let p2 = person(&svc, "p2").await;

        let err = svc
            .authorize_listing(Some("l-members"), false, Some(&p2), Some(&c1))
            .await
            .unwrap_err();

        assert_eq!(err, AdmissionError::ListingForbidden);
    }

    #[tokio::test]
    async fn public_listing_in_wrong_community_is_a_tenant_mismatch() {
        let svc = service();
        let c2 = community(&svc, "c2").await;
        let p1 = person(&svc, "p1").await;

        // Mismatch is reported before forbidden/unauthenticated even for an
        // authenticated caller.
        let err = svc
            .authorize_listing(Some("l-public"), false, Some(&p1), Some(&c2))
            .await
            .unwrap_err();
        assert_eq!(err, AdmissionError::ListingTenantMismatch);

        let err = svc
            .authorize_listing(Some("l-public"), false, None, Some(&c2))
            .await
            .unwrap_err();
        assert_eq!(err, AdmissionError::ListingTenantMismatch);
    }

    #[tokio::test]
    async fn allow_nil_without_id_allows_with_no_listing_bound() {
        let svc = service();

        let listing = svc.authorize_listing(None, true, None, None).await.unwrap();

        assert!(listing.is_none());
    }

    #[tokio::test]
    async fn missing_id_without_allow_nil_is_not_found() {
        let svc = service();

        let err = svc
            .authorize_listing(None, false, None, None)
            .await
            .unwrap_err();

        assert_eq!(err, AdmissionError::ListingNotFound);
    }

    // ==================== find_target_person tests ====================

    #[tokio::test]
    async fn absent_person_id_binds_nothing() {
        let svc = service();

        assert!(svc.find_target_person(None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn known_person_id_binds_person() {
        let svc = service();

        let person = svc.find_target_person(Some("p2")).await.unwrap().unwrap();

        assert_eq!(person.id, "p2");
    }

    #[tokio::test]
    async fn unknown_person_id_fails() {
        let svc = service();

        let err = svc.find_target_person(Some("ghost")).await.unwrap_err();

        assert_eq!(err, AdmissionError::PersonNotFound);
    }
}
