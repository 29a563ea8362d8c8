//! Config-seeded directory backing the collaborator store interfaces.
//!
//! Production deployments put real tenant/credential services behind the
//! sdk store traits; the static directory loads everything from
//! configuration and keeps it immutable in memory, which is all the
//! gateway binary and the test suites need.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use admission_sdk::{
    Community, CommunityStore, CredentialStore, Listing, ListingStore, ListingVisibility, Person,
    PersonStore,
};

/// Static directory configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Community definitions.
    pub communities: Vec<CommunityConfig>,
    /// Person definitions.
    pub people: Vec<PersonConfig>,
    /// Listing definitions.
    pub listings: Vec<ListingConfig>,
    /// Issued API tokens.
    pub tokens: Vec<TokenConfig>,
}

/// Configuration for a single community.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CommunityConfig {
    pub id: String,
    /// Host-names owned by the community.
    pub domains: Vec<String>,
    /// Display name used for localization.
    pub service_name: String,
    /// Canonical base URL. Defaults to `https://<first domain>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,
}

/// Configuration for a single person.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PersonConfig {
    pub id: String,
    /// Communities the person is a member of.
    #[serde(default)]
    pub community_ids: Vec<String>,
}

/// Configuration for a single listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ListingConfig {
    pub id: String,
    pub community_id: String,
    #[serde(default)]
    pub visibility: ListingVisibility,
}

/// An issued API token bound to one person.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TokenConfig {
    pub token: String,
    pub person_id: String,
}

/// Immutable in-memory directory implementing all collaborator stores.
pub struct StaticDirectory {
    communities: Vec<Community>,
    people: HashMap<String, Person>,
    listings: HashMap<String, Listing>,
    /// token -> person id
    tokens: HashMap<String, String>,
}

impl StaticDirectory {
    /// Builds the directory from configuration.
    #[must_use]
    pub fn from_config(cfg: &DirectoryConfig) -> Self {
        let communities = cfg
            .communities
            .iter()
            .map(|c| Community {
                id: c.id.clone(),
                domains: c.domains.clone(),
                service_name: c.service_name.clone(),
                full_url: c.full_url.clone().unwrap_or_else(|| {
                    let domain = c.domains.first().map_or("", String::as_str);
                    format!("https://{domain}")
                }),
            })
            .collect();

        let people = cfg
            .people
            .iter()
            .map(|p| {
                (
                    p.id.clone(),
                    Person {
                        id: p.id.clone(),
                        community_ids: p.community_ids.clone(),
                    },
                )
            })
            .collect();

        let listings = cfg
            .listings
            .iter()
            .map(|l| {
                (
                    l.id.clone(),
                    Listing {
                        id: l.id.clone(),
                        community_id: l.community_id.clone(),
                        visibility: l.visibility,
                    },
                )
            })
            .collect();

        let tokens = cfg
            .tokens
            .iter()
            .map(|t| (t.token.clone(), t.person_id.clone()))
            .collect();

        Self {
            communities,
            people,
            listings,
            tokens,
        }
    }
}

#[async_trait]
impl CommunityStore for StaticDirectory {
    async fn find_by_host(&self, host: &str) -> Option<Community> {
        self.communities.iter().find(|c| c.owns_domain(host)).cloned()
    }

    async fn find_by_id(&self, id: &str) -> Option<Community> {
        self.communities.iter().find(|c| c.id == id).cloned()
    }
}

#[async_trait]
impl ListingStore for StaticDirectory {
    async fn find_by_id(&self, id: &str) -> Option<Listing> {
        self.listings.get(id).cloned()
    }
}

#[async_trait]
impl CredentialStore for StaticDirectory {
    async fn resolve(&self, token: &str) -> Option<Person> {
        let person_id = self.tokens.get(token)?;
        self.people.get(person_id).cloned()
    }
}

#[async_trait]
impl PersonStore for StaticDirectory {
    async fn find_by_id(&self, id: &str) -> Option<Person> {
        self.people.get(id).cloned()
    }
}
