//! Domain models for the admission layer.
//!
//! All identifiers are canonical strings; id equality is string equality.

use serde::{Deserialize, Serialize};

/// A community is the tenant unit of the marketplace.
///
/// Every listing is scoped to exactly one community. A community owns one
/// or more host-names and carries the display name used for localization
/// of response content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    /// Unique community identifier.
    pub id: String,
    /// Host-names owned by this community.
    pub domains: Vec<String>,
    /// Display name used when localizing response content.
    pub service_name: String,
    /// Canonical base URL for links that should point at this community
    /// instead of the host the request arrived on.
    pub full_url: String,
}

impl Community {
    /// Returns `true` if the community owns the given request host.
    #[must_use]
    pub fn owns_domain(&self, host: &str) -> bool {
        self.domains.iter().any(|d| d == host)
    }
}

/// An authenticated caller. An absent person means an anonymous request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique person identifier.
    pub id: String,
    /// Communities this person is a member of.
    #[serde(default)]
    pub community_ids: Vec<String>,
}

impl Person {
    /// Returns `true` if the person is a member of the given community.
    #[must_use]
    pub fn is_member_of(&self, community_id: &str) -> bool {
        self.community_ids.iter().any(|id| id == community_id)
    }
}

/// Visibility policy attached to a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingVisibility {
    /// Disclosed to everybody within the listing's community.
    #[default]
    Public,
    /// Disclosed only to members of the listing's community.
    Members,
}

/// A listing is the protected, community-scoped resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Unique listing identifier.
    pub id: String,
    /// The community that scopes this listing.
    pub community_id: String,
    /// Disclosure policy.
    #[serde(default)]
    pub visibility: ListingVisibility,
}

/// Disclosure capability exposed by every protected resource.
///
/// The visibility authorizer makes its decision through this trait so that
/// further resource kinds can plug into the same decision procedure.
pub trait Visibility {
    /// Whether the resource may be disclosed to the given caller in the
    /// given community context.
    fn is_visible_to(&self, person: Option<&Person>, community: Option<&Community>) -> bool;

    /// Whether the resource is public within its own community.
    fn is_public(&self) -> bool;
}

impl Visibility for Listing {
    fn is_visible_to(&self, person: Option<&Person>, community: Option<&Community>) -> bool {
        let Some(community) = community else {
            return false;
        };
        if community.id != self.community_id {
            return false;
        }
        match self.visibility {
            ListingVisibility::Public => true,
            ListingVisibility::Members => {
                person.is_some_and(|p| p.is_member_of(&self.community_id))
            }
        }
    }

    fn is_public(&self) -> bool {
        self.visibility == ListingVisibility::Public
    }
}
