//! REST API DTOs for the admission module.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use admission_sdk::{Listing, ListingVisibility};

use crate::domain::version::VersionStatus;

/// Query parameters recognized by the admission gate on every request.
///
/// Unknown parameters are ignored; all recognized parameters are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdmissionParams {
    /// Credential parameter slot (may instead arrive in the
    /// `Marketgate-API-Token` header).
    pub api_token: Option<String>,
    /// Explicit community binding.
    pub community_id: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl AdmissionParams {
    /// Parses the admission parameters from a raw query string.
    ///
    /// A malformed query yields the defaults: admission never fails on
    /// unparsable input, it simply sees no parameters.
    #[must_use]
    pub fn from_query(query: Option<&str>) -> Self {
        query
            .and_then(|q| serde_urlencoded::from_str(q).ok())
            .unwrap_or_default()
    }
}

/// Query parameters of the version check endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionCheckQuery {
    /// Version the client software declares to speak.
    pub api_version: Option<String>,
}

/// Response of the version check endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VersionCheckResponse {
    /// Support status of the declared version.
    pub your_version: String,
    /// Always null; reserved for operator notices.
    pub message: Option<String>,
}

impl From<VersionStatus> for VersionCheckResponse {
    fn from(status: VersionStatus) -> Self {
        Self {
            your_version: status.as_str().to_owned(),
            message: None,
        }
    }
}

/// Disclosure DTO for an admitted listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListingDto {
    pub id: String,
    pub community_id: String,
    pub visibility: ListingVisibilityDto,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ListingVisibilityDto {
    Public,
    Members,
}

impl From<ListingVisibility> for ListingVisibilityDto {
    fn from(v: ListingVisibility) -> Self {
        match v {
            ListingVisibility::Public => Self::Public,
            ListingVisibility::Members => Self::Members,
        }
    }
}

impl From<Listing> for ListingDto {
    fn from(l: Listing) -> Self {
        Self {
            id: l.id,
            community_id: l.community_id,
            visibility: l.visibility.into(),
        }
    }
}
