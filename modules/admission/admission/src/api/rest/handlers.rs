//! REST API handlers for the admission module.

use axum::Json;
use axum::extract::Query;

use crate::api::rest::dto::{ListingDto, VersionCheckQuery, VersionCheckResponse};
use crate::api::rest::extract::VisibleListing;
use crate::domain::version::VersionStatus;

/// GET /api/version_check
///
/// Reports whether the client's declared protocol version is current.
/// Always answers 200; the admission gate in front of it may still reject
/// the request.
#[tracing::instrument(skip_all)]
#[allow(clippy::unused_async)] // axum handler signature
pub async fn version_check(Query(query): Query<VersionCheckQuery>) -> Json<VersionCheckResponse> {
    let status = VersionStatus::from_declared(query.api_version.as_deref());
    Json(status.into())
}

/// GET /api/listings/{listing_id}
///
/// Representative resource-scoped endpoint: the visibility authorizer runs
/// through the [`VisibleListing`] extractor and short-circuits denials.
#[tracing::instrument(skip_all)]
#[allow(clippy::unused_async)] // axum handler signature
pub async fn get_listing(VisibleListing(listing): VisibleListing) -> Json<ListingDto> {
    Json(listing.into())
}
