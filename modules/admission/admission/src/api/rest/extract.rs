//! Axum extractors exposing the admission guards to resource handlers.
//!
//! Resource-scoped endpoints (this module's own and the external CRUD
//! collaborators alike) declare their admission requirements through these
//! extractors; a failed requirement rejects the request with the designated
//! status before any handler logic runs.

use std::collections::HashMap;

use axum::extract::{FromRef, FromRequestParts, Path};
use http::StatusCode;
use http::request::Parts;
use serde::Deserialize;

use admission_sdk::{Community, Listing, Person, RequestContext};

use crate::api::rest::error::ApiError;
use crate::api::rest::middleware::AdmissionState;
use crate::domain::error::AdmissionError;

/// The admission result for this request.
///
/// Available on every route behind the admission middleware.
#[derive(Debug, Clone)]
pub struct Admitted(pub RequestContext);

impl<S> FromRequestParts<S> for Admitted
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        admission_context(parts).map(Admitted)
    }
}

/// Requires a bound community (tenant-scoped endpoints).
#[derive(Debug, Clone)]
pub struct ScopedCommunity(pub Community);

impl<S> FromRequestParts<S> for ScopedCommunity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = admission_context(parts)?;
        ctx.community
            .map(ScopedCommunity)
            .ok_or_else(|| ApiError::from(AdmissionError::CommunityRequired))
    }
}

/// Requires a listing the caller may see.
///
/// The listing id is resolved from the `listing_id` then `id` parameter
/// slots; path parameters take precedence over query parameters.
#[derive(Debug, Clone)]
pub struct VisibleListing(pub Listing);

impl<S> FromRequestParts<S> for VisibleListing
where
    S: Send + Sync,
    AdmissionState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let listing = authorize(parts, state, false).await?;
        listing
            .map(VisibleListing)
            .ok_or_else(|| ApiError::from(AdmissionError::ListingNotFound))
    }
}

/// Like [`VisibleListing`], but an absent listing id is allowed and binds
/// nothing (list endpoints that do not target one resource).
#[derive(Debug, Clone)]
pub struct OptionalVisibleListing(pub Option<Listing>);

impl<S> FromRequestParts<S> for OptionalVisibleListing
where
    S: Send + Sync,
    AdmissionState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authorize(parts, state, true).await.map(OptionalVisibleListing)
    }
}

/// Resolves the optional target person from the `person_id` parameter.
#[derive(Debug, Clone)]
pub struct TargetPerson(pub Option<Person>);

impl<S> FromRequestParts<S> for TargetPerson
where
    S: Send + Sync,
    AdmissionState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AdmissionState::from_ref(state);
        let person_id = param(parts, "person_id").await;
        let person = state
            .service
            .find_target_person(person_id.as_deref())
            .await?;
        Ok(TargetPerson(person))
    }
}

async fn authorize<S>(
    parts: &mut Parts,
    state: &S,
    allow_nil: bool,
) -> Result<Option<Listing>, ApiError>
where
    S: Send + Sync,
    AdmissionState: FromRef<S>,
{
    let state = AdmissionState::from_ref(state);
    let ctx = admission_context(parts)?;
    let id = listing_id(parts).await;
    let listing = state
        .service
        .authorize_listing(
            id.as_deref(),
            allow_nil,
            ctx.person.as_ref(),
            ctx.community.as_ref(),
        )
        .await?;
    Ok(listing)
}

fn admission_context(parts: &Parts) -> Result<RequestContext, ApiError> {
    parts.extensions.get::<RequestContext>().cloned().ok_or_else(|| {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "admission context not found - admission middleware not configured",
        )
    })
}

#[derive(Debug, Default, Deserialize)]
struct ListingParams {
    listing_id: Option<String>,
    id: Option<String>,
}

/// Listing id from the `listing_id` then `id` slots, path before query.
async fn listing_id(parts: &mut Parts) -> Option<String> {
    let path = path_params(parts).await;
    let query: ListingParams = query_params(parts);
    path.get("listing_id")
        .cloned()
        .or(query.listing_id)
        .or_else(|| path.get("id").cloned())
        .or(query.id)
}

/// A single named parameter, path before query.
async fn param(parts: &mut Parts, name: &str) -> Option<String> {
    let path = path_params(parts).await;
    if let Some(value) = path.get(name) {
        return Some(value.clone());
    }
    let query: HashMap<String, String> = query_params(parts);
    query.get(name).cloned()
}

async fn path_params(parts: &mut Parts) -> HashMap<String, String> {
    Path::<HashMap<String, String>>::from_request_parts(parts, &())
        .await
        .map(|Path(map)| map)
        .unwrap_or_default()
}

fn query_params<T>(parts: &Parts) -> T
where
    T: Default + serde::de::DeserializeOwned,
{
    parts
        .uri
        .query()
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default()
}

// Note: the extractors are exercised end-to-end in tests/, where the full
// router and admission middleware stack is in place.
