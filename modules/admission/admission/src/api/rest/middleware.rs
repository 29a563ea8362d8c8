//! The admission gate.
//!
//! Runs for every request, in order: credential extraction, kill-switch
//! check, protocol negotiation, community resolution, identity resolution
//! and pagination normalization. The resulting [`RequestContext`] is
//! inserted into the request extensions for handlers and extractors.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::HeaderMap;
use secrecy::SecretString;

use admission_sdk::{Pagination, RequestContext, ResponseFormat};

use crate::api::rest::dto::AdmissionParams;
use crate::api::rest::error::{ApiError, disabled_response};
use crate::domain::service::AdmissionService;

/// Header carrying the API credential when the `api_token` parameter slot
/// is unused.
pub const API_TOKEN_HEADER: &str = "marketgate-api-token";

/// Vendor media type that pins the response representation to JSON.
pub const VENDOR_JSON_MEDIA_TYPE: &str = "application/vnd.marketgate+json";

/// Shared state of the admission gate.
#[derive(Clone)]
pub struct AdmissionState {
    pub service: Arc<AdmissionService>,
}

/// Admission middleware.
///
/// Denials short-circuit the request; on success the handler runs with a
/// fully populated [`RequestContext`] extension.
pub async fn admission_middleware(
    State(state): State<AdmissionState>,
    mut req: Request,
    next: Next,
) -> Response {
    let params = AdmissionParams::from_query(req.uri().query());
    let api_token = extract_api_token(&params, req.headers());

    let service = &state.service;
    if !service.config().api_enabled {
        tracing::debug!("request rejected, API disabled");
        return disabled_response(service.config());
    }

    let response_format = negotiate_format(req.headers());

    let host = request_host(&req);
    let scheme = request_scheme(req.headers());
    let binding = match service
        .resolve_community(scheme, &host, params.community_id.as_deref())
        .await
    {
        Ok(binding) => binding,
        Err(err) => return ApiError::from(err).into_response(),
    };

    let person = service.authenticate(api_token.as_ref()).await;
    let pagination = Pagination::from_params(params.page, params.per_page);

    let service_name = binding.community.as_ref().map(|c| c.service_name.clone());
    let ctx = RequestContext {
        community: binding.community,
        person,
        pagination,
        base_url: binding.base_url,
        service_name,
        response_format,
        api_token,
    };
    req.extensions_mut().insert(ctx);
    next.run(req).await
}

/// Pulls the API credential into the canonical slot.
///
/// The header is consulted only when the parameter slot is empty; a present
/// parameter is never overwritten.
pub(crate) fn extract_api_token(
    params: &AdmissionParams,
    headers: &HeaderMap,
) -> Option<SecretString> {
    if let Some(token) = params.api_token.as_deref().filter(|t| !t.is_empty()) {
        return Some(SecretString::from(token.to_owned()));
    }
    headers
        .get(API_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|t| !t.is_empty())
        .map(|t| SecretString::from(t.to_owned()))
}

/// Pins the response representation to JSON when the vendor media type is
/// present in the `Accept` header (case-insensitive).
pub(crate) fn negotiate_format(headers: &HeaderMap) -> ResponseFormat {
    let accept = headers
        .get(http::header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if accept.to_ascii_lowercase().contains(VENDOR_JSON_MEDIA_TYPE) {
        ResponseFormat::Json
    } else {
        ResponseFormat::Negotiated
    }
}

/// Request scheme, honoring a forwarding proxy.
fn request_scheme(headers: &HeaderMap) -> &str {
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http")
}

/// Request host (with port, when sent) from the `Host` header or the
/// request target.
fn request_host(req: &Request) -> String {
    req.headers()
        .get(http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
        .or_else(|| req.uri().authority().map(|a| a.as_str().to_owned()))
        .unwrap_or_default()
}
