#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::unused_async)] // axum handler signatures

//! Shared fixtures for the admission integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::routing::get;
use axum::{Json, Router};
use http::{Method, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use admission::api::rest::extract::{
    Admitted, OptionalVisibleListing, ScopedCommunity, TargetPerson,
};
use admission::api::rest::middleware::{AdmissionState, admission_middleware};
use admission::infra::static_directory::{
    CommunityConfig, DirectoryConfig, ListingConfig, PersonConfig, StaticDirectory, TokenConfig,
};
use admission::{AdmissionConfig, AdmissionService, Stores};
use admission_sdk::{ListingVisibility, ResponseFormat};

/// Two communities, two people, a public and a members-only listing.
pub fn directory_config() -> DirectoryConfig {
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
        tokens: vec![
            TokenConfig {
                token: "tok-p1".to_owned(),
                person_id: "p1".to_owned(),
            },
            TokenConfig {
                token: "tok-p2".to_owned(),
                person_id: "p2".to_owned(),
            },
        ],
    }
}

pub fn admission_service(config: AdmissionConfig) -> Arc<AdmissionService> {
    let directory = Arc::new(StaticDirectory::from_config(&directory_config()));
    Arc::new(AdmissionService::new(
        Stores {
            communities: directory.clone(),
            listings: directory.clone(),
            credentials: directory.clone(),
            persons: directory,
        },
        config,
    ))
}

/// The module's own router (version check + listing disclosure).
pub fn app() -> Router {
    app_with_config(AdmissionConfig::default())
}

pub fn app_with_config(config: AdmissionConfig) -> Router {
    admission::api::rest::router(admission_service(config))
}

/// Probe router exposing the admission context and the guard extractors
/// the way an external resource module would.
pub fn probe_app() -> Router {
    let state = AdmissionState {
        service: admission_service(AdmissionConfig::default()),
    };

    Router::new()
        .route("/probe/ctx", get(echo_ctx))
        .route("/probe/community", get(echo_community))
        .route("/probe/listings", get(echo_listings))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            admission_middleware,
        ))
        .with_state(state)
}

async fn echo_ctx(Admitted(ctx): Admitted) -> Json<Value> {
    Json(json!({
        "community_id": ctx.community_id(),
        "person_id": ctx.person.as_ref().map(|p| p.id.clone()),
        "page": ctx.pagination.page,
        "per_page": ctx.pagination.per_page,
        "base_url": ctx.base_url,
        "service_name": ctx.service_name,
        "json_pinned": ctx.response_format == ResponseFormat::Json,
    }))
}

async fn echo_community(ScopedCommunity(community): ScopedCommunity) -> Json<Value> {
    Json(json!({ "community_id": community.id }))
}

async fn echo_listings(
    OptionalVisibleListing(listing): OptionalVisibleListing,
    TargetPerson(person): TargetPerson,
    Admitted(ctx): Admitted,
) -> Json<Value> {
    Json(json!({
        "listing_id": listing.map(|l| l.id),
        "target_person_id": person.map(|p| p.id),
        "page": ctx.pagination.page,
    }))
}

/// Fires a GET request and returns status plus parsed JSON body.
pub async fn get_json(
    app: Router,
    uri: &str,
    headers: &[(&str, &str)],
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Fires a GET request with only a `Host` header.
pub async fn get_from_host(app: Router, uri: &str, host: &str) -> (StatusCode, Value) {
    get_json(app, uri, &[("host", host)]).await
}
