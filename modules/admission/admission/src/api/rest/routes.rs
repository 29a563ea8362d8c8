use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::api::rest::handlers;
use crate::api::rest::middleware::{AdmissionState, admission_middleware};
use crate::domain::service::AdmissionService;

/// Builds the admission router.
///
/// Every route sits behind the admission middleware. External resource
/// modules merge their own routers with this state and reuse the
/// extractors from [`crate::api::rest::extract`].
#[must_use]
pub fn router(service: Arc<AdmissionService>) -> Router {
    let state = AdmissionState { service };

    Router::new()
        .route("/api/version_check", get(handlers::version_check))
        .route("/api/listings/{listing_id}", get(handlers::get_listing))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            admission_middleware,
        ))
        .with_state(state)
}
