//! HTTP rendering of admission errors.
//!
//! Every denial is a status code plus a single-element JSON array holding
//! one human-readable message. Denials are expected outcomes and are not
//! logged as system failures.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::config::AdmissionConfig;
use crate::domain::error::AdmissionError;

/// A terminal admission response.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Status code mapping for the admission error taxonomy.
///
/// `ApiDisabled` maps to its default here; the middleware substitutes the
/// configured status via [`disabled_response`].
#[must_use]
pub fn admission_error_status(err: &AdmissionError) -> StatusCode {
    match err {
        AdmissionError::ApiDisabled | AdmissionError::ListingForbidden => StatusCode::FORBIDDEN,
        AdmissionError::CommunityConflict
        | AdmissionError::CommunityRequired
        | AdmissionError::ListingTenantMismatch => StatusCode::BAD_REQUEST,
        AdmissionError::CommunityNotFound
        | AdmissionError::ListingNotFound
        | AdmissionError::PersonNotFound => StatusCode::NOT_FOUND,
        AdmissionError::ListingUnauthenticated => StatusCode::UNAUTHORIZED,
    }
}

impl From<AdmissionError> for ApiError {
    fn from(err: AdmissionError) -> Self {
        Self::new(admission_error_status(&err), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(vec![self.message])).into_response()
    }
}

/// Response for the administratively disabled API, honoring the configured
/// status code.
#[must_use]
pub fn disabled_response(config: &AdmissionConfig) -> Response {
    ApiError::new(
        config.disabled_status_code(),
        AdmissionError::ApiDisabled.to_string(),
    )
    .into_response()
}
