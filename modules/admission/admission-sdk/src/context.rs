//! Per-request admission state.
//!
//! `RequestContext` is built once by the admission middleware and inserted
//! into the request extensions. It is never shared across requests; the
//! localization service name travels here instead of any process-global
//! slot so concurrent requests cannot observe each other's tenant.

use secrecy::SecretString;

use crate::models::{Community, Person};

/// Default page number when the caller does not send one.
pub const DEFAULT_PAGE: &str = "1";

/// Default page size when the caller does not send one.
pub const DEFAULT_PER_PAGE: &str = "50";

/// Normalized pagination parameters.
///
/// Values are carried as raw strings: this layer only supplies defaults,
/// numeric well-formedness is left to the downstream consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: String,
    pub per_page: String,
}

impl Pagination {
    /// Derives pagination from the raw query parameters, applying defaults
    /// for absent values and passing present values through unchanged.
    #[must_use]
    pub fn from_params(page: Option<String>, per_page: Option<String>) -> Self {
        Self {
            page: page.unwrap_or_else(|| DEFAULT_PAGE.to_owned()),
            per_page: per_page.unwrap_or_else(|| DEFAULT_PER_PAGE.to_owned()),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::from_params(None, None)
    }
}

/// Selected response representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Leave representation selection to default content-type rules.
    #[default]
    Negotiated,
    /// Structured JSON was pinned by the vendor media type.
    Json,
}

/// Request-scoped admission result.
///
/// Created at request start, discarded at request end.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// The community the request is bound to, if any.
    pub community: Option<Community>,
    /// The authenticated caller, if any.
    pub person: Option<Person>,
    /// Normalized pagination parameters.
    pub pagination: Pagination,
    /// Base URL for building links: derived from the request host, then
    /// overridden by the bound community's canonical URL.
    pub base_url: String,
    /// Service name of the bound community, used for localization of
    /// response content by downstream renderers.
    pub service_name: Option<String>,
    /// Selected response representation.
    pub response_format: ResponseFormat,
    /// Canonical credential slot. `Debug` output redacts the value.
    pub api_token: Option<SecretString>,
}

impl RequestContext {
    /// Id of the bound community, if any.
    #[must_use]
    pub fn community_id(&self) -> Option<&str> {
        self.community.as_ref().map(|c| c.id.as_str())
    }

    /// Returns `true` if a principal was resolved for this request.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.person.is_some()
    }
}
