use http::StatusCode;
use serde::{Deserialize, Serialize};

fn default_api_enabled() -> bool {
    true
}

fn default_disabled_status() -> u16 {
    403
}

/// Admission layer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AdmissionConfig {
    /// Master switch for the API surface. When false, every admission-gated
    /// request is rejected before any other processing.
    pub api_enabled: bool,

    /// Status code returned while the API is administratively disabled.
    pub disabled_status: u16,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            api_enabled: default_api_enabled(),
            disabled_status: default_disabled_status(),
        }
    }
}

impl AdmissionConfig {
    /// The configured disabled status as a `StatusCode`.
    ///
    /// Falls back to 403 Forbidden if the configured value is not a valid
    /// status code.
    #[must_use]
    pub fn disabled_status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.disabled_status).unwrap_or(StatusCode::FORBIDDEN)
    }
}
