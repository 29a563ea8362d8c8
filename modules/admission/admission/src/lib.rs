//! Request-admission module for the Marketgate API.
//!
//! Every inbound API request passes the admission gate before any resource
//! logic runs: credential extraction, protocol negotiation, community
//! (tenant) resolution, identity resolution and pagination normalization.
//! Resource-scoped endpoints additionally go through the listing visibility
//! authorizer, exposed here as axum extractors.

// === PUBLIC CONTRACT ===
pub use admission_sdk as contract;

// === INTERNAL ===
pub mod api;
pub mod config;
pub mod domain;
pub mod infra;

pub use config::AdmissionConfig;
pub use domain::service::{AdmissionService, Stores};
