//! Admission SDK
//!
//! This crate provides the public contract for the `admission` module:
//!
//! - [`Community`], [`Person`], [`Listing`] - Domain models
//! - [`Visibility`] - Capability trait implemented by protected resources
//! - [`RequestContext`] - Per-request admission state passed to handlers
//! - [`CommunityStore`], [`ListingStore`], [`CredentialStore`],
//!   [`PersonStore`] - Collaborator store interfaces
//!
//! ## Usage
//!
//! Downstream resource modules read the admission result from the request
//! extensions and consume the stores through the traits defined here:
//!
//! ```ignore
//! use admission_sdk::RequestContext;
//!
//! async fn my_handler(Extension(ctx): Extension<RequestContext>) { ... }
//! ```

pub mod api;
pub mod context;
pub mod models;

// Re-export main types at crate root
pub use api::{CommunityStore, CredentialStore, ListingStore, PersonStore};
pub use context::{Pagination, RequestContext, ResponseFormat};
pub use models::{Community, Listing, ListingVisibility, Person, Visibility};
