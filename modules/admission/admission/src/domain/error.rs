use thiserror::Error;

/// Admission outcomes that terminate the current request.
///
/// These are expected, user-facing policy decisions, not system failures:
/// detection immediately produces the designated status and message payload
/// and no further handler logic runs. There is no recovery path inside the
/// admission layer; the caller must correct their request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// The API surface is administratively disabled.
    #[error("API is not enabled on this server")]
    ApiDisabled,

    /// Host-based and parameter-based community binding disagree.
    #[error(
        "Community subdomain mismatch with community_id given in params. Using one of these is enough."
    )]
    CommunityConflict,

    /// The `community_id` parameter does not resolve to a community.
    #[error("No community found with given id")]
    CommunityNotFound,

    /// The endpoint requires community scoping but none was bound.
    #[error("Community must be selected. Easiest done by providing a community_id parameter.")]
    CommunityRequired,

    /// No listing exists for the given id.
    #[error("No listing found with given id")]
    ListingNotFound,

    /// The listing is public but the request is scoped to another community.
    #[error("This listing is not visible in given community.")]
    ListingTenantMismatch,

    /// An authenticated caller lacks permission to see the listing.
    #[error("The user doesn't have a permission to see this listing")]
    ListingForbidden,

    /// An anonymous caller may not see the listing.
    #[error("This listing is not visible to unregistered users.")]
    ListingUnauthenticated,

    /// The `person_id` parameter does not resolve to a person.
    #[error("No user found with person_id")]
    PersonNotFound,
}
