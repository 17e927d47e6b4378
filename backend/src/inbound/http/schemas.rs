//! OpenAPI schemas for the error envelope.
//!
//! `domain::Error` stays free of `utoipa` derives; these mirrors describe its
//! serialised shape so the generated document matches what clients receive.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Malformed input or a failed validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No session, or the session expired.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Signed in but not allowed, or outside the institution domain.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// No such item or account.
    #[schema(rename = "not_found")]
    NotFound,
    /// The item cannot be claimed in its current state.
    #[schema(rename = "conflict")]
    Conflict,
    /// Storage is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// Unexpected server failure; the message is redacted.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Machine-readable refinement carried in `details`.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorDetailsSchema {
    /// Specific reason, such as `item_not_claimable` or `invalid_category`.
    #[schema(example = "self_claim_forbidden")]
    code: String,
    /// Required item fields absent from a create request.
    #[schema(example = json!(["title", "contactInfo"]))]
    missing_fields: Option<Vec<String>>,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable error category.
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    /// Message safe to show to a person.
    #[schema(example = "Item is not available for claiming")]
    message: String,
    /// Identifier echoed in the `trace-id` response header.
    #[schema(example = "6f1c2f4e-8a1b-4c2d-9e3f-0a1b2c3d4e5f")]
    trace_id: Option<String>,
    /// Refinement of `code`, when one applies.
    details: Option<ErrorDetailsSchema>,
}
