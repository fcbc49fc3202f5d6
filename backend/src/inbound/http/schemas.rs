//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The session credential is missing, invalid or expired.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The habit belongs to another user.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A concurrent writer won; retry the request.
    #[schema(rename = "conflict")]
    Conflict,
    /// The identity provider failed.
    #[schema(rename = "upstream_error")]
    UpstreamError,
    /// The store is temporarily unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "title must not be empty")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details such as the offending field.
    details: Option<serde_json::Value>,
}
