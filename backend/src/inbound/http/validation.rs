//! Shared validation helpers for inbound HTTP adapters.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use chrono::{DateTime, Local, NaiveDate};
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    EmptyField,
    InvalidUuid,
    InvalidDate,
    OutOfRange,
    MalformedBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::EmptyField => "empty_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::MalformedBody => "malformed_body",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }

    fn with_index(self, code: ErrorCode, index: usize, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn empty_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must not be empty"))
        .with_code(ErrorCode::EmptyField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn out_of_range_index_error(
    field: FieldName,
    index: usize,
    value: impl ToString,
    bounds: &str,
) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} entries must be within {bounds}")).with_index(
        ErrorCode::OutOfRange,
        index,
        value.to_string(),
    )
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn invalid_date_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(
        field,
        format!("{field} must be an ISO 8601 date or RFC 3339 timestamp"),
    )
    .with_value(ErrorCode::InvalidDate, value)
}

/// Parse a calendar day from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Timestamps are converted to server local time before truncation so the day
/// matches the one habits are dated with.
pub(crate) fn parse_calendar_day(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Local).date_naive())
        .map_err(|_| invalid_date_error(field, value))
}

fn malformed_body_error(message: impl Into<String>) -> Error {
    ValidationError::new("body", message).with_code(ErrorCode::MalformedBody)
}

/// JSON extractor configuration reporting payload errors as `invalid_request`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        malformed_body_error(format!("request body is not valid: {err}")).into()
    })
}

/// Query extractor configuration reporting parse errors as `invalid_request`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        Error::invalid_request(format!("query string is not valid: {err}")).into()
    })
}

/// Path extractor configuration reporting parse errors as `invalid_request`.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        Error::invalid_request(format!("path is not valid: {err}")).into()
    })
}
