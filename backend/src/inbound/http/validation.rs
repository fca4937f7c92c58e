//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection is an `invalid_request` error whose `details` carry the
//! offending `field` and a machine-readable `code`.

use actix_web::{HttpRequest, error::JsonPayloadError, web};
use serde_json::json;
use tracing::debug;

use crate::domain::{Error, StudentValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    EmptyName,
    NameTooLong,
    EmptyEmail,
    EmailTooLong,
    InvalidEmail,
    InvalidJson,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::EmptyName => "empty_name",
            ErrorCode::NameTooLong => "name_too_long",
            ErrorCode::EmptyEmail => "empty_email",
            ErrorCode::EmailTooLong => "email_too_long",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidJson => "invalid_json",
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

pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const EMAIL: FieldName = FieldName::new("email");

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

/// Unwrap an optional body field or report it as missing.
pub(crate) fn require_field(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Translate a domain validation failure into a field-scoped HTTP error.
///
/// Request bodies never carry an id, so an id failure here is a server bug
/// and is reported as an internal error.
pub(crate) fn map_student_validation_error(err: StudentValidationError) -> Error {
    let message = err.to_string();
    match err {
        StudentValidationError::EmptyName => field_error(NAME, ErrorCode::EmptyName, message),
        StudentValidationError::NameTooLong { .. } => {
            field_error(NAME, ErrorCode::NameTooLong, message)
        }
        StudentValidationError::EmptyEmail => field_error(EMAIL, ErrorCode::EmptyEmail, message),
        StudentValidationError::EmailTooLong { .. } => {
            field_error(EMAIL, ErrorCode::EmailTooLong, message)
        }
        StudentValidationError::InvalidEmail => {
            field_error(EMAIL, ErrorCode::InvalidEmail, message)
        }
        StudentValidationError::InvalidId => Error::internal(message),
    }
}

fn invalid_json_error(err: &JsonPayloadError) -> Error {
    Error::invalid_request("request body must be a valid JSON object").with_details(json!({
        "code": ErrorCode::InvalidJson.as_str(),
        "reason": err.to_string(),
    }))
}

/// JSON extractor configuration that reports malformed bodies using the
/// shared error payload instead of Actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        debug!(error = %err, "rejected malformed JSON body");
        let error = invalid_json_error(&err);
        error.into()
    })
}
