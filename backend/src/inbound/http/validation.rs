//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper builds an `invalid_request` error whose `details` carry the
//! offending `field`, a machine-readable `code`, and the rejected `value`
//! when one exists.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::json;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidTimestamp,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
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

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code,
        }))
    }

    fn with_value(self, code: &str, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code,
        }))
    }

    fn with_index(self, code: &str, index: usize) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "code": code,
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    ValidationError::new(field, format!("missing required field: {}", field.as_str()))
        .with_code(ErrorCode::MissingField.as_str())
}

/// A required field inside the `index`th element of a list.
pub(crate) fn missing_item_field_error(list: FieldName, index: usize, field: &str) -> Error {
    ValidationError::new(
        list,
        format!("missing required field: {}[{index}].{field}", list.as_str()),
    )
    .with_index(ErrorCode::MissingField.as_str(), index)
}

/// An element of a list that fails a domain rule.
pub(crate) fn invalid_item_error(
    list: FieldName,
    index: usize,
    code: &str,
    message: impl Into<String>,
) -> Error {
    ValidationError::new(list, message).with_index(code, index)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    ValidationError::new(field, format!("{} must be a valid UUID", field.as_str()))
        .with_value(ErrorCode::InvalidUuid.as_str(), value)
}

/// A field whose value fails a domain rule, tagged with a specific `code`.
pub(crate) fn invalid_field_error(
    field: FieldName,
    code: &str,
    message: impl Into<String>,
) -> Error {
    ValidationError::new(field, message).with_code(code)
}

/// Parse an identifier, reporting failures against `field`.
pub(crate) fn parse_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value.parse().map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_optional_id<T: FromStr>(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<T>, Error> {
    value.map(|raw| parse_id(raw, field)).transpose()
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    ValidationError::new(
        field,
        format!(
            "{} must be an RFC 3339 timestamp or YYYY-MM-DDTHH:MM[:SS]",
            field.as_str()
        ),
    )
    .with_value(ErrorCode::InvalidTimestamp.as_str(), value)
}

const ZONELESS_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a play timestamp.
///
/// Accepts RFC 3339 or a zone-less local form such as `2024-05-01T19:30`,
/// which is read as UTC.
pub(crate) fn parse_timestamp(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    ZONELESS_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| invalid_timestamp_error(field, value))
}
