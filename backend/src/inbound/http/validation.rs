//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request DTOs keep their fields optional and loosely typed so that every
//! malformed input is reported through the domain `Error` envelope with a
//! `details` object naming the offending field.

use actix_web::web;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::json;
use tracing::debug;

use crate::domain::{
    AllocationId, AllocationStatus, EmployeeId, Error, IDENTIFIER_MAX, IDENTIFIER_MIN,
    PageRequest, VehicleId,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidTimestamp,
    InvalidInteger,
    OutOfRange,
    InvalidStatus,
    MalformedBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidInteger => "invalid_integer",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::InvalidStatus => "invalid_status",
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

pub(crate) const EMPLOYEE_ID: FieldName = FieldName::new("employee_id");
pub(crate) const VEHICLE_ID: FieldName = FieldName::new("vehicle_id");
pub(crate) const ALLOCATION_DATE: FieldName = FieldName::new("allocation_date");
pub(crate) const PURPOSE: FieldName = FieldName::new("purpose");
pub(crate) const STATUS: FieldName = FieldName::new("status");
pub(crate) const START_DATE: FieldName = FieldName::new("start_date");
pub(crate) const END_DATE: FieldName = FieldName::new("end_date");
pub(crate) const SKIP: FieldName = FieldName::new("skip");
pub(crate) const LIMIT: FieldName = FieldName::new("limit");

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
}

/// Treat absent, `null` and blank strings alike.
pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(
        field,
        format!("{field} must be an RFC 3339 timestamp or a YYYY-MM-DD date"),
    )
    .with_value(ErrorCode::InvalidTimestamp, value)
}

fn identifier_range_error(field: FieldName, value: i64) -> Error {
    let field = field.as_str();
    ValidationError::new(
        field,
        format!("{field} must be between {IDENTIFIER_MIN} and {IDENTIFIER_MAX}"),
    )
    .with_value(ErrorCode::OutOfRange, value.to_string())
}

fn invalid_integer_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be an integer"))
        .with_value(ErrorCode::InvalidInteger, value)
}

/// Parse an allocation instant.
///
/// Accepts RFC 3339 timestamps, naive date-times (read as UTC) and bare
/// `YYYY-MM-DD` dates (midnight UTC).
pub(crate) fn parse_allocation_date(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    let trimmed = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| invalid_timestamp_error(field, value))
}

pub(crate) fn parse_optional_allocation_date(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    blank_to_none(value)
        .map(|raw| parse_allocation_date(&raw, field))
        .transpose()
}

pub(crate) fn parse_employee_id(value: i64) -> Result<EmployeeId, Error> {
    EmployeeId::new(value).map_err(|_| identifier_range_error(EMPLOYEE_ID, value))
}

pub(crate) fn parse_vehicle_id(value: i64) -> Result<VehicleId, Error> {
    VehicleId::new(value).map_err(|_| identifier_range_error(VEHICLE_ID, value))
}

fn parse_integer(value: &str, field: FieldName) -> Result<i64, Error> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| invalid_integer_error(field, value))
}

pub(crate) fn parse_optional_employee_id(
    value: Option<String>,
) -> Result<Option<EmployeeId>, Error> {
    blank_to_none(value)
        .map(|raw| parse_integer(&raw, EMPLOYEE_ID).and_then(parse_employee_id))
        .transpose()
}

pub(crate) fn parse_optional_vehicle_id(value: Option<String>) -> Result<Option<VehicleId>, Error> {
    blank_to_none(value)
        .map(|raw| parse_integer(&raw, VEHICLE_ID).and_then(parse_vehicle_id))
        .transpose()
}

pub(crate) fn parse_status(value: &str) -> Result<AllocationStatus, Error> {
    value.parse::<AllocationStatus>().map_err(|_| {
        ValidationError::new(
            STATUS.as_str(),
            "status must be one of pending, active, completed, cancelled",
        )
        .with_value(ErrorCode::InvalidStatus, value)
    })
}

pub(crate) fn parse_optional_status(
    value: Option<String>,
) -> Result<Option<AllocationStatus>, Error> {
    blank_to_none(value).map(|raw| parse_status(&raw)).transpose()
}

/// Parse `skip` and `limit`, applying defaults for absent values.
pub(crate) fn parse_page(skip: Option<String>, limit: Option<String>) -> Result<PageRequest, Error> {
    let skip_raw = blank_to_none(skip);
    let limit_raw = blank_to_none(limit);
    let skip_value = skip_raw
        .as_deref()
        .map(|raw| parse_integer(raw, SKIP))
        .transpose()?;
    let limit_value = limit_raw
        .as_deref()
        .map(|raw| parse_integer(raw, LIMIT))
        .transpose()?;

    PageRequest::new(skip_value, limit_value).map_err(|err| {
        let field = match err {
            crate::domain::AllocationValidationError::SkipOutOfRange { .. } => SKIP,
            _ => LIMIT,
        };
        let value = if field == SKIP { skip_raw } else { limit_raw };
        ValidationError::new(field.as_str(), err.to_string())
            .with_value(ErrorCode::OutOfRange, value.unwrap_or_default())
    })
}

/// Resolve a path identifier; unparseable ids cannot name a stored
/// allocation and are reported as not found.
pub(crate) fn parse_allocation_id(value: &str) -> Result<AllocationId, Error> {
    value.parse::<AllocationId>().map_err(|_| {
        debug!(value, "malformed allocation id");
        Error::not_found("Allocation not found").with_details(json!({ "id": value }))
    })
}

/// JSON extractor configuration reporting body errors in the domain envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ValidationError::new("body", format!("malformed request body: {err}"))
            .with_code(ErrorCode::MalformedBody)
            .into()
    })
}
