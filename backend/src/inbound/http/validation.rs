//! Shared validation helpers for inbound HTTP adapters.
//!
//! Path and query values are parsed into domain identifiers here so every
//! handler reports malformed input with the same `details` shape:
//! `{"field": …, "value": …, "code": …}`.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{Error, FriendRequestId, ReadingStatus, UserId, VolumeId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidVolumeId,
    InvalidUserId,
    InvalidRequestId,
    InvalidStatus,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidVolumeId => "invalid_volume_id",
            ErrorCode::InvalidUserId => "invalid_user_id",
            ErrorCode::InvalidRequestId => "invalid_request_id",
            ErrorCode::InvalidStatus => "invalid_status",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field.as_str(), "value": value, "code": code.as_str() }),
        None => json!({ "field": field.as_str(), "code": code.as_str() }),
    };
    Error::invalid_input(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {}", field.as_str()),
        None,
    )
}

pub(crate) fn invalid_value_error(field: FieldName, value: &str, reason: impl AsRef<str>) -> Error {
    field_error(
        field,
        ErrorCode::InvalidValue,
        format!("{}: {}", field.as_str(), reason.as_ref()),
        Some(value),
    )
}

pub(crate) fn parse_volume_id(value: &str, field: FieldName) -> Result<VolumeId, Error> {
    VolumeId::new(value).map_err(|err| {
        field_error(
            field,
            ErrorCode::InvalidVolumeId,
            format!("{} is not a valid volume id: {err}", field.as_str()),
            Some(value),
        )
    })
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|err| {
        field_error(
            field,
            ErrorCode::InvalidUserId,
            format!("{} is not a valid user id: {err}", field.as_str()),
            Some(value),
        )
    })
}

pub(crate) fn parse_request_id(value: &str, field: FieldName) -> Result<FriendRequestId, Error> {
    FriendRequestId::from_str(value).map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidRequestId,
            format!("{} must be a valid UUID", field.as_str()),
            Some(value),
        )
    })
}

pub(crate) fn parse_status(value: &str, field: FieldName) -> Result<ReadingStatus, Error> {
    ReadingStatus::from_str(value).map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidStatus,
            format!("{} must be one of TO_READ, READING or READ", field.as_str()),
            Some(value),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details().and_then(|d| d.get(key)).and_then(Value::as_str)
    }

    #[rstest]
    fn missing_field_has_no_value() {
        let err = missing_field_error(FieldName::new("status"));
        assert_eq!(err.code(), DomainCode::InvalidInput);
        assert_eq!(detail(&err, "field"), Some("status"));
        assert_eq!(detail(&err, "code"), Some("missing_field"));
        assert!(err.details().and_then(|d| d.get("value")).is_none());
    }

    #[rstest]
    #[case("to-read", ReadingStatus::ToRead)]
    #[case("READ", ReadingStatus::Read)]
    fn status_parses_wire_names(#[case] raw: &str, #[case] expected: ReadingStatus) {
        assert_eq!(parse_status(raw, FieldName::new("status")).expect("status"), expected);
    }

    #[rstest]
    #[case::volume(parse_volume_id("a/b", FieldName::new("volumeId")).map(|_| ()), "invalid_volume_id", "a/b")]
    #[case::user(parse_user_id(" ", FieldName::new("uid")).map(|_| ()), "invalid_user_id", " ")]
    #[case::request(parse_request_id("nope", FieldName::new("requestId")).map(|_| ()), "invalid_request_id", "nope")]
    #[case::status(parse_status("DONE", FieldName::new("status")).map(|_| ()), "invalid_status", "DONE")]
    fn malformed_values_report_field_details(
        #[case] result: Result<(), Error>,
        #[case] code: &str,
        #[case] value: &str,
    ) {
        let err = result.expect_err("malformed");
        assert_eq!(err.code(), DomainCode::InvalidInput);
        assert_eq!(detail(&err, "code"), Some(code));
        assert_eq!(detail(&err, "value"), Some(value));
    }
}
