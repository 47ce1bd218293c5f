//! Domain-level error type.
//!
//! Errors are transport agnostic: services return them, and inbound adapters
//! map them to HTTP responses or WebSocket frames. The [`ErrorCode`] is the
//! stable contract; messages are for humans.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// No caller identity is available for an operation that needs one.
    NotAuthenticated,
    /// The caller is authenticated but may not act on the target.
    Forbidden,
    /// A record required by a read does not exist.
    RecordNotFound,
    /// Malformed identifier, blank required field or out-of-range value.
    InvalidInput,
    /// A book was marked read without a known total page count.
    MissingPageCount,
    /// The target is in a state that does not allow the operation.
    Conflict,
    /// One side of a two-profile write succeeded and the other failed.
    PartialReciprocalFailure,
    /// The backing store or upstream service could not be reached.
    BackendUnavailable,
    /// An unexpected failure inside the service.
    InternalError,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is non-empty once trimmed.
///
/// # Examples
/// ```
/// use readtrack::domain::{Error, ErrorCode};
///
/// let err = Error::record_not_found("no such book");
/// assert_eq!(err.code(), ErrorCode::RecordNotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
    details: Option<Value>,
}

/// Validation errors emitted by the fallible constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was blank.
    #[error("error message must not be empty")]
    EmptyMessage,
    /// The trace identifier was blank.
    #[error("trace identifier must not be empty")]
    EmptyTraceId,
}

impl Error {
    /// Create a new error, capturing the trace identifier in scope.
    ///
    /// Blank messages are replaced by the code's default description so the
    /// invariant holds for every constructed value.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            default_message(code).to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Fallible constructor that rejects blank messages.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self::new(code, message))
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier captured at construction, if any.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Structured details attached to the error.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details.
    ///
    /// # Examples
    /// ```
    /// use readtrack::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_input("bad").with_details(json!({ "field": "uid" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach a trace identifier.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach a trace identifier, rejecting blank values.
    pub fn try_with_trace_id(self, id: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ErrorValidationError::EmptyTraceId);
        }
        Ok(self.with_trace_id(id))
    }

    /// Uid of the side that failed in a partial reciprocal write.
    ///
    /// Returns `None` for every other error code.
    pub fn failed_uid(&self) -> Option<&str> {
        if self.code != ErrorCode::PartialReciprocalFailure {
            return None;
        }
        self.details
            .as_ref()
            .and_then(|details| details.get("failedUid"))
            .and_then(Value::as_str)
    }

    /// Convenience constructor for [`ErrorCode::NotAuthenticated`].
    pub fn not_authenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotAuthenticated, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::RecordNotFound`].
    pub fn record_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RecordNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Convenience constructor for [`ErrorCode::MissingPageCount`].
    pub fn missing_page_count(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingPageCount, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Partial reciprocal failure naming the uid whose write failed.
    ///
    /// # Examples
    /// ```
    /// use readtrack::domain::{Error, ErrorCode};
    ///
    /// let err = Error::partial_reciprocal_failure("u2", "friend removal incomplete");
    /// assert_eq!(err.code(), ErrorCode::PartialReciprocalFailure);
    /// assert_eq!(err.failed_uid(), Some("u2"));
    /// ```
    pub fn partial_reciprocal_failure(failed_uid: impl AsRef<str>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PartialReciprocalFailure, message)
            .with_details(json!({ "failedUid": failed_uid.as_ref() }))
    }

    /// Convenience constructor for [`ErrorCode::BackendUnavailable`].
    pub fn backend_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BackendUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

fn default_message(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::NotAuthenticated => "authentication required",
        ErrorCode::Forbidden => "operation not permitted",
        ErrorCode::RecordNotFound => "record not found",
        ErrorCode::InvalidInput => "invalid input",
        ErrorCode::MissingPageCount => "total page count required",
        ErrorCode::Conflict => "conflicting state",
        ErrorCode::PartialReciprocalFailure => "reciprocal update incomplete",
        ErrorCode::BackendUnavailable => "backend unavailable",
        ErrorCode::InternalError => "internal error",
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            trace_id: value.trace_id,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            trace_id,
            details,
        } = value;

        let mut error = Error::try_new(code, message)?;
        error.trace_id = trace_id;
        error.details = details;
        Ok(error)
    }
}
