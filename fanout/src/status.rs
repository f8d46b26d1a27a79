//! Status classification.
//!
//! Maps a non-success status code from a mirror to a [`DomainErrorKind`].
//! The raw body is always kept on the resulting [`DomainError`].

use http::StatusCode;
use serde::Deserialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DomainErrorKind {
    BadRequest,
    AuthFailure,
    NotFound,
    Conflict,
    InternalServerError,
    ServiceUnavailable,
    Unknown,
}

impl DomainErrorKind {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST => DomainErrorKind::BadRequest,
            StatusCode::UNAUTHORIZED => DomainErrorKind::AuthFailure,
            StatusCode::NOT_FOUND => DomainErrorKind::NotFound,
            StatusCode::CONFLICT => DomainErrorKind::Conflict,
            StatusCode::INTERNAL_SERVER_ERROR => DomainErrorKind::InternalServerError,
            StatusCode::SERVICE_UNAVAILABLE => DomainErrorKind::ServiceUnavailable,
            _ => DomainErrorKind::Unknown,
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            DomainErrorKind::BadRequest => "bad request: client authorization is missing",
            DomainErrorKind::AuthFailure => "authentication failure: bad or missing authentication",
            DomainErrorKind::NotFound => {
                "not found: no job/recipient report available for the given job id"
            }
            DomainErrorKind::Conflict => "conflict: duplicate job",
            DomainErrorKind::InternalServerError => {
                "internal server error: the service could not process the request"
            }
            DomainErrorKind::ServiceUnavailable => {
                "service unavailable: temporary overload or maintenance"
            }
            DomainErrorKind::Unknown => {
                "unknown error: the service signalled an unknown problem"
            }
        }
    }
}

impl fmt::Display for DomainErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A classified non-success response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainError {
    pub kind: DomainErrorKind,
    pub status: StatusCode,
    /// Raw response body, lossily decoded as UTF-8.
    pub body: String,
    message: Option<String>,
}

#[derive(Deserialize)]
struct ServiceErrorBody {
    message: String,
}

impl DomainError {
    pub fn new(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ServiceErrorBody>(body)
            .ok()
            .map(|parsed| parsed.message);

        Self {
            kind: DomainErrorKind::from_status(status),
            status,
            body: String::from_utf8_lossy(body).into_owned(),
            message,
        }
    }

    /// The service's `message` field when the body uses the JSON error shape,
    /// otherwise the raw body.
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or(&self.body)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.kind, self.status.as_u16(), self.message())
    }
}

impl std::error::Error for DomainError {}

pub fn is_success(status: StatusCode) -> bool {
    matches!(status, StatusCode::OK | StatusCode::CREATED)
}

/// Classify a response. Returns `None` for 200 and 201.
pub fn classify(status: StatusCode, body: &[u8]) -> Option<DomainError> {
    if is_success(status) {
        return None;
    }

    Some(DomainError::new(status, body))
}
