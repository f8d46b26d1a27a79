use crate::endpoints::{Region, Service};
use crate::status::{DomainError, DomainErrorKind};
use thiserror::Error;
use url::Url;

/// Result type alias for fan-out operations
pub type Result<T, E = FanoutError> = std::result::Result<T, E>;

/// Errors that can occur while dispatching to and reconciling across mirrors
#[derive(Error, Debug)]
pub enum FanoutError {
    #[error("No endpoints configured for service {service} in region {region}")]
    UnknownEndpoint { region: Region, service: Service },

    #[error("Invalid endpoint catalog: {0}")]
    InvalidCatalog(String),

    #[error("{error} (from {mirror})")]
    Domain {
        mirror: Url,
        #[source]
        error: DomainError,
    },

    #[error("Failed to decode response from {mirror}: {source}")]
    Decode {
        mirror: Url,
        #[source]
        source: serde_json::Error,
    },

    #[error("No mirror produced a response ({} transport failures)", .0.len())]
    NoResponse(Vec<TransportFailure>),

    #[error(transparent)]
    Transport(#[from] TransportFailure),

    #[error("Failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl FanoutError {
    /// The domain error kind, if this error came from a classified status code.
    pub fn kind(&self) -> Option<DomainErrorKind> {
        match self {
            FanoutError::Domain { error, .. } => Some(error.kind),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(DomainErrorKind::NotFound)
    }

    /// True for errors raised before any network activity.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FanoutError::UnknownEndpoint { .. } | FanoutError::InvalidCatalog(_)
        )
    }
}

/// A mirror that could not produce a response at all
#[derive(Error, Debug)]
pub enum TransportFailure {
    #[error("Upstream timeout for {0}")]
    Timeout(Url),

    #[error("Upstream request failed for {0}: {1}")]
    RequestFailed(Url, String),

    #[error("Failed to read response body from {0}: {1}")]
    ResponseBody(Url, String),

    #[error("Request task for {0} failed: {1}")]
    TaskFailed(Url, String),
}

impl TransportFailure {
    pub fn mirror(&self) -> &Url {
        match self {
            TransportFailure::Timeout(url)
            | TransportFailure::RequestFailed(url, _)
            | TransportFailure::ResponseBody(url, _)
            | TransportFailure::TaskFailed(url, _) => url,
        }
    }
}
