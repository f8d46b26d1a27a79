use crate::errors::TransportFailure;
use bytes::Bytes;
use http::StatusCode;
use url::Url;

/// A mirror's complete answer. The body has already been drained from the
/// connection.
#[derive(Clone, Debug)]
pub struct MirrorResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// What one mirror contributed to a fan-out.
///
/// Every mirror yields exactly one outcome, including mirrors that failed at
/// the transport level.
#[derive(Debug)]
pub struct Outcome {
    pub origin: Url,
    pub result: Result<MirrorResponse, TransportFailure>,
}

impl Outcome {
    pub fn response(origin: Url, status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            origin,
            result: Ok(MirrorResponse {
                status,
                body: body.into(),
            }),
        }
    }

    pub fn failed(failure: TransportFailure) -> Self {
        Self {
            origin: failure.mirror().clone(),
            result: Err(failure),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.result.as_ref().ok().map(|response| response.status)
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match &self.result {
            Ok(_) => "response",
            Err(TransportFailure::Timeout(_)) => "timeout",
            Err(TransportFailure::TaskFailed(..)) => "task_failed",
            Err(_) => "failed",
        }
    }
}
